// ABOUTME: EVO plans CLI - generates workout, diet and weekly plans from a profiles file
// ABOUTME: Prints the resulting plans as pretty JSON; logging is configured from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Workout plan for today
//! evo-plans workout --user ana --profiles profiles.json
//!
//! # Diet plan for a given day with a custom catalog
//! evo-plans diet --user ana --date 2025-03-10 --profiles profiles.json --catalog catalog.json
//!
//! # Reproducible weekly schedule
//! evo-plans week --user ana --date 2025-03-10 --profiles profiles.json --seed 42
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use evo_plans::catalog::{ContentCatalog, StaticCatalog};
use evo_plans::config::EngineConfig;
use evo_plans::logging;
use evo_plans::orchestrator::PlanOrchestrator;
use evo_plans::profile::StaticProfileProvider;
use evo_plans::store::InMemoryPlanStore;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "evo-plans",
    about = "EVO plan generation engine",
    long_about = "Generates personalized daily workout and diet plans from stored user profiles."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Generate the workout plan of a day
    Workout(RequestArgs),

    /// Generate the diet plan of a day
    Diet(RequestArgs),

    /// Generate the seven workout plans of a week
    Week(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// User identifier
    #[arg(long)]
    user: String,

    /// Plan date (YYYY-MM-DD); for `week`, the first day of the week
    #[arg(long)]
    date: Option<String>,

    /// JSON file holding an array of user profiles
    #[arg(long)]
    profiles: PathBuf,

    /// JSON catalog file; defaults to the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for reproducible tie-breaking
    #[arg(long)]
    seed: Option<u64>,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn build_orchestrator(args: &RequestArgs) -> Result<PlanOrchestrator> {
    let mut config = EngineConfig::load()?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let catalog: Arc<dyn ContentCatalog> = match &args.catalog {
        Some(path) => Arc::new(StaticCatalog::from_json_file(path).await?),
        None => Arc::new(StaticCatalog::with_default_content()),
    };
    let profiles = StaticProfileProvider::from_json_file(&args.profiles).await?;
    info!(profiles = profiles.len(), "Loaded user profiles");

    Ok(PlanOrchestrator::new(
        catalog,
        Arc::new(InMemoryPlanStore::new()),
        Arc::new(profiles),
        &config,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Workout(args) => {
            let orchestrator = build_orchestrator(&args).await?;
            let plan = orchestrator
                .generate_workout_plan(&args.user, args.date.as_deref())
                .await?;
            print_json(&plan)
        }
        Command::Diet(args) => {
            let orchestrator = build_orchestrator(&args).await?;
            let plan = orchestrator
                .generate_diet_plan(&args.user, args.date.as_deref())
                .await?;
            print_json(&plan)
        }
        Command::Week(args) => {
            let orchestrator = build_orchestrator(&args).await?;
            let week = orchestrator
                .generate_weekly_schedule(&args.user, args.date.as_deref())
                .await?;
            print_json(&week)
        }
    }
}
