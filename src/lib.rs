// ABOUTME: Main library entry point for the EVO plan generation engine
// ABOUTME: Turns user preferences into daily workout and diet plans persisted at most once per day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # EVO Plans
//!
//! A plan generation engine producing a daily **workout plan** (sessions, exercises,
//! sets and reps, warmups) and a daily **diet plan** (meals, foods, portions) that
//! match a user's numeric targets and hard constraints.
//!
//! ## Architecture
//!
//! - **Targets**: per-meal splits, training split selection, target derivation
//! - **Catalog**: content catalog capability with static and no-op implementations
//! - **Pool**: hard-constraint filtering and seedable soft ranking of candidates
//! - **Generators**: workout and diet plan assembly
//! - **Store / Profile**: plan persistence and user profile capabilities
//! - **Orchestrator**: get-or-create entry point with at-most-once persistence
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use evo_plans::catalog::StaticCatalog;
//! use evo_plans::config::EngineConfig;
//! use evo_plans::orchestrator::PlanOrchestrator;
//! use evo_plans::profile::StaticProfileProvider;
//! use evo_plans::store::InMemoryPlanStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load()?;
//!     let profiles = StaticProfileProvider::from_json_file("profiles.json").await?;
//!     let orchestrator = PlanOrchestrator::new(
//!         Arc::new(StaticCatalog::with_default_content()),
//!         Arc::new(InMemoryPlanStore::new()),
//!         Arc::new(profiles),
//!         &config,
//!     );
//!
//!     let plan = orchestrator.generate_workout_plan("user-1", Some("2025-03-10")).await?;
//!     println!("{} sessions", plan.sessions.len());
//!     Ok(())
//! }
//! ```

/// Content catalog capability and implementations
pub mod catalog;

/// Engine configuration with environment overrides
pub mod config;

/// Workout and diet plan generators
pub mod generators;

/// Health reporting for external collaborators
pub mod health;

/// Structured logging setup
pub mod logging;

/// Get-or-create orchestration over store, profiles and generators
pub mod orchestrator;

/// Candidate filtering and ranking
pub mod pool;

/// User profile capability
pub mod profile;

/// Plan persistence capability
pub mod store;

/// Target splitting, split selection and target derivation
pub mod targets;

pub use evo_core::{constants, errors, models};
