// ABOUTME: Criterion benchmarks for workout and diet plan generation
// ABOUTME: Measures generator latency per experience level and orchestrator cache hits versus misses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for plan generation.
//!
//! Generators run against the built-in catalog; the orchestrator benchmarks compare
//! a request served from the store with one that generates and persists a new plan.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evo_plans::catalog::StaticCatalog;
use evo_plans::config::{DietTuning, EngineConfig, RankingWeights, WorkoutTuning};
use evo_plans::generators::{DietPlanGenerator, WorkoutPlanGenerator};
use evo_plans::models::{
    AlgorithmConfig, DayOfWeek, DietPreferences, ExperienceLevel, Goal, PlanKind,
    WorkoutPreferences,
};
use evo_plans::orchestrator::PlanOrchestrator;
use evo_plans::pool::{CandidatePool, TieBreaker};
use evo_plans::profile::StaticProfileProvider;
use evo_plans::store::InMemoryPlanStore;
use tokio::runtime::Runtime;

const SEED: u64 = 7;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn bench_config(experience: ExperienceLevel) -> AlgorithmConfig {
    let available_days: BTreeSet<DayOfWeek> = [
        DayOfWeek::Monday,
        DayOfWeek::Wednesday,
        DayOfWeek::Friday,
    ]
    .into_iter()
    .collect();
    AlgorithmConfig {
        user_id: "bench-user".to_owned(),
        goal: Goal::GainMuscle,
        experience_level: experience,
        target_calories: 2800.0,
        target_protein: 180.0,
        target_carbs: 320.0,
        target_fat: 80.0,
        workout_preferences: WorkoutPreferences {
            available_days,
            session_duration_minutes: 90,
            ..WorkoutPreferences::default()
        },
        diet_preferences: DietPreferences {
            allergies: vec!["lactose".to_owned()],
            ..DietPreferences::default()
        },
    }
}

fn pool() -> CandidatePool {
    CandidatePool::new(
        Arc::new(StaticCatalog::with_default_content()),
        RankingWeights::default(),
        Arc::new(TieBreaker::seeded(SEED)),
    )
}

/// Benchmark workout generation per experience level
fn bench_workout_generation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let generator = WorkoutPlanGenerator::new(pool(), WorkoutTuning::default());
    let mut group = c.benchmark_group("workout_generation");

    for experience in [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ] {
        let config = bench_config(experience);
        group.bench_with_input(
            BenchmarkId::new("push_day", experience.as_str()),
            &config,
            |b, config| {
                b.iter(|| {
                    rt.block_on(async {
                        generator
                            .generate(black_box(&config.user_id), monday(), black_box(config))
                            .await
                            .unwrap()
                    })
                });
            },
        );
    }

    group.finish();
}

/// Benchmark diet generation over the built-in food catalog
fn bench_diet_generation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let generator = DietPlanGenerator::new(pool(), DietTuning::default());
    let config = bench_config(ExperienceLevel::Intermediate);

    c.bench_function("diet_generation/default_catalog", |b| {
        b.iter(|| {
            rt.block_on(async {
                generator
                    .generate(black_box(&config.user_id), monday(), black_box(&config))
                    .await
                    .unwrap()
            })
        });
    });
}

/// Benchmark orchestrator requests served from the store versus generated
fn bench_orchestrator(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let config = bench_config(ExperienceLevel::Intermediate);
    let orchestrator = PlanOrchestrator::new(
        Arc::new(StaticCatalog::with_default_content()),
        Arc::new(InMemoryPlanStore::new()),
        Arc::new(StaticProfileProvider::default()),
        &EngineConfig::default().with_seed(SEED),
    );
    let mut group = c.benchmark_group("orchestrator");

    rt.block_on(async {
        orchestrator
            .generate("bench-user", monday(), PlanKind::Diet, &config)
            .await
            .unwrap()
    });
    group.bench_function("cache_hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                orchestrator
                    .generate("bench-user", black_box(monday()), PlanKind::Diet, &config)
                    .await
                    .unwrap()
            })
        });
    });

    // every iteration asks for a day that has not been generated yet
    let mut offset = 1_i64;
    group.bench_function("cache_miss", |b| {
        b.iter(|| {
            let date = monday() + Duration::days(offset);
            offset += 1;
            rt.block_on(async {
                orchestrator
                    .generate("bench-user", black_box(date), PlanKind::Diet, &config)
                    .await
                    .unwrap()
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_workout_generation,
    bench_diet_generation,
    bench_orchestrator
);
criterion_main!(benches);
