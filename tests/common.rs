// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging, fixture catalogs and profiles, and failing collaborator doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `evo_plans`
//!
//! This module provides common fixtures to reduce duplication across
//! integration tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Once};

use chrono::NaiveDate;
use evo_plans::catalog::memory::default_exercises;
use evo_plans::catalog::{ContentCatalog, ExerciseQuery, FoodQuery, StaticCatalog};
use evo_plans::config::{EngineConfig, RankingWeights};
use evo_plans::errors::{AppError, AppResult};
use evo_plans::models::{
    AlgorithmConfig, CostLevel, DayOfWeek, DietPreferences, ExerciseCandidate, ExperienceLevel,
    FoodCandidate, FoodCategory, Goal, NutritionalTarget, Plan, PlanKey, WorkoutPreferences,
};
use evo_plans::orchestrator::PlanOrchestrator;
use evo_plans::pool::{CandidatePool, TieBreaker};
use evo_plans::profile::{ProfileProvider, StaticProfileProvider, TrainingHistory, UserData};
use evo_plans::store::{InMemoryPlanStore, PlanStore, SaveOutcome};

static INIT_LOGGER: Once = Once::new();

/// Seed used wherever reproducible tie-breaking is needed
pub const TEST_SEED: u64 = 42;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; default WARN keeps test output quiet
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Monday 2025-03-10
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// Food fixture with macros per 100 g
pub fn food(
    id: &str,
    name: &str,
    macros: [f64; 4],
    category: FoodCategory,
    allergens: &[&str],
) -> FoodCandidate {
    let [calories, protein, carbs, fat] = macros;
    FoodCandidate {
        id: id.to_owned(),
        name: name.to_owned(),
        calories_per_100g: calories,
        protein_per_100g: protein,
        carbs_per_100g: carbs,
        fat_per_100g: fat,
        category,
        allergens: allergens.iter().map(|a| (*a).to_owned()).collect(),
        dietary_tags: BTreeSet::new(),
        preparation_time_minutes: 10,
        cost_level: CostLevel::Low,
        availability_score: 0.5,
        preference_score: 0.5,
        meal_types: BTreeSet::new(),
    }
}

/// The six-food pool: chicken, rice, broccoli, egg, bread, apple
pub fn six_foods() -> Vec<FoodCandidate> {
    vec![
        food("frango", "Frango", [165.0, 31.0, 0.0, 3.6], FoodCategory::Protein, &[]),
        food("arroz", "Arroz", [130.0, 2.7, 28.0, 0.3], FoodCategory::Grain, &[]),
        food("brocolis", "Brócolis", [55.0, 3.7, 11.2, 0.6], FoodCategory::Vegetable, &[]),
        food("ovo", "Ovo", [155.0, 13.0, 1.1, 11.0], FoodCategory::Protein, &["egg"]),
        food("pao-integral", "Pão Integral", [265.0, 13.0, 49.0, 3.6], FoodCategory::Grain, &["gluten"]),
        food("maca", "Maçã", [52.0, 0.3, 14.0, 0.2], FoodCategory::Fruit, &[]),
    ]
}

/// Built-in exercises with the six-food pool
pub fn six_food_catalog() -> StaticCatalog {
    StaticCatalog::new(default_exercises(), six_foods())
}

/// Available days from a list
pub fn days(list: &[DayOfWeek]) -> BTreeSet<DayOfWeek> {
    list.iter().copied().collect()
}

/// 2000 kcal / 150 P / 200 C / 60 F, beginner, training Monday to Wednesday
pub fn algorithm_config(user_id: &str) -> AlgorithmConfig {
    AlgorithmConfig {
        user_id: user_id.to_owned(),
        goal: Goal::Maintain,
        experience_level: ExperienceLevel::Beginner,
        target_calories: 2000.0,
        target_protein: 150.0,
        target_carbs: 200.0,
        target_fat: 60.0,
        workout_preferences: WorkoutPreferences {
            available_days: days(&[DayOfWeek::Monday, DayOfWeek::Tuesday, DayOfWeek::Wednesday]),
            ..WorkoutPreferences::default()
        },
        diet_preferences: DietPreferences::default(),
    }
}

/// Profile matching [`algorithm_config`]
pub fn user_profile(user_id: &str) -> UserData {
    let config = algorithm_config(user_id);
    UserData {
        user_id: user_id.to_owned(),
        goal: config.goal,
        experience_level: config.experience_level,
        targets: Some(NutritionalTarget {
            calories: config.target_calories,
            protein: config.target_protein,
            carbs: config.target_carbs,
            fat: config.target_fat,
        }),
        body_metrics: None,
        workout_preferences: config.workout_preferences,
        diet_preferences: config.diet_preferences,
        history: TrainingHistory::default(),
    }
}

/// Seeded pool over `catalog`
pub fn seeded_pool(catalog: impl ContentCatalog + 'static) -> CandidatePool {
    CandidatePool::new(
        Arc::new(catalog),
        RankingWeights::default(),
        Arc::new(TieBreaker::seeded(TEST_SEED)),
    )
}

/// Seeded orchestrator over `catalog` and `profiles`; the returned store shares its state
pub fn orchestrator_with(
    catalog: Arc<dyn ContentCatalog>,
    profiles: Vec<UserData>,
) -> (Arc<PlanOrchestrator>, InMemoryPlanStore) {
    init_test_logging();
    let store = InMemoryPlanStore::new();
    let orchestrator = PlanOrchestrator::new(
        catalog,
        Arc::new(store.clone()),
        Arc::new(StaticProfileProvider::new(profiles)),
        &EngineConfig::default().with_seed(TEST_SEED),
    );
    (Arc::new(orchestrator), store)
}

/// Catalog whose every call fails as unavailable
pub struct FailingCatalog;

#[async_trait::async_trait]
impl ContentCatalog for FailingCatalog {
    async fn search_exercises(&self, _query: &ExerciseQuery) -> AppResult<Vec<ExerciseCandidate>> {
        Err(AppError::service_unavailable("catalog", "connection refused by 10.0.0.7:5432"))
    }

    async fn search_foods(&self, _query: &FoodQuery) -> AppResult<Vec<FoodCandidate>> {
        Err(AppError::service_unavailable("catalog", "connection refused by 10.0.0.7:5432"))
    }

    async fn health_check(&self) -> AppResult<()> {
        Err(AppError::service_unavailable("catalog", "connection refused by 10.0.0.7:5432"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Store whose every call fails
pub struct FailingStore;

#[async_trait::async_trait]
impl PlanStore for FailingStore {
    async fn get_existing_plan(&self, _key: &PlanKey) -> AppResult<Option<Plan>> {
        Err(AppError::storage("plans table locked"))
    }

    async fn save_plan(&self, _plan: Plan) -> AppResult<SaveOutcome> {
        Err(AppError::storage("plans table locked"))
    }

    async fn health_check(&self) -> AppResult<()> {
        Err(AppError::storage("plans table locked"))
    }
}

/// Store that reads fine but rejects writes
#[derive(Clone, Default)]
pub struct ReadOnlyStore {
    pub inner: InMemoryPlanStore,
}

#[async_trait::async_trait]
impl PlanStore for ReadOnlyStore {
    async fn get_existing_plan(&self, key: &PlanKey) -> AppResult<Option<Plan>> {
        self.inner.get_existing_plan(key).await
    }

    async fn save_plan(&self, _plan: Plan) -> AppResult<SaveOutcome> {
        Err(AppError::storage("read-only replica"))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Profile provider whose every call fails
pub struct FailingProfiles;

#[async_trait::async_trait]
impl ProfileProvider for FailingProfiles {
    async fn get_user_data(&self, _user_id: &str) -> AppResult<UserData> {
        Err(AppError::external_service("profiles", "upstream returned 502"))
    }

    async fn health_check(&self) -> AppResult<()> {
        Err(AppError::external_service("profiles", "upstream returned 502"))
    }
}
