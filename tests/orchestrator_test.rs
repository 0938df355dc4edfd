// ABOUTME: Integration tests for the plan orchestrator
// ABOUTME: Idempotent get-or-create, concurrent requests, lost races, error propagation and health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use chrono::Duration;
use evo_plans::catalog::{ContentCatalog, StaticCatalog};
use evo_plans::config::EngineConfig;
use evo_plans::errors::{AppResult, ErrorCode, ErrorResponse};
use evo_plans::health::HealthStatus;
use evo_plans::models::{Plan, PlanKey, PlanKind};
use evo_plans::orchestrator::PlanOrchestrator;
use evo_plans::profile::{ProfileProvider, StaticProfileProvider};
use evo_plans::store::{InMemoryPlanStore, PlanStore, SaveOutcome};

mod common;

use common::{
    algorithm_config, init_test_logging, monday, orchestrator_with, six_food_catalog,
    user_profile, FailingCatalog, FailingProfiles, FailingStore, ReadOnlyStore, TEST_SEED,
};

const MONDAY: &str = "2025-03-10";

fn default_catalog() -> Arc<dyn ContentCatalog> {
    Arc::new(StaticCatalog::with_default_content())
}

fn orchestrator() -> (Arc<PlanOrchestrator>, InMemoryPlanStore) {
    orchestrator_with(default_catalog(), vec![user_profile("ana"), user_profile("bruno")])
}

fn wired(
    catalog: Arc<dyn ContentCatalog>,
    store: Arc<dyn PlanStore>,
    profiles: Arc<dyn ProfileProvider>,
) -> PlanOrchestrator {
    init_test_logging();
    PlanOrchestrator::new(
        catalog,
        store,
        profiles,
        &EngineConfig::default().with_seed(TEST_SEED),
    )
}

/// Store that never reports an existing plan, so every request generates
#[derive(Clone, Default)]
struct BlindStore {
    inner: InMemoryPlanStore,
}

#[async_trait::async_trait]
impl PlanStore for BlindStore {
    async fn get_existing_plan(&self, _key: &PlanKey) -> AppResult<Option<Plan>> {
        Ok(None)
    }

    async fn save_plan(&self, plan: Plan) -> AppResult<SaveOutcome> {
        self.inner.save_plan(plan).await
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

// ============================================================================
// GET OR CREATE
// ============================================================================

#[tokio::test]
async fn test_second_request_is_served_from_store() {
    let (orchestrator, store) = orchestrator();

    let first = orchestrator
        .generate_workout_plan("ana", Some(MONDAY))
        .await
        .unwrap();
    let second = orchestrator
        .generate_workout_plan("ana", Some(MONDAY))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.write_count(), 1);
    let metrics = orchestrator.metrics();
    assert_eq!(metrics.workout_plans_generated, 1);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.lost_races, 0);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let (orchestrator, store) = orchestrator();

    orchestrator.generate_workout_plan("ana", Some(MONDAY)).await.unwrap();
    orchestrator.generate_diet_plan("ana", Some(MONDAY)).await.unwrap();
    orchestrator.generate_workout_plan("bruno", Some(MONDAY)).await.unwrap();
    orchestrator
        .generate_workout_plan("ana", Some("2025-03-11"))
        .await
        .unwrap();

    assert_eq!(store.write_count(), 4);
    assert_eq!(store.len().await, 4);
    let metrics = orchestrator.metrics();
    assert_eq!(metrics.workout_plans_generated, 3);
    assert_eq!(metrics.diet_plans_generated, 1);
    assert_eq!(metrics.cache_hits, 0);
}

#[tokio::test]
async fn test_rest_day_is_persisted_too() {
    let (orchestrator, store) = orchestrator();

    // Thursday
    let plan = orchestrator
        .generate_workout_plan("ana", Some("2025-03-13"))
        .await
        .unwrap();
    assert!(plan.rest_day);

    let key = PlanKey::new("ana", monday() + Duration::days(3), PlanKind::Workout);
    let stored = store.get_existing_plan(&key).await.unwrap().unwrap();
    assert_eq!(stored.into_workout().unwrap(), plan);
}

#[tokio::test]
async fn test_diet_plan_from_profile() {
    let (orchestrator, store) = orchestrator_with(
        Arc::new(six_food_catalog()),
        vec![user_profile("ana")],
    );

    let plan = orchestrator.generate_diet_plan("ana", Some(MONDAY)).await.unwrap();
    assert_eq!(plan.user_id, "ana");
    assert_eq!(plan.date, monday());
    assert_eq!(plan.meals.len(), 4);
    assert!(plan.total_calories > 0.0);

    let key = PlanKey::new("ana", monday(), PlanKind::Diet);
    assert!(store.get_existing_plan(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn test_explicit_configuration_shares_the_key() {
    let (orchestrator, store) = orchestrator();
    let mut config = algorithm_config("ana");
    config.target_calories = 2500.0;

    let explicit = orchestrator
        .generate("ana", monday(), PlanKind::Diet, &config)
        .await
        .unwrap()
        .into_diet()
        .unwrap();
    assert!((explicit.target_calories - 2500.0).abs() < f64::EPSILON);

    // the stored plan wins over the profile's 2000 kcal
    let from_profile = orchestrator.generate_diet_plan("ana", Some(MONDAY)).await.unwrap();
    assert_eq!(from_profile, explicit);
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_weekly_schedule_covers_seven_days() {
    let (orchestrator, store) = orchestrator();

    let week = orchestrator
        .generate_weekly_schedule("ana", Some(MONDAY))
        .await
        .unwrap();

    assert_eq!(week.len(), 7);
    for (offset, plan) in week.iter().enumerate() {
        assert_eq!(plan.date, monday() + Duration::days(offset as i64));
        assert_eq!(plan.rest_day, offset >= 3, "day {offset}");
    }
    assert_eq!(store.write_count(), 7);

    orchestrator
        .generate_weekly_schedule("ana", Some(MONDAY))
        .await
        .unwrap();
    assert_eq!(store.write_count(), 7);
    assert_eq!(orchestrator.metrics().cache_hits, 7);
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_persist_once() {
    let (orchestrator, store) = orchestrator();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator.generate_diet_plan("ana", Some(MONDAY)).await
            })
        })
        .collect();

    let mut plans = Vec::new();
    for handle in handles {
        plans.push(handle.await.unwrap().unwrap());
    }

    assert!(plans.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(store.write_count(), 1);
    let metrics = orchestrator.metrics();
    assert_eq!(metrics.diet_plans_generated, 1);
    assert_eq!(metrics.cache_hits, 15);
}

#[tokio::test]
async fn test_lost_race_returns_the_stored_plan() {
    let store = BlindStore::default();
    let orchestrator = wired(
        default_catalog(),
        Arc::new(store.clone()),
        Arc::new(StaticProfileProvider::new(vec![user_profile("ana")])),
    );

    let first = orchestrator.generate_workout_plan("ana", Some(MONDAY)).await.unwrap();
    let second = orchestrator.generate_workout_plan("ana", Some(MONDAY)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.inner.write_count(), 1);
    let metrics = orchestrator.metrics();
    assert_eq!(metrics.workout_plans_generated, 1);
    assert_eq!(metrics.lost_races, 1);
}

// ============================================================================
// ERRORS
// ============================================================================

#[tokio::test]
async fn test_malformed_date_is_rejected_before_io() {
    let orchestrator = wired(
        default_catalog(),
        Arc::new(FailingStore),
        Arc::new(FailingProfiles),
    );

    let err = orchestrator
        .generate_workout_plan("ana", Some("2025-13-40"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidFormat);
    assert!(err.context.request_id.is_some());
    assert_eq!(err.context.user_id.as_deref(), Some("ana"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (orchestrator, store) = orchestrator();
    let err = orchestrator
        .generate_diet_plan("nobody", Some(MONDAY))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(err.context.request_id.is_some());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_invalid_explicit_configuration_writes_nothing() {
    let (orchestrator, store) = orchestrator();

    let mut config = algorithm_config("ana");
    config.target_protein = 0.0;
    let err = orchestrator
        .generate("ana", monday(), PlanKind::Workout, &config)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.context.details["fields"][0], "target_protein");

    let err = orchestrator
        .generate("bruno", monday(), PlanKind::Workout, &algorithm_config("ana"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_catalog_failure_propagates_without_leaking() {
    let (orchestrator, store) = orchestrator_with(Arc::new(FailingCatalog), vec![user_profile("ana")]);

    let err = orchestrator
        .generate_workout_plan("ana", Some(MONDAY))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(store.write_count(), 0);

    let request_id = err.context.request_id.clone();
    let response = ErrorResponse::from(err);
    assert!(!response.error.message.contains("10.0.0.7"));
    assert_eq!(response.error.request_id, request_id);
    assert!(response.error.details.is_null());
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let orchestrator = wired(
        default_catalog(),
        Arc::new(FailingStore),
        Arc::new(StaticProfileProvider::new(vec![user_profile("ana")])),
    );

    let err = orchestrator
        .generate_diet_plan("ana", Some(MONDAY))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
}

#[tokio::test]
async fn test_rejected_write_returns_error_and_persists_nothing() {
    let store = ReadOnlyStore::default();
    let orchestrator = wired(
        default_catalog(),
        Arc::new(store.clone()),
        Arc::new(StaticProfileProvider::new(vec![user_profile("ana")])),
    );

    let err = orchestrator
        .generate_workout_plan("ana", Some(MONDAY))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
    assert!(store.inner.is_empty().await);
    assert_eq!(orchestrator.metrics().workout_plans_generated, 0);
}

#[tokio::test]
async fn test_profile_failure_propagates() {
    let orchestrator = wired(
        default_catalog(),
        Arc::new(InMemoryPlanStore::new()),
        Arc::new(FailingProfiles),
    );

    let err = orchestrator
        .generate_workout_plan("ana", Some(MONDAY))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    let response = ErrorResponse::from(err);
    assert!(!response.error.message.contains("502"));
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health_report_when_everything_answers() {
    let (orchestrator, _store) = orchestrator();
    let report = orchestrator.health_check().await;

    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.checks.len(), 3);
    assert!(report.component("static").is_some());
    assert!(report.component("plan_store").is_some());
    assert!(report.component("profile_provider").is_some());
}

#[tokio::test]
async fn test_health_report_degrades_with_failing_collaborators() {
    let (orchestrator, _store) = orchestrator_with(Arc::new(FailingCatalog), Vec::new());
    let report = orchestrator.health_check().await;

    assert_eq!(report.status, HealthStatus::Degraded);
    let catalog = report.component("failing").unwrap();
    assert_eq!(catalog.status, HealthStatus::Unhealthy);
    assert!(!catalog.message.contains("10.0.0.7"));

    let down = wired(
        Arc::new(FailingCatalog),
        Arc::new(FailingStore),
        Arc::new(FailingProfiles),
    );
    assert_eq!(down.health_check().await.status, HealthStatus::Unhealthy);
}
