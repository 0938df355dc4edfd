// ABOUTME: Plan orchestrator: get-or-create entry point over the plan store and both generators
// ABOUTME: Guarantees at most one persisted generation per (user, date, kind) under concurrent requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Orchestrator
//!
//! Every request moves through
//! `REQUESTED → CACHE_HIT → RETURNED` or
//! `REQUESTED → CACHE_MISS → GENERATING → PERSISTED → RETURNED`.
//! A stored plan is returned unchanged. Otherwise the orchestrator takes a per-key
//! async lock, checks the store again, resolves the user's configuration, generates
//! and saves with an insert-if-absent write. A failure at any step persists nothing.
//!
//! Collaborator errors are propagated unmodified and never retried; the request id
//! is attached so callers can correlate them with the request span.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Duration, Local, NaiveDate};
use dashmap::DashMap;
use evo_core::errors::{AppError, AppResult};
use evo_core::models::{AlgorithmConfig, DietPlan, Plan, PlanKey, PlanKind, WorkoutPlan};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::config::EngineConfig;
use crate::generators::{DietPlanGenerator, GenerationContext, WorkoutPlanGenerator};
use crate::health::{ComponentHealth, HealthReport};
use crate::logging::PlanLogger;
use crate::pool::{CandidatePool, TieBreaker};
use crate::profile::ProfileProvider;
use crate::store::{PlanStore, SaveOutcome};

/// Accepted plan date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` plan date, defaulting to today
///
/// # Errors
///
/// Returns an `InvalidFormat` error naming the rejected value
pub fn parse_plan_date(date: Option<&str>) -> AppResult<NaiveDate> {
    let Some(raw) = date else {
        return Ok(Local::now().date_naive());
    };
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        AppError::invalid_format(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
            .with_details(json!({ "field": "date", "value": raw }))
            .with_source(e)
    })
}

/// Monday of the week containing `date`
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Request lifecycle phase, logged at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// Request accepted
    Requested,
    /// A stored plan answers the request
    CacheHit,
    /// No stored plan
    CacheMiss,
    /// Generator running
    Generating,
    /// Fresh plan saved
    Persisted,
    /// Plan handed back to the caller
    Returned,
}

impl RequestPhase {
    /// Log label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::CacheHit => "CACHE_HIT",
            Self::CacheMiss => "CACHE_MISS",
            Self::Generating => "GENERATING",
            Self::Persisted => "PERSISTED",
            Self::Returned => "RETURNED",
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of orchestrator counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorMetrics {
    /// Workout plans generated and persisted
    pub workout_plans_generated: u64,
    /// Diet plans generated and persisted
    pub diet_plans_generated: u64,
    /// Requests answered from the store
    pub cache_hits: u64,
    /// Generations discarded because another writer persisted the key first
    pub lost_races: u64,
}

#[derive(Default)]
struct Counters {
    workout_plans_generated: AtomicU64,
    diet_plans_generated: AtomicU64,
    cache_hits: AtomicU64,
    lost_races: AtomicU64,
}

impl Counters {
    fn record_generated(&self, kind: PlanKind) {
        let counter = match kind {
            PlanKind::Workout => &self.workout_plans_generated,
            PlanKind::Diet => &self.diet_plans_generated,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OrchestratorMetrics {
        OrchestratorMetrics {
            workout_plans_generated: self.workout_plans_generated.load(Ordering::Relaxed),
            diet_plans_generated: self.diet_plans_generated.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            lost_races: self.lost_races.load(Ordering::Relaxed),
        }
    }
}

/// Where the generation input comes from
#[derive(Clone, Copy)]
enum ConfigSource<'a> {
    Profile,
    Explicit(&'a AlgorithmConfig),
}

/// Entry point of the plan generation engine
pub struct PlanOrchestrator {
    catalog: Arc<dyn ContentCatalog>,
    store: Arc<dyn PlanStore>,
    profiles: Arc<dyn ProfileProvider>,
    workout: WorkoutPlanGenerator,
    diet: DietPlanGenerator,
    key_locks: DashMap<PlanKey, Arc<Mutex<()>>>,
    counters: Counters,
}

impl PlanOrchestrator {
    /// Wire the orchestrator to its collaborators
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ContentCatalog>,
        store: Arc<dyn PlanStore>,
        profiles: Arc<dyn ProfileProvider>,
        config: &EngineConfig,
    ) -> Self {
        let tie_breaker = Arc::new(TieBreaker::from_seed(config.selection_seed));
        let pool = CandidatePool::new(catalog.clone(), config.ranking.clone(), tie_breaker);
        Self {
            catalog,
            store,
            profiles,
            workout: WorkoutPlanGenerator::new(pool.clone(), config.workout.clone()),
            diet: DietPlanGenerator::new(pool, config.diet.clone()),
            key_locks: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Workout plan of `user_id` for `date` (`YYYY-MM-DD`, default today)
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed date or profile, and propagates
    /// collaborator failures
    pub async fn generate_workout_plan(
        &self,
        user_id: &str,
        date: Option<&str>,
    ) -> AppResult<WorkoutPlan> {
        let plan = self
            .handle(user_id, date, PlanKind::Workout, ConfigSource::Profile)
            .await?;
        plan.into_workout()
            .ok_or_else(|| AppError::storage("Stored plan has an unexpected kind"))
    }

    /// Diet plan of `user_id` for `date` (`YYYY-MM-DD`, default today)
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed date or profile, and propagates
    /// collaborator failures
    pub async fn generate_diet_plan(&self, user_id: &str, date: Option<&str>) -> AppResult<DietPlan> {
        let plan = self
            .handle(user_id, date, PlanKind::Diet, ConfigSource::Profile)
            .await?;
        plan.into_diet()
            .ok_or_else(|| AppError::storage("Stored plan has an unexpected kind"))
    }

    /// Get or create the plan of `kind` with an explicit configuration
    ///
    /// The configuration is validated before any I/O.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the configuration is invalid or belongs to
    /// another user, and propagates collaborator failures
    pub async fn generate(
        &self,
        user_id: &str,
        date: NaiveDate,
        kind: PlanKind,
        config: &AlgorithmConfig,
    ) -> AppResult<Plan> {
        if config.user_id != user_id {
            return Err(AppError::invalid_input(format!(
                "Configuration belongs to '{}', not '{user_id}'",
                config.user_id
            ))
            .with_user_id(user_id));
        }
        config.validate()?;
        let date = date.format(DATE_FORMAT).to_string();
        self.handle(user_id, Some(&date), kind, ConfigSource::Explicit(config))
            .await
    }

    /// The seven daily workout plans of the week starting at `start`
    /// (`YYYY-MM-DD`, default the Monday of the current week)
    ///
    /// # Errors
    ///
    /// Fails on the first day whose plan cannot be obtained
    pub async fn generate_weekly_schedule(
        &self,
        user_id: &str,
        start: Option<&str>,
    ) -> AppResult<Vec<WorkoutPlan>> {
        let first_day = match start {
            Some(_) => parse_plan_date(start)?,
            None => week_start(Local::now().date_naive()),
        };

        let mut week = Vec::with_capacity(7);
        for offset in 0..7 {
            let day = (first_day + Duration::days(offset)).format(DATE_FORMAT).to_string();
            week.push(self.generate_workout_plan(user_id, Some(&day)).await?);
        }
        Ok(week)
    }

    /// Probe the catalog, the store and the profile provider
    pub async fn health_check(&self) -> HealthReport {
        let checks = vec![
            ComponentHealth::probe(self.catalog.name(), self.catalog.health_check()).await,
            ComponentHealth::probe("plan_store", self.store.health_check()).await,
            ComponentHealth::probe("profile_provider", self.profiles.health_check()).await,
        ];
        HealthReport::from_checks(checks)
    }

    /// Current counters
    #[must_use]
    pub fn metrics(&self) -> OrchestratorMetrics {
        self.counters.snapshot()
    }

    async fn handle(
        &self,
        user_id: &str,
        date: Option<&str>,
        kind: PlanKind,
        source: ConfigSource<'_>,
    ) -> AppResult<Plan> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("plan_request", request.id = %request_id, user.id = %user_id, plan.kind = %kind);

        async {
            debug!(phase = %RequestPhase::Requested, date = ?date, "Plan requested");
            let date = parse_plan_date(date).map_err(|e| e.with_user_id(user_id))?;
            let key = PlanKey::new(user_id, date, kind);
            let plan = self.get_or_create(&key, &request_id, source).await?;
            debug!(phase = %RequestPhase::Returned, key = %key, "Plan returned");
            Ok(plan)
        }
        .instrument(span)
        .await
        .map_err(|e: AppError| e.with_request_id(request_id.clone()))
    }

    async fn get_or_create(
        &self,
        key: &PlanKey,
        request_id: &str,
        source: ConfigSource<'_>,
    ) -> AppResult<Plan> {
        if let Some(existing) = self.store.get_existing_plan(key).await? {
            self.record_cache_hit(key, request_id);
            return Ok(existing);
        }

        let lock = self
            .key_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.create_locked(key, request_id, source).await
        };

        drop(lock);
        self.key_locks
            .remove_if(key, |_, entry| Arc::strong_count(entry) == 1);
        result
    }

    async fn create_locked(
        &self,
        key: &PlanKey,
        request_id: &str,
        source: ConfigSource<'_>,
    ) -> AppResult<Plan> {
        // a request holding the lock before us may have persisted the key
        if let Some(existing) = self.store.get_existing_plan(key).await? {
            self.record_cache_hit(key, request_id);
            return Ok(existing);
        }
        debug!(phase = %RequestPhase::CacheMiss, key = %key, "No stored plan");

        let started = Instant::now();
        let plan = self.generate_fresh(key, source).await?;

        match self.store.save_plan(plan.clone()).await? {
            SaveOutcome::Inserted => {
                self.counters.record_generated(key.kind);
                let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                debug!(phase = %RequestPhase::Persisted, key = %key, "Plan persisted");
                PlanLogger::log_plan_persisted(key, request_id, duration_ms);
                Ok(plan)
            }
            SaveOutcome::AlreadyExists(existing) => {
                self.counters.lost_races.fetch_add(1, Ordering::Relaxed);
                PlanLogger::log_lost_race(key, request_id);
                Ok(existing)
            }
        }
    }

    async fn generate_fresh(&self, key: &PlanKey, source: ConfigSource<'_>) -> AppResult<Plan> {
        let (config, context) = match source {
            ConfigSource::Explicit(config) => (config.clone(), GenerationContext::default()),
            ConfigSource::Profile => {
                let user = self.profiles.get_user_data(&key.user_id).await?;
                (user.algorithm_config()?, user.generation_context())
            }
        };

        debug!(phase = %RequestPhase::Generating, key = %key, "Generating plan");
        match key.kind {
            PlanKind::Workout => self
                .workout
                .generate_with_context(&key.user_id, key.date, &config, &context)
                .await
                .map(Plan::from),
            PlanKind::Diet => self
                .diet
                .generate_with_context(&key.user_id, key.date, &config, &context)
                .await
                .map(Plan::from),
        }
    }

    fn record_cache_hit(&self, key: &PlanKey, request_id: &str) {
        self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
        debug!(phase = %RequestPhase::CacheHit, key = %key, "Stored plan found");
        PlanLogger::log_cache_hit(key, request_id);
    }
}
