// ABOUTME: Plan store capability interface consumed by the orchestrator
// ABOUTME: Lookup by (user, date, kind) and an insert-if-absent save giving at-most-once persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Store
//!
//! Generated plans are persisted once per [`PlanKey`] and are immutable afterwards.
//! Implementations must make [`PlanStore::save_plan`] conditional: a second save for a
//! key that already holds a plan leaves the stored plan untouched and hands it back.
//!
//! ```rust,no_run
//! use evo_plans::store::{InMemoryPlanStore, PlanStore, SaveOutcome};
//! # async fn example(plan: evo_core::models::Plan) -> evo_core::errors::AppResult<()> {
//! let store = InMemoryPlanStore::new();
//! match store.save_plan(plan).await? {
//!     SaveOutcome::Inserted => {}
//!     SaveOutcome::AlreadyExists(existing) => println!("kept {}", existing.key()),
//! }
//! # Ok(())
//! # }
//! ```

/// In-memory plan store
pub mod memory;

pub use memory::InMemoryPlanStore;

use evo_core::errors::AppResult;
use evo_core::models::{Plan, PlanKey};

/// Result of a conditional save
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The plan was stored
    Inserted,
    /// Another plan already occupied the key; it is returned unchanged
    AlreadyExists(Plan),
}

/// Persistence for generated plans
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    /// Plan stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached
    async fn get_existing_plan(&self, key: &PlanKey) -> AppResult<Option<Plan>>;

    /// Store `plan` unless its key is already taken
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached
    async fn save_plan(&self, plan: Plan) -> AppResult<SaveOutcome>;

    /// Check store health
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unhealthy
    async fn health_check(&self) -> AppResult<()>;
}
