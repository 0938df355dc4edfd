// ABOUTME: In-memory plan store backed by a tokio RwLock over a HashMap
// ABOUTME: Saves are insert-if-absent and counted so callers can assert single writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use evo_core::errors::AppResult;
use evo_core::models::{Plan, PlanKey};
use tokio::sync::RwLock;
use tracing::debug;

use super::{PlanStore, SaveOutcome};

/// Process-local plan store
///
/// Clones share the same map, so a store handed to the orchestrator can still be
/// inspected by the caller.
#[derive(Clone, Default)]
pub struct InMemoryPlanStore {
    plans: Arc<RwLock<HashMap<PlanKey, Plan>>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryPlanStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of plans actually inserted
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of stored plans
    pub async fn len(&self) -> usize {
        self.plans.read().await.len()
    }

    /// Whether the store holds no plans
    pub async fn is_empty(&self) -> bool {
        self.plans.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn get_existing_plan(&self, key: &PlanKey) -> AppResult<Option<Plan>> {
        Ok(self.plans.read().await.get(key).cloned())
    }

    async fn save_plan(&self, plan: Plan) -> AppResult<SaveOutcome> {
        let key = plan.key();
        let mut plans = self.plans.write().await;
        match plans.entry(key) {
            Entry::Occupied(existing) => {
                debug!(key = %existing.key(), "Plan already stored, keeping existing");
                Ok(SaveOutcome::AlreadyExists(existing.get().clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(plan);
                self.writes.fetch_add(1, Ordering::Relaxed);
                Ok(SaveOutcome::Inserted)
            }
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
