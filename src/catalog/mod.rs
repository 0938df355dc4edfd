// ABOUTME: Content catalog capability interface for exercises and foods
// ABOUTME: Pluggable backends (static in-memory, no-op) behind an async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Static in-memory catalog with built-in content
pub mod memory;

pub use memory::StaticCatalog;

use evo_core::errors::AppResult;
use evo_core::models::{ExerciseCandidate, FoodCandidate, FoodCategory, TrainingLocation};

/// Coarse exercise query sent to the catalog
///
/// The catalog may return a superset; the candidate pool applies every hard
/// constraint itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseQuery {
    /// Muscle group the exercise must train (primary or secondary)
    pub muscle_group: Option<String>,
    /// Location the exercise must support
    pub location: Option<TrainingLocation>,
}

impl ExerciseQuery {
    /// Query for exercises training `muscle_group`
    pub fn for_muscle(muscle_group: impl Into<String>) -> Self {
        Self {
            muscle_group: Some(muscle_group.into()),
            location: None,
        }
    }

    /// Restrict to a training location
    #[must_use]
    pub const fn at(mut self, location: TrainingLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// Coarse food query sent to the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoodQuery {
    /// Food group, `None` for every food
    pub category: Option<FoodCategory>,
}

/// Queryable source of exercise and food candidates
#[async_trait::async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Exercises matching the query, in catalog order
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` if the catalog cannot be reached
    async fn search_exercises(&self, query: &ExerciseQuery) -> AppResult<Vec<ExerciseCandidate>>;

    /// Foods matching the query, in catalog order
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` if the catalog cannot be reached
    async fn search_foods(&self, query: &FoodQuery) -> AppResult<Vec<FoodCandidate>>;

    /// Check that the catalog is reachable
    ///
    /// # Errors
    ///
    /// Returns an error describing why the catalog is unavailable
    async fn health_check(&self) -> AppResult<()>;

    /// Backend name for logs and health reports
    fn name(&self) -> &'static str;
}

/// Catalog that never returns candidates
///
/// For environments without a content service. Generators built on it produce
/// workout sessions whose slots are all unfilled and diet plans with empty meals,
/// each annotated with the reason, instead of fabricated content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCatalog;

#[async_trait::async_trait]
impl ContentCatalog for NoopCatalog {
    async fn search_exercises(&self, _query: &ExerciseQuery) -> AppResult<Vec<ExerciseCandidate>> {
        Ok(Vec::new())
    }

    async fn search_foods(&self, _query: &FoodQuery) -> AppResult<Vec<FoodCandidate>> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
