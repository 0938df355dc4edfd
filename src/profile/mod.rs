// ABOUTME: User profile provider capability and a static JSON-backed implementation
// ABOUTME: Resolves stored preferences, body metrics and history into an algorithm configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Profile Provider
//!
//! The orchestrator never reads user settings directly. It asks a [`ProfileProvider`]
//! for the user's [`UserData`] and turns it into an [`AlgorithmConfig`], deriving the
//! numeric targets from body metrics when the profile does not store them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use evo_core::errors::{AppError, AppResult, ErrorCode};
use evo_core::models::{
    AlgorithmConfig, BodyMetrics, DietPreferences, ExperienceLevel, Goal, NutritionalTarget,
    WorkoutPreferences,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::generators::GenerationContext;
use crate::targets::derive_daily_targets;

/// Training history kept with the profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Exercises performed in recent sessions
    #[serde(default)]
    pub recent_exercise_ids: Vec<String>,
}

/// Everything the engine needs to know about a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    /// User identifier
    pub user_id: String,
    /// Training and nutrition goal
    pub goal: Goal,
    /// Training experience
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Explicit daily targets, when the user or a coach set them
    #[serde(default)]
    pub targets: Option<NutritionalTarget>,
    /// Body metrics used to derive targets
    #[serde(default)]
    pub body_metrics: Option<BodyMetrics>,
    /// Workout preferences
    #[serde(default)]
    pub workout_preferences: WorkoutPreferences,
    /// Diet preferences
    #[serde(default)]
    pub diet_preferences: DietPreferences,
    /// Training history
    #[serde(default)]
    pub history: TrainingHistory,
}

impl UserData {
    /// Daily targets: explicit ones first, otherwise derived from body metrics
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when neither targets nor body metrics are stored,
    /// or a range error when the body metrics are implausible
    pub fn daily_targets(&self) -> AppResult<NutritionalTarget> {
        if let Some(targets) = self.targets {
            return Ok(targets);
        }
        let Some(metrics) = &self.body_metrics else {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "Profile has neither nutritional targets nor body metrics",
            )
            .with_user_id(self.user_id.clone())
            .with_details(json!({ "fields": ["targets", "body_metrics"] })));
        };
        let derived = derive_daily_targets(metrics, self.goal)
            .map_err(|e| e.with_user_id(self.user_id.clone()))?;
        debug!(
            user_id = %self.user_id,
            calories = derived.calories,
            protein = derived.protein,
            "Derived daily targets from body metrics"
        );
        Ok(derived)
    }

    /// Algorithm configuration for this user
    ///
    /// # Errors
    ///
    /// Propagates target resolution errors
    pub fn algorithm_config(&self) -> AppResult<AlgorithmConfig> {
        let targets = self.daily_targets()?;
        Ok(AlgorithmConfig {
            user_id: self.user_id.clone(),
            goal: self.goal,
            experience_level: self.experience_level,
            target_calories: targets.calories,
            target_protein: targets.protein,
            target_carbs: targets.carbs,
            target_fat: targets.fat,
            workout_preferences: self.workout_preferences.clone(),
            diet_preferences: self.diet_preferences.clone(),
        })
    }

    /// Soft generation signals taken from the profile
    #[must_use]
    pub fn generation_context(&self) -> GenerationContext {
        GenerationContext {
            recent_exercise_ids: self.history.recent_exercise_ids.iter().cloned().collect(),
            body_weight_kg: self.body_metrics.map(|m| m.weight_kg),
        }
    }
}

/// Source of user profiles
#[async_trait::async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Profile of `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown users, or an error if the provider is unreachable
    async fn get_user_data(&self, user_id: &str) -> AppResult<UserData>;

    /// Check provider health
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unhealthy
    async fn health_check(&self) -> AppResult<()>;
}

/// Provider over a fixed set of profiles
#[derive(Debug, Clone, Default)]
pub struct StaticProfileProvider {
    users: Arc<HashMap<String, UserData>>,
}

impl StaticProfileProvider {
    /// Provider serving `users`
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = UserData>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.user_id.clone(), user))
            .collect();
        Self {
            users: Arc::new(users),
        }
    }

    /// Parse a JSON array of profiles
    ///
    /// # Errors
    ///
    /// Returns a `SerializationError` if the document is malformed
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let users: Vec<UserData> = serde_json::from_str(json)?;
        Ok(Self::new(users))
    }

    /// Read and parse a JSON file holding an array of profiles
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read, or a
    /// `SerializationError` if it is malformed
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::config(format!("Cannot read profiles file {}", path.display()))
                .with_source(e)
        })?;
        Self::from_json_str(&contents)
    }

    /// Number of profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no profile is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl ProfileProvider for StaticProfileProvider {
    async fn get_user_data(&self, user_id: &str) -> AppResult<UserData> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User profile {user_id}")).with_user_id(user_id))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
