// ABOUTME: Plan generation data model: preferences, catalog candidates, workout and diet plans
// ABOUTME: Re-exports every model type so callers can use evo_core::models::* directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! All entities are created fresh per generation call. A [`WorkoutPlan`] or [`DietPlan`]
//! is persisted at most once per [`PlanKey`] and is immutable afterwards.

/// Exercise and food catalog entries
pub mod catalog;
/// Diet plans, meals and nutritional targets
pub mod diet;
/// Plan keys and the kind-tagged plan envelope
pub mod plan;
/// Per-request algorithm configuration and user preferences
pub mod preferences;
/// Workout plans, sessions, exercises and warmups
pub mod workout;

pub use catalog::{ExerciseCandidate, FoodCandidate, FoodCategory, MovementPattern};
pub use diet::{DietPlan, FoodItem, Meal, MealType, NutritionalTarget};
pub use plan::{Plan, PlanKey, PlanKind};
pub use preferences::{
    ActivityLevel, AlgorithmConfig, BodyMetrics, CookingTimePreference, CostLevel, DayOfWeek,
    DietPreferences, ExperienceLevel, Gender, Goal, IntensityPreference, TrainingLocation,
    WorkoutPreferences,
};
pub use workout::{
    BodyRegion, Exercise, Reps, SessionFocus, SplitType, UnfilledSlot, Warmup, WarmupExercise,
    WorkoutPlan, WorkoutSession,
};
