// ABOUTME: Plan generators turning an algorithm configuration into workout and diet plans
// ABOUTME: Generators read the catalog through the candidate pool and never touch the plan store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Diet plan generator
pub mod diet;
/// Warmup library
pub mod warmup;
/// Workout plan generator
pub mod workout;

pub use diet::DietPlanGenerator;
pub use workout::WorkoutPlanGenerator;

use std::collections::HashSet;

/// Per-user signals from the profile that refine generation without constraining it
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Exercise ids performed recently, ranked lower for variety
    pub recent_exercise_ids: HashSet<String>,
    /// Body weight used for the water recommendation
    pub body_weight_kg: Option<f64>,
}
