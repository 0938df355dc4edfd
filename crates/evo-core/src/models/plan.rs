// ABOUTME: Plan identity and envelope shared by the plan store and the orchestrator
// ABOUTME: PlanKey is (user, date, kind); Plan is a kind-tagged union of workout and diet plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::diet::DietPlan;
use crate::models::workout::WorkoutPlan;

/// Kind of plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Training plan
    Workout,
    /// Nutrition plan
    Diet,
}

impl PlanKind {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Diet => "diet",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a persisted plan; at most one plan exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanKey {
    /// Owner
    pub user_id: String,
    /// Day
    pub date: NaiveDate,
    /// Kind
    pub kind: PlanKind,
}

impl PlanKey {
    /// Build a key
    #[must_use]
    pub fn new(user_id: impl Into<String>, date: NaiveDate, kind: PlanKind) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            kind,
        }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.user_id, self.date, self.kind)
    }
}

/// A persisted plan of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plan {
    /// Workout plan
    Workout(WorkoutPlan),
    /// Diet plan
    Diet(DietPlan),
}

impl Plan {
    /// Kind of the wrapped plan
    #[must_use]
    pub const fn kind(&self) -> PlanKind {
        match self {
            Self::Workout(_) => PlanKind::Workout,
            Self::Diet(_) => PlanKind::Diet,
        }
    }

    /// Store key of the wrapped plan
    #[must_use]
    pub fn key(&self) -> PlanKey {
        match self {
            Self::Workout(plan) => PlanKey::new(plan.user_id.clone(), plan.date, PlanKind::Workout),
            Self::Diet(plan) => PlanKey::new(plan.user_id.clone(), plan.date, PlanKind::Diet),
        }
    }

    /// Unwrap a workout plan
    #[must_use]
    pub fn into_workout(self) -> Option<WorkoutPlan> {
        match self {
            Self::Workout(plan) => Some(plan),
            Self::Diet(_) => None,
        }
    }

    /// Unwrap a diet plan
    #[must_use]
    pub fn into_diet(self) -> Option<DietPlan> {
        match self {
            Self::Diet(plan) => Some(plan),
            Self::Workout(_) => None,
        }
    }
}

impl From<WorkoutPlan> for Plan {
    fn from(plan: WorkoutPlan) -> Self {
        Self::Workout(plan)
    }
}

impl From<DietPlan> for Plan {
    fn from(plan: DietPlan) -> Self {
        Self::Diet(plan)
    }
}
