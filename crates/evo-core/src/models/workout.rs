// ABOUTME: Workout plan models: split types, session focus, exercises, warmups, unfilled slots
// ABOUTME: A rest-day plan has no sessions and zero duration, enforced by its constructor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::notes;
use crate::models::preferences::Goal;

/// Weekly training structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    /// Every session trains the whole body
    FullBody,
    /// Alternating upper and lower body sessions
    UpperLower,
    /// Rotating push, pull and legs sessions
    PushPullLegs,
}

impl SplitType {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullBody => "FULL_BODY",
            Self::UpperLower => "UPPER_LOWER",
            Self::PushPullLegs => "PUSH_PULL_LEGS",
        }
    }

    /// Session focus for the `day_index`-th training day of the week
    #[must_use]
    pub const fn session_for_day(&self, day_index: usize) -> SessionFocus {
        match self {
            Self::FullBody => SessionFocus::FullBody,
            Self::UpperLower => {
                if day_index % 2 == 0 {
                    SessionFocus::Upper
                } else {
                    SessionFocus::Lower
                }
            }
            Self::PushPullLegs => match day_index % 3 {
                0 => SessionFocus::Push,
                1 => SessionFocus::Pull,
                _ => SessionFocus::Legs,
            },
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single session trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFocus {
    /// Whole body
    FullBody,
    /// Chest, back, shoulders, arms
    Upper,
    /// Legs and core
    Lower,
    /// Chest, shoulders, triceps
    Push,
    /// Back, biceps
    Pull,
    /// Quadriceps, hamstrings, glutes, calves
    Legs,
}

impl SessionFocus {
    /// Localized session label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullBody => "Full Body",
            Self::Upper => "Upper Body",
            Self::Lower => "Lower Body",
            Self::Push => "Push (Empurrar)",
            Self::Pull => "Pull (Puxar)",
            Self::Legs => "Legs (Pernas)",
        }
    }

    /// Session name for the `day_index`-th training day
    ///
    /// Full-body days are numbered since every day shares the same label.
    #[must_use]
    pub fn session_name(&self, day_index: usize) -> String {
        match self {
            Self::FullBody => format!("{} {}", self.label(), day_index + 1),
            _ => self.label().to_owned(),
        }
    }

    /// Body region the warmup should prepare
    #[must_use]
    pub const fn body_region(&self) -> BodyRegion {
        match self {
            Self::Upper | Self::Push | Self::Pull => BodyRegion::UpperBody,
            Self::Lower | Self::Legs => BodyRegion::LowerBody,
            Self::FullBody => BodyRegion::FullBody,
        }
    }
}

/// Body region targeted by a warmup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    /// Shoulders, chest, back, arms
    UpperBody,
    /// Hips, knees, ankles
    LowerBody,
    /// Everything
    FullBody,
}

impl BodyRegion {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UpperBody => "upper_body",
            Self::LowerBody => "lower_body",
            Self::FullBody => "full_body",
        }
    }
}

/// Repetitions prescribed per set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    /// Fixed count
    Count(u32),
    /// Inclusive range
    Range {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
}

impl Reps {
    /// Mean repetitions per set, used for duration estimates
    #[must_use]
    pub fn average(&self) -> f64 {
        match *self {
            Self::Count(n) => f64::from(n),
            Self::Range { min, max } => f64::from(min + max) / 2.0,
        }
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

/// A prescribed exercise inside a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Catalog identifier
    pub exercise_id: String,
    /// Display name
    pub name: String,
    /// Primary and secondary muscle groups
    pub muscle_groups: BTreeSet<String>,
    /// Working sets
    pub sets: u32,
    /// Repetitions per set
    pub reps: Reps,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Equipment required
    pub equipment: Vec<String>,
    /// Coaching notes
    #[serde(default)]
    pub notes: Vec<String>,
}

/// A single warmup drill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupExercise {
    /// Drill name
    pub name: String,
    /// Duration of the drill
    pub duration_seconds: u32,
    /// How to perform it
    pub instructions: String,
}

/// Warmup preceding a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warmup {
    /// Region prepared by the drills
    pub body_region: BodyRegion,
    /// Total duration, rounded up to whole minutes
    pub duration_minutes: u32,
    /// Drills in order
    pub exercises: Vec<WarmupExercise>,
}

/// A session slot that no eligible exercise could fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    /// Muscle group the slot targeted
    pub muscle_group: String,
    /// Which constraints emptied the candidate list
    pub reason: String,
}

/// One training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Display name (e.g. "Push (Empurrar)", "Upper Body", "Full Body 2")
    pub name: String,
    /// What the session trains
    pub focus: SessionFocus,
    /// Warmup before the working sets
    pub warmup: Warmup,
    /// Exercises in execution order
    pub exercises: Vec<Exercise>,
    /// Slots left empty after constraint relaxation
    #[serde(default)]
    pub unfilled_slots: Vec<UnfilledSlot>,
    /// Warmup plus working time
    pub estimated_duration_minutes: u32,
}

/// A day's workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Owner
    pub user_id: String,
    /// Day the plan applies to
    pub date: NaiveDate,
    /// Goal the plan was built for
    pub goal: Goal,
    /// Weekly structure the session belongs to, absent on rest days
    pub split_type: Option<SplitType>,
    /// Sessions in order
    pub sessions: Vec<WorkoutSession>,
    /// Sum of session durations
    pub total_estimated_duration_minutes: u32,
    /// Whether the day is a rest day
    pub rest_day: bool,
    /// Guidance and diagnostic notes
    #[serde(default)]
    pub notes: Vec<String>,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Rest-day plan: no sessions, zero duration
    #[must_use]
    pub fn rest_day(user_id: impl Into<String>, date: NaiveDate, goal: Goal) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            goal,
            split_type: None,
            sessions: Vec::new(),
            total_estimated_duration_minutes: 0,
            rest_day: true,
            notes: vec![notes::REST_DAY.to_owned()],
            generated_at: Utc::now(),
        }
    }

    /// Training-day plan; the total duration is the sum of session durations
    #[must_use]
    pub fn training_day(
        user_id: impl Into<String>,
        date: NaiveDate,
        goal: Goal,
        split_type: SplitType,
        sessions: Vec<WorkoutSession>,
        notes: Vec<String>,
    ) -> Self {
        let total = sessions.iter().map(|s| s.estimated_duration_minutes).sum();
        Self {
            user_id: user_id.into(),
            date,
            goal,
            split_type: Some(split_type),
            sessions,
            total_estimated_duration_minutes: total,
            rest_day: false,
            notes,
            generated_at: Utc::now(),
        }
    }

    /// `rest_day` holds exactly when there are no sessions and no duration
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.rest_day == self.sessions.is_empty()
            && self.sessions.is_empty() == (self.total_estimated_duration_minutes == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pull_legs_rotation() {
        let split = SplitType::PushPullLegs;
        assert_eq!(split.session_for_day(0), SessionFocus::Push);
        assert_eq!(split.session_for_day(1), SessionFocus::Pull);
        assert_eq!(split.session_for_day(2), SessionFocus::Legs);
        assert_eq!(split.session_for_day(3), SessionFocus::Push);
    }

    #[test]
    fn test_session_names() {
        assert_eq!(SessionFocus::Push.session_name(0), "Push (Empurrar)");
        assert_eq!(SessionFocus::Lower.session_name(1), "Lower Body");
        assert_eq!(SessionFocus::FullBody.session_name(1), "Full Body 2");
    }

    #[test]
    fn test_rest_day_is_consistent() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let plan = WorkoutPlan::rest_day("u", date, Goal::Maintain);
        assert!(plan.rest_day);
        assert!(plan.is_consistent());
        assert!(plan.notes[0].starts_with("Dia de descanso"));
    }

    #[test]
    fn test_reps_serialize_as_count_or_range() {
        let range = serde_json::to_value(Reps::Range { min: 8, max: 12 }).unwrap();
        assert_eq!(range, serde_json::json!({ "min": 8, "max": 12 }));
        assert_eq!(serde_json::to_value(Reps::Count(10)).unwrap(), 10);
        assert!((Reps::Range { min: 8, max: 12 }.average() - 10.0).abs() < f64::EPSILON);
    }
}
