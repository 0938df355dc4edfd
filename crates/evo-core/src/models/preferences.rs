// ABOUTME: Algorithm configuration and user preference models driving plan generation
// ABOUTME: Goals, experience levels, weekdays, workout/diet preferences and body metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::diet::NutritionalTarget;

/// Training and nutrition goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Caloric deficit
    LoseWeight,
    /// Caloric surplus with high protein
    GainMuscle,
    /// Caloric balance
    Maintain,
}

impl Goal {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::GainMuscle => "gain_muscle",
            Self::Maintain => "maintain",
        }
    }
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" => Ok(Self::LoseWeight),
            "gain_muscle" => Ok(Self::GainMuscle),
            "maintain" => Ok(Self::Maintain),
            other => Err(AppError::invalid_input(format!("Unknown goal: {other}"))),
        }
    }
}

/// Training experience, also used as the difficulty scale of exercises
///
/// Ordered so that a candidate is admissible when `difficulty <= experience`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Less than six months of consistent training
    #[default]
    Beginner,
    /// Six months to two years
    Intermediate,
    /// More than two years
    Advanced,
}

impl ExperienceLevel {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::invalid_input(format!(
                "Unknown experience level: {other}"
            ))),
        }
    }
}

/// Day of the week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday to Sunday
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the user trains
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLocation {
    /// Commercial or home gym with machines and free weights
    #[default]
    Gym,
    /// Home without a full gym
    Home,
    /// Parks, tracks, outdoor calisthenics
    Outdoor,
}

impl TrainingLocation {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gym => "gym",
            Self::Home => "home",
            Self::Outdoor => "outdoor",
        }
    }
}

/// Preferred training intensity, shifts rest periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityPreference {
    /// Longer rests
    Low,
    /// Default rests
    #[default]
    Moderate,
    /// Shorter rests
    High,
}

/// Relative cost of a food, also the user's budget ceiling
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CostLevel {
    /// Staples
    Low,
    /// Typical grocery prices
    #[default]
    Medium,
    /// Premium items
    High,
}

/// How much time the user is willing to spend cooking a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingTimePreference {
    /// Up to 15 minutes
    Quick,
    /// Up to 45 minutes
    #[default]
    Moderate,
    /// No limit
    Elaborate,
}

impl CookingTimePreference {
    /// Longest acceptable preparation time, `None` when unlimited
    #[must_use]
    pub const fn max_minutes(&self) -> Option<u32> {
        match self {
            Self::Quick => Some(15),
            Self::Moderate => Some(45),
            Self::Elaborate => None,
        }
    }
}

/// Biological sex used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

/// Daily activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    #[default]
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Hard daily exercise plus physical job
    ExtraActive,
}

impl ActivityLevel {
    /// TDEE multiplier applied to BMR
    #[must_use]
    pub const fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtraActive => 1.9,
        }
    }
}

/// Body measurements used when explicit numeric targets are missing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age: u32,
    /// Biological sex
    pub gender: Gender,
    /// Daily activity level
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

const fn default_session_minutes() -> u32 {
    60
}

/// Workout-side preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPreferences {
    /// Days the user can train
    #[serde(default)]
    pub available_days: BTreeSet<DayOfWeek>,
    /// Target session length including warmup
    #[serde(default = "default_session_minutes")]
    pub session_duration_minutes: u32,
    /// Equipment at hand; empty means "not specified" and disables the equipment filter
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Training location
    #[serde(default)]
    pub location: TrainingLocation,
    /// Intensity preference
    #[serde(default)]
    pub intensity: IntensityPreference,
    /// Exercises to rank higher
    #[serde(default)]
    pub preferred_exercises: Vec<String>,
    /// Exercises never to include
    #[serde(default)]
    pub disliked_exercises: Vec<String>,
}

impl Default for WorkoutPreferences {
    fn default() -> Self {
        Self {
            available_days: BTreeSet::new(),
            session_duration_minutes: default_session_minutes(),
            equipment: Vec::new(),
            location: TrainingLocation::default(),
            intensity: IntensityPreference::default(),
            preferred_exercises: Vec::new(),
            disliked_exercises: Vec::new(),
        }
    }
}

impl WorkoutPreferences {
    /// Position of `day` among the available days ordered Monday to Sunday
    #[must_use]
    pub fn day_index(&self, day: DayOfWeek) -> Option<usize> {
        self.available_days.iter().position(|d| *d == day)
    }
}

/// Diet-side preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietPreferences {
    /// Allergens that must never appear
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Active restrictions such as `vegetarian` or `gluten_free`
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Foods never to include
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    /// Foods or categories to rank higher
    #[serde(default)]
    pub preferred_foods: Vec<String>,
    /// Cooking time budget
    #[serde(default)]
    pub cooking_time_preference: CookingTimePreference,
    /// Budget ceiling
    #[serde(default)]
    pub budget_level: CostLevel,
}

/// Per-request input to the generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    /// User the plan is generated for
    pub user_id: String,
    /// Training and nutrition goal
    pub goal: Goal,
    /// Training experience
    pub experience_level: ExperienceLevel,
    /// Daily calories (kcal)
    pub target_calories: f64,
    /// Daily protein (g)
    pub target_protein: f64,
    /// Daily carbohydrates (g)
    pub target_carbs: f64,
    /// Daily fat (g)
    pub target_fat: f64,
    /// Workout preferences
    #[serde(default)]
    pub workout_preferences: WorkoutPreferences,
    /// Diet preferences
    #[serde(default)]
    pub diet_preferences: DietPreferences,
}

impl AlgorithmConfig {
    /// Reject non-positive or non-finite numeric targets
    ///
    /// # Errors
    ///
    /// Returns a `ValueOutOfRange` error naming every offending field
    pub fn validate(&self) -> AppResult<()> {
        let invalid: Vec<&str> = [
            ("target_calories", self.target_calories),
            ("target_protein", self.target_protein),
            ("target_carbs", self.target_carbs),
            ("target_fat", self.target_fat),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_finite() || *value <= 0.0)
        .map(|(name, _)| name)
        .collect();

        if self.user_id.trim().is_empty() {
            return Err(AppError::missing_field("user_id"));
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!("Numeric targets must be positive: {}", invalid.join(", ")),
            )
            .with_user_id(self.user_id.clone())
            .with_details(json!({ "fields": invalid })))
        }
    }

    /// Daily targets as a single nutritional target
    #[must_use]
    pub const fn daily_target(&self) -> NutritionalTarget {
        NutritionalTarget {
            calories: self.target_calories,
            protein: self.target_protein,
            carbs: self.target_carbs,
            fat: self.target_fat,
        }
    }
}
