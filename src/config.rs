// ABOUTME: Engine tuning configuration: tolerance bands, portion limits, ranking weights, seed
// ABOUTME: Loaded from defaults, overridden by EVO_* environment variables, then validated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration Module
//!
//! Every numeric knob of the generators lives here so that tolerance bands and ranking
//! weights can be changed without touching the algorithms.
//!
//! # Configuration Methods
//!
//! 1. Environment variables (highest priority):
//!    ```bash
//!    export EVO_DIET_MEAL_TOLERANCE=0.25
//!    export EVO_SELECTION_SEED=42
//!    ```
//!
//! 2. Default values (if env vars not set)

use std::env;
use std::str::FromStr;

use evo_core::errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Lower bound not below upper bound
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment value could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Weight group does not sum to 1.0
    #[error("Invalid weights: {0}")]
    InvalidWeights(&'static str),

    /// Scalar outside its permitted interval
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}

/// Diet generator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietTuning {
    /// Accepted relative deviation of a meal's calories from its target
    pub meal_tolerance: f64,
    /// Accepted relative deviation of the day's calories from the daily target
    pub daily_tolerance: f64,
    /// Most foods placed in a single meal
    pub max_foods_per_meal: usize,
    /// Smallest portion served
    pub min_portion_grams: f64,
    /// Largest portion served
    pub max_portion_grams: f64,
    /// Portions are rounded to multiples of this
    pub portion_step_grams: f64,
    /// Water per kilogram of body weight
    pub water_ml_per_kg: f64,
    /// Water per kcal when body weight is unknown
    pub water_ml_per_kcal: f64,
    /// Lower water clamp
    pub min_water_ml: u32,
    /// Upper water clamp
    pub max_water_ml: u32,
}

impl Default for DietTuning {
    fn default() -> Self {
        Self {
            meal_tolerance: 0.20,
            daily_tolerance: 0.15,
            max_foods_per_meal: 4,
            min_portion_grams: 20.0,
            max_portion_grams: 300.0,
            portion_step_grams: 5.0,
            water_ml_per_kg: 35.0,
            water_ml_per_kcal: 1.0,
            min_water_ml: 1500,
            max_water_ml: 5000,
        }
    }
}

/// Workout generator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTuning {
    /// Time under tension per repetition
    pub seconds_per_rep: f64,
    /// Sessions are never trimmed below this many exercises
    pub min_exercises_per_session: usize,
    /// Rest shift applied for low/high intensity preference
    pub intensity_rest_adjustment_seconds: u32,
}

impl Default for WorkoutTuning {
    fn default() -> Self {
        Self {
            seconds_per_rep: 3.0,
            min_exercises_per_session: 3,
            intensity_rest_adjustment_seconds: 15,
        }
    }
}

/// Soft ranking weights of the candidate pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingWeights {
    /// Exercise effectiveness rating weight
    pub effectiveness: f64,
    /// Exercise safety rating weight
    pub safety: f64,
    /// Exercise time-efficiency weight
    pub time_efficiency: f64,
    /// Food preference score weight
    pub preference: f64,
    /// Food availability score weight
    pub availability: f64,
    /// Added when a candidate matches the user's preferred list
    pub preferred_boost: f64,
    /// Added when the queried muscle group is a primary mover
    pub primary_muscle_bonus: f64,
    /// Subtracted for exercises performed recently
    pub recent_exercise_penalty: f64,
    /// Subtracted per earlier use of a food on the same day
    pub repeat_food_penalty: f64,
    /// Subtracted when a food is not customarily eaten at the meal being built
    pub meal_mismatch_penalty: f64,
    /// Subtracted when a food exceeds the cooking-time or budget preference
    pub soft_mismatch_penalty: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            effectiveness: 0.5,
            safety: 0.3,
            time_efficiency: 0.2,
            preference: 0.7,
            availability: 0.3,
            preferred_boost: 0.3,
            primary_muscle_bonus: 0.2,
            recent_exercise_penalty: 0.1,
            repeat_food_penalty: 0.1,
            meal_mismatch_penalty: 0.5,
            soft_mismatch_penalty: 0.2,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Diet generator tuning
    pub diet: DietTuning,
    /// Workout generator tuning
    pub workout: WorkoutTuning,
    /// Candidate ranking weights
    pub ranking: RankingWeights,
    /// Fixed seed for tie-breaking; `None` draws from entropy
    pub selection_seed: Option<u64>,
}

const WEIGHT_SUM_EPSILON: f64 = 0.01;

impl EngineConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or the result fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Same configuration with a fixed tie-breaking seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.selection_seed = Some(seed);
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diet = &self.diet;
        for tolerance in [diet.meal_tolerance, diet.daily_tolerance] {
            if !(tolerance > 0.0 && tolerance < 1.0) {
                return Err(ConfigError::ValueOutOfRange(
                    "Tolerances must lie strictly between 0 and 1",
                ));
            }
        }
        if diet.min_portion_grams <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_portion_grams must be positive",
            ));
        }
        if diet.min_portion_grams >= diet.max_portion_grams {
            return Err(ConfigError::InvalidRange(
                "min_portion_grams must be < max_portion_grams",
            ));
        }
        if diet.portion_step_grams <= 0.0 || diet.portion_step_grams > diet.min_portion_grams {
            return Err(ConfigError::ValueOutOfRange(
                "portion_step_grams must be positive and <= min_portion_grams",
            ));
        }
        if diet.max_foods_per_meal == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_foods_per_meal must be at least 1",
            ));
        }
        if diet.min_water_ml >= diet.max_water_ml {
            return Err(ConfigError::InvalidRange(
                "min_water_ml must be < max_water_ml",
            ));
        }

        if self.workout.seconds_per_rep <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "seconds_per_rep must be positive",
            ));
        }
        if self.workout.min_exercises_per_session == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_exercises_per_session must be at least 1",
            ));
        }

        let ranking = &self.ranking;
        let exercise_sum = ranking.effectiveness + ranking.safety + ranking.time_efficiency;
        if (exercise_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::InvalidWeights(
                "Exercise ranking weights must sum to 1.0",
            ));
        }
        let food_sum = ranking.preference + ranking.availability;
        if (food_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::InvalidWeights(
                "Food ranking weights must sum to 1.0",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var("EVO_DIET_MEAL_TOLERANCE", &mut self.diet.meal_tolerance)?;
        Self::apply_env_var("EVO_DIET_DAILY_TOLERANCE", &mut self.diet.daily_tolerance)?;
        Self::apply_env_var(
            "EVO_DIET_MAX_FOODS_PER_MEAL",
            &mut self.diet.max_foods_per_meal,
        )?;
        Self::apply_env_var(
            "EVO_DIET_MIN_PORTION_GRAMS",
            &mut self.diet.min_portion_grams,
        )?;
        Self::apply_env_var(
            "EVO_DIET_MAX_PORTION_GRAMS",
            &mut self.diet.max_portion_grams,
        )?;

        Self::apply_env_var(
            "EVO_WORKOUT_SECONDS_PER_REP",
            &mut self.workout.seconds_per_rep,
        )?;
        Self::apply_env_var(
            "EVO_WORKOUT_MIN_EXERCISES",
            &mut self.workout.min_exercises_per_session,
        )?;

        if let Ok(val) = env::var("EVO_SELECTION_SEED") {
            let seed = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid EVO_SELECTION_SEED".to_owned()))?;
            self.selection_seed = Some(seed);
        }

        Ok(self)
    }
}
