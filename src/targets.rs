// ABOUTME: Target calculator: per-meal target split, training split policy, daily target derivation
// ABOUTME: Pure functions over configuration values, no I/O and no randomness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Target Calculator
//!
//! Splits a daily nutritional target into per-meal targets, selects the weekly
//! training split, and derives daily targets from body metrics when a user has
//! no explicit targets.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use std::collections::BTreeMap;

use evo_core::constants::energy::{CARBS_KCAL_PER_G, FAT_KCAL_PER_G, PROTEIN_KCAL_PER_G};
use evo_core::errors::{AppError, AppResult};
use evo_core::models::{
    AlgorithmConfig, BodyMetrics, ExperienceLevel, Gender, Goal, MealType, NutritionalTarget,
    SplitType,
};

use crate::config::DietTuning;

/// Calorie floor applied after goal adjustment
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

/// Share of the daily target per meal, in daily order; each row sums to 1.0
#[must_use]
pub const fn meal_distribution(goal: Goal) -> [(MealType, f64); 4] {
    match goal {
        Goal::LoseWeight => [
            (MealType::Breakfast, 0.25),
            (MealType::Lunch, 0.40),
            (MealType::Snack, 0.10),
            (MealType::Dinner, 0.25),
        ],
        Goal::GainMuscle => [
            (MealType::Breakfast, 0.25),
            (MealType::Lunch, 0.30),
            (MealType::Snack, 0.10),
            (MealType::Dinner, 0.35),
        ],
        Goal::Maintain => [
            (MealType::Breakfast, 0.25),
            (MealType::Lunch, 0.35),
            (MealType::Snack, 0.10),
            (MealType::Dinner, 0.30),
        ],
    }
}

/// Partition the daily target into per-meal targets
#[must_use]
pub fn split_meal_targets(config: &AlgorithmConfig) -> BTreeMap<MealType, NutritionalTarget> {
    let daily = config.daily_target();
    meal_distribution(config.goal)
        .into_iter()
        .map(|(meal_type, share)| (meal_type, daily.scale(share)))
        .collect()
}

/// Weekly split policy
///
/// | available days      | split           |
/// |---------------------|-----------------|
/// | 0-2                 | full body       |
/// | multiple of 3       | push/pull/legs  |
/// | 7, advanced         | push/pull/legs  |
/// | anything else       | upper/lower     |
#[must_use]
pub const fn select_split_type(available_days: usize, experience: ExperienceLevel) -> SplitType {
    match (available_days, experience) {
        (0..=2, _) => SplitType::FullBody,
        (n, _) if n % 3 == 0 => SplitType::PushPullLegs,
        (7, ExperienceLevel::Advanced) => SplitType::PushPullLegs,
        _ => SplitType::UpperLower,
    }
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day
#[must_use]
pub fn calculate_bmr(metrics: &BodyMetrics) -> f64 {
    let base = 6.25f64.mul_add(
        metrics.height_cm,
        10.0f64.mul_add(metrics.weight_kg, -5.0 * f64::from(metrics.age)),
    );
    match metrics.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure, kcal/day
#[must_use]
pub fn calculate_tdee(metrics: &BodyMetrics) -> f64 {
    calculate_bmr(metrics) * metrics.activity_level.factor()
}

const fn goal_calorie_adjustment(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => -500.0,
        Goal::GainMuscle => 300.0,
        Goal::Maintain => 0.0,
    }
}

const fn protein_g_per_kg(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => 2.2,
        Goal::GainMuscle => 2.0,
        Goal::Maintain => 1.8,
    }
}

const fn fat_calorie_share(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight | Goal::GainMuscle => 0.25,
        Goal::Maintain => 0.30,
    }
}

fn validate_metrics(metrics: &BodyMetrics) -> AppResult<()> {
    if !(20.0..=300.0).contains(&metrics.weight_kg) {
        return Err(AppError::out_of_range(
            "weight_kg",
            format!("Weight must be between 20 and 300 kg, got {}", metrics.weight_kg),
        ));
    }
    if !(100.0..=250.0).contains(&metrics.height_cm) {
        return Err(AppError::out_of_range(
            "height_cm",
            format!("Height must be between 100 and 250 cm, got {}", metrics.height_cm),
        ));
    }
    if !(10..=100).contains(&metrics.age) {
        return Err(AppError::out_of_range(
            "age",
            format!("Age must be between 10 and 100 years, got {}", metrics.age),
        ));
    }
    Ok(())
}

/// Derive daily calorie and macro targets from body metrics and goal
///
/// # Errors
///
/// Returns a `ValueOutOfRange` error when a body metric is implausible
pub fn derive_daily_targets(metrics: &BodyMetrics, goal: Goal) -> AppResult<NutritionalTarget> {
    validate_metrics(metrics)?;

    let calories = (calculate_tdee(metrics) + goal_calorie_adjustment(goal))
        .max(MIN_DAILY_CALORIES)
        .round();
    let protein = (metrics.weight_kg * protein_g_per_kg(goal)).round();
    let fat = (calories * fat_calorie_share(goal) / FAT_KCAL_PER_G).round();
    let remaining = fat.mul_add(-FAT_KCAL_PER_G, protein.mul_add(-PROTEIN_KCAL_PER_G, calories));
    let carbs = (remaining / CARBS_KCAL_PER_G).max(0.0).round();

    Ok(NutritionalTarget {
        calories,
        protein,
        carbs,
        fat,
    })
}

fn activity_water_bonus_ml(training_days: usize) -> f64 {
    match training_days {
        0 => 0.0,
        1..=2 => 300.0,
        3..=4 => 500.0,
        _ => 700.0,
    }
}

/// Recommended daily water intake in ml, rounded to 50 ml
#[must_use]
pub fn water_intake_ml(
    body_weight_kg: Option<f64>,
    training_days: usize,
    target_calories: f64,
    tuning: &DietTuning,
) -> u32 {
    let raw = body_weight_kg.map_or_else(
        || target_calories * tuning.water_ml_per_kcal,
        |kg| kg.mul_add(tuning.water_ml_per_kg, activity_water_bonus_ml(training_days)),
    );
    let clamped = raw.clamp(
        f64::from(tuning.min_water_ml),
        f64::from(tuning.max_water_ml),
    );
    ((clamped / 50.0).round() * 50.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_core::models::ActivityLevel;

    #[test]
    fn test_distribution_rows_sum_to_one() {
        for goal in [Goal::LoseWeight, Goal::GainMuscle, Goal::Maintain] {
            let sum: f64 = meal_distribution(goal).iter().map(|(_, s)| s).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{goal:?} sums to {sum}");
        }
    }

    #[test]
    fn test_split_policy_table() {
        use ExperienceLevel::{Advanced, Beginner, Intermediate};
        assert_eq!(select_split_type(1, Beginner), SplitType::FullBody);
        assert_eq!(select_split_type(2, Advanced), SplitType::FullBody);
        assert_eq!(select_split_type(3, Beginner), SplitType::PushPullLegs);
        assert_eq!(select_split_type(4, Intermediate), SplitType::UpperLower);
        assert_eq!(select_split_type(5, Advanced), SplitType::UpperLower);
        assert_eq!(select_split_type(6, Beginner), SplitType::PushPullLegs);
        assert_eq!(select_split_type(7, Intermediate), SplitType::UpperLower);
        assert_eq!(select_split_type(7, Advanced), SplitType::PushPullLegs);
    }

    #[test]
    fn test_bmr_matches_mifflin() {
        let metrics = BodyMetrics {
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
        };
        // 700 + 1093.75 - 150 + 5
        assert!((calculate_bmr(&metrics) - 1648.75).abs() < 1e-9);
        assert!((calculate_tdee(&metrics) - 1978.5).abs() < 1e-9);
    }

    #[test]
    fn test_derived_macros_fill_calories() {
        let metrics = BodyMetrics {
            weight_kg: 80.0,
            height_cm: 180.0,
            age: 28,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
        };
        let target = derive_daily_targets(&metrics, Goal::GainMuscle).unwrap();
        let macro_kcal = target.fat.mul_add(9.0, (target.protein + target.carbs) * 4.0);
        assert!((macro_kcal - target.calories).abs() < 15.0);
        assert!((target.protein - 160.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derived_calories_have_floor() {
        let metrics = BodyMetrics {
            weight_kg: 40.0,
            height_cm: 150.0,
            age: 80,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
        };
        let target = derive_daily_targets(&metrics, Goal::LoseWeight).unwrap();
        assert!((target.calories - MIN_DAILY_CALORIES).abs() < f64::EPSILON);
    }

    #[test]
    fn test_water_uses_weight_when_known() {
        let tuning = DietTuning::default();
        assert_eq!(water_intake_ml(Some(70.0), 3, 2000.0, &tuning), 2950);
        assert_eq!(water_intake_ml(None, 3, 2000.0, &tuning), 2000);
        assert_eq!(water_intake_ml(None, 0, 900.0, &tuning), 1500);
    }
}
