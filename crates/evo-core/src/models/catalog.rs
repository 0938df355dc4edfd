// ABOUTME: Catalog entry models for exercises and foods considered during plan generation
// ABOUTME: Candidates carry constraint attributes (equipment, allergens, tags) and ranking signals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::diet::{MealType, NutritionalTarget};
use crate::models::preferences::{CostLevel, ExperienceLevel, TrainingLocation};

/// Movement pattern of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    /// Horizontal or vertical press
    Push,
    /// Rows, pull-ups, pulldowns
    Pull,
    /// Knee-dominant
    Squat,
    /// Hip-dominant
    Hinge,
    /// Single-leg
    Lunge,
    /// Trunk stability and rotation
    Core,
    /// Single-joint
    Isolation,
}

impl MovementPattern {
    /// Multi-joint patterns get more sets and longer rests
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::Push | Self::Pull | Self::Squat | Self::Hinge | Self::Lunge
        )
    }
}

const fn default_rating() -> f64 {
    0.5
}

fn all_locations() -> BTreeSet<TrainingLocation> {
    [
        TrainingLocation::Gym,
        TrainingLocation::Home,
        TrainingLocation::Outdoor,
    ]
    .into_iter()
    .collect()
}

/// Exercise entry from the content catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCandidate {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Muscle groups the exercise mainly trains
    pub primary_muscle_groups: Vec<String>,
    /// Muscle groups trained as synergists
    #[serde(default)]
    pub secondary_muscle_groups: Vec<String>,
    /// Equipment required (all items)
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Minimum experience needed
    #[serde(default)]
    pub difficulty: ExperienceLevel,
    /// Movement pattern
    pub movement_pattern: MovementPattern,
    /// Safety rating 0-1
    #[serde(default = "default_rating")]
    pub safety_rating: f64,
    /// Effectiveness rating 0-1
    #[serde(default = "default_rating")]
    pub effectiveness_rating: f64,
    /// Locations where the exercise can be performed
    #[serde(default = "all_locations")]
    pub location_compatibility: BTreeSet<TrainingLocation>,
    /// Stimulus per minute 0-1
    #[serde(default = "default_rating")]
    pub time_efficiency: f64,
}

impl ExerciseCandidate {
    /// Whether the exercise trains `muscle_group` as a primary mover
    #[must_use]
    pub fn is_primary_for(&self, muscle_group: &str) -> bool {
        self.primary_muscle_groups
            .iter()
            .any(|m| m.eq_ignore_ascii_case(muscle_group))
    }

    /// Whether the exercise trains `muscle_group` at all
    #[must_use]
    pub fn targets(&self, muscle_group: &str) -> bool {
        self.is_primary_for(muscle_group)
            || self
                .secondary_muscle_groups
                .iter()
                .any(|m| m.eq_ignore_ascii_case(muscle_group))
    }
}

/// Food group of a catalog food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    /// Meat, fish, eggs, tofu
    Protein,
    /// Rice, pasta, bread, oats
    Grain,
    /// Vegetables
    Vegetable,
    /// Fruits
    Fruit,
    /// Milk, yogurt, cheese
    Dairy,
    /// Beans, lentils, chickpeas
    Legume,
    /// Oils, nuts, seeds
    Fat,
    /// Anything else
    Other,
}

impl FoodCategory {
    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Grain => "grain",
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::Dairy => "dairy",
            Self::Legume => "legume",
            Self::Fat => "fat",
            Self::Other => "other",
        }
    }
}

/// Food entry from the content catalog, macros per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCandidate {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// kcal per 100 g
    pub calories_per_100g: f64,
    /// Protein grams per 100 g
    pub protein_per_100g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_per_100g: f64,
    /// Fat grams per 100 g
    pub fat_per_100g: f64,
    /// Food group
    pub category: FoodCategory,
    /// Allergens present (lowercase, e.g. `gluten`, `lactose`, `egg`)
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    /// Dietary tags (lowercase, e.g. `meat`, `dairy`, `gluten`)
    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,
    /// Typical preparation time in minutes
    #[serde(default)]
    pub preparation_time_minutes: u32,
    /// Relative cost
    #[serde(default)]
    pub cost_level: CostLevel,
    /// Availability 0-1
    #[serde(default = "default_rating")]
    pub availability_score: f64,
    /// Base preference 0-1 before personal boosts
    #[serde(default = "default_rating")]
    pub preference_score: f64,
    /// Meals where the food is customarily eaten; empty means any
    #[serde(default)]
    pub meal_types: BTreeSet<MealType>,
}

impl FoodCandidate {
    /// Nutrients contained in `grams` of this food
    #[must_use]
    pub fn nutrients_for(&self, grams: f64) -> NutritionalTarget {
        let factor = grams / 100.0;
        NutritionalTarget {
            calories: self.calories_per_100g * factor,
            protein: self.protein_per_100g * factor,
            carbs: self.carbs_per_100g * factor,
            fat: self.fat_per_100g * factor,
        }
    }

    /// Whether the food is customarily eaten at `meal_type`
    #[must_use]
    pub fn suits(&self, meal_type: MealType) -> bool {
        self.meal_types.is_empty() || self.meal_types.contains(&meal_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_nutrients_scale_linearly() {
        let food: FoodCandidate = serde_json::from_value(serde_json::json!({
            "id": "rice",
            "name": "Arroz",
            "calories_per_100g": 130.0,
            "protein_per_100g": 2.7,
            "carbs_per_100g": 28.0,
            "fat_per_100g": 0.3,
            "category": "grain"
        }))
        .unwrap();

        let n = food.nutrients_for(150.0);
        assert!((n.calories - 195.0).abs() < 1e-9);
        assert!((n.carbs - 42.0).abs() < 1e-9);
        assert!(food.suits(MealType::Dinner));
        assert!((food.preference_score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exercise_defaults_allow_every_location() {
        let exercise: ExerciseCandidate = serde_json::from_value(serde_json::json!({
            "id": "push-up",
            "name": "Push-up",
            "primary_muscle_groups": ["chest"],
            "secondary_muscle_groups": ["triceps"],
            "equipment": ["bodyweight"],
            "movement_pattern": "push"
        }))
        .unwrap();

        assert_eq!(exercise.location_compatibility.len(), 3);
        assert!(exercise.is_primary_for("Chest"));
        assert!(exercise.targets("triceps"));
        assert!(!exercise.is_primary_for("triceps"));
        assert!(exercise.movement_pattern.is_compound());
    }
}
