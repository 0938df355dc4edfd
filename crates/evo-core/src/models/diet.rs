// ABOUTME: Diet plan models: nutritional targets, meals, food portions and the daily plan
// ABOUTME: Plan and meal totals are always recomputed from their parts, never set by hand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::meal_times;
use crate::models::preferences::Goal;

/// Calories and macronutrients, used both as a target and as a running total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalTarget {
    /// kcal
    pub calories: f64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

impl NutritionalTarget {
    /// Multiply every field by `factor`
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    /// Round every field to one decimal place
    #[must_use]
    pub fn rounded(self) -> Self {
        let round = |v: f64| (v * 10.0).round() / 10.0;
        Self {
            calories: round(self.calories),
            protein: round(self.protein),
            carbs: round(self.carbs),
            fat: round(self.fat),
        }
    }
}

impl Add for NutritionalTarget {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for NutritionalTarget {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for NutritionalTarget {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            calories: self.calories - rhs.calories,
            protein: self.protein - rhs.protein,
            carbs: self.carbs - rhs.carbs,
            fat: self.fat - rhs.fat,
        }
    }
}

/// Meals of the day, ordered as they are eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Afternoon snack
    Snack,
    /// Evening meal
    Dinner,
}

impl MealType {
    /// Every meal in daily order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Snack, Self::Dinner];

    /// Convert to the wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }

    /// Scheduled clock time (`HH:MM`)
    #[must_use]
    pub const fn scheduled_time(&self) -> &'static str {
        match self {
            Self::Breakfast => meal_times::BREAKFAST,
            Self::Lunch => meal_times::LUNCH,
            Self::Snack => meal_times::SNACK,
            Self::Dinner => meal_times::DINNER,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portion of a catalog food inside a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Catalog identifier
    pub food_id: String,
    /// Display name
    pub name: String,
    /// Portion size
    pub quantity_grams: f64,
    /// kcal in this portion
    pub calories: f64,
    /// Protein grams in this portion
    pub protein: f64,
    /// Carbohydrate grams in this portion
    pub carbs: f64,
    /// Fat grams in this portion
    pub fat: f64,
}

impl FoodItem {
    /// Nutrients of this portion
    #[must_use]
    pub const fn nutrients(&self) -> NutritionalTarget {
        NutritionalTarget {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// One scheduled meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Meal slot
    pub meal_type: MealType,
    /// Clock time (`HH:MM`)
    pub scheduled_time: String,
    /// Share of the daily target assigned to this meal
    pub target: NutritionalTarget,
    /// Foods in serving order
    pub foods: Vec<FoodItem>,
    /// Sum of food calories
    pub total_calories: f64,
    /// Sum of food protein
    pub total_protein: f64,
    /// Sum of food carbohydrates
    pub total_carbs: f64,
    /// Sum of food fat
    pub total_fat: f64,
}

impl Meal {
    /// Empty meal with its target and scheduled time
    #[must_use]
    pub fn new(meal_type: MealType, target: NutritionalTarget) -> Self {
        Self {
            meal_type,
            scheduled_time: meal_type.scheduled_time().to_owned(),
            target,
            foods: Vec::new(),
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
        }
    }

    /// Current totals as a nutritional target
    #[must_use]
    pub const fn totals(&self) -> NutritionalTarget {
        NutritionalTarget {
            calories: self.total_calories,
            protein: self.total_protein,
            carbs: self.total_carbs,
            fat: self.total_fat,
        }
    }

    /// Recompute `total_*` from the foods
    pub fn recompute_totals(&mut self) {
        let totals = self
            .foods
            .iter()
            .fold(NutritionalTarget::default(), |acc, food| {
                acc + food.nutrients()
            });
        self.total_calories = totals.calories;
        self.total_protein = totals.protein;
        self.total_carbs = totals.carbs;
        self.total_fat = totals.fat;
    }
}

/// A full day of meals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    /// Owner
    pub user_id: String,
    /// Day the plan applies to
    pub date: NaiveDate,
    /// Goal the plan was built for
    pub goal: Goal,
    /// Meals in daily order
    pub meals: Vec<Meal>,
    /// Daily calorie target
    pub target_calories: f64,
    /// Daily protein target
    pub target_protein: f64,
    /// Daily carbohydrate target
    pub target_carbs: f64,
    /// Daily fat target
    pub target_fat: f64,
    /// Sum of meal calories
    pub total_calories: f64,
    /// Sum of meal protein
    pub total_protein: f64,
    /// Sum of meal carbohydrates
    pub total_carbs: f64,
    /// Sum of meal fat
    pub total_fat: f64,
    /// Recommended water intake
    pub water_intake_ml: u32,
    /// Diagnostic and guidance notes
    #[serde(default)]
    pub notes: Vec<String>,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl DietPlan {
    /// Plan with targets set and no meals yet
    #[must_use]
    pub fn new(user_id: impl Into<String>, date: NaiveDate, goal: Goal, target: NutritionalTarget) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            goal,
            meals: Vec::new(),
            target_calories: target.calories,
            target_protein: target.protein,
            target_carbs: target.carbs,
            target_fat: target.fat,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            water_intake_ml: 0,
            notes: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Current totals as a nutritional target
    #[must_use]
    pub const fn totals(&self) -> NutritionalTarget {
        NutritionalTarget {
            calories: self.total_calories,
            protein: self.total_protein,
            carbs: self.total_carbs,
            fat: self.total_fat,
        }
    }

    /// Recompute every meal total, then the plan total from the meals
    pub fn recompute_totals(&mut self) {
        let mut totals = NutritionalTarget::default();
        for meal in &mut self.meals {
            meal.recompute_totals();
            totals += meal.totals();
        }
        self.total_calories = totals.calories;
        self.total_protein = totals.protein;
        self.total_carbs = totals.carbs;
        self.total_fat = totals.fat;
    }

    /// Number of food portions across all meals
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.meals.iter().map(|m| m.foods.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, calories: f64) -> FoodItem {
        FoodItem {
            food_id: name.to_lowercase(),
            name: name.into(),
            quantity_grams: 100.0,
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
        }
    }

    #[test]
    fn test_plan_totals_are_sum_of_meals() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut plan = DietPlan::new("u", date, Goal::Maintain, NutritionalTarget::default());
        let mut breakfast = Meal::new(MealType::Breakfast, NutritionalTarget::default());
        breakfast.foods.push(item("Ovo", 155.0));
        let mut lunch = Meal::new(MealType::Lunch, NutritionalTarget::default());
        lunch.foods.push(item("Frango", 165.0));
        lunch.foods.push(item("Arroz", 130.0));
        plan.meals = vec![breakfast, lunch];

        plan.recompute_totals();

        assert!((plan.total_calories - 450.0).abs() < 1e-9);
        assert!((plan.total_protein - 30.0).abs() < 1e-9);
        assert!((plan.meals[1].total_calories - 295.0).abs() < 1e-9);
        assert_eq!(plan.food_count(), 3);
    }

    #[test]
    fn test_meal_order_and_times() {
        let mut meals = vec![MealType::Dinner, MealType::Breakfast, MealType::Snack, MealType::Lunch];
        meals.sort();
        assert_eq!(meals, MealType::ALL.to_vec());
        assert_eq!(MealType::Lunch.scheduled_time(), "12:30");
    }
}
