// ABOUTME: Diet plan generator: per-meal target split, greedy macro-driven food selection, rebalancing
// ABOUTME: Meals land within the meal tolerance band and the day within the daily band of its target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Diet Plan Generator
//!
//! The eligible food set is queried once, with every hard constraint applied. Each
//! meal is then assembled greedily: the macro with the largest relative deficit picks
//! the next food (by macro density and rank), and the portion covers that deficit
//! without exceeding the calories left in the meal. Foods whose smallest portion would
//! overshoot the meal are passed over. A meal stops growing once it is within half its
//! band; it is then walked into the band one portion step at a time. The band is the
//! tighter of the meal and daily tolerances, so fitted meals keep the day inside its
//! band too.

use std::collections::HashMap;

use chrono::NaiveDate;
use evo_core::constants::{energy, notes};
use evo_core::errors::AppResult;
use evo_core::models::{
    AlgorithmConfig, DietPlan, FoodCandidate, FoodItem, Goal, Meal, MealType, NutritionalTarget,
};
use tracing::{debug, info, warn};

use super::GenerationContext;
use crate::config::{DietTuning, RankingWeights};
use crate::pool::{CandidatePool, FoodConstraints, Scored};
use crate::targets::{split_meal_targets, water_intake_ml};

/// Weight of macro density in the per-meal food choice
const DENSITY_WEIGHT: f64 = 0.6;
/// Weight of the pool rank score in the per-meal food choice
const RANK_WEIGHT: f64 = 0.4;
/// Daily rebalancing passes
const MAX_REBALANCE_PASSES: usize = 3;
/// Portion steps tried per meal before it is left where it is
const MAX_FIT_STEPS: usize = 240;

/// One portion change tried while fitting a meal into its band
#[derive(Debug, Clone, Copy)]
enum Adjustment<'a> {
    Resize { index: usize, grams: f64 },
    Remove { index: usize },
    Add { food: &'a FoodCandidate, grams: f64 },
    Swap { index: usize, food: &'a FoodCandidate, grams: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    const ALL: [Self; 3] = [Self::Protein, Self::Carbs, Self::Fat];

    const fn of(self, target: &NutritionalTarget) -> f64 {
        match self {
            Self::Protein => target.protein,
            Self::Carbs => target.carbs,
            Self::Fat => target.fat,
        }
    }

    const fn per_100g(self, food: &FoodCandidate) -> f64 {
        match self {
            Self::Protein => food.protein_per_100g,
            Self::Carbs => food.carbs_per_100g,
            Self::Fat => food.fat_per_100g,
        }
    }

    const fn kcal_per_gram(self) -> f64 {
        match self {
            Self::Protein => energy::PROTEIN_KCAL_PER_G,
            Self::Carbs => energy::CARBS_KCAL_PER_G,
            Self::Fat => energy::FAT_KCAL_PER_G,
        }
    }

    /// Share of the food's calories supplied by this macro, 0-1
    fn density(self, food: &FoodCandidate) -> f64 {
        if food.calories_per_100g <= 0.0 {
            return 0.0;
        }
        (self.per_100g(food) * self.kcal_per_gram() / food.calories_per_100g).clamp(0.0, 1.0)
    }
}

/// Macro with the largest relative deficit and that deficit in grams
fn focus_macro(target: &NutritionalTarget, totals: &NutritionalTarget) -> (Macro, f64) {
    let mut best = (Macro::Protein, f64::NEG_INFINITY, 0.0);
    for nutrient in Macro::ALL {
        let wanted = nutrient.of(target);
        if wanted <= 0.0 {
            continue;
        }
        let deficit = wanted - nutrient.of(totals);
        let relative = deficit / wanted;
        if relative > best.1 {
            best = (nutrient, relative, deficit);
        }
    }
    (best.0, best.2)
}

fn relative_deviation(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (actual - target).abs() / target
}

fn goal_note(goal: Goal) -> &'static str {
    match goal {
        Goal::LoseWeight => "Déficit calórico moderado: mantenha a proteína alta para preservar massa magra",
        Goal::GainMuscle => "Superávit calórico: distribua a proteína ao longo do dia",
        Goal::Maintain => "Plano de manutenção: priorize alimentos minimamente processados",
    }
}

/// Builds diet plans from an algorithm configuration
#[derive(Clone)]
pub struct DietPlanGenerator {
    pool: CandidatePool,
    tuning: DietTuning,
}

impl DietPlanGenerator {
    /// Generator drawing foods from `pool`
    #[must_use]
    pub const fn new(pool: CandidatePool, tuning: DietTuning) -> Self {
        Self { pool, tuning }
    }

    /// Build the diet plan of `user_id` for `date`
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive targets and propagates catalog failures
    pub async fn generate(
        &self,
        user_id: &str,
        date: NaiveDate,
        config: &AlgorithmConfig,
    ) -> AppResult<DietPlan> {
        self.generate_with_context(user_id, date, config, &GenerationContext::default())
            .await
    }

    /// Build the diet plan, using profile context for the water recommendation
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive targets and propagates catalog failures
    pub async fn generate_with_context(
        &self,
        user_id: &str,
        date: NaiveDate,
        config: &AlgorithmConfig,
        context: &GenerationContext,
    ) -> AppResult<DietPlan> {
        config.validate()?;

        let constraints = FoodConstraints::from_preferences(&config.diet_preferences);
        let selection = self.pool.query_foods(None, &constraints).await?;
        let meal_targets = split_meal_targets(config);

        let mut plan = DietPlan::new(user_id, date, config.goal, config.daily_target());
        plan.water_intake_ml = water_intake_ml(
            context.body_weight_kg,
            config.workout_preferences.available_days.len(),
            config.target_calories,
            &self.tuning,
        );

        if selection.is_empty() {
            warn!(
                user_id,
                %date,
                reason = %selection.explain("foods"),
                "No eligible foods, emitting empty meals"
            );
            plan.meals = meal_targets
                .into_iter()
                .map(|(meal_type, target)| Meal::new(meal_type, target))
                .collect();
            plan.notes.push(notes::NO_ELIGIBLE_FOODS.to_owned());
            plan.notes.push(selection.explain("foods"));
            plan.recompute_totals();
            return Ok(plan);
        }

        let eligible = selection.ranked;
        let lookup: HashMap<&str, &FoodCandidate> = eligible
            .iter()
            .map(|s| (s.candidate.id.as_str(), &s.candidate))
            .collect();
        let mut uses: HashMap<String, usize> = HashMap::new();

        for (meal_type, target) in meal_targets {
            let meal = self.assemble_meal(meal_type, target, &eligible, &lookup, &mut uses);
            plan.meals.push(meal);
        }
        plan.recompute_totals();
        self.rebalance_day(&mut plan, &lookup);

        let deviation = relative_deviation(plan.total_calories, plan.target_calories);
        if deviation > self.tuning.daily_tolerance {
            warn!(
                user_id,
                %date,
                total_calories = plan.total_calories,
                target_calories = plan.target_calories,
                "Daily total outside tolerance band"
            );
            plan.notes.push(format!(
                "Total diário de {:.0} kcal fora da faixa de ±{:.0}% da meta de {:.0} kcal: poucos alimentos elegíveis",
                plan.total_calories,
                self.tuning.daily_tolerance * 100.0,
                plan.target_calories
            ));
        }
        plan.notes.push(goal_note(config.goal).to_owned());
        plan.notes
            .push(format!("Beba cerca de {} ml de água ao longo do dia", plan.water_intake_ml));

        info!(
            user_id,
            %date,
            meals = plan.meals.len(),
            foods = plan.food_count(),
            total_calories = plan.total_calories,
            target_calories = plan.target_calories,
            "Diet plan generated"
        );
        Ok(plan)
    }

    /// Band every meal is fitted into; meals inside it keep the day inside its own band
    fn fit_tolerance(&self) -> f64 {
        self.tuning.meal_tolerance.min(self.tuning.daily_tolerance)
    }

    fn assemble_meal(
        &self,
        meal_type: MealType,
        target: NutritionalTarget,
        eligible: &[Scored<FoodCandidate>],
        lookup: &HashMap<&str, &FoodCandidate>,
        uses: &mut HashMap<String, usize>,
    ) -> Meal {
        let mut meal = Meal::new(meal_type, target);
        let band = target.calories * self.fit_tolerance();
        let stop_below = band / 2.0;

        while meal.foods.len() < self.tuning.max_foods_per_meal {
            let totals = meal.totals();
            let remaining = target - totals;
            if remaining.calories <= stop_below {
                break;
            }

            let (focus, deficit) = focus_macro(&target, &totals);
            let Some(food) = self.pick_food(eligible, &meal, focus, uses, remaining.calories + band)
            else {
                break;
            };
            let is_last = meal.foods.len() + 1 == self.tuning.max_foods_per_meal;
            let grams = self.portion_for(food, focus, deficit, remaining.calories, is_last);

            meal.foods.push(food_item(food, grams));
            *uses.entry(food.id.clone()).or_insert(0) += 1;
            meal.recompute_totals();
        }

        self.fit_meal(&mut meal, eligible, lookup, uses);
        meal
    }

    /// Best food for the focus macro that is not yet in the meal
    ///
    /// Foods whose smallest portion already exceeds `calorie_ceiling` are skipped.
    fn pick_food<'a>(
        &self,
        eligible: &'a [Scored<FoodCandidate>],
        meal: &Meal,
        focus: Macro,
        uses: &HashMap<String, usize>,
        calorie_ceiling: f64,
    ) -> Option<&'a FoodCandidate> {
        let weights: &RankingWeights = self.pool.weights();
        let mut best: Option<(&FoodCandidate, f64)> = None;

        for scored in eligible {
            let food = &scored.candidate;
            if meal.foods.iter().any(|item| item.food_id == food.id) {
                continue;
            }
            if food.calories_per_100g * self.tuning.min_portion_grams / 100.0 > calorie_ceiling {
                continue;
            }
            let mut choice = DENSITY_WEIGHT.mul_add(focus.density(food), RANK_WEIGHT * scored.score);
            if !food.suits(meal.meal_type) {
                choice -= weights.meal_mismatch_penalty;
            }
            let used = uses.get(&food.id).copied().unwrap_or(0);
            choice -= weights.repeat_food_penalty * used as f64;

            // strict comparison keeps the pool's order among equal choices
            if best.is_none_or(|(_, best_choice)| choice > best_choice) {
                best = Some((food, choice));
            }
        }
        best.map(|(food, _)| food)
    }

    /// Grams covering the macro deficit, never past the calories left in the meal
    fn portion_for(
        &self,
        food: &FoodCandidate,
        focus: Macro,
        deficit: f64,
        remaining_calories: f64,
        is_last: bool,
    ) -> f64 {
        let t = &self.tuning;
        let kcal_per_gram = food.calories_per_100g / 100.0;
        let macro_per_gram = focus.per_100g(food) / 100.0;
        let calorie_cap = if kcal_per_gram > 0.0 {
            remaining_calories / kcal_per_gram
        } else {
            t.max_portion_grams
        };

        let grams = if is_last || deficit <= 0.0 || macro_per_gram <= 0.0 {
            calorie_cap
        } else {
            (deficit / macro_per_gram).min(calorie_cap)
        };
        let stepped = (grams.min(t.max_portion_grams) / t.portion_step_grams).floor()
            * t.portion_step_grams;
        stepped.max(t.min_portion_grams)
    }

    fn clamp_portion(&self, grams: f64) -> f64 {
        let t = &self.tuning;
        let stepped = (grams.clamp(t.min_portion_grams, t.max_portion_grams)
            / t.portion_step_grams)
            .round()
            * t.portion_step_grams;
        stepped.clamp(t.min_portion_grams, t.max_portion_grams)
    }

    /// Walk the meal into its band one portion step at a time
    ///
    /// Each step applies the single resize, removal or addition that lands closest to
    /// the meal's target, falling back to swapping one food for another, and only while
    /// that strictly narrows the gap.
    fn fit_meal(
        &self,
        meal: &mut Meal,
        eligible: &[Scored<FoodCandidate>],
        lookup: &HashMap<&str, &FoodCandidate>,
        uses: &mut HashMap<String, usize>,
    ) {
        let target = meal.target.calories;
        let band = target * self.fit_tolerance();

        for _ in 0..MAX_FIT_STEPS {
            let gap = (meal.total_calories - target).abs();
            if gap <= band {
                return;
            }
            let step = self
                .closest_adjustment(meal, eligible, lookup, uses)
                .filter(|(_, next_gap)| *next_gap < gap)
                .or_else(|| self.closest_swap(meal, eligible))
                .filter(|(_, next_gap)| *next_gap < gap);
            let Some((adjustment, _)) = step else {
                break;
            };

            match adjustment {
                Adjustment::Resize { index, grams } => {
                    if let Some(item) = meal.foods.get_mut(index) {
                        if let Some(food) = lookup.get(item.food_id.as_str()) {
                            *item = food_item(food, grams);
                        }
                    }
                }
                Adjustment::Remove { index } => {
                    let item = meal.foods.remove(index);
                    if let Some(count) = uses.get_mut(&item.food_id) {
                        *count = count.saturating_sub(1);
                    }
                }
                Adjustment::Add { food, grams } => {
                    meal.foods.push(food_item(food, grams));
                    *uses.entry(food.id.clone()).or_insert(0) += 1;
                }
                Adjustment::Swap { index, food, grams } => {
                    if let Some(item) = meal.foods.get_mut(index) {
                        if let Some(count) = uses.get_mut(&item.food_id) {
                            *count = count.saturating_sub(1);
                        }
                        *item = food_item(food, grams);
                        *uses.entry(food.id.clone()).or_insert(0) += 1;
                    }
                }
            }
            meal.recompute_totals();
        }

        if (meal.total_calories - target).abs() > band {
            debug!(
                meal = %meal.meal_type,
                total_calories = meal.total_calories,
                target_calories = target,
                "Meal left outside its band"
            );
        }
    }

    /// Candidate step closest to the meal's calorie target, with its remaining gap
    fn closest_adjustment<'a>(
        &self,
        meal: &Meal,
        eligible: &'a [Scored<FoodCandidate>],
        lookup: &HashMap<&str, &FoodCandidate>,
        uses: &HashMap<String, usize>,
    ) -> Option<(Adjustment<'a>, f64)> {
        let t = &self.tuning;
        let target = meal.target.calories;
        let total = meal.total_calories;
        let mut best: Option<(Adjustment<'a>, f64)> = None;
        let mut consider = |adjustment: Adjustment<'a>, next_total: f64| {
            let gap = (next_total - target).abs();
            if best.is_none_or(|(_, best_gap)| gap < best_gap) {
                best = Some((adjustment, gap));
            }
        };

        for (index, item) in meal.foods.iter().enumerate() {
            let Some(food) = lookup.get(item.food_id.as_str()) else {
                continue;
            };
            let without = total - item.calories;
            for grams in [
                item.quantity_grams + t.portion_step_grams,
                item.quantity_grams - t.portion_step_grams,
            ] {
                if grams >= t.min_portion_grams && grams <= t.max_portion_grams {
                    consider(
                        Adjustment::Resize { index, grams },
                        without + food_item(food, grams).calories,
                    );
                }
            }
            if meal.foods.len() > 1 {
                consider(Adjustment::Remove { index }, without);
            }
        }

        if meal.foods.len() < t.max_foods_per_meal && total < target {
            let remaining = target - total;
            let (focus, deficit) = focus_macro(&meal.target, &meal.totals());
            let ceiling = target.mul_add(self.fit_tolerance(), remaining);
            if let Some(food) = self.pick_food(eligible, meal, focus, uses, ceiling) {
                let grams = self.portion_for(food, focus, deficit, remaining, true);
                consider(
                    Adjustment::Add { food, grams },
                    total + food_item(food, grams).calories,
                );
            }
        }
        best
    }

    /// Replacement of one food by another, sized to close the gap
    ///
    /// Tried only when no single step narrows the gap, typically when every portion
    /// already sits at its limit.
    fn closest_swap<'a>(
        &self,
        meal: &Meal,
        eligible: &'a [Scored<FoodCandidate>],
    ) -> Option<(Adjustment<'a>, f64)> {
        let target = meal.target.calories;
        let mut best: Option<(Adjustment<'a>, f64)> = None;

        for (index, item) in meal.foods.iter().enumerate() {
            let without = meal.total_calories - item.calories;
            for scored in eligible {
                let food = &scored.candidate;
                if food.calories_per_100g <= 0.0
                    || meal.foods.iter().any(|other| other.food_id == food.id)
                {
                    continue;
                }
                let grams = self.clamp_portion((target - without) * 100.0 / food.calories_per_100g);
                let gap = (without + food_item(food, grams).calories - target).abs();
                if best.is_none_or(|(_, best_gap)| gap < best_gap) {
                    best = Some((Adjustment::Swap { index, food, grams }, gap));
                }
            }
        }
        best
    }

    fn rescale_meal(&self, meal: &mut Meal, factor: f64, lookup: &HashMap<&str, &FoodCandidate>) {
        for item in &mut meal.foods {
            if let Some(food) = lookup.get(item.food_id.as_str()) {
                *item = food_item(food, self.clamp_portion(item.quantity_grams * factor));
            }
        }
        meal.recompute_totals();
    }

    /// Scale every portion toward the daily calorie target
    ///
    /// Only reached when some meal could not be fitted into its band.
    fn rebalance_day(&self, plan: &mut DietPlan, lookup: &HashMap<&str, &FoodCandidate>) {
        for pass in 0..MAX_REBALANCE_PASSES {
            if plan.total_calories <= 0.0
                || relative_deviation(plan.total_calories, plan.target_calories)
                    <= self.tuning.daily_tolerance
            {
                return;
            }
            let factor = plan.target_calories / plan.total_calories;
            debug!(pass, factor, "Rebalancing daily calories");
            for meal in &mut plan.meals {
                self.rescale_meal(meal, factor, lookup);
            }
            plan.recompute_totals();
        }
    }
}

fn food_item(food: &FoodCandidate, grams: f64) -> FoodItem {
    let nutrients = food.nutrients_for(grams).rounded();
    FoodItem {
        food_id: food.id.clone(),
        name: food.name.clone(),
        quantity_grams: grams,
        calories: nutrients.calories,
        protein: nutrients.protein,
        carbs: nutrients.carbs,
        fat: nutrients.fat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_core::models::FoodCategory;

    fn chicken() -> FoodCandidate {
        serde_json::from_value(serde_json::json!({
            "id": "frango",
            "name": "Frango",
            "calories_per_100g": 165.0,
            "protein_per_100g": 31.0,
            "carbs_per_100g": 0.0,
            "fat_per_100g": 3.6,
            "category": "protein"
        }))
        .unwrap()
    }

    #[test]
    fn test_density_is_calorie_share() {
        let food = chicken();
        assert_eq!(food.category, FoodCategory::Protein);
        assert!((Macro::Protein.density(&food) - 124.0 / 165.0).abs() < 1e-9);
        assert!(Macro::Carbs.density(&food).abs() < f64::EPSILON);
    }

    #[test]
    fn test_focus_macro_picks_largest_relative_deficit() {
        let target = NutritionalTarget {
            calories: 500.0,
            protein: 40.0,
            carbs: 50.0,
            fat: 15.0,
        };
        let totals = NutritionalTarget {
            calories: 200.0,
            protein: 37.0,
            carbs: 10.0,
            fat: 12.0,
        };
        let (focus, deficit) = focus_macro(&target, &totals);
        assert_eq!(focus, Macro::Carbs);
        assert!((deficit - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_deviation() {
        assert!((relative_deviation(1700.0, 2000.0) - 0.15).abs() < 1e-9);
        assert!(relative_deviation(10.0, 0.0).abs() < f64::EPSILON);
    }
}
