// ABOUTME: Static in-memory content catalog with a built-in exercise and food library
// ABOUTME: Loadable from a JSON document for fixtures and offline deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use evo_core::errors::{AppError, AppResult};
use evo_core::models::{
    CostLevel, ExerciseCandidate, ExperienceLevel, FoodCandidate, FoodCategory, MealType,
    MovementPattern, TrainingLocation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ContentCatalog, ExerciseQuery, FoodQuery};

/// JSON document layout accepted by [`StaticCatalog::from_json_str`]
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Exercise entries
    #[serde(default)]
    pub exercises: Vec<ExerciseCandidate>,
    /// Food entries
    #[serde(default)]
    pub foods: Vec<FoodCandidate>,
}

/// Catalog backed by immutable in-memory lists
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    exercises: Arc<Vec<ExerciseCandidate>>,
    foods: Arc<Vec<FoodCandidate>>,
}

impl StaticCatalog {
    /// Catalog over the given entries
    #[must_use]
    pub fn new(exercises: Vec<ExerciseCandidate>, foods: Vec<FoodCandidate>) -> Self {
        Self {
            exercises: Arc::new(exercises),
            foods: Arc::new(foods),
        }
    }

    /// Catalog with the built-in exercise and food library
    #[must_use]
    pub fn with_default_content() -> Self {
        Self::new(default_exercises(), default_foods())
    }

    /// Parse a catalog from a JSON document with `exercises` and `foods` arrays
    ///
    /// # Errors
    ///
    /// Returns a `SerializationError` if the document is malformed
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::new(document.exercises, document.foods))
    }

    /// Read and parse a catalog JSON file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read, or a
    /// `SerializationError` if it is malformed
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::config(format!("Cannot read catalog file {}", path.display())).with_source(e)
        })?;
        Self::from_json_str(&contents)
    }

    /// Number of exercises
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Number of foods
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.foods.len()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::with_default_content()
    }
}

#[async_trait::async_trait]
impl ContentCatalog for StaticCatalog {
    async fn search_exercises(&self, query: &ExerciseQuery) -> AppResult<Vec<ExerciseCandidate>> {
        let results: Vec<ExerciseCandidate> = self
            .exercises
            .iter()
            .filter(|e| {
                query
                    .muscle_group
                    .as_deref()
                    .is_none_or(|muscle| e.targets(muscle))
            })
            .filter(|e| {
                query
                    .location
                    .is_none_or(|location| e.location_compatibility.contains(&location))
            })
            .cloned()
            .collect();
        debug!(
            muscle_group = ?query.muscle_group,
            count = results.len(),
            "Static catalog exercise search"
        );
        Ok(results)
    }

    async fn search_foods(&self, query: &FoodQuery) -> AppResult<Vec<FoodCandidate>> {
        let results: Vec<FoodCandidate> = self
            .foods
            .iter()
            .filter(|f| query.category.is_none_or(|category| f.category == category))
            .cloned()
            .collect();
        debug!(category = ?query.category, count = results.len(), "Static catalog food search");
        Ok(results)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

fn string_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

const GYM: &[TrainingLocation] = &[TrainingLocation::Gym];
const GYM_HOME: &[TrainingLocation] = &[TrainingLocation::Gym, TrainingLocation::Home];
const ANYWHERE: &[TrainingLocation] = &[
    TrainingLocation::Gym,
    TrainingLocation::Home,
    TrainingLocation::Outdoor,
];

/// Positional exercise row: id, name, primary, secondary, equipment, difficulty,
/// pattern, (safety, effectiveness, time efficiency), locations
type ExerciseRow<'a> = (
    &'a str,
    &'a str,
    &'a [&'a str],
    &'a [&'a str],
    &'a [&'a str],
    ExperienceLevel,
    MovementPattern,
    (f64, f64, f64),
    &'a [TrainingLocation],
);

fn exercise(row: ExerciseRow<'_>) -> ExerciseCandidate {
    let (id, name, primary, secondary, equipment, difficulty, pattern, ratings, locations) = row;
    let (safety_rating, effectiveness_rating, time_efficiency) = ratings;
    ExerciseCandidate {
        id: id.to_owned(),
        name: name.to_owned(),
        primary_muscle_groups: strings(primary),
        secondary_muscle_groups: strings(secondary),
        equipment: strings(equipment),
        difficulty,
        movement_pattern: pattern,
        safety_rating,
        effectiveness_rating,
        location_compatibility: locations.iter().copied().collect(),
        time_efficiency,
    }
}

/// Built-in exercise library
#[must_use]
pub fn default_exercises() -> Vec<ExerciseCandidate> {
    use ExperienceLevel::{Advanced, Beginner, Intermediate};
    use MovementPattern::{Core, Hinge, Isolation, Lunge, Pull, Push, Squat};

    #[rustfmt::skip]
    let rows: [ExerciseRow<'static>; 40] = [
        // chest
        ("bench-press", "Supino Reto com Barra", &["chest"], &["triceps", "shoulders"], &["barbell", "bench"], Intermediate, Push, (0.7, 0.95, 0.8), GYM),
        ("dumbbell-bench-press", "Supino com Halteres", &["chest"], &["triceps", "shoulders"], &["dumbbell", "bench"], Beginner, Push, (0.85, 0.9, 0.75), GYM_HOME),
        ("push-up", "Flexão de Braço", &["chest"], &["triceps", "shoulders", "core"], &["bodyweight"], Beginner, Push, (0.95, 0.75, 0.9), ANYWHERE),
        ("incline-dumbbell-press", "Supino Inclinado com Halteres", &["chest"], &["shoulders", "triceps"], &["dumbbell", "bench"], Intermediate, Push, (0.8, 0.85, 0.7), GYM_HOME),
        ("cable-fly", "Crucifixo no Cabo", &["chest"], &["shoulders"], &["cable"], Beginner, Isolation, (0.9, 0.7, 0.6), GYM),
        ("dumbbell-fly", "Crucifixo com Halteres", &["chest"], &[], &["dumbbell", "bench"], Beginner, Isolation, (0.8, 0.65, 0.6), GYM_HOME),
        // back
        ("pull-up", "Barra Fixa", &["back"], &["biceps"], &["pull_up_bar"], Intermediate, Pull, (0.8, 0.95, 0.85), ANYWHERE),
        ("lat-pulldown", "Puxada Frontal", &["back"], &["biceps"], &["cable"], Beginner, Pull, (0.9, 0.85, 0.75), GYM),
        ("barbell-row", "Remada Curvada", &["back"], &["biceps", "hamstrings"], &["barbell"], Intermediate, Pull, (0.65, 0.9, 0.8), GYM),
        ("dumbbell-row", "Remada Unilateral com Halter", &["back"], &["biceps"], &["dumbbell"], Beginner, Pull, (0.85, 0.85, 0.7), GYM_HOME),
        ("inverted-row", "Remada Invertida", &["back"], &["biceps", "core"], &["bodyweight"], Beginner, Pull, (0.9, 0.7, 0.8), ANYWHERE),
        ("straight-arm-pulldown", "Pulldown com Braços Estendidos", &["back"], &[], &["cable"], Beginner, Isolation, (0.9, 0.6, 0.6), GYM),
        // shoulders
        ("overhead-press", "Desenvolvimento com Barra", &["shoulders"], &["triceps", "core"], &["barbell"], Intermediate, Push, (0.7, 0.9, 0.8), GYM),
        ("dumbbell-shoulder-press", "Desenvolvimento com Halteres", &["shoulders"], &["triceps"], &["dumbbell"], Beginner, Push, (0.85, 0.85, 0.75), GYM_HOME),
        ("lateral-raise", "Elevação Lateral", &["shoulders"], &[], &["dumbbell"], Beginner, Isolation, (0.9, 0.7, 0.6), GYM_HOME),
        ("face-pull", "Face Pull", &["shoulders"], &["back"], &["cable"], Beginner, Isolation, (0.95, 0.7, 0.6), GYM),
        ("pike-push-up", "Flexão Pike", &["shoulders"], &["triceps"], &["bodyweight"], Intermediate, Push, (0.85, 0.7, 0.8), ANYWHERE),
        // arms
        ("barbell-curl", "Rosca Direta", &["biceps"], &[], &["barbell"], Beginner, Isolation, (0.85, 0.8, 0.65), GYM),
        ("hammer-curl", "Rosca Martelo", &["biceps"], &[], &["dumbbell"], Beginner, Isolation, (0.9, 0.75, 0.65), GYM_HOME),
        ("chin-up", "Barra Supinada", &["biceps"], &["back"], &["pull_up_bar"], Intermediate, Pull, (0.8, 0.85, 0.8), ANYWHERE),
        ("triceps-pushdown", "Tríceps na Polia", &["triceps"], &[], &["cable"], Beginner, Isolation, (0.9, 0.75, 0.65), GYM),
        ("bench-dip", "Mergulho no Banco", &["triceps"], &["chest", "shoulders"], &["bodyweight"], Beginner, Push, (0.75, 0.75, 0.8), ANYWHERE),
        ("overhead-triceps-extension", "Tríceps Francês", &["triceps"], &[], &["dumbbell"], Beginner, Isolation, (0.8, 0.75, 0.6), GYM_HOME),
        // quadriceps
        ("back-squat", "Agachamento Livre com Barra", &["quadriceps"], &["glutes", "hamstrings", "core"], &["barbell", "squat_rack"], Intermediate, Squat, (0.65, 0.95, 0.85), GYM),
        ("goblet-squat", "Agachamento Goblet", &["quadriceps"], &["glutes", "core"], &["dumbbell"], Beginner, Squat, (0.9, 0.8, 0.8), GYM_HOME),
        ("bodyweight-squat", "Agachamento com Peso Corporal", &["quadriceps"], &["glutes"], &["bodyweight"], Beginner, Squat, (0.95, 0.6, 0.75), ANYWHERE),
        ("leg-press", "Leg Press 45°", &["quadriceps"], &["glutes"], &["machine"], Beginner, Squat, (0.85, 0.85, 0.75), GYM),
        ("leg-extension", "Cadeira Extensora", &["quadriceps"], &[], &["machine"], Beginner, Isolation, (0.85, 0.65, 0.6), GYM),
        ("walking-lunge", "Avanço", &["quadriceps"], &["glutes", "hamstrings"], &["bodyweight"], Beginner, Lunge, (0.85, 0.8, 0.8), ANYWHERE),
        ("bulgarian-split-squat", "Agachamento Búlgaro", &["quadriceps"], &["glutes"], &["dumbbell", "bench"], Intermediate, Lunge, (0.8, 0.85, 0.7), GYM_HOME),
        // posterior chain
        ("romanian-deadlift", "Levantamento Terra Romeno", &["hamstrings"], &["glutes", "back"], &["barbell"], Intermediate, Hinge, (0.7, 0.9, 0.85), GYM),
        ("deadlift", "Levantamento Terra", &["hamstrings"], &["glutes", "back", "core"], &["barbell"], Advanced, Hinge, (0.6, 0.95, 0.9), GYM),
        ("leg-curl", "Mesa Flexora", &["hamstrings"], &[], &["machine"], Beginner, Isolation, (0.9, 0.7, 0.6), GYM),
        ("single-leg-rdl", "Stiff Unilateral com Halter", &["hamstrings"], &["glutes", "core"], &["dumbbell"], Beginner, Hinge, (0.8, 0.7, 0.7), GYM_HOME),
        ("hip-thrust", "Elevação Pélvica com Barra", &["glutes"], &["hamstrings"], &["barbell", "bench"], Beginner, Hinge, (0.85, 0.9, 0.75), GYM),
        ("glute-bridge", "Ponte de Glúteo", &["glutes"], &["hamstrings", "core"], &["bodyweight"], Beginner, Hinge, (0.95, 0.7, 0.75), ANYWHERE),
        // calves and core
        ("standing-calf-raise", "Panturrilha em Pé", &["calves"], &[], &["bodyweight"], Beginner, Isolation, (0.95, 0.7, 0.6), ANYWHERE),
        ("seated-calf-raise", "Panturrilha Sentado", &["calves"], &[], &["machine"], Beginner, Isolation, (0.9, 0.7, 0.55), GYM),
        ("plank", "Prancha", &["core"], &[], &["bodyweight"], Beginner, Core, (0.95, 0.7, 0.7), ANYWHERE),
        ("hanging-leg-raise", "Elevação de Pernas na Barra", &["core"], &[], &["pull_up_bar"], Intermediate, Core, (0.8, 0.8, 0.7), ANYWHERE),
    ];

    rows.into_iter().map(exercise).collect()
}

/// Positional food row: id, name, kcal/protein/carbs/fat per 100 g, category,
/// allergens, dietary tags, preparation minutes, cost, (availability, preference), meals
type FoodRow<'a> = (
    &'a str,
    &'a str,
    [f64; 4],
    FoodCategory,
    &'a [&'a str],
    &'a [&'a str],
    u32,
    CostLevel,
    (f64, f64),
    &'a [MealType],
);

fn food(row: FoodRow<'_>) -> FoodCandidate {
    let (id, name, macros, category, allergens, tags, prep, cost, scores, meals) = row;
    let [calories, protein, carbs, fat] = macros;
    let (availability_score, preference_score) = scores;
    FoodCandidate {
        id: id.to_owned(),
        name: name.to_owned(),
        calories_per_100g: calories,
        protein_per_100g: protein,
        carbs_per_100g: carbs,
        fat_per_100g: fat,
        category,
        allergens: string_set(allergens),
        dietary_tags: string_set(tags),
        preparation_time_minutes: prep,
        cost_level: cost,
        availability_score,
        preference_score,
        meal_types: meals.iter().copied().collect(),
    }
}

const MAIN_MEALS: &[MealType] = &[MealType::Lunch, MealType::Dinner];
const LIGHT_MEALS: &[MealType] = &[MealType::Breakfast, MealType::Snack];

/// Built-in food library, macros per 100 g
#[must_use]
pub fn default_foods() -> Vec<FoodCandidate> {
    use CostLevel::{High, Low, Medium};
    use FoodCategory::{Dairy, Fat, Fruit, Grain, Legume, Protein, Vegetable};

    #[rustfmt::skip]
    let rows: [FoodRow<'static>; 24] = [
        ("chicken-breast", "Peito de Frango Grelhado", [165.0, 31.0, 0.0, 3.6], Protein, &[], &["meat", "poultry"], 20, Low, (0.95, 0.85), MAIN_MEALS),
        ("lean-beef", "Patinho Moído", [219.0, 35.9, 0.0, 7.3], Protein, &[], &["meat"], 20, Medium, (0.9, 0.8), MAIN_MEALS),
        ("tilapia", "Filé de Tilápia", [128.0, 26.0, 0.0, 2.7], Protein, &["fish"], &["fish"], 20, Medium, (0.8, 0.75), MAIN_MEALS),
        ("salmon", "Salmão Grelhado", [208.0, 20.0, 0.0, 13.0], Protein, &["fish"], &["fish"], 25, High, (0.6, 0.8), MAIN_MEALS),
        ("tofu", "Tofu Firme", [76.0, 8.0, 1.9, 4.8], Protein, &["soy"], &[], 15, Medium, (0.6, 0.55), MAIN_MEALS),
        ("boiled-egg", "Ovo Cozido", [155.0, 13.0, 1.1, 11.0], Protein, &["egg"], &["egg"], 10, Low, (0.95, 0.8), &[MealType::Breakfast, MealType::Snack, MealType::Lunch]),
        ("whey-protein", "Whey Protein", [400.0, 80.0, 8.0, 6.0], Protein, &["lactose"], &["dairy"], 0, Medium, (0.7, 0.6), LIGHT_MEALS),
        ("white-rice", "Arroz Branco Cozido", [130.0, 2.7, 28.0, 0.3], Grain, &[], &[], 20, Low, (0.95, 0.85), MAIN_MEALS),
        ("brown-rice", "Arroz Integral Cozido", [112.0, 2.6, 23.0, 0.9], Grain, &[], &[], 30, Low, (0.85, 0.75), MAIN_MEALS),
        ("whole-wheat-pasta", "Macarrão Integral Cozido", [124.0, 5.0, 26.0, 1.1], Grain, &["gluten"], &["gluten"], 15, Low, (0.85, 0.7), MAIN_MEALS),
        ("whole-wheat-bread", "Pão Integral", [265.0, 13.0, 49.0, 3.6], Grain, &["gluten"], &["gluten"], 0, Low, (0.95, 0.8), LIGHT_MEALS),
        ("rolled-oats", "Aveia em Flocos", [389.0, 16.9, 66.0, 6.9], Grain, &["gluten"], &["gluten"], 5, Low, (0.9, 0.75), LIGHT_MEALS),
        ("carioca-beans", "Feijão Carioca Cozido", [76.0, 4.8, 13.6, 0.5], Legume, &[], &[], 30, Low, (0.95, 0.85), MAIN_MEALS),
        ("lentils", "Lentilha Cozida", [116.0, 9.0, 20.0, 0.4], Legume, &[], &[], 30, Low, (0.75, 0.65), MAIN_MEALS),
        ("sweet-potato", "Batata-Doce Cozida", [86.0, 1.6, 20.0, 0.1], Vegetable, &[], &[], 25, Low, (0.9, 0.8), &[MealType::Lunch, MealType::Dinner, MealType::Snack]),
        ("broccoli", "Brócolis Cozido", [35.0, 2.4, 7.2, 0.4], Vegetable, &[], &[], 10, Low, (0.85, 0.7), MAIN_MEALS),
        ("leaf-salad", "Salada de Folhas", [15.0, 1.4, 2.9, 0.2], Vegetable, &[], &[], 5, Low, (0.95, 0.7), MAIN_MEALS),
        ("banana", "Banana", [89.0, 1.1, 23.0, 0.3], Fruit, &[], &[], 0, Low, (0.95, 0.85), LIGHT_MEALS),
        ("apple", "Maçã", [52.0, 0.3, 14.0, 0.2], Fruit, &[], &[], 0, Low, (0.95, 0.8), LIGHT_MEALS),
        ("natural-yogurt", "Iogurte Natural", [61.0, 3.5, 4.7, 3.3], Dairy, &["lactose"], &["dairy"], 0, Low, (0.9, 0.75), LIGHT_MEALS),
        ("minas-cheese", "Queijo Minas Frescal", [264.0, 17.4, 3.2, 20.2], Dairy, &["lactose"], &["dairy"], 0, Medium, (0.85, 0.7), LIGHT_MEALS),
        ("olive-oil", "Azeite de Oliva", [884.0, 0.0, 0.0, 100.0], Fat, &[], &[], 0, Medium, (0.9, 0.6), MAIN_MEALS),
        ("brazil-nuts", "Castanha-do-Pará", [656.0, 14.3, 12.3, 66.4], Fat, &["nuts"], &[], 0, High, (0.7, 0.65), &[MealType::Snack]),
        ("peanut-butter", "Pasta de Amendoim", [588.0, 25.0, 20.0, 50.0], Fat, &["peanut"], &[], 0, Medium, (0.85, 0.75), LIGHT_MEALS),
    ];

    rows.into_iter().map(food).collect()
}
