// ABOUTME: Domain constants shared by plan models and the generation engine
// ABOUTME: Muscle group names, always-available equipment, meal clock times, diagnostic notes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain constants

/// Canonical muscle group identifiers used by session templates and catalog entries
pub mod muscle_groups {
    /// Chest (pectorals)
    pub const CHEST: &str = "chest";
    /// Back (lats, rhomboids, traps)
    pub const BACK: &str = "back";
    /// Shoulders (deltoids)
    pub const SHOULDERS: &str = "shoulders";
    /// Biceps
    pub const BICEPS: &str = "biceps";
    /// Triceps
    pub const TRICEPS: &str = "triceps";
    /// Quadriceps
    pub const QUADRICEPS: &str = "quadriceps";
    /// Hamstrings
    pub const HAMSTRINGS: &str = "hamstrings";
    /// Glutes
    pub const GLUTES: &str = "glutes";
    /// Calves
    pub const CALVES: &str = "calves";
    /// Core (abs, obliques)
    pub const CORE: &str = "core";
}

/// Equipment names that never need to be listed by the user
pub mod equipment {
    /// Bodyweight movements
    pub const BODYWEIGHT: &str = "bodyweight";
    /// Catalog spelling for "no equipment"
    pub const NONE: &str = "none";

    /// Whether an equipment name is always available regardless of preferences
    #[must_use]
    pub fn is_always_available(name: &str) -> bool {
        let name = name.trim();
        name.eq_ignore_ascii_case(BODYWEIGHT) || name.eq_ignore_ascii_case(NONE)
    }
}

/// Clock times at which meals are scheduled (24h `HH:MM`)
pub mod meal_times {
    /// Breakfast
    pub const BREAKFAST: &str = "07:00";
    /// Lunch
    pub const LUNCH: &str = "12:30";
    /// Afternoon snack
    pub const SNACK: &str = "15:30";
    /// Dinner
    pub const DINNER: &str = "19:00";
}

/// Fixed plan notes surfaced to callers
pub mod notes {
    /// Note attached to rest-day workout plans
    pub const REST_DAY: &str = "Dia de descanso - foque em recuperação, hidratação e sono";
    /// Note attached to diet plans whose eligible food set was empty
    pub const NO_ELIGIBLE_FOODS: &str =
        "No eligible foods after applying allergies, dietary restrictions and dislikes";
}

/// Energy density of macronutrients (kcal per gram)
pub mod energy {
    /// Protein kcal per gram
    pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
    /// Carbohydrate kcal per gram
    pub const CARBS_KCAL_PER_G: f64 = 4.0;
    /// Fat kcal per gram
    pub const FAT_KCAL_PER_G: f64 = 9.0;
}
