// ABOUTME: Candidate pool over the content catalog: hard constraint filtering and soft ranking
// ABOUTME: Equal scores are ordered by a seedable tie-breaker so tests can pin the selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Candidate Pool
//!
//! Hard constraints exclude a candidate outright; the soft score only orders the
//! survivors. Allergen, restriction and dislike filters are never relaxed. Equipment
//! is the only constraint a generator may drop, through
//! [`ExerciseConstraints::without_equipment`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use evo_core::constants::equipment;
use evo_core::errors::AppResult;
use evo_core::models::{
    AlgorithmConfig, CostLevel, DietPreferences, ExerciseCandidate, ExperienceLevel,
    FoodCandidate, FoodCategory, TrainingLocation,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::catalog::{ContentCatalog, ExerciseQuery, FoodQuery};
use crate::config::RankingWeights;

/// Seedable source of tie-breaking keys
///
/// Each ranked candidate receives a random key; candidates with equal scores are
/// ordered by it, which samples uniformly among ties.
#[derive(Debug)]
pub struct TieBreaker {
    rng: Mutex<ChaCha8Rng>,
}

impl TieBreaker {
    /// Reproducible tie-breaking
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Tie-breaking seeded from the thread RNG
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Seeded when `seed` is set, entropy otherwise
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    fn next_key(&self) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen()
    }
}

/// Why a candidate was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rejection {
    /// Contains an excluded allergen
    Allergen,
    /// Carries a tag forbidden by an active dietary restriction
    Restriction,
    /// Explicitly disliked by name
    Disliked,
    /// Harder than the user's experience level
    Difficulty,
    /// Requires unavailable equipment
    Equipment,
    /// Not performable at the training location
    Location,
    /// Already chosen earlier in the session
    AlreadyChosen,
}

impl Rejection {
    /// Short name used in diagnostics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allergen => "allergens",
            Self::Restriction => "dietary restrictions",
            Self::Disliked => "dislikes",
            Self::Difficulty => "difficulty",
            Self::Equipment => "equipment",
            Self::Location => "location",
            Self::AlreadyChosen => "already chosen",
        }
    }
}

/// Rejection counts of one query, used to explain empty results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionSummary(BTreeMap<Rejection, usize>);

impl RejectionSummary {
    fn record(&mut self, rejection: Rejection) {
        *self.0.entry(rejection).or_insert(0) += 1;
    }

    /// Number of candidates excluded for `rejection`
    #[must_use]
    pub fn count(&self, rejection: Rejection) -> usize {
        self.0.get(&rejection).copied().unwrap_or(0)
    }

    /// Total number of excluded candidates
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

impl fmt::Display for RejectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(rejection, count)| format!("{}: {count}", rejection.as_str()))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A candidate with its soft-ranking score
#[derive(Debug, Clone)]
pub struct Scored<T> {
    /// Catalog entry
    pub candidate: T,
    /// Composite score, higher is better
    pub score: f64,
}

/// Outcome of a pool query
#[derive(Debug, Clone)]
pub struct Selection<T> {
    /// Admissible candidates, best first
    pub ranked: Vec<Scored<T>>,
    /// Number of catalog entries examined
    pub examined: usize,
    /// Why the others were excluded
    pub rejections: RejectionSummary,
}

impl<T> Selection<T> {
    /// Whether no candidate survived the hard filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Human-readable explanation of an empty result
    #[must_use]
    pub fn explain(&self, capability: &str) -> String {
        if self.examined == 0 {
            format!("no catalog entries for {capability}")
        } else {
            format!(
                "all {} candidates for {capability} excluded ({})",
                self.examined, self.rejections
            )
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalized_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Hard constraints and soft preferences for exercise queries
#[derive(Debug, Clone, Default)]
pub struct ExerciseConstraints {
    /// Available equipment, lowercase; `None` disables the equipment filter
    pub equipment: Option<BTreeSet<String>>,
    /// Training location
    pub location: TrainingLocation,
    /// Highest admissible difficulty
    pub max_difficulty: ExperienceLevel,
    /// Disliked exercise names, lowercase and trimmed
    pub disliked: BTreeSet<String>,
    /// Preferred exercise names, lowercase
    pub preferred: BTreeSet<String>,
    /// Exercise ids performed recently
    pub recent_exercise_ids: HashSet<String>,
    /// Exercise ids already placed in the session
    pub excluded_ids: HashSet<String>,
}

impl ExerciseConstraints {
    /// Constraints derived from a request configuration
    ///
    /// An empty equipment list means the user did not specify any and disables
    /// the equipment filter.
    #[must_use]
    pub fn from_config(config: &AlgorithmConfig) -> Self {
        let prefs = &config.workout_preferences;
        let equipment = normalized_set(&prefs.equipment);
        Self {
            equipment: (!equipment.is_empty()).then_some(equipment),
            location: prefs.location,
            max_difficulty: config.experience_level,
            disliked: normalized_set(&prefs.disliked_exercises),
            preferred: normalized_set(&prefs.preferred_exercises),
            recent_exercise_ids: HashSet::new(),
            excluded_ids: HashSet::new(),
        }
    }

    /// Same constraints with the equipment filter dropped
    #[must_use]
    pub fn without_equipment(&self) -> Self {
        Self {
            equipment: None,
            ..self.clone()
        }
    }

    fn admits_equipment(&self, candidate: &ExerciseCandidate) -> bool {
        self.equipment.as_ref().is_none_or(|available| {
            candidate
                .equipment
                .iter()
                .all(|item| {
                    equipment::is_always_available(item) || available.contains(&normalize(item))
                })
        })
    }

    fn check(&self, candidate: &ExerciseCandidate) -> Result<(), Rejection> {
        if self.disliked.contains(&normalize(&candidate.name)) {
            return Err(Rejection::Disliked);
        }
        if self.excluded_ids.contains(&candidate.id) {
            return Err(Rejection::AlreadyChosen);
        }
        if candidate.difficulty > self.max_difficulty {
            return Err(Rejection::Difficulty);
        }
        if !candidate.location_compatibility.contains(&self.location) {
            return Err(Rejection::Location);
        }
        if !self.admits_equipment(candidate) {
            return Err(Rejection::Equipment);
        }
        Ok(())
    }
}

/// Dietary tags excluded by a restriction, `None` for unknown restrictions
#[must_use]
pub fn restriction_excluded_tags(restriction: &str) -> Option<&'static [&'static str]> {
    match normalize(restriction).replace(['-', ' '], "_").as_str() {
        "vegetarian" => Some(&["meat", "poultry", "fish", "seafood"]),
        "vegan" => Some(&["meat", "poultry", "fish", "seafood", "dairy", "egg", "honey"]),
        "pescatarian" => Some(&["meat", "poultry"]),
        "gluten_free" => Some(&["gluten"]),
        "lactose_free" | "dairy_free" => Some(&["lactose", "dairy"]),
        _ => None,
    }
}

/// Hard constraints and soft preferences for food queries
#[derive(Debug, Clone, Default)]
pub struct FoodConstraints {
    /// Allergens that exclude a food, lowercase
    pub excluded_allergens: BTreeSet<String>,
    /// Dietary tags that exclude a food, lowercase
    pub excluded_tags: BTreeSet<String>,
    /// Disliked food names, lowercase and trimmed
    pub disliked: BTreeSet<String>,
    /// Preferred food names or categories, lowercase
    pub preferred: BTreeSet<String>,
    /// Longest acceptable preparation time
    pub max_preparation_minutes: Option<u32>,
    /// Budget ceiling
    pub budget: CostLevel,
}

impl FoodConstraints {
    /// Build constraints from diet preferences
    ///
    /// Unknown dietary restrictions are logged and ignored.
    #[must_use]
    pub fn from_preferences(prefs: &DietPreferences) -> Self {
        let mut excluded_tags = BTreeSet::new();
        for restriction in &prefs.dietary_restrictions {
            match restriction_excluded_tags(restriction) {
                Some(tags) => excluded_tags.extend(tags.iter().map(|t| (*t).to_owned())),
                None => warn!(restriction = %restriction, "Ignoring unknown dietary restriction"),
            }
        }
        Self {
            excluded_allergens: normalized_set(&prefs.allergies),
            excluded_tags,
            disliked: normalized_set(&prefs.disliked_foods),
            preferred: normalized_set(&prefs.preferred_foods),
            max_preparation_minutes: prefs.cooking_time_preference.max_minutes(),
            budget: prefs.budget_level,
        }
    }

    fn check(&self, candidate: &FoodCandidate) -> Result<(), Rejection> {
        if candidate
            .allergens
            .iter()
            .any(|a| self.excluded_allergens.contains(&normalize(a)))
        {
            return Err(Rejection::Allergen);
        }
        if candidate
            .dietary_tags
            .iter()
            .any(|t| self.excluded_tags.contains(&normalize(t)))
        {
            return Err(Rejection::Restriction);
        }
        if self.disliked.contains(&normalize(&candidate.name)) {
            return Err(Rejection::Disliked);
        }
        Ok(())
    }

    fn is_preferred(&self, candidate: &FoodCandidate) -> bool {
        let name = normalize(&candidate.name);
        self.preferred.iter().any(|p| {
            name == *p || name.contains(p.as_str()) || candidate.category.as_str() == p
        })
    }
}

/// Filtered, ranked access to the content catalog
#[derive(Clone)]
pub struct CandidatePool {
    catalog: Arc<dyn ContentCatalog>,
    weights: RankingWeights,
    tie_breaker: Arc<TieBreaker>,
}

impl CandidatePool {
    /// Pool over `catalog`
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ContentCatalog>,
        weights: RankingWeights,
        tie_breaker: Arc<TieBreaker>,
    ) -> Self {
        Self {
            catalog,
            weights,
            tie_breaker,
        }
    }

    /// Ranking weights in use
    #[must_use]
    pub const fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Random key for ordering equal scores
    #[must_use]
    pub fn tie_key(&self) -> u64 {
        self.tie_breaker.next_key()
    }

    /// Exercises training `muscle_group` that satisfy every hard constraint, best first
    ///
    /// # Errors
    ///
    /// Propagates catalog failures unmodified
    pub async fn query_exercises(
        &self,
        muscle_group: &str,
        constraints: &ExerciseConstraints,
    ) -> AppResult<Selection<ExerciseCandidate>> {
        let candidates = self
            .catalog
            .search_exercises(&ExerciseQuery::for_muscle(muscle_group).at(constraints.location))
            .await?;
        let selection = self.rank(
            candidates,
            |c| constraints.check(c),
            |c| self.exercise_score(c, muscle_group, constraints),
        );
        debug!(
            muscle_group,
            examined = selection.examined,
            admitted = selection.ranked.len(),
            rejections = %selection.rejections,
            "Exercise pool query"
        );
        Ok(selection)
    }

    /// Foods that satisfy every hard constraint, best first; `None` queries every category
    ///
    /// # Errors
    ///
    /// Propagates catalog failures unmodified
    pub async fn query_foods(
        &self,
        category: Option<FoodCategory>,
        constraints: &FoodConstraints,
    ) -> AppResult<Selection<FoodCandidate>> {
        let candidates = self.catalog.search_foods(&FoodQuery { category }).await?;
        let selection = self.rank(
            candidates,
            |c| constraints.check(c),
            |c| self.food_score(c, constraints),
        );
        debug!(
            category = ?category,
            examined = selection.examined,
            admitted = selection.ranked.len(),
            rejections = %selection.rejections,
            "Food pool query"
        );
        Ok(selection)
    }

    /// Soft score of an exercise for a muscle-group slot
    #[must_use]
    pub fn exercise_score(
        &self,
        candidate: &ExerciseCandidate,
        muscle_group: &str,
        constraints: &ExerciseConstraints,
    ) -> f64 {
        let w = &self.weights;
        let mut score = w.time_efficiency.mul_add(
            candidate.time_efficiency,
            w.effectiveness
                .mul_add(candidate.effectiveness_rating, w.safety * candidate.safety_rating),
        );
        if candidate.is_primary_for(muscle_group) {
            score += w.primary_muscle_bonus;
        }
        if constraints.preferred.contains(&normalize(&candidate.name)) {
            score += w.preferred_boost;
        }
        if constraints.recent_exercise_ids.contains(&candidate.id) {
            score -= w.recent_exercise_penalty;
        }
        score
    }

    /// Soft score of a food
    ///
    /// The preference signal is the catalog preference score, boosted when the
    /// food matches the user's preferred list.
    #[must_use]
    pub fn food_score(&self, candidate: &FoodCandidate, constraints: &FoodConstraints) -> f64 {
        let w = &self.weights;
        let mut preference = candidate.preference_score;
        if constraints.is_preferred(candidate) {
            preference += w.preferred_boost;
        }
        let mut score = w
            .preference
            .mul_add(preference, w.availability * candidate.availability_score);
        if constraints
            .max_preparation_minutes
            .is_some_and(|max| candidate.preparation_time_minutes > max)
        {
            score -= w.soft_mismatch_penalty;
        }
        if candidate.cost_level > constraints.budget {
            score -= w.soft_mismatch_penalty;
        }
        score
    }

    fn rank<T>(
        &self,
        candidates: Vec<T>,
        check: impl Fn(&T) -> Result<(), Rejection>,
        score_of: impl Fn(&T) -> f64,
    ) -> Selection<T> {
        let examined = candidates.len();
        let mut rejections = RejectionSummary::default();
        let mut keyed: Vec<(Scored<T>, u64)> = Vec::with_capacity(examined);

        for candidate in candidates {
            match check(&candidate) {
                Ok(()) => {
                    let score = score_of(&candidate);
                    keyed.push((Scored { candidate, score }, self.tie_key()));
                }
                Err(rejection) => rejections.record(rejection),
            }
        }

        keyed.sort_by(|(a, ka), (b, kb)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| ka.cmp(kb))
        });

        Selection {
            ranked: keyed.into_iter().map(|(scored, _)| scored).collect(),
            examined,
            rejections,
        }
    }
}
