// ABOUTME: Workout plan generator: rest-day detection, split rotation, slot filling, duration estimate
// ABOUTME: Fills muscle-group slots from the candidate pool, relaxing only equipment when a slot is empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout Plan Generator
//!
//! A training day gets one session whose focus follows the weekly split rotation.
//! Each session is a list of muscle-group slots; a slot takes the best-ranked
//! admissible exercise not already in the session. When a slot has no admissible
//! exercise, the equipment filter is dropped once; if the slot is still empty it is
//! recorded as an [`UnfilledSlot`] instead of being filled with anything else.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use evo_core::constants::muscle_groups::{
    BACK, BICEPS, CALVES, CHEST, CORE, GLUTES, HAMSTRINGS, QUADRICEPS, SHOULDERS, TRICEPS,
};
use evo_core::errors::AppResult;
use evo_core::models::{
    AlgorithmConfig, DayOfWeek, Exercise, ExerciseCandidate, ExperienceLevel,
    IntensityPreference, Reps, SessionFocus, UnfilledSlot, WorkoutPlan, WorkoutSession,
};
use tracing::{debug, info, warn};

use super::warmup::build_warmup;
use super::GenerationContext;
use crate::config::WorkoutTuning;
use crate::pool::{CandidatePool, ExerciseConstraints, Scored, Selection};
use crate::targets::select_split_type;

/// A muscle-group slot of a session template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Muscle group to train
    pub muscle_group: &'static str,
    /// Whether a multi-joint movement is preferred
    pub compound: bool,
}

const fn compound(muscle_group: &'static str) -> Slot {
    Slot {
        muscle_group,
        compound: true,
    }
}

const fn isolation(muscle_group: &'static str) -> Slot {
    Slot {
        muscle_group,
        compound: false,
    }
}

const PUSH: [Slot; 6] = [
    compound(CHEST),
    compound(SHOULDERS),
    isolation(TRICEPS),
    compound(CHEST),
    isolation(SHOULDERS),
    isolation(TRICEPS),
];
const PULL: [Slot; 6] = [
    compound(BACK),
    compound(BACK),
    isolation(BICEPS),
    isolation(SHOULDERS),
    isolation(BACK),
    isolation(BICEPS),
];
const LEGS: [Slot; 6] = [
    compound(QUADRICEPS),
    compound(HAMSTRINGS),
    compound(GLUTES),
    isolation(QUADRICEPS),
    isolation(CALVES),
    isolation(HAMSTRINGS),
];
const UPPER: [Slot; 6] = [
    compound(CHEST),
    compound(BACK),
    compound(SHOULDERS),
    isolation(BICEPS),
    isolation(TRICEPS),
    isolation(BACK),
];
const LOWER: [Slot; 6] = [
    compound(QUADRICEPS),
    compound(HAMSTRINGS),
    compound(GLUTES),
    isolation(CALVES),
    isolation(CORE),
    isolation(QUADRICEPS),
];
const FULL_BODY: [Slot; 6] = [
    compound(QUADRICEPS),
    compound(CHEST),
    compound(BACK),
    compound(HAMSTRINGS),
    compound(SHOULDERS),
    isolation(CORE),
];

/// Exercises per session for an experience level
#[must_use]
pub const fn exercises_per_session(experience: ExperienceLevel) -> usize {
    match experience {
        ExperienceLevel::Beginner => 4,
        ExperienceLevel::Intermediate => 5,
        ExperienceLevel::Advanced => 6,
    }
}

/// Slot template of a session focus, truncated to the experience level's exercise count
#[must_use]
pub fn session_slots(focus: SessionFocus, experience: ExperienceLevel) -> Vec<Slot> {
    let template: &[Slot] = match focus {
        SessionFocus::Push => &PUSH,
        SessionFocus::Pull => &PULL,
        SessionFocus::Legs => &LEGS,
        SessionFocus::Upper => &UPPER,
        SessionFocus::Lower => &LOWER,
        SessionFocus::FullBody => &FULL_BODY,
    };
    template
        .iter()
        .take(exercises_per_session(experience))
        .copied()
        .collect()
}

/// Set range (min, max) per experience level
const fn set_range(experience: ExperienceLevel) -> (u32, u32) {
    match experience {
        ExperienceLevel::Beginner => (2, 3),
        ExperienceLevel::Intermediate => (3, 4),
        ExperienceLevel::Advanced => (3, 5),
    }
}

const fn rep_range(experience: ExperienceLevel) -> Reps {
    match experience {
        ExperienceLevel::Beginner => Reps::Range { min: 10, max: 15 },
        ExperienceLevel::Intermediate => Reps::Range { min: 8, max: 15 },
        ExperienceLevel::Advanced => Reps::Range { min: 6, max: 12 },
    }
}

const fn base_rest_seconds(experience: ExperienceLevel, compound: bool) -> u32 {
    match (experience, compound) {
        (ExperienceLevel::Beginner, true) => 90,
        (ExperienceLevel::Intermediate, true) => 120,
        (ExperienceLevel::Advanced, true) => 150,
        (ExperienceLevel::Beginner | ExperienceLevel::Intermediate, false) => 60,
        (ExperienceLevel::Advanced, false) => 75,
    }
}

fn experience_note(experience: ExperienceLevel) -> &'static str {
    match experience {
        ExperienceLevel::Beginner => {
            "Priorize a execução correta: cargas leves, movimentos controlados e progressão gradual"
        }
        ExperienceLevel::Intermediate => {
            "Aplique sobrecarga progressiva: aumente carga ou repetições a cada semana"
        }
        ExperienceLevel::Advanced => {
            "Monitore sinais de overtraining e respeite os dias de descanso"
        }
    }
}

/// An exercise picked for a slot, before session-level trimming
struct Placed {
    exercise: Exercise,
    compound: bool,
}

/// Admissible exercises for one slot
struct SlotCandidates {
    ranked: Vec<Scored<ExerciseCandidate>>,
    /// Whether the equipment filter had to be dropped
    relaxed: bool,
    /// Explanation used if nothing in `ranked` can be placed
    reason: String,
}

fn exercise_name_key(candidate: &ExerciseCandidate) -> String {
    candidate.name.trim().to_lowercase()
}

fn without_chosen(
    ranked: Vec<Scored<ExerciseCandidate>>,
    chosen_names: &HashSet<String>,
) -> Vec<Scored<ExerciseCandidate>> {
    ranked
        .into_iter()
        .filter(|s| !chosen_names.contains(&exercise_name_key(&s.candidate)))
        .collect()
}

fn unplaceable_reason(selection: &Selection<ExerciseCandidate>, muscle_group: &str) -> String {
    if selection.is_empty() {
        selection.explain(muscle_group)
    } else {
        format!("every eligible {muscle_group} exercise is already in the session")
    }
}

/// Builds workout plans from an algorithm configuration
#[derive(Clone)]
pub struct WorkoutPlanGenerator {
    pool: CandidatePool,
    tuning: WorkoutTuning,
}

impl WorkoutPlanGenerator {
    /// Generator drawing exercises from `pool`
    #[must_use]
    pub const fn new(pool: CandidatePool, tuning: WorkoutTuning) -> Self {
        Self { pool, tuning }
    }

    /// Build the workout plan of `user_id` for `date`
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive targets and propagates catalog failures
    pub async fn generate(
        &self,
        user_id: &str,
        date: NaiveDate,
        config: &AlgorithmConfig,
    ) -> AppResult<WorkoutPlan> {
        self.generate_with_context(user_id, date, config, &GenerationContext::default())
            .await
    }

    /// Build the workout plan, ranking recently performed exercises lower
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
    ) -> AppResult<WorkoutPlan> {
        config.validate()?;

        let prefs = &config.workout_preferences;
        let weekday = DayOfWeek::from(date.weekday());
        let Some(day_index) = prefs.day_index(weekday) else {
            debug!(user_id, %date, %weekday, "Weekday not available, generating rest day");
            return Ok(WorkoutPlan::rest_day(user_id, date, config.goal));
        };

        let split = select_split_type(prefs.available_days.len(), config.experience_level);
        let focus = split.session_for_day(day_index);

        let mut constraints = ExerciseConstraints::from_config(config);
        constraints
            .recent_exercise_ids
            .clone_from(&context.recent_exercise_ids);

        let mut notes = vec![experience_note(config.experience_level).to_owned()];
        let session = self
            .build_session(focus, day_index, config, constraints, &mut notes)
            .await?;

        info!(
            user_id,
            %date,
            split = %split,
            session = %session.name,
            exercises = session.exercises.len(),
            unfilled = session.unfilled_slots.len(),
            duration_minutes = session.estimated_duration_minutes,
            "Workout plan generated"
        );

        Ok(WorkoutPlan::training_day(
            user_id,
            date,
            config.goal,
            split,
            vec![session],
            notes,
        ))
    }

    async fn build_session(
        &self,
        focus: SessionFocus,
        day_index: usize,
        config: &AlgorithmConfig,
        mut constraints: ExerciseConstraints,
        notes: &mut Vec<String>,
    ) -> AppResult<WorkoutSession> {
        let experience = config.experience_level;
        let mut placed: Vec<Placed> = Vec::new();
        let mut unfilled_slots = Vec::new();
        let mut chosen_names: HashSet<String> = HashSet::new();
        let mut relaxed_count = 0usize;

        for slot in session_slots(focus, experience) {
            let SlotCandidates {
                ranked,
                relaxed,
                reason,
            } = self.candidates_for(slot, &constraints, &chosen_names).await?;
            let pick = ranked
                .iter()
                .find(|s| s.candidate.movement_pattern.is_compound() == slot.compound)
                .or_else(|| ranked.first());

            let Some(scored) = pick else {
                warn!(muscle_group = slot.muscle_group, %reason, "Leaving workout slot unfilled");
                unfilled_slots.push(UnfilledSlot {
                    muscle_group: slot.muscle_group.to_owned(),
                    reason,
                });
                continue;
            };

            let candidate = &scored.candidate;
            constraints.excluded_ids.insert(candidate.id.clone());
            chosen_names.insert(exercise_name_key(candidate));
            if relaxed {
                relaxed_count += 1;
            }
            placed.push(self.prescribe(candidate, config, relaxed));
        }

        let warmup = build_warmup(focus.body_region(), experience);
        let removed = self.trim_to_duration(
            &mut placed,
            warmup.duration_minutes,
            config.workout_preferences.session_duration_minutes,
        );

        if removed > 0 {
            notes.push(format!(
                "Sessão limitada a {} minutos: {removed} exercício(s) de isolamento removido(s)",
                config.workout_preferences.session_duration_minutes
            ));
        }
        if relaxed_count > 0 {
            notes.push(format!(
                "{relaxed_count} exercício(s) exigem equipamento não informado; confira as observações de cada exercício"
            ));
        }
        if !unfilled_slots.is_empty() {
            let groups: Vec<&str> = unfilled_slots
                .iter()
                .map(|s: &UnfilledSlot| s.muscle_group.as_str())
                .collect();
            notes.push(format!(
                "Nenhum exercício elegível para: {}",
                groups.join(", ")
            ));
        }

        let exercises: Vec<Exercise> = placed.into_iter().map(|p| p.exercise).collect();
        let estimated_duration_minutes =
            warmup.duration_minutes + self.working_minutes(&exercises);

        Ok(WorkoutSession {
            name: focus.session_name(day_index),
            focus,
            warmup,
            exercises,
            unfilled_slots,
            estimated_duration_minutes,
        })
    }

    /// Ranked candidates for a slot, relaxing equipment once when none is admissible
    ///
    /// Exercises sharing a name with one already in the session do not count as
    /// admissible.
    async fn candidates_for(
        &self,
        slot: Slot,
        constraints: &ExerciseConstraints,
        chosen_names: &HashSet<String>,
    ) -> AppResult<SlotCandidates> {
        let selection = self
            .pool
            .query_exercises(slot.muscle_group, constraints)
            .await?;
        let reason = unplaceable_reason(&selection, slot.muscle_group);
        let ranked = without_chosen(selection.ranked, chosen_names);
        if !ranked.is_empty() || constraints.equipment.is_none() {
            return Ok(SlotCandidates {
                ranked,
                relaxed: false,
                reason,
            });
        }

        debug!(
            muscle_group = slot.muscle_group,
            "No placeable exercise with available equipment, relaxing equipment constraint"
        );
        let relaxed = self
            .pool
            .query_exercises(slot.muscle_group, &constraints.without_equipment())
            .await?;
        Ok(SlotCandidates {
            reason: format!(
                "{} even without the equipment filter",
                unplaceable_reason(&relaxed, slot.muscle_group)
            ),
            ranked: without_chosen(relaxed.ranked, chosen_names),
            relaxed: true,
        })
    }

    fn prescribe(
        &self,
        candidate: &ExerciseCandidate,
        config: &AlgorithmConfig,
        relaxed: bool,
    ) -> Placed {
        let experience = config.experience_level;
        let compound = candidate.movement_pattern.is_compound();
        let (min_sets, max_sets) = set_range(experience);
        let adjustment = self.tuning.intensity_rest_adjustment_seconds;
        let base_rest = base_rest_seconds(experience, compound);
        let rest_seconds = match config.workout_preferences.intensity {
            IntensityPreference::Low => base_rest + adjustment,
            IntensityPreference::Moderate => base_rest,
            IntensityPreference::High => base_rest.saturating_sub(adjustment),
        };

        let mut exercise_notes = Vec::new();
        if relaxed {
            exercise_notes.push(format!(
                "Requer equipamento: {}",
                candidate.equipment.join(", ")
            ));
        }
        if compound && experience == ExperienceLevel::Beginner {
            exercise_notes.push("Foque na técnica antes de aumentar a carga".to_owned());
        }

        let muscle_groups: BTreeSet<String> = candidate
            .primary_muscle_groups
            .iter()
            .chain(&candidate.secondary_muscle_groups)
            .cloned()
            .collect();

        Placed {
            exercise: Exercise {
                exercise_id: candidate.id.clone(),
                name: candidate.name.clone(),
                muscle_groups,
                sets: if compound { max_sets } else { min_sets },
                reps: rep_range(experience),
                rest_seconds,
                equipment: candidate.equipment.clone(),
                notes: exercise_notes,
            },
            compound,
        }
    }

    /// Seconds of one exercise: sets x (reps x seconds per rep + rest)
    fn exercise_seconds(&self, exercise: &Exercise) -> f64 {
        let per_set = exercise
            .reps
            .average()
            .mul_add(self.tuning.seconds_per_rep, f64::from(exercise.rest_seconds));
        f64::from(exercise.sets) * per_set
    }

    fn working_minutes(&self, exercises: &[Exercise]) -> u32 {
        let seconds: f64 = exercises.iter().map(|e| self.exercise_seconds(e)).sum();
        (seconds / 60.0).ceil() as u32
    }

    /// Drop trailing isolation exercises until the session fits; returns how many were removed
    fn trim_to_duration(
        &self,
        placed: &mut Vec<Placed>,
        warmup_minutes: u32,
        limit_minutes: u32,
    ) -> usize {
        let mut removed = 0;
        loop {
            let exercises: Vec<Exercise> = placed.iter().map(|p| p.exercise.clone()).collect();
            let total = warmup_minutes + self.working_minutes(&exercises);
            if total <= limit_minutes || placed.len() <= self.tuning.min_exercises_per_session {
                return removed;
            }
            let Some(index) = placed.iter().rposition(|p| !p.compound) else {
                return removed;
            };
            placed.remove(index);
            removed += 1;
        }
    }
}
