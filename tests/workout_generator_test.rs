// ABOUTME: Integration tests for the workout plan generator
// ABOUTME: Rest days, split rotation, slot filling, equipment relaxation, unfilled slots and trimming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashSet;

use chrono::Duration;
use evo_plans::catalog::StaticCatalog;
use evo_plans::config::WorkoutTuning;
use evo_plans::constants::notes;
use evo_plans::errors::ErrorCode;
use evo_plans::generators::WorkoutPlanGenerator;
use evo_plans::models::{
    AlgorithmConfig, DayOfWeek, ExerciseCandidate, ExperienceLevel, IntensityPreference,
    MovementPattern, Reps, SessionFocus, SplitType, TrainingLocation, WorkoutPlan,
};

mod common;

use common::{algorithm_config, days, init_test_logging, monday, seeded_pool};

fn generator(catalog: StaticCatalog) -> WorkoutPlanGenerator {
    init_test_logging();
    WorkoutPlanGenerator::new(seeded_pool(catalog), WorkoutTuning::default())
}

fn default_generator() -> WorkoutPlanGenerator {
    generator(StaticCatalog::with_default_content())
}

async fn plan_for(config: &AlgorithmConfig, offset_days: i64) -> WorkoutPlan {
    default_generator()
        .generate(&config.user_id, monday() + Duration::days(offset_days), config)
        .await
        .unwrap()
}

fn assert_distinct_exercises(plan: &WorkoutPlan) {
    for session in &plan.sessions {
        let names: HashSet<&str> = session.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names.len(), session.exercises.len(), "duplicate in {}", session.name);
    }
}

// ============================================================================
// REST DAYS AND SPLITS
// ============================================================================

#[tokio::test]
async fn test_unavailable_weekday_is_rest_day() {
    let config = algorithm_config("ana");
    // Thursday is not in Monday to Wednesday
    let plan = plan_for(&config, 3).await;

    assert!(plan.rest_day);
    assert!(plan.sessions.is_empty());
    assert_eq!(plan.total_estimated_duration_minutes, 0);
    assert!(plan.split_type.is_none());
    assert!(plan.notes.iter().any(|n| n == notes::REST_DAY));
    assert!(plan.is_consistent());
}

#[tokio::test]
async fn test_three_days_rotate_push_pull_legs() {
    let config = algorithm_config("ana");
    let expected = [
        (SessionFocus::Push, "Push (Empurrar)"),
        (SessionFocus::Pull, "Pull (Puxar)"),
        (SessionFocus::Legs, "Legs (Pernas)"),
    ];

    for (offset, (focus, name)) in expected.into_iter().enumerate() {
        let plan = plan_for(&config, offset as i64).await;
        assert!(!plan.rest_day);
        assert_eq!(plan.split_type, Some(SplitType::PushPullLegs));
        assert_eq!(plan.sessions.len(), 1);
        assert_eq!(plan.sessions[0].focus, focus);
        assert_eq!(plan.sessions[0].name, name);
        assert!(plan.is_consistent());
    }
}

#[tokio::test]
async fn test_single_day_is_full_body() {
    let mut config = algorithm_config("ana");
    config.workout_preferences.available_days = days(&[DayOfWeek::Monday]);

    let plan = plan_for(&config, 0).await;
    assert_eq!(plan.split_type, Some(SplitType::FullBody));
    assert_eq!(plan.sessions[0].name, "Full Body 1");
}

#[tokio::test]
async fn test_four_days_alternate_upper_lower() {
    let mut config = algorithm_config("ana");
    config.experience_level = ExperienceLevel::Intermediate;
    config.workout_preferences.available_days = days(&[
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ]);

    let monday_plan = plan_for(&config, 0).await;
    let tuesday_plan = plan_for(&config, 1).await;
    let thursday_plan = plan_for(&config, 3).await;

    assert_eq!(monday_plan.split_type, Some(SplitType::UpperLower));
    assert_eq!(monday_plan.sessions[0].focus, SessionFocus::Upper);
    assert_eq!(tuesday_plan.sessions[0].focus, SessionFocus::Lower);
    assert_eq!(thursday_plan.sessions[0].focus, SessionFocus::Upper);
}

// ============================================================================
// SESSION CONTENT
// ============================================================================

#[tokio::test]
async fn test_no_duplicate_exercises_across_levels() {
    for level in [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ] {
        let mut config = algorithm_config("ana");
        config.experience_level = level;
        config.workout_preferences.session_duration_minutes = 120;
        for offset in 0..3 {
            assert_distinct_exercises(&plan_for(&config, offset).await);
        }
    }
}

#[tokio::test]
async fn test_beginner_prescription() {
    let config = algorithm_config("ana");
    let plan = plan_for(&config, 0).await;
    let session = &plan.sessions[0];

    assert!(!session.exercises.is_empty());
    for exercise in &session.exercises {
        assert!((2..=3).contains(&exercise.sets), "{} sets", exercise.sets);
        assert_eq!(exercise.reps, Reps::Range { min: 10, max: 15 });
    }
    assert!(session.warmup.duration_minutes > 0);
    assert!(session.estimated_duration_minutes > session.warmup.duration_minutes);
    assert_eq!(
        plan.total_estimated_duration_minutes,
        session.estimated_duration_minutes
    );
}

#[tokio::test]
async fn test_difficulty_never_exceeds_experience() {
    let config = algorithm_config("ana");
    let catalog = StaticCatalog::with_default_content();
    let hard: HashSet<String> = evo_plans::catalog::memory::default_exercises()
        .into_iter()
        .filter(|e| e.difficulty > ExperienceLevel::Beginner)
        .map(|e| e.id)
        .collect();

    let generator = generator(catalog);
    for offset in 0..3 {
        let plan = generator
            .generate("ana", monday() + Duration::days(offset), &config)
            .await
            .unwrap();
        for exercise in &plan.sessions[0].exercises {
            assert!(!hard.contains(&exercise.exercise_id), "{}", exercise.name);
        }
    }
}

#[tokio::test]
async fn test_disliked_exercise_never_appears() {
    let mut config = algorithm_config("ana");
    config.workout_preferences.disliked_exercises = vec!["flexão de braço".into()];
    config.workout_preferences.location = TrainingLocation::Home;

    for offset in 0..3 {
        let plan = plan_for(&config, offset).await;
        assert!(plan.sessions[0]
            .exercises
            .iter()
            .all(|e| e.exercise_id != "push-up"));
    }
}

#[tokio::test]
async fn test_high_intensity_shortens_rest() {
    let mut low = algorithm_config("ana");
    low.workout_preferences.intensity = IntensityPreference::Low;
    let mut high = low.clone();
    high.workout_preferences.intensity = IntensityPreference::High;

    let low_plan = plan_for(&low, 0).await;
    let high_plan = plan_for(&high, 0).await;

    let low_first = &low_plan.sessions[0].exercises[0];
    let high_first = &high_plan.sessions[0].exercises[0];
    assert_eq!(low_first.exercise_id, high_first.exercise_id);
    assert_eq!(low_first.rest_seconds, high_first.rest_seconds + 30);
}

#[tokio::test]
async fn test_long_sessions_are_trimmed() {
    let mut config = algorithm_config("ana");
    config.experience_level = ExperienceLevel::Advanced;
    config.workout_preferences.session_duration_minutes = 30;

    let plan = plan_for(&config, 0).await;
    let session = &plan.sessions[0];
    assert!(session.exercises.len() >= WorkoutTuning::default().min_exercises_per_session);
    assert!(session.exercises.len() < 6);
    assert!(plan
        .notes
        .iter()
        .any(|n| n.starts_with("Sessão limitada a 30 minutos")));
}

// ============================================================================
// DEGRADATION
// ============================================================================

fn barbell_bench_press() -> ExerciseCandidate {
    ExerciseCandidate {
        id: "bench-press".to_owned(),
        name: "Supino Reto com Barra".to_owned(),
        primary_muscle_groups: vec!["chest".to_owned()],
        secondary_muscle_groups: Vec::new(),
        equipment: vec!["barbell".to_owned(), "bench".to_owned()],
        difficulty: ExperienceLevel::Beginner,
        movement_pattern: MovementPattern::Push,
        safety_rating: 0.8,
        effectiveness_rating: 0.9,
        location_compatibility: [TrainingLocation::Gym].into_iter().collect(),
        time_efficiency: 0.8,
    }
}

#[tokio::test]
async fn test_equipment_relaxed_once_and_empty_slots_recorded() {
    let catalog = StaticCatalog::new(vec![barbell_bench_press()], Vec::new());
    let mut config = algorithm_config("ana");
    config.workout_preferences.available_days = days(&[DayOfWeek::Monday]);
    config.workout_preferences.equipment = vec!["dumbbell".into()];

    let plan = generator(catalog).generate("ana", monday(), &config).await.unwrap();
    let session = &plan.sessions[0];

    assert_eq!(session.exercises.len(), 1);
    let bench = &session.exercises[0];
    assert_eq!(bench.exercise_id, "bench-press");
    assert!(bench
        .notes
        .iter()
        .any(|n| n == "Requer equipamento: barbell, bench"));

    let unfilled: Vec<&str> = session
        .unfilled_slots
        .iter()
        .map(|s| s.muscle_group.as_str())
        .collect();
    assert_eq!(unfilled, vec!["quadriceps", "back", "hamstrings"]);
    assert!(session.unfilled_slots[0]
        .reason
        .contains("even without the equipment filter"));
    assert!(plan
        .notes
        .iter()
        .any(|n| n.starts_with("Nenhum exercício elegível")));
    assert!(!plan.rest_day);
}

fn dumbbell_press(id: &str, name: &str) -> ExerciseCandidate {
    ExerciseCandidate {
        id: id.to_owned(),
        name: name.to_owned(),
        equipment: vec!["dumbbell".to_owned(), "bench".to_owned()],
        ..barbell_bench_press()
    }
}

#[tokio::test]
async fn test_name_duplicates_fall_back_to_equipment_relaxation() {
    let catalog = StaticCatalog::new(
        vec![
            dumbbell_press("dumbbell-press", "Supino com Halteres"),
            dumbbell_press("dumbbell-press-copy", " supino com halteres "),
            barbell_bench_press(),
        ],
        Vec::new(),
    );
    let mut config = algorithm_config("ana");
    config.workout_preferences.equipment = vec!["dumbbell".into(), "bench".into()];

    // three training days give push/pull/legs, so Monday has two chest slots
    let plan = generator(catalog).generate("ana", monday(), &config).await.unwrap();
    let session = &plan.sessions[0];
    assert_eq!(session.focus, SessionFocus::Push);

    let ids: Vec<&str> = session
        .exercises
        .iter()
        .map(|e| e.exercise_id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"bench-press"));
    assert!(session
        .unfilled_slots
        .iter()
        .all(|s| s.muscle_group != "chest"));
}

#[tokio::test]
async fn test_empty_catalog_yields_annotated_empty_session() {
    let config = algorithm_config("ana");
    let plan = generator(StaticCatalog::new(Vec::new(), Vec::new()))
        .generate("ana", monday(), &config)
        .await
        .unwrap();

    let session = &plan.sessions[0];
    assert!(session.exercises.is_empty());
    assert_eq!(session.unfilled_slots.len(), 4);
    assert_eq!(session.estimated_duration_minutes, session.warmup.duration_minutes);
}

#[tokio::test]
async fn test_non_positive_targets_are_rejected() {
    let mut config = algorithm_config("ana");
    config.target_calories = 0.0;
    let err = default_generator()
        .generate("ana", monday(), &config)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}
