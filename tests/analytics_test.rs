// ABOUTME: Integration tests for training analytics
// ABOUTME: Covers 1RM progression, weekly volume tracking, history, and consistency

mod common;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use common::{create_test_database, create_user_with_program, find_slot, first_strength_day};
use fitflow_server::config::fitness::FitnessPolicy;
use fitflow_server::database::{Database, NewSet};
use fitflow_server::models::WorkoutStatus;

fn new_set(exercise_id: i64, weight_kg: f64, reps: i64, rir: i64) -> NewSet {
    NewSet {
        client_id: None,
        exercise_id,
        set_number: None,
        weight_kg,
        reps,
        rir,
        timestamp: None,
        notes: None,
    }
}

async fn completed_workout_with_sets(
    database: &Database,
    user_id: i64,
    program_day_id: i64,
    date: NaiveDate,
    sets: &[(i64, f64, i64, i64)],
) -> Result<i64> {
    let workout = database.create_workout(user_id, program_day_id, date).await?;
    for (exercise_id, weight, reps, rir) in sets {
        database
            .log_set(user_id, workout.id, new_set(*exercise_id, *weight, *reps, *rir))
            .await?;
    }
    database
        .update_workout_status(user_id, workout.id, WorkoutStatus::Completed)
        .await?;
    Ok(workout.id)
}

#[tokio::test]
async fn test_one_rep_max_progression_takes_daily_best() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "pr_chaser").await?;
    let day = first_strength_day(&database, program.id).await?;
    let bench = find_slot(&database, day.id, "Barbell Bench Press").await?;
    let exercise_id = bench.program_exercise.exercise_id;

    let first_date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    completed_workout_with_sets(
        &database,
        user_id,
        day.id,
        first_date,
        &[(exercise_id, 100.0, 8, 2), (exercise_id, 100.0, 6, 1)],
    )
    .await?;

    let second_date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
    completed_workout_with_sets(
        &database,
        user_id,
        day.id,
        second_date,
        &[(exercise_id, 100.0, 10, 2)],
    )
    .await?;

    let progression = database
        .get_one_rep_max_progression(
            user_id,
            exercise_id,
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
        )
        .await?;

    assert_eq!(progression.len(), 2);
    // Day one best: 100 * (1 + 6/30) = 120.0 beats 100 * (1 + 5/30)
    assert_eq!(progression[0].date, first_date);
    assert!((progression[0].estimated_1rm - 120.0).abs() < f64::EPSILON);
    // Day two: 100 * (1 + 8/30) = 126.666..., rounded to one decimal
    assert_eq!(progression[1].date, second_date);
    assert!((progression[1].estimated_1rm - 126.7).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_consistency_metrics_adherence() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "consistent").await?;
    let day = first_strength_day(&database, program.id).await?;
    let bench = find_slot(&database, day.id, "Barbell Bench Press").await?;
    let exercise_id = bench.program_exercise.exercise_id;

    completed_workout_with_sets(
        &database,
        user_id,
        day.id,
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        &[(exercise_id, 80.0, 10, 2)],
    )
    .await?;

    // Scheduled but skipped
    database
        .create_workout(user_id, day.id, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap())
        .await?;

    let metrics = database.get_consistency_metrics(user_id).await?;
    assert_eq!(metrics.total_workouts, 2);
    assert!((metrics.adherence_rate - 0.5).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_consistency_metrics_with_no_workouts() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, _) = create_user_with_program(&database, "idle").await?;

    let metrics = database.get_consistency_metrics(user_id).await?;
    assert_eq!(metrics.total_workouts, 0);
    assert!((metrics.adherence_rate - 0.0).abs() < f64::EPSILON);
    assert!((metrics.avg_session_duration - 0.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_current_week_volume_merges_completed_and_planned() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "tracker").await?;
    let day = first_strength_day(&database, program.id).await?;
    let bench = find_slot(&database, day.id, "Barbell Bench Press").await?;
    let exercise_id = bench.program_exercise.exercise_id;

    let today = Utc::now().date_naive();
    completed_workout_with_sets(
        &database,
        user_id,
        day.id,
        today,
        &[
            (exercise_id, 100.0, 8, 2),
            (exercise_id, 100.0, 8, 2),
            (exercise_id, 100.0, 7, 1),
        ],
    )
    .await?;

    let tracking = database
        .get_current_week_volume(user_id, &FitnessPolicy::default())
        .await?;
    assert!(tracking.week_start <= today && today <= tracking.week_end);

    let chest = tracking
        .muscle_groups
        .iter()
        .find(|group| group.muscle_group == "chest")
        .ok_or_else(|| anyhow::anyhow!("Expected chest tracking"))?;
    assert_eq!(chest.completed_sets, 3);
    // Default split plans 16 weekly chest sets (primary and secondary)
    assert_eq!(chest.planned_sets, 16);
    assert_eq!(chest.remaining_sets, 13);
    assert!((chest.completion_percentage - 18.8).abs() < f64::EPSILON);

    // Bench press also counts toward its secondary groups
    let triceps = tracking
        .muscle_groups
        .iter()
        .find(|group| group.muscle_group == "triceps")
        .ok_or_else(|| anyhow::anyhow!("Expected triceps tracking"))?;
    assert_eq!(triceps.completed_sets, 3);

    Ok(())
}

#[tokio::test]
async fn test_volume_trends_and_history_bucket_by_week() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "bucketer").await?;
    let day = first_strength_day(&database, program.id).await?;
    let bench = find_slot(&database, day.id, "Barbell Bench Press").await?;
    let exercise_id = bench.program_exercise.exercise_id;
    let policy = FitnessPolicy::default();

    let today = Utc::now().date_naive();
    completed_workout_with_sets(
        &database,
        user_id,
        day.id,
        today,
        &[(exercise_id, 100.0, 8, 2), (exercise_id, 100.0, 8, 2)],
    )
    .await?;

    let trends = database
        .get_volume_trends(user_id, "chest", today - chrono::Days::new(28), today, &policy)
        .await?;
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].total_sets, 2);
    assert_eq!(trends[0].mev, 8);
    assert_eq!(trends[0].mrv, 22);

    let history = database
        .get_volume_history(user_id, 4, Some("chest"), &policy)
        .await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].muscle_groups.len(), 1);
    assert_eq!(history[0].muscle_groups[0].completed_sets, 2);

    // Unfiltered history fans out to the secondary groups too
    let full_history = database.get_volume_history(user_id, 4, None, &policy).await?;
    assert!(full_history[0].muscle_groups.len() > 1);

    Ok(())
}

#[tokio::test]
async fn test_incomplete_workouts_do_not_count_toward_volume() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "quitter").await?;
    let day = first_strength_day(&database, program.id).await?;
    let bench = find_slot(&database, day.id, "Barbell Bench Press").await?;
    let exercise_id = bench.program_exercise.exercise_id;

    let today = Utc::now().date_naive();
    let workout = database.create_workout(user_id, day.id, today).await?;
    database
        .log_set(user_id, workout.id, new_set(exercise_id, 100.0, 8, 2))
        .await?;
    // Never completed

    let tracking = database
        .get_current_week_volume(user_id, &FitnessPolicy::default())
        .await?;
    let chest = tracking
        .muscle_groups
        .iter()
        .find(|group| group.muscle_group == "chest")
        .ok_or_else(|| anyhow::anyhow!("Expected chest tracking"))?;
    assert_eq!(chest.completed_sets, 0);

    Ok(())
}
