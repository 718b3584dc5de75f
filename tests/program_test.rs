// ABOUTME: Integration tests for program seeding, slot editing, and phase advancement
// ABOUTME: Covers the default 6-day split, set rescaling, and planned volume analysis

mod common;

use anyhow::Result;
use common::{create_test_database, create_user_with_program, find_slot, first_strength_day};
use fitflow_server::config::fitness::FitnessPolicy;
use fitflow_server::intelligence::volume::VolumeZone;
use fitflow_server::models::{DayType, MesocyclePhase};

#[tokio::test]
async fn test_default_program_structure() -> Result<()> {
    let database = create_test_database().await?;
    let (_, program) = create_user_with_program(&database, "newbie").await?;

    assert_eq!(program.name, "Renaissance Periodization 6-Day Split");
    assert_eq!(program.mesocycle_phase, MesocyclePhase::Mev);
    assert_eq!(program.mesocycle_week, 1);

    let days = database.get_program_days(program.id).await?;
    assert_eq!(days.len(), 6);
    assert_eq!(
        days.iter()
            .filter(|day| day.day_type == DayType::Vo2max)
            .count(),
        2
    );

    let mut total_slots = 0;
    for day in &days {
        let slots = database.get_program_exercises(day.id).await?;
        if day.day_type == DayType::Strength {
            assert_eq!(slots.len(), 6, "{} should plan six slots", day.day_name);
            // Slots come back in plan order
            let order: Vec<i64> = slots
                .iter()
                .map(|slot| slot.program_exercise.order_index)
                .collect();
            assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
        } else {
            assert!(slots.is_empty(), "cardio days plan no strength slots");
        }
        total_slots += slots.len();
    }
    assert_eq!(total_slots, 24);

    Ok(())
}

#[tokio::test]
async fn test_auto_phase_advancement_rescales_sets() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "advancer").await?;
    let policy = FitnessPolicy::default();

    let day = first_strength_day(&database, program.id).await?;
    let bench_before = find_slot(&database, day.id, "Barbell Bench Press").await?;
    assert_eq!(bench_before.program_exercise.target_sets, 4);

    let advancement = database
        .advance_program_phase(user_id, program.id, None, &policy)
        .await?;

    assert_eq!(advancement.previous_phase, MesocyclePhase::Mev);
    assert_eq!(advancement.new_phase, MesocyclePhase::Mav);
    assert!((advancement.volume_multiplier - 1.2).abs() < f64::EPSILON);
    assert_eq!(advancement.exercises_updated, 24);

    // 4 sets * 1.2 = 4.8, rounded to 5; 3 sets * 1.2 = 3.6, rounded to 4
    let bench_after = find_slot(&database, day.id, "Barbell Bench Press").await?;
    assert_eq!(bench_after.program_exercise.target_sets, 5);
    let flyes_after = find_slot(&database, day.id, "Cable Flyes").await?;
    assert_eq!(flyes_after.program_exercise.target_sets, 4);

    let updated = database.get_program(user_id, program.id).await?;
    assert_eq!(updated.mesocycle_phase, MesocyclePhase::Mav);
    assert_eq!(updated.mesocycle_week, 1);

    Ok(())
}

#[tokio::test]
async fn test_manual_phase_jump_uses_baseline_ratio() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "jumper").await?;
    let policy = FitnessPolicy::default();

    // mev -> mav -> mrv through the normal cycle
    database
        .advance_program_phase(user_id, program.id, None, &policy)
        .await?;
    database
        .advance_program_phase(user_id, program.id, None, &policy)
        .await?;

    // Manual jump back to mev skips deload; multiplier comes from the
    // baseline volume ratio 1.0 / 1.38
    let advancement = database
        .advance_program_phase(user_id, program.id, Some(MesocyclePhase::Mev), &policy)
        .await?;
    assert_eq!(advancement.previous_phase, MesocyclePhase::Mrv);
    assert_eq!(advancement.new_phase, MesocyclePhase::Mev);
    assert!((advancement.volume_multiplier - 1.0 / 1.38).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_program_exercise_crud_and_reorder() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "editor").await?;
    let day = first_strength_day(&database, program.id).await?;

    let dips = database
        .get_exercises(&fitflow_server::database::ExerciseFilters {
            equipment: Some("bodyweight".into()),
            ..Default::default()
        })
        .await?
        .into_iter()
        .find(|exercise| exercise.name == "Dips")
        .ok_or_else(|| anyhow::anyhow!("Dips missing from catalog"))?;

    // Appends after the six seeded slots
    let created = database
        .create_program_exercise(user_id, day.id, dips.id, 3, "8-12", 2)
        .await?;
    assert_eq!(created.order_index, 7);
    assert_eq!(created.target_sets, 3);

    let updated = database
        .update_program_exercise(user_id, created.id, Some(4), None, Some(1))
        .await?;
    assert_eq!(updated.target_sets, 4);
    assert_eq!(updated.target_rep_range, "8-12");
    assert_eq!(updated.target_rir, 1);

    let pushdown = find_slot(&database, day.id, "Tricep Pushdown").await?;
    let swapped = database
        .swap_program_exercise(user_id, created.id, pushdown.program_exercise.exercise_id)
        .await?;
    assert_eq!(
        swapped.exercise_id,
        pushdown.program_exercise.exercise_id
    );
    assert_eq!(swapped.order_index, 7);

    // Move the new slot to the front
    let slots = database.get_program_exercises(day.id).await?;
    let order: Vec<(i64, i64)> = slots
        .iter()
        .map(|slot| {
            let id = slot.program_exercise.id;
            if id == created.id {
                (id, 1)
            } else {
                (id, slot.program_exercise.order_index + 1)
            }
        })
        .collect();
    database
        .reorder_program_exercises(user_id, day.id, &order)
        .await?;
    let reordered = database.get_program_exercises(day.id).await?;
    assert_eq!(reordered[0].program_exercise.id, created.id);

    database.delete_program_exercise(user_id, created.id).await?;
    assert!(database.get_program_exercise(user_id, created.id).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_program_volume_analysis_classifies_zones() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, _) = create_user_with_program(&database, "analyst").await?;
    let policy = FitnessPolicy::default();

    let analysis = database
        .get_program_volume_analysis(user_id, &policy)
        .await?;
    assert!(!analysis.muscle_groups.is_empty());

    for group in &analysis.muscle_groups {
        assert!(group.mev < group.mav);
        assert!(group.mav < group.mrv);
        match group.zone {
            VolumeZone::BelowMev | VolumeZone::AboveMrv => {
                assert!(group.warning.is_some(), "{} needs a warning", group.muscle_group);
            }
            _ => assert!(group.warning.is_none()),
        }
    }

    // Chest across the default split: 4 + 3 + 3 primary, 3 + 3 secondary
    let chest = analysis
        .muscle_groups
        .iter()
        .find(|group| group.muscle_group == "chest")
        .ok_or_else(|| anyhow::anyhow!("Expected chest in the analysis"))?;
    assert_eq!(chest.planned_weekly_sets, 16);
    assert_eq!(chest.zone, VolumeZone::Optimal);

    Ok(())
}

#[tokio::test]
async fn test_programs_are_isolated_between_users() -> Result<()> {
    let database = create_test_database().await?;
    let (_, program) = create_user_with_program(&database, "program_owner").await?;
    let (intruder_id, _) = create_user_with_program(&database, "program_intruder").await?;

    assert!(database.get_program(intruder_id, program.id).await.is_err());
    assert!(database
        .advance_program_phase(intruder_id, program.id, None, &FitnessPolicy::default())
        .await
        .is_err());

    Ok(())
}
