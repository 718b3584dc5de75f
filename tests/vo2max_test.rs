// ABOUTME: Integration tests for VO2max cardio sessions
// ABOUTME: Covers Cooper auto-estimation, protocol validation, listing, and progression

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{create_test_database, create_test_user, create_user_with_program};
use fitflow_server::database::{Database, Vo2maxSessionFilters};
use fitflow_server::intelligence::vo2max::SessionMeasurements;
use fitflow_server::models::{CardioProtocol, DayType, ExperienceLevel};

fn norwegian_session() -> SessionMeasurements {
    SessionMeasurements {
        duration_minutes: 28,
        intervals_completed: Some(4),
        average_heart_rate: Some(165),
        peak_heart_rate: Some(185),
        estimated_vo2max: None,
    }
}

async fn cardio_workout(
    database: &Database,
    user_id: i64,
    program_id: i64,
    date: NaiveDate,
) -> Result<i64> {
    let days = database.get_program_days(program_id).await?;
    let cardio_day = days
        .into_iter()
        .find(|day| day.day_type == DayType::Vo2max)
        .ok_or_else(|| anyhow::anyhow!("Program has no cardio day"))?;
    let workout = database.create_workout(user_id, cardio_day.id, date).await?;
    Ok(workout.id)
}

#[tokio::test]
async fn test_cooper_estimate_from_age_when_heart_rate_present() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "runner").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let workout_id = cardio_workout(&database, user_id, program.id, date).await?;

    let session = database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, norwegian_session())
        .await?;

    // Cooper with age 30 and assumed resting HR 60:
    // 15.3 * (220 - 30) / 60 = 48.45
    let estimate = session
        .estimated_vo2max
        .ok_or_else(|| anyhow::anyhow!("Expected an auto-estimate"))?;
    assert!((estimate - 48.45).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_supplied_vo2max_wins_over_estimation() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "device_owner").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let workout_id = cardio_workout(&database, user_id, program.id, date).await?;

    let mut measurements = norwegian_session();
    measurements.estimated_vo2max = Some(52.3);
    let session = database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, measurements)
        .await?;
    assert_eq!(session.estimated_vo2max, Some(52.3));

    Ok(())
}

#[tokio::test]
async fn test_no_estimate_without_age_on_file() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = database
        .create_user("ageless", "$2b$12$hash", None, None, Some(ExperienceLevel::Beginner))
        .await?;
    database.create_default_program(user_id).await?;
    let program = database.get_active_program(user_id).await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let workout_id = cardio_workout(&database, user_id, program.id, date).await?;

    let session = database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, norwegian_session())
        .await?;
    assert_eq!(session.estimated_vo2max, None);

    Ok(())
}

#[tokio::test]
async fn test_protocol_validation() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "protocol_tester").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let workout_id = cardio_workout(&database, user_id, program.id, date).await?;

    // Too short
    let mut short = norwegian_session();
    short.duration_minutes = 5;
    assert!(database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, short)
        .await
        .is_err());

    // Five intervals do not fit a 4x4
    let mut extra = norwegian_session();
    extra.intervals_completed = Some(5);
    assert!(database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, extra)
        .await
        .is_err());

    // Zone 2 is steady state; intervals make no sense
    let mut zone2 = norwegian_session();
    zone2.duration_minutes = 60;
    assert!(database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Zone2, zone2)
        .await
        .is_err());

    let steady = SessionMeasurements {
        duration_minutes: 60,
        intervals_completed: None,
        average_heart_rate: Some(135),
        peak_heart_rate: Some(150),
        estimated_vo2max: None,
    };
    assert!(database
        .create_vo2max_session(user_id, workout_id, CardioProtocol::Zone2, steady)
        .await
        .is_ok());

    Ok(())
}

#[tokio::test]
async fn test_listing_filters_and_progression_order() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "progressor").await?;

    for (day, vo2max) in [(5, 46.0), (12, 47.2), (19, 48.1)] {
        let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let workout_id = cardio_workout(&database, user_id, program.id, date).await?;
        let mut measurements = norwegian_session();
        measurements.estimated_vo2max = Some(vo2max);
        database
            .create_vo2max_session(user_id, workout_id, CardioProtocol::Norwegian4x4, measurements)
            .await?;
    }
    let zone2_date = NaiveDate::from_ymd_opt(2026, 8, 21).unwrap();
    let zone2_workout = cardio_workout(&database, user_id, program.id, zone2_date).await?;
    database
        .create_vo2max_session(
            user_id,
            zone2_workout,
            CardioProtocol::Zone2,
            SessionMeasurements {
                duration_minutes: 60,
                intervals_completed: None,
                average_heart_rate: Some(132),
                peak_heart_rate: None,
                estimated_vo2max: Some(45.0),
            },
        )
        .await?;

    let all = database
        .list_vo2max_sessions(user_id, &Vo2maxSessionFilters::default())
        .await?;
    assert_eq!(all.len(), 4);
    // Newest first
    assert_eq!(all[0].date, zone2_date);

    let intervals_only = database
        .list_vo2max_sessions(
            user_id,
            &Vo2maxSessionFilters {
                protocol: Some(CardioProtocol::Norwegian4x4),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(intervals_only.len(), 3);

    let paged = database
        .list_vo2max_sessions(
            user_id,
            &Vo2maxSessionFilters {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(paged.len(), 2);

    let progression = database
        .get_vo2max_progression(user_id, None, None)
        .await?;
    assert_eq!(progression.len(), 4);
    // Oldest first, strictly non-decreasing dates
    assert!(progression.windows(2).all(|pair| pair[0].date <= pair[1].date));
    assert!((progression[0].estimated_vo2max - 46.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_sessions_are_isolated_between_users() -> Result<()> {
    let database = create_test_database().await?;
    let (owner_id, program) = create_user_with_program(&database, "session_owner").await?;
    let intruder_id = create_test_user(&database, "session_intruder").await?;

    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let workout_id = cardio_workout(&database, owner_id, program.id, date).await?;
    let session = database
        .create_vo2max_session(owner_id, workout_id, CardioProtocol::Norwegian4x4, norwegian_session())
        .await?;

    assert!(database
        .get_vo2max_session(intruder_id, session.id)
        .await
        .is_err());

    Ok(())
}
