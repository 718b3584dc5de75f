// ABOUTME: Integration tests for recovery assessments
// ABOUTME: Covers threshold mapping, per-day upsert, and listing

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{create_test_database, create_test_user};
use fitflow_server::config::fitness::RecoveryPolicy;
use fitflow_server::database::Database;
use fitflow_server::intelligence::recovery;
use fitflow_server::models::VolumeAdjustment;

async fn submit(
    database: &Database,
    user_id: i64,
    date: NaiveDate,
    scores: (i64, i64, i64),
) -> Result<fitflow_server::models::RecoveryAssessment> {
    let (sleep, soreness, motivation) = scores;
    let assessment = recovery::assess(sleep, soreness, motivation, &RecoveryPolicy::default())?;
    let stored = database
        .upsert_recovery_assessment(
            user_id,
            date,
            sleep,
            soreness,
            motivation,
            assessment.total_score,
            assessment.volume_adjustment,
        )
        .await?;
    Ok(stored)
}

#[tokio::test]
async fn test_score_thresholds_map_to_adjustments() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "recoverer").await?;

    let cases = [
        ((5, 4, 4), 13, VolumeAdjustment::None),
        ((3, 3, 3), 9, VolumeAdjustment::ReduceOneSet),
        ((2, 2, 2), 6, VolumeAdjustment::ReduceTwoSets),
        ((1, 2, 2), 5, VolumeAdjustment::RestDay),
    ];

    for (offset, (scores, total, expected)) in cases.into_iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1 + u32::try_from(offset)?).unwrap();
        let stored = submit(&database, user_id, date, scores).await?;
        assert_eq!(stored.total_score, total);
        assert_eq!(stored.volume_adjustment, expected);
    }

    Ok(())
}

#[tokio::test]
async fn test_resubmission_replaces_same_day_assessment() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "resubmitter").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

    let morning = submit(&database, user_id, date, (2, 2, 2)).await?;
    assert_eq!(morning.volume_adjustment, VolumeAdjustment::ReduceTwoSets);

    // Feeling better after breakfast
    let revised = submit(&database, user_id, date, (4, 4, 4)).await?;
    assert_eq!(revised.total_score, 12);
    assert_eq!(revised.volume_adjustment, VolumeAdjustment::None);

    let listed = database.list_recovery_assessments(user_id, 10).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total_score, 12);

    Ok(())
}

#[tokio::test]
async fn test_lookup_by_date() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "looker").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

    assert!(database
        .get_recovery_assessment(user_id, date)
        .await?
        .is_none());

    submit(&database, user_id, date, (4, 3, 4)).await?;
    let found = database
        .get_recovery_assessment(user_id, date)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Expected stored assessment"))?;
    assert_eq!(found.total_score, 11);
    assert_eq!(found.volume_adjustment, VolumeAdjustment::ReduceOneSet);

    Ok(())
}

#[tokio::test]
async fn test_subscores_outside_scale_are_rejected() {
    let policy = RecoveryPolicy::default();
    assert!(recovery::assess(0, 3, 3, &policy).is_err());
    assert!(recovery::assess(3, 6, 3, &policy).is_err());
    assert!(recovery::assess(3, 3, -1, &policy).is_err());
}
