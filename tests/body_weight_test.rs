// ABOUTME: Integration tests for the body weight log
// ABOUTME: Covers per-day upsert, history, latest lookup, and trailing change

mod common;

use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use common::{create_test_database, create_test_user};

#[tokio::test]
async fn test_same_day_entry_is_replaced() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "weigher").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

    let morning = database
        .log_body_weight(user_id, date, 81.2, Some("before breakfast"))
        .await?;
    let evening = database.log_body_weight(user_id, date, 82.0, None).await?;

    assert_eq!(morning.id, evening.id);
    assert!((evening.weight_kg - 82.0).abs() < f64::EPSILON);
    assert_eq!(evening.notes, None);

    let history = database.get_body_weight_history(user_id, 30).await?;
    assert_eq!(history.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_implausible_weight_is_rejected() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "typo_maker").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

    assert!(database.log_body_weight(user_id, date, 8.2, None).await.is_err());
    assert!(database.log_body_weight(user_id, date, 820.0, None).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_history_is_newest_first_and_limited() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "regular").await?;

    for day in 1..=5 {
        let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        database
            .log_body_weight(user_id, date, 80.0 + f64::from(day), None)
            .await?;
    }

    let history = database.get_body_weight_history(user_id, 3).await?;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
    assert!(history.windows(2).all(|pair| pair[0].date > pair[1].date));

    let latest = database
        .get_latest_body_weight(user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Expected a latest entry"))?;
    assert!((latest.weight_kg - 85.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_weight_change_over_trailing_period() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "cutter").await?;
    let today = Utc::now().date_naive();

    // Baseline 40 days back, latest today
    database
        .log_body_weight(user_id, today - Days::new(40), 84.0, None)
        .await?;
    database.log_body_weight(user_id, today, 80.0, None).await?;

    let change = database
        .get_weight_change(user_id, 30)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Expected a weight change"))?;
    assert!((change.weight_change_kg + 4.0).abs() < 1e-9);
    assert!((change.percentage_change + 4.0 / 84.0 * 100.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_weight_change_requires_a_baseline() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "newcomer").await?;
    let today = Utc::now().date_naive();

    assert!(database.get_weight_change(user_id, 30).await?.is_none());

    // Only recent entries, nothing at or before the cutoff
    database.log_body_weight(user_id, today, 80.0, None).await?;
    assert!(database.get_weight_change(user_id, 30).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_requires_ownership() -> Result<()> {
    let database = create_test_database().await?;
    let owner_id = create_test_user(&database, "entry_owner").await?;
    let intruder_id = create_test_user(&database, "entry_intruder").await?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

    let entry = database.log_body_weight(owner_id, date, 80.0, None).await?;

    assert!(database.delete_body_weight(intruder_id, entry.id).await.is_err());
    database.delete_body_weight(owner_id, entry.id).await?;
    assert!(database.get_latest_body_weight(owner_id).await?.is_none());

    Ok(())
}
