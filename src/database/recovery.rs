// ABOUTME: Recovery assessment database operations
// ABOUTME: One assessment per user per day, upserted with its derived adjustment

use std::str::FromStr;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{RecoveryAssessment, VolumeAdjustment};
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::Row;

impl Database {
    /// Create the recovery assessments table
    pub(super) async fn migrate_recovery(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recovery_assessments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                sleep_quality INTEGER NOT NULL,
                muscle_soreness INTEGER NOT NULL,
                motivation INTEGER NOT NULL,
                total_score INTEGER NOT NULL,
                volume_adjustment TEXT NOT NULL
                    CHECK (volume_adjustment IN ('none', 'reduce_1_set', 'reduce_2_sets', 'rest_day')),
                UNIQUE (user_id, date)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store the day's assessment, replacing an earlier one for the same date
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or row decoding fails.
    pub async fn upsert_recovery_assessment(
        &self,
        user_id: i64,
        date: NaiveDate,
        sleep_quality: i64,
        muscle_soreness: i64,
        motivation: i64,
        total_score: i64,
        volume_adjustment: VolumeAdjustment,
    ) -> AppResult<RecoveryAssessment> {
        sqlx::query(
            r"
            INSERT INTO recovery_assessments
                (user_id, date, sleep_quality, muscle_soreness, motivation, total_score, volume_adjustment)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                sleep_quality = excluded.sleep_quality,
                muscle_soreness = excluded.muscle_soreness,
                motivation = excluded.motivation,
                total_score = excluded.total_score,
                volume_adjustment = excluded.volume_adjustment
            ",
        )
        .bind(user_id)
        .bind(date)
        .bind(sleep_quality)
        .bind(muscle_soreness)
        .bind(motivation)
        .bind(total_score)
        .bind(volume_adjustment.as_str())
        .execute(&self.pool)
        .await?;

        self.get_recovery_assessment(user_id, date)
            .await?
            .ok_or_else(|| AppError::internal("Upserted recovery assessment not found"))
    }

    /// Get the user's assessment for a date, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_recovery_assessment(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<RecoveryAssessment>> {
        let row = sqlx::query(
            "SELECT * FROM recovery_assessments WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_assessment(&row)).transpose()
    }

    /// List recent assessments, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn list_recovery_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> AppResult<Vec<RecoveryAssessment>> {
        let rows = sqlx::query(
            "SELECT * FROM recovery_assessments WHERE user_id = ? ORDER BY date DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_assessment).collect()
    }
}

fn row_to_assessment(row: &sqlx::sqlite::SqliteRow) -> AppResult<RecoveryAssessment> {
    let date: NaiveDate = row.try_get("date")?;
    let adjustment: String = row.try_get("volume_adjustment")?;

    Ok(RecoveryAssessment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        date,
        sleep_quality: row.try_get("sleep_quality")?,
        muscle_soreness: row.try_get("muscle_soreness")?,
        motivation: row.try_get("motivation")?,
        total_score: row.try_get("total_score")?,
        volume_adjustment: VolumeAdjustment::from_str(&adjustment)?,
    })
}
