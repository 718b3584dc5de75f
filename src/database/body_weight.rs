// ABOUTME: Body weight log database operations
// ABOUTME: One entry per user per day with history, latest lookup, and change over a period

use super::Database;
use crate::constants::weight_limits;
use crate::errors::{AppError, AppResult};
use crate::models::BodyWeightEntry;
use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use sqlx::Row;

/// Weight change over a trailing period
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightChange {
    /// Difference between the latest entry and the period baseline (kg)
    pub weight_change_kg: f64,
    /// Change relative to the baseline, in percent
    pub percentage_change: f64,
}

impl Database {
    /// Create the body weight table
    pub(super) async fn migrate_body_weight(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS body_weight (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                weight_kg REAL NOT NULL,
                notes TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user_id, date)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Log a body weight entry, replacing an earlier one for the same date
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an implausible weight.
    pub async fn log_body_weight(
        &self,
        user_id: i64,
        date: NaiveDate,
        weight_kg: f64,
        notes: Option<&str>,
    ) -> AppResult<BodyWeightEntry> {
        if !(weight_limits::MIN_KG..=weight_limits::MAX_KG).contains(&weight_kg) {
            return Err(AppError::out_of_range(format!(
                "Body weight must be between {} and {} kg, got {weight_kg}",
                weight_limits::MIN_KG,
                weight_limits::MAX_KG
            )));
        }

        sqlx::query(
            r"
            INSERT INTO body_weight (user_id, date, weight_kg, notes)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                notes = excluded.notes
            ",
        )
        .bind(user_id)
        .bind(date)
        .bind(weight_kg)
        .bind(notes)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT * FROM body_weight WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .fetch_one(&self.pool)
            .await?;
        row_to_entry(&row)
    }

    /// List entries, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_body_weight_history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> AppResult<Vec<BodyWeightEntry>> {
        // 30 by default, at most a year of daily entries
        let limit = limit.clamp(1, 365);

        let rows = sqlx::query(
            r"
            SELECT * FROM body_weight
            WHERE user_id = ?
            ORDER BY date DESC, created_at DESC
            LIMIT ?
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Delete one entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an entry the user does not own.
    pub async fn delete_body_weight(&self, user_id: i64, entry_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM body_weight WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Body weight entry"));
        }
        Ok(())
    }

    /// The user's most recent entry, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_latest_body_weight(
        &self,
        user_id: i64,
    ) -> AppResult<Option<BodyWeightEntry>> {
        let row = sqlx::query(
            r"
            SELECT * FROM body_weight
            WHERE user_id = ?
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_entry(&row)).transpose()
    }

    /// Weight change over the trailing `days`, if both endpoints exist
    ///
    /// The baseline is the latest entry on or before `days` days ago.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_weight_change(
        &self,
        user_id: i64,
        days: u64,
    ) -> AppResult<Option<WeightChange>> {
        let Some(latest) = self.get_latest_body_weight(user_id).await? else {
            return Ok(None);
        };

        let cutoff = Utc::now().date_naive() - Days::new(days);
        let baseline = sqlx::query(
            r"
            SELECT * FROM body_weight
            WHERE user_id = ? AND date <= ?
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_optional(&self.pool)
        .await?;

        let Some(baseline) = baseline.map(|row| row_to_entry(&row)).transpose()? else {
            return Ok(None);
        };
        if baseline.weight_kg <= 0.0 {
            return Ok(None);
        }

        let weight_change_kg = latest.weight_kg - baseline.weight_kg;
        Ok(Some(WeightChange {
            weight_change_kg,
            percentage_change: weight_change_kg / baseline.weight_kg * 100.0,
        }))
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> AppResult<BodyWeightEntry> {
    let date: NaiveDate = row.try_get("date")?;

    Ok(BodyWeightEntry {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        date,
        weight_kg: row.try_get("weight_kg")?,
        notes: row.try_get("notes")?,
    })
}
