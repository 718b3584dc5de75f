// ABOUTME: VO2max cardio session database operations
// ABOUTME: Session storage with Cooper auto-estimation, filtered listings, and progression

use std::str::FromStr;

use super::Database;
use crate::constants::analytics_limits;
use crate::errors::{AppError, AppResult};
use crate::intelligence::vo2max::{self, SessionMeasurements};
use crate::models::{CardioProtocol, Vo2maxSession};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::Row;
use tracing::{debug, warn};

/// Listing filters for VO2max sessions
#[derive(Debug, Clone, Default)]
pub struct Vo2maxSessionFilters {
    /// Earliest workout date to include
    pub start_date: Option<NaiveDate>,
    /// Latest workout date to include
    pub end_date: Option<NaiveDate>,
    /// Restrict to one protocol
    pub protocol: Option<CardioProtocol>,
    /// Page size, capped at the documented maximum
    pub limit: Option<i64>,
    /// Page offset
    pub offset: Option<i64>,
}

/// A session joined with its workout date
#[derive(Debug, Clone, Serialize)]
pub struct Vo2maxSessionDetail {
    /// The stored session
    #[serde(flatten)]
    pub session: Vo2maxSession,
    /// Workout date
    pub date: NaiveDate,
}

/// One point of the VO2max progression series
#[derive(Debug, Clone, Serialize)]
pub struct Vo2maxProgressionPoint {
    /// Workout date
    pub date: NaiveDate,
    /// Estimated VO2max (ml/kg/min)
    pub estimated_vo2max: f64,
    /// Protocol of the session
    pub protocol: CardioProtocol,
}

impl Database {
    /// Create the VO2max sessions table
    pub(super) async fn migrate_vo2max(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS vo2max_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                protocol TEXT NOT NULL CHECK (protocol IN ('norwegian_4x4', 'zone2')),
                duration_minutes INTEGER NOT NULL,
                intervals_completed INTEGER,
                average_heart_rate INTEGER,
                peak_heart_rate INTEGER,
                estimated_vo2max REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_vo2max_workout ON vo2max_sessions(workout_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a cardio session against a workout
    ///
    /// When no VO2max is supplied but a heart rate was measured, the Cooper
    /// formula estimates one from the user's age. Users without an age on
    /// file store no estimate.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange`/`InvalidInput` for measurements outside
    /// protocol limits, and `ResourceNotFound` for a workout the user does
    /// not own.
    pub async fn create_vo2max_session(
        &self,
        user_id: i64,
        workout_id: i64,
        protocol: CardioProtocol,
        measurements: SessionMeasurements,
    ) -> AppResult<Vo2maxSession> {
        vo2max::validate_session(protocol, &measurements)?;
        self.get_workout(user_id, workout_id).await?;

        let estimated_vo2max = match (measurements.estimated_vo2max, measurements.average_heart_rate)
        {
            (Some(supplied), _) => Some(supplied),
            (None, Some(_)) => {
                let user = self.get_user_by_id(user_id).await?;
                match user.age {
                    Some(age) => {
                        let estimate = vo2max::cooper_estimate(age)?;
                        debug!(workout_id, age, estimate, "Auto-estimated VO2max");
                        Some(estimate)
                    }
                    None => {
                        warn!(workout_id, "Cannot estimate VO2max: user age not on file");
                        None
                    }
                }
            }
            (None, None) => None,
        };

        let id = sqlx::query(
            r"
            INSERT INTO vo2max_sessions
                (workout_id, protocol, duration_minutes, intervals_completed,
                 average_heart_rate, peak_heart_rate, estimated_vo2max)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(workout_id)
        .bind(protocol.as_str())
        .bind(measurements.duration_minutes)
        .bind(measurements.intervals_completed)
        .bind(measurements.average_heart_rate)
        .bind(measurements.peak_heart_rate)
        .bind(estimated_vo2max)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Vo2maxSession {
            id,
            workout_id,
            protocol,
            duration_minutes: measurements.duration_minutes,
            intervals_completed: measurements.intervals_completed,
            average_heart_rate: measurements.average_heart_rate,
            peak_heart_rate: measurements.peak_heart_rate,
            estimated_vo2max,
        })
    }

    /// List the user's sessions, newest first, with filters and pagination
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn list_vo2max_sessions(
        &self,
        user_id: i64,
        filters: &Vo2maxSessionFilters,
    ) -> AppResult<Vec<Vo2maxSessionDetail>> {
        let limit = filters
            .limit
            .unwrap_or(analytics_limits::DEFAULT_PAGE_SIZE)
            .clamp(1, analytics_limits::MAX_PAGE_SIZE);
        let offset = filters.offset.unwrap_or(0).max(0);

        let rows = sqlx::query(
            r"
            SELECT v.*, w.date
            FROM vo2max_sessions v
            JOIN workouts w ON v.workout_id = w.id
            WHERE w.user_id = ?
              AND (? IS NULL OR w.date >= ?)
              AND (? IS NULL OR w.date <= ?)
              AND (? IS NULL OR v.protocol = ?)
            ORDER BY w.date DESC, v.id DESC
            LIMIT ? OFFSET ?
            ",
        )
        .bind(user_id)
        .bind(filters.start_date)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(filters.end_date)
        .bind(filters.protocol.map(|p| p.as_str()))
        .bind(filters.protocol.map(|p| p.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_session_detail).collect()
    }

    /// Get one session owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing session or one owned by
    /// another user.
    pub async fn get_vo2max_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> AppResult<Vo2maxSessionDetail> {
        let row = sqlx::query(
            r"
            SELECT v.*, w.date
            FROM vo2max_sessions v
            JOIN workouts w ON v.workout_id = w.id
            WHERE v.id = ? AND w.user_id = ?
            ",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or_else(
            || Err(AppError::not_found("VO2max session")),
            |row| row_to_session_detail(&row),
        )
    }

    /// VO2max estimates over time, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_vo2max_progression(
        &self,
        user_id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Vo2maxProgressionPoint>> {
        let rows = sqlx::query(
            r"
            SELECT w.date, v.estimated_vo2max, v.protocol
            FROM vo2max_sessions v
            JOIN workouts w ON v.workout_id = w.id
            WHERE w.user_id = ?
              AND v.estimated_vo2max IS NOT NULL
              AND (? IS NULL OR w.date >= ?)
              AND (? IS NULL OR w.date <= ?)
            ORDER BY w.date ASC
            ",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(start_date)
        .bind(end_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let protocol: String = row.try_get("protocol")?;
                Ok(Vo2maxProgressionPoint {
                    date: row.try_get("date")?,
                    estimated_vo2max: row.try_get("estimated_vo2max")?,
                    protocol: CardioProtocol::from_str(&protocol)?,
                })
            })
            .collect()
    }
}

fn row_to_session_detail(row: &sqlx::sqlite::SqliteRow) -> AppResult<Vo2maxSessionDetail> {
    let protocol: String = row.try_get("protocol")?;

    Ok(Vo2maxSessionDetail {
        session: Vo2maxSession {
            id: row.try_get("id")?,
            workout_id: row.try_get("workout_id")?,
            protocol: CardioProtocol::from_str(&protocol)?,
            duration_minutes: row.try_get("duration_minutes")?,
            intervals_completed: row.try_get("intervals_completed")?,
            average_heart_rate: row.try_get("average_heart_rate")?,
            peak_heart_rate: row.try_get("peak_heart_rate")?,
            estimated_vo2max: row.try_get("estimated_vo2max")?,
        },
        date: row.try_get("date")?,
    })
}
