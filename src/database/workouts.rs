// ABOUTME: Workout session and set logging database operations
// ABOUTME: Session lifecycle, idempotent set logging, and completion aggregates

use std::str::FromStr;

use super::Database;
use crate::constants::set_limits;
use crate::errors::{AppError, AppResult};
use crate::intelligence::one_rep_max;
use crate::models::{Workout, WorkoutSet, WorkoutStatus};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::Row;
use tracing::debug;

/// Input for logging one set
#[derive(Debug, Clone)]
pub struct NewSet {
    /// Client-assigned id for idempotent retries; a resent id returns the
    /// already-stored set instead of inserting a duplicate
    pub client_id: Option<i64>,
    /// Catalog exercise id
    pub exercise_id: i64,
    /// Set number within the exercise; autonumbered when absent
    pub set_number: Option<i64>,
    /// Load in kilograms
    pub weight_kg: f64,
    /// Repetitions performed
    pub reps: i64,
    /// Reps-in-reserve at set end
    pub rir: i64,
    /// Logging timestamp; defaults to now
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// A stored set with its estimated one-rep max
#[derive(Debug, Clone, Serialize)]
pub struct LoggedSet {
    /// The stored set
    #[serde(flatten)]
    pub set: WorkoutSet,
    /// Epley-RIR estimate from this set, rounded to one decimal
    pub estimated_1rm: f64,
    /// False when the set was newly inserted, true for an idempotent replay
    pub deduplicated: bool,
}

impl Database {
    /// Create workout and set tables
    pub(super) async fn migrate_workouts(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                program_day_id INTEGER NOT NULL REFERENCES program_days(id),
                date TEXT NOT NULL,
                started_at DATETIME,
                completed_at DATETIME,
                status TEXT NOT NULL DEFAULT 'not_started'
                    CHECK (status IN ('not_started', 'in_progress', 'completed', 'cancelled')),
                total_volume_kg REAL NOT NULL DEFAULT 0,
                average_rir REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id),
                set_number INTEGER NOT NULL,
                weight_kg REAL NOT NULL,
                reps INTEGER NOT NULL,
                rir INTEGER NOT NULL,
                timestamp DATETIME NOT NULL,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sets_workout ON sets(workout_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sets_exercise ON sets(exercise_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a workout session for a program day
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a program day the user does not own.
    pub async fn create_workout(
        &self,
        user_id: i64,
        program_day_id: i64,
        date: NaiveDate,
    ) -> AppResult<Workout> {
        self.get_program_day(user_id, program_day_id).await?;

        let id = sqlx::query(
            "INSERT INTO workouts (user_id, program_day_id, date) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(program_day_id)
        .bind(date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_workout(user_id, id).await
    }

    /// Get a workout owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing workout or one owned by
    /// another user.
    pub async fn get_workout(&self, user_id: i64, workout_id: i64) -> AppResult<Workout> {
        let row = sqlx::query("SELECT * FROM workouts WHERE id = ? AND user_id = ?")
            .bind(workout_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map_or_else(
            || Err(AppError::not_found("Workout")),
            |row| row_to_workout(&row),
        )
    }

    /// List the user's workouts, newest first, with optional date bounds
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn list_workouts(
        &self,
        user_id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM workouts
            WHERE user_id = ?
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            ORDER BY date DESC, id DESC
            ",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(start_date)
        .bind(end_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Move a workout through its lifecycle
    ///
    /// Starting a session stamps `started_at` once; completing it stamps
    /// `completed_at` and recomputes the volume-load and average-RIR
    /// aggregates from the logged sets.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a workout the user does not own.
    pub async fn update_workout_status(
        &self,
        user_id: i64,
        workout_id: i64,
        status: WorkoutStatus,
    ) -> AppResult<Workout> {
        self.get_workout(user_id, workout_id).await?;

        match status {
            WorkoutStatus::InProgress => {
                sqlx::query(
                    r"
                    UPDATE workouts SET
                        status = 'in_progress',
                        started_at = COALESCE(started_at, CURRENT_TIMESTAMP)
                    WHERE id = ?
                    ",
                )
                .bind(workout_id)
                .execute(&self.pool)
                .await?;
            }
            WorkoutStatus::Completed => {
                sqlx::query(
                    r"
                    UPDATE workouts SET
                        status = 'completed',
                        completed_at = CURRENT_TIMESTAMP,
                        total_volume_kg = COALESCE(
                            (SELECT SUM(weight_kg * reps) FROM sets WHERE workout_id = ?), 0),
                        average_rir =
                            (SELECT AVG(rir) FROM sets WHERE workout_id = ?)
                    WHERE id = ?
                    ",
                )
                .bind(workout_id)
                .bind(workout_id)
                .bind(workout_id)
                .execute(&self.pool)
                .await?;
            }
            WorkoutStatus::Cancelled | WorkoutStatus::NotStarted => {
                sqlx::query("UPDATE workouts SET status = ? WHERE id = ?")
                    .bind(status.as_str())
                    .bind(workout_id)
                    .execute(&self.pool)
                    .await?;
            }
        }

        self.get_workout(user_id, workout_id).await
    }

    /// Log one set against a workout, idempotently
    ///
    /// A resent `client_id` that already exists for the workout returns the
    /// stored set unchanged, so mobile clients can retry safely.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for weight, reps, RIR, or notes outside the
    /// documented ranges, and `ResourceNotFound` for a workout the user does
    /// not own.
    pub async fn log_set(&self, user_id: i64, workout_id: i64, set: NewSet) -> AppResult<LoggedSet> {
        validate_set_input(&set)?;
        self.get_workout(user_id, workout_id).await?;
        self.get_exercise_by_id(set.exercise_id).await?;

        if let Some(client_id) = set.client_id {
            let existing = sqlx::query("SELECT * FROM sets WHERE workout_id = ? AND id = ?")
                .bind(workout_id)
                .bind(client_id)
                .fetch_optional(&self.pool)
                .await?;
            if let Some(row) = existing {
                let stored = row_to_set(&row)?;
                debug!(workout_id, set_id = stored.id, "Deduplicated resent set");
                return Ok(logged(stored, true));
            }
        }

        let set_number = match set.set_number {
            Some(n) => n,
            None => {
                let row = sqlx::query(
                    "SELECT COUNT(*) AS n FROM sets WHERE workout_id = ? AND exercise_id = ?",
                )
                .bind(workout_id)
                .bind(set.exercise_id)
                .fetch_one(&self.pool)
                .await?;
                let count: i64 = row.try_get("n")?;
                count + 1
            }
        };

        let timestamp = set.timestamp.unwrap_or_else(Utc::now);
        let id = sqlx::query(
            r"
            INSERT INTO sets (workout_id, exercise_id, set_number, weight_kg, reps, rir, timestamp, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(workout_id)
        .bind(set.exercise_id)
        .bind(set_number)
        .bind(set.weight_kg)
        .bind(set.reps)
        .bind(set.rir)
        .bind(timestamp)
        .bind(&set.notes)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        let stored = WorkoutSet {
            id,
            workout_id,
            exercise_id: set.exercise_id,
            set_number,
            weight_kg: set.weight_kg,
            reps: set.reps,
            rir: set.rir,
            timestamp,
            notes: set.notes,
        };
        debug!(
            workout_id,
            set_id = id,
            weight_kg = set.weight_kg,
            reps = set.reps,
            rir = set.rir,
            "Logged set"
        );
        Ok(logged(stored, false))
    }

    /// List a workout's sets in logged order
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a workout the user does not own.
    pub async fn get_sets_for_workout(
        &self,
        user_id: i64,
        workout_id: i64,
    ) -> AppResult<Vec<WorkoutSet>> {
        self.get_workout(user_id, workout_id).await?;

        let rows = sqlx::query(
            "SELECT * FROM sets WHERE workout_id = ? ORDER BY exercise_id, set_number",
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_set).collect()
    }

    /// Delete one logged set
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a set the user does not own.
    pub async fn delete_set(&self, user_id: i64, set_id: i64) -> AppResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM sets WHERE id = ? AND workout_id IN
                (SELECT id FROM workouts WHERE user_id = ?)
            ",
        )
        .bind(set_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Set"));
        }
        Ok(())
    }
}

fn validate_set_input(set: &NewSet) -> AppResult<()> {
    if !(set_limits::WEIGHT_KG_MIN..=set_limits::WEIGHT_KG_MAX).contains(&set.weight_kg) {
        return Err(AppError::out_of_range(format!(
            "Weight must be between {} and {} kg, got {}",
            set_limits::WEIGHT_KG_MIN,
            set_limits::WEIGHT_KG_MAX,
            set.weight_kg
        )));
    }
    if !(set_limits::REPS_MIN..=set_limits::REPS_MAX).contains(&set.reps) {
        return Err(AppError::out_of_range(format!(
            "Reps must be between {} and {}, got {}",
            set_limits::REPS_MIN,
            set_limits::REPS_MAX,
            set.reps
        )));
    }
    if !(set_limits::RIR_MIN..=set_limits::RIR_MAX).contains(&set.rir) {
        return Err(AppError::out_of_range(format!(
            "RIR must be between {} and {}, got {}",
            set_limits::RIR_MIN,
            set_limits::RIR_MAX,
            set.rir
        )));
    }
    if let Some(notes) = &set.notes {
        if notes.len() > set_limits::NOTES_MAX_LENGTH {
            return Err(AppError::out_of_range(format!(
                "Notes must be at most {} characters",
                set_limits::NOTES_MAX_LENGTH
            )));
        }
    }
    Ok(())
}

fn logged(set: WorkoutSet, deduplicated: bool) -> LoggedSet {
    let estimate = one_rep_max::estimate(set.weight_kg, set.reps, set.rir);
    LoggedSet {
        set,
        estimated_1rm: (estimate * 10.0).round() / 10.0,
        deduplicated,
    }
}

pub(super) fn row_to_workout(row: &sqlx::sqlite::SqliteRow) -> AppResult<Workout> {
    let status: String = row.try_get("status")?;
    let date: NaiveDate = row.try_get("date")?;
    let started_at: Option<DateTime<Utc>> = row.try_get("started_at")?;
    let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at")?;

    Ok(Workout {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        program_day_id: row.try_get("program_day_id")?,
        date,
        started_at,
        completed_at,
        status: WorkoutStatus::from_str(&status)?,
        total_volume_kg: row.try_get("total_volume_kg")?,
        average_rir: row.try_get("average_rir")?,
    })
}

pub(super) fn row_to_set(row: &sqlx::sqlite::SqliteRow) -> AppResult<WorkoutSet> {
    let timestamp: DateTime<Utc> = row.try_get("timestamp")?;

    Ok(WorkoutSet {
        id: row.try_get("id")?,
        workout_id: row.try_get("workout_id")?,
        exercise_id: row.try_get("exercise_id")?,
        set_number: row.try_get("set_number")?,
        weight_kg: row.try_get("weight_kg")?,
        reps: row.try_get("reps")?,
        rir: row.try_get("rir")?,
        timestamp,
        notes: row.try_get("notes")?,
    })
}
