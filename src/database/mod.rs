// ABOUTME: Database management for the FitFlow SQLite store
// ABOUTME: Owns the connection pool, runs migrations, and groups queries per domain

//! # Database Management
//!
//! `Database` wraps a `SqlitePool` and exposes the persistence operations,
//! grouped into one file per domain (`users`, `exercises`, `programs`,
//! `workouts`, `recovery`, `vo2max`, `body_weight`, `analytics`). Schema
//! creation is idempotent: every migration uses `CREATE TABLE IF NOT EXISTS`
//! and runs on startup.

mod analytics;
mod body_weight;
mod exercises;
mod programs;
mod recovery;
mod users;
mod vo2max;
mod workouts;

pub use analytics::{
    ConsistencyMetrics, CurrentWeekVolume, HistoricalVolumeRow, MuscleGroupVolumeRow,
    OneRepMaxPoint, VolumeTrendPoint, WeekVolume,
};
pub use body_weight::WeightChange;
pub use exercises::{ExerciseFilters, LastPerformance, SetPerformance};
pub use programs::{PhaseAdvancement, PlannedMuscleGroupVolume, ProgramVolumeAnalysis};
pub use users::UserProfileUpdate;
pub use vo2max::{Vo2maxProgressionPoint, Vo2maxSessionDetail, Vo2maxSessionFilters};
pub use workouts::{LoggedSet, NewSet};

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Database manager for the FitFlow store
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot connect or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Referential integrity is off by default in SQLite; enabling it via
        // the connect options applies it to every pooled connection
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database is private to its connection, so the pool
        // must hold exactly one and never let it close
        let in_memory = database_url.contains("memory");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .min_connections(u32::from(in_memory))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_exercises().await?;
        self.migrate_programs().await?;
        self.migrate_workouts().await?;
        self.migrate_recovery().await?;
        self.migrate_vo2max().await?;
        self.migrate_body_weight().await?;

        self.seed_exercise_catalog().await?;

        info!("Database migrations completed");
        Ok(())
    }
}
