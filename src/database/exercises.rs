// ABOUTME: Exercise catalog database operations
// ABOUTME: Seeds the built-in catalog and serves filtered lookups and last-performance history

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::one_rep_max;
use crate::models::Exercise;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{QueryBuilder, Row, Sqlite};

/// Optional catalog filters, combined with AND
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilters {
    /// Match primary or secondary muscle group
    pub muscle_group: Option<String>,
    /// Match required equipment
    pub equipment: Option<String>,
    /// Match movement pattern (compound or isolation)
    pub movement_pattern: Option<String>,
}

/// One set from a previous workout, used for progressive overload targets
#[derive(Debug, Clone, Serialize)]
pub struct SetPerformance {
    /// Load in kilograms
    pub weight_kg: f64,
    /// Repetitions performed
    pub reps: i64,
    /// Reps-in-reserve at set end
    pub rir: i64,
}

/// Most recent completed performance of an exercise
#[derive(Debug, Clone, Serialize)]
pub struct LastPerformance {
    /// Date of the most recent completed workout containing the exercise
    pub last_workout_date: NaiveDate,
    /// All sets of the exercise from that workout, in logged order
    pub sets: Vec<SetPerformance>,
    /// Best estimated 1RM across those sets, rounded to one decimal
    pub estimated_1rm: f64,
}

/// Built-in catalog rows: name, primary group, secondary groups, equipment, pattern
type CatalogRow = (&'static str, &'static str, &'static [&'static str], &'static str, &'static str);

const EXERCISE_CATALOG: &[CatalogRow] = &[
    // Chest
    ("Barbell Bench Press", "chest", &["front_delts", "triceps"], "barbell", "compound"),
    ("Dumbbell Bench Press", "chest", &["front_delts", "triceps"], "dumbbell", "compound"),
    ("Incline Dumbbell Press", "chest", &["front_delts", "triceps"], "dumbbell", "compound"),
    ("Cable Flyes", "chest", &[], "cable", "isolation"),
    ("Dips", "chest", &["triceps", "front_delts"], "bodyweight", "compound"),
    // Back
    ("Conventional Deadlift", "lower_back", &["glutes", "hamstrings", "traps"], "barbell", "compound"),
    ("Pull-Ups", "lats", &["biceps", "mid_back"], "bodyweight", "compound"),
    ("Barbell Row", "mid_back", &["lats", "biceps"], "barbell", "compound"),
    ("Lat Pulldown", "lats", &["biceps"], "cable", "compound"),
    ("Seated Cable Row", "mid_back", &["lats", "biceps"], "cable", "compound"),
    ("Face Pulls", "rear_delts", &["mid_back"], "cable", "isolation"),
    ("Barbell Shrugs", "traps", &[], "barbell", "isolation"),
    // Shoulders
    ("Overhead Press", "front_delts", &["side_delts", "triceps"], "barbell", "compound"),
    ("Lateral Raises", "side_delts", &[], "dumbbell", "isolation"),
    ("Cable Lateral Raises", "side_delts", &[], "cable", "isolation"),
    ("Rear Delt Flyes", "rear_delts", &[], "dumbbell", "isolation"),
    // Arms
    ("Barbell Curl", "biceps", &["forearms"], "barbell", "isolation"),
    ("Hammer Curl", "biceps", &["brachialis", "forearms"], "dumbbell", "isolation"),
    ("Tricep Pushdown", "triceps", &[], "cable", "isolation"),
    ("Close-Grip Bench Press", "triceps", &["chest", "front_delts"], "barbell", "compound"),
    ("Skull Crushers", "triceps", &[], "barbell", "isolation"),
    // Legs
    ("Barbell Back Squat", "quads", &["glutes", "hamstrings"], "barbell", "compound"),
    ("Front Squat", "quads", &["glutes", "abs"], "barbell", "compound"),
    ("Leg Press", "quads", &["glutes"], "machine", "compound"),
    ("Romanian Deadlift", "hamstrings", &["glutes", "lower_back"], "barbell", "compound"),
    ("Leg Curl", "hamstrings", &[], "machine", "isolation"),
    ("Leg Extension", "quads", &[], "machine", "isolation"),
    ("Hip Thrust", "glutes", &["hamstrings"], "barbell", "compound"),
    ("Standing Calf Raise", "calves", &[], "machine", "isolation"),
    // Core
    ("Cable Crunch", "abs", &[], "cable", "isolation"),
    ("Hanging Leg Raise", "abs", &["obliques"], "bodyweight", "isolation"),
    ("Plank", "abs", &["obliques"], "bodyweight", "isolation"),
];

impl Database {
    /// Create the exercises table
    pub(super) async fn migrate_exercises(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                primary_muscle_group TEXT NOT NULL,
                secondary_muscle_groups TEXT NOT NULL DEFAULT '[]',
                equipment TEXT NOT NULL
                    CHECK (equipment IN ('barbell', 'dumbbell', 'cable', 'machine', 'bodyweight')),
                movement_pattern TEXT NOT NULL
                    CHECK (movement_pattern IN ('compound', 'isolation')),
                description TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercises_muscle_group \
             ON exercises(primary_muscle_group)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert the built-in exercise catalog, skipping rows that already exist
    pub(super) async fn seed_exercise_catalog(&self) -> Result<()> {
        for (name, primary, secondary, equipment, pattern) in EXERCISE_CATALOG {
            let secondary_json = serde_json::to_string(secondary)?;
            sqlx::query(
                r"
                INSERT OR IGNORE INTO exercises
                    (name, primary_muscle_group, secondary_muscle_groups, equipment, movement_pattern)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(name)
            .bind(primary)
            .bind(secondary_json)
            .bind(equipment)
            .bind(pattern)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// List catalog exercises matching the given filters, ordered by name
    ///
    /// A muscle-group filter matches the primary group or any secondary group.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_exercises(&self, filters: &ExerciseFilters) -> AppResult<Vec<Exercise>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM exercises WHERE 1=1");

        if let Some(muscle_group) = &filters.muscle_group {
            query.push(" AND (primary_muscle_group = ");
            query.push_bind(muscle_group);
            query.push(" OR secondary_muscle_groups LIKE ");
            query.push_bind(format!("%\"{muscle_group}\"%"));
            query.push(")");
        }
        if let Some(equipment) = &filters.equipment {
            query.push(" AND equipment = ");
            query.push_bind(equipment);
        }
        if let Some(pattern) = &filters.movement_pattern {
            query.push(" AND movement_pattern = ");
            query.push_bind(pattern);
        }
        query.push(" ORDER BY name");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_exercise).collect()
    }

    /// Look up a catalog exercise by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such exercise exists.
    pub async fn get_exercise_by_id(&self, exercise_id: i64) -> AppResult<Exercise> {
        let row = sqlx::query("SELECT * FROM exercises WHERE id = ?")
            .bind(exercise_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map_or_else(
            || Err(AppError::not_found("Exercise")),
            |row| row_to_exercise(&row),
        )
    }

    /// Look up a catalog exercise id by exact name
    pub(super) async fn get_exercise_id_by_name(&self, name: &str) -> AppResult<i64> {
        let row = sqlx::query("SELECT id FROM exercises WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map_or_else(
            || Err(AppError::not_found("Exercise")),
            |row| Ok(row.try_get("id")?),
        )
    }

    /// Get the sets of an exercise from the user's most recent completed workout
    ///
    /// Excludes in-progress workouts so the current session never shows up as
    /// its own history. Returns `None` when no completed history exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_last_performance(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> AppResult<Option<LastPerformance>> {
        let last_workout = sqlx::query(
            r"
            SELECT DISTINCT w.id, w.date
            FROM workouts w
            JOIN sets s ON s.workout_id = w.id
            WHERE w.user_id = ?
              AND s.exercise_id = ?
              AND w.status = 'completed'
            ORDER BY w.date DESC, w.completed_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(workout_row) = last_workout else {
            return Ok(None);
        };
        let workout_id: i64 = workout_row.try_get("id")?;
        let date: NaiveDate = workout_row.try_get("date")?;

        let set_rows = sqlx::query(
            r"
            SELECT weight_kg, reps, rir
            FROM sets
            WHERE workout_id = ? AND exercise_id = ?
            ORDER BY set_number ASC
            ",
        )
        .bind(workout_id)
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await?;

        let sets: Vec<SetPerformance> = set_rows
            .iter()
            .map(|row| {
                Ok(SetPerformance {
                    weight_kg: row.try_get("weight_kg")?,
                    reps: row.try_get("reps")?,
                    rir: row.try_get("rir")?,
                })
            })
            .collect::<AppResult<_>>()?;

        if sets.is_empty() {
            return Ok(None);
        }

        let estimated_1rm = sets
            .iter()
            .map(|set| one_rep_max::estimate(set.weight_kg, set.reps, set.rir))
            .fold(0.0_f64, f64::max);

        Ok(Some(LastPerformance {
            last_workout_date: date,
            sets,
            estimated_1rm: (estimated_1rm * 10.0).round() / 10.0,
        }))
    }
}

pub(super) fn row_to_exercise(row: &sqlx::sqlite::SqliteRow) -> AppResult<Exercise> {
    let secondary_json: String = row.try_get("secondary_muscle_groups")?;
    let secondary_muscle_groups: Vec<String> = serde_json::from_str(&secondary_json)
        .map_err(|e| AppError::internal(format!("Corrupt secondary_muscle_groups JSON: {e}")))?;

    Ok(Exercise {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        primary_muscle_group: row.try_get("primary_muscle_group")?,
        secondary_muscle_groups,
        equipment: row.try_get("equipment")?,
        movement_pattern: row.try_get("movement_pattern")?,
        description: row.try_get("description")?,
    })
}
