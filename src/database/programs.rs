// ABOUTME: Training program database operations
// ABOUTME: Default program seeding, program-exercise CRUD, phase advancement, planned volume analysis

use std::str::FromStr;

use super::Database;
use crate::config::fitness::FitnessPolicy;
use crate::errors::{AppError, AppResult};
use crate::intelligence::{progression, volume};
use crate::models::{
    DayType, MesocyclePhase, Program, ProgramDay, ProgramExercise, ProgramExerciseDetail,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use tracing::info;

/// Result of advancing a program's mesocycle phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseAdvancement {
    /// Phase before the transition
    pub previous_phase: MesocyclePhase,
    /// Phase after the transition
    pub new_phase: MesocyclePhase,
    /// Multiplier applied to planned set counts
    pub volume_multiplier: f64,
    /// Number of program-exercise rows rescaled
    pub exercises_updated: i64,
}

/// Planned weekly volume for one muscle group
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMuscleGroupVolume {
    /// Landmark table key
    pub muscle_group: String,
    /// Sum of planned sets across the program week
    pub planned_weekly_sets: i64,
    /// Minimum effective volume landmark
    pub mev: i64,
    /// Maximum adaptive volume landmark
    pub mav: i64,
    /// Maximum recoverable volume landmark
    pub mrv: i64,
    /// Zone classification of the planned volume
    pub zone: volume::VolumeZone,
    /// Warning when the plan calls for intervention
    pub warning: Option<String>,
}

/// Planned volume analysis of the active program
#[derive(Debug, Clone, Serialize)]
pub struct ProgramVolumeAnalysis {
    /// Analyzed program id
    pub program_id: i64,
    /// Current mesocycle phase
    pub mesocycle_phase: MesocyclePhase,
    /// Per-muscle-group planned volume, sorted by name
    pub muscle_groups: Vec<PlannedMuscleGroupVolume>,
}

/// Default 6-day split: weekday, name, type
const DEFAULT_PROGRAM_DAYS: &[(i64, &str, DayType)] = &[
    (1, "Push A (Chest-Focused)", DayType::Strength),
    (2, "Pull A (Lat-Focused)", DayType::Strength),
    (3, "VO2max A (Norwegian 4x4)", DayType::Vo2max),
    (4, "Push B (Shoulder-Focused)", DayType::Strength),
    (5, "Pull B (Rhomboid/Trap-Focused)", DayType::Strength),
    (6, "VO2max B (Zone 2)", DayType::Vo2max),
];

/// Default exercise template: day index, exercise name, order, sets, rep range, RIR
const DEFAULT_PROGRAM_EXERCISES: &[(usize, &str, i64, i64, &str, i64)] = &[
    // Day 1: Push A
    (0, "Barbell Back Squat", 1, 3, "6-8", 3),
    (0, "Barbell Bench Press", 2, 4, "6-8", 3),
    (0, "Incline Dumbbell Press", 3, 3, "8-10", 2),
    (0, "Cable Flyes", 4, 3, "12-15", 1),
    (0, "Lateral Raises", 5, 4, "12-15", 1),
    (0, "Tricep Pushdown", 6, 3, "15-20", 0),
    // Day 2: Pull A
    (1, "Conventional Deadlift", 1, 3, "5-8", 3),
    (1, "Pull-Ups", 2, 4, "5-8", 3),
    (1, "Barbell Row", 3, 4, "8-10", 2),
    (1, "Seated Cable Row", 4, 3, "12-15", 1),
    (1, "Face Pulls", 5, 3, "15-20", 0),
    (1, "Barbell Curl", 6, 3, "8-12", 1),
    // Day 4: Push B
    (3, "Leg Press", 1, 3, "8-12", 3),
    (3, "Overhead Press", 2, 4, "5-8", 3),
    (3, "Dumbbell Bench Press", 3, 3, "8-12", 2),
    (3, "Cable Lateral Raises", 4, 4, "15-20", 0),
    (3, "Rear Delt Flyes", 5, 3, "15-20", 0),
    (3, "Close-Grip Bench Press", 6, 3, "8-10", 2),
    // Day 5: Pull B
    (4, "Front Squat", 1, 3, "6-8", 3),
    (4, "Barbell Row", 2, 4, "6-8", 3),
    (4, "Lat Pulldown", 3, 3, "10-12", 2),
    (4, "Barbell Shrugs", 4, 4, "12-15", 1),
    (4, "Rear Delt Flyes", 5, 3, "15-20", 0),
    (4, "Hammer Curl", 6, 3, "10-15", 1),
];

impl Database {
    /// Create program, program-day, and program-exercise tables
    pub(super) async fn migrate_programs(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                mesocycle_week INTEGER NOT NULL DEFAULT 1,
                mesocycle_length_weeks INTEGER NOT NULL DEFAULT 8,
                mesocycle_phase TEXT NOT NULL DEFAULT 'mev'
                    CHECK (mesocycle_phase IN ('mev', 'mav', 'mrv', 'deload')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS program_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id INTEGER NOT NULL REFERENCES programs(id) ON DELETE CASCADE,
                day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
                day_name TEXT NOT NULL,
                day_type TEXT NOT NULL CHECK (day_type IN ('strength', 'vo2max'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS program_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_day_id INTEGER NOT NULL REFERENCES program_days(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id),
                order_index INTEGER NOT NULL,
                sets INTEGER NOT NULL,
                rep_range TEXT NOT NULL,
                rir INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_programs_user ON programs(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_program_exercises_day \
             ON program_exercises(program_day_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seed the default 6-day split for a new user in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a template exercise is missing from the catalog
    /// or any insert fails; no partial program is left behind.
    pub async fn create_default_program(&self, user_id: i64) -> AppResult<i64> {
        // Resolve template exercise names up front; the catalog is static
        let mut exercise_ids = Vec::with_capacity(DEFAULT_PROGRAM_EXERCISES.len());
        for (_, name, ..) in DEFAULT_PROGRAM_EXERCISES {
            exercise_ids.push(self.get_exercise_id_by_name(name).await?);
        }

        let mut tx = self.pool.begin().await?;

        let program_id = sqlx::query(
            r"
            INSERT INTO programs (user_id, name, mesocycle_week, mesocycle_phase)
            VALUES (?, ?, 1, 'mev')
            ",
        )
        .bind(user_id)
        .bind("Renaissance Periodization 6-Day Split")
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let mut day_ids = Vec::with_capacity(DEFAULT_PROGRAM_DAYS.len());
        for (day_of_week, day_name, day_type) in DEFAULT_PROGRAM_DAYS {
            let day_id = sqlx::query(
                r"
                INSERT INTO program_days (program_id, day_of_week, day_name, day_type)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(program_id)
            .bind(day_of_week)
            .bind(day_name)
            .bind(day_type.as_str())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
            day_ids.push(day_id);
        }

        for ((day_index, _, order_index, sets, rep_range, rir), exercise_id) in
            DEFAULT_PROGRAM_EXERCISES.iter().zip(&exercise_ids)
        {
            sqlx::query(
                r"
                INSERT INTO program_exercises
                    (program_day_id, exercise_id, order_index, sets, rep_range, rir)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(day_ids[*day_index])
            .bind(exercise_id)
            .bind(order_index)
            .bind(sets)
            .bind(rep_range)
            .bind(rir)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(user_id, program_id, "Seeded default 6-day program");
        Ok(program_id)
    }

    /// Get the user's active (most recently created) program
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user has no program.
    pub async fn get_active_program(&self, user_id: i64) -> AppResult<Program> {
        let row = sqlx::query(
            r"
            SELECT * FROM programs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or_else(
            || Err(AppError::not_found("Program")),
            |row| row_to_program(&row),
        )
    }

    /// Get a program owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing program or one owned by
    /// another user.
    pub async fn get_program(&self, user_id: i64, program_id: i64) -> AppResult<Program> {
        let row = sqlx::query("SELECT * FROM programs WHERE id = ? AND user_id = ?")
            .bind(program_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map_or_else(
            || Err(AppError::not_found("Program")),
            |row| row_to_program(&row),
        )
    }

    /// List a program's days in weekday order
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_program_days(&self, program_id: i64) -> AppResult<Vec<ProgramDay>> {
        let rows = sqlx::query(
            "SELECT * FROM program_days WHERE program_id = ? ORDER BY day_of_week",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_program_day).collect()
    }

    /// Get a program day owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing day or one owned by another
    /// user.
    pub async fn get_program_day(&self, user_id: i64, program_day_id: i64) -> AppResult<ProgramDay> {
        let row = sqlx::query(
            r"
            SELECT pd.* FROM program_days pd
            JOIN programs p ON pd.program_id = p.id
            WHERE pd.id = ? AND p.user_id = ?
            ",
        )
        .bind(program_day_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or_else(
            || Err(AppError::not_found("Program day")),
            |row| row_to_program_day(&row),
        )
    }

    /// List a day's planned exercises with catalog metadata, in plan order
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_program_exercises(
        &self,
        program_day_id: i64,
    ) -> AppResult<Vec<ProgramExerciseDetail>> {
        let rows = sqlx::query(
            r"
            SELECT pe.*, e.name AS exercise_name, e.primary_muscle_group, e.equipment
            FROM program_exercises pe
            JOIN exercises e ON pe.exercise_id = e.id
            WHERE pe.program_day_id = ?
            ORDER BY pe.order_index ASC
            ",
        )
        .bind(program_day_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_program_exercise_detail).collect()
    }

    /// Get a planned exercise owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing slot or one owned by another
    /// user.
    pub async fn get_program_exercise(
        &self,
        user_id: i64,
        program_exercise_id: i64,
    ) -> AppResult<ProgramExercise> {
        let row = sqlx::query(
            r"
            SELECT pe.* FROM program_exercises pe
            JOIN program_days pd ON pe.program_day_id = pd.id
            JOIN programs p ON pd.program_id = p.id
            WHERE pe.id = ? AND p.user_id = ?
            ",
        )
        .bind(program_exercise_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or_else(
            || Err(AppError::not_found("Program exercise")),
            |row| row_to_program_exercise(&row),
        )
    }

    /// Add an exercise slot to a program day, appended at the end
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a day the user does not own or an
    /// unknown exercise.
    pub async fn create_program_exercise(
        &self,
        user_id: i64,
        program_day_id: i64,
        exercise_id: i64,
        sets: i64,
        rep_range: &str,
        rir: i64,
    ) -> AppResult<ProgramExercise> {
        self.get_program_day(user_id, program_day_id).await?;
        self.get_exercise_by_id(exercise_id).await?;

        let id = sqlx::query(
            r"
            INSERT INTO program_exercises
                (program_day_id, exercise_id, order_index, sets, rep_range, rir)
            SELECT ?, ?, COALESCE(MAX(order_index), 0) + 1, ?, ?, ?
            FROM program_exercises WHERE program_day_id = ?
            ",
        )
        .bind(program_day_id)
        .bind(exercise_id)
        .bind(sets)
        .bind(rep_range)
        .bind(rir)
        .bind(program_day_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_program_exercise(user_id, id).await
    }

    /// Update a planned slot's volume prescription, leaving absent fields
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a slot the user does not own.
    pub async fn update_program_exercise(
        &self,
        user_id: i64,
        program_exercise_id: i64,
        sets: Option<i64>,
        rep_range: Option<&str>,
        rir: Option<i64>,
    ) -> AppResult<ProgramExercise> {
        self.get_program_exercise(user_id, program_exercise_id)
            .await?;

        sqlx::query(
            r"
            UPDATE program_exercises SET
                sets = COALESCE(?, sets),
                rep_range = COALESCE(?, rep_range),
                rir = COALESCE(?, rir)
            WHERE id = ?
            ",
        )
        .bind(sets)
        .bind(rep_range)
        .bind(rir)
        .bind(program_exercise_id)
        .execute(&self.pool)
        .await?;

        self.get_program_exercise(user_id, program_exercise_id).await
    }

    /// Remove a planned slot from its day
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a slot the user does not own.
    pub async fn delete_program_exercise(
        &self,
        user_id: i64,
        program_exercise_id: i64,
    ) -> AppResult<()> {
        self.get_program_exercise(user_id, program_exercise_id)
            .await?;

        sqlx::query("DELETE FROM program_exercises WHERE id = ?")
            .bind(program_exercise_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace a slot's exercise, keeping its prescription and position
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a slot the user does not own or an
    /// unknown replacement exercise.
    pub async fn swap_program_exercise(
        &self,
        user_id: i64,
        program_exercise_id: i64,
        new_exercise_id: i64,
    ) -> AppResult<ProgramExercise> {
        self.get_program_exercise(user_id, program_exercise_id)
            .await?;
        self.get_exercise_by_id(new_exercise_id).await?;

        sqlx::query("UPDATE program_exercises SET exercise_id = ? WHERE id = ?")
            .bind(new_exercise_id)
            .bind(program_exercise_id)
            .execute(&self.pool)
            .await?;

        self.get_program_exercise(user_id, program_exercise_id).await
    }

    /// Reorder a day's slots in one transaction
    ///
    /// `order` pairs each program-exercise id with its new 1-based index.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the day is not owned by the user or an
    /// id in `order` does not belong to the day.
    pub async fn reorder_program_exercises(
        &self,
        user_id: i64,
        program_day_id: i64,
        order: &[(i64, i64)],
    ) -> AppResult<()> {
        self.get_program_day(user_id, program_day_id).await?;

        let mut tx = self.pool.begin().await?;
        for (program_exercise_id, new_index) in order {
            let result = sqlx::query(
                "UPDATE program_exercises SET order_index = ? WHERE id = ? AND program_day_id = ?",
            )
            .bind(new_index)
            .bind(program_exercise_id)
            .bind(program_day_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found("Program exercise"));
            }
        }
        tx.commit().await?;
        Ok(())
    }

    /// Advance a program to its next (or a manually chosen) mesocycle phase
    ///
    /// Rescales every planned set count by the transition's volume multiplier
    /// and resets the mesocycle week to 1, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a program the user does not own.
    pub async fn advance_program_phase(
        &self,
        user_id: i64,
        program_id: i64,
        manual_target: Option<MesocyclePhase>,
        policy: &FitnessPolicy,
    ) -> AppResult<PhaseAdvancement> {
        let program = self.get_program(user_id, program_id).await?;
        let transition =
            progression::plan_transition(program.mesocycle_phase, manual_target, &policy.phases);

        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r"
            SELECT pe.id, pe.sets
            FROM program_exercises pe
            JOIN program_days pd ON pe.program_day_id = pd.id
            WHERE pd.program_id = ?
            ",
        )
        .bind(program_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut exercises_updated = 0_i64;
        for row in &rows {
            let id: i64 = row.try_get("id")?;
            let sets: i64 = row.try_get("sets")?;
            let new_sets = progression::scale_sets(sets, transition.volume_multiplier);
            sqlx::query("UPDATE program_exercises SET sets = ? WHERE id = ?")
                .bind(new_sets)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            exercises_updated += 1;
        }

        sqlx::query("UPDATE programs SET mesocycle_phase = ?, mesocycle_week = 1 WHERE id = ?")
            .bind(transition.new_phase.as_str())
            .bind(program_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            program_id,
            previous_phase = %transition.previous_phase,
            new_phase = %transition.new_phase,
            volume_multiplier = transition.volume_multiplier,
            exercises_updated,
            "Advanced mesocycle phase"
        );

        Ok(PhaseAdvancement {
            previous_phase: transition.previous_phase,
            new_phase: transition.new_phase,
            volume_multiplier: transition.volume_multiplier,
            exercises_updated,
        })
    }

    /// Analyze the active program's planned weekly volume per muscle group
    ///
    /// Each planned set counts fully toward the exercise's primary and every
    /// secondary muscle group.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user has no program.
    pub async fn get_program_volume_analysis(
        &self,
        user_id: i64,
        policy: &FitnessPolicy,
    ) -> AppResult<ProgramVolumeAnalysis> {
        let program = self.get_active_program(user_id).await?;

        let rows = sqlx::query(
            r"
            SELECT mg.value AS muscle_group, SUM(pe.sets) AS planned_weekly_sets
            FROM program_exercises pe
            JOIN program_days pd ON pe.program_day_id = pd.id
            JOIN exercises e ON pe.exercise_id = e.id
            JOIN json_each(json_insert(e.secondary_muscle_groups, '$[#]', e.primary_muscle_group)) mg
            WHERE pd.program_id = ?
            GROUP BY mg.value
            ORDER BY mg.value
            ",
        )
        .bind(program.id)
        .fetch_all(&self.pool)
        .await?;

        let mut muscle_groups = Vec::with_capacity(rows.len());
        for row in &rows {
            let muscle_group: String = row.try_get("muscle_group")?;
            let planned_weekly_sets: i64 = row.try_get("planned_weekly_sets")?;
            let landmarks = policy.landmarks.get(&muscle_group);
            let zone = volume::classify_zone(planned_weekly_sets, landmarks);

            muscle_groups.push(PlannedMuscleGroupVolume {
                warning: volume::zone_warning(zone, &muscle_group),
                muscle_group,
                planned_weekly_sets,
                mev: landmarks.mev,
                mav: landmarks.mav,
                mrv: landmarks.mrv,
                zone,
            });
        }

        Ok(ProgramVolumeAnalysis {
            program_id: program.id,
            mesocycle_phase: program.mesocycle_phase,
            muscle_groups,
        })
    }
}

pub(super) fn row_to_program(row: &sqlx::sqlite::SqliteRow) -> AppResult<Program> {
    let phase: String = row.try_get("mesocycle_phase")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Program {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        created_at,
        mesocycle_week: row.try_get("mesocycle_week")?,
        mesocycle_length_weeks: row.try_get("mesocycle_length_weeks")?,
        mesocycle_phase: MesocyclePhase::from_str(&phase)?,
    })
}

pub(super) fn row_to_program_day(row: &sqlx::sqlite::SqliteRow) -> AppResult<ProgramDay> {
    let day_type: String = row.try_get("day_type")?;

    Ok(ProgramDay {
        id: row.try_get("id")?,
        program_id: row.try_get("program_id")?,
        day_of_week: row.try_get("day_of_week")?,
        day_name: row.try_get("day_name")?,
        day_type: DayType::from_str(&day_type)?,
    })
}

fn row_to_program_exercise(row: &sqlx::sqlite::SqliteRow) -> AppResult<ProgramExercise> {
    Ok(ProgramExercise {
        id: row.try_get("id")?,
        program_day_id: row.try_get("program_day_id")?,
        exercise_id: row.try_get("exercise_id")?,
        order_index: row.try_get("order_index")?,
        target_sets: row.try_get("sets")?,
        target_rep_range: row.try_get("rep_range")?,
        target_rir: row.try_get("rir")?,
    })
}

fn row_to_program_exercise_detail(
    row: &sqlx::sqlite::SqliteRow,
) -> AppResult<ProgramExerciseDetail> {
    Ok(ProgramExerciseDetail {
        program_exercise: row_to_program_exercise(row)?,
        exercise_name: row.try_get("exercise_name")?,
        primary_muscle_group: row.try_get("primary_muscle_group")?,
        equipment: row.try_get("equipment")?,
    })
}
