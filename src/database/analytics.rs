// ABOUTME: Analytics database queries for progression, volume, and consistency
// ABOUTME: json_each muscle-group fan-out, ISO-week bucketing, and adherence aggregates

use super::Database;
use crate::config::fitness::FitnessPolicy;
use crate::errors::AppResult;
use crate::intelligence::volume::{self, VolumeZone};
use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use sqlx::Row;
use std::collections::BTreeMap;

/// One point of an exercise's estimated-1RM series
#[derive(Debug, Clone, Serialize)]
pub struct OneRepMaxPoint {
    /// Workout date
    pub date: NaiveDate,
    /// Best Epley-RIR estimate of that day, rounded to one decimal
    pub estimated_1rm: f64,
}

/// Weekly set count for a muscle group with its landmarks
#[derive(Debug, Clone, Serialize)]
pub struct VolumeTrendPoint {
    /// Monday of the ISO week
    pub week: NaiveDate,
    /// Completed sets that week
    pub total_sets: i64,
    /// Minimum effective volume landmark
    pub mev: i64,
    /// Maximum adaptive volume landmark
    pub mav: i64,
    /// Maximum recoverable volume landmark
    pub mrv: i64,
}

/// Workout adherence and duration aggregates
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyMetrics {
    /// completed workouts / total workouts, rounded to three decimals
    pub adherence_rate: f64,
    /// Mean completed-session duration in seconds
    pub avg_session_duration: f64,
    /// All workouts ever scheduled
    pub total_workouts: i64,
}

/// Current-week tracking for one muscle group
#[derive(Debug, Clone, Serialize)]
pub struct MuscleGroupVolumeRow {
    /// Landmark table key
    pub muscle_group: String,
    /// Sets completed so far this week
    pub completed_sets: i64,
    /// Sets the program plans for the week
    pub planned_sets: i64,
    /// Planned sets still outstanding
    pub remaining_sets: i64,
    /// Minimum effective volume landmark
    pub mev: i64,
    /// Maximum adaptive volume landmark
    pub mav: i64,
    /// Maximum recoverable volume landmark
    pub mrv: i64,
    /// completed / planned in percent, one decimal
    pub completion_percentage: f64,
    /// Zone classification with mid-week on-track handling
    pub zone: VolumeZone,
    /// Warning when the zone calls for intervention
    pub warning: Option<String>,
}

/// Current ISO week volume tracking
#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeekVolume {
    /// Monday of the current week
    pub week_start: NaiveDate,
    /// Sunday of the current week
    pub week_end: NaiveDate,
    /// Per-muscle-group tracking, sorted by name
    pub muscle_groups: Vec<MuscleGroupVolumeRow>,
}

/// Completed weekly sets for one muscle group in a historical week
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalVolumeRow {
    /// Landmark table key
    pub muscle_group: String,
    /// Sets completed that week
    pub completed_sets: i64,
    /// Minimum effective volume landmark
    pub mev: i64,
    /// Maximum adaptive volume landmark
    pub mav: i64,
    /// Maximum recoverable volume landmark
    pub mrv: i64,
}

/// One week of volume history
#[derive(Debug, Clone, Serialize)]
pub struct WeekVolume {
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    /// Per-muscle-group totals, sorted by name
    pub muscle_groups: Vec<HistoricalVolumeRow>,
}

// Fans each set out to the exercise's primary plus secondary muscle groups;
// every set counts fully toward each group it touches.
const MUSCLE_GROUP_FANOUT: &str =
    "json_each(json_insert(e.secondary_muscle_groups, '$[#]', e.primary_muscle_group))";

impl Database {
    /// Best daily 1RM estimates for one exercise over a date range
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_one_rep_max_progression(
        &self,
        user_id: i64,
        exercise_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<OneRepMaxPoint>> {
        let rows = sqlx::query(
            r"
            SELECT w.date,
                   MAX(s.weight_kg * (1 + (s.reps - s.rir) / 30.0)) AS estimated_1rm
            FROM sets s
            JOIN workouts w ON s.workout_id = w.id
            WHERE w.user_id = ? AND s.exercise_id = ? AND w.date >= ? AND w.date <= ?
            GROUP BY w.date
            ORDER BY w.date
            ",
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let estimated_1rm: f64 = row.try_get("estimated_1rm")?;
                Ok(OneRepMaxPoint {
                    date: row.try_get("date")?,
                    estimated_1rm: (estimated_1rm * 10.0).round() / 10.0,
                })
            })
            .collect()
    }

    /// Weekly completed sets for one muscle group over a date range
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_volume_trends(
        &self,
        user_id: i64,
        muscle_group: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        policy: &FitnessPolicy,
    ) -> AppResult<Vec<VolumeTrendPoint>> {
        let sql = format!(
            r"
            SELECT w.date, COUNT(s.id) AS total_sets
            FROM sets s
            JOIN workouts w ON s.workout_id = w.id
            JOIN exercises e ON s.exercise_id = e.id
            JOIN {MUSCLE_GROUP_FANOUT} mg
            WHERE w.user_id = ?
              AND w.status = 'completed'
              AND w.date >= ? AND w.date <= ?
              AND mg.value = ?
            GROUP BY w.date
            ORDER BY w.date
            "
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(start_date)
            .bind(end_date)
            .bind(muscle_group)
            .fetch_all(&self.pool)
            .await?;

        // Bucket days into ISO weeks keyed by their Monday
        let mut weeks: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in &rows {
            let date: NaiveDate = row.try_get("date")?;
            let sets: i64 = row.try_get("total_sets")?;
            let (monday, _) = volume::week_boundaries(date);
            *weeks.entry(monday).or_insert(0) += sets;
        }

        let landmarks = policy.landmarks.get(muscle_group);
        Ok(weeks
            .into_iter()
            .map(|(week, total_sets)| VolumeTrendPoint {
                week,
                total_sets,
                mev: landmarks.mev,
                mav: landmarks.mav,
                mrv: landmarks.mrv,
            })
            .collect())
    }

    /// Adherence rate, mean session duration, and workout count
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_consistency_metrics(&self, user_id: i64) -> AppResult<ConsistencyMetrics> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(CASE WHEN status = 'completed' THEN 1 END) AS completed_workouts,
                COUNT(*) AS total_workouts,
                AVG(CASE WHEN completed_at IS NOT NULL AND started_at IS NOT NULL
                    THEN CAST(strftime('%s', completed_at) AS INTEGER)
                       - CAST(strftime('%s', started_at) AS INTEGER)
                END) AS avg_session_duration
            FROM workouts
            WHERE user_id = ?
            ",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let completed: i64 = row.try_get("completed_workouts")?;
        let total: i64 = row.try_get("total_workouts")?;
        let avg_session_duration: Option<f64> = row.try_get("avg_session_duration")?;

        #[allow(clippy::cast_precision_loss)]
        let adherence_rate = if total > 0 {
            completed as f64 / total as f64
        } else {
            0.0
        };

        Ok(ConsistencyMetrics {
            adherence_rate: (adherence_rate * 1000.0).round() / 1000.0,
            avg_session_duration: avg_session_duration.unwrap_or(0.0),
            total_workouts: total,
        })
    }

    /// Completed and planned volume per muscle group for the current ISO week
    ///
    /// # Errors
    ///
    /// Returns an error if a query or row decoding fails.
    pub async fn get_current_week_volume(
        &self,
        user_id: i64,
        policy: &FitnessPolicy,
    ) -> AppResult<CurrentWeekVolume> {
        let (week_start, week_end) = volume::week_boundaries(Utc::now().date_naive());

        let completed_sql = format!(
            r"
            SELECT mg.value AS muscle_group, COUNT(s.id) AS completed_sets
            FROM sets s
            JOIN workouts w ON s.workout_id = w.id
            JOIN exercises e ON s.exercise_id = e.id
            JOIN {MUSCLE_GROUP_FANOUT} mg
            WHERE w.user_id = ?
              AND w.status = 'completed'
              AND w.date >= ? AND w.date <= ?
            GROUP BY mg.value
            "
        );
        let completed_rows = sqlx::query(&completed_sql)
            .bind(user_id)
            .bind(week_start)
            .bind(week_end)
            .fetch_all(&self.pool)
            .await?;

        // (completed, planned) keyed by muscle group; BTreeMap keeps the
        // output sorted by name
        let mut by_group: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for row in &completed_rows {
            let muscle_group: String = row.try_get("muscle_group")?;
            let completed: i64 = row.try_get("completed_sets")?;
            by_group.entry(muscle_group).or_insert((0, 0)).0 = completed;
        }

        if let Ok(program) = self.get_active_program(user_id).await {
            let planned_sql = format!(
                r"
                SELECT mg.value AS muscle_group, SUM(pe.sets) AS planned_sets
                FROM program_exercises pe
                JOIN program_days pd ON pe.program_day_id = pd.id
                JOIN exercises e ON pe.exercise_id = e.id
                JOIN {MUSCLE_GROUP_FANOUT} mg
                WHERE pd.program_id = ?
                GROUP BY mg.value
                "
            );
            let planned_rows = sqlx::query(&planned_sql)
                .bind(program.id)
                .fetch_all(&self.pool)
                .await?;

            for row in &planned_rows {
                let muscle_group: String = row.try_get("muscle_group")?;
                let planned: i64 = row.try_get("planned_sets")?;
                by_group.entry(muscle_group).or_insert((0, 0)).1 = planned;
            }
        }

        let muscle_groups = by_group
            .into_iter()
            .map(|(muscle_group, (completed_sets, planned_sets))| {
                let landmarks = policy.landmarks.get(&muscle_group);
                let zone =
                    volume::classify_zone_with_on_track(completed_sets, planned_sets, landmarks);
                #[allow(clippy::cast_precision_loss)]
                let completion_percentage = if planned_sets > 0 {
                    (completed_sets as f64 / planned_sets as f64 * 1000.0).round() / 10.0
                } else {
                    0.0
                };

                MuscleGroupVolumeRow {
                    warning: volume::zone_warning(zone, &muscle_group),
                    muscle_group,
                    completed_sets,
                    planned_sets,
                    remaining_sets: (planned_sets - completed_sets).max(0),
                    mev: landmarks.mev,
                    mav: landmarks.mav,
                    mrv: landmarks.mrv,
                    completion_percentage,
                    zone,
                }
            })
            .collect();

        Ok(CurrentWeekVolume {
            week_start,
            week_end,
            muscle_groups,
        })
    }

    /// Weekly volume history over the trailing `weeks`, oldest week first
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_volume_history(
        &self,
        user_id: i64,
        weeks: i64,
        muscle_group_filter: Option<&str>,
        policy: &FitnessPolicy,
    ) -> AppResult<Vec<WeekVolume>> {
        let end_date = Utc::now().date_naive();
        #[allow(clippy::cast_sign_loss)]
        let start_date = end_date - Days::new(weeks.max(0) as u64 * 7);

        let sql = format!(
            r"
            SELECT w.date, mg.value AS muscle_group, COUNT(s.id) AS completed_sets
            FROM sets s
            JOIN workouts w ON s.workout_id = w.id
            JOIN exercises e ON s.exercise_id = e.id
            JOIN {MUSCLE_GROUP_FANOUT} mg
            WHERE w.user_id = ?
              AND w.status = 'completed'
              AND w.date >= ? AND w.date <= ?
              AND (? IS NULL OR mg.value = ?)
            GROUP BY w.date, mg.value
            ORDER BY w.date
            "
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(start_date)
            .bind(end_date)
            .bind(muscle_group_filter)
            .bind(muscle_group_filter)
            .fetch_all(&self.pool)
            .await?;

        let mut week_map: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
        for row in &rows {
            let date: NaiveDate = row.try_get("date")?;
            let muscle_group: String = row.try_get("muscle_group")?;
            let sets: i64 = row.try_get("completed_sets")?;
            let (monday, _) = volume::week_boundaries(date);
            *week_map
                .entry(monday)
                .or_default()
                .entry(muscle_group)
                .or_insert(0) += sets;
        }

        Ok(week_map
            .into_iter()
            .map(|(week_start, groups)| WeekVolume {
                week_start,
                muscle_groups: groups
                    .into_iter()
                    .map(|(muscle_group, completed_sets)| {
                        let landmarks = policy.landmarks.get(&muscle_group);
                        HistoricalVolumeRow {
                            muscle_group,
                            completed_sets,
                            mev: landmarks.mev,
                            mav: landmarks.mav,
                            mrv: landmarks.mrv,
                        }
                    })
                    .collect(),
            })
            .collect())
    }
}
