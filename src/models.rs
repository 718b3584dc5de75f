// ABOUTME: Core data models for the FitFlow training API
// ABOUTME: Defines users, programs, workouts, sets, and assessment types plus domain enums

//! # Data Models
//!
//! Core data structures shared by the database layer, the intelligence layer,
//! and the HTTP routes. Enums are stored in SQLite as their snake_case string
//! form via `as_str`/`FromStr`, matching the wire representation.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Self-reported training experience, used to seed the default program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::invalid_input(format!(
                "Unknown experience level: {other}"
            ))),
        }
    }
}

/// Mesocycle phase within a training program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MesocyclePhase {
    /// Minimum effective volume (baseline accumulation)
    Mev,
    /// Maximum adaptive volume (productive overload)
    Mav,
    /// Maximum recoverable volume (peak overreach)
    Mrv,
    /// Recovery week at reduced volume
    Deload,
}

impl MesocyclePhase {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mev => "mev",
            Self::Mav => "mav",
            Self::Mrv => "mrv",
            Self::Deload => "deload",
        }
    }
}

impl Display for MesocyclePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MesocyclePhase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mev" => Ok(Self::Mev),
            "mav" => Ok(Self::Mav),
            "mrv" => Ok(Self::Mrv),
            "deload" => Ok(Self::Deload),
            other => Err(AppError::invalid_input(format!(
                "Unknown mesocycle phase: {other}"
            ))),
        }
    }
}

/// Training-day flavor within a program split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Strength,
    Vo2max,
}

impl DayType {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Vo2max => "vo2max",
        }
    }
}

impl FromStr for DayType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "vo2max" => Ok(Self::Vo2max),
            other => Err(AppError::invalid_input(format!("Unknown day type: {other}"))),
        }
    }
}

/// Workout session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    NotStarted,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkoutStatus {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for WorkoutStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::invalid_input(format!(
                "Unknown workout status: {other}"
            ))),
        }
    }
}

/// Cardio protocol for a VO2max session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardioProtocol {
    /// Norwegian 4x4 interval protocol (4 x 4min work / 3min recovery)
    Norwegian4x4,
    /// Zone 2 steady-state session
    Zone2,
}

impl CardioProtocol {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Norwegian4x4 => "norwegian_4x4",
            Self::Zone2 => "zone2",
        }
    }
}

impl FromStr for CardioProtocol {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "norwegian_4x4" => Ok(Self::Norwegian4x4),
            "zone2" => Ok(Self::Zone2),
            other => Err(AppError::invalid_input(format!(
                "Unknown cardio protocol: {other}"
            ))),
        }
    }
}

/// Volume adjustment recommended by recovery autoregulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeAdjustment {
    /// Train as planned
    None,
    /// Drop one set per exercise
    #[serde(rename = "reduce_1_set")]
    ReduceOneSet,
    /// Drop two sets per exercise
    #[serde(rename = "reduce_2_sets")]
    ReduceTwoSets,
    /// Skip the session entirely
    RestDay,
}

impl VolumeAdjustment {
    /// Storage/wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ReduceOneSet => "reduce_1_set",
            Self::ReduceTwoSets => "reduce_2_sets",
            Self::RestDay => "rest_day",
        }
    }
}

impl FromStr for VolumeAdjustment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "reduce_1_set" => Ok(Self::ReduceOneSet),
            "reduce_2_sets" => Ok(Self::ReduceTwoSets),
            "rest_day" => Ok(Self::RestDay),
            other => Err(AppError::invalid_input(format!(
                "Unknown volume adjustment: {other}"
            ))),
        }
    }
}

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Row id
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Bcrypt password hash (never serialized to API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Age in years, used by the Cooper VO2max estimate
    pub age: Option<i64>,
    /// Body weight in kilograms at registration
    pub weight_kg: Option<f64>,
    /// Self-reported training experience
    pub experience_level: Option<ExperienceLevel>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last profile update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Exercise catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Row id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Primary muscle group (landmark table key)
    pub primary_muscle_group: String,
    /// Secondary muscle groups, each counted at full volume
    pub secondary_muscle_groups: Vec<String>,
    /// Required equipment (barbell, dumbbell, cable, machine, bodyweight)
    pub equipment: String,
    /// Movement pattern (compound or isolation)
    pub movement_pattern: String,
    /// Free-text setup/execution notes
    pub description: Option<String>,
}

/// Training program owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Row id
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Program name
    pub name: String,
    /// Program start date
    pub created_at: DateTime<Utc>,
    /// Current week within the mesocycle
    pub mesocycle_week: i64,
    /// Total mesocycle length in weeks
    pub mesocycle_length_weeks: i64,
    /// Current mesocycle phase
    pub mesocycle_phase: MesocyclePhase,
}

/// One day of a program split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDay {
    /// Row id
    pub id: i64,
    /// Parent program id
    pub program_id: i64,
    /// ISO weekday, 1 = Monday through 7 = Sunday
    pub day_of_week: i64,
    /// Display name (e.g. "Push A")
    pub day_name: String,
    /// Strength or VO2max day
    pub day_type: DayType,
}

/// Planned exercise slot within a program day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramExercise {
    /// Row id
    pub id: i64,
    /// Parent program day id
    pub program_day_id: i64,
    /// Catalog exercise id
    pub exercise_id: i64,
    /// Position within the day
    pub order_index: i64,
    /// Planned working sets
    pub target_sets: i64,
    /// Planned rep range (e.g. "6-8")
    pub target_rep_range: String,
    /// Planned reps-in-reserve
    pub target_rir: i64,
}

/// Planned exercise joined with catalog metadata for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramExerciseDetail {
    /// The planned slot
    #[serde(flatten)]
    pub program_exercise: ProgramExercise,
    /// Exercise display name
    pub exercise_name: String,
    /// Primary muscle group of the exercise
    pub primary_muscle_group: String,
    /// Required equipment
    pub equipment: String,
}

/// Workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Row id
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Program day this session executes
    pub program_day_id: i64,
    /// Session date
    pub date: NaiveDate,
    /// Session start timestamp
    pub started_at: Option<DateTime<Utc>>,
    /// Session completion timestamp
    pub completed_at: Option<DateTime<Utc>>,
    /// Lifecycle status
    pub status: WorkoutStatus,
    /// Total volume load (sum of weight x reps) over logged sets
    pub total_volume_kg: f64,
    /// Average reps-in-reserve over logged sets
    pub average_rir: Option<f64>,
}

/// One logged set within a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Row id
    pub id: i64,
    /// Parent workout id
    pub workout_id: i64,
    /// Catalog exercise id
    pub exercise_id: i64,
    /// Set number within the exercise (1-based)
    pub set_number: i64,
    /// Load in kilograms
    pub weight_kg: f64,
    /// Repetitions performed
    pub reps: i64,
    /// Reps-in-reserve at set end
    pub rir: i64,
    /// Logging timestamp
    pub timestamp: DateTime<Utc>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Daily recovery self-assessment (three 1-5 subscores)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryAssessment {
    /// Row id
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Assessment date
    pub date: NaiveDate,
    /// Sleep quality subscore (1-5)
    pub sleep_quality: i64,
    /// Muscle soreness subscore (1 = very sore, 5 = none)
    pub muscle_soreness: i64,
    /// Motivation subscore (1-5)
    pub motivation: i64,
    /// Sum of the three subscores (3-15)
    pub total_score: i64,
    /// Recommended volume adjustment for the day
    pub volume_adjustment: VolumeAdjustment,
}

/// Logged VO2max cardio session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vo2maxSession {
    /// Row id
    pub id: i64,
    /// Parent workout id
    pub workout_id: i64,
    /// Protocol performed
    pub protocol: CardioProtocol,
    /// Duration in minutes
    pub duration_minutes: i64,
    /// Work intervals completed (Norwegian 4x4 only, 0-4)
    pub intervals_completed: Option<i64>,
    /// Average heart rate (bpm)
    pub average_heart_rate: Option<i64>,
    /// Peak heart rate (bpm)
    pub peak_heart_rate: Option<i64>,
    /// Estimated VO2max (ml/kg/min), supplied or Cooper-derived
    pub estimated_vo2max: Option<f64>,
}

/// Body weight log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyWeightEntry {
    /// Row id
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Measurement date
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Free-text notes
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_round_trip() {
        for phase in [
            MesocyclePhase::Mev,
            MesocyclePhase::Mav,
            MesocyclePhase::Mrv,
            MesocyclePhase::Deload,
        ] {
            assert_eq!(MesocyclePhase::from_str(phase.as_str()).unwrap(), phase);
        }
    }

    #[test]
    fn test_volume_adjustment_wire_names() {
        assert_eq!(VolumeAdjustment::ReduceOneSet.as_str(), "reduce_1_set");
        assert_eq!(
            VolumeAdjustment::from_str("reduce_2_sets").unwrap(),
            VolumeAdjustment::ReduceTwoSets
        );
        assert!(VolumeAdjustment::from_str("reduce_3_sets").is_err());
    }

    #[test]
    fn test_workout_status_rejects_unknown() {
        assert!(WorkoutStatus::from_str("paused").is_err());
        assert_eq!(
            WorkoutStatus::from_str("in_progress").unwrap(),
            WorkoutStatus::InProgress
        );
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            username: "lifter".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            age: Some(30),
            weight_kg: Some(80.0),
            experience_level: Some(ExperienceLevel::Intermediate),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("lifter"));
    }
}
