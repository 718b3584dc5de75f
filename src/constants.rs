// ABOUTME: Application constants and validation limits shared across modules
// ABOUTME: Groups physiological and API input ranges into documented nested modules

//! Application constants and validation limits
//!
//! Centralized ranges used by request validation and the intelligence layer,
//! so services and tests agree on the documented boundaries.

/// Set logging validation ranges
pub mod set_limits {
    /// Minimum loggable weight in kilograms (bodyweight movements log 0)
    pub const WEIGHT_KG_MIN: f64 = 0.0;
    /// Maximum loggable weight in kilograms
    pub const WEIGHT_KG_MAX: f64 = 500.0;
    /// Minimum repetitions per set
    pub const REPS_MIN: i64 = 1;
    /// Maximum repetitions per set
    pub const REPS_MAX: i64 = 50;
    /// Minimum reps-in-reserve
    pub const RIR_MIN: i64 = 0;
    /// Maximum reps-in-reserve
    pub const RIR_MAX: i64 = 4;
    /// Maximum length of the free-text notes field
    pub const NOTES_MAX_LENGTH: usize = 500;
}

/// Recovery assessment validation ranges (1-5 scale per subscore)
pub mod recovery_limits {
    /// Minimum subscore value
    pub const SCORE_MIN: i64 = 1;
    /// Maximum subscore value
    pub const SCORE_MAX: i64 = 5;
}

/// Body weight validation ranges (kilograms)
pub mod weight_limits {
    /// Minimum plausible body weight
    pub const MIN_KG: f64 = 30.0;
    /// Maximum plausible body weight
    pub const MAX_KG: f64 = 300.0;
}

/// Cardio session validation ranges
pub mod cardio_limits {
    /// Minimum session duration in minutes
    pub const DURATION_MIN_MINUTES: i64 = 10;
    /// Maximum session duration in minutes
    pub const DURATION_MAX_MINUTES: i64 = 120;
    /// Minimum plausible heart rate (bpm)
    pub const HEART_RATE_MIN: i64 = 60;
    /// Maximum plausible heart rate (bpm)
    pub const HEART_RATE_MAX: i64 = 220;
    /// Lower bound of the physiological VO2max range (ml/kg/min)
    pub const VO2MAX_MIN: f64 = 20.0;
    /// Upper bound of the physiological VO2max range (ml/kg/min)
    pub const VO2MAX_MAX: f64 = 80.0;
    /// Maximum work intervals in a Norwegian 4x4 session
    pub const NORWEGIAN_4X4_MAX_INTERVALS: i64 = 4;
}

/// User profile validation ranges
pub mod user_limits {
    /// Minimum user age in years
    pub const AGE_MIN: i64 = 13;
    /// Maximum user age in years
    pub const AGE_MAX: i64 = 100;
    /// Minimum username length
    pub const USERNAME_MIN_LENGTH: usize = 3;
    /// Minimum password length
    pub const PASSWORD_MIN_LENGTH: usize = 8;
}

/// Analytics query bounds
pub mod analytics_limits {
    /// Minimum weeks of history per request
    pub const HISTORY_WEEKS_MIN: i64 = 1;
    /// Maximum weeks of history per request
    pub const HISTORY_WEEKS_MAX: i64 = 52;
    /// Default page size for session listings
    pub const DEFAULT_PAGE_SIZE: i64 = 50;
    /// Maximum page size for session listings
    pub const MAX_PAGE_SIZE: i64 = 200;
}

/// Authentication defaults
pub mod auth_limits {
    /// Bcrypt cost factor for password hashing
    pub const BCRYPT_COST: u32 = 12;
    /// Default JWT lifetime in hours (30 days, home-server use case)
    pub const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 720;
}
