// ABOUTME: Recovery autoregulation from daily self-assessment scores
// ABOUTME: Validates 1-5 subscores and maps the total to a volume adjustment

//! Recovery autoregulation
//!
//! A daily assessment collects three 1-5 subscores (sleep quality, muscle
//! soreness, motivation). Their total (3-15) is mapped to a volume
//! adjustment by [`RecoveryPolicy`] thresholds.

use crate::config::fitness::RecoveryPolicy;
use crate::constants::recovery_limits;
use crate::errors::{AppError, AppResult};
use crate::models::VolumeAdjustment;

/// Outcome of a recovery assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// Sum of the three subscores (3-15)
    pub total_score: i64,
    /// Recommended volume adjustment for the day
    pub volume_adjustment: VolumeAdjustment,
}

/// Score the three subscores and derive the day's volume adjustment
///
/// # Errors
///
/// Returns `ValueOutOfRange` if any subscore falls outside 1-5.
pub fn assess(
    sleep_quality: i64,
    muscle_soreness: i64,
    motivation: i64,
    policy: &RecoveryPolicy,
) -> AppResult<Assessment> {
    for (label, score) in [
        ("sleep_quality", sleep_quality),
        ("muscle_soreness", muscle_soreness),
        ("motivation", motivation),
    ] {
        if !(recovery_limits::SCORE_MIN..=recovery_limits::SCORE_MAX).contains(&score) {
            return Err(AppError::out_of_range(format!(
                "{label} must be between {} and {}, got {score}",
                recovery_limits::SCORE_MIN,
                recovery_limits::SCORE_MAX
            )));
        }
    }

    let total_score = sleep_quality + muscle_soreness + motivation;
    Ok(Assessment {
        total_score,
        volume_adjustment: policy.adjustment_for(total_score),
    })
}
