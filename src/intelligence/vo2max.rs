// ABOUTME: VO2max estimation and cardio session validation
// ABOUTME: Cooper formula over age-predicted max heart rate plus protocol range checks

//! VO2max estimation and cardio session validation
//!
//! When a session is logged without a measured VO2max, the Cooper formula
//! estimates one from the age-predicted maximum heart rate (`220 - age`)
//! over an assumed resting heart rate of 60 bpm, clamped to the
//! physiological range.

use crate::constants::cardio_limits;
use crate::errors::{AppError, AppResult};
use crate::models::CardioProtocol;

/// Resting heart rate assumed by the Cooper estimate (bpm)
const ASSUMED_RESTING_HR: f64 = 60.0;

/// Estimate VO2max (ml/kg/min) from age via the Cooper formula
///
/// `vo2max = 15.3 * max_hr / resting_hr`, clamped to 20-80.
///
/// # Errors
///
/// Returns `ValueOutOfRange` if the age is outside the supported range.
pub fn cooper_estimate(age: i64) -> AppResult<f64> {
    if !(crate::constants::user_limits::AGE_MIN..=crate::constants::user_limits::AGE_MAX)
        .contains(&age)
    {
        return Err(AppError::out_of_range(format!(
            "Age must be between {} and {} for VO2max estimation, got {age}",
            crate::constants::user_limits::AGE_MIN,
            crate::constants::user_limits::AGE_MAX
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let max_hr = (220 - age) as f64;
    let vo2max = 15.3 * (max_hr / ASSUMED_RESTING_HR);
    Ok(vo2max.clamp(cardio_limits::VO2MAX_MIN, cardio_limits::VO2MAX_MAX))
}

/// Validated cardio session measurements
#[derive(Debug, Clone, Copy)]
pub struct SessionMeasurements {
    /// Duration in minutes
    pub duration_minutes: i64,
    /// Work intervals completed (Norwegian 4x4 only)
    pub intervals_completed: Option<i64>,
    /// Average heart rate (bpm)
    pub average_heart_rate: Option<i64>,
    /// Peak heart rate (bpm)
    pub peak_heart_rate: Option<i64>,
    /// Directly measured or device-reported VO2max
    pub estimated_vo2max: Option<f64>,
}

/// Validate cardio session measurements against protocol limits
///
/// # Errors
///
/// Returns `ValueOutOfRange` for any measurement outside its documented
/// range, or `InvalidInput` when intervals are supplied for a protocol
/// without intervals.
pub fn validate_session(
    protocol: CardioProtocol,
    measurements: &SessionMeasurements,
) -> AppResult<()> {
    let duration = measurements.duration_minutes;
    if !(cardio_limits::DURATION_MIN_MINUTES..=cardio_limits::DURATION_MAX_MINUTES)
        .contains(&duration)
    {
        return Err(AppError::out_of_range(format!(
            "Duration must be between {} and {} minutes, got {duration}",
            cardio_limits::DURATION_MIN_MINUTES,
            cardio_limits::DURATION_MAX_MINUTES
        )));
    }

    for (label, heart_rate) in [
        ("Average heart rate", measurements.average_heart_rate),
        ("Peak heart rate", measurements.peak_heart_rate),
    ] {
        if let Some(bpm) = heart_rate {
            if !(cardio_limits::HEART_RATE_MIN..=cardio_limits::HEART_RATE_MAX).contains(&bpm) {
                return Err(AppError::out_of_range(format!(
                    "{label} must be between {} and {} bpm, got {bpm}",
                    cardio_limits::HEART_RATE_MIN,
                    cardio_limits::HEART_RATE_MAX
                )));
            }
        }
    }

    if let Some(vo2max) = measurements.estimated_vo2max {
        if !(cardio_limits::VO2MAX_MIN..=cardio_limits::VO2MAX_MAX).contains(&vo2max) {
            return Err(AppError::out_of_range(format!(
                "VO2max must be between {} and {} ml/kg/min, got {vo2max}",
                cardio_limits::VO2MAX_MIN,
                cardio_limits::VO2MAX_MAX
            )));
        }
    }

    match (protocol, measurements.intervals_completed) {
        (CardioProtocol::Norwegian4x4, Some(intervals)) => {
            if !(0..=cardio_limits::NORWEGIAN_4X4_MAX_INTERVALS).contains(&intervals) {
                return Err(AppError::out_of_range(format!(
                    "Intervals completed must be between 0 and {}, got {intervals}",
                    cardio_limits::NORWEGIAN_4X4_MAX_INTERVALS
                )));
            }
        }
        (CardioProtocol::Norwegian4x4, None) => {}
        (CardioProtocol::Zone2, Some(_)) => {
            return Err(AppError::invalid_input(
                "Intervals are only recorded for the Norwegian 4x4 protocol",
            ));
        }
        (CardioProtocol::Zone2, None) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements() -> SessionMeasurements {
        SessionMeasurements {
            duration_minutes: 28,
            intervals_completed: Some(4),
            average_heart_rate: Some(165),
            peak_heart_rate: Some(182),
            estimated_vo2max: None,
        }
    }

    #[test]
    fn test_cooper_estimate_for_30_year_old() {
        // 15.3 * (190 / 60) = 48.45
        let vo2max = cooper_estimate(30).unwrap();
        assert!((vo2max - 48.45).abs() < 0.001);
    }

    #[test]
    fn test_cooper_estimate_clamps_to_range() {
        // A 13-year-old's raw estimate (52.8) is in range; extreme inputs clamp
        let young = cooper_estimate(13).unwrap();
        assert!(young <= 80.0);
        let old = cooper_estimate(100).unwrap();
        assert!(old >= 20.0);
    }

    #[test]
    fn test_cooper_rejects_invalid_age() {
        assert!(cooper_estimate(12).is_err());
        assert!(cooper_estimate(101).is_err());
    }

    #[test]
    fn test_valid_norwegian_session() {
        assert!(validate_session(CardioProtocol::Norwegian4x4, &measurements()).is_ok());
    }

    #[test]
    fn test_duration_out_of_range() {
        let mut m = measurements();
        m.duration_minutes = 5;
        assert!(validate_session(CardioProtocol::Norwegian4x4, &m).is_err());
        m.duration_minutes = 121;
        assert!(validate_session(CardioProtocol::Norwegian4x4, &m).is_err());
    }

    #[test]
    fn test_heart_rate_out_of_range() {
        let mut m = measurements();
        m.peak_heart_rate = Some(221);
        assert!(validate_session(CardioProtocol::Norwegian4x4, &m).is_err());
    }

    #[test]
    fn test_zone2_rejects_intervals() {
        let mut m = measurements();
        m.intervals_completed = Some(2);
        assert!(validate_session(CardioProtocol::Zone2, &m).is_err());
        m.intervals_completed = None;
        assert!(validate_session(CardioProtocol::Zone2, &m).is_ok());
    }
}
