// ABOUTME: Weekly volume tracking against MEV/MAV/MRV landmarks
// ABOUTME: ISO week boundary math, zone classification, and zone warnings

//! Weekly volume tracking
//!
//! Weekly set counts per muscle group are classified against the landmark
//! table. The training week is the ISO week, Monday through Sunday.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::fitness::VolumeLandmarks;

/// Volume zone relative to the landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeZone {
    /// Below minimum effective volume
    BelowMev,
    /// At or above MEV, below MAV
    Adequate,
    /// Within the MAV-MRV range
    Optimal,
    /// Above maximum recoverable volume
    AboveMrv,
    /// Mid-week: plan is in range and completion is at least half
    OnTrack,
}

impl VolumeZone {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BelowMev => "below_mev",
            Self::Adequate => "adequate",
            Self::Optimal => "optimal",
            Self::AboveMrv => "above_mrv",
            Self::OnTrack => "on_track",
        }
    }
}

/// Monday and Sunday of the ISO week containing `date`
#[must_use]
pub fn week_boundaries(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_from_monday = u64::from(date.weekday().num_days_from_monday());
    let monday = date - Days::new(days_from_monday);
    let sunday = monday + Days::new(6);
    (monday, sunday)
}

/// Classify a completed weekly set count against the landmarks
#[must_use]
pub fn classify_zone(completed_sets: i64, landmarks: VolumeLandmarks) -> VolumeZone {
    if completed_sets < landmarks.mev {
        VolumeZone::BelowMev
    } else if completed_sets < landmarks.mav {
        VolumeZone::Adequate
    } else if completed_sets <= landmarks.mrv {
        VolumeZone::Optimal
    } else {
        VolumeZone::AboveMrv
    }
}

/// Classify the current week, reporting `on_track` mid-week
///
/// A week in progress is on track when the planned weekly sets land in the
/// adequate-or-better range and at least half of them are already completed.
#[must_use]
pub fn classify_zone_with_on_track(
    completed_sets: i64,
    planned_sets: i64,
    landmarks: VolumeLandmarks,
) -> VolumeZone {
    #[allow(clippy::cast_precision_loss)]
    let half_planned = planned_sets as f64 * 0.5;
    #[allow(clippy::cast_precision_loss)]
    let completed = completed_sets as f64;

    let planned_in_range = planned_sets >= landmarks.mev && planned_sets <= landmarks.mrv;
    if planned_in_range && completed >= half_planned {
        return VolumeZone::OnTrack;
    }
    classify_zone(completed_sets, landmarks)
}

/// Human-readable warning for zones that call for intervention
#[must_use]
pub fn zone_warning(zone: VolumeZone, muscle_group: &str) -> Option<String> {
    match zone {
        VolumeZone::BelowMev => Some(format!(
            "{muscle_group} volume is below minimum effective volume (MEV). Increase sets for growth."
        )),
        VolumeZone::AboveMrv => Some(format!(
            "{muscle_group} volume exceeds maximum recoverable volume (MRV). Risk of overtraining."
        )),
        VolumeZone::Adequate | VolumeZone::Optimal | VolumeZone::OnTrack => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHEST: VolumeLandmarks = VolumeLandmarks {
        mev: 8,
        mav: 14,
        mrv: 22,
    };

    #[test]
    fn test_week_boundaries_mid_week() {
        // 2026-08-26 is a Wednesday
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let (monday, sunday) = week_boundaries(date);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(sunday, NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());
    }

    #[test]
    fn test_week_boundaries_on_sunday() {
        // Sunday belongs to the week that started the previous Monday
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let (monday, sunday) = week_boundaries(date);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(sunday, date);
    }

    #[test]
    fn test_week_boundaries_on_monday() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let (monday, _) = week_boundaries(date);
        assert_eq!(monday, date);
    }

    #[test]
    fn test_zone_classification_boundaries() {
        assert_eq!(classify_zone(7, CHEST), VolumeZone::BelowMev);
        assert_eq!(classify_zone(8, CHEST), VolumeZone::Adequate);
        assert_eq!(classify_zone(13, CHEST), VolumeZone::Adequate);
        assert_eq!(classify_zone(14, CHEST), VolumeZone::Optimal);
        assert_eq!(classify_zone(22, CHEST), VolumeZone::Optimal);
        assert_eq!(classify_zone(23, CHEST), VolumeZone::AboveMrv);
    }

    #[test]
    fn test_on_track_requires_half_completion() {
        // Plan of 16 sets is optimal; 8 completed is exactly half
        assert_eq!(
            classify_zone_with_on_track(8, 16, CHEST),
            VolumeZone::OnTrack
        );
        // 7 completed is under half, falls back to the plain zone
        assert_eq!(
            classify_zone_with_on_track(7, 16, CHEST),
            VolumeZone::BelowMev
        );
    }

    #[test]
    fn test_on_track_requires_plan_in_range() {
        // Plan above MRV never reads as on track
        assert_eq!(
            classify_zone_with_on_track(12, 25, CHEST),
            VolumeZone::Adequate
        );
    }

    #[test]
    fn test_zone_warnings() {
        assert!(zone_warning(VolumeZone::BelowMev, "chest")
            .unwrap()
            .contains("MEV"));
        assert!(zone_warning(VolumeZone::AboveMrv, "chest")
            .unwrap()
            .contains("MRV"));
        assert!(zone_warning(VolumeZone::Optimal, "chest").is_none());
    }
}
