// ABOUTME: Versioned training-methodology policy tables (landmarks, thresholds, multipliers)
// ABOUTME: Explicit configuration data consumed by the intelligence layer instead of inline conditionals

//! Training methodology policy tables
//!
//! The categorical tables of the methodology live here as explicit, versioned
//! configuration data so they can be unit-tested and tuned independently of
//! the formulas that consume them:
//!
//! - Per-muscle-group MEV/MAV/MRV volume landmarks (Renaissance
//!   Periodization weekly set counts)
//! - Recovery-score thresholds mapping a 3-15 total to a volume adjustment
//! - Mesocycle phase progression order and volume multipliers

use crate::models::{MesocyclePhase, VolumeAdjustment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekly set-count landmarks for one muscle group
///
/// - MEV (Minimum Effective Volume): lower threshold for growth
/// - MAV (Maximum Adaptive Volume): optimal range
/// - MRV (Maximum Recoverable Volume): upper limit before overtraining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeLandmarks {
    pub mev: i64,
    pub mav: i64,
    pub mrv: i64,
}

impl VolumeLandmarks {
    const fn new(mev: i64, mav: i64, mrv: i64) -> Self {
        Self { mev, mav, mrv }
    }
}

/// Per-muscle-group landmark table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkTable {
    groups: BTreeMap<String, VolumeLandmarks>,
}

impl LandmarkTable {
    /// Look up landmarks for a muscle group
    ///
    /// Unknown groups fall back to zeroed landmarks; the exercise catalog
    /// validates muscle-group names on input, so the fallback only covers
    /// legacy data.
    #[must_use]
    pub fn get(&self, muscle_group: &str) -> VolumeLandmarks {
        self.groups
            .get(muscle_group)
            .copied()
            .unwrap_or(VolumeLandmarks::new(0, 0, 0))
    }

    /// Muscle groups with configured landmarks
    pub fn muscle_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

impl Default for LandmarkTable {
    fn default() -> Self {
        let entries: [(&str, VolumeLandmarks); 21] = [
            // Primary muscle groups
            ("chest", VolumeLandmarks::new(8, 14, 22)),
            ("biceps", VolumeLandmarks::new(6, 12, 20)),
            ("triceps", VolumeLandmarks::new(6, 12, 22)),
            ("quads", VolumeLandmarks::new(8, 14, 24)),
            ("hamstrings", VolumeLandmarks::new(6, 12, 20)),
            ("glutes", VolumeLandmarks::new(6, 12, 20)),
            ("calves", VolumeLandmarks::new(8, 14, 22)),
            ("abs", VolumeLandmarks::new(8, 16, 28)),
            // Back
            ("lats", VolumeLandmarks::new(10, 16, 26)),
            ("traps", VolumeLandmarks::new(6, 12, 20)),
            ("mid_back", VolumeLandmarks::new(10, 16, 26)),
            ("lower_back", VolumeLandmarks::new(6, 12, 20)),
            // Shoulders
            ("front_delts", VolumeLandmarks::new(4, 8, 14)),
            ("side_delts", VolumeLandmarks::new(8, 16, 26)),
            ("rear_delts", VolumeLandmarks::new(8, 14, 22)),
            // Supporting muscles
            ("core", VolumeLandmarks::new(8, 16, 28)),
            ("obliques", VolumeLandmarks::new(6, 12, 20)),
            ("forearms", VolumeLandmarks::new(4, 8, 16)),
            ("brachialis", VolumeLandmarks::new(4, 8, 14)),
            // Aggregate aliases kept for older data
            ("back", VolumeLandmarks::new(10, 16, 26)),
            ("shoulders", VolumeLandmarks::new(8, 14, 22)),
        ];
        Self {
            groups: entries
                .into_iter()
                .map(|(name, landmarks)| (name.to_owned(), landmarks))
                .collect(),
        }
    }
}

/// Recovery-score thresholds for autoregulation
///
/// The total score (sum of three 1-5 subscores, range 3-15) is mapped to a
/// [`VolumeAdjustment`] by inclusive lower bounds, checked from best to
/// worst recovery. Anything below `reduce_two_min` is a rest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// Minimum total score requiring no adjustment
    pub no_adjustment_min: i64,
    /// Minimum total score for a one-set reduction
    pub reduce_one_min: i64,
    /// Minimum total score for a two-set reduction
    pub reduce_two_min: i64,
}

impl RecoveryPolicy {
    /// Map a total recovery score to its volume adjustment
    #[must_use]
    pub fn adjustment_for(&self, total_score: i64) -> VolumeAdjustment {
        if total_score >= self.no_adjustment_min {
            VolumeAdjustment::None
        } else if total_score >= self.reduce_one_min {
            VolumeAdjustment::ReduceOneSet
        } else if total_score >= self.reduce_two_min {
            VolumeAdjustment::ReduceTwoSets
        } else {
            VolumeAdjustment::RestDay
        }
    }
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        // 12-15 none, 9-11 reduce_1_set, 6-8 reduce_2_sets, 3-5 rest_day
        Self {
            no_adjustment_min: 12,
            reduce_one_min: 9,
            reduce_two_min: 6,
        }
    }
}

/// Mesocycle phase progression table
///
/// Automatic progression follows `mev -> mav -> mrv -> deload -> mev`; each
/// transition carries the multiplier applied to every program-exercise set
/// count. Manual jumps between non-adjacent phases use the ratio of the
/// per-phase baseline volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseProgression {
    /// MEV -> MAV volume increase
    pub mev_to_mav: f64,
    /// MAV -> MRV volume increase
    pub mav_to_mrv: f64,
    /// MRV -> deload volume cut
    pub mrv_to_deload: f64,
    /// Deload -> MEV reset to baseline
    pub deload_to_mev: f64,
}

impl PhaseProgression {
    /// Next phase in the automatic cycle
    #[must_use]
    pub fn next_phase(phase: MesocyclePhase) -> MesocyclePhase {
        match phase {
            MesocyclePhase::Mev => MesocyclePhase::Mav,
            MesocyclePhase::Mav => MesocyclePhase::Mrv,
            MesocyclePhase::Mrv => MesocyclePhase::Deload,
            MesocyclePhase::Deload => MesocyclePhase::Mev,
        }
    }

    /// Multiplier for the automatic transition out of `phase`
    #[must_use]
    pub fn auto_multiplier(&self, phase: MesocyclePhase) -> f64 {
        match phase {
            MesocyclePhase::Mev => self.mev_to_mav,
            MesocyclePhase::Mav => self.mav_to_mrv,
            MesocyclePhase::Mrv => self.mrv_to_deload,
            MesocyclePhase::Deload => self.deload_to_mev,
        }
    }

    /// Volume baseline of a phase relative to MEV, used for manual jumps
    fn baseline_volume(phase: MesocyclePhase) -> f64 {
        match phase {
            MesocyclePhase::Mev => 1.0,
            MesocyclePhase::Mav => 1.2,
            MesocyclePhase::Mrv => 1.38,
            MesocyclePhase::Deload => 0.69,
        }
    }

    /// Multiplier for an arbitrary (possibly manual) transition
    #[must_use]
    pub fn multiplier_for(&self, from: MesocyclePhase, to: MesocyclePhase) -> f64 {
        if from == to {
            return 1.0;
        }
        if Self::next_phase(from) == to {
            return self.auto_multiplier(from);
        }
        Self::baseline_volume(to) / Self::baseline_volume(from)
    }
}

impl Default for PhaseProgression {
    fn default() -> Self {
        Self {
            mev_to_mav: 1.2,
            mav_to_mrv: 1.15,
            mrv_to_deload: 0.5,
            deload_to_mev: 2.0,
        }
    }
}

/// Complete fitness policy consumed by the intelligence layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitnessPolicy {
    /// Per-muscle-group volume landmarks
    pub landmarks: LandmarkTable,
    /// Recovery autoregulation thresholds
    pub recovery: RecoveryPolicy,
    /// Mesocycle phase multipliers
    pub phases: PhaseProgression,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_lookup() {
        let table = LandmarkTable::default();
        let chest = table.get("chest");
        assert_eq!(chest.mev, 8);
        assert_eq!(chest.mav, 14);
        assert_eq!(chest.mrv, 22);
    }

    #[test]
    fn test_unknown_muscle_group_falls_back_to_zero() {
        let table = LandmarkTable::default();
        let unknown = table.get("neck");
        assert_eq!(unknown.mev, 0);
        assert_eq!(unknown.mrv, 0);
    }

    #[test]
    fn test_recovery_thresholds() {
        let policy = RecoveryPolicy::default();
        assert_eq!(policy.adjustment_for(15), VolumeAdjustment::None);
        assert_eq!(policy.adjustment_for(12), VolumeAdjustment::None);
        assert_eq!(policy.adjustment_for(11), VolumeAdjustment::ReduceOneSet);
        assert_eq!(policy.adjustment_for(9), VolumeAdjustment::ReduceOneSet);
        assert_eq!(policy.adjustment_for(8), VolumeAdjustment::ReduceTwoSets);
        assert_eq!(policy.adjustment_for(6), VolumeAdjustment::ReduceTwoSets);
        assert_eq!(policy.adjustment_for(5), VolumeAdjustment::RestDay);
        assert_eq!(policy.adjustment_for(3), VolumeAdjustment::RestDay);
    }

    #[test]
    fn test_auto_phase_cycle() {
        let phases = PhaseProgression::default();
        assert_eq!(
            PhaseProgression::next_phase(MesocyclePhase::Mev),
            MesocyclePhase::Mav
        );
        assert_eq!(
            PhaseProgression::next_phase(MesocyclePhase::Deload),
            MesocyclePhase::Mev
        );
        assert!((phases.auto_multiplier(MesocyclePhase::Mev) - 1.2).abs() < f64::EPSILON);
        assert!((phases.auto_multiplier(MesocyclePhase::Mrv) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_manual_jump_uses_baseline_ratio() {
        let phases = PhaseProgression::default();
        // mev -> mrv skips a phase: 1.38 / 1.0
        let multiplier = phases.multiplier_for(MesocyclePhase::Mev, MesocyclePhase::Mrv);
        assert!((multiplier - 1.38).abs() < 1e-9);
        // same phase is a no-op
        let unchanged = phases.multiplier_for(MesocyclePhase::Mav, MesocyclePhase::Mav);
        assert!((unchanged - 1.0).abs() < f64::EPSILON);
    }
}
