// ABOUTME: Mesocycle phase transition planning
// ABOUTME: Resolves target phase and volume multiplier, and rescales set counts

//! Mesocycle phase progression
//!
//! Advancing a program moves it to the next phase of the cycle (or a
//! manually requested phase) and rescales every planned set count by the
//! transition's volume multiplier.

use crate::config::fitness::PhaseProgression;
use crate::models::MesocyclePhase;

/// A resolved phase transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Phase before the transition
    pub previous_phase: MesocyclePhase,
    /// Phase after the transition
    pub new_phase: MesocyclePhase,
    /// Multiplier applied to planned set counts
    pub volume_multiplier: f64,
}

/// Plan a phase transition
///
/// Without a manual target the program advances along the automatic cycle.
/// With one, the multiplier comes from the transition table for adjacent
/// phases or the baseline-volume ratio for arbitrary jumps.
#[must_use]
pub fn plan_transition(
    current: MesocyclePhase,
    manual_target: Option<MesocyclePhase>,
    progression: &PhaseProgression,
) -> Transition {
    let new_phase = manual_target.unwrap_or_else(|| PhaseProgression::next_phase(current));
    Transition {
        previous_phase: current,
        new_phase,
        volume_multiplier: progression.multiplier_for(current, new_phase),
    }
}

/// Rescale a planned set count by a volume multiplier, rounding to nearest
#[must_use]
pub fn scale_sets(sets: i64, multiplier: f64) -> i64 {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let scaled = (sets as f64 * multiplier).round() as i64;
    scaled
}
