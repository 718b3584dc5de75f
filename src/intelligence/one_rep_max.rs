// ABOUTME: One-rep-max estimation from submaximal sets
// ABOUTME: Epley formula with reps-in-reserve adjustment for effective rep count

//! One-rep-max estimation
//!
//! Uses the Epley formula adjusted for reps-in-reserve: a set taken to 8 reps
//! at RIR 2 represents 6 "effective" reps of intensity, so
//! `1rm = weight * (1 + (reps - rir) / 30)`.

/// Estimate a one-rep max from one logged set
///
/// Bodyweight movements logged at 0 kg estimate to 0.
#[must_use]
pub fn estimate(weight_kg: f64, reps: i64, rir: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let effective_reps = (reps - rir) as f64;
    weight_kg * (1.0 + effective_reps / 30.0)
}

#[cfg(test)]
mod tests {
    use super::estimate;

    #[test]
    fn test_known_value() {
        // 100 kg x 8 at RIR 2: 100 * (1 + 6/30) = 120
        let one_rm = estimate(100.0, 8, 2);
        assert!((one_rm - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_true_max_is_identity() {
        // A single rep at RIR 0 is already the max
        let one_rm = estimate(140.0, 1, 0);
        assert!((one_rm - 140.0 * (1.0 + 1.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_effective_reps() {
        // More effective reps at the same load imply a higher max
        assert!(estimate(100.0, 10, 0) > estimate(100.0, 10, 2));
        assert!(estimate(100.0, 12, 2) > estimate(100.0, 8, 2));
    }

    #[test]
    fn test_bodyweight_zero_load() {
        assert!(estimate(0.0, 12, 1).abs() < f64::EPSILON);
    }
}
