//! # Angle Arithmetic
//!
//! Degree-based helpers for bounded joint angles. A hinge reports its angle
//! in a bounded range (typically `[-180, 180]`), so any accumulation across
//! ticks must unwrap the reading against the previous one instead of taking
//! a plain difference.
//!
//! ## Invariant
//!
//! [`shortest_signed_difference()`] always returns a value in `(-180, 180]`.
//! A crossing of the ±180° boundary (e.g. `170 → -175`) therefore yields a
//! small delta (`+15`) rather than a full-turn artefact (`-345`).

/// Degrees in one full revolution.
pub const FULL_TURN_DEGREES: f64 = 360.0;

const HALF_TURN_DEGREES: f64 = 180.0;

/// The minimal-magnitude signed angle that rotates `from` onto `to`,
/// modulo one full turn.
///
/// Positive results are counter-clockwise about the rotation axis. The
/// exact half-turn case resolves to `+180`.
pub fn shortest_signed_difference(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(FULL_TURN_DEGREES);
    if delta > HALF_TURN_DEGREES {
        delta - FULL_TURN_DEGREES
    } else {
        delta
    }
}

/// Wrap an arbitrary angle into `(-180, 180]`.
pub fn normalize_degrees(angle: f64) -> f64 {
    shortest_signed_difference(0.0, angle)
}

/// Whether an angle reading can be used for accumulation.
///
/// NaN and infinities are never valid. The check is centralised so that the
/// tracker and the configuration validator reject the same inputs.
pub fn is_valid_angle(angle: f64) -> bool {
    angle.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_plain_difference_without_wrap() {
        assert_close(shortest_signed_difference(10.0, 25.0), 15.0);
        assert_close(shortest_signed_difference(25.0, 10.0), -15.0);
    }

    #[test]
    fn test_crossing_positive_boundary() {
        assert_close(shortest_signed_difference(170.0, -175.0), 15.0);
    }

    #[test]
    fn test_crossing_negative_boundary() {
        assert_close(shortest_signed_difference(-175.0, 170.0), -15.0);
    }

    #[test]
    fn test_half_turn_resolves_positive() {
        assert_close(shortest_signed_difference(0.0, 180.0), 180.0);
        assert_close(shortest_signed_difference(90.0, -90.0), 180.0);
    }

    #[test]
    fn test_unbounded_inputs_are_reduced() {
        assert_close(shortest_signed_difference(720.0, 725.0), 5.0);
        assert_close(shortest_signed_difference(-1075.0, 5.0), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_close(normalize_degrees(190.0), -170.0);
        assert_close(normalize_degrees(-190.0), 170.0);
        assert_close(normalize_degrees(360.0), 0.0);
        assert_close(normalize_degrees(-180.0), 180.0);
    }

    #[test]
    fn test_invalid_angles() {
        assert!(is_valid_angle(0.0));
        assert!(is_valid_angle(-179.9));
        assert!(!is_valid_angle(f64::NAN));
        assert!(!is_valid_angle(f64::INFINITY));
        assert!(!is_valid_angle(f64::NEG_INFINITY));
    }

    proptest! {
        /// The unwrapped delta never exceeds a half turn in magnitude.
        #[test]
        fn difference_is_bounded(from in -1000.0f64..1000.0, to in -1000.0f64..1000.0) {
            let d = shortest_signed_difference(from, to);
            prop_assert!(d > -180.0 - 1e-9 && d <= 180.0 + 1e-9, "delta {} out of range", d);
        }

        /// Applying the delta to `from` lands on `to` modulo a full turn.
        #[test]
        fn difference_closes_the_gap(from in -180.0f64..180.0, to in -180.0f64..180.0) {
            let d = shortest_signed_difference(from, to);
            let residual = normalize_degrees(from + d - to);
            prop_assert!(residual.abs() < 1e-6 || (residual.abs() - 360.0).abs() < 1e-6);
        }

        /// Small steps survive the ±180° wrap unchanged.
        #[test]
        fn small_steps_are_preserved(start in -180.0f64..180.0, step in -90.0f64..90.0) {
            let end = normalize_degrees(start + step);
            let d = shortest_signed_difference(start, end);
            prop_assert!((d - step).abs() < 1e-6, "expected {}, got {}", step, d);
        }
    }
}
