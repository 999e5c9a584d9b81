//! # Threshold Evaluation
//!
//! Pure decision function: given the current state, the rotation
//! accumulated since that state was entered, and the configuration, decide
//! whether a transition threshold has been crossed.
//!
//! ## Sign Convention
//!
//! Tightening is positive rotation measured from the lock point. Loosening
//! is negative rotation measured from the point where the fastener became
//! tight, because the tracker is reset on entering `LockedTight`.
//!
//! ## Tolerance
//!
//! Physical rotation rarely lands exactly on a threshold, so each threshold
//! accepts anything within `tolerance` short of it:
//!
//! | State | Fires when | Next |
//! |---|---|---|
//! | `LockedLoose` | `total >= tighten - tolerance` | `LockedTight` |
//! | `LockedLoose` (turn-by-count) | `total >= turns * 360 - tolerance` | `Completed` |
//! | `LockedTight` | `total <= -(loosen - tolerance)` | `Unlocked` |

use crate::config::{FastenerConfig, FastenerVariant};
use crate::state::FastenerState;

/// Decide the next state for an accumulated rotation, if any.
pub fn evaluate(
    state: FastenerState,
    total_rotation: f64,
    config: &FastenerConfig,
) -> Option<FastenerState> {
    if !total_rotation.is_finite() {
        return None;
    }
    let tolerance = config.tolerance();

    match (state, config.variant()) {
        (FastenerState::LockedLoose, FastenerVariant::TurnByCount { .. }) => {
            let target = config.completion_degrees()?;
            (total_rotation >= target - tolerance).then_some(FastenerState::Completed)
        }
        (FastenerState::LockedLoose, FastenerVariant::Screw | FastenerVariant::Valve { .. }) => {
            (total_rotation >= config.tighten_threshold() - tolerance)
                .then_some(FastenerState::LockedTight)
        }
        (FastenerState::LockedTight, _) => {
            (total_rotation <= -(config.loosen_threshold() - tolerance))
                .then_some(FastenerState::Unlocked)
        }
        (FastenerState::Unlocked | FastenerState::Completed, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FastenerKind, FastenerProfile};

    fn screw(tighten: f64, loosen: f64, tolerance: f64) -> FastenerConfig {
        FastenerProfile {
            tighten_threshold_degrees: tighten,
            loosen_threshold_degrees: loosen,
            angle_tolerance_degrees: tolerance,
            ..FastenerProfile::default()
        }
        .validate()
        .unwrap()
        .config
    }

    #[test]
    fn test_tighten_crossing_with_tolerance() {
        let config = screw(50.0, 90.0, 5.0);
        let loose = FastenerState::LockedLoose;
        assert_eq!(evaluate(loose, 44.9, &config), None);
        assert_eq!(evaluate(loose, 45.0, &config), Some(FastenerState::LockedTight));
        assert_eq!(evaluate(loose, 50.1, &config), Some(FastenerState::LockedTight));
        assert_eq!(evaluate(loose, -10.0, &config), None);
    }

    #[test]
    fn test_loosen_crossing_with_tolerance() {
        let config = screw(50.0, 90.0, 5.0);
        let tight = FastenerState::LockedTight;
        assert_eq!(evaluate(tight, -84.9, &config), None);
        assert_eq!(evaluate(tight, -85.0, &config), Some(FastenerState::Unlocked));
        assert_eq!(evaluate(tight, -120.0, &config), Some(FastenerState::Unlocked));
        // Further tightening never unlocks.
        assert_eq!(evaluate(tight, 30.0, &config), None);
    }

    #[test]
    fn test_zero_tolerance_requires_exact_threshold() {
        let config = screw(50.0, 90.0, 0.0);
        assert_eq!(evaluate(FastenerState::LockedLoose, 49.999, &config), None);
        assert_eq!(
            evaluate(FastenerState::LockedLoose, 50.0, &config),
            Some(FastenerState::LockedTight)
        );
    }

    #[test]
    fn test_unlocked_and_completed_never_transition() {
        let config = screw(50.0, 90.0, 5.0);
        assert_eq!(evaluate(FastenerState::Unlocked, 500.0, &config), None);
        assert_eq!(evaluate(FastenerState::Completed, -500.0, &config), None);
    }

    #[test]
    fn test_nan_total_never_transitions() {
        let config = screw(50.0, 90.0, 5.0);
        assert_eq!(evaluate(FastenerState::LockedLoose, f64::NAN, &config), None);
        assert_eq!(evaluate(FastenerState::LockedTight, f64::NAN, &config), None);
    }

    #[test]
    fn test_turn_by_count_completes_after_turns() {
        let config = FastenerProfile {
            kind: FastenerKind::TurnByCount,
            turns: 2.0,
            angle_tolerance_degrees: 10.0,
            ..FastenerProfile::default()
        }
        .validate()
        .unwrap()
        .config;
        let loose = FastenerState::LockedLoose;
        assert_eq!(evaluate(loose, 50.0, &config), None);
        assert_eq!(evaluate(loose, 709.9, &config), None);
        assert_eq!(evaluate(loose, 710.0, &config), Some(FastenerState::Completed));
    }
}
