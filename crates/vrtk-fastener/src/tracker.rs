//! # Rotation Tracker
//!
//! Turns a stream of bounded joint angles into an unbounded, signed
//! accumulated rotation measured from a baseline.
//!
//! Each sample is unwrapped against the previous one with
//! [`shortest_signed_difference()`], so a hinge reading that jumps from
//! `170` to `-175` contributes `+15`, not `-345`. The tracker assumes the
//! object turns less than half a revolution between two samples.
//!
//! ## Invariants
//!
//! - `reset(baseline)` sets the accumulated rotation to zero and seeds the
//!   previous sample with the baseline, so the first sample after a reset
//!   only contributes the motion since the reset.
//! - Non-finite samples are rejected: counted, logged, and never folded into
//!   the accumulator or the previous sample.

use serde::{Deserialize, Serialize};

use vrtk_core::{is_valid_angle, shortest_signed_difference};

/// What happened to a single angle sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SampleOutcome {
    /// The sample was accumulated.
    Accumulated {
        /// Unwrapped change since the previous sample.
        delta: f64,
        /// Accumulated rotation after this sample.
        total: f64,
    },
    /// The sample seeded the tracker (no previous valid angle).
    Seeded {
        /// The seeding angle.
        angle: f64,
    },
    /// The sample was not a finite number and was discarded.
    Rejected,
}

/// Accumulates signed rotation relative to a baseline angle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotationTracker {
    baseline: Option<f64>,
    previous: Option<f64>,
    total: f64,
    rejected: u64,
}

impl RotationTracker {
    /// A tracker with no baseline yet; the first valid sample seeds it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart accumulation from `baseline`.
    ///
    /// A non-finite baseline is logged and leaves the tracker unseeded: the
    /// next finite sample becomes the baseline.
    pub fn reset(&mut self, baseline: f64) {
        self.total = 0.0;
        if is_valid_angle(baseline) {
            self.baseline = Some(baseline);
            self.previous = Some(baseline);
        } else {
            tracing::debug!(baseline, "non-finite baseline angle; waiting for next valid sample");
            self.rejected += 1;
            self.baseline = None;
            self.previous = None;
        }
    }

    /// Fold one angle reading into the accumulator.
    pub fn sample(&mut self, current: f64) -> SampleOutcome {
        if !is_valid_angle(current) {
            self.rejected += 1;
            tracing::debug!(
                angle = current,
                total = self.total,
                "discarding non-finite angle sample"
            );
            return SampleOutcome::Rejected;
        }

        match self.previous {
            Some(previous) => {
                let delta = shortest_signed_difference(previous, current);
                self.previous = Some(current);
                self.total += delta;
                SampleOutcome::Accumulated {
                    delta,
                    total: self.total,
                }
            }
            None => {
                self.baseline = Some(current);
                self.previous = Some(current);
                SampleOutcome::Seeded { angle: current }
            }
        }
    }

    /// Signed rotation accumulated since the last reset, in degrees.
    pub fn total_rotation(&self) -> f64 {
        self.total
    }

    /// Angle captured at the last reset (or seeding sample).
    pub fn baseline_angle(&self) -> Option<f64> {
        self.baseline
    }

    /// The last accepted angle.
    pub fn previous_angle(&self) -> Option<f64> {
        self.previous
    }

    /// Number of non-finite readings discarded over the tracker's lifetime.
    pub fn rejected_samples(&self) -> u64 {
        self.rejected
    }
}
