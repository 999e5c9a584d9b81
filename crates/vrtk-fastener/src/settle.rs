//! # Positioning Settle Monitor
//!
//! Valve-style fasteners are body-constrained in place rather than hinged,
//! so freezing them before the socket has finished moving them leaves the
//! object visibly off its seat. The monitor watches the placement probe each
//! tick and reports when the object has been within tolerance for enough
//! consecutive ticks.
//!
//! The wait is bounded. If the object never settles (a jittering socket, a
//! host that cannot measure placement) the monitor times out and the caller
//! applies the constraint anyway: a slightly-off fastener is recoverable, a
//! fastener that never locks is not.

use serde::{Deserialize, Serialize};

use vrtk_core::Tick;

use crate::collaborator::PlacementProbe;
use crate::config::PositioningConfig;

/// Result of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettleStatus {
    /// Still moving or not yet stable for long enough.
    Waiting {
        /// Consecutive in-tolerance ticks so far.
        stable_ticks: u32,
    },
    /// In tolerance for the required number of ticks.
    Settled {
        /// Ticks spent waiting.
        elapsed_ticks: u64,
    },
    /// Gave up waiting.
    TimedOut {
        /// Ticks spent waiting.
        elapsed_ticks: u64,
    },
}

impl SettleStatus {
    /// Whether the wait is over, settled or not.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Waiting { .. })
    }
}

/// Tracks one positioning wait.
#[derive(Debug, Clone)]
pub struct SettleMonitor {
    config: PositioningConfig,
    started: Tick,
    stable: u32,
}

impl SettleMonitor {
    /// Start waiting at `now`.
    pub fn start(config: PositioningConfig, now: Tick) -> Self {
        Self {
            config,
            started: now,
            stable: 0,
        }
    }

    /// Fold one placement probe into the wait.
    ///
    /// A missing or non-finite probe counts as out of tolerance.
    pub fn observe(&mut self, now: Tick, probe: Option<PlacementProbe>) -> SettleStatus {
        let elapsed_ticks = now.since(self.started);

        if probe.is_some_and(|p| self.within_tolerance(&p)) {
            self.stable = self.stable.saturating_add(1);
        } else {
            self.stable = 0;
        }

        if self.stable >= self.config.stable_ticks {
            return SettleStatus::Settled { elapsed_ticks };
        }
        if elapsed_ticks >= self.config.timeout_ticks {
            tracing::warn!(
                elapsed_ticks,
                timeout_ticks = self.config.timeout_ticks,
                "positioning did not settle; applying constraint anyway"
            );
            return SettleStatus::TimedOut { elapsed_ticks };
        }
        SettleStatus::Waiting {
            stable_ticks: self.stable,
        }
    }

    fn within_tolerance(&self, probe: &PlacementProbe) -> bool {
        // NaN compares false, so non-finite probes never count as stable.
        probe.position_error.abs() <= self.config.position_tolerance
            && probe.linear_speed.abs() <= self.config.velocity_tolerance
    }
}
