//! # Simulation Time — Ticks and Fixed Steps
//!
//! The interaction core is driven by an external fixed-rate physics tick.
//! `Tick` counts completed steps; `FixedStep` converts authored durations
//! (seconds) into tick counts so that every timing decision inside the core
//! is made in whole ticks.
//!
//! ## Invariant
//!
//! Tick counts derived from a duration round *up*: a timeout of 3.0 s at
//! 50 Hz is 150 ticks, and 0.01 s at 50 Hz is one tick, never zero.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A monotonically increasing simulation step counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    /// The tick before the first simulation step.
    pub const ZERO: Tick = Tick(0);

    /// The following tick.
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }

    /// This tick advanced by `ticks` steps.
    pub fn after(self, ticks: u64) -> Tick {
        Tick(self.0.saturating_add(ticks))
    }

    /// Number of steps elapsed since `earlier` (zero if `earlier` is later).
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

/// A fixed simulation step rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    /// Seconds per simulation step.
    dt_seconds: f64,
}

impl FixedStep {
    /// The default physics rate of common engines (50 Hz).
    pub const DEFAULT_HZ: f64 = 50.0;

    /// Create a step from a rate in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not finite or not positive.
    pub fn from_hz(hz: f64) -> Result<Self, ConfigError> {
        if !hz.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "tick_rate_hz",
                value: hz,
            });
        }
        if hz <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "tick_rate_hz",
                value: hz,
            });
        }
        Ok(Self { dt_seconds: 1.0 / hz })
    }

    /// Seconds per step.
    pub fn dt_seconds(&self) -> f64 {
        self.dt_seconds
    }

    /// Number of whole ticks covering `seconds`, rounded up.
    ///
    /// Non-positive or non-finite durations map to zero ticks.
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        // Guard against 3.0 / 0.02 evaluating to 150.00000000000003.
        let exact = seconds / self.dt_seconds;
        let rounded = exact.round();
        if (exact - rounded).abs() < 1e-9 {
            rounded as u64
        } else {
            exact.ceil() as u64
        }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            dt_seconds: 1.0 / Self::DEFAULT_HZ,
        }
    }
}
