//! # Fastener Lifecycle State
//!
//! ## States
//!
//! ```text
//!            snap (first only) + settle
//! Unlocked ───────────────────────────▶ LockedLoose ──tighten──▶ LockedTight
//!    ▲                                      │                        │
//!    │                                      │ turns reached          │
//!    │                                      ▼ (turn-by-count)        │
//!    │                                  Completed                    │
//!    └──────────────────────────loosen───────────────────────────────┘
//! ```
//!
//! `Unlocked` is both the initial state and, for reusable fasteners, the
//! state the machine returns to. `Completed` is terminal.
//!
//! ## Invariant
//!
//! A constraint exists if and only if the state is `LockedLoose` or
//! `LockedTight`. Completion releases it just like an unlock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vrtk_core::{SocketId, Tick};

/// The lifecycle state of a fastener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FastenerState {
    /// Free to be placed or removed.
    #[default]
    Unlocked,
    /// Seated and constrained, not yet tightened.
    LockedLoose,
    /// Tightened; must be loosened before removal.
    LockedTight,
    /// Turn count reached (terminal).
    Completed,
}

impl FastenerState {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unlocked => "UNLOCKED",
            Self::LockedLoose => "LOCKED_LOOSE",
            Self::LockedTight => "LOCKED_TIGHT",
            Self::Completed => "COMPLETED",
        }
    }

    /// Whether a constraint holds the object in this state.
    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::LockedLoose | Self::LockedTight)
    }

    /// Whether rotation is tracked against thresholds in this state.
    pub fn tracks_rotation(&self) -> bool {
        matches!(self, Self::LockedLoose | Self::LockedTight)
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for FastenerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle notifications drained by the host, e.g. to advance a
/// training sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The object settled in a socket and was constrained.
    Locked {
        /// The socket holding the object.
        socket: SocketId,
    },
    /// The tighten threshold was crossed.
    Tightened {
        /// Accumulated rotation at the crossing.
        rotation: f64,
    },
    /// The loosen threshold was crossed; the constraint is gone.
    Unlocked {
        /// Accumulated rotation at the crossing.
        rotation: f64,
    },
    /// The configured number of turns was reached.
    Completed {
        /// Accumulated rotation at completion.
        rotation: f64,
    },
    /// A pending lock was abandoned before the constraint was created.
    LockAborted {
        /// The socket the object had snapped into.
        socket: SocketId,
    },
}

/// Record of a single state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerTransitionRecord {
    /// State before the transition.
    pub from_state: FastenerState,
    /// State after the transition.
    pub to_state: FastenerState,
    /// Simulation tick on which the transition happened.
    pub tick: Tick,
    /// Wall-clock time of the transition (UTC).
    pub recorded_at: DateTime<Utc>,
    /// Accumulated rotation that triggered the transition.
    pub rotation: f64,
}
