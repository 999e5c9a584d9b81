//! # vrtk-fastener — Fastener Lifecycle State Machine
//!
//! Tracks continuous rotation of a grabbed, socketed object and classifies
//! it into a lock / tighten / loosen / unlock lifecycle, driving constraint
//! creation and socket gating as side effects. Screws, valves and
//! turn-by-count tools are configuration variants of one machine.
//!
//! ## Components
//!
//! - **Rotation tracking** (`tracker.rs`): unwraps bounded joint angles into
//!   an unbounded signed total relative to a baseline.
//!
//! - **Threshold evaluation** (`threshold.rs`): pure decision function
//!   mapping `(state, total, config)` to an optional next state.
//!
//! - **State machine** (`machine.rs`): owns the state, the tracker, the
//!   deferred lock and the socket gate; consumes queued host events once
//!   per simulation tick.
//!
//! - **Socket gate** (`gate.rs`): keeps the socket's active flag in step
//!   with the lifecycle, plus the scene-wide occupied-aware sweep.
//!
//! - **Deferred actions** (`deferred.rs`) and **positioning settle**
//!   (`settle.rs`): the tick-counted replacements for "wait a couple of
//!   physics steps" and "wait until the socket stops moving".
//!
//! - **Registry** (`registry.rs`): explicit registration and event routing
//!   for every fastener and socket in a scene.
//!
//! ## Host Boundary
//!
//! The crate never talks to an engine. Hosts implement
//! [`PlacementCollaborator`] and [`ConstraintBackend`] once per backend.

pub mod collaborator;
pub mod config;
pub mod deferred;
pub mod gate;
pub mod machine;
pub mod registry;
pub mod settle;
pub mod state;
pub mod threshold;
pub mod tracker;

#[cfg(test)]
mod testing;

// ─── Configuration re-exports ───────────────────────────────────────

pub use config::{
    ConfigWarning, FastenerConfig, FastenerKind, FastenerProfile, FastenerVariant,
    PositioningConfig, PositioningProfile, SocketCompatibility, SpringConfig, ValidatedProfile,
    MIN_SETTLE_TICKS,
};

// ─── Host boundary re-exports ───────────────────────────────────────

pub use collaborator::{
    AngleLimits, ConstraintBackend, ConstraintKind, ConstraintSpec, FastenerHost,
    PlacementCollaborator, PlacementProbe, SocketDescriptor,
};

// ─── Machine re-exports ─────────────────────────────────────────────

pub use deferred::{DeferredHandle, DeferredQueue};
pub use gate::{disable_all_sockets, GateMode, ReleaseOutcome, SocketGate, SweepReport};
pub use machine::{Diagnostic, FastenerEvent, FastenerStateMachine, MAX_DIAGNOSTICS};
pub use registry::{FastenerRegistry, HostEvent, RegistryError};
pub use settle::{SettleMonitor, SettleStatus};
pub use state::{FastenerState, FastenerTransitionRecord, LifecycleEvent};
pub use threshold::evaluate;
pub use tracker::{RotationTracker, SampleOutcome};
