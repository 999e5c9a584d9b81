//! # vrtk-core — Foundational Types for the VR Training Kit
//!
//! This crate is the bedrock of the training kit workspace. It defines the
//! primitives every interaction component shares. Every other crate in the
//! workspace depends on `vrtk-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for host handles.** `ObjectId`, `SocketId`,
//!    `ConstraintHandle` are distinct types. A socket handle cannot be passed
//!    where a grabbable object is expected.
//!
//! 2. **One angle convention.** All rotation arithmetic is in degrees and
//!    flows through [`angle::shortest_signed_difference()`]. Wrap-around at
//!    ±180° is handled in exactly one place.
//!
//! 3. **Simulation time is ticks.** The core never reads a wall clock to
//!    make a decision. Durations expressed in seconds are converted to tick
//!    counts through [`FixedStep`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vrtk-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod angle;
pub mod axis;
pub mod error;
pub mod identity;
pub mod step;

// Re-export primary types for ergonomic imports.
pub use angle::{is_valid_angle, normalize_degrees, shortest_signed_difference, FULL_TURN_DEGREES};
pub use axis::RotationAxis;
pub use error::{ConfigError, VrtkError};
pub use identity::{ConstraintHandle, ObjectId, SocketId};
pub use step::{FixedStep, Tick};
