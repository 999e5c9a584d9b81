//! # Host Collaborators
//!
//! The fastener machine never talks to an engine directly. It is composed
//! with a host that implements two small traits:
//!
//! - [`PlacementCollaborator`]: the socket / snap-point side. The
//!   socket's active flag, its "match rotation every tick" flag, whether
//!   something currently rests in it, and how far the placed object still is
//!   from its attach pose.
//! - [`ConstraintBackend`]: the physics side. Creates and destroys a
//!   hinge-like constraint, reads its current angle, and reports whether an
//!   object is still alive in the simulation.
//!
//! A host implements both once per concrete engine backend and is selected
//! at composition time. [`FastenerHost`] is the blanket combination the
//! machine's step function takes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vrtk_core::{ConstraintHandle, ObjectId, RotationAxis, SocketId};

use crate::config::SpringConfig;

/// Static description of a socket used by compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocketDescriptor {
    /// Socket name as authored in the scene.
    pub name: String,
    /// Tags carried by the socket.
    pub tags: BTreeSet<String>,
}

/// How far a placed object is from its final attach pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementProbe {
    /// Distance from the attach point, in metres.
    pub position_error: f64,
    /// Linear speed, in metres per second.
    pub linear_speed: f64,
}

/// The kind of physical constraint to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// A hinge joint: free rotation about one axis, optionally limited.
    Hinge,
    /// Body constraints: position frozen, rotation free about one axis only.
    FrozenBody,
}

/// Hard rotation limits relative to the lock point, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleLimits {
    /// Lower limit (negative, loosening direction).
    pub min_degrees: f64,
    /// Upper limit (positive, tightening direction).
    pub max_degrees: f64,
}

impl AngleLimits {
    /// Clamp an angle into the limits.
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min_degrees, self.max_degrees)
    }
}

/// Everything a backend needs to build the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Hinge or frozen body.
    pub kind: ConstraintKind,
    /// Local rotation axis.
    pub axis: RotationAxis,
    /// Anchor in object-local coordinates. Always the local origin: an
    /// off-centre anchor turns applied torque into translation.
    pub anchor: [f64; 3],
    /// Optional spring.
    pub spring: Option<SpringConfig>,
    /// Optional hard limits.
    pub limits: Option<AngleLimits>,
}

/// The socket / snap-point side of the host.
pub trait PlacementCollaborator {
    /// Describe a socket, or `None` if the host does not know it.
    fn describe_socket(&self, socket: SocketId) -> Option<SocketDescriptor>;

    /// Enable or disable the socket.
    fn set_socket_active(&mut self, socket: SocketId, active: bool);

    /// Whether the socket is currently enabled.
    fn is_socket_active(&self, socket: SocketId) -> bool;

    /// Whether something currently rests in the socket.
    fn is_occupied(&self, socket: SocketId) -> bool;

    /// Toggle the socket's "match rotation every tick" behaviour.
    ///
    /// Must be off while a constraint holds the object, otherwise the socket
    /// re-imposes its own rotation each tick and the constraint never sees
    /// the user's rotation.
    fn set_match_rotation(&mut self, socket: SocketId, enabled: bool);

    /// Positioning state of an object placed in a socket, if measurable.
    fn probe_placement(&self, socket: SocketId, object: ObjectId) -> Option<PlacementProbe>;
}

/// The physics side of the host.
pub trait ConstraintBackend {
    /// Create a constraint on `object` and return its handle.
    fn create_constraint(&mut self, object: ObjectId, spec: &ConstraintSpec) -> ConstraintHandle;

    /// Destroy a constraint. Unknown handles are ignored.
    fn destroy_constraint(&mut self, handle: ConstraintHandle);

    /// Current constrained angle in degrees relative to creation.
    ///
    /// `None` if the handle is unknown. A backend may return a non-finite
    /// value; the caller is responsible for rejecting it.
    fn constraint_angle(&self, handle: ConstraintHandle) -> Option<f64>;

    /// Whether the object is still part of the simulation.
    fn is_alive(&self, object: ObjectId) -> bool;
}

/// A host implementing both collaborator traits.
pub trait FastenerHost: PlacementCollaborator + ConstraintBackend {}

impl<T: PlacementCollaborator + ConstraintBackend> FastenerHost for T {}
