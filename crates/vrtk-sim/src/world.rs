//! # In-Memory Simulation World
//!
//! A deliberately small physics stand-in: bodies carry a single twist angle
//! about their constraint axis, sockets hold at most one body, and
//! constraints clamp the twist to their limits relative to the angle the
//! body had when the constraint was created.
//!
//! Constraint angle readings are bounded to `(-180, 180]` the way a real
//! hinge reports them, so the fastener's tracker has to unwrap them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use vrtk_core::{normalize_degrees, ConstraintHandle, ObjectId, SocketId};
use vrtk_fastener::{
    ConstraintBackend, ConstraintSpec, PlacementCollaborator, PlacementProbe, SocketDescriptor,
};

/// A snap point in the world.
#[derive(Debug, Clone, Serialize)]
pub struct SimSocket {
    /// Authored name.
    pub name: String,
    /// Compatibility tags.
    pub tags: BTreeSet<String>,
    /// Whether the socket accepts objects.
    pub active: bool,
    /// Whether the socket re-imposes its rotation every tick.
    pub match_rotation: bool,
    /// The body resting in the socket, if any.
    pub occupant: Option<ObjectId>,
}

/// A grabbable rigid body.
#[derive(Debug, Clone, Serialize)]
pub struct SimBody {
    /// Authored name.
    pub name: String,
    /// Whether the body still exists.
    pub alive: bool,
    /// Unbounded twist about the constraint axis, in degrees.
    pub twist_degrees: f64,
    /// Distance from the socket attach point, in metres.
    pub position_error: f64,
    /// Linear speed, in metres per second.
    pub linear_speed: f64,
}

#[derive(Debug, Clone)]
struct SimConstraint {
    object: ObjectId,
    spec: ConstraintSpec,
    origin_degrees: f64,
}

/// Sockets, bodies and constraints, implementing both host traits.
#[derive(Debug, Default)]
pub struct SimWorld {
    sockets: BTreeMap<SocketId, SimSocket>,
    bodies: BTreeMap<ObjectId, SimBody>,
    constraints: BTreeMap<ConstraintHandle, SimConstraint>,
    next_handle: u64,
}

impl SimWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active, empty socket.
    pub fn add_socket<I, S>(&mut self, name: &str, tags: I) -> SocketId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = SocketId::new();
        self.sockets.insert(
            id,
            SimSocket {
                name: name.to_string(),
                tags: tags.into_iter().map(Into::into).collect(),
                active: true,
                match_rotation: true,
                occupant: None,
            },
        );
        id
    }

    /// Add a body at rest.
    pub fn add_body(&mut self, name: &str) -> ObjectId {
        let id = ObjectId::new();
        self.bodies.insert(
            id,
            SimBody {
                name: name.to_string(),
                alive: true,
                twist_degrees: 0.0,
                position_error: 0.0,
                linear_speed: 0.0,
            },
        );
        id
    }

    /// Look up a socket.
    pub fn socket(&self, id: SocketId) -> Option<&SimSocket> {
        self.sockets.get(&id)
    }

    /// Look up a body.
    pub fn body(&self, id: ObjectId) -> Option<&SimBody> {
        self.bodies.get(&id)
    }

    /// Place a body into a socket.
    ///
    /// Refused if the socket is disabled or holds another body. Re-placing
    /// the body that already rests there is accepted.
    pub fn snap(&mut self, object: ObjectId, socket: SocketId) -> bool {
        if !self.bodies.get(&object).is_some_and(|b| b.alive) {
            return false;
        }
        let Some(slot) = self.sockets.get_mut(&socket) else {
            return false;
        };
        if !slot.active || slot.occupant.is_some_and(|o| o != object) {
            tracing::debug!(%object, %socket, active = slot.active, "snap refused");
            return false;
        }
        slot.occupant = Some(object);
        true
    }

    /// Take a body out of a socket. Returns `false` if it was not there.
    pub fn unsnap(&mut self, object: ObjectId, socket: SocketId) -> bool {
        match self.sockets.get_mut(&socket) {
            Some(slot) if slot.occupant == Some(object) => {
                slot.occupant = None;
                true
            }
            _ => false,
        }
    }

    /// Apply a twist to a body, respecting any constraint limits.
    ///
    /// Returns the twist actually applied.
    pub fn rotate(&mut self, object: ObjectId, degrees: f64) -> f64 {
        let limits = self
            .constraints
            .values()
            .find(|c| c.object == object)
            .and_then(|c| c.spec.limits.map(|l| (l, c.origin_degrees)));
        let Some(body) = self.bodies.get_mut(&object) else {
            return 0.0;
        };
        let before = body.twist_degrees;
        let target = before + degrees;
        body.twist_degrees = match limits {
            Some((limits, origin)) => origin + limits.clamp(target - origin),
            None => target,
        };
        body.twist_degrees - before
    }

    /// Set the placement error a socket would measure for a body.
    pub fn set_placement(&mut self, object: ObjectId, position_error: f64, linear_speed: f64) {
        if let Some(body) = self.bodies.get_mut(&object) {
            body.position_error = position_error;
            body.linear_speed = linear_speed;
        }
    }

    /// Remove a body from the simulation along with its constraints and
    /// socket occupancy.
    pub fn destroy(&mut self, object: ObjectId) {
        if let Some(body) = self.bodies.get_mut(&object) {
            body.alive = false;
        }
        self.constraints.retain(|_, c| c.object != object);
        for slot in self.sockets.values_mut() {
            if slot.occupant == Some(object) {
                slot.occupant = None;
            }
        }
    }

    /// The constraint currently holding a body, if any.
    pub fn constraint_on(&self, object: ObjectId) -> Option<&ConstraintSpec> {
        self.constraints
            .values()
            .find(|c| c.object == object)
            .map(|c| &c.spec)
    }

    /// Number of live constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All sockets, in id order.
    pub fn sockets(&self) -> impl Iterator<Item = (SocketId, &SimSocket)> {
        self.sockets.iter().map(|(id, s)| (*id, s))
    }
}

impl PlacementCollaborator for SimWorld {
    fn describe_socket(&self, socket: SocketId) -> Option<SocketDescriptor> {
        self.sockets.get(&socket).map(|s| SocketDescriptor {
            name: s.name.clone(),
            tags: s.tags.clone(),
        })
    }

    fn set_socket_active(&mut self, socket: SocketId, active: bool) {
        if let Some(slot) = self.sockets.get_mut(&socket) {
            slot.active = active;
        }
    }

    fn is_socket_active(&self, socket: SocketId) -> bool {
        self.sockets.get(&socket).is_some_and(|s| s.active)
    }

    fn is_occupied(&self, socket: SocketId) -> bool {
        self.sockets
            .get(&socket)
            .is_some_and(|s| s.occupant.is_some())
    }

    fn set_match_rotation(&mut self, socket: SocketId, enabled: bool) {
        if let Some(slot) = self.sockets.get_mut(&socket) {
            slot.match_rotation = enabled;
        }
    }

    fn probe_placement(&self, socket: SocketId, object: ObjectId) -> Option<PlacementProbe> {
        let slot = self.sockets.get(&socket)?;
        if slot.occupant != Some(object) {
            return None;
        }
        let body = self.bodies.get(&object)?;
        Some(PlacementProbe {
            position_error: body.position_error,
            linear_speed: body.linear_speed,
        })
    }
}

impl ConstraintBackend for SimWorld {
    fn create_constraint(&mut self, object: ObjectId, spec: &ConstraintSpec) -> ConstraintHandle {
        self.next_handle += 1;
        let handle = ConstraintHandle(self.next_handle);
        let origin_degrees = self
            .bodies
            .get(&object)
            .map_or(0.0, |b| b.twist_degrees);
        self.constraints.insert(
            handle,
            SimConstraint {
                object,
                spec: *spec,
                origin_degrees,
            },
        );
        tracing::debug!(%object, %handle, kind = ?spec.kind, "constraint created");
        handle
    }

    fn destroy_constraint(&mut self, handle: ConstraintHandle) {
        if self.constraints.remove(&handle).is_some() {
            tracing::debug!(%handle, "constraint destroyed");
        }
    }

    fn constraint_angle(&self, handle: ConstraintHandle) -> Option<f64> {
        let constraint = self.constraints.get(&handle)?;
        let body = self.bodies.get(&constraint.object)?;
        Some(normalize_degrees(body.twist_degrees - constraint.origin_degrees))
    }

    fn is_alive(&self, object: ObjectId) -> bool {
        self.bodies.get(&object).is_some_and(|b| b.alive)
    }
}
