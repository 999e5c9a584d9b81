//! In-crate mock host shared by unit tests.

use std::collections::{BTreeMap, BTreeSet};

use vrtk_core::{ConstraintHandle, ObjectId, SocketId};

use crate::collaborator::{
    ConstraintBackend, ConstraintSpec, PlacementCollaborator, PlacementProbe, SocketDescriptor,
};

/// Records every side effect; angles are set directly by the test.
#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub dead: BTreeSet<ObjectId>,
    pub active: BTreeMap<SocketId, bool>,
    pub occupied: BTreeSet<SocketId>,
    pub match_rotation: BTreeMap<SocketId, bool>,
    pub descriptors: BTreeMap<SocketId, SocketDescriptor>,
    pub constraints: BTreeMap<ConstraintHandle, (ObjectId, ConstraintSpec)>,
    pub angles: BTreeMap<ObjectId, f64>,
    pub probe: Option<PlacementProbe>,
    pub created: usize,
    next_handle: u64,
}

impl MockHost {
    pub fn constraint_of(&self, object: ObjectId) -> Option<&ConstraintSpec> {
        self.constraints
            .values()
            .find(|(owner, _)| *owner == object)
            .map(|(_, spec)| spec)
    }
}

impl PlacementCollaborator for MockHost {
    fn describe_socket(&self, socket: SocketId) -> Option<SocketDescriptor> {
        self.descriptors.get(&socket).cloned()
    }

    fn set_socket_active(&mut self, socket: SocketId, active: bool) {
        self.active.insert(socket, active);
    }

    fn is_socket_active(&self, socket: SocketId) -> bool {
        self.active.get(&socket).copied().unwrap_or(true)
    }

    fn is_occupied(&self, socket: SocketId) -> bool {
        self.occupied.contains(&socket)
    }

    fn set_match_rotation(&mut self, socket: SocketId, enabled: bool) {
        self.match_rotation.insert(socket, enabled);
    }

    fn probe_placement(&self, _socket: SocketId, _object: ObjectId) -> Option<PlacementProbe> {
        self.probe
    }
}

impl ConstraintBackend for MockHost {
    fn create_constraint(&mut self, object: ObjectId, spec: &ConstraintSpec) -> ConstraintHandle {
        self.next_handle += 1;
        self.created += 1;
        let handle = ConstraintHandle(self.next_handle);
        self.constraints.insert(handle, (object, *spec));
        handle
    }

    fn destroy_constraint(&mut self, handle: ConstraintHandle) {
        self.constraints.remove(&handle);
    }

    fn constraint_angle(&self, handle: ConstraintHandle) -> Option<f64> {
        let (object, _) = self.constraints.get(&handle)?;
        Some(self.angles.get(object).copied().unwrap_or(0.0))
    }

    fn is_alive(&self, object: ObjectId) -> bool {
        !self.dead.contains(&object)
    }
}
