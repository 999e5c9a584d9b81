//! # Fastener Registry
//!
//! Explicit registration of fasteners and sockets. The host registers each
//! fastener machine and each socket it wants managed, routes its raw
//! callbacks through [`FastenerRegistry::dispatch()`], and calls
//! [`FastenerRegistry::step_all()`] once per physics tick. Nothing is
//! discovered by scanning a scene.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vrtk_core::{ObjectId, SocketId};

use crate::collaborator::FastenerHost;
use crate::gate::{self, SweepReport};
use crate::machine::{FastenerEvent, FastenerStateMachine};
use crate::state::LifecycleEvent;

/// Errors from registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A machine for this object is already registered.
    #[error("{0} is already registered")]
    DuplicateObject(ObjectId),

    /// No machine is registered for this object.
    #[error("{0} is not registered")]
    UnknownObject(ObjectId),
}

/// A raw host callback, addressed by object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// The object was grabbed.
    Grabbed {
        /// The grabbed object.
        object: ObjectId,
    },
    /// The object was released.
    Released {
        /// The released object.
        object: ObjectId,
    },
    /// The object snapped into a socket.
    Snapped {
        /// The receiving socket.
        socket: SocketId,
        /// The placed object.
        object: ObjectId,
    },
    /// The object left a socket.
    Unsnapped {
        /// The socket left.
        socket: SocketId,
        /// The removed object.
        object: ObjectId,
    },
}

impl HostEvent {
    /// The object the event concerns.
    pub fn object(&self) -> ObjectId {
        match self {
            Self::Grabbed { object }
            | Self::Released { object }
            | Self::Snapped { object, .. }
            | Self::Unsnapped { object, .. } => *object,
        }
    }

    /// The event as seen by the object's own machine.
    pub fn to_fastener_event(self) -> FastenerEvent {
        match self {
            Self::Grabbed { .. } => FastenerEvent::Grabbed,
            Self::Released { .. } => FastenerEvent::Released,
            Self::Snapped { socket, .. } => FastenerEvent::Snapped { socket },
            Self::Unsnapped { socket, .. } => FastenerEvent::Unsnapped { socket },
        }
    }
}

/// Owns every fastener machine in a scene.
#[derive(Debug, Default)]
pub struct FastenerRegistry {
    machines: BTreeMap<ObjectId, FastenerStateMachine>,
    sockets: BTreeSet<SocketId>,
}

impl FastenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a machine under its object id.
    pub fn register(&mut self, machine: FastenerStateMachine) -> Result<(), RegistryError> {
        let object = machine.object();
        if self.machines.contains_key(&object) {
            return Err(RegistryError::DuplicateObject(object));
        }
        tracing::debug!(%object, "fastener registered");
        self.machines.insert(object, machine);
        Ok(())
    }

    /// Register a socket for scene-wide sweeps. Returns `false` if already known.
    pub fn register_socket(&mut self, socket: SocketId) -> bool {
        self.sockets.insert(socket)
    }

    /// Forget a socket. Returns `false` if it was not registered.
    pub fn unregister_socket(&mut self, socket: SocketId) -> bool {
        self.sockets.remove(&socket)
    }

    /// Registered sockets, in id order.
    pub fn sockets(&self) -> impl Iterator<Item = SocketId> + '_ {
        self.sockets.iter().copied()
    }

    /// Route a host callback to the machine that owns the object.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<(), RegistryError> {
        let object = event.object();
        let machine = self
            .machines
            .get_mut(&object)
            .ok_or(RegistryError::UnknownObject(object))?;
        machine.handle(event.to_fastener_event());
        Ok(())
    }

    /// Step every registered machine once.
    pub fn step_all<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        for machine in self.machines.values_mut() {
            machine.step(host);
        }
    }

    /// Remove a machine, cancelling its pending work and handing its
    /// socket back to the host.
    pub fn retire<H: FastenerHost + ?Sized>(
        &mut self,
        object: ObjectId,
        host: &mut H,
    ) -> Result<FastenerStateMachine, RegistryError> {
        let mut machine = self
            .machines
            .remove(&object)
            .ok_or(RegistryError::UnknownObject(object))?;
        machine.retire(host);
        Ok(machine)
    }

    /// Disable every unoccupied registered socket.
    pub fn disable_all_sockets<H: FastenerHost + ?Sized>(&self, host: &mut H) -> SweepReport {
        gate::disable_all_sockets(self.sockets.iter().copied(), host)
    }

    /// Lifecycle events from every machine since the last drain.
    pub fn drain_events(&mut self) -> Vec<(ObjectId, LifecycleEvent)> {
        let mut events = Vec::new();
        for (object, machine) in &mut self.machines {
            events.extend(machine.drain_events().into_iter().map(|e| (*object, e)));
        }
        events
    }

    /// Look up a machine.
    pub fn get(&self, object: ObjectId) -> Option<&FastenerStateMachine> {
        self.machines.get(&object)
    }

    /// All machines, in object id order.
    pub fn machines(&self) -> impl Iterator<Item = &FastenerStateMachine> {
        self.machines.values()
    }

    /// Number of registered machines.
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether no machine is registered.
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::PlacementCollaborator;
    use crate::config::FastenerProfile;
    use crate::state::FastenerState;
    use crate::testing::MockHost;

    fn machine() -> FastenerStateMachine {
        let config = FastenerProfile::default().validate().unwrap().config;
        FastenerStateMachine::new(ObjectId::new(), Some(config))
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = FastenerRegistry::new();
        let m = machine();
        let object = m.object();
        registry.register(m).unwrap();
        let twin = FastenerStateMachine::new(object, None);
        assert_eq!(
            registry.register(twin),
            Err(RegistryError::DuplicateObject(object))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dispatch_to_unknown_object_fails() {
        let mut registry = FastenerRegistry::new();
        let object = ObjectId::new();
        let err = registry
            .dispatch(HostEvent::Grabbed { object })
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownObject(object));
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_events_routed_to_owning_machine() {
        let mut host = MockHost::default();
        let mut registry = FastenerRegistry::new();
        let a = machine();
        let b = machine();
        let (oa, ob) = (a.object(), b.object());
        registry.register(a).unwrap();
        registry.register(b).unwrap();

        let socket = SocketId::new();
        registry
            .dispatch(HostEvent::Snapped { socket, object: oa })
            .unwrap();
        registry.step_all(&mut host);
        registry.step_all(&mut host);

        assert_eq!(registry.get(oa).unwrap().state(), FastenerState::LockedLoose);
        assert_eq!(registry.get(ob).unwrap().state(), FastenerState::Unlocked);
        assert_eq!(
            registry.drain_events(),
            vec![(oa, LifecycleEvent::Locked { socket })]
        );
    }

    #[test]
    fn test_retire_hands_socket_back() {
        let mut host = MockHost::default();
        let mut registry = FastenerRegistry::new();
        let m = machine();
        let object = m.object();
        let socket = SocketId::new();
        registry.register(m).unwrap();
        registry
            .dispatch(HostEvent::Snapped { socket, object })
            .unwrap();
        registry.step_all(&mut host);
        registry.step_all(&mut host);
        assert_eq!(host.constraints.len(), 1);
        assert!(!host.is_socket_active(socket));

        let retired = registry.retire(object, &mut host).unwrap();
        assert!(retired.is_retired());
        assert!(retired.constraint().is_none());
        assert_eq!(retired.state(), FastenerState::Unlocked);
        assert!(host.constraints.is_empty());
        assert!(host.is_socket_active(socket));
        assert_eq!(host.match_rotation.get(&socket), Some(&true));
        assert!(registry.is_empty());
        assert!(registry.retire(object, &mut host).is_err());
    }

    #[test]
    fn test_sweep_over_registered_sockets() {
        let mut host = MockHost::default();
        let mut registry = FastenerRegistry::new();
        let sockets = [SocketId::new(), SocketId::new(), SocketId::new()];
        for socket in sockets {
            assert!(registry.register_socket(socket));
        }
        assert!(!registry.register_socket(sockets[0]));
        host.occupied.insert(sockets[1]);

        let report = registry.disable_all_sockets(&mut host);
        assert_eq!(report.skipped_occupied, vec![sockets[1]]);
        assert_eq!(report.disabled.len(), 2);
        assert!(host.is_socket_active(sockets[1]));
        assert!(!host.is_socket_active(sockets[0]));
        assert!(!host.is_socket_active(sockets[2]));
    }
}
