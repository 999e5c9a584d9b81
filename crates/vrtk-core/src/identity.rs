//! # Host Handle Newtypes
//!
//! Newtype wrappers for the handles the interaction core exchanges with its
//! host. These prevent accidental handle confusion: you cannot pass a
//! `SocketId` where an `ObjectId` is expected.
//!
//! Object and socket identifiers are UUIDs minted by the host at
//! registration time. Constraint handles are opaque integers minted by the
//! constraint backend and are only meaningful to the backend that issued them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a grabbable physical object (screw, valve, knob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

/// Unique identifier for a socket / snap point that can hold an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

/// Opaque handle to a physics constraint created by a constraint backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintHandle(pub u64);

impl ObjectId {
    /// Generate a new random object identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl SocketId {
    /// Generate a new random socket identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl ConstraintHandle {
    /// The raw backend-assigned value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object:{}", self.0)
    }
}

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "socket:{}", self.0)
    }
}

impl std::fmt::Display for ConstraintHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "constraint:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ObjectId::new(), ObjectId::new());
        assert_ne!(SocketId::new(), SocketId::new());
    }

    #[test]
    fn test_display_prefixes() {
        let object = ObjectId::new();
        let socket = SocketId::new();
        assert!(object.to_string().starts_with("object:"));
        assert!(socket.to_string().starts_with("socket:"));
        assert_eq!(ConstraintHandle(7).to_string(), "constraint:7");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = SocketId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SocketId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
