//! # Socket Gate
//!
//! Keeps a socket's active flag consistent with the fastener it holds.
//!
//! ## Rules
//!
//! | Event | Socket |
//! |---|---|
//! | enter a constrained state | disabled |
//! | unlock or complete while grabbed | stays disabled until the grab is released |
//! | grab released after a held unlock | enabled |
//! | unlock while not grabbed | enabled immediately |
//! | fastener retired or removed | enabled if the gate had shut it |
//!
//! The machine only crosses a threshold while grabbed, so the not-grabbed
//! unlock row is reached by hosts that drive the gate directly.
//!
//! Holding the socket shut while the user still grips the freshly unlocked
//! fastener stops the socket from catching it again mid-pull. On release
//! the gate also reports whether the socket is still occupied, so the
//! machine knows whether the fastener was pulled out or left seated.
//!
//! [`disable_all_sockets()`] is the scene-wide sweep used when a training
//! step ends: every empty socket is switched off, occupied ones are left
//! alone so a seated fastener is never dropped.

use serde::{Deserialize, Serialize};

use vrtk_core::SocketId;

use crate::collaborator::PlacementCollaborator;
use crate::state::FastenerState;

/// What the gate is currently doing with its socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Socket enabled (or never touched).
    #[default]
    Open,
    /// Socket disabled while the fastener is constrained.
    Closed,
    /// Fastener unlocked while grabbed; socket held shut until release.
    AwaitingRelease {
        /// The socket being held.
        socket: SocketId,
    },
}

/// Result of a grab release as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The gate was not holding the socket; nothing changed.
    Unchanged,
    /// The socket was re-enabled.
    Reopened {
        /// Whether something still rested in the socket at release.
        still_seated: bool,
    },
}

/// Per-fastener socket gate.
#[derive(Debug, Clone, Default)]
pub struct SocketGate {
    mode: GateMode,
}

impl SocketGate {
    /// A gate that has not yet acted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// React to the fastener entering `state`.
    pub fn on_state_changed<H: PlacementCollaborator + ?Sized>(
        &mut self,
        state: FastenerState,
        grabbed: bool,
        socket: SocketId,
        host: &mut H,
    ) {
        if state.is_constrained() {
            host.set_socket_active(socket, false);
            self.mode = GateMode::Closed;
            tracing::debug!(%socket, %state, "socket disabled");
        } else if grabbed {
            self.mode = GateMode::AwaitingRelease { socket };
            tracing::debug!(%socket, "socket held shut until release");
        } else {
            host.set_socket_active(socket, true);
            self.mode = GateMode::Open;
            tracing::debug!(%socket, "socket enabled");
        }
    }

    /// React to the user letting go of the fastener.
    ///
    /// The held socket is remembered by the gate, so it is reopened even if
    /// the machine already dropped its own socket reference.
    pub fn on_grab_released<H: PlacementCollaborator + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> ReleaseOutcome {
        let GateMode::AwaitingRelease { socket } = self.mode else {
            return ReleaseOutcome::Unchanged;
        };
        let still_seated = host.is_occupied(socket);
        host.set_socket_active(socket, true);
        self.mode = GateMode::Open;
        tracing::debug!(%socket, still_seated, "socket enabled after release");
        ReleaseOutcome::Reopened { still_seated }
    }

    /// Re-enable whatever socket this gate shut, e.g. when its fastener
    /// goes away. `socket` is the fastener's current reference, used when
    /// the gate is closed.
    pub fn reopen<H: PlacementCollaborator + ?Sized>(
        &mut self,
        socket: Option<SocketId>,
        host: &mut H,
    ) {
        let target = match self.mode {
            GateMode::Open => None,
            GateMode::Closed => socket,
            GateMode::AwaitingRelease { socket } => Some(socket),
        };
        self.mode = GateMode::Open;
        if let Some(socket) = target {
            host.set_socket_active(socket, true);
            tracing::debug!(%socket, "socket handed back");
        }
    }

    /// Socket held shut awaiting release, if any.
    pub fn held_socket(&self) -> Option<SocketId> {
        match self.mode {
            GateMode::AwaitingRelease { socket } => Some(socket),
            GateMode::Open | GateMode::Closed => None,
        }
    }
}

/// Outcome of a [`disable_all_sockets()`] sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Sockets switched off.
    pub disabled: Vec<SocketId>,
    /// Occupied sockets left untouched.
    pub skipped_occupied: Vec<SocketId>,
}

/// Disable every unoccupied socket in `sockets`.
pub fn disable_all_sockets<I, H>(sockets: I, host: &mut H) -> SweepReport
where
    I: IntoIterator<Item = SocketId>,
    H: PlacementCollaborator + ?Sized,
{
    let mut report = SweepReport::default();
    for socket in sockets {
        if host.is_occupied(socket) {
            report.skipped_occupied.push(socket);
        } else {
            host.set_socket_active(socket, false);
            report.disabled.push(socket);
        }
    }
    tracing::info!(
        disabled = report.disabled.len(),
        skipped = report.skipped_occupied.len(),
        "socket sweep complete"
    );
    report
}
