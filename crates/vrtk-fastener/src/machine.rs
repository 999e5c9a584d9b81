//! # Fastener State Machine
//!
//! One machine per physical fastener. It owns the lifecycle state, the
//! rotation tracker, the socket gate and the deferred lock, and drives the
//! host's constraint and socket primitives as side effects.
//!
//! ## Event Model
//!
//! Host callbacks (grab, release, snap, unsnap) may arrive between physics
//! steps. [`FastenerStateMachine::handle()`] only queues them. Everything
//! that touches the host happens inside [`FastenerStateMachine::step()`],
//! which runs once per fixed simulation tick in this order:
//!
//! 1. liveness check (a removed object retires the machine);
//! 2. queued events, in arrival order;
//! 3. tick advance, then due deferred actions;
//! 4. the positioning wait (valve variant);
//! 5. rotation sampling and threshold evaluation, while grabbed and locked.
//!
//! ## Lock Timing
//!
//! A snap processed on tick `T` schedules constraint creation for tick
//! `T + settle_ticks`. With the minimum of two settle ticks the constraint
//! does not exist after the first step following the snap and exists after
//! the second.
//!
//! ## Ignored Events
//!
//! A snap while locked or settling, a snap back into the socket the fastener
//! is still seated in after an unlock, and an unsnap while locked are
//! ordinary grab-to-rotate interactions. They are dropped with a `debug`
//! log and change nothing.
//!
//! ## Faults
//!
//! A missing constraint or a non-finite angle is recorded as a
//! [`Diagnostic`] once, when the fault starts. Further ticks with the same
//! fault are counted in [`FastenerStateMachine::repeated_faults()`] and
//! logged at `debug`; the next good sample ends the fault. At most
//! [`MAX_DIAGNOSTICS`] entries are kept, oldest dropped first.
//!
//! ## Teardown
//!
//! Retiring a machine, or noticing its object is gone, hands the socket
//! back: the constraint is destroyed, match-rotation is restored, any
//! socket the gate shut is re-enabled, and a locked machine records a
//! final transition to `Unlocked`. A retired machine never changes again.

use std::collections::VecDeque;
use std::mem::Discriminant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use vrtk_core::{ConstraintHandle, ObjectId, SocketId, Tick, FULL_TURN_DEGREES};

use crate::collaborator::FastenerHost;
use crate::config::{FastenerConfig, FastenerVariant, SocketCompatibility};
use crate::deferred::{DeferredHandle, DeferredQueue};
use crate::gate::{GateMode, ReleaseOutcome, SocketGate};
use crate::settle::{SettleMonitor, SettleStatus};
use crate::state::{FastenerState, FastenerTransitionRecord, LifecycleEvent};
use crate::threshold;
use crate::tracker::{RotationTracker, SampleOutcome};

/// Most diagnostics a machine keeps.
pub const MAX_DIAGNOSTICS: usize = 64;

/// Input events from the grab source and the placement collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FastenerEvent {
    /// The user grabbed the object.
    Grabbed,
    /// The user let go of the object.
    Released,
    /// The object was placed into a socket.
    Snapped {
        /// The receiving socket.
        socket: SocketId,
    },
    /// The object left a socket.
    Unsnapped {
        /// The socket it left.
        socket: SocketId,
    },
}

/// A logged-and-continued anomaly, kept so hosts and tests can observe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A snap arrived but no configuration is bound.
    MissingConfig {
        /// The socket that was snapped into.
        socket: SocketId,
    },
    /// The socket does not accept this fastener.
    IncompatibleSocket {
        /// The rejected socket.
        socket: SocketId,
    },
    /// The constraint reported a non-finite angle.
    NonFiniteAngle {
        /// Tick of the reading.
        tick: Tick,
    },
    /// The backend no longer knows the constraint.
    ConstraintMissing {
        /// The stale handle.
        handle: ConstraintHandle,
    },
    /// Positioning never settled; the constraint was applied anyway.
    SettleTimeout {
        /// The socket being settled into.
        socket: SocketId,
        /// Ticks waited.
        elapsed_ticks: u64,
    },
    /// The object was removed from the simulation.
    ObjectGone {
        /// Tick the removal was noticed.
        tick: Tick,
        /// Pending deferred actions dropped.
        dropped_actions: usize,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfig { socket } => {
                write!(f, "snap into {socket} skipped: no configuration bound")
            }
            Self::IncompatibleSocket { socket } => {
                write!(f, "{socket} does not accept this fastener")
            }
            Self::NonFiniteAngle { tick } => write!(f, "non-finite angle at {tick}"),
            Self::ConstraintMissing { handle } => write!(f, "{handle} unknown to backend"),
            Self::SettleTimeout {
                socket,
                elapsed_ticks,
            } => write!(
                f,
                "positioning in {socket} timed out after {elapsed_ticks} ticks"
            ),
            Self::ObjectGone {
                tick,
                dropped_actions,
            } => write!(
                f,
                "object removed at {tick}; {dropped_actions} pending action(s) dropped"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DeferredAction {
    BeginLock { socket: SocketId },
}

#[derive(Debug, Clone)]
struct PendingLock {
    socket: SocketId,
    handle: DeferredHandle,
    monitor: Option<SettleMonitor>,
}

/// The generalized screw / valve / turn-by-count lifecycle machine.
#[derive(Debug)]
pub struct FastenerStateMachine {
    object: ObjectId,
    config: Option<FastenerConfig>,
    state: FastenerState,
    tick: Tick,
    grabbed: bool,
    socket: Option<SocketId>,
    pending: Option<PendingLock>,
    deferred: DeferredQueue<DeferredAction>,
    constraint: Option<ConstraintHandle>,
    tracker: RotationTracker,
    gate: SocketGate,
    completed_rotation: f64,
    retired: bool,
    inbox: VecDeque<FastenerEvent>,
    outbox: Vec<LifecycleEvent>,
    transitions: Vec<FastenerTransitionRecord>,
    diagnostics: Vec<Diagnostic>,
    active_fault: Option<Discriminant<Diagnostic>>,
    repeated_faults: u64,
}

impl FastenerStateMachine {
    /// Create an unlocked machine for `object`.
    ///
    /// A machine without configuration is valid but inert: every snap is
    /// skipped with a [`Diagnostic::MissingConfig`].
    pub fn new(object: ObjectId, config: Option<FastenerConfig>) -> Self {
        Self {
            object,
            config,
            state: FastenerState::Unlocked,
            tick: Tick::ZERO,
            grabbed: false,
            socket: None,
            pending: None,
            deferred: DeferredQueue::new(),
            constraint: None,
            tracker: RotationTracker::new(),
            gate: SocketGate::new(),
            completed_rotation: 0.0,
            retired: false,
            inbox: VecDeque::new(),
            outbox: Vec::new(),
            transitions: Vec::new(),
            diagnostics: Vec::new(),
            active_fault: None,
            repeated_faults: 0,
        }
    }

    /// Queue an event for the next step.
    pub fn handle(&mut self, event: FastenerEvent) {
        if self.retired {
            tracing::debug!(object = %self.object, ?event, "event for retired fastener dropped");
            return;
        }
        self.inbox.push_back(event);
    }

    /// Advance the machine by one simulation tick.
    pub fn step<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        if self.retired {
            return;
        }
        if !host.is_alive(self.object) {
            self.on_object_gone(host);
            return;
        }

        while let Some(event) = self.inbox.pop_front() {
            self.apply_event(event, host);
        }

        self.tick = self.tick.next();
        for action in self.deferred.drain_due(self.tick) {
            match action {
                DeferredAction::BeginLock { socket } => self.begin_lock(socket, host),
            }
        }

        self.advance_settle(host);
        self.track_rotation(host);
    }

    /// Stop the machine and hand its socket back to the host.
    ///
    /// Drops queued events, invalidates pending actions and tears down any
    /// constraint. Returns the number of deferred actions dropped.
    pub fn retire<H: FastenerHost + ?Sized>(&mut self, host: &mut H) -> usize {
        if self.retired {
            return 0;
        }
        let dropped = self.shut_down(host);
        tracing::info!(object = %self.object, dropped, "fastener retired");
        dropped
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// The object this machine controls.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// The bound configuration, if any.
    pub fn config(&self) -> Option<&FastenerConfig> {
        self.config.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FastenerState {
        self.state
    }

    /// Steps taken so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Whether the user currently holds the object.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// The socket the fastener is associated with, if any.
    pub fn socket(&self) -> Option<SocketId> {
        self.socket
    }

    /// The live constraint, if any.
    pub fn constraint(&self) -> Option<ConstraintHandle> {
        self.constraint
    }

    /// Whether a snap is waiting to become a lock.
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    /// Rotation accumulated since the current state was entered.
    pub fn total_rotation(&self) -> f64 {
        self.tracker.total_rotation()
    }

    /// The rotation tracker.
    pub fn tracker(&self) -> &RotationTracker {
        &self.tracker
    }

    /// Current socket gate mode.
    pub fn gate_mode(&self) -> GateMode {
        self.gate.mode()
    }

    /// Full turns made since locking (fractional, never negative).
    ///
    /// Frozen at the completion value once `Completed`.
    pub fn turns_completed(&self) -> f64 {
        let rotation = match self.state {
            FastenerState::Completed => self.completed_rotation,
            FastenerState::LockedLoose | FastenerState::LockedTight => {
                self.tracker.total_rotation()
            }
            FastenerState::Unlocked => 0.0,
        };
        (rotation / FULL_TURN_DEGREES).max(0.0)
    }

    /// Whether the machine has been retired.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Every transition so far, oldest first.
    pub fn transitions(&self) -> &[FastenerTransitionRecord] {
        &self.transitions
    }

    /// Anomalies recorded so far, oldest first, capped at [`MAX_DIAGNOSTICS`].
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Ticks on which an already-recorded fault persisted.
    pub fn repeated_faults(&self) -> u64 {
        self.repeated_faults
    }

    /// Take the lifecycle events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ─── Events ─────────────────────────────────────────────────────

    fn apply_event<H: FastenerHost + ?Sized>(&mut self, event: FastenerEvent, host: &mut H) {
        match event {
            FastenerEvent::Grabbed => self.grabbed = true,
            FastenerEvent::Released => {
                self.grabbed = false;
                self.on_released(host);
            }
            FastenerEvent::Snapped { socket } => self.on_snapped(socket, host),
            FastenerEvent::Unsnapped { socket } => self.on_unsnapped(socket),
        }
    }

    fn on_snapped<H: FastenerHost + ?Sized>(&mut self, socket: SocketId, host: &mut H) {
        if self.state != FastenerState::Unlocked || self.pending.is_some() {
            tracing::debug!(object = %self.object, %socket, state = %self.state, "snap ignored");
            return;
        }
        if self.socket == Some(socket) {
            tracing::debug!(object = %self.object, %socket, "snap-back ignored until unsnapped");
            return;
        }

        let Some(config) = self.config.as_ref() else {
            tracing::warn!(object = %self.object, %socket, "no fastener configuration bound; snap skipped");
            self.record(Diagnostic::MissingConfig { socket });
            return;
        };

        let compatible = match host.describe_socket(socket) {
            Some(descriptor) => config.compatibility().accepts(&descriptor),
            None => matches!(config.compatibility(), SocketCompatibility::Any),
        };
        if !compatible {
            tracing::warn!(object = %self.object, %socket, "socket does not accept fastener; snap skipped");
            self.record(Diagnostic::IncompatibleSocket { socket });
            return;
        }

        let due = self.tick.after(u64::from(config.settle_ticks()));
        let handle = self
            .deferred
            .schedule(due, DeferredAction::BeginLock { socket });
        self.socket = Some(socket);
        self.pending = Some(PendingLock {
            socket,
            handle,
            monitor: None,
        });
        tracing::debug!(object = %self.object, %socket, %due, "lock scheduled");
    }

    fn on_unsnapped(&mut self, socket: SocketId) {
        if self.pending.as_ref().is_some_and(|p| p.socket == socket) {
            if let Some(pending) = self.pending.take() {
                self.deferred.cancel(pending.handle);
            }
            self.socket = None;
            self.outbox.push(LifecycleEvent::LockAborted { socket });
            tracing::info!(object = %self.object, %socket, "pending lock cancelled by unsnap");
            return;
        }
        if !self.state.is_constrained() && self.socket == Some(socket) {
            self.socket = None;
            tracing::debug!(object = %self.object, %socket, "socket reference cleared");
            return;
        }
        tracing::debug!(object = %self.object, %socket, state = %self.state, "unsnap ignored");
    }

    fn on_released<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        let outcome = self.gate.on_grab_released(host);
        if outcome == (ReleaseOutcome::Reopened { still_seated: false })
            && !self.state.is_constrained()
            && self.pending.is_none()
        {
            self.socket = None;
            tracing::debug!(object = %self.object, "released outside socket; reference cleared");
        }
    }

    fn on_object_gone<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        let dropped_actions = self.shut_down(host);
        tracing::warn!(
            object = %self.object,
            dropped_actions,
            "object removed from simulation; fastener retired"
        );
        self.record(Diagnostic::ObjectGone {
            tick: self.tick,
            dropped_actions,
        });
    }

    fn shut_down<H: FastenerHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let dropped = self.deferred.invalidate_all();
        self.pending = None;
        self.inbox.clear();
        self.release_constraint(host);
        if self.state.is_constrained() {
            let rotation = self.tracker.total_rotation();
            self.record_transition(FastenerState::Unlocked, rotation);
            self.state = FastenerState::Unlocked;
        }
        self.gate.reopen(self.socket, host);
        self.socket = None;
        self.grabbed = false;
        self.retired = true;
        dropped
    }

    // ─── Locking ────────────────────────────────────────────────────

    fn begin_lock<H: FastenerHost + ?Sized>(&mut self, socket: SocketId, host: &mut H) {
        if !self.pending.as_ref().is_some_and(|p| p.socket == socket) {
            return;
        }
        if !host.is_alive(self.object) {
            self.on_object_gone(host);
            return;
        }

        let positioning = match self.config.as_ref().map(FastenerConfig::variant) {
            Some(FastenerVariant::Valve { positioning }) => Some(*positioning),
            Some(_) => None,
            None => return,
        };
        let Some(positioning) = positioning else {
            self.lock(socket, host);
            return;
        };
        if let Some(pending) = self.pending.as_mut() {
            pending.monitor = Some(SettleMonitor::start(positioning, self.tick));
            tracing::debug!(object = %self.object, %socket, "waiting for positioning");
        }
    }

    fn advance_settle<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(monitor) = pending.monitor.as_mut() else {
            return;
        };
        let socket = pending.socket;
        let probe = host.probe_placement(socket, self.object);

        match monitor.observe(self.tick, probe) {
            SettleStatus::Waiting { .. } => {}
            SettleStatus::Settled { elapsed_ticks } => {
                tracing::debug!(object = %self.object, %socket, elapsed_ticks, "positioning settled");
                self.lock(socket, host);
            }
            SettleStatus::TimedOut { elapsed_ticks } => {
                self.record(Diagnostic::SettleTimeout {
                    socket,
                    elapsed_ticks,
                });
                self.lock(socket, host);
            }
        }
    }

    fn lock<H: FastenerHost + ?Sized>(&mut self, socket: SocketId, host: &mut H) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        let spec = config.constraint_spec();
        let handle = host.create_constraint(self.object, &spec);
        host.set_match_rotation(socket, false);

        self.pending = None;
        self.constraint = Some(handle);
        self.rebaseline(host);
        self.enter(FastenerState::LockedLoose, 0.0, host);
        self.outbox.push(LifecycleEvent::Locked { socket });
    }

    // ─── Rotation ───────────────────────────────────────────────────

    fn track_rotation<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        if !self.grabbed || !self.state.tracks_rotation() {
            return;
        }
        let Some(handle) = self.constraint else {
            return;
        };
        let Some(angle) = host.constraint_angle(handle) else {
            self.report_fault(Diagnostic::ConstraintMissing { handle });
            return;
        };
        if self.tracker.sample(angle) == SampleOutcome::Rejected {
            self.report_fault(Diagnostic::NonFiniteAngle { tick: self.tick });
            return;
        }
        self.active_fault = None;

        let total = self.tracker.total_rotation();
        let next = self
            .config
            .as_ref()
            .and_then(|config| threshold::evaluate(self.state, total, config));
        match next {
            Some(FastenerState::LockedTight) => {
                self.enter(FastenerState::LockedTight, total, host);
                self.rebaseline(host);
                self.outbox.push(LifecycleEvent::Tightened { rotation: total });
            }
            Some(FastenerState::Unlocked) => self.unlock(total, host),
            Some(FastenerState::Completed) => {
                self.completed_rotation = total;
                self.release_constraint(host);
                self.enter(FastenerState::Completed, total, host);
                self.outbox.push(LifecycleEvent::Completed { rotation: total });
            }
            Some(FastenerState::LockedLoose) | None => {}
        }
    }

    fn unlock<H: FastenerHost + ?Sized>(&mut self, rotation: f64, host: &mut H) {
        self.release_constraint(host);
        self.enter(FastenerState::Unlocked, rotation, host);
        self.outbox.push(LifecycleEvent::Unlocked { rotation });
    }

    /// Destroy the constraint and let the socket steer the object again.
    fn release_constraint<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        let Some(handle) = self.constraint.take() else {
            return;
        };
        host.destroy_constraint(handle);
        if let Some(socket) = self.socket {
            host.set_match_rotation(socket, true);
        }
    }

    /// Restart tracking from the constraint's current angle.
    fn rebaseline<H: FastenerHost + ?Sized>(&mut self, host: &mut H) {
        let angle = self.constraint.and_then(|handle| host.constraint_angle(handle));
        self.tracker.reset(angle.unwrap_or(f64::NAN));
        if !angle.is_some_and(f64::is_finite) {
            self.report_fault(Diagnostic::NonFiniteAngle { tick: self.tick });
        }
    }

    // ─── Diagnostics ────────────────────────────────────────────────

    fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            self.diagnostics.remove(0);
        }
        self.diagnostics.push(diagnostic);
    }

    fn report_fault(&mut self, diagnostic: Diagnostic) {
        let kind = std::mem::discriminant(&diagnostic);
        if self.active_fault == Some(kind) {
            self.repeated_faults += 1;
            tracing::debug!(object = %self.object, %diagnostic, "fault persists");
            return;
        }
        self.active_fault = Some(kind);
        tracing::warn!(object = %self.object, %diagnostic, "rotation fault");
        self.record(diagnostic);
    }

    fn enter<H: FastenerHost + ?Sized>(&mut self, next: FastenerState, rotation: f64, host: &mut H) {
        self.record_transition(next, rotation);
        self.state = next;
        if let Some(socket) = self.socket {
            self.gate.on_state_changed(next, self.grabbed, socket, host);
        }
    }

    fn record_transition(&mut self, next: FastenerState, rotation: f64) {
        let from = self.state;
        self.transitions.push(FastenerTransitionRecord {
            from_state: from,
            to_state: next,
            tick: self.tick,
            recorded_at: Utc::now(),
            rotation,
        });
        tracing::info!(
            object = %self.object,
            from = %from,
            to = %next,
            tick = self.tick.0,
            rotation,
            "fastener transition"
        );
    }
}
