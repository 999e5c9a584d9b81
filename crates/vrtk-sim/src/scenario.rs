//! # Scripted Scenarios
//!
//! A scenario is a YAML document naming profiles, sockets and fasteners,
//! followed by a list of user actions. The runner builds a [`SimWorld`],
//! registers one machine per fastener, replays the actions, and reports the
//! resulting transitions, lifecycle events and socket states.
//!
//! ```yaml
//! profiles:
//!   panel-screw:
//!     tighten_threshold_degrees: 50
//!     loosen_threshold_degrees: 90
//! sockets:
//!   - name: hole-1
//!     tags: [m8]
//! fasteners:
//!   - name: screw-1
//!     profile: panel-screw
//! steps:
//!   - action: snap
//!     object: screw-1
//!     socket: hole-1
//!   - action: tick
//!     count: 2
//!   - action: grab
//!     object: screw-1
//!   - action: rotate
//!     object: screw-1
//!     degrees: 50
//!     ticks: 5
//! ```
//!
//! Only `tick` and `rotate` advance simulation time. Every other action is
//! delivered to the registry and takes effect on the next tick.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vrtk_core::{ConfigError, ObjectId, SocketId};
use vrtk_fastener::{
    ConfigWarning, Diagnostic, FastenerProfile, FastenerRegistry, FastenerState,
    FastenerStateMachine, FastenerTransitionRecord, HostEvent, LifecycleEvent, RegistryError,
    SweepReport,
};

use crate::world::SimWorld;

/// Errors from loading or running a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The document is not valid scenario YAML.
    #[error("invalid scenario document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A profile failed validation.
    #[error("profile {profile:?}: {source}")]
    Profile {
        /// The profile name.
        profile: String,
        /// The validation failure.
        source: ConfigError,
    },

    /// A fastener names a profile that does not exist.
    #[error("fastener {fastener:?} references unknown profile {profile:?}")]
    UnknownProfile {
        /// The fastener name.
        fastener: String,
        /// The missing profile name.
        profile: String,
    },

    /// A step names a fastener that does not exist.
    #[error("step {step}: unknown fastener {name:?}")]
    UnknownObject {
        /// Zero-based step index.
        step: usize,
        /// The missing fastener name.
        name: String,
    },

    /// A step names a socket that does not exist.
    #[error("step {step}: unknown socket {name:?}")]
    UnknownSocket {
        /// Zero-based step index.
        step: usize,
        /// The missing socket name.
        name: String,
    },

    /// Two sockets or two fasteners share a name.
    #[error("duplicate name {0:?}")]
    DuplicateName(String),

    /// The registry rejected an operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A socket as authored in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocketSpec {
    /// Unique socket name.
    pub name: String,
    /// Compatibility tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// A fastener as authored in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FastenerSpec {
    /// Unique fastener name.
    pub name: String,
    /// Profile to bind. Omit to create an unconfigured fastener.
    #[serde(default)]
    pub profile: Option<String>,
}

fn one() -> u32 {
    1
}

/// One scripted user or scene action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Place a fastener into a socket.
    Snap {
        /// Fastener name.
        object: String,
        /// Socket name.
        socket: String,
    },
    /// Take a fastener out of a socket.
    Unsnap {
        /// Fastener name.
        object: String,
        /// Socket name.
        socket: String,
    },
    /// Grab a fastener.
    Grab {
        /// Fastener name.
        object: String,
    },
    /// Let go of a fastener.
    Release {
        /// Fastener name.
        object: String,
    },
    /// Twist a fastener, spread evenly over a number of ticks.
    Rotate {
        /// Fastener name.
        object: String,
        /// Total twist in degrees (positive tightens).
        degrees: f64,
        /// Ticks to spread the twist over.
        #[serde(default = "one")]
        ticks: u32,
    },
    /// Set the placement error the socket measures for a fastener.
    Placement {
        /// Fastener name.
        object: String,
        /// Distance from the attach point, in metres.
        position_error: f64,
        /// Linear speed, in metres per second.
        linear_speed: f64,
    },
    /// Remove a fastener from the simulation.
    Destroy {
        /// Fastener name.
        object: String,
    },
    /// Disable every unoccupied socket.
    Sweep,
    /// Advance time without user input.
    Tick {
        /// Number of ticks.
        #[serde(default = "one")]
        count: u32,
    },
}

/// A complete scenario document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Named fastener profiles.
    pub profiles: BTreeMap<String, FastenerProfile>,
    /// Sockets in the scene.
    pub sockets: Vec<SocketSpec>,
    /// Fasteners in the scene.
    pub fasteners: Vec<FastenerSpec>,
    /// Actions to replay.
    pub steps: Vec<ScenarioStep>,
}

// ─── Report ─────────────────────────────────────────────────────────

/// Final state of one fastener.
#[derive(Debug, Clone, Serialize)]
pub struct FastenerReport {
    /// Fastener name.
    pub name: String,
    /// Final lifecycle state.
    pub state: FastenerState,
    /// Rotation accumulated in the final state.
    pub total_rotation: f64,
    /// Full turns since locking.
    pub turns_completed: f64,
    /// Whether a constraint holds the fastener.
    pub constrained: bool,
    /// Socket the fastener is associated with.
    pub socket: Option<String>,
    /// Whether the machine was retired.
    pub retired: bool,
    /// Every transition.
    pub transitions: Vec<FastenerTransitionRecord>,
    /// Recorded anomalies.
    pub diagnostics: Vec<Diagnostic>,
}

/// Final state of one socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketReport {
    /// Socket name.
    pub name: String,
    /// Whether the socket is enabled.
    pub active: bool,
    /// Whether the socket re-imposes its rotation.
    pub match_rotation: bool,
    /// Name of the fastener resting in it.
    pub occupant: Option<String>,
}

/// A lifecycle event stamped with the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedEvent {
    /// Tick the event was emitted on.
    pub tick: u64,
    /// Fastener name.
    pub fastener: String,
    /// The event.
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

/// A socket sweep expressed with socket names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Sockets switched off.
    pub disabled: Vec<String>,
    /// Occupied sockets left alone.
    pub skipped_occupied: Vec<String>,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Ticks simulated.
    pub ticks: u64,
    /// Profile corrections, by profile name.
    pub warnings: BTreeMap<String, Vec<ConfigWarning>>,
    /// Lifecycle events in emission order.
    pub events: Vec<ReportedEvent>,
    /// Sweeps in execution order.
    pub sweeps: Vec<SweepSummary>,
    /// Fasteners in authoring order.
    pub fasteners: Vec<FastenerReport>,
    /// Sockets in authoring order.
    pub sockets: Vec<SocketReport>,
}

impl ScenarioReport {
    /// Look up a fastener report by name.
    pub fn fastener(&self, name: &str) -> Option<&FastenerReport> {
        self.fasteners.iter().find(|f| f.name == name)
    }

    /// Look up a socket report by name.
    pub fn socket(&self, name: &str) -> Option<&SocketReport> {
        self.sockets.iter().find(|s| s.name == name)
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

impl Scenario {
    /// Parse a scenario from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Replay the scenario against a fresh world.
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let mut runner = Runner::build(self)?;
        for (index, step) in self.steps.iter().enumerate() {
            runner.apply(index, step)?;
        }
        Ok(runner.finish(self))
    }
}

struct Runner {
    world: SimWorld,
    registry: FastenerRegistry,
    objects: BTreeMap<String, ObjectId>,
    sockets: BTreeMap<String, SocketId>,
    warnings: BTreeMap<String, Vec<ConfigWarning>>,
    ticks: u64,
    events: Vec<ReportedEvent>,
    sweeps: Vec<SweepSummary>,
}

impl Runner {
    fn build(scenario: &Scenario) -> Result<Self, ScenarioError> {
        let mut configs = BTreeMap::new();
        let mut warnings = BTreeMap::new();
        for (name, profile) in &scenario.profiles {
            let validated = profile.validate().map_err(|source| ScenarioError::Profile {
                profile: name.clone(),
                source,
            })?;
            if !validated.warnings.is_empty() {
                warnings.insert(name.clone(), validated.warnings);
            }
            configs.insert(name.clone(), validated.config);
        }

        let mut world = SimWorld::new();
        let mut registry = FastenerRegistry::new();

        let mut sockets = BTreeMap::new();
        for spec in &scenario.sockets {
            let id = world.add_socket(&spec.name, spec.tags.iter().cloned());
            if sockets.insert(spec.name.clone(), id).is_some() {
                return Err(ScenarioError::DuplicateName(spec.name.clone()));
            }
            registry.register_socket(id);
        }

        let mut objects = BTreeMap::new();
        for spec in &scenario.fasteners {
            let config = match &spec.profile {
                Some(profile) => Some(configs.get(profile).cloned().ok_or_else(|| {
                    ScenarioError::UnknownProfile {
                        fastener: spec.name.clone(),
                        profile: profile.clone(),
                    }
                })?),
                None => None,
            };
            let id = world.add_body(&spec.name);
            if objects.insert(spec.name.clone(), id).is_some() {
                return Err(ScenarioError::DuplicateName(spec.name.clone()));
            }
            registry.register(FastenerStateMachine::new(id, config))?;
        }

        tracing::info!(
            sockets = sockets.len(),
            fasteners = objects.len(),
            steps = scenario.steps.len(),
            "scenario loaded"
        );

        Ok(Self {
            world,
            registry,
            objects,
            sockets,
            warnings,
            ticks: 0,
            events: Vec::new(),
            sweeps: Vec::new(),
        })
    }

    fn object(&self, step: usize, name: &str) -> Result<ObjectId, ScenarioError> {
        self.objects
            .get(name)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownObject {
                step,
                name: name.to_string(),
            })
    }

    fn socket(&self, step: usize, name: &str) -> Result<SocketId, ScenarioError> {
        self.sockets
            .get(name)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownSocket {
                step,
                name: name.to_string(),
            })
    }

    fn apply(&mut self, index: usize, step: &ScenarioStep) -> Result<(), ScenarioError> {
        tracing::debug!(index, ?step, "scenario step");
        match step {
            ScenarioStep::Snap { object, socket } => {
                let (object, socket) = (self.object(index, object)?, self.socket(index, socket)?);
                if self.world.snap(object, socket) {
                    self.registry.dispatch(HostEvent::Snapped { socket, object })?;
                }
            }
            ScenarioStep::Unsnap { object, socket } => {
                let (object, socket) = (self.object(index, object)?, self.socket(index, socket)?);
                if self.world.unsnap(object, socket) {
                    self.registry
                        .dispatch(HostEvent::Unsnapped { socket, object })?;
                }
            }
            ScenarioStep::Grab { object } => {
                let object = self.object(index, object)?;
                self.registry.dispatch(HostEvent::Grabbed { object })?;
            }
            ScenarioStep::Release { object } => {
                let object = self.object(index, object)?;
                self.registry.dispatch(HostEvent::Released { object })?;
            }
            ScenarioStep::Rotate {
                object,
                degrees,
                ticks,
            } => {
                let object = self.object(index, object)?;
                let ticks = (*ticks).max(1);
                let per_tick = degrees / f64::from(ticks);
                for _ in 0..ticks {
                    self.world.rotate(object, per_tick);
                    self.tick();
                }
            }
            ScenarioStep::Placement {
                object,
                position_error,
                linear_speed,
            } => {
                let object = self.object(index, object)?;
                self.world
                    .set_placement(object, *position_error, *linear_speed);
            }
            ScenarioStep::Destroy { object } => {
                let object = self.object(index, object)?;
                self.world.destroy(object);
            }
            ScenarioStep::Sweep => {
                let report = self.registry.disable_all_sockets(&mut self.world);
                let summary = self.summarize(&report);
                self.sweeps.push(summary);
            }
            ScenarioStep::Tick { count } => {
                for _ in 0..*count {
                    self.tick();
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self) {
        self.registry.step_all(&mut self.world);
        self.ticks += 1;
        for (object, event) in self.registry.drain_events() {
            self.events.push(ReportedEvent {
                tick: self.ticks,
                fastener: self.object_name(object),
                event,
            });
        }
    }

    fn object_name(&self, id: ObjectId) -> String {
        self.world
            .body(id)
            .map_or_else(|| id.to_string(), |b| b.name.clone())
    }

    fn socket_name(&self, id: SocketId) -> String {
        self.world
            .socket(id)
            .map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    fn summarize(&self, report: &SweepReport) -> SweepSummary {
        SweepSummary {
            disabled: report.disabled.iter().map(|s| self.socket_name(*s)).collect(),
            skipped_occupied: report
                .skipped_occupied
                .iter()
                .map(|s| self.socket_name(*s))
                .collect(),
        }
    }

    fn finish(self, scenario: &Scenario) -> ScenarioReport {
        let fasteners = scenario
            .fasteners
            .iter()
            .filter_map(|spec| {
                let id = self.objects.get(&spec.name)?;
                let machine = self.registry.get(*id)?;
                Some(FastenerReport {
                    name: spec.name.clone(),
                    state: machine.state(),
                    total_rotation: machine.total_rotation(),
                    turns_completed: machine.turns_completed(),
                    constrained: machine.constraint().is_some(),
                    socket: machine.socket().map(|s| self.socket_name(s)),
                    retired: machine.is_retired(),
                    transitions: machine.transitions().to_vec(),
                    diagnostics: machine.diagnostics().to_vec(),
                })
            })
            .collect();

        let sockets = scenario
            .sockets
            .iter()
            .filter_map(|spec| {
                let id = self.sockets.get(&spec.name)?;
                let socket = self.world.socket(*id)?;
                Some(SocketReport {
                    name: spec.name.clone(),
                    active: socket.active,
                    match_rotation: socket.match_rotation,
                    occupant: socket.occupant.map(|o| self.object_name(o)),
                })
            })
            .collect();

        tracing::info!(ticks = self.ticks, events = self.events.len(), "scenario finished");

        ScenarioReport {
            ticks: self.ticks,
            warnings: self.warnings,
            events: self.events,
            sweeps: self.sweeps,
            fasteners,
            sockets,
        }
    }
}
