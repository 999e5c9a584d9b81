//! # vrtk-sim — In-Memory Simulation Host
//!
//! A reference host for the fastener machine. [`SimWorld`] implements both
//! collaborator traits over plain maps, and [`Scenario`] replays scripted
//! interactions against it. Used by the `vrtk` CLI and by integration tests;
//! not a physics engine.

pub mod scenario;
pub mod world;

pub use scenario::{
    FastenerReport, FastenerSpec, ReportedEvent, Scenario, ScenarioError, ScenarioReport,
    ScenarioStep, SocketReport, SocketSpec, SweepSummary,
};
pub use world::{SimBody, SimSocket, SimWorld};
