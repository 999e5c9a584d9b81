//! The documents shipped under `demos/` stay loadable and behave as described.

use std::path::PathBuf;

use vrtk_cli::simulate::{simulate_file, SimulateArgs};
use vrtk_cli::validate::check_profile;
use vrtk_fastener::{ConstraintKind, FastenerState, LifecycleEvent};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_profiles_validate_cleanly() {
    let screw = check_profile(&demo("panel-screw.yaml"));
    assert!(screw.valid, "{:?}", screw.error);
    assert!(screw.warnings.is_empty());
    assert_eq!(screw.constraint.unwrap().kind, ConstraintKind::Hinge);

    let valve = check_profile(&demo("gate-valve.yaml"));
    assert!(valve.valid, "{:?}", valve.error);
    assert!(valve.warnings.is_empty());
    assert_eq!(valve.constraint.unwrap().kind, ConstraintKind::FrozenBody);
}

#[test]
fn demo_scenario_tightens_then_removes() {
    let report = simulate_file(&SimulateArgs {
        scenario: demo("tighten-and-remove.yaml"),
        fail_on_diagnostics: false,
        compact: true,
    })
    .unwrap();

    let events: Vec<_> = report.events.iter().map(|e| &e.event).collect();
    assert!(matches!(events[0], LifecycleEvent::Locked { .. }));
    assert!(matches!(events[1], LifecycleEvent::Tightened { .. }));
    assert!(matches!(events[2], LifecycleEvent::Unlocked { .. }));

    let screw = report.fastener("screw-1").unwrap();
    assert_eq!(screw.state, FastenerState::Unlocked);
    assert!(screw.diagnostics.is_empty());
    assert_eq!(report.sweeps.len(), 1);
}
