//! # Fastener Configuration
//!
//! Two layers:
//!
//! - [`FastenerProfile`] is the authoring form. It is loosely typed (the axis
//!   is free text), every field has a default, and it deserializes from YAML
//!   or JSON profile files.
//! - [`FastenerConfig`] is the immutable runtime form, produced only by
//!   [`FastenerProfile::validate()`]. A machine receives it by value at
//!   construction and never mutates it.
//!
//! ## Validation Policy
//!
//! Recoverable authoring mistakes are corrected and reported as
//! [`ConfigWarning`]s:
//!
//! - an unknown axis falls back to [`RotationAxis::FALLBACK`];
//! - a tolerance wider than half the smallest active threshold is clamped to
//!   that half (a negative tolerance is clamped to zero);
//! - fewer than [`MIN_SETTLE_TICKS`] settle ticks are raised to the minimum.
//!
//! Anything that would make the fastener meaningless (non-finite numbers,
//! non-positive thresholds, an empty allow-list) is a hard [`ConfigError`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vrtk_core::{ConfigError, FixedStep, RotationAxis, FULL_TURN_DEGREES};

use crate::collaborator::{AngleLimits, ConstraintKind, ConstraintSpec, SocketDescriptor};

/// Minimum number of ticks between a snap and constraint creation.
///
/// The placement collaborator needs one step to teleport the object into
/// the socket and one more for the physics engine to integrate the new pose.
pub const MIN_SETTLE_TICKS: u32 = 2;

// ─── Authoring Form ─────────────────────────────────────────────────

/// The mechanical variant of a fastener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastenerKind {
    /// Hinge-constrained screw: lock, tighten, loosen, unlock.
    #[default]
    Screw,
    /// Body-constrained valve that waits for the socket to finish
    /// positioning it before constraining.
    Valve,
    /// Continuous hinge that completes after a number of full turns.
    TurnByCount,
}

impl std::fmt::Display for FastenerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Screw => "screw",
            Self::Valve => "valve",
            Self::TurnByCount => "turn_by_count",
        };
        f.write_str(s)
    }
}

/// Optional spring giving tactile resistance while constrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Spring stiffness (torque per degree).
    pub stiffness: f64,
    /// Spring damping.
    pub damping: f64,
    /// Rest angle relative to the lock point, in degrees.
    #[serde(default)]
    pub target_degrees: f64,
}

/// Which sockets a fastener may lock into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SocketCompatibility {
    /// Any socket.
    #[default]
    Any,
    /// Sockets carrying at least one of these tags.
    Tags {
        /// Accepted tags.
        tags: BTreeSet<String>,
    },
    /// Only the named sockets.
    AllowList {
        /// Accepted socket names.
        sockets: BTreeSet<String>,
    },
}

impl SocketCompatibility {
    /// Whether a socket with this descriptor accepts the fastener.
    pub fn accepts(&self, socket: &SocketDescriptor) -> bool {
        match self {
            Self::Any => true,
            Self::Tags { tags } => socket.tags.iter().any(|t| tags.contains(t)),
            Self::AllowList { sockets } => sockets.contains(&socket.name),
        }
    }
}

/// Authoring parameters for the valve positioning wait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningProfile {
    /// Maximum distance from the socket attach point, in metres.
    pub position_tolerance: f64,
    /// Maximum linear speed of the object, in metres per second.
    pub velocity_tolerance: f64,
    /// Consecutive in-tolerance ticks required before constraining.
    pub stable_ticks: u32,
    /// Give up waiting after this many simulated seconds and constrain anyway.
    pub timeout_seconds: f64,
}

impl Default for PositioningProfile {
    fn default() -> Self {
        Self {
            position_tolerance: 0.001,
            velocity_tolerance: 0.01,
            stable_ticks: 3,
            timeout_seconds: 3.0,
        }
    }
}

/// A fastener profile as authored on disk.
///
/// ```yaml
/// name: panel-screw
/// kind: screw
/// axis: y
/// tighten_threshold_degrees: 50
/// loosen_threshold_degrees: 90
/// angle_tolerance_degrees: 5
/// sockets:
///   mode: tags
///   tags: [m8]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FastenerProfile {
    /// Human-readable profile name.
    pub name: String,
    /// Mechanical variant.
    pub kind: FastenerKind,
    /// Rotation axis name (`x`, `y`, `z`).
    pub axis: String,
    /// Rotation from the lock point that counts as tight.
    pub tighten_threshold_degrees: f64,
    /// Reverse rotation from the tight point that counts as loose again.
    pub loosen_threshold_degrees: f64,
    /// Acceptance band below each threshold.
    pub angle_tolerance_degrees: f64,
    /// Optional constraint spring.
    pub spring: Option<SpringConfig>,
    /// Socket compatibility predicate.
    pub sockets: SocketCompatibility,
    /// Ticks to wait after a snap before constraining.
    pub settle_ticks: u32,
    /// Full turns to complete (turn-by-count only).
    pub turns: f64,
    /// Positioning wait (valve only).
    pub positioning: PositioningProfile,
    /// Simulation step rate used to convert seconds into ticks.
    pub tick_rate_hz: f64,
}

impl Default for FastenerProfile {
    fn default() -> Self {
        Self {
            name: "fastener".to_string(),
            kind: FastenerKind::Screw,
            axis: RotationAxis::FALLBACK.to_string(),
            tighten_threshold_degrees: 50.0,
            loosen_threshold_degrees: 90.0,
            angle_tolerance_degrees: 5.0,
            spring: None,
            sockets: SocketCompatibility::Any,
            settle_ticks: MIN_SETTLE_TICKS,
            turns: 1.0,
            positioning: PositioningProfile::default(),
            tick_rate_hz: FixedStep::DEFAULT_HZ,
        }
    }
}

// ─── Warnings ───────────────────────────────────────────────────────

/// A recoverable authoring mistake corrected during validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ConfigWarning {
    /// The axis name was not recognised.
    AxisFallback {
        /// The name as authored.
        given: String,
        /// The axis actually used.
        used: RotationAxis,
    },
    /// The tolerance was outside `[0, threshold / 2]`.
    ToleranceClamped {
        /// The tolerance as authored.
        requested: f64,
        /// The tolerance actually used.
        applied: f64,
    },
    /// Too few settle ticks were configured.
    SettleTicksRaised {
        /// The count as authored.
        requested: u32,
        /// The count actually used.
        applied: u32,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AxisFallback { given, used } => {
                write!(f, "unknown axis {given:?}, using {used}")
            }
            Self::ToleranceClamped { requested, applied } => {
                write!(f, "angle tolerance {requested} clamped to {applied}")
            }
            Self::SettleTicksRaised { requested, applied } => {
                write!(f, "settle ticks {requested} raised to {applied}")
            }
        }
    }
}

// ─── Runtime Form ───────────────────────────────────────────────────

/// Validated positioning wait for the valve variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositioningConfig {
    /// Maximum distance from the attach point, in metres.
    pub position_tolerance: f64,
    /// Maximum linear speed, in metres per second.
    pub velocity_tolerance: f64,
    /// Consecutive in-tolerance ticks required.
    pub stable_ticks: u32,
    /// Ticks after which constraints are applied regardless.
    pub timeout_ticks: u64,
}

/// Variant-specific behaviour of a validated fastener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FastenerVariant {
    /// Hinge constraint with limits; fixed settle delay.
    Screw,
    /// Frozen-body constraint; settle waits for positioning.
    Valve {
        /// Positioning wait parameters.
        positioning: PositioningConfig,
    },
    /// Unlimited hinge; completes after `turns` full revolutions.
    TurnByCount {
        /// Full turns to complete.
        turns: f64,
    },
}

impl FastenerVariant {
    /// The authoring kind this variant came from.
    pub fn kind(&self) -> FastenerKind {
        match self {
            Self::Screw => FastenerKind::Screw,
            Self::Valve { .. } => FastenerKind::Valve,
            Self::TurnByCount { .. } => FastenerKind::TurnByCount,
        }
    }
}

/// Immutable, validated fastener configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastenerConfig {
    name: String,
    variant: FastenerVariant,
    axis: RotationAxis,
    tighten_threshold_degrees: f64,
    loosen_threshold_degrees: f64,
    angle_tolerance_degrees: f64,
    spring: Option<SpringConfig>,
    compatibility: SocketCompatibility,
    settle_ticks: u32,
    #[serde(skip)]
    step: FixedStep,
}

impl FastenerConfig {
    /// Profile name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mechanical variant.
    pub fn variant(&self) -> &FastenerVariant {
        &self.variant
    }

    /// Rotation axis.
    pub fn axis(&self) -> RotationAxis {
        self.axis
    }

    /// Tighten threshold in degrees.
    pub fn tighten_threshold(&self) -> f64 {
        self.tighten_threshold_degrees
    }

    /// Loosen threshold in degrees.
    pub fn loosen_threshold(&self) -> f64 {
        self.loosen_threshold_degrees
    }

    /// Effective (clamped) tolerance in degrees.
    pub fn tolerance(&self) -> f64 {
        self.angle_tolerance_degrees
    }

    /// Rotation needed to complete a turn-by-count fastener, if applicable.
    pub fn completion_degrees(&self) -> Option<f64> {
        match self.variant {
            FastenerVariant::TurnByCount { turns } => Some(turns * FULL_TURN_DEGREES),
            FastenerVariant::Screw | FastenerVariant::Valve { .. } => None,
        }
    }

    /// Constraint spring, if any.
    pub fn spring(&self) -> Option<&SpringConfig> {
        self.spring.as_ref()
    }

    /// Socket compatibility predicate.
    pub fn compatibility(&self) -> &SocketCompatibility {
        &self.compatibility
    }

    /// Ticks between snap and constraint creation (at least [`MIN_SETTLE_TICKS`]).
    pub fn settle_ticks(&self) -> u32 {
        self.settle_ticks
    }

    /// Simulation step used for duration conversion.
    pub fn step(&self) -> FixedStep {
        self.step
    }

    /// The constraint to create when the fastener locks.
    ///
    /// Screws and valves get hard limits at `[-loosen, +tighten]` around the
    /// lock point so the physics backstop coincides with the thresholds.
    /// Turn-by-count hinges spin freely.
    pub fn constraint_spec(&self) -> ConstraintSpec {
        let limits = AngleLimits {
            min_degrees: -self.loosen_threshold_degrees,
            max_degrees: self.tighten_threshold_degrees,
        };
        let (kind, limits) = match self.variant {
            FastenerVariant::Screw => (ConstraintKind::Hinge, Some(limits)),
            FastenerVariant::Valve { .. } => (ConstraintKind::FrozenBody, Some(limits)),
            FastenerVariant::TurnByCount { .. } => (ConstraintKind::Hinge, None),
        };
        ConstraintSpec {
            kind,
            axis: self.axis,
            anchor: [0.0; 3],
            spring: self.spring,
            limits,
        }
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedProfile {
    /// The runtime configuration.
    pub config: FastenerConfig,
    /// Corrections applied along the way.
    pub warnings: Vec<ConfigWarning>,
}

impl FastenerProfile {
    /// Validate the profile and produce the runtime configuration.
    ///
    /// Corrections are logged at `warn` level and returned alongside the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for values that cannot be corrected.
    pub fn validate(&self) -> Result<ValidatedProfile, ConfigError> {
        let mut warnings = Vec::new();

        let tighten = require_positive("tighten_threshold_degrees", self.tighten_threshold_degrees)?;
        let loosen = require_positive("loosen_threshold_degrees", self.loosen_threshold_degrees)?;
        let requested_tolerance =
            require_finite("angle_tolerance_degrees", self.angle_tolerance_degrees)?;
        let step = FixedStep::from_hz(self.tick_rate_hz)?;

        let axis = match self.axis.parse::<RotationAxis>() {
            Ok(axis) => axis,
            Err(_) => {
                warnings.push(ConfigWarning::AxisFallback {
                    given: self.axis.clone(),
                    used: RotationAxis::FALLBACK,
                });
                RotationAxis::FALLBACK
            }
        };

        let variant = match self.kind {
            FastenerKind::Screw => FastenerVariant::Screw,
            FastenerKind::Valve => FastenerVariant::Valve {
                positioning: self.validate_positioning(&step)?,
            },
            FastenerKind::TurnByCount => FastenerVariant::TurnByCount {
                turns: require_positive("turns", self.turns)?,
            },
        };

        let smallest_threshold = match variant {
            FastenerVariant::TurnByCount { turns } => turns * FULL_TURN_DEGREES,
            FastenerVariant::Screw | FastenerVariant::Valve { .. } => tighten.min(loosen),
        };
        let tolerance = requested_tolerance.clamp(0.0, smallest_threshold / 2.0);
        if tolerance != requested_tolerance {
            warnings.push(ConfigWarning::ToleranceClamped {
                requested: requested_tolerance,
                applied: tolerance,
            });
        }

        let settle_ticks = self.settle_ticks.max(MIN_SETTLE_TICKS);
        if settle_ticks != self.settle_ticks {
            warnings.push(ConfigWarning::SettleTicksRaised {
                requested: self.settle_ticks,
                applied: settle_ticks,
            });
        }

        if let Some(spring) = &self.spring {
            require_non_negative("spring.stiffness", spring.stiffness)?;
            require_non_negative("spring.damping", spring.damping)?;
            require_finite("spring.target_degrees", spring.target_degrees)?;
        }

        if let SocketCompatibility::AllowList { sockets } = &self.sockets {
            if sockets.is_empty() {
                return Err(ConfigError::EmptyAllowList);
            }
        }

        for warning in &warnings {
            tracing::warn!(profile = %self.name, %warning, "fastener profile corrected");
        }

        Ok(ValidatedProfile {
            config: FastenerConfig {
                name: self.name.clone(),
                variant,
                axis,
                tighten_threshold_degrees: tighten,
                loosen_threshold_degrees: loosen,
                angle_tolerance_degrees: tolerance,
                spring: self.spring,
                compatibility: self.sockets.clone(),
                settle_ticks,
                step,
            },
            warnings,
        })
    }

    fn validate_positioning(&self, step: &FixedStep) -> Result<PositioningConfig, ConfigError> {
        let p = &self.positioning;
        let timeout_seconds = require_positive("positioning.timeout_seconds", p.timeout_seconds)?;
        Ok(PositioningConfig {
            position_tolerance: require_non_negative(
                "positioning.position_tolerance",
                p.position_tolerance,
            )?,
            velocity_tolerance: require_non_negative(
                "positioning.velocity_tolerance",
                p.velocity_tolerance,
            )?,
            stable_ticks: p.stable_ticks.max(1),
            timeout_ticks: step.ticks_for(timeout_seconds),
        })
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, tags: &[&str]) -> SocketDescriptor {
        SocketDescriptor {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_profile_is_valid() {
        let validated = FastenerProfile::default().validate().unwrap();
        assert!(validated.warnings.is_empty());
        let config = validated.config;
        assert_eq!(config.axis(), RotationAxis::Y);
        assert_eq!(config.tighten_threshold(), 50.0);
        assert_eq!(config.loosen_threshold(), 90.0);
        assert_eq!(config.tolerance(), 5.0);
        assert_eq!(config.settle_ticks(), MIN_SETTLE_TICKS);
        assert_eq!(config.variant(), &FastenerVariant::Screw);
    }

    #[test]
    fn test_unknown_axis_falls_back_with_warning() {
        let profile = FastenerProfile {
            axis: "sideways".into(),
            ..FastenerProfile::default()
        };
        let validated = profile.validate().unwrap();
        assert_eq!(validated.config.axis(), RotationAxis::FALLBACK);
        assert_eq!(
            validated.warnings,
            vec![ConfigWarning::AxisFallback {
                given: "sideways".into(),
                used: RotationAxis::FALLBACK,
            }]
        );
    }

    #[test]
    fn test_tolerance_clamped_to_half_smallest_threshold() {
        let profile = FastenerProfile {
            tighten_threshold_degrees: 20.0,
            loosen_threshold_degrees: 90.0,
            angle_tolerance_degrees: 15.0,
            ..FastenerProfile::default()
        };
        let validated = profile.validate().unwrap();
        assert_eq!(validated.config.tolerance(), 10.0);
        assert!(validated.warnings.contains(&ConfigWarning::ToleranceClamped {
            requested: 15.0,
            applied: 10.0,
        }));
    }

    #[test]
    fn test_negative_tolerance_clamped_to_zero() {
        let profile = FastenerProfile {
            angle_tolerance_degrees: -1.0,
            ..FastenerProfile::default()
        };
        assert_eq!(profile.validate().unwrap().config.tolerance(), 0.0);
    }

    #[test]
    fn test_turn_by_count_tolerance_uses_completion_angle() {
        let profile = FastenerProfile {
            kind: FastenerKind::TurnByCount,
            tighten_threshold_degrees: 10.0,
            angle_tolerance_degrees: 30.0,
            turns: 2.0,
            ..FastenerProfile::default()
        };
        let config = profile.validate().unwrap().config;
        assert_eq!(config.tolerance(), 30.0);
        assert_eq!(config.completion_degrees(), Some(720.0));
    }

    #[test]
    fn test_settle_ticks_raised_to_minimum() {
        let profile = FastenerProfile {
            settle_ticks: 0,
            ..FastenerProfile::default()
        };
        let validated = profile.validate().unwrap();
        assert_eq!(validated.config.settle_ticks(), MIN_SETTLE_TICKS);
        assert!(validated.warnings.contains(&ConfigWarning::SettleTicksRaised {
            requested: 0,
            applied: MIN_SETTLE_TICKS,
        }));
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let profile = FastenerProfile {
            tighten_threshold_degrees: 0.0,
            ..FastenerProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::NotPositive {
                field: "tighten_threshold_degrees",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let profile = FastenerProfile {
            loosen_threshold_degrees: f64::NAN,
            ..FastenerProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_negative_spring_rejected() {
        let profile = FastenerProfile {
            spring: Some(SpringConfig {
                stiffness: -1.0,
                damping: 0.0,
                target_degrees: 0.0,
            }),
            ..FastenerProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::Negative { field: "spring.stiffness", .. })
        ));
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let profile = FastenerProfile {
            sockets: SocketCompatibility::AllowList {
                sockets: BTreeSet::new(),
            },
            ..FastenerProfile::default()
        };
        assert_eq!(profile.validate().unwrap_err(), ConfigError::EmptyAllowList);
    }

    #[test]
    fn test_valve_timeout_converted_to_ticks() {
        let profile = FastenerProfile {
            kind: FastenerKind::Valve,
            ..FastenerProfile::default()
        };
        let config = profile.validate().unwrap().config;
        match config.variant() {
            FastenerVariant::Valve { positioning } => {
                assert_eq!(positioning.timeout_ticks, 150);
                assert_eq!(positioning.stable_ticks, 3);
            }
            other => panic!("expected valve variant, got {other:?}"),
        }
    }

    #[test]
    fn test_constraint_spec_per_variant() {
        let screw = FastenerProfile::default().validate().unwrap().config;
        let spec = screw.constraint_spec();
        assert_eq!(spec.kind, ConstraintKind::Hinge);
        assert_eq!(spec.anchor, [0.0; 3]);
        assert_eq!(
            spec.limits,
            Some(AngleLimits {
                min_degrees: -90.0,
                max_degrees: 50.0,
            })
        );

        let valve = FastenerProfile {
            kind: FastenerKind::Valve,
            ..FastenerProfile::default()
        };
        let spec = valve.validate().unwrap().config.constraint_spec();
        assert_eq!(spec.kind, ConstraintKind::FrozenBody);

        let turns = FastenerProfile {
            kind: FastenerKind::TurnByCount,
            ..FastenerProfile::default()
        };
        let spec = turns.validate().unwrap().config.constraint_spec();
        assert_eq!(spec.kind, ConstraintKind::Hinge);
        assert_eq!(spec.limits, None);
    }

    #[test]
    fn test_compatibility_predicates() {
        let m8 = descriptor("bolt-hole-1", &["m8", "panel"]);
        let m6 = descriptor("bolt-hole-2", &["m6"]);

        assert!(SocketCompatibility::Any.accepts(&m8));

        let tags = SocketCompatibility::Tags {
            tags: ["m8".to_string()].into_iter().collect(),
        };
        assert!(tags.accepts(&m8));
        assert!(!tags.accepts(&m6));

        let allow = SocketCompatibility::AllowList {
            sockets: ["bolt-hole-2".to_string()].into_iter().collect(),
        };
        assert!(!allow.accepts(&m8));
        assert!(allow.accepts(&m6));
    }

    #[test]
    fn test_profile_from_yaml() {
        let yaml = r#"
name: panel-screw
kind: screw
axis: Z
tighten_threshold_degrees: 45
loosen_threshold_degrees: 60
angle_tolerance_degrees: 3
spring:
  stiffness: 2.5
  damping: 0.1
sockets:
  mode: tags
  tags: [m8]
"#;
        let profile: FastenerProfile = serde_yaml::from_str(yaml).unwrap();
        let config = profile.validate().unwrap().config;
        assert_eq!(config.name(), "panel-screw");
        assert_eq!(config.axis(), RotationAxis::Z);
        assert_eq!(config.tighten_threshold(), 45.0);
        assert_eq!(config.spring().unwrap().target_degrees, 0.0);
        assert!(config.compatibility().accepts(&descriptor("any", &["m8"])));
    }

    #[test]
    fn test_unknown_profile_field_rejected() {
        let yaml = "name: x\ntighten: 40\n";
        assert!(serde_yaml::from_str::<FastenerProfile>(yaml).is_err());
    }

    #[test]
    fn test_profile_from_json() {
        let json = r#"{"kind": "turn_by_count", "turns": 3}"#;
        let profile: FastenerProfile = serde_json::from_str(json).unwrap();
        let config = profile.validate().unwrap().config;
        assert_eq!(config.variant(), &FastenerVariant::TurnByCount { turns: 3.0 });
    }
}
