//! # Rotation Axis
//!
//! The three cardinal local axes a fastener may turn about. Authoring tools
//! store the axis as free text, so parsing is lenient about case and accepts
//! the common spellings (`"y"`, `"Y"`, `"up"`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A cardinal local rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationAxis {
    /// Local X (right).
    X,
    /// Local Y (up). The fallback when an axis name is not recognised.
    #[default]
    Y,
    /// Local Z (forward).
    Z,
}

impl RotationAxis {
    /// The axis used when configuration names an unknown axis.
    pub const FALLBACK: RotationAxis = RotationAxis::Y;

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl std::fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationAxis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "right" => Ok(Self::X),
            "y" | "up" => Ok(Self::Y),
            "z" | "forward" => Ok(Self::Z),
            _ => Err(ConfigError::UnknownAxis(s.to_string())),
        }
    }
}
