//! # vrtk-cli — VR Training Kit Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: check fastener profiles and print the effective runtime
//!   configuration together with any corrections applied
//! - `simulate`: replay a scripted scenario against the in-memory host and
//!   print the resulting report
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates; no fastener logic here.
//! - Machine-readable output goes to stdout as JSON; logs go to stderr.

use std::path::Path;

use serde::de::DeserializeOwned;

use vrtk_core::VrtkError;

pub mod simulate;
pub mod validate;

/// Document encodings accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml`, `.yml`, or anything else.
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Read and deserialize a YAML or JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, VrtkError> {
    let source = std::fs::read_to_string(path)?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            serde_json::from_str(&source).map_err(|e| VrtkError::Serialization(e.to_string()))
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(&source).map_err(|e| VrtkError::Serialization(e.to_string()))
        }
    }
}

/// Serialize a value as JSON for stdout.
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, VrtkError> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.map_err(|e| VrtkError::Serialization(e.to_string()))
}
