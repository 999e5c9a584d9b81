//! # Validate Subcommand
//!
//! Loads fastener profiles, runs them through profile validation, and
//! prints one JSON report per file: the effective configuration, the
//! constraint a lock would create, and every correction applied.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use vrtk_fastener::{ConfigWarning, ConstraintSpec, FastenerConfig, FastenerProfile};

/// Arguments for the `vrtk validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Profile files to validate (YAML, or JSON by extension).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Treat corrected profiles as failures.
    #[arg(long)]
    pub strict: bool,

    /// Print compact single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Validation outcome for one profile file.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    /// The file checked.
    pub path: PathBuf,
    /// Whether the profile produced a usable configuration.
    pub valid: bool,
    /// Effective runtime configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<FastenerConfig>,
    /// Constraint created on lock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<ConstraintSpec>,
    /// Corrections applied.
    pub warnings: Vec<ConfigWarning>,
    /// Why the profile was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate a single profile file. Never fails: problems land in the report.
pub fn check_profile(path: &Path) -> ProfileReport {
    let rejected = |error: String| ProfileReport {
        path: path.to_path_buf(),
        valid: false,
        config: None,
        constraint: None,
        warnings: Vec::new(),
        error: Some(error),
    };

    let profile: FastenerProfile = match crate::read_document(path) {
        Ok(profile) => profile,
        Err(e) => return rejected(e.to_string()),
    };
    match profile.validate() {
        Ok(validated) => ProfileReport {
            path: path.to_path_buf(),
            valid: true,
            constraint: Some(validated.config.constraint_spec()),
            config: Some(validated.config),
            warnings: validated.warnings,
            error: None,
        },
        Err(e) => rejected(e.to_string()),
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every profile is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mut had_failures = false;

    for path in &args.paths {
        let report = check_profile(path);
        let failed = !report.valid || (args.strict && !report.warnings.is_empty());
        if failed {
            tracing::warn!(path = %path.display(), error = ?report.error, "profile rejected");
        } else {
            tracing::info!(path = %path.display(), warnings = report.warnings.len(), "profile ok");
        }
        had_failures |= failed;
        println!("{}", crate::to_json(&report, args.compact)?);
    }

    Ok(u8::from(had_failures))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn valid_yaml_profile_reports_effective_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "screw.yaml",
            "name: panel-screw\naxis: z\ntighten_threshold_degrees: 40\n",
        );
        let report = check_profile(&path);
        assert!(report.valid);
        assert!(report.warnings.is_empty());
        let config = report.config.unwrap();
        assert_eq!(config.name(), "panel-screw");
        assert_eq!(report.constraint.unwrap().limits.unwrap().max_degrees, 40.0);
    }

    #[test]
    fn json_profile_with_corrections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "knob.json", r#"{"axis": "w", "settle_ticks": 1}"#);
        let report = check_profile(&path);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn invalid_profile_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.yaml", "loosen_threshold_degrees: 0\n");
        let report = check_profile(&path);
        assert!(!report.valid);
        assert!(report.error.unwrap().contains("loosen_threshold_degrees"));
    }

    #[test]
    fn run_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.yaml", "name: ok\n");
        let sloppy = write(dir.path(), "sloppy.yaml", "axis: up-ish\n");
        let bad = write(dir.path(), "bad.yaml", "tighten_threshold_degrees: -1\n");

        let args = |paths: Vec<PathBuf>, strict| ValidateArgs {
            paths,
            strict,
            compact: true,
        };
        assert_eq!(run_validate(&args(vec![good.clone()], false)).unwrap(), 0);
        assert_eq!(run_validate(&args(vec![sloppy.clone()], false)).unwrap(), 0);
        assert_eq!(run_validate(&args(vec![sloppy], true)).unwrap(), 1);
        assert_eq!(run_validate(&args(vec![good, bad], false)).unwrap(), 1);
    }
}
