//! Error types for covgate operations.
//!
//! This module defines [`CovgateError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `CovgateError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `CovgateError::Other`) for unexpected errors
//! - Below-threshold modules and modules without data are NOT errors; they are
//!   outcomes reported by the gate
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for covgate operations.
#[derive(Debug, Error)]
pub enum CovgateError {
    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A required tool is not on PATH. Checked before any tests run.
    #[error("Missing requirement '{requirement}': {hint}")]
    RequirementMissing { requirement: String, hint: String },

    /// The instrumented test run exited non-zero; its coverage is not evaluated.
    #[error("Tests failed (exit code {code:?}), coverage was not evaluated: {command}")]
    TestRunFailed { command: String, code: Option<i32> },

    /// Shell command could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The coverage report did not have the expected shape.
    #[error("Malformed coverage report: {message}")]
    MalformedReport { message: String },

    /// A `.covgate` marker holds something that is not a percentage.
    #[error("Invalid threshold '{value}' in {path}")]
    InvalidThreshold { path: PathBuf, value: String },

    /// Another ratchet holds the threshold lock.
    #[error("Threshold files are locked by another run ({path})")]
    Locked { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for covgate operations.
pub type Result<T> = std::result::Result<T, CovgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = CovgateError::ConfigParseError {
            path: PathBuf::from("/covgate.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/covgate.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn requirement_missing_displays_requirement_and_hint() {
        let err = CovgateError::RequirementMissing {
            requirement: "cargo-llvm-cov".into(),
            hint: "cargo install cargo-llvm-cov".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cargo-llvm-cov"));
        assert!(msg.contains("cargo install"));
    }

    #[test]
    fn test_run_failed_is_distinct_from_coverage_failure() {
        let err = CovgateError::TestRunFailed {
            command: "cargo llvm-cov --json".into(),
            code: Some(101),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Tests failed"));
        assert!(msg.contains("101"));
        assert!(msg.contains("not evaluated"));
    }

    #[test]
    fn invalid_threshold_displays_value_and_path() {
        let err = CovgateError::InvalidThreshold {
            path: PathBuf::from("src/foo/.covgate"),
            value: "lots".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lots"));
        assert!(msg.contains("src/foo/.covgate"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CovgateError = io_err.into();
        assert!(matches!(err, CovgateError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(CovgateError::MalformedReport {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
