//! Configuration validation rules.
//!
//! - `default_threshold` must be a percentage in `[0, 100]`
//! - the coverage command must not be empty
//! - required tool names must not be empty

use crate::config::schema::CovgateConfig;
use crate::error::{CovgateError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &CovgateConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(threshold) = config.default_threshold {
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            errors.push(ValidationError {
                rule: "threshold-range".to_string(),
                message: format!(
                    "default_threshold must be between 0 and 100, got {}",
                    threshold
                ),
            });
        }
    }

    if config.coverage.command.trim().is_empty() {
        errors.push(ValidationError {
            rule: "missing-command".to_string(),
            message: "coverage.command must not be empty".to_string(),
        });
    }

    if config.coverage.requires.iter().any(|r| r.trim().is_empty()) {
        errors.push(ValidationError {
            rule: "empty-requirement".to_string(),
            message: "coverage.requires entries must not be empty".to_string(),
        });
    }

    errors
}

/// Validate and return an error summarising every problem.
pub fn validate(config: &CovgateConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(CovgateError::ConfigValidationError { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&CovgateConfig::default()).is_ok());
    }

    #[test]
    fn threshold_out_of_range() {
        let mut config = CovgateConfig::default();
        config.default_threshold = Some(120.0);
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "threshold-range");
    }

    #[test]
    fn collects_every_error() {
        let mut config = CovgateConfig::default();
        config.default_threshold = Some(-1.0);
        config.coverage.command = "  ".to_string();
        config.coverage.requires = vec![String::new()];

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("coverage.command"));
    }
}
