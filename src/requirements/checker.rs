//! Requirement checking.
//!
//! The `RequirementChecker` resolves each required tool against a PATH list
//! and, for missing ones, attaches the install hint users should follow.

use std::path::PathBuf;

use crate::error::{CovgateError, Result};

use super::probe::{parse_system_path, resolve_tool_path};

/// Install hints for tools the default coverage command relies on.
const KNOWN_HINTS: &[(&str, &str)] = &[
    ("cargo", "install Rust via https://rustup.rs"),
    ("cargo-llvm-cov", "cargo install cargo-llvm-cov"),
    ("llvm-cov", "rustup component add llvm-tools-preview"),
    ("llvm-profdata", "rustup component add llvm-tools-preview"),
    ("cargo-nextest", "cargo install cargo-nextest --locked"),
    ("jq", "install jq with your system package manager"),
];

/// Hint shown when `tool` is missing.
pub fn install_hint(tool: &str) -> String {
    KNOWN_HINTS
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, hint)| hint.to_string())
        .unwrap_or_else(|| format!("install '{}' and make sure it is on PATH", tool))
}

/// The result of checking a single requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementStatus {
    /// Tool resolved on PATH.
    Satisfied { path: PathBuf },
    /// Tool is not on PATH.
    Missing { hint: String },
}

impl RequirementStatus {
    /// Whether the tool was found.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Checks whether required tools are available.
#[derive(Debug, Clone)]
pub struct RequirementChecker {
    path_entries: Vec<PathBuf>,
}

impl Default for RequirementChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementChecker {
    /// Checker over the process PATH.
    pub fn new() -> Self {
        Self::with_path(parse_system_path())
    }

    /// Checker over an explicit PATH list (for testing).
    pub fn with_path(path_entries: Vec<PathBuf>) -> Self {
        Self { path_entries }
    }

    /// Check a single tool.
    pub fn check_one(&self, tool: &str) -> RequirementStatus {
        match resolve_tool_path(tool, &self.path_entries) {
            Some(path) => {
                tracing::debug!("Requirement '{}' found at {}", tool, path.display());
                RequirementStatus::Satisfied { path }
            }
            None => RequirementStatus::Missing {
                hint: install_hint(tool),
            },
        }
    }

    /// Check every tool, in order.
    pub fn check_all(&self, tools: &[String]) -> Vec<(String, RequirementStatus)> {
        tools
            .iter()
            .map(|tool| (tool.clone(), self.check_one(tool)))
            .collect()
    }

    /// Fail with the first missing tool.
    pub fn ensure(&self, tools: &[String]) -> Result<()> {
        for (tool, status) in self.check_all(tools) {
            if let RequirementStatus::Missing { hint } = status {
                return Err(CovgateError::RequirementMissing {
                    requirement: tool,
                    hint,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_fake_binary(path: &Path) {
        fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn install_hint_known_tool() {
        assert_eq!(
            install_hint("cargo-llvm-cov"),
            "cargo install cargo-llvm-cov"
        );
    }

    #[test]
    fn install_hint_unknown_tool_names_it() {
        assert!(install_hint("grcov").contains("grcov"));
    }

    #[test]
    fn check_one_missing_carries_hint() {
        let temp = TempDir::new().unwrap();
        let checker = RequirementChecker::with_path(vec![temp.path().to_path_buf()]);

        let status = checker.check_one("cargo-llvm-cov");
        assert_eq!(
            status,
            RequirementStatus::Missing {
                hint: "cargo install cargo-llvm-cov".to_string()
            }
        );
        assert!(!status.is_satisfied());
    }

    #[test]
    fn check_one_satisfied() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("cargo"));
        let checker = RequirementChecker::with_path(vec![temp.path().to_path_buf()]);

        assert!(checker.check_one("cargo").is_satisfied());
    }

    #[test]
    fn ensure_reports_first_missing_tool() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("cargo"));
        let checker = RequirementChecker::with_path(vec![temp.path().to_path_buf()]);

        let err = checker
            .ensure(&["cargo".to_string(), "cargo-llvm-cov".to_string()])
            .unwrap_err();
        match err {
            CovgateError::RequirementMissing { requirement, hint } => {
                assert_eq!(requirement, "cargo-llvm-cov");
                assert!(hint.contains("cargo install"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ensure_with_no_requirements_passes() {
        let checker = RequirementChecker::with_path(Vec::new());
        assert!(checker.ensure(&[]).is_ok());
    }
}
