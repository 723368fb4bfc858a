//! Configuration loading, parsing, and validation for covgate.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use covgate::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("covgate.yml"), "source_root: agent/src").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.source_root, std::path::PathBuf::from("agent/src"));
//! ```
//!
//! # Precedence
//!
//! CLI flag, then `COVGATE_*` environment variable (both handled by clap),
//! then `covgate.yml`, then built-in defaults. [`Overrides`] carries the
//! first two into [`CovgateConfig::apply`].

pub mod loader;
pub mod schema;
pub mod validator;

use std::path::{Path, PathBuf};

pub use loader::{find_config, find_project_root, load_config, parse_config, CONFIG_FILE};
pub use schema::{CovgateConfig, CoverageSettings};
pub use validator::{validate, validate_config, ValidationError};

use crate::modules::DiscoveryPolicy;

/// Values set on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub source_root: Option<PathBuf>,
    pub discovery: Option<DiscoveryPolicy>,
    pub default_threshold: Option<f64>,
}

impl CovgateConfig {
    /// Layer overrides on top of file values.
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(root) = &overrides.source_root {
            self.source_root = root.clone();
        }
        if let Some(policy) = overrides.discovery {
            self.discovery = policy;
        }
        if let Some(threshold) = overrides.default_threshold {
            self.default_threshold = Some(threshold);
        }
        self
    }

    /// Absolute source root for `project_root`.
    ///
    /// Resolved through the filesystem when it exists, so `..` segments and
    /// symlinks match the paths in coverage reports.
    pub fn source_root_in(&self, project_root: &Path) -> PathBuf {
        let joined = project_root.join(&self.source_root);
        joined.canonicalize().unwrap_or(joined)
    }
}
