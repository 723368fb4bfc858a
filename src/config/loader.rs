//! Configuration file discovery and loading.
//!
//! covgate reads at most one file: `--config <FILE>` when given, otherwise
//! `covgate.yml` in the project root. A missing default file means built-in
//! defaults; a missing explicit file is an error.

use crate::config::schema::CovgateConfig;
use crate::error::{CovgateError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up in the project root.
pub const CONFIG_FILE: &str = "covgate.yml";

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `covgate.yml` (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    let mut git_root = None;

    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }

        if git_root.is_none() && current.join(".git").exists() {
            git_root = Some(current.clone());
        }

        if !current.pop() {
            return git_root;
        }
    }
}

/// Path of the default config file, if it exists.
pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load configuration for a project.
///
/// `explicit` overrides discovery; relative paths resolve against
/// `project_root`.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<CovgateConfig> {
    let path = match explicit {
        Some(p) => {
            let p = project_root.join(p);
            if !p.is_file() {
                return Err(CovgateError::ConfigValidationError {
                    message: format!("Config file not found: {}", p.display()),
                });
            }
            p
        }
        None => match find_config(project_root) {
            Some(p) => p,
            None => {
                tracing::debug!(
                    "No {} in {}, using defaults",
                    CONFIG_FILE,
                    project_root.display()
                );
                return Ok(CovgateConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path)?;
    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&content, &path)
}

/// Parse YAML content into CovgateConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<CovgateConfig> {
    if content.trim().is_empty() {
        return Ok(CovgateConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| CovgateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
