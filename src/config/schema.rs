//! Configuration schema definitions for covgate.
//!
//! This module contains the struct definitions that map to the
//! `covgate.yml` file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::modules::DiscoveryPolicy;

/// Root configuration structure for covgate.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovgateConfig {
    /// Directory beneath which modules are resolved (relative to project root)
    pub source_root: PathBuf,

    /// Module discovery policy
    pub discovery: DiscoveryPolicy,

    /// Threshold for modules without a marker; `None` reports them as no data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_threshold: Option<f64>,

    /// How the coverage report is produced
    pub coverage: CoverageSettings,
}

impl Default for CovgateConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            discovery: DiscoveryPolicy::default(),
            default_threshold: None,
            coverage: CoverageSettings::default(),
        }
    }
}

/// Settings for the instrumented test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageSettings {
    /// Shell command that runs the tests and emits the JSON report
    pub command: String,

    /// Read the report from this file (relative to project root) instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Executables that must be on PATH before the command runs
    pub requires: Vec<String>,

    /// Environment for the command
    pub env: BTreeMap<String, String>,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
            output: None,
            requires: default_requires(),
            env: default_env(),
        }
    }
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_command() -> String {
    "cargo llvm-cov --json --summary-only".to_string()
}

fn default_requires() -> Vec<String> {
    vec!["cargo".to_string(), "cargo-llvm-cov".to_string()]
}

/// Silence the tested program's own tracing so it cannot corrupt the report.
fn default_env() -> BTreeMap<String, String> {
    BTreeMap::from([("RUST_LOG".to_string(), "off".to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CovgateConfig::default();
        assert_eq!(config.source_root, PathBuf::from("src"));
        assert_eq!(config.discovery, DiscoveryPolicy::Marker);
        assert_eq!(config.default_threshold, None);
        assert_eq!(
            config.coverage.command,
            "cargo llvm-cov --json --summary-only"
        );
        assert_eq!(config.coverage.requires, vec!["cargo", "cargo-llvm-cov"]);
        assert_eq!(
            config.coverage.env.get("RUST_LOG"),
            Some(&"off".to_string())
        );
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
source_root: agent/src
discovery: fixed
default_threshold: 80.0
coverage:
  command: cargo llvm-cov nextest --json
  output: target/cov.json
  requires: [cargo-nextest]
  env:
    RUST_LOG: "off"
    MIRI_TEST: "1"
"#;
        let config: CovgateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source_root, PathBuf::from("agent/src"));
        assert_eq!(config.discovery, DiscoveryPolicy::Fixed);
        assert_eq!(config.default_threshold, Some(80.0));
        assert_eq!(
            config.coverage.output,
            Some(PathBuf::from("target/cov.json"))
        );
        assert_eq!(config.coverage.requires, vec!["cargo-nextest"]);
        assert_eq!(config.coverage.env.len(), 2);
    }

    #[test]
    fn partial_coverage_section_keeps_other_defaults() {
        let yaml = "coverage:\n  command: ./coverage.sh\n";
        let config: CovgateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.coverage.command, "./coverage.sh");
        assert_eq!(config.coverage.requires, vec!["cargo", "cargo-llvm-cov"]);
        assert_eq!(config.source_root, PathBuf::from("src"));
    }

    #[test]
    fn rejects_unknown_discovery_policy() {
        let yaml = "discovery: recursive\n";
        assert!(serde_yaml::from_str::<CovgateConfig>(yaml).is_err());
    }
}
