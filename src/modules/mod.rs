//! Logical coverage modules.
//!
//! A module is a directory beneath the source root whose files are
//! accounted together. The root pseudo-module collects files that sit
//! directly in the source root.
//!
//! - [`resolver`] - Discovery policies and file-to-module assignment

pub mod resolver;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use resolver::{assign, discover, ModuleFiles};

/// Display name of the root pseudo-module.
pub const ROOT_DISPLAY_NAME: &str = "(root)";

/// How modules are found beneath the source root.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryPolicy {
    /// Any directory, at any depth, holding a `.covgate` marker.
    #[default]
    Marker,
    /// Every immediate child directory, marker or not.
    Fixed,
}

impl fmt::Display for DiscoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker => write!(f, "marker"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl FromStr for DiscoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "marker" => Ok(Self::Marker),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("unknown discovery policy: {}", s)),
        }
    }
}

/// A coverage-accounting unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Path relative to the source root, slash-separated; empty for the root.
    pub key: String,
    /// Name shown in reports.
    pub display_name: String,
    /// Absolute module directory.
    pub directory: PathBuf,
    /// `directory` as a slash-separated string ending in `/`.
    pub prefix: String,
}

impl Module {
    /// The root pseudo-module for `source_root`.
    pub fn root(source_root: &Path) -> Self {
        Self {
            key: String::new(),
            display_name: ROOT_DISPLAY_NAME.to_string(),
            directory: source_root.to_path_buf(),
            prefix: dir_prefix(source_root),
        }
    }

    /// A declared module at `key` beneath `source_root`.
    pub fn declared(source_root: &Path, key: &str) -> Self {
        let directory = key
            .split('/')
            .fold(source_root.to_path_buf(), |dir, part| dir.join(part));
        Self {
            key: key.to_string(),
            display_name: key.to_string(),
            prefix: dir_prefix(&directory),
            directory,
        }
    }

    /// Whether this is the root pseudo-module.
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// Whether a report path falls under this module.
    ///
    /// Declared modules match everything below their directory. The root
    /// pseudo-module only matches files directly inside the source root.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(&self.prefix) {
            Some(rest) => !self.is_root() || !rest.contains('/'),
            None => false,
        }
    }
}

/// Slash-separated directory string with exactly one trailing `/`.
///
/// The trailing separator keeps `src/foo/` from matching `src/foobar/`.
pub fn dir_prefix(dir: &Path) -> String {
    let mut prefix = dir.to_string_lossy().replace('\\', "/");
    while prefix.ends_with('/') && prefix.len() > 1 {
        prefix.pop();
    }
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
