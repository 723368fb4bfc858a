//! Persisted module thresholds.
//!
//! Thresholds live in one `.covgate` marker per module directory. The
//! [`ThresholdStore`] trait treats them as a key-value store keyed by the
//! module's path relative to the source root (`""` for the root
//! pseudo-module), so the gate and ratchet can run against
//! [`MemoryThresholdStore`] in tests.
//!
//! Neither implementation caches: every `load` reads the current value.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::value::Threshold;

/// File name of a module marker.
pub const MARKER_FILE: &str = ".covgate";

/// Load/save contract for module thresholds.
pub trait ThresholdStore {
    /// Threshold stored for `key`, or `None` when the module has no marker.
    fn load(&self, key: &str) -> Result<Option<Threshold>>;

    /// Replace the stored threshold for `key`, creating the marker if needed.
    fn save(&mut self, key: &str, threshold: &Threshold) -> Result<()>;

    /// Every key that has a marker, sorted lexicographically.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Marker-file store rooted at the source root.
#[derive(Debug, Clone)]
pub struct FsThresholdStore {
    source_root: PathBuf,
}

impl FsThresholdStore {
    /// Create a store over `source_root`.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    /// The source root this store reads from.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory of the module with `key`.
    pub fn module_dir(&self, key: &str) -> PathBuf {
        if key.is_empty() {
            self.source_root.clone()
        } else {
            key.split('/')
                .fold(self.source_root.clone(), |dir, part| dir.join(part))
        }
    }

    /// Marker path of the module with `key`.
    pub fn marker_path(&self, key: &str) -> PathBuf {
        self.module_dir(key).join(MARKER_FILE)
    }

    fn scan(&self, dir: &Path, key: &str, keys: &mut Vec<String>) -> Result<()> {
        if dir.join(MARKER_FILE).is_file() {
            keys.push(key.to_string());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let child_key = if key.is_empty() {
                name
            } else {
                format!("{}/{}", key, name)
            };
            self.scan(&entry.path(), &child_key, keys)?;
        }
        Ok(())
    }
}

impl ThresholdStore for FsThresholdStore {
    fn load(&self, key: &str) -> Result<Option<Threshold>> {
        let path = self.marker_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let threshold = Threshold::parse(&content, &path)?;
                tracing::debug!("Loaded threshold {} from {}", threshold, path.display());
                Ok(Some(threshold))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file and renames it over the marker, so a crash
    /// mid-write never leaves a truncated threshold.
    fn save(&mut self, key: &str, threshold: &Threshold) -> Result<()> {
        let path = self.marker_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, format!("{}\n", threshold.as_str()))?;
        fs::rename(&temp_path, &path)?;
        tracing::debug!("Wrote threshold {} to {}", threshold, path.display());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        if self.source_root.is_dir() {
            self.scan(&self.source_root, "", &mut keys)?;
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory store holding raw marker contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryThresholdStore {
    markers: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryThresholdStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marker with raw content, as if written by hand.
    pub fn with_marker(mut self, key: &str, content: &str) -> Self {
        self.markers.insert(key.to_string(), content.to_string());
        self
    }

    /// Raw content of a marker.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.markers.get(key).map(String::as_str)
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ThresholdStore for MemoryThresholdStore {
    fn load(&self, key: &str) -> Result<Option<Threshold>> {
        self.markers
            .get(key)
            .map(|content| Threshold::parse(content, &Path::new(key).join(MARKER_FILE)))
            .transpose()
    }

    fn save(&mut self, key: &str, threshold: &Threshold) -> Result<()> {
        self.markers
            .insert(key.to_string(), format!("{}\n", threshold.as_str()));
        self.writes += 1;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.markers.keys().cloned().collect())
    }
}
