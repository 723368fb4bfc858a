//! Module discovery and file assignment.
//!
//! Discovery produces the ordered module list: the root pseudo-module
//! first, then declared modules sorted by key. Assignment then gives each
//! report record to at most one module, the one with the longest matching
//! directory prefix, so nested marker modules never double count a file.

use std::fs;
use std::path::Path;

use crate::coverage::{CoverageReport, FileCoverage};
use crate::error::{CovgateError, Result};
use crate::threshold::ThresholdStore;

use super::{DiscoveryPolicy, Module};

/// A module together with the report records attributed to it.
#[derive(Debug, Clone)]
pub struct ModuleFiles<'r> {
    /// The module.
    pub module: Module,
    /// Records under the module, in report order.
    pub files: Vec<&'r FileCoverage>,
}

/// Resolve the modules to evaluate.
pub fn discover(
    source_root: &Path,
    policy: DiscoveryPolicy,
    store: &dyn ThresholdStore,
) -> Result<Vec<Module>> {
    let mut keys = match policy {
        DiscoveryPolicy::Marker => store.keys()?,
        DiscoveryPolicy::Fixed => child_directories(source_root)?,
    };
    keys.retain(|key| !key.is_empty());
    keys.sort();
    keys.dedup();

    tracing::debug!(
        "Discovered {} module(s) under {} ({} policy)",
        keys.len(),
        source_root.display(),
        policy
    );

    let mut modules = Vec::with_capacity(keys.len() + 1);
    modules.push(Module::root(source_root));
    modules.extend(keys.iter().map(|key| Module::declared(source_root, key)));
    Ok(modules)
}

/// Immediate, non-hidden subdirectories of the source root.
fn child_directories(source_root: &Path) -> Result<Vec<String>> {
    if !source_root.is_dir() {
        return Err(CovgateError::ConfigValidationError {
            message: format!("Source root not found: {}", source_root.display()),
        });
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(source_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    Ok(names)
}

/// Attribute each report record to its module.
///
/// Records outside every module (e.g. in an undeclared subdirectory under
/// the marker policy, or outside the source root) are dropped.
pub fn assign(modules: Vec<Module>, report: &CoverageReport) -> Vec<ModuleFiles<'_>> {
    let mut buckets: Vec<Vec<&FileCoverage>> = vec![Vec::new(); modules.len()];

    for file in report.files() {
        let owner = modules
            .iter()
            .enumerate()
            .filter(|(_, module)| module.matches(&file.path))
            .max_by_key(|(_, module)| module.prefix.len())
            .map(|(idx, _)| idx);

        match owner {
            Some(idx) => buckets[idx].push(file),
            None => tracing::trace!("No module owns {}", file.path),
        }
    }

    modules
        .into_iter()
        .zip(buckets)
        .map(|(module, files)| ModuleFiles { module, files })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::{FsThresholdStore, MemoryThresholdStore, MARKER_FILE};
    use tempfile::TempDir;

    fn file(path: &str, total: u64, covered: u64) -> FileCoverage {
        FileCoverage {
            path: path.to_string(),
            lines_total: total,
            lines_covered: covered,
        }
    }

    fn keys(modules: &[Module]) -> Vec<&str> {
        modules.iter().map(|m| m.key.as_str()).collect()
    }

    #[test]
    fn marker_policy_lists_root_then_sorted_keys() {
        let store = MemoryThresholdStore::new()
            .with_marker("storage", "70")
            .with_marker("deploy/fsm", "80")
            .with_marker("", "50");

        let modules = discover(Path::new("/w/src"), DiscoveryPolicy::Marker, &store).unwrap();
        assert_eq!(keys(&modules), vec!["", "deploy/fsm", "storage"]);
        assert!(modules[0].is_root());
    }

    #[test]
    fn marker_policy_without_markers_has_only_root() {
        let store = MemoryThresholdStore::new();
        let modules = discover(Path::new("/w/src"), DiscoveryPolicy::Marker, &store).unwrap();
        assert_eq!(keys(&modules), vec![""]);
    }

    #[test]
    fn fixed_policy_lists_every_child_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("mqtt")).unwrap();
        fs::create_dir_all(temp.path().join("cache/inner")).unwrap();
        fs::create_dir_all(temp.path().join(".hidden")).unwrap();
        fs::write(temp.path().join("main.rs"), "fn main() {}").unwrap();
        fs::write(temp.path().join("cache").join(MARKER_FILE), "60").unwrap();

        let store = FsThresholdStore::new(temp.path());
        let modules = discover(temp.path(), DiscoveryPolicy::Fixed, &store).unwrap();
        assert_eq!(keys(&modules), vec!["", "cache", "mqtt"]);
    }

    #[test]
    fn fixed_policy_requires_source_root() {
        let temp = TempDir::new().unwrap();
        let store = MemoryThresholdStore::new();
        let missing = temp.path().join("missing");
        let err = discover(&missing, DiscoveryPolicy::Fixed, &store).unwrap_err();
        assert!(matches!(err, CovgateError::ConfigValidationError { .. }));
    }

    #[test]
    fn assign_uses_separator_boundary() {
        let root = Path::new("/w/agent/src");
        let modules = vec![
            Module::root(root),
            Module::declared(root, "foo"),
            Module::declared(root, "foobar"),
        ];
        let report = CoverageReport::new(vec![
            file("/w/agent/src/foo/a.rs", 10, 5),
            file("/w/agent/src/foobar/b.rs", 10, 10),
            file("/w/agent/src/lib.rs", 4, 2),
        ]);

        let assigned = assign(modules, &report);
        assert_eq!(assigned[0].files.len(), 1);
        assert_eq!(assigned[0].files[0].path, "/w/agent/src/lib.rs");
        assert_eq!(assigned[1].files.len(), 1);
        assert_eq!(assigned[1].files[0].path, "/w/agent/src/foo/a.rs");
        assert_eq!(assigned[2].files.len(), 1);
    }

    #[test]
    fn assign_gives_nested_files_to_most_specific_module() {
        let root = Path::new("/w/src");
        let modules = vec![
            Module::root(root),
            Module::declared(root, "deploy"),
            Module::declared(root, "deploy/fsm"),
        ];
        let report = CoverageReport::new(vec![
            file("/w/src/deploy/apply.rs", 10, 1),
            file("/w/src/deploy/fsm/mod.rs", 10, 9),
        ]);

        let assigned = assign(modules, &report);
        assert_eq!(assigned[1].files.len(), 1);
        assert_eq!(assigned[1].files[0].path, "/w/src/deploy/apply.rs");
        assert_eq!(assigned[2].files.len(), 1);
        assert_eq!(assigned[2].files[0].path, "/w/src/deploy/fsm/mod.rs");
    }

    #[test]
    fn assign_drops_files_in_undeclared_directories() {
        let root = Path::new("/w/src");
        let modules = vec![Module::root(root), Module::declared(root, "http")];
        let report = CoverageReport::new(vec![
            file("/w/src/crypt/jwt.rs", 10, 1),
            file("/w/tests/it.rs", 10, 1),
        ]);

        let assigned = assign(modules, &report);
        assert!(assigned.iter().all(|m| m.files.is_empty()));
    }
}
