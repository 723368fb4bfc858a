//! Project context shared by the coverage commands.
//!
//! Resolves the effective configuration once (file, then environment and
//! flags on top), and wires the producer and threshold store to it.

use std::path::{Path, PathBuf};

use crate::config::{load_config, validate, CovgateConfig, Overrides};
use crate::coverage::{CoverageProducer, CoverageReport, ReportSource};
use crate::error::{CovgateError, Result};
use crate::modules::{discover, Module};
use crate::requirements::RequirementChecker;
use crate::threshold::FsThresholdStore;
use crate::ui::{hints, ProgressSpinner, SpinnerHandle, UserInterface};

/// Effective configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_root: PathBuf,
    config: CovgateConfig,
    checker: Option<RequirementChecker>,
}

impl ProjectContext {
    /// Load and validate configuration for `project_root`.
    ///
    /// The root is canonicalized so module prefixes compare against the
    /// absolute paths coverage tools write.
    pub fn load(
        project_root: &Path,
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let project_root = project_root
            .canonicalize()
            .map_err(|e| CovgateError::ConfigValidationError {
                message: format!("Project root not found: {} ({e})", project_root.display()),
            })?;
        let config = load_config(&project_root, config_path)?.apply(overrides);
        validate(&config)?;
        tracing::debug!(
            "Source root {}, {} discovery",
            config.source_root.display(),
            config.discovery
        );
        Ok(Self::new(&project_root, config))
    }

    /// Context over an already-built configuration.
    pub fn new(project_root: &Path, config: CovgateConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            checker: None,
        }
    }

    /// Check requirements against an explicit PATH (for testing).
    pub fn with_checker(mut self, checker: RequirementChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    /// The project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The effective configuration.
    pub fn config(&self) -> &CovgateConfig {
        &self.config
    }

    /// Absolute source root.
    pub fn source_root(&self) -> PathBuf {
        self.config.source_root_in(&self.project_root)
    }

    /// Marker store over the source root.
    pub fn store(&self) -> FsThresholdStore {
        FsThresholdStore::new(self.source_root())
    }

    /// Resolve modules with the configured policy.
    pub fn modules(&self, store: &FsThresholdStore) -> Result<Vec<Module>> {
        discover(&self.source_root(), self.config.discovery, store)
    }

    /// Fail unless the source root is an existing directory.
    pub fn require_source_root(&self) -> Result<PathBuf> {
        let root = self.source_root();
        if root.is_dir() {
            Ok(root)
        } else {
            Err(CovgateError::ConfigValidationError {
                message: format!("Source root not found: {}", root.display()),
            })
        }
    }

    fn producer(&self) -> CoverageProducer {
        let producer = CoverageProducer::new(&self.project_root, self.config.coverage.clone());
        match &self.checker {
            Some(checker) => producer.with_checker(checker.clone()),
            None => producer,
        }
    }

    /// Produce the coverage report, reporting progress through `ui`.
    ///
    /// A missing requirement or a failed test run is reported to the user
    /// and yields `Ok(None)`; the caller exits non-zero without evaluating
    /// anything. Other errors propagate.
    pub fn produce_report(
        &self,
        source: &ReportSource,
        ui: &mut dyn UserInterface,
        show_progress: bool,
    ) -> Result<Option<CoverageReport>> {
        let producer = self.producer();

        if source.runs_tests() {
            if let Err(e) = producer.preflight() {
                if let CovgateError::RequirementMissing { hint, .. } = &e {
                    ui.error(&e.to_string());
                    ui.show_hint(&hints::install_requirement(hint));
                    return Ok(None);
                }
                return Err(e);
            }
        }

        let mut spinner: Box<dyn SpinnerHandle> = if show_progress && source.runs_tests() {
            ui.start_spinner(&format!("Running {}", producer.command()))
        } else {
            Box::new(ProgressSpinner::hidden())
        };

        match producer.produce(source) {
            Ok(report) => {
                spinner.finish_success(&format!("Coverage collected for {} file(s)", report.len()));
                Ok(Some(report))
            }
            Err(e @ CovgateError::TestRunFailed { .. }) => {
                spinner.finish_error("Tests failed");
                ui.error(&e.to_string());
                Ok(None)
            }
            Err(e) => {
                spinner.finish_error("Could not collect coverage");
                Err(e)
            }
        }
    }
}
