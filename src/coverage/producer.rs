//! Producing the coverage report.
//!
//! The producer checks that every required tool is on PATH, then runs the
//! instrumented test command exactly once. A non-zero exit aborts with
//! [`CovgateError::TestRunFailed`] before anything is evaluated. The report
//! is taken from the command's stdout, or from `coverage.output` when the
//! command writes it to a file.

use std::path::{Path, PathBuf};

use crate::config::CoverageSettings;
use crate::error::{CovgateError, Result};
use crate::requirements::RequirementChecker;
use crate::shell::{execute, CommandOptions};

use super::report::CoverageReport;

/// Where the report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    /// A pre-generated export; no tests are run.
    File(PathBuf),
    /// The configured coverage command.
    Command,
}

impl ReportSource {
    /// `File` when a path was given, otherwise `Command`.
    pub fn from_arg(report: Option<&Path>) -> Self {
        match report {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Command,
        }
    }

    /// Whether this source runs the test suite.
    pub fn runs_tests(&self) -> bool {
        matches!(self, Self::Command)
    }
}

/// Runs the instrumented tests and reads their report.
#[derive(Debug, Clone)]
pub struct CoverageProducer {
    project_root: PathBuf,
    settings: CoverageSettings,
    checker: RequirementChecker,
}

impl CoverageProducer {
    /// Create a producer running in `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, settings: CoverageSettings) -> Self {
        Self {
            project_root: project_root.into(),
            settings,
            checker: RequirementChecker::new(),
        }
    }

    /// Replace the requirement checker (for testing).
    pub fn with_checker(mut self, checker: RequirementChecker) -> Self {
        self.checker = checker;
        self
    }

    /// The configured command line.
    pub fn command(&self) -> &str {
        &self.settings.command
    }

    /// Fail with [`CovgateError::RequirementMissing`] on the first missing tool.
    pub fn preflight(&self) -> Result<()> {
        self.checker.ensure(&self.settings.requires)
    }

    /// Produce the report from `source`.
    pub fn produce(&self, source: &ReportSource) -> Result<CoverageReport> {
        match source {
            ReportSource::File(path) => CoverageReport::load(&self.project_root.join(path)),
            ReportSource::Command => {
                self.preflight()?;
                self.run()
            }
        }
    }

    fn run(&self) -> Result<CoverageReport> {
        let command = &self.settings.command;
        let options = CommandOptions {
            cwd: Some(self.project_root.clone()),
            env: self.settings.env.clone(),
            capture_stdout: true,
            capture_stderr: false,
        };

        tracing::info!("Running coverage command: {}", command);
        let result = execute(command, &options)?;
        tracing::debug!(
            "Coverage command exited with {:?} after {:?}",
            result.exit_code,
            result.duration
        );

        if !result.success {
            return Err(CovgateError::TestRunFailed {
                command: command.clone(),
                code: result.exit_code,
            });
        }

        let report = match &self.settings.output {
            Some(output) => CoverageReport::load(&self.project_root.join(output))?,
            None => CoverageReport::from_command_output(&result.stdout)?,
        };
        tracing::debug!("Coverage report has {} file record(s)", report.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    const EXPORT: &str = concat!(
        r#"{"data":[{"files":[{"filename":"/w/src/lib.rs","#,
        r#""summary":{"lines":{"count":4,"covered":3}}}]}]}"#
    );

    fn settings(command: &str) -> CoverageSettings {
        CoverageSettings {
            command: command.to_string(),
            output: None,
            requires: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    #[test]
    fn report_source_from_arg() {
        assert_eq!(ReportSource::from_arg(None), ReportSource::Command);
        let source = ReportSource::from_arg(Some(Path::new("cov.json")));
        assert_eq!(source, ReportSource::File(PathBuf::from("cov.json")));
        assert!(!source.runs_tests());
    }

    #[test]
    fn reads_report_file_relative_to_project_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("cov.json"), EXPORT).unwrap();
        let producer = CoverageProducer::new(temp.path(), settings("exit 1"));

        let report = producer
            .produce(&ReportSource::File(PathBuf::from("cov.json")))
            .unwrap();
        assert_eq!(report.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn reads_report_from_command_stdout() {
        let temp = TempDir::new().unwrap();
        let command = format!("echo 'Finished test profile'; echo '{}'", EXPORT);
        let producer = CoverageProducer::new(temp.path(), settings(&command));

        let report = producer.produce(&ReportSource::Command).unwrap();
        assert_eq!(report.files()[0].lines_covered, 3);
    }

    #[cfg(unix)]
    #[test]
    fn reads_report_from_output_file() {
        let temp = TempDir::new().unwrap();
        let mut settings = settings(&format!("echo '{}' > out.json", EXPORT));
        settings.output = Some(PathBuf::from("out.json"));
        let producer = CoverageProducer::new(temp.path(), settings);

        let report = producer.produce(&ReportSource::Command).unwrap();
        assert_eq!(report.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn failing_tests_abort_before_evaluation() {
        let temp = TempDir::new().unwrap();
        let command = format!("echo '{}'; exit 101", EXPORT);
        let producer = CoverageProducer::new(temp.path(), settings(&command));

        let err = producer.produce(&ReportSource::Command).unwrap_err();
        match err {
            CovgateError::TestRunFailed { code, .. } => assert_eq!(code, Some(101)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_env_is_passed_through() {
        let temp = TempDir::new().unwrap();
        let mut settings = settings(r#"printf '%s' "$COVGATE_EXPORT""#);
        settings
            .env
            .insert("COVGATE_EXPORT".to_string(), EXPORT.to_string());
        let producer = CoverageProducer::new(temp.path(), settings);

        let report = producer.produce(&ReportSource::Command).unwrap();
        assert_eq!(report.files()[0].path, "/w/src/lib.rs");
    }

    #[test]
    fn missing_requirement_fails_before_running() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("ran");
        let mut settings = settings(&format!("touch {}", marker.display()));
        settings.requires = vec!["cargo-llvm-cov".to_string()];
        let checker = RequirementChecker::with_path(vec![temp.path().to_path_buf()]);
        let producer = CoverageProducer::new(temp.path(), settings).with_checker(checker);

        let err = producer.produce(&ReportSource::Command).unwrap_err();
        match err {
            CovgateError::RequirementMissing { requirement, hint } => {
                assert_eq!(requirement, "cargo-llvm-cov");
                assert_eq!(hint, "cargo install cargo-llvm-cov");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!marker.exists());
    }

    #[test]
    fn file_source_skips_preflight() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("cov.json"), EXPORT).unwrap();
        let mut settings = settings("exit 1");
        settings.requires = vec!["definitely-not-installed".to_string()];
        let producer = CoverageProducer::new(temp.path(), settings)
            .with_checker(RequirementChecker::with_path(Vec::new()));

        assert!(producer
            .produce(&ReportSource::File(PathBuf::from("cov.json")))
            .is_ok());
    }
}
