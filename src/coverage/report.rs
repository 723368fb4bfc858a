//! Structured coverage report parsing.
//!
//! Reads the llvm-cov JSON export shape:
//!
//! ```json
//! { "data": [ { "files": [
//!     { "filename": "/abs/src/lib.rs",
//!       "summary": { "lines": { "count": 10, "covered": 7 } } }
//! ] } ] }
//! ```
//!
//! Only `data[0]` is read. Unknown fields are ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CovgateError, Result};

/// Line counts for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    /// Absolute, slash-separated path.
    pub path: String,
    /// Countable lines.
    pub lines_total: u64,
    /// Lines hit at least once.
    pub lines_covered: u64,
}

/// Per-file coverage for one instrumented run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    files: Vec<FileCoverage>,
}

#[derive(Deserialize)]
struct RawExport {
    data: Vec<RawData>,
}

#[derive(Deserialize)]
struct RawData {
    #[serde(default)]
    files: Vec<RawFile>,
}

#[derive(Deserialize)]
struct RawFile {
    filename: String,
    summary: RawSummary,
}

#[derive(Deserialize)]
struct RawSummary {
    lines: RawLines,
}

#[derive(Deserialize)]
struct RawLines {
    count: u64,
    covered: u64,
}

impl CoverageReport {
    /// Build a report from already-collected records.
    pub fn new(files: Vec<FileCoverage>) -> Self {
        Self { files }
    }

    /// Parse a JSON export.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawExport =
            serde_json::from_str(json).map_err(|e| CovgateError::MalformedReport {
                message: e.to_string(),
            })?;

        let data = raw
            .data
            .into_iter()
            .next()
            .ok_or_else(|| CovgateError::MalformedReport {
                message: "report has no data entries".to_string(),
            })?;

        let files = data
            .files
            .into_iter()
            .map(|f| FileCoverage {
                path: f.filename.replace('\\', "/"),
                lines_total: f.summary.lines.count,
                lines_covered: f.summary.lines.covered,
            })
            .collect();

        Ok(Self { files })
    }

    /// Parse a JSON export embedded in command output.
    ///
    /// Anything before the first line that opens a JSON object is dropped;
    /// some runners print a banner to stdout before the export.
    pub fn from_command_output(stdout: &str) -> Result<Self> {
        let trimmed = stdout.trim_start();
        let start = if trimmed.starts_with('{') {
            Some(stdout.len() - trimmed.len())
        } else {
            stdout.find("\n{").map(|i| i + 1)
        }
        .ok_or_else(|| CovgateError::MalformedReport {
            message: "no JSON object found in coverage command output".to_string(),
        })?;

        Self::from_json(&stdout[start..])
    }

    /// Read and parse a report file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        tracing::debug!("Read coverage report from {}", path.display());
        Self::from_json(&content)
    }

    /// All file records in report order.
    pub fn files(&self) -> &[FileCoverage] {
        &self.files
    }

    /// Number of file records.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the report has no file records.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
