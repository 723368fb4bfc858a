//! JSON output formatter.
//!
//! Formats reports as machine-readable JSON for tooling integration.
//! Percentages are numbers; thresholds are strings exactly as stored.

use std::io::Write;

use serde::Serialize;

use super::{ModuleListing, ReportFormatter};
use crate::coverage::Percent;
use crate::gate::{
    GateCounts, GateOutcome, GateRun, NoDataReason, RatchetCounts, RatchetOutcome, RatchetRun,
    ThresholdSource,
};

/// Formats reports as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct GateOutput<'a> {
    passed: bool,
    modules: Vec<GateModule<'a>>,
    summary: GateSummary,
}

#[derive(Serialize)]
struct GateModule<'a> {
    module: &'a str,
    key: &'a str,
    files: usize,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

#[derive(Serialize)]
struct GateSummary {
    passed: usize,
    failed: usize,
    skipped: usize,
    no_data: usize,
}

impl From<GateCounts> for GateSummary {
    fn from(c: GateCounts) -> Self {
        Self {
            passed: c.passed,
            failed: c.failed,
            skipped: c.skipped,
            no_data: c.no_data,
        }
    }
}

#[derive(Serialize)]
struct RatchetOutput<'a> {
    dry_run: bool,
    modules: Vec<RatchetModule<'a>>,
    summary: RatchetSummary,
}

#[derive(Serialize)]
struct RatchetModule<'a> {
    module: &'a str,
    key: &'a str,
    files: usize,
    status: &'static str,
    observed: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<String>,
}

#[derive(Serialize)]
struct RatchetSummary {
    created: usize,
    raised: usize,
    unchanged: usize,
    skipped: usize,
}

impl From<RatchetCounts> for RatchetSummary {
    fn from(c: RatchetCounts) -> Self {
        Self {
            created: c.created,
            raised: c.raised,
            unchanged: c.unchanged,
            skipped: c.skipped,
        }
    }
}

#[derive(Serialize)]
struct ModulesOutput<'a> {
    modules: Vec<ModuleEntry<'a>>,
}

#[derive(Serialize)]
struct ModuleEntry<'a> {
    module: &'a str,
    key: &'a str,
    directory: String,
    threshold: Option<&'a str>,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }

    fn gate_module(verdict: &crate::gate::ModuleVerdict) -> GateModule<'_> {
        let mut entry = GateModule {
            module: &verdict.module.display_name,
            key: &verdict.module.key,
            files: verdict.file_count,
            status: "",
            observed: None,
            required: None,
            source: verdict.source.map(|s| match s {
                ThresholdSource::Marker => "marker",
                ThresholdSource::Default => "default",
            }),
            reason: None,
        };

        match &verdict.outcome {
            GateOutcome::Pass { observed, required } | GateOutcome::Fail { observed, required } => {
                entry.status = if verdict.outcome.is_failure() {
                    "fail"
                } else {
                    "pass"
                };
                entry.observed = Some(*observed);
                entry.required = Some(required.as_str());
            }
            GateOutcome::Skipped => entry.status = "skipped",
            GateOutcome::NoData { reason } => {
                entry.status = "no_data";
                entry.reason = Some(match reason {
                    NoDataReason::NoFiles => "no_files",
                    NoDataReason::NoThreshold => "no_threshold",
                });
            }
        }
        entry
    }

    fn ratchet_module(entry: &crate::gate::ModuleRatchet) -> RatchetModule<'_> {
        let (status, previous) = match &entry.outcome {
            RatchetOutcome::Created { .. } => ("created", None),
            RatchetOutcome::Raised { from, .. } => ("raised", Some(from.as_str())),
            RatchetOutcome::Unchanged { stored, .. } => ("unchanged", Some(stored.as_str())),
            RatchetOutcome::Skipped => ("skipped", None),
        };
        RatchetModule {
            module: &entry.module.display_name,
            key: &entry.module.key,
            files: entry.file_count,
            status,
            observed: entry.observed,
            previous,
            threshold: entry
                .outcome
                .new_threshold()
                .map(|t| t.as_str().to_string()),
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_gate<W: Write>(&self, run: &GateRun, writer: &mut W) -> std::io::Result<()> {
        let output = GateOutput {
            passed: run.passed(),
            modules: run.verdicts.iter().map(Self::gate_module).collect(),
            summary: run.counts().into(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }

    fn format_ratchet<W: Write>(&self, run: &RatchetRun, writer: &mut W) -> std::io::Result<()> {
        let output = RatchetOutput {
            dry_run: run.dry_run,
            modules: run.entries.iter().map(Self::ratchet_module).collect(),
            summary: run.counts().into(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }

    fn format_modules<W: Write>(
        &self,
        modules: &[ModuleListing],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let output = ModulesOutput {
            modules: modules
                .iter()
                .map(|m| ModuleEntry {
                    module: &m.module.display_name,
                    key: &m.module.key,
                    directory: m.module.directory.display().to_string(),
                    threshold: m.threshold.as_ref().map(|t| t.as_str()),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}
