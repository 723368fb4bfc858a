//! Report formatters.
//!
//! Gate runs, ratchet runs, and module listings can be rendered for people
//! ([`HumanFormatter`]) or for tools ([`JsonFormatter`]).

pub mod human;
pub mod json;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::gate::{GateRun, RatchetRun};
use crate::modules::Module;
use crate::threshold::Threshold;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Status lines and a summary.
    #[default]
    Human,
    /// A single JSON document on stdout.
    Json,
}

/// A resolved module and its stored threshold, for `covgate modules`.
#[derive(Debug, Clone)]
pub struct ModuleListing {
    /// The module.
    pub module: Module,
    /// Its marker value, if any.
    pub threshold: Option<Threshold>,
}

/// Trait for formatting reports.
pub trait ReportFormatter {
    /// Format gate verdicts to the given writer.
    fn format_gate<W: Write>(&self, run: &GateRun, writer: &mut W) -> std::io::Result<()>;

    /// Format ratchet outcomes to the given writer.
    fn format_ratchet<W: Write>(&self, run: &RatchetRun, writer: &mut W) -> std::io::Result<()>;

    /// Format a module listing to the given writer.
    fn format_modules<W: Write>(
        &self,
        modules: &[ModuleListing],
        writer: &mut W,
    ) -> std::io::Result<()>;
}

fn into_string(output: Vec<u8>, result: std::io::Result<()>) -> String {
    if let Err(e) = result {
        tracing::warn!("Failed to format report: {}", e);
    }
    String::from_utf8(output).unwrap_or_default()
}

/// Render gate verdicts to a string.
pub fn render_gate(format: ReportFormat, use_color: bool, run: &GateRun) -> String {
    let mut output = Vec::new();
    let result = match format {
        ReportFormat::Human => HumanFormatter::new(use_color).format_gate(run, &mut output),
        ReportFormat::Json => JsonFormatter::new().format_gate(run, &mut output),
    };
    into_string(output, result)
}

/// Render ratchet outcomes to a string.
pub fn render_ratchet(format: ReportFormat, use_color: bool, run: &RatchetRun) -> String {
    let mut output = Vec::new();
    let result = match format {
        ReportFormat::Human => HumanFormatter::new(use_color).format_ratchet(run, &mut output),
        ReportFormat::Json => JsonFormatter::new().format_ratchet(run, &mut output),
    };
    into_string(output, result)
}

/// Render a module listing to a string.
pub fn render_modules(format: ReportFormat, use_color: bool, modules: &[ModuleListing]) -> String {
    let mut output = Vec::new();
    let result = match format {
        ReportFormat::Human => HumanFormatter::new(use_color).format_modules(modules, &mut output),
        ReportFormat::Json => JsonFormatter::new().format_modules(modules, &mut output),
    };
    into_string(output, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateRun;

    #[test]
    fn report_format_default_is_human() {
        assert_eq!(ReportFormat::default(), ReportFormat::Human);
    }

    #[test]
    fn render_gate_json_is_valid() {
        let output = render_gate(ReportFormat::Json, false, &GateRun::default());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["passed"], true);
    }

    #[test]
    fn render_gate_human_has_summary() {
        let output = render_gate(ReportFormat::Human, false, &GateRun::default());
        assert!(output.contains("Coverage gate passed"));
    }
}
