//! Human-readable output formatter.
//!
//! One line per module: status icon, display name, numeric detail. A
//! summary line follows.

use std::io::Write;

use super::{ModuleListing, ReportFormatter};
use crate::gate::{GateOutcome, GateRun, NoDataReason, RatchetOutcome, RatchetRun, ThresholdSource};
use crate::threshold::Threshold;
use crate::ui::{CovgateTheme, StatusKind};

/// Formats reports for terminal display with optional color support.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
    theme: CovgateTheme,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            theme: CovgateTheme::for_colors(use_color),
        }
    }

    fn icon(&self, kind: StatusKind) -> String {
        if self.use_color {
            kind.styled(&self.theme)
        } else {
            kind.icon().to_string()
        }
    }

    fn gate_detail(outcome: &GateOutcome, source: Option<ThresholdSource>) -> String {
        let origin = match source {
            Some(ThresholdSource::Default) => ", default",
            _ => "",
        };
        match outcome {
            GateOutcome::Pass { observed, required } => {
                format!("{}% (required {}%{})", observed, required, origin)
            }
            GateOutcome::Fail { observed, required } => {
                format!("{}% below required {}%{}", observed, required, origin)
            }
            GateOutcome::Skipped => "skipped (threshold 0)".to_string(),
            GateOutcome::NoData {
                reason: NoDataReason::NoFiles,
            } => "no data: no files matched".to_string(),
            GateOutcome::NoData {
                reason: NoDataReason::NoThreshold,
            } => "no data: no threshold declared".to_string(),
        }
    }

    fn ratchet_detail(outcome: &RatchetOutcome, dry_run: bool) -> String {
        let (created, raised) = if dry_run {
            ("would create", "would raise")
        } else {
            ("created", "raised")
        };
        match outcome {
            RatchetOutcome::Created { observed } => format!("{} at {}%", created, observed),
            RatchetOutcome::Raised { from, to } => format!("{} {}% -> {}%", raised, from, to),
            RatchetOutcome::Unchanged { stored, observed } => {
                format!("unchanged at {}% (observed {}%)", stored, observed)
            }
            RatchetOutcome::Skipped => "skipped (threshold 0)".to_string(),
        }
    }

    fn threshold_detail(threshold: Option<&Threshold>) -> String {
        match threshold {
            None => "no threshold".to_string(),
            Some(Threshold::OptOut) => "0 (opted out)".to_string(),
            Some(t) => format!("{}%", t),
        }
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}

impl ReportFormatter for HumanFormatter {
    fn format_gate<W: Write>(&self, run: &GateRun, writer: &mut W) -> std::io::Result<()> {
        let width = name_width(run.verdicts.iter().map(|v| v.module.display_name.as_str()));

        for verdict in &run.verdicts {
            writeln!(
                writer,
                "{} {:<width$}  {}",
                self.icon(StatusKind::from(&verdict.outcome)),
                verdict.module.display_name,
                Self::gate_detail(&verdict.outcome, verdict.source),
                width = width
            )?;
        }

        let counts = run.counts();
        let verdict = if run.passed() { "passed" } else { "failed" };
        if !run.verdicts.is_empty() {
            writeln!(writer)?;
        }
        writeln!(
            writer,
            "Coverage gate {}: {} passed, {} failed, {} skipped, {} no data",
            verdict, counts.passed, counts.failed, counts.skipped, counts.no_data
        )?;
        Ok(())
    }

    fn format_ratchet<W: Write>(&self, run: &RatchetRun, writer: &mut W) -> std::io::Result<()> {
        let width = name_width(run.entries.iter().map(|e| e.module.display_name.as_str()));

        for entry in &run.entries {
            writeln!(
                writer,
                "{} {:<width$}  {}",
                self.icon(StatusKind::from(&entry.outcome)),
                entry.module.display_name,
                Self::ratchet_detail(&entry.outcome, run.dry_run),
                width = width
            )?;
        }

        let counts = run.counts();
        if !run.entries.is_empty() {
            writeln!(writer)?;
        }
        let title = if run.dry_run {
            "Ratchet dry run (nothing written)"
        } else {
            "Ratchet complete"
        };
        writeln!(
            writer,
            "{}: {} created, {} raised, {} unchanged, {} skipped",
            title, counts.created, counts.raised, counts.unchanged, counts.skipped
        )?;
        Ok(())
    }

    fn format_modules<W: Write>(
        &self,
        modules: &[ModuleListing],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let width = name_width(modules.iter().map(|m| m.module.display_name.as_str()));

        for listing in modules {
            writeln!(
                writer,
                "{:<width$}  {:<14}  {}",
                listing.module.display_name,
                Self::threshold_detail(listing.threshold.as_ref()),
                self.theme.dim.apply_to(listing.module.directory.display()),
                width = width
            )?;
        }
        writeln!(writer, "{} module(s)", modules.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageReport, FileCoverage, Percent};
    use crate::gate::{GateEvaluator, ModuleRatchet, ModuleVerdict};
    use crate::modules::{assign, discover, DiscoveryPolicy, Module};
    use crate::threshold::MemoryThresholdStore;
    use std::path::Path;

    fn file(path: &str, total: u64, covered: u64) -> FileCoverage {
        FileCoverage {
            path: path.to_string(),
            lines_total: total,
            lines_covered: covered,
        }
    }

    fn format_gate(run: &GateRun) -> String {
        let mut out = Vec::new();
        HumanFormatter::new(false).format_gate(run, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn format_ratchet(run: &RatchetRun) -> String {
        let mut out = Vec::new();
        HumanFormatter::new(false)
            .format_ratchet(run, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn gate_lines_carry_icon_name_and_values() {
        let store = MemoryThresholdStore::new()
            .with_marker("foo", "50")
            .with_marker("bar", "90")
            .with_marker("off", "0");
        let modules = discover(Path::new("/w/src"), DiscoveryPolicy::Marker, &store).unwrap();
        let report = CoverageReport::new(vec![
            file("/w/src/foo/a.rs", 10, 5),
            file("/w/src/foo/b.rs", 10, 6),
            file("/w/src/bar/a.rs", 10, 6),
        ]);
        let assigned = assign(modules, &report);
        let run = GateEvaluator::new(&store, None).run(&assigned).unwrap();

        let output = format_gate(&run);
        assert!(output.contains("⚠ (root)  no data: no threshold declared"));
        assert!(output.contains("✗ bar     60.00% below required 90%"));
        assert!(output.contains("✓ foo     55.00% (required 50%)"));
        assert!(output.contains("○ off     skipped (threshold 0)"));
        let summary = "Coverage gate failed: 1 passed, 1 failed, 1 skipped, 1 no data\n";
        assert!(output.ends_with(summary));
    }

    #[test]
    fn gate_marks_default_thresholds() {
        let run = GateRun {
            verdicts: vec![ModuleVerdict {
                module: Module::root(Path::new("/w/src")),
                file_count: 1,
                source: Some(ThresholdSource::Default),
                outcome: GateOutcome::Fail {
                    observed: Percent::from_counts(7999, 10000),
                    required: Threshold::from_default(80.0),
                },
            }],
        };

        let output = format_gate(&run);
        assert!(output.contains("79.99% below required 80%, default"));
    }

    #[test]
    fn ratchet_lines_show_old_and_new_values() {
        let run = RatchetRun {
            entries: vec![
                ModuleRatchet {
                    module: Module::declared(Path::new("/w/src"), "foo"),
                    file_count: 2,
                    observed: Percent::from_counts(11, 20),
                    outcome: RatchetOutcome::Raised {
                        from: Threshold::parse_value("50").unwrap(),
                        to: Percent::from_counts(11, 20),
                    },
                },
                ModuleRatchet {
                    module: Module::declared(Path::new("/w/src"), "new"),
                    file_count: 1,
                    observed: Percent::from_counts(2, 3),
                    outcome: RatchetOutcome::Created {
                        observed: Percent::from_counts(2, 3),
                    },
                },
            ],
            dry_run: false,
        };

        let output = format_ratchet(&run);
        assert!(output.contains("↑ foo  raised 50% -> 55.00%"));
        assert!(output.contains("+ new  created at 66.66%"));
        assert!(output.contains("Ratchet complete: 1 created, 1 raised, 0 unchanged, 0 skipped"));
    }

    #[test]
    fn ratchet_dry_run_wording() {
        let run = RatchetRun {
            entries: vec![ModuleRatchet {
                module: Module::root(Path::new("/w/src")),
                file_count: 0,
                observed: Percent::ZERO,
                outcome: RatchetOutcome::Created {
                    observed: Percent::ZERO,
                },
            }],
            dry_run: true,
        };

        let output = format_ratchet(&run);
        assert!(output.contains("would create at 0.00%"));
        assert!(output.contains("Ratchet dry run (nothing written)"));
    }

    #[test]
    fn modules_listing_shows_thresholds() {
        let root = Path::new("/w/src");
        let listings = vec![
            ModuleListing {
                module: Module::root(root),
                threshold: None,
            },
            ModuleListing {
                module: Module::declared(root, "off"),
                threshold: Some(Threshold::OptOut),
            },
            ModuleListing {
                module: Module::declared(root, "storage"),
                threshold: Threshold::parse_value("72.5"),
            },
        ];

        let mut out = Vec::new();
        HumanFormatter::new(false)
            .format_modules(&listings, &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("(root)   no threshold"));
        assert!(output.contains("off      0 (opted out)"));
        assert!(output.contains("storage  72.5%"));
        assert!(output.contains("3 module(s)"));
    }
}
