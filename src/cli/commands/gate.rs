//! Gate command implementation.
//!
//! `covgate gate [DEFAULT]` runs the instrumented tests once, evaluates
//! every module, prints every verdict, and exits non-zero if any module is
//! below its threshold.

use crate::cli::args::GateArgs;
use crate::coverage::ReportSource;
use crate::error::Result;
use crate::gate::{GateEvaluator, GateOutcome, NoDataReason};
use crate::modules::assign;
use crate::report::{render_gate, ReportFormat};
use crate::ui::{hints, should_use_colors, UserInterface};

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};

/// The gate command implementation.
pub struct GateCommand {
    ctx: ProjectContext,
    args: GateArgs,
}

impl GateCommand {
    /// Create a new gate command.
    pub fn new(ctx: ProjectContext, args: GateArgs) -> Self {
        Self { ctx, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &GateArgs {
        &self.args
    }
}

impl Command for GateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let human = self.args.format == ReportFormat::Human;
        if human {
            ui.show_header("covgate gate");
        }
        self.ctx.require_source_root()?;

        let source = ReportSource::from_arg(self.args.report.as_deref());
        let Some(report) = self.ctx.produce_report(&source, ui, human)? else {
            return Ok(CommandResult::failure(1));
        };

        let store = self.ctx.store();
        let modules = self.ctx.modules(&store)?;
        let assigned = assign(modules, &report);

        let default_threshold = self
            .args
            .default_threshold
            .or(self.ctx.config().default_threshold);
        let run = GateEvaluator::new(&store, default_threshold).run(&assigned)?;

        let use_color = ui.is_interactive() && should_use_colors();
        let output = render_gate(self.args.format, use_color, &run);
        ui.message(output.trim_end());

        let counts = run.counts();
        tracing::info!(
            "Gate: {} passed, {} failed, {} skipped, {} no data",
            counts.passed,
            counts.failed,
            counts.skipped,
            counts.no_data
        );

        if human {
            let failed: Vec<String> = run
                .verdicts
                .iter()
                .filter(|v| v.outcome.is_failure())
                .map(|v| v.module.display_name.clone())
                .collect();
            if !failed.is_empty() {
                ui.show_hint(&hints::after_failed_gate(&failed));
            }
            let undeclared = run.verdicts.iter().any(|v| {
                v.outcome
                    == GateOutcome::NoData {
                        reason: NoDataReason::NoThreshold,
                    }
            });
            if undeclared {
                ui.show_hint(hints::no_threshold_declared());
            }
        }

        if run.passed() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
