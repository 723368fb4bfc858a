//! Ratchet command implementation.
//!
//! `covgate ratchet` runs the instrumented tests once and raises each
//! module's stored threshold to its observed coverage. Thresholds never go
//! down. Markers are written under the threshold lock.

use crate::cli::args::RatchetArgs;
use crate::coverage::ReportSource;
use crate::error::Result;
use crate::gate::Ratchet;
use crate::modules::assign;
use crate::report::{render_ratchet, ReportFormat};
use crate::threshold::ThresholdLock;
use crate::ui::{hints, should_use_colors, UserInterface};

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};

/// The ratchet command implementation.
pub struct RatchetCommand {
    ctx: ProjectContext,
    args: RatchetArgs,
}

impl RatchetCommand {
    /// Create a new ratchet command.
    pub fn new(ctx: ProjectContext, args: RatchetArgs) -> Self {
        Self { ctx, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RatchetArgs {
        &self.args
    }
}

impl Command for RatchetCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let human = self.args.format == ReportFormat::Human;
        if human {
            ui.show_header("covgate ratchet");
        }

        let source_root = self.ctx.require_source_root()?;

        let source = ReportSource::from_arg(self.args.report.as_deref());
        let Some(report) = self.ctx.produce_report(&source, ui, human)? else {
            return Ok(CommandResult::failure(1));
        };

        let _lock = if self.args.dry_run {
            None
        } else {
            Some(ThresholdLock::acquire(&source_root)?)
        };

        let mut store = self.ctx.store();
        let modules = self.ctx.modules(&store)?;
        let assigned = assign(modules, &report);
        let run = Ratchet::new(&mut store)
            .dry_run(self.args.dry_run)
            .run(&assigned)?;

        let use_color = ui.is_interactive() && should_use_colors();
        let output = render_ratchet(self.args.format, use_color, &run);
        ui.message(output.trim_end());

        let counts = run.counts();
        tracing::info!(
            "Ratchet: {} created, {} raised, {} unchanged, {} skipped",
            counts.created,
            counts.raised,
            counts.unchanged,
            counts.skipped
        );

        if human && counts.created + counts.raised > 0 {
            if run.dry_run {
                ui.show_hint(hints::after_dry_run());
            } else {
                ui.show_hint(hints::after_ratchet_writes());
            }
        }

        Ok(CommandResult::success())
    }
}
