//! Modules command implementation.
//!
//! `covgate modules` shows what the gate would evaluate: every resolved
//! module with its stored threshold. No tests are run.

use crate::cli::args::ModulesArgs;
use crate::error::Result;
use crate::report::{render_modules, ModuleListing};
use crate::threshold::ThresholdStore;
use crate::ui::{should_use_colors, UserInterface};

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};

/// The modules command implementation.
pub struct ModulesCommand {
    ctx: ProjectContext,
    args: ModulesArgs,
}

impl ModulesCommand {
    /// Create a new modules command.
    pub fn new(ctx: ProjectContext, args: ModulesArgs) -> Self {
        Self { ctx, args }
    }

    /// Resolve modules and read their thresholds.
    pub fn listings(&self) -> Result<Vec<ModuleListing>> {
        self.ctx.require_source_root()?;
        let store = self.ctx.store();
        self.ctx
            .modules(&store)?
            .into_iter()
            .map(|module| {
                let threshold = store.load(&module.key)?;
                Ok(ModuleListing { module, threshold })
            })
            .collect()
    }
}

impl Command for ModulesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let listings = self.listings()?;
        let use_color = ui.is_interactive() && should_use_colors();
        let output = render_modules(self.args.format, use_color, &listings);
        ui.message(output.trim_end());
        Ok(CommandResult::success())
    }
}
