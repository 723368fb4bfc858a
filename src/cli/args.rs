//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::modules::DiscoveryPolicy;
use crate::report::ReportFormat;

/// covgate - Per-module coverage gating and threshold ratcheting.
#[derive(Debug, Parser)]
#[command(name = "covgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default covgate.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides discovery from the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Directory beneath which modules are resolved
    #[arg(long, global = true, env = "COVGATE_SOURCE_ROOT", value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// How modules are discovered
    #[arg(long, global = true, env = "COVGATE_DISCOVERY", value_enum)]
    pub discovery: Option<DiscoveryPolicy>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config values set on the command line or through the environment.
    pub fn overrides(&self) -> Overrides {
        let default_threshold = match &self.command {
            Commands::Gate(args) => args.default_threshold,
            _ => None,
        };
        Overrides {
            source_root: self.source_root.clone(),
            discovery: self.discovery,
            default_threshold,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the instrumented tests and fail if any module is below its threshold
    Gate(GateArgs),

    /// Run the instrumented tests and raise stored thresholds to observed coverage
    Ratchet(RatchetArgs),

    /// List resolved modules and their stored thresholds
    Modules(ModulesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `gate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GateArgs {
    /// Threshold for modules without a .covgate marker (e.g. 80.0)
    #[arg(value_name = "DEFAULT_THRESHOLD", value_parser = parse_percentage)]
    pub default_threshold: Option<f64>,

    /// Read a pre-generated JSON report instead of running the tests
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub format: ReportFormat,
}

/// Arguments for the `ratchet` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RatchetArgs {
    /// Read a pre-generated JSON report instead of running the tests
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Show what would change without writing any marker
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub format: ReportFormat,
}

/// Arguments for the `modules` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ModulesArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub format: ReportFormat,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse a percentage in `[0, 100]`.
fn parse_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("'{}' is not a percentage between 0 and 100", s))
    }
}
