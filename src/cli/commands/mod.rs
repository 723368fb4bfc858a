//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. The coverage commands share a
//! [`ProjectContext`] holding the effective configuration.

pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod gate;
pub mod modules;
pub mod ratchet;

pub use context::ProjectContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
