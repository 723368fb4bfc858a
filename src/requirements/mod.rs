//! Pre-flight requirement checks.
//!
//! Before the instrumented test run starts, every tool the coverage command
//! depends on must be resolvable on `PATH`. A missing tool is reported as a
//! typed [`CovgateError::RequirementMissing`](crate::error::CovgateError)
//! with an install hint; nothing is installed automatically.
//!
//! # Modules
//!
//! - [`probe`] - PATH parsing and executable lookup
//! - [`checker`] - Requirement checking against the probed PATH

pub mod checker;
pub mod probe;

pub use checker::{install_hint, RequirementChecker, RequirementStatus};
pub use probe::{is_executable, parse_system_path, resolve_tool_path};
