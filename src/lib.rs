//! covgate - Per-module coverage gating and threshold ratcheting.
//!
//! covgate runs a project's instrumented tests, splits the resulting line
//! coverage into modules beneath a source root, and compares each module
//! against the threshold stored in its `.covgate` marker. The `ratchet`
//! command raises those markers to the observed coverage so thresholds
//! only ever move up.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`coverage`] - Coverage reports, percentages, and report production
//! - [`error`] - Error types and result aliases
//! - [`gate`] - Gate evaluation and threshold ratcheting
//! - [`modules`] - Module discovery and file assignment
//! - [`report`] - Human and JSON rendering of results
//! - [`requirements`] - Tool availability checks
//! - [`shell`] - Shell command execution
//! - [`threshold`] - Marker files, threshold values, and the ratchet lock
//! - [`ui`] - Spinners, hints, and terminal output
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use covgate::coverage::{CoverageReport, FileCoverage};
//! use covgate::gate::GateEvaluator;
//! use covgate::modules::{assign, discover, DiscoveryPolicy};
//! use covgate::threshold::MemoryThresholdStore;
//!
//! let store = MemoryThresholdStore::new().with_marker("foo", "50");
//! let root = Path::new("/w/agent/src");
//! let modules = discover(root, DiscoveryPolicy::Marker, &store).unwrap();
//! let report = CoverageReport::new(vec![
//!     FileCoverage { path: "/w/agent/src/foo/a.rs".into(), lines_total: 10, lines_covered: 5 },
//!     FileCoverage { path: "/w/agent/src/foo/b.rs".into(), lines_total: 10, lines_covered: 6 },
//! ]);
//!
//! let run = GateEvaluator::new(&store, None).run(&assign(modules, &report)).unwrap();
//! assert!(run.passed());
//! ```

pub mod cli;
pub mod config;
pub mod coverage;
pub mod error;
pub mod gate;
pub mod modules;
pub mod report;
pub mod requirements;
pub mod shell;
pub mod threshold;
pub mod ui;

pub use error::{CovgateError, Result};
