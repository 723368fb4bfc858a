//! Coverage data: the structured report, aggregate percentages, and the
//! producer that runs the instrumented tests.
//!
//! - [`report`] - Typed parse of the JSON export
//! - [`percent`] - Truncated two-decimal aggregate percentages
//! - [`producer`] - Pre-flight checks and the single instrumented run

pub mod percent;
pub mod producer;
pub mod report;

pub use percent::Percent;
pub use producer::{CoverageProducer, ReportSource};
pub use report::{CoverageReport, FileCoverage};
