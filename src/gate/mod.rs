//! Gate evaluation and threshold ratcheting over resolved modules.
//!
//! Both consume the same [`ModuleFiles`](crate::modules::ModuleFiles) list
//! built from a single coverage report.

pub mod evaluator;
pub mod ratchet;

pub use evaluator::{
    evaluate, GateCounts, GateEvaluator, GateOutcome, GateRun, ModuleVerdict, NoDataReason,
    ThresholdSource,
};
pub use ratchet::{decide, ModuleRatchet, Ratchet, RatchetCounts, RatchetOutcome, RatchetRun};
