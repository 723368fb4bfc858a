//! Gate evaluation.
//!
//! Each module is compared against its threshold independently and every
//! module is reported; only `Fail` outcomes fail the run.

use crate::coverage::{FileCoverage, Percent};
use crate::error::Result;
use crate::modules::{Module, ModuleFiles};
use crate::threshold::{Threshold, ThresholdStore};

/// Why a module produced no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    /// The module prefix matched no report records.
    NoFiles,
    /// No marker and no default threshold.
    NoThreshold,
}

/// Where a module's threshold came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSource {
    /// The module's `.covgate` marker.
    Marker,
    /// The caller-supplied default.
    Default,
}

/// Result of gating one module.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Observed coverage meets the threshold.
    Pass {
        observed: Percent,
        required: Threshold,
    },
    /// Observed coverage is below the threshold.
    Fail {
        observed: Percent,
        required: Threshold,
    },
    /// Threshold is the `0` opt-out; nothing was aggregated.
    Skipped,
    /// Nothing to evaluate. A warning, never a failure.
    NoData { reason: NoDataReason },
}

impl GateOutcome {
    /// Whether this outcome fails the run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Evaluate one module's records against a threshold.
pub fn evaluate(threshold: Option<&Threshold>, files: &[&FileCoverage]) -> GateOutcome {
    let required = match threshold {
        None => {
            return GateOutcome::NoData {
                reason: NoDataReason::NoThreshold,
            }
        }
        Some(Threshold::OptOut) => return GateOutcome::Skipped,
        Some(t @ Threshold::Required { .. }) => t.clone(),
    };

    let Some(observed) = Percent::aggregate(files.iter().copied()) else {
        return GateOutcome::NoData {
            reason: NoDataReason::NoFiles,
        };
    };

    let value = required.value().unwrap_or(0.0);
    if observed.as_f64() >= value {
        GateOutcome::Pass { observed, required }
    } else {
        GateOutcome::Fail { observed, required }
    }
}

/// Gate verdict for one module.
#[derive(Debug, Clone)]
pub struct ModuleVerdict {
    /// The module.
    pub module: Module,
    /// Number of report records attributed to it.
    pub file_count: usize,
    /// Threshold origin; `None` when no threshold applied.
    pub source: Option<ThresholdSource>,
    /// The verdict.
    pub outcome: GateOutcome,
}

/// Verdicts for a whole run, in module order.
#[derive(Debug, Clone, Default)]
pub struct GateRun {
    /// One entry per module.
    pub verdicts: Vec<ModuleVerdict>,
}

/// Outcome counts for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub no_data: usize,
}

impl GateRun {
    /// False iff any module failed.
    pub fn passed(&self) -> bool {
        !self.verdicts.iter().any(|v| v.outcome.is_failure())
    }

    /// Count outcomes by kind.
    pub fn counts(&self) -> GateCounts {
        let mut counts = GateCounts::default();
        for verdict in &self.verdicts {
            match verdict.outcome {
                GateOutcome::Pass { .. } => counts.passed += 1,
                GateOutcome::Fail { .. } => counts.failed += 1,
                GateOutcome::Skipped => counts.skipped += 1,
                GateOutcome::NoData { .. } => counts.no_data += 1,
            }
        }
        counts
    }
}

/// Evaluates modules against stored or default thresholds. Never writes.
pub struct GateEvaluator<'s> {
    store: &'s dyn ThresholdStore,
    default_threshold: Option<Threshold>,
}

impl<'s> GateEvaluator<'s> {
    /// Create an evaluator; `default_threshold` applies to modules without a marker.
    pub fn new(store: &'s dyn ThresholdStore, default_threshold: Option<f64>) -> Self {
        Self {
            store,
            default_threshold: default_threshold.map(Threshold::from_default),
        }
    }

    /// Evaluate every module. Fails only on unreadable thresholds.
    pub fn run(&self, assigned: &[ModuleFiles<'_>]) -> Result<GateRun> {
        let mut verdicts = Vec::with_capacity(assigned.len());

        for entry in assigned {
            let (threshold, source) = match self.store.load(&entry.module.key)? {
                Some(t) => (Some(t), Some(ThresholdSource::Marker)),
                None => match &self.default_threshold {
                    Some(d) => (Some(d.clone()), Some(ThresholdSource::Default)),
                    None => (None, None),
                },
            };

            let outcome = evaluate(threshold.as_ref(), &entry.files);
            match &outcome {
                GateOutcome::NoData { reason } => tracing::warn!(
                    "Module {} has no data ({:?})",
                    entry.module.display_name,
                    reason
                ),
                other => tracing::debug!("Module {}: {:?}", entry.module.display_name, other),
            }

            verdicts.push(ModuleVerdict {
                module: entry.module.clone(),
                file_count: entry.files.len(),
                source,
                outcome,
            });
        }

        Ok(GateRun { verdicts })
    }
}
