//! Threshold ratcheting.
//!
//! Stored thresholds only move up. A missing marker is created from the
//! observed coverage, a `0` marker is never touched, and an existing
//! threshold is overwritten only when observed coverage is strictly higher.

use crate::coverage::Percent;
use crate::error::Result;
use crate::modules::{Module, ModuleFiles};
use crate::threshold::{Threshold, ThresholdStore};

/// Result of ratcheting one module.
#[derive(Debug, Clone, PartialEq)]
pub enum RatchetOutcome {
    /// No marker existed; one was written with the observed value.
    Created { observed: Percent },
    /// Observed coverage beat the stored threshold and replaced it.
    Raised { from: Threshold, to: Percent },
    /// Stored threshold is at or above observed coverage.
    Unchanged {
        stored: Threshold,
        observed: Percent,
    },
    /// The `0` opt-out; left alone.
    Skipped,
}

impl RatchetOutcome {
    /// Whether this outcome writes the marker.
    pub fn writes(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Raised { .. })
    }

    /// The value to persist, if any.
    pub fn new_threshold(&self) -> Option<Threshold> {
        match self {
            Self::Created { observed } => Some(Threshold::from_percent(*observed)),
            Self::Raised { to, .. } => Some(Threshold::from_percent(*to)),
            Self::Unchanged { .. } | Self::Skipped => None,
        }
    }
}

/// Decide what to do with one module's marker.
pub fn decide(stored: Option<Threshold>, observed: Percent) -> RatchetOutcome {
    match stored {
        None => RatchetOutcome::Created { observed },
        Some(Threshold::OptOut) => RatchetOutcome::Skipped,
        Some(stored @ Threshold::Required { .. }) => {
            let current = stored.value().unwrap_or(0.0);
            if observed.as_f64() > current {
                RatchetOutcome::Raised {
                    from: stored,
                    to: observed,
                }
            } else {
                RatchetOutcome::Unchanged { stored, observed }
            }
        }
    }
}

/// Ratchet result for one module.
#[derive(Debug, Clone)]
pub struct ModuleRatchet {
    /// The module.
    pub module: Module,
    /// Number of report records attributed to it.
    pub file_count: usize,
    /// Observed coverage; `0.00` when the module has no records.
    pub observed: Percent,
    /// What happened to the marker.
    pub outcome: RatchetOutcome,
}

/// Ratchet results for a whole run, in module order.
#[derive(Debug, Clone, Default)]
pub struct RatchetRun {
    /// One entry per module.
    pub entries: Vec<ModuleRatchet>,
    /// Whether markers were left untouched.
    pub dry_run: bool,
}

/// Outcome counts for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatchetCounts {
    pub created: usize,
    pub raised: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl RatchetRun {
    /// Count outcomes by kind.
    pub fn counts(&self) -> RatchetCounts {
        let mut counts = RatchetCounts::default();
        for entry in &self.entries {
            match entry.outcome {
                RatchetOutcome::Created { .. } => counts.created += 1,
                RatchetOutcome::Raised { .. } => counts.raised += 1,
                RatchetOutcome::Unchanged { .. } => counts.unchanged += 1,
                RatchetOutcome::Skipped => counts.skipped += 1,
            }
        }
        counts
    }
}

/// Raises stored thresholds to observed coverage.
pub struct Ratchet<'s> {
    store: &'s mut dyn ThresholdStore,
    dry_run: bool,
}

impl<'s> Ratchet<'s> {
    /// Create a ratchet writing through `store`.
    pub fn new(store: &'s mut dyn ThresholdStore) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Compute outcomes without saving.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Ratchet every module.
    pub fn run(&mut self, assigned: &[ModuleFiles<'_>]) -> Result<RatchetRun> {
        let mut entries = Vec::with_capacity(assigned.len());

        for entry in assigned {
            let key = &entry.module.key;
            let observed = Percent::aggregate(entry.files.iter().copied());
            let observed = observed.unwrap_or(Percent::ZERO);
            let outcome = decide(self.store.load(key)?, observed);

            if let Some(threshold) = outcome.new_threshold() {
                if self.dry_run {
                    tracing::debug!(
                        "Dry run: would write {} for {}",
                        threshold,
                        entry.module.display_name
                    );
                } else {
                    self.store.save(key, &threshold)?;
                }
            }

            entries.push(ModuleRatchet {
                module: entry.module.clone(),
                file_count: entry.files.len(),
                observed,
                outcome,
            });
        }

        Ok(RatchetRun {
            entries,
            dry_run: self.dry_run,
        })
    }
}
