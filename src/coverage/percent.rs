//! Aggregate coverage percentage.
//!
//! Percentages are held as integer hundredths so truncation is exact:
//! `2 of 3` lines is `66.66`, never `66.67`, and `29 of 100` is `29.00`
//! (float math would floor `0.29 * 10000` to `2899`).

use std::fmt;

use serde::{Serialize, Serializer};

use super::FileCoverage;

/// A coverage percentage truncated to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u32);

impl Percent {
    /// Zero percent.
    pub const ZERO: Percent = Percent(0);

    /// Compute `floor(covered / total * 10000) / 100`.
    ///
    /// A `total` of zero yields `0.00`.
    pub fn from_counts(covered: u64, total: u64) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let covered = covered.min(total) as u128;
        let hundredths = covered * 10_000 / total as u128;
        Self(hundredths as u32)
    }

    /// Aggregate a set of file records.
    ///
    /// Returns `None` when the set is empty ("no files"), which is distinct
    /// from a set whose line total is zero.
    pub fn aggregate<'a, I>(files: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FileCoverage>,
    {
        let mut seen = false;
        let mut covered = 0u64;
        let mut total = 0u64;
        for file in files {
            seen = true;
            covered = covered.saturating_add(file.lines_covered);
            total = total.saturating_add(file.lines_total);
        }
        seen.then(|| Self::from_counts(covered, total))
    }

    /// Hundredths of a percent (`5500` for `55.00`).
    pub fn hundredths(self) -> u32 {
        self.0
    }

    /// The percentage as a float, for comparison against thresholds.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
