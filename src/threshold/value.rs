//! Threshold values as stored in `.covgate` markers.

use std::fmt;
use std::path::Path;

use crate::coverage::Percent;
use crate::error::{CovgateError, Result};

/// The marker string that turns gating off for a module.
pub const OPT_OUT: &str = "0";

/// A module's minimum coverage.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// Literal `0`: the module is never gated and never ratcheted.
    OptOut,
    /// Minimum percentage. `raw` is the text as written in the marker.
    Required { raw: String, value: f64 },
}

impl Threshold {
    /// Parse marker content. Only the first line counts; surrounding
    /// whitespace is stripped.
    ///
    /// `origin` names the marker in the error.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let raw = content.lines().next().unwrap_or("").trim();
        Self::parse_value(raw).ok_or_else(|| CovgateError::InvalidThreshold {
            path: origin.to_path_buf(),
            value: raw.to_string(),
        })
    }

    /// Parse a bare threshold string, `None` if it is not a percentage.
    pub fn parse_value(raw: &str) -> Option<Self> {
        if raw == OPT_OUT {
            return Some(Self::OptOut);
        }
        let value: f64 = raw.parse().ok()?;
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return None;
        }
        Some(Self::Required {
            raw: raw.to_string(),
            value,
        })
    }

    /// A required threshold equal to an observed percentage.
    pub fn from_percent(percent: Percent) -> Self {
        Self::Required {
            raw: percent.to_string(),
            value: percent.as_f64(),
        }
    }

    /// A threshold from a numeric default (e.g. `80.0`).
    ///
    /// A default of `0` opts unmarked modules out, like a `0` marker.
    pub fn from_default(value: f64) -> Self {
        if value == 0.0 {
            return Self::OptOut;
        }
        Self::Required {
            raw: value.to_string(),
            value,
        }
    }

    /// Whether this is the `0` opt-out.
    pub fn is_opt_out(&self) -> bool {
        matches!(self, Self::OptOut)
    }

    /// Numeric value; `None` for the opt-out.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::OptOut => None,
            Self::Required { value, .. } => Some(*value),
        }
    }

    /// Marker text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OptOut => OPT_OUT,
            Self::Required { raw, .. } => raw,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
