//! Status vocabulary shared by every report line.
//!
//! `StatusKind` gives each gate and ratchet outcome one icon, one
//! bracketed label for plain output, and one color.

use crate::gate::{GateOutcome, RatchetOutcome};

use super::theme::CovgateTheme;

/// Canonical status kinds used across covgate output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Module meets its threshold.
    Success,
    /// Module is below its threshold.
    Failed,
    /// Module opted out.
    Skipped,
    /// Non-fatal warning, e.g. no data.
    Warning,
    /// Ratchet created a marker.
    Created,
    /// Ratchet raised a marker.
    Raised,
    /// Ratchet left a marker alone.
    Unchanged,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Warning => "⚠",
            Self::Created => "+",
            Self::Raised => "↑",
            Self::Unchanged => "=",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Warning => "[warn]",
            Self::Created => "[new]",
            Self::Raised => "[up]",
            Self::Unchanged => "[same]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &CovgateTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped | Self::Unchanged => theme.dim.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Created | Self::Raised => theme.info.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &CovgateTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<&GateOutcome> for StatusKind {
    fn from(outcome: &GateOutcome) -> Self {
        match outcome {
            GateOutcome::Pass { .. } => Self::Success,
            GateOutcome::Fail { .. } => Self::Failed,
            GateOutcome::Skipped => Self::Skipped,
            GateOutcome::NoData { .. } => Self::Warning,
        }
    }
}

impl From<&RatchetOutcome> for StatusKind {
    fn from(outcome: &RatchetOutcome) -> Self {
        match outcome {
            RatchetOutcome::Created { .. } => Self::Created,
            RatchetOutcome::Raised { .. } => Self::Raised,
            RatchetOutcome::Unchanged { .. } => Self::Unchanged,
            RatchetOutcome::Skipped => Self::Skipped,
        }
    }
}
