//! Contextual hints suggesting the next action after a run.

/// Hint after a failed gate, naming the failing modules.
pub fn after_failed_gate(failed: &[String]) -> String {
    format!(
        "Add tests to raise coverage in: {}. Thresholds never go down on their own.",
        failed.join(", ")
    )
}

/// Hint when some modules had no threshold.
pub fn no_threshold_declared() -> &'static str {
    "Pass a default (`covgate gate 80`) or run `covgate ratchet` to record current coverage."
}

/// Hint after a ratchet dry run that would have written markers.
pub fn after_dry_run() -> &'static str {
    "Run `covgate ratchet` without --dry-run to write these thresholds."
}

/// Hint after a ratchet that wrote markers.
pub fn after_ratchet_writes() -> &'static str {
    "Commit the updated .covgate markers so the gate enforces them."
}

/// Hint when a required tool is missing.
pub fn install_requirement(hint: &str) -> String {
    format!("To install: {}", hint)
}
