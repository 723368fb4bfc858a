//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain text, no ANSI styling. Report lines go to stdout; warnings,
/// errors, hints, and spinner notices go to stderr. In CI (detected via
/// `is_ci()`) spinner notices are dropped entirely.
pub struct NonInteractiveUI {
    mode: OutputMode,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self { mode, is_ci }
    }

    /// Whether CI was detected.
    pub fn is_ci(&self) -> bool {
        self.is_ci
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{} {}", StatusKind::Success.icon(), msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{} {}", StatusKind::Warning.icon(), msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {}", StatusKind::Failed.icon(), msg);
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_decoration() {
            eprintln!("  hint: {}", hint);
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let visible = self.mode.shows_spinners() && !self.is_ci;
        if visible {
            eprintln!("  {}", message);
        }
        Box::new(NoopSpinner { visible })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_decoration() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints its final line.
struct NoopSpinner {
    visible: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.visible {
            eprintln!("  {} {}", StatusKind::Success.icon(), msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {} {}", StatusKind::Failed.icon(), msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.visible {
            eprintln!("  {} {}", StatusKind::Skipped.icon(), msg);
        }
    }
}
