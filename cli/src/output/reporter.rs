//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` so the install service can emit progress events
//! without depending on any presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Steps print as `"  → {message}"` and warnings as `"  ⚠ {message}"` on
/// stderr; success and info lines go through the context's `✓` and `ℹ`
/// helpers. Everything except warnings is suppressed by `--quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        // Partial failures must stay visible even in quiet mode.
        eprintln!("  {} {message}", "⚠".style(self.ctx.styles.warning));
    }

    fn info(&self, message: &str) {
        self.ctx.info(message);
    }
}
