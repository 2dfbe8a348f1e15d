//! Terminal output for the installer: banner, plan summary, step lines.

pub mod reporter;
pub mod styles;

use std::ffi::OsStr;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and terminal state shared by the command and the reporter.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// `--quiet`: only warnings and errors are printed.
    pub quiet: bool,
}

/// `NO_COLOR` disables color when set to any non-empty value.
#[must_use]
pub fn no_color_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let env_no_color = no_color_requested(std::env::var_os("NO_COLOR").as_deref());

        let mut styles = Styles::default();
        if is_tty && !no_color && !env_no_color {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Download progress bars are drawn only on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Installer banner line.
    pub fn banner(&self, title: &str) {
        if !self.quiet {
            println!("  {}", title.style(self.styles.banner));
        }
    }

    /// One `key value` row of the plan summary.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {value}", key.style(self.styles.key));
        }
    }

    /// Blank separator line.
    pub fn blank(&self) {
        if !self.quiet {
            println!();
        }
    }
}
