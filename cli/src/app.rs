//! Application context: the production adapters wired together once.
//!
//! `AppContext` owns the output context, the detected host environment, and
//! the real filesystem, HTTP and systemd adapters that the install command
//! hands to the application service.

use crate::domain::Environment;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::environment::detect_environment;
use crate::infra::fs::StdFs;
use crate::infra::http::HttpFetcher;
use crate::infra::systemd::Systemctl;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Host facts captured at startup.
    pub env: Environment,
    pub fs: StdFs,
    pub fetcher: HttpFetcher,
    pub services: Systemctl<TokioCommandRunner>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &OutputFlags) -> Self {
        let output = OutputContext::new(flags.no_color, flags.quiet);
        let fetcher = HttpFetcher::new(output.show_progress());
        Self {
            output,
            env: detect_environment(),
            fs: StdFs,
            fetcher,
            services: Systemctl::new(TokioCommandRunner::default()),
        }
    }
}
