//! Host environment detection.
//!
//! The only place that reads process-global state (home directory, effective
//! uid, architecture). Everything downstream receives the resulting
//! [`Environment`] value.

use crate::domain::install::Environment;

/// Capture the current host's [`Environment`].
#[must_use]
pub fn detect_environment() -> Environment {
    let env = Environment {
        home_dir: dirs::home_dir(),
        is_root: nix::unistd::geteuid().is_root(),
        arch: std::env::consts::ARCH.to_string(),
    };
    tracing::debug!(?env, "detected host environment");
    env
}
