//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::InstallMode;

// ── Network Port ──────────────────────────────────────────────────────────────

/// Abstracts HTTP downloads so the install pipeline can run without network.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// GET `url` and return the full response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is unreachable, the transfer breaks off,
    /// or the response status is not a success.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

// ── Service Manager Port ──────────────────────────────────────────────────────

/// Service-manager control, scoped to the user or system instance.
///
/// Implementations return the raw command output; callers decide whether a
/// non-zero exit matters.
#[allow(async_fn_in_trait)]
pub trait ServiceController {
    /// Stop the named service.
    async fn stop(&self, mode: InstallMode, service: &str) -> Result<Output>;
    /// Start the named service.
    async fn start(&self, mode: InstallMode, service: &str) -> Result<Output>;
    /// Re-read unit definitions from disk.
    async fn reload(&self, mode: InstallMode) -> Result<Output>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a neutral informational message (skips, detected values).
    fn info(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the handful of filesystem operations an install performs.
pub trait LocalFs {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Create or truncate `path` and write `contents`.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    /// Write `contents` to a file that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` already exists.
    fn create_new(&self, path: &Path, contents: &[u8]) -> Result<()>;
    /// Set unix permission bits on `path`.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}
