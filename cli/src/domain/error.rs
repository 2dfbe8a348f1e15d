//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal installer failures. Any of these aborts the pipeline.
///
/// Service-manager failures are deliberately absent: stop, reload and start
/// are reported but never abort an install.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Release metadata or example config could not be fetched or parsed.
    #[error("network error: cannot fetch {url}: {reason}")]
    Network { url: String, reason: String },

    /// The periphery binary download failed.
    #[error("download error: cannot download {url}: {reason}")]
    Download { url: String, reason: String },

    /// Flags or host environment do not allow a usable install plan.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A directory or file could not be created, removed or written.
    #[error("filesystem error: {}: {reason}", path.display())]
    FileSystem { path: PathBuf, reason: String },
}

impl InstallError {
    /// Build a `FileSystem` error from any displayable cause.
    ///
    /// Uses the alternate format so `anyhow` context chains are kept.
    pub fn file_system(path: impl Into<PathBuf>, cause: &anyhow::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            reason: format!("{cause:#}"),
        }
    }
}
