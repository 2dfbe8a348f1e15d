//! Installer constants and release endpoint configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use crate::domain::error::InstallError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Product name used for the config directory (`/etc/komodo`, `~/.config/komodo`).
pub const PRODUCT: &str = "komodo";

/// systemd unit name, also the installed binary's file name.
pub const SERVICE_NAME: &str = "periphery";

pub const BINARY_FILE: &str = "periphery";
pub const CONFIG_FILE: &str = "periphery.config.toml";
pub const UNIT_FILE: &str = "periphery.service";

pub const DEFAULT_RELEASES_API: &str =
    "https://api.github.com/repos/mbecker20/komodo/releases/latest";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com/mbecker20/komodo/releases/download";
pub const DEFAULT_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/mbecker20/komodo/main/config/periphery.config.toml";

// ── Endpoints ────────────────────────────────────────────────────────────────

/// Where release metadata, binaries and the example config are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEndpoints {
    /// Returns JSON with a `tag_name` field for the latest release.
    pub latest_release: String,
    /// Binaries live at `<download_base>/<version>/<artifact>`.
    pub download_base: String,
    /// Example config, not versioned.
    pub example_config: String,
}

impl Default for ReleaseEndpoints {
    fn default() -> Self {
        Self {
            latest_release: DEFAULT_RELEASES_API.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            example_config: DEFAULT_CONFIG_URL.to_string(),
        }
    }
}

impl ReleaseEndpoints {
    /// Build endpoints from user-supplied values, validating each one.
    ///
    /// A trailing `/` on the download base is dropped so URL joins stay clean.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Configuration`] if any value is not an
    /// `http://` or `https://` URL.
    pub fn new(
        latest_release: &str,
        download_base: &str,
        example_config: &str,
    ) -> Result<Self, InstallError> {
        validate_endpoint("releases API", latest_release)?;
        validate_endpoint("download base", download_base)?;
        validate_endpoint("config URL", example_config)?;
        Ok(Self {
            latest_release: latest_release.to_string(),
            download_base: download_base.trim_end_matches('/').to_string(),
            example_config: example_config.to_string(),
        })
    }
}

fn validate_endpoint(label: &str, value: &str) -> Result<(), InstallError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(InstallError::Configuration(format!(
            "{label} must be an http(s) URL, got '{value}'"
        ))),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
