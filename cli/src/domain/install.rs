//! Install plan: mode, paths, version and artifact selection, unit rendering.
//!
//! Pure functions only. Everything the resolvers need from the host is passed
//! in through [`Environment`], so they never read process state themselves.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::config::{BINARY_FILE, CONFIG_FILE, PRODUCT, ReleaseEndpoints, UNIT_FILE};
use crate::domain::error::InstallError;

// ── Environment ──────────────────────────────────────────────────────────────

/// Snapshot of the host facts the installer depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Invoking user's home directory, if one could be determined.
    pub home_dir: Option<PathBuf>,
    /// Whether the process runs with an effective uid of 0.
    pub is_root: bool,
    /// Processor architecture, as reported by `std::env::consts::ARCH`.
    pub arch: String,
}

// ── Install mode ─────────────────────────────────────────────────────────────

/// Whether periphery is managed by the user's systemd instance or the system one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    System,
    User,
}

impl InstallMode {
    #[must_use]
    pub fn from_user_flag(user: bool) -> Self {
        if user { Self::User } else { Self::System }
    }

    #[must_use]
    pub fn is_user(self) -> bool {
        self == Self::User
    }
}

impl std::fmt::Display for InstallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User => f.write_str("user"),
        }
    }
}

// ── Paths ────────────────────────────────────────────────────────────────────

/// The three directories an install touches.
///
/// Only constructible through [`PathSet::system`] and [`PathSet::user`], so
/// the directories always belong to the same install mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    binary_dir: PathBuf,
    config_dir: PathBuf,
    service_dir: PathBuf,
}

impl PathSet {
    /// Fixed system-wide locations.
    #[must_use]
    pub fn system() -> Self {
        Self {
            binary_dir: PathBuf::from("/usr/local/bin"),
            config_dir: Path::new("/etc").join(PRODUCT),
            service_dir: PathBuf::from("/etc/systemd/system"),
        }
    }

    /// Per-user locations under `home`.
    #[must_use]
    pub fn user(home: &Path) -> Self {
        let config_root = home.join(".config");
        Self {
            binary_dir: home.join(".local").join("bin"),
            config_dir: config_root.join(PRODUCT),
            service_dir: config_root.join("systemd").join("user"),
        }
    }

    #[must_use]
    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    #[must_use]
    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    #[must_use]
    pub fn binary_path(&self) -> PathBuf {
        self.binary_dir.join(BINARY_FILE)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn unit_path(&self) -> PathBuf {
        self.service_dir.join(UNIT_FILE)
    }
}

/// Resolve the install mode and its paths from the `--user` flag.
///
/// # Errors
///
/// Returns [`InstallError::Configuration`] in user mode when the home
/// directory is unknown or not absolute.
pub fn resolve_mode(user: bool, env: &Environment) -> Result<(InstallMode, PathSet), InstallError> {
    let mode = InstallMode::from_user_flag(user);
    match mode {
        InstallMode::System => Ok((mode, PathSet::system())),
        InstallMode::User => {
            let home = env.home_dir.as_deref().ok_or_else(|| {
                InstallError::Configuration(
                    "--user install needs a home directory, but none could be determined"
                        .to_string(),
                )
            })?;
            if !home.is_absolute() {
                return Err(InstallError::Configuration(format!(
                    "home directory '{}' is not an absolute path",
                    home.display()
                )));
            }
            Ok((mode, PathSet::user(home)))
        }
    }
}

// ── Version ──────────────────────────────────────────────────────────────────

/// Validate the value given to `--version=`.
///
/// The tag is used literally; only an empty value is refused.
///
/// # Errors
///
/// Returns [`InstallError::Configuration`] if the flag was given without a value.
pub fn requested_version(flag: Option<&str>) -> Result<Option<String>, InstallError> {
    match flag {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(InstallError::Configuration(
            "--version was given an empty value".to_string(),
        )),
        Some(v) => Ok(Some(v.to_string())),
    }
}

#[derive(Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Extract the release tag from a latest-release metadata response.
///
/// # Errors
///
/// Returns [`InstallError::Network`] if the body is not JSON, has no
/// `tag_name`, or the tag is empty.
pub fn parse_release_tag(url: &str, body: &[u8]) -> Result<String, InstallError> {
    let release: LatestRelease =
        serde_json::from_slice(body).map_err(|e| InstallError::Network {
            url: url.to_string(),
            reason: format!("malformed release metadata: {e}"),
        })?;
    if release.tag_name.trim().is_empty() {
        return Err(InstallError::Network {
            url: url.to_string(),
            reason: "release metadata has an empty tag_name".to_string(),
        });
    }
    Ok(release.tag_name)
}

// ── Artifact ─────────────────────────────────────────────────────────────────

/// Release asset name for the given processor architecture.
///
/// 64-bit ARM and 64-bit x86 have dedicated builds; anything else gets the
/// generic asset.
#[must_use]
pub fn artifact_name(arch: &str) -> &'static str {
    match arch.to_ascii_lowercase().as_str() {
        "aarch64" | "arm64" => "periphery-aarch64",
        "x86_64" | "amd64" => "periphery-x86_64",
        _ => "periphery",
    }
}

#[must_use]
pub fn binary_url(endpoints: &ReleaseEndpoints, version: &str, artifact: &str) -> String {
    format!("{}/{version}/{artifact}", endpoints.download_base)
}

// ── Unit file ────────────────────────────────────────────────────────────────

/// Render `periphery.service`. The binary and config paths are the only variables.
#[must_use]
pub fn render_unit(paths: &PathSet) -> String {
    format!(
        "[Unit]\n\
         Description=agent process\n\
         [Service]\n\
         ExecStart={} --config-path {}\n\
         Restart=on-failure\n\
         TimeoutStartSec=0\n\
         [Install]\n\
         WantedBy=default.target\n",
        paths.binary_path().display(),
        paths.config_path().display(),
    )
}

// ── Unit tests ───────────────────────────────────────────────────────────────
