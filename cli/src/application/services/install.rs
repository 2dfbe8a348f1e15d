//! Application service: periphery install / upgrade use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The pipeline is strictly linear: plan (mode, version) → stop → binary →
//! config → unit → start. Fatal steps return [`InstallError`]; service-manager
//! commands never abort and are reported as [`ServiceCommandOutcome`].

use std::path::PathBuf;
use std::process::Output;

use crate::application::ports::{Fetcher, LocalFs, ProgressReporter, ServiceController};
use crate::domain::config::{ReleaseEndpoints, SERVICE_NAME};
use crate::domain::error::InstallError;
use crate::domain::install::{
    self, Environment, InstallMode, PathSet, artifact_name, binary_url, render_unit,
};

/// Permission bits for the installed binary.
pub const BINARY_MODE: u32 = 0o755;

// ── Public types ──────────────────────────────────────────────────────────────

/// What the operator asked for on the command line.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Raw `--version=` value, if given.
    pub version: Option<String>,
    /// `--user` was passed.
    pub user: bool,
    /// `--force-service-file` was passed.
    pub force_service_file: bool,
    pub endpoints: ReleaseEndpoints,
}

/// Everything resolved before the host is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub mode: InstallMode,
    pub paths: PathSet,
    pub version: String,
    /// Release asset selected for the host architecture.
    pub artifact: &'static str,
    pub binary_url: String,
    pub config_url: String,
}

/// Result of a stop / reload / start invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommandOutcome {
    /// Command exited zero; `output` is its trimmed stdout.
    Succeeded { output: String },
    /// Command could not run or exited non-zero.
    Failed { reason: String },
}

impl ServiceCommandOutcome {
    fn from_result(result: anyhow::Result<Output>) -> Self {
        match result {
            Ok(out) if out.status.success() => Self::Succeeded {
                output: String::from_utf8_lossy(&out.stdout).trim().to_string(),
            },
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                let reason = if stderr.is_empty() {
                    format!("exited with {}", out.status)
                } else {
                    stderr
                };
                Self::Failed { reason }
            }
            Err(e) => Self::Failed {
                reason: format!("{e:#}"),
            },
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Binary installation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOutcome {
    pub path: PathBuf,
    pub url: String,
    pub bytes: usize,
    /// A previous binary was removed first.
    pub replaced: bool,
}

/// Config installation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOutcome {
    Created,
    AlreadyPresent,
}

/// Unit file installation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// No unit existed; a fresh one was written.
    Written,
    /// An existing unit was removed and rewritten (`--force-service-file`).
    Replaced,
    /// Unit existed and was left alone.
    AlreadyPresent,
}

/// Unit outcome plus the reload that follows a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub outcome: UnitOutcome,
    /// `None` when nothing was written and no reload was needed.
    pub reload: Option<ServiceCommandOutcome>,
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub plan: InstallPlan,
    pub stop: ServiceCommandOutcome,
    pub binary: BinaryOutcome,
    pub config: ConfigOutcome,
    pub unit: UnitReport,
    pub start: ServiceCommandOutcome,
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Resolve the version to install.
///
/// An explicit `--version=` value wins and is used literally. Otherwise the
/// latest-release endpoint is queried once; there is no retry.
///
/// # Errors
///
/// Returns [`InstallError::Configuration`] for an empty flag value, and
/// [`InstallError::Network`] if the endpoint is unreachable or its response
/// is malformed.
pub async fn resolve_version(
    flag: Option<&str>,
    fetcher: &impl Fetcher,
    endpoints: &ReleaseEndpoints,
    reporter: &impl ProgressReporter,
) -> Result<String, InstallError> {
    if let Some(version) = install::requested_version(flag)? {
        tracing::debug!(%version, "using requested version");
        return Ok(version);
    }

    let url = &endpoints.latest_release;
    reporter.step("Looking up latest periphery release");
    tracing::debug!(%url, "fetching latest release metadata");
    let body = fetcher.get(url).await.map_err(|e| InstallError::Network {
        url: url.clone(),
        reason: format!("{e:#}"),
    })?;
    let version = install::parse_release_tag(url, &body)?;
    tracing::info!(%version, "resolved latest release");
    Ok(version)
}

/// Resolve mode, paths, version and artifact without touching the host.
///
/// # Errors
///
/// Returns [`InstallError::Configuration`] if user mode has no home directory
/// or the version flag is empty, and [`InstallError::Network`] if the latest
/// release cannot be resolved.
pub async fn plan_install(
    fetcher: &impl Fetcher,
    reporter: &impl ProgressReporter,
    env: &Environment,
    request: &InstallRequest,
) -> Result<InstallPlan, InstallError> {
    let (mode, paths) = install::resolve_mode(request.user, env)?;
    if mode == InstallMode::System && !env.is_root {
        reporter.warn("system-wide install usually needs root; rerun with sudo or pass --user");
    }
    let version = resolve_version(
        request.version.as_deref(),
        fetcher,
        &request.endpoints,
        reporter,
    )
    .await?;
    let artifact = artifact_name(&env.arch);
    let plan = InstallPlan {
        mode,
        binary_url: binary_url(&request.endpoints, &version, artifact),
        config_url: request.endpoints.example_config.clone(),
        paths,
        version,
        artifact,
    };
    tracing::debug!(?plan, "install plan resolved");
    Ok(plan)
}

// ── Pipeline steps ────────────────────────────────────────────────────────────

/// Stop a running periphery. Best effort: failure is reported, never returned.
pub async fn stop_service(
    services: &impl ServiceController,
    reporter: &impl ProgressReporter,
    mode: InstallMode,
) -> ServiceCommandOutcome {
    reporter.step("Stopping periphery if it is running");
    let outcome = ServiceCommandOutcome::from_result(services.stop(mode, SERVICE_NAME).await);
    match &outcome {
        ServiceCommandOutcome::Succeeded { output } => {
            if !output.is_empty() {
                reporter.info(output);
            }
        }
        ServiceCommandOutcome::Failed { reason } => {
            tracing::debug!(%reason, "stop failed, continuing");
            reporter.info(&format!("periphery was not stopped ({reason}), continuing"));
        }
    }
    outcome
}

/// Replace the periphery binary with the planned release asset.
///
/// Any existing binary is deleted before the download starts, and it is not
/// restored if the download fails.
///
/// # Errors
///
/// Returns [`InstallError::FileSystem`] if the directory or file cannot be
/// prepared, and [`InstallError::Download`] if the fetch fails.
pub async fn install_binary(
    fs: &impl LocalFs,
    fetcher: &impl Fetcher,
    reporter: &impl ProgressReporter,
    plan: &InstallPlan,
) -> Result<BinaryOutcome, InstallError> {
    let dir = plan.paths.binary_dir();
    let path = plan.paths.binary_path();

    fs.create_dir_all(dir)
        .map_err(|e| InstallError::file_system(dir, &e))?;

    let replaced = fs.exists(&path);
    if replaced {
        tracing::debug!(path = %path.display(), "removing existing binary");
        fs.remove_file(&path)
            .map_err(|e| InstallError::file_system(&path, &e))?;
    }

    match plan.artifact {
        "periphery-aarch64" => reporter.info("aarch64 detected, using the aarch64 build"),
        "periphery-x86_64" => reporter.info("x86_64 detected, using the x86_64 build"),
        other => reporter.info(&format!("using generic build '{other}'")),
    }

    reporter.step(&format!("Downloading periphery {}", plan.version));
    tracing::info!(url = %plan.binary_url, path = %path.display(), "downloading binary");
    let bytes = fetcher
        .get(&plan.binary_url)
        .await
        .map_err(|e| InstallError::Download {
            url: plan.binary_url.clone(),
            reason: format!("{e:#}"),
        })?;

    fs.write(&path, &bytes)
        .map_err(|e| InstallError::file_system(&path, &e))?;
    fs.set_permissions(&path, BINARY_MODE)
        .map_err(|e| InstallError::file_system(&path, &e))?;

    reporter.success(&format!("Installed binary at {}", path.display()));
    Ok(BinaryOutcome {
        path,
        url: plan.binary_url.clone(),
        bytes: bytes.len(),
        replaced,
    })
}

/// Download the example config unless one is already present.
///
/// An existing config is never read, merged or rewritten.
///
/// # Errors
///
/// Returns [`InstallError::FileSystem`] if the directory or file cannot be
/// written, and [`InstallError::Network`] if the download fails.
pub async fn install_config(
    fs: &impl LocalFs,
    fetcher: &impl Fetcher,
    reporter: &impl ProgressReporter,
    plan: &InstallPlan,
) -> Result<ConfigOutcome, InstallError> {
    let path = plan.paths.config_path();
    if fs.exists(&path) {
        reporter.info(&format!(
            "config already exists at {}, skipping",
            path.display()
        ));
        return Ok(ConfigOutcome::AlreadyPresent);
    }

    let dir = plan.paths.config_dir();
    fs.create_dir_all(dir)
        .map_err(|e| InstallError::file_system(dir, &e))?;

    reporter.step(&format!("Creating config at {}", path.display()));
    tracing::info!(url = %plan.config_url, path = %path.display(), "downloading example config");
    let body = fetcher
        .get(&plan.config_url)
        .await
        .map_err(|e| InstallError::Network {
            url: plan.config_url.clone(),
            reason: format!("{e:#}"),
        })?;
    fs.write(&path, &body)
        .map_err(|e| InstallError::file_system(&path, &e))?;

    reporter.success(&format!("Created config at {}", path.display()));
    Ok(ConfigOutcome::Created)
}

/// Write the systemd unit unless one exists (or `force` is set), then reload.
///
/// The write uses exclusive create: if another process creates the file
/// between the existence check and the write, this fails instead of
/// overwriting it.
///
/// # Errors
///
/// Returns [`InstallError::FileSystem`] if the old unit cannot be removed or
/// the new one cannot be created.
pub async fn install_service_unit(
    fs: &impl LocalFs,
    services: &impl ServiceController,
    reporter: &impl ProgressReporter,
    paths: &PathSet,
    mode: InstallMode,
    force: bool,
) -> Result<UnitReport, InstallError> {
    let path = paths.unit_path();
    let existed = fs.exists(&path);

    if existed && !force {
        reporter.info(&format!(
            "service file already exists at {}, skipping",
            path.display()
        ));
        return Ok(UnitReport {
            outcome: UnitOutcome::AlreadyPresent,
            reload: None,
        });
    }
    if existed {
        tracing::debug!(path = %path.display(), "removing unit for forced rewrite");
        fs.remove_file(&path)
            .map_err(|e| InstallError::file_system(&path, &e))?;
    }

    let dir = paths.service_dir();
    fs.create_dir_all(dir)
        .map_err(|e| InstallError::file_system(dir, &e))?;

    reporter.step(&format!("Writing service file at {}", path.display()));
    fs.create_new(&path, render_unit(paths).as_bytes())
        .map_err(|e| InstallError::file_system(&path, &e))?;

    let reload = ServiceCommandOutcome::from_result(services.reload(mode).await);
    if let ServiceCommandOutcome::Failed { reason } = &reload {
        reporter.warn(&format!("service manager reload failed: {reason}"));
    }

    let outcome = if existed {
        UnitOutcome::Replaced
    } else {
        UnitOutcome::Written
    };
    reporter.success(&format!("Service file ready at {}", path.display()));
    Ok(UnitReport {
        outcome,
        reload: Some(reload),
    })
}

/// Start periphery. The outcome is reported but never turned into an error.
pub async fn start_service(
    services: &impl ServiceController,
    reporter: &impl ProgressReporter,
    mode: InstallMode,
) -> ServiceCommandOutcome {
    reporter.step("Starting periphery");
    let outcome = ServiceCommandOutcome::from_result(services.start(mode, SERVICE_NAME).await);
    match &outcome {
        ServiceCommandOutcome::Succeeded { output } => {
            if !output.is_empty() {
                reporter.info(output);
            }
            reporter.success("periphery started");
        }
        ServiceCommandOutcome::Failed { reason } => {
            tracing::warn!(%reason, "periphery failed to start");
            reporter.warn(&format!("periphery failed to start: {reason}"));
        }
    }
    outcome
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Apply a resolved plan to the host.
///
/// # Errors
///
/// Returns the first fatal [`InstallError`]; later steps are not attempted.
pub async fn apply_install(
    fs: &impl LocalFs,
    fetcher: &impl Fetcher,
    services: &impl ServiceController,
    reporter: &impl ProgressReporter,
    plan: InstallPlan,
    force_service_file: bool,
) -> Result<InstallReport, InstallError> {
    let stop = stop_service(services, reporter, plan.mode).await;
    let binary = install_binary(fs, fetcher, reporter, &plan).await?;
    let config = install_config(fs, fetcher, reporter, &plan).await?;
    let unit = install_service_unit(
        fs,
        services,
        reporter,
        &plan.paths,
        plan.mode,
        force_service_file,
    )
    .await?;
    let start = start_service(services, reporter, plan.mode).await;

    Ok(InstallReport {
        plan,
        stop,
        binary,
        config,
        unit,
        start,
    })
}

/// Plan and apply an install in one call.
///
/// # Errors
///
/// Returns the first fatal [`InstallError`] from planning or applying.
pub async fn run_install(
    fs: &impl LocalFs,
    fetcher: &impl Fetcher,
    services: &impl ServiceController,
    reporter: &impl ProgressReporter,
    env: &Environment,
    request: &InstallRequest,
) -> Result<InstallReport, InstallError> {
    let plan = plan_install(fetcher, reporter, env, request).await?;
    apply_install(
        fs,
        fetcher,
        services,
        reporter,
        plan,
        request.force_service_file,
    )
    .await
}
