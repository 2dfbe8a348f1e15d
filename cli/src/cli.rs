//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, OutputFlags};
use crate::application::services::install::InstallRequest;
use crate::commands;
use crate::domain::config::{
    DEFAULT_CONFIG_URL, DEFAULT_DOWNLOAD_BASE, DEFAULT_RELEASES_API, ReleaseEndpoints,
};

/// Install or upgrade the Komodo periphery agent as a systemd service
///
/// Safe to re-run: the binary is always replaced, while an existing config
/// and service file are left alone.
#[derive(Parser)]
#[command(name = "setup-periphery", disable_version_flag = true)]
pub struct Cli {
    /// Release tag to install, e.g. --version=v1.16.2 [default: latest release]
    #[arg(long = "version", value_name = "TAG")]
    pub version: Option<String>,

    /// Install for the current user (~/.local/bin, ~/.config) under `systemctl --user`
    #[arg(long)]
    pub user: bool,

    /// Rewrite periphery.service even if it already exists
    #[arg(long)]
    pub force_service_file: bool,

    /// Latest-release metadata endpoint
    #[arg(long, env = "PERIPHERY_RELEASES_API", default_value = DEFAULT_RELEASES_API, value_name = "URL")]
    pub releases_api: String,

    /// Base URL binaries are downloaded from, as <base>/<tag>/<asset>
    #[arg(long, env = "PERIPHERY_DOWNLOAD_BASE", default_value = DEFAULT_DOWNLOAD_BASE, value_name = "URL")]
    pub download_base: String,

    /// Example config downloaded when no config exists yet
    #[arg(long, env = "PERIPHERY_CONFIG_URL", default_value = DEFAULT_CONFIG_URL, value_name = "URL")]
    pub config_url: String,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (also disabled when NO_COLOR is set to any non-empty value)
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Split parsed flags into the install request and output settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint override is not an http(s) URL.
    pub fn into_parts(self) -> Result<(InstallRequest, OutputFlags)> {
        let endpoints =
            ReleaseEndpoints::new(&self.releases_api, &self.download_base, &self.config_url)?;
        let request = InstallRequest {
            version: self.version,
            user: self.user,
            force_service_file: self.force_service_file,
            endpoints,
        };
        let flags = OutputFlags {
            no_color: self.no_color,
            quiet: self.quiet,
        };
        Ok((request, flags))
    }

    /// Execute the install.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or any fatal install step fails.
    pub async fn run(self) -> Result<()> {
        let (request, flags) = self.into_parts()?;
        let app = AppContext::new(&flags);
        commands::install::run(&app, &request).await
    }
}
