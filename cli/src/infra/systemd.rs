//! systemd implementation of the `ServiceController` port.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ServiceController};
use crate::domain::InstallMode;

const SYSTEMCTL: &str = "systemctl";

/// Drives `systemctl`, adding `--user` for per-user installs.
pub struct Systemctl<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Systemctl<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

/// `systemctl` arguments for `action` in the scope of `mode`.
#[must_use]
pub fn systemctl_args<'a>(mode: InstallMode, action: &[&'a str]) -> Vec<&'a str> {
    let mut args = Vec::with_capacity(action.len() + 1);
    if mode.is_user() {
        args.push("--user");
    }
    args.extend_from_slice(action);
    args
}

impl<R: CommandRunner> ServiceController for Systemctl<R> {
    async fn stop(&self, mode: InstallMode, service: &str) -> Result<Output> {
        self.runner
            .run(SYSTEMCTL, &systemctl_args(mode, &["stop", service]))
            .await
    }

    async fn start(&self, mode: InstallMode, service: &str) -> Result<Output> {
        self.runner
            .run(SYSTEMCTL, &systemctl_args(mode, &["start", service]))
            .await
    }

    async fn reload(&self, mode: InstallMode) -> Result<Output> {
        self.runner
            .run(SYSTEMCTL, &systemctl_args(mode, &["daemon-reload"]))
            .await
    }
}
