//! HTTP infrastructure: implements `Fetcher` with blocking `ureq` calls.
//!
//! Requests run on the blocking pool via `spawn_blocking` and are awaited
//! immediately, so downloads stay strictly sequential. Only connecting is
//! bounded by [`CONNECT_TIMEOUT`]; once a transfer starts there is no read
//! deadline, so a server that stalls mid-body stalls the install.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::Fetcher;

/// Sent with every request; GitHub's API refuses anonymous user agents.
pub const USER_AGENT: &str = concat!("setup-periphery/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a single response body.
pub const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

/// Give up on hosts that do not accept the connection within this window.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const BAR_TEMPLATE: &str = "  {msg}\n    {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}";

/// Production `Fetcher` backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
    show_progress: bool,
}

impl HttpFetcher {
    /// `show_progress` draws an `indicatif` bar while a body downloads.
    #[must_use]
    pub fn new(show_progress: bool) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout_connect(CONNECT_TIMEOUT)
            .build();
        Self {
            agent,
            show_progress,
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let url = url.to_string();
        let agent = self.agent.clone();
        let show_progress = self.show_progress;
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &url, show_progress))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str, show_progress: bool) -> Result<Vec<u8>> {
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            anyhow::bail!("HTTP {code} {}", response.status_text())
        }
        Err(ureq::Error::Transport(t)) => return Err(anyhow::anyhow!(t)),
    };

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());
    let bar = progress_bar(url, total, show_progress);
    let body = read_body(response.into_reader(), total, MAX_BODY_BYTES, &bar);
    bar.finish_and_clear();

    let body = body?;
    tracing::debug!(%url, bytes = body.len(), "fetched");
    Ok(body)
}

/// Read a whole body, refusing anything larger than `cap` or shorter than the
/// announced `Content-Length`.
fn read_body(
    reader: impl Read,
    expected: Option<u64>,
    cap: u64,
    bar: &ProgressBar,
) -> Result<Vec<u8>> {
    if let Some(expected) = expected {
        anyhow::ensure!(
            expected <= cap,
            "response of {expected} bytes exceeds the {cap} byte limit"
        );
    }

    // One byte past the cap distinguishes "exactly cap" from "cut off at cap".
    let mut reader = reader.take(cap.saturating_add(1));
    let mut body = Vec::with_capacity(usize::try_from(expected.unwrap_or(0)).unwrap_or(0));
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).context("reading response body")?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
        bar.inc(n as u64);
    }

    let got = body.len() as u64;
    anyhow::ensure!(got <= cap, "response exceeds the {cap} byte limit");
    if let Some(expected) = expected {
        anyhow::ensure!(
            got == expected,
            "response truncated: got {got} of {expected} bytes"
        );
    }
    Ok(body)
}

fn progress_bar(url: &str, total: Option<u64>, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = total.map_or_else(ProgressBar::new_spinner, ProgressBar::new);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("━━─"));
    }
    let name = url.rsplit('/').next().unwrap_or(url);
    pb.set_message(name.to_string());
    pb
}
