//! Install command: banner, plan summary, pipeline, next steps.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::install::{
    InstallPlan, InstallReport, InstallRequest, apply_install, plan_install,
};
use crate::domain::InstallMode;
use crate::domain::config::SERVICE_NAME;
use crate::infra::systemd::systemctl_args;
use crate::output::{OutputContext, TerminalReporter};

/// Run the install pipeline and render its progress.
///
/// # Errors
///
/// Returns the first fatal install error. A failed service start is reported
/// but does not fail the command.
pub async fn run(app: &AppContext, request: &InstallRequest) -> Result<()> {
    let ctx = &app.output;
    let reporter = TerminalReporter::new(ctx);

    ctx.banner("PERIPHERY INSTALLER");
    let plan = plan_install(&app.fetcher, &reporter, &app.env, request).await?;
    render_plan(ctx, &plan);

    let report = apply_install(
        &app.fs,
        &app.fetcher,
        &app.services,
        &reporter,
        plan,
        request.force_service_file,
    )
    .await?;
    render_summary(ctx, &report);
    Ok(())
}

fn render_plan(ctx: &OutputContext, plan: &InstallPlan) {
    ctx.kv("Version:", &plan.version);
    ctx.kv("Mode:", &plan.mode.to_string());
    ctx.kv("Binary dir:", &plan.paths.binary_dir().display().to_string());
    ctx.kv("Config dir:", &plan.paths.config_dir().display().to_string());
    ctx.kv("Service dir:", &plan.paths.service_dir().display().to_string());
    ctx.kv("Asset:", plan.artifact);
    ctx.blank();
}

fn render_summary(ctx: &OutputContext, report: &InstallReport) {
    ctx.blank();
    ctx.success("Finished periphery setup.");
    if !report.start.succeeded() {
        ctx.info(&format!(
            "inspect the failure with: {}",
            journal_hint(report.plan.mode)
        ));
    }
    for hint in next_steps(report.plan.mode) {
        ctx.info(&hint);
    }
}

/// Shell commands suggested once the install completes.
#[must_use]
pub fn next_steps(mode: InstallMode) -> Vec<String> {
    vec![
        format!("check status with: {}", systemctl_line(mode, "status")),
        format!("start on boot with: {}", systemctl_line(mode, "enable")),
    ]
}

fn systemctl_line(mode: InstallMode, verb: &str) -> String {
    let mut line = String::from("systemctl");
    for arg in systemctl_args(mode, &[verb, SERVICE_NAME]) {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn journal_hint(mode: InstallMode) -> String {
    if mode.is_user() {
        format!("journalctl --user -u {SERVICE_NAME}")
    } else {
        format!("journalctl -u {SERVICE_NAME}")
    }
}
