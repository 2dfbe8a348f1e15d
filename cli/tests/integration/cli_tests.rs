//! Integration tests for argument parsing and early failure paths

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn setup_periphery() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("setup-periphery"));
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("PERIPHERY_RELEASES_API")
        .env_remove("PERIPHERY_DOWNLOAD_BASE")
        .env_remove("PERIPHERY_CONFIG_URL");
    cmd
}

// --- Help and usage ---

#[test]
fn test_help_lists_install_flags() {
    setup_periphery()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--version <TAG>"))
        .stdout(predicate::str::contains("--user"))
        .stdout(predicate::str::contains("--force-service-file"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    setup_periphery()
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--frobnicate"));
}

#[test]
fn test_version_flag_requires_a_value() {
    setup_periphery().arg("--version").assert().code(2);
}

#[test]
fn test_no_color_env_is_not_a_usage_error() {
    for value in ["1", "yes", "true"] {
        let home = tempfile::TempDir::new().expect("tempdir");
        setup_periphery()
            .env("NO_COLOR", value)
            .env("HOME", home.path())
            .args(["--user", "--version="])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid value").not())
            .stderr(predicate::str::contains("configuration error"));
    }
}

#[test]
fn test_no_color_flag_is_accepted() {
    let home = tempfile::TempDir::new().expect("tempdir");
    setup_periphery()
        .env("HOME", home.path())
        .args(["--no-color", "--user", "--version="])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\x1b[").not());
}

// --- Configuration errors (exit 1, nothing touched) ---

#[test]
fn test_empty_version_value_is_configuration_error() {
    let home = tempfile::TempDir::new().expect("tempdir");
    setup_periphery()
        .env("HOME", home.path())
        .args(["--user", "--version="])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: configuration error"));
    assert!(!home.path().join(".local").exists());
}

#[test]
fn test_non_http_endpoint_override_is_configuration_error() {
    setup_periphery()
        .env("PERIPHERY_CONFIG_URL", "ftp://example.com/periphery.config.toml")
        .args(["--user", "--version=v1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("ftp://example.com"));
}

// --- Network errors ---

#[test]
fn test_unreachable_release_api_is_network_error() {
    let home = tempfile::TempDir::new().expect("tempdir");
    setup_periphery()
        .env("HOME", home.path())
        .args(["--user", "--releases-api", "http://127.0.0.1:9/latest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: network error"))
        .stderr(predicate::str::contains("127.0.0.1:9"));
    // Version resolution happens before anything is written.
    assert!(!home.path().join(".local").exists());
    assert!(!home.path().join(".config").exists());
}

#[test]
fn test_quiet_suppresses_banner_on_failure() {
    let home = tempfile::TempDir::new().expect("tempdir");
    setup_periphery()
        .env("HOME", home.path())
        .args(["--user", "--quiet", "--version="])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_banner_printed_before_failure() {
    let home = tempfile::TempDir::new().expect("tempdir");
    setup_periphery()
        .env("HOME", home.path())
        .args(["--user", "--version="])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PERIPHERY INSTALLER"));
}
