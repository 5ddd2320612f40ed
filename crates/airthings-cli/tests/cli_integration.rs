//! CLI Integration Tests
//!
//! These tests run the `airthings` binary and only cover paths that finish
//! before any Bluetooth I/O: help, version, argument errors and timeout
//! validation.
//!
//! ```
//! cargo test --package airthings-cli --test cli_integration
//! ```

use std::io::Write;
use std::process::{Command, Output};

/// Run airthings with an isolated (missing) config file and no device env var.
fn run_airthings(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    run_airthings_with_config(args, config.to_str().expect("temp path is UTF-8"))
}

fn run_airthings_with_config(args: &[&str], config: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_airthings"))
        .args(["--config", config])
        .args(args)
        .env_remove("AIRTHINGS_DEVICE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run airthings binary")
}

#[test]
fn test_help_command() {
    let output = run_airthings(&["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--connect", "--timeout", "--imperial", "--debug", "--format"] {
        assert!(stdout.contains(flag), "Help should list {flag}");
    }
    assert!(stdout.contains("AIRTHINGS_DEVICE"), "Help should mention the env var");
}

#[test]
fn test_version_command() {
    let output = run_airthings(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("airthings "), "unexpected version output: {stdout}");
}

#[test]
fn test_zero_timeout_fails_before_scanning() {
    let output = run_airthings(&["--timeout", "0"]);

    assert!(!output.status.success(), "Zero timeout should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Scanning"), "No scan should start: {stdout}");
    assert!(stderr.contains("Invalid scan timeout"), "stderr: {stderr}");
}

#[test]
fn test_negative_timeout_fails_in_targeted_mode() {
    let output = run_airthings(&["--connect", "AA:BB:CC:DD:EE:FF", "--timeout", "-2"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid scan timeout"), "stderr: {stderr}");
}

#[test]
fn test_timeout_from_config_is_validated() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"timeout = -5.0\n").expect("Failed to write config");

    let output = run_airthings_with_config(&[], file.path().to_str().expect("UTF-8 path"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid scan timeout"), "stderr: {stderr}");
}

#[test]
fn test_invalid_format_is_usage_error() {
    let output = run_airthings(&["--format", "csv"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("csv"));
}

#[test]
fn test_non_numeric_timeout_is_usage_error() {
    let output = run_airthings(&["--timeout", "soon"]);

    assert_eq!(output.status.code(), Some(2));
}
