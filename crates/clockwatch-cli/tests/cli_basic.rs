//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and only exercise surfaces that need no keyring or network.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "clockwatch-cli", "--"])
        .args(args)
        .env("CLOCKWATCH_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help_lists_subcommands() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    for sub in ["auth", "config", "status", "watch"] {
        assert!(stdout.contains(sub), "missing subcommand {sub}: {stdout}");
    }
}

#[test]
fn test_config_list_is_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("config list should print JSON");
    assert!(parsed["polling"]["interval_seconds"].is_number());
    assert!(parsed["notifications"]["enabled"].is_boolean());
}

#[test]
fn test_config_get_and_set_roundtrip() {
    let (stdout, _, code) = run_cli(&["config", "set", "polling.validation_day", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "polling.validation_day = 3");
    let (stdout, _, code) = run_cli(&["config", "get", "polling.validation_day"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (stdout, _, code) = run_cli(&["config", "set", "polling.custom_start_date", "2023-05-01"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "polling.custom_start_date = 2023-05-01");
    let (stdout, _, code) = run_cli(&["config", "set", "polling.custom_start_date", "none"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "polling.custom_start_date cleared");

    let (_, _, code) = run_cli(&["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&["config", "get", "polling.validation_day"]);
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn test_watch_help_documents_force_first() {
    let (stdout, _, code) = run_cli(&["watch", "--help"]);
    assert_eq!(code, 0);
    assert!(
        stdout.contains("--force-first"),
        "missing --force-first flag: {stdout}"
    );
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "polling.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}
