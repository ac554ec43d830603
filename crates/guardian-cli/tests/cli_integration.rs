//! CLI Integration Tests
//!
//! These tests run the built `guardian` binary and check its output and exit
//! status. None of them touch the Bluetooth adapter: they cover help,
//! argument errors, and the `config` actions, which work offline.
//!
//! ```
//! cargo test --package guardian-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

/// Run guardian with `args`, ignoring any config path from the environment.
fn run_guardian(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_guardian"))
        .args(args)
        .env_remove("GUARDIAN_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run guardian binary")
}

fn run_with_config(config: &Path, args: &[&str]) -> Output {
    let config = config.to_str().expect("temp path is UTF-8");
    let mut full = vec!["--config", config];
    full.extend_from_slice(args);
    run_guardian(&full)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_guardian(&["--help"]);

    assert!(output.status.success(), "Help should succeed");
    let stdout = stdout(&output);
    for command in ["scan", "discover", "vibrate", "alert", "config", "completions"] {
        assert!(stdout.contains(command), "Help should list {command}");
    }
}

#[test]
fn test_version_command() {
    let output = run_guardian(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let output = run_guardian(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("guardian"));
}

// =============================================================================
// Argument errors (rejected before any config or radio access)
// =============================================================================

#[test]
fn test_unknown_pattern_is_usage_error() {
    let output = run_guardian(&["vibrate", "--pattern", "buzz"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("buzz"));
}

#[test]
fn test_unknown_alert_is_usage_error() {
    let output = run_guardian(&["alert", "overdue"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("overdue"));
}

#[test]
fn test_missing_subcommand() {
    let output = run_guardian(&[]);

    assert!(!output.status.success());
}

// =============================================================================
// Config actions
// =============================================================================

#[test]
fn test_config_path_prints_override() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("ward-3.toml");

    let output = run_with_config(&path, &["config", "path"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), path.display().to_string());
}

#[test]
fn test_config_init_then_validate() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("guardianrx").join("config.toml");

    let output = run_with_config(&path, &["config", "init"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(path.exists());

    let output = run_with_config(&path, &["config", "validate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("OK"));

    // A second init must not clobber the file
    let output = run_with_config(&path, &["config", "init"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--force"));
}

#[test]
fn test_config_show_masks_secrets() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[wifi]\nssid = \"ward-3\"\npassword = \"hunter22\"\n\n\
         [telegram]\nbot_token = \"123456:secret-token\"\nchat_id = \"42\"\n",
    )
    .unwrap();

    let output = run_with_config(&path, &["config", "show"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("ward-3"));
    assert!(stdout.contains("********"));
    assert!(!stdout.contains("hunter22"));
    assert!(!stdout.contains("secret-token"));
}

#[test]
fn test_config_validate_rejects_bad_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[pins]\nbuzzer = 34\n").unwrap();

    let output = run_with_config(&path, &["config", "validate"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("pins.buzzer"));
}

#[test]
fn test_invalid_config_stops_alert_before_scanning() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[band]\noperation_timeout_ms = 0\n").unwrap();

    let output = run_with_config(&path, &["alert", "due"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("band.operation_timeout_ms"));
}
