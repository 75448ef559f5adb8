//! CLI argument and configuration validation tests.
//!
//! Every command points WATCHMAIL_CONFIG at a path inside a temp dir so the
//! operator's real config file never leaks into a test run.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn watchmail(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("watchmail").expect("binary exists");
    cmd.env("WATCHMAIL_CONFIG", temp.path().join("config.toml"))
        .env_remove("RESEND_API_KEY")
        .timeout(std::time::Duration::from_secs(30));
    cmd
}

#[test]
fn test_help_describes_the_tool() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("emails you a diff"))
        .stdout(predicate::str::contains("--cooldown"));
}

#[test]
fn test_command_argument_is_required() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp).assert().failure();
}

#[test]
fn test_color_flags_conflict() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .args(["-c", "-C", "echo", "hi"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_cooldown_is_fatal_before_the_loop() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .args(["--cooldown", "5x", "echo", "hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid duration"))
        .stderr(predicate::str::contains("5x"));
}

#[test]
fn test_email_without_api_key_is_fatal() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .args(["--email", "ops@example.com", "echo", "hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_email_without_sender_is_fatal() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .args([
            "--email",
            "ops@example.com",
            "--api-key",
            "re_key",
            "echo",
            "hi",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sender address"));
}

#[test]
fn test_chgexit_terminates_on_first_change() {
    let temp = TempDir::new().unwrap();
    // Nanosecond clock output differs on every run, so the second iteration
    // detects a change and -g exits 0.
    watchmail(&temp)
        .args(["-n", "0.05", "-g", "date", "+%s%N"])
        .assert()
        .success();
}

#[test]
fn test_errexit_propagates_the_command_exit_code() {
    let temp = TempDir::new().unwrap();
    watchmail(&temp)
        .args(["-n", "0.05", "-e", "exit 3"])
        .assert()
        .code(3);
}
