//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config directory and
//! verify outputs.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &tempfile::TempDir, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(dir, args, None)
}

fn run_cli_with_input(
    dir: &tempfile::TempDir,
    args: &[&str],
    input: Option<&str>,
) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_wellspring"))
        .args(args)
        .env("WELLSPRING_CONFIG_DIR", dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut stdin = child.stdin.take().expect("stdin");
        if let Some(input) = input {
            stdin.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn events(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

fn event_types(stdout: &str) -> Vec<String> {
    events(stdout)
        .iter()
        .filter_map(|e| e["type"].as_str().map(str::to_string))
        .collect()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_list_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["meditation"]["default_duration_secs"], 300);
    assert_eq!(parsed["dashboard"]["quote_interval_secs"], 10);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "set", "meditation.default_duration_secs", "600"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(&dir, &["config", "get", "meditation.default_duration_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "600");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "ui.theme", "dark"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");

    let (_, stderr, code) = run_cli(&dir, &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key: nope"));
}

#[test]
fn test_config_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(&dir, &["config", "set", "notifications.enabled", "false"]);
    let (_, _, code) = run_cli(&dir, &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&dir, &["config", "get", "notifications.enabled"]);
    assert_eq!(stdout.trim(), "true");
}

// ============================================================================
// Timers
// ============================================================================

#[test]
fn test_breathe_simulated_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["breathe", "--cycles", "1", "--simulate"]);
    assert_eq!(code, 0);
    let types = event_types(&stdout);
    assert_eq!(types.first().map(String::as_str), Some("BreathingStarted"));
    assert_eq!(types.last().map(String::as_str), Some("BreathingStopped"));
    let phases: Vec<String> = events(&stdout)
        .iter()
        .filter(|e| e["type"] == "BreathingPhaseChanged")
        .filter_map(|e| e["to"].as_str().map(str::to_string))
        .collect();
    assert_eq!(phases, vec!["hold", "exhale", "pause", "inhale"]);
}

#[test]
fn test_meditate_simulated_completes() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(&dir, &["meditate", "--secs", "3", "--simulate"]);
    assert_eq!(code, 0);
    assert_eq!(
        event_types(&stdout),
        vec![
            "MeditationStarted",
            "MeditationTick",
            "MeditationTick",
            "MeditationCompleted"
        ]
    );
    assert!(stderr.contains("Meditation Complete!"));
}

#[test]
fn test_meditate_zero_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["meditate", "--secs", "0", "--simulate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

// ============================================================================
// Auth & shell (local accounts)
// ============================================================================

#[test]
fn test_auth_status_local() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["auth", "status"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["provider"], "local");
    assert_eq!(parsed["signed_in"], false);
}

#[test]
fn test_auth_commands_refused_without_backend() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        &dir,
        &[
            "auth", "signup", "--name", "Sam", "--email", "sam@example.com", "--password",
            "secret1", "--confirm", "secret1",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("no auth backend configured"), "stderr: {stderr}");

    let (_, stderr, code) = run_cli(
        &dir,
        &["auth", "signin", "--email", "sam@example.com", "--password", "secret1"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("no auth backend configured"), "stderr: {stderr}");
    assert!(!stderr.contains("Invalid login credentials"));
}

#[test]
fn test_shell_session() {
    let dir = tempfile::tempdir().unwrap();
    let script = "\
go relax
signup Sam sam@example.com secret1 secret1
login sam@example.com secret1
go relax
panel meditation
meditate 180
go journal
journal Slept well
entries
quit
";
    let (stdout, stderr, code) = run_cli_with_input(&dir, &["shell"], Some(script));
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stderr.contains("Not Signed In"));
    assert!(stderr.contains("Account Created!"));
    assert!(stderr.contains("Welcome back!"));
    assert!(stdout.contains("== Relaxation Tools =="));
    assert!(stdout.contains("3:00 Ready to meditate"));
    assert!(stdout.contains("Slept well"));

    let types = event_types(&stdout);
    assert!(types.contains(&"SignedIn".to_string()));
    assert!(types.contains(&"MeditationConfigured".to_string()));
    assert!(types.contains(&"JournalEntrySaved".to_string()));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("wellspring"));
}
