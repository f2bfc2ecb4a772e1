//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. No test reaches a real
//! model: credentials are removed and local providers point at a closed port.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test, isolated from the user's config and keys.
fn front(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("front").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY");
    cmd
}

const ANSWERS: &str = r#"
language = "en"

[diagnosis]
feeling = "calm"
goal = "retention"
problem = "no tracking information"
"#;

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer-experience wizard"));
}

#[test]
fn test_version_flag() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_batch_help() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("answers file"));
}

// ============================================================================
// Steps Command Tests
// ============================================================================

#[test]
fn test_steps_lists_all_nine() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .args(["steps", "--language", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Diagnosis"))
        .stdout(predicate::str::contains("5. Voice of Customer"))
        .stdout(predicate::str::contains("9. Strategy"))
        .stdout(predicate::str::contains("[raw_messages]"));
}

#[test]
fn test_steps_in_polish_by_default() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir).arg("steps").assert().success().stdout(predicate::str::contains("1. Diagnoza"));
}

#[test]
fn test_steps_rejects_unknown_language() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir).args(["steps", "--language", "fr"]).assert().failure();
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ai]"))
        .stdout(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_config_reads_local_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child(".front.toml").write_str("[general]\nlanguage = \"de\"\n").unwrap();

    front(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("language = \"de\""));

    front(&dir)
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".front.toml"));
}

#[test]
fn test_config_with_invalid_toml_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child(".front.toml").write_str("[general\n").unwrap();

    front(&dir).arg("config").assert().failure();
}

// ============================================================================
// Batch & Suggest Tests
// ============================================================================

#[test]
fn test_batch_without_api_key_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("answers.toml").write_str(ANSWERS).unwrap();

    front(&dir)
        .args(["batch", "answers.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_batch_with_missing_answers_file_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    front(&dir)
        .args(["batch", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_batch_reports_gateway_failure() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child(".front.toml")
        .write_str(
            "[ai]\nproviders = [\"ollama\"]\ntimeout_secs = 5\n\n[ai.ollama]\nbase_url = \"http://127.0.0.1:9\"\n",
        )
        .unwrap();
    dir.child("answers.toml").write_str(ANSWERS).unwrap();

    front(&dir)
        .args(["batch", "answers.toml", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generation failed"));

    dir.child("out").assert(predicate::path::missing());
}

#[test]
fn test_suggest_rejects_unknown_field() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .args(["suggest", "mood"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn test_suggest_rejects_later_steps() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .args(["suggest", "raw-messages"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("first three steps"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    let dir = assert_fs::TempDir::new().unwrap();
    front(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("front"));
}
