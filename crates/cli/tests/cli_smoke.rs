//! CLI smoke tests for stagekit.
//!
//! These tests verify that CLI commands run without panicking and return
//! appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the stagekit binary.
fn stagekit_cmd() -> Command {
  cargo_bin_cmd!("stagekit")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  stagekit_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  stagekit_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("stagekit"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "package", "deps", "export", "info"] {
    stagekit_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// info
// =============================================================================

#[test]
#[serial]
fn info_shows_platform() {
  stagekit_cmd()
    .args(["info", "--os", "linux", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Platform"))
    .stdout(predicate::str::contains("x86_64-linux"));
}

#[test]
#[serial]
fn info_for_windows_lists_windows_binaries() {
  stagekit_cmd()
    .args(["info", "--os", "windows", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("*.dll *.lib"))
    .stdout(predicate::str::contains("/NODEFAULTLIB:LIBCMT"));
}

#[test]
#[serial]
fn info_json_output_is_valid() {
  let output = stagekit_cmd()
    .args(["info", "--os", "macos", "--arch", "aarch64", "-o", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["profile"], "mac-like");
  assert_eq!(value["flags"]["cppflags"][1], "-stdlib=libc++");
}

// =============================================================================
// Error Handling
// =============================================================================

#[test]
fn unknown_os_is_rejected() {
  stagekit_cmd()
    .args(["info", "--os", "plan9"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown operating system"));
}

#[test]
#[serial]
fn missing_recipe_fails() {
  let temp = TempDir::new().unwrap();

  stagekit_cmd()
    .arg("package")
    .arg(temp.path().join("stagekit.toml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to read recipe"));
}

#[test]
#[serial]
fn invalid_recipe_fails() {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("stagekit.toml"), "name = [").unwrap();

  stagekit_cmd()
    .arg("package")
    .arg(temp.path().join("stagekit.toml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse recipe"));
}
