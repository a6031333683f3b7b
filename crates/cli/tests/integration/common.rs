//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Recipe for a small library with headers and one linked library.
pub const DEMO_RECIPE: &str = r#"
name = "demo"
version = "0.1.0"

[[package.copy]]
kind = "header"
src = "include"
pattern = "*.hpp"
keep_path = true

[package_info]
libs = ["demo"]
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the recipe, its
/// source and build trees, and an isolated dependency cache.
pub struct TestEnv {
  pub temp: TempDir,
  pub recipe_path: PathBuf,
}

impl TestEnv {
  /// Create an environment with `recipe` written to `stagekit.toml`.
  pub fn with_recipe(recipe: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let recipe_path = temp.path().join("stagekit.toml");
    std::fs::write(&recipe_path, recipe).unwrap();
    Self { temp, recipe_path }
  }

  /// The demo recipe with a header in the source tree and a built archive.
  pub fn demo() -> Self {
    let env = Self::with_recipe(DEMO_RECIPE);
    env.write_file("include/demo/demo.hpp", "#pragma once\n");
    env.write_file("_build/libdemo.a", "archive");
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  pub fn package_dir(&self) -> PathBuf {
    self.path("package")
  }

  /// Dependency cache root (isolated per test).
  pub fn cache_path(&self) -> PathBuf {
    let p = self.temp.path().join("cache");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Get a pre-configured Command for the stagekit binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `STAGEKIT_CACHE`: Isolated dependency cache
  /// - `XDG_CACHE_HOME` / `LOCALAPPDATA`: Isolated platform cache roots
  pub fn stagekit_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("stagekit");
    cmd.env("STAGEKIT_CACHE", self.cache_path());
    cmd.env("XDG_CACHE_HOME", self.cache_path());
    cmd.env("LOCALAPPDATA", self.cache_path()); // For Windows cache
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Run `stagekit package` for the given target and assert success.
  pub fn package_for(&self, os: &str) {
    self
      .stagekit_cmd()
      .arg("package")
      .arg(&self.recipe_path)
      .args(["--os", os, "--arch", "x86_64"])
      .assert()
      .success();
  }
}

/// Install an executable `cmake` stand-in that exits with `code`, returning its directory.
#[cfg(unix)]
pub fn fake_cmake(dir: &std::path::Path, code: i32) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let bin = dir.join("fake-bin");
  std::fs::create_dir_all(&bin).unwrap();
  let script = bin.join("cmake");
  std::fs::write(&script, format!("#!/bin/sh\necho \"fake cmake $*\" >&2\nexit {}\n", code)).unwrap();
  std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
  bin
}
