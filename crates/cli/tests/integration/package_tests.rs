use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn package_stages_and_publishes() {
  let env = TestEnv::demo();

  env
    .stagekit_cmd()
    .arg("package")
    .arg(&env.recipe_path)
    .args(["--os", "linux", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Packaged demo 0.1.0"));

  let package = env.package_dir();
  assert!(package.join("lib/libdemo.a").is_file());
  assert!(package.join("include/demo/demo.hpp").is_file());
  assert!(package.join("package_info.json").is_file());
  assert!(!package.join("bin").exists());
}

#[test]
fn package_json_output_contains_metadata() {
  let env = TestEnv::demo();

  let output = env
    .stagekit_cmd()
    .arg("package")
    .arg(&env.recipe_path)
    .args(["--os", "linux", "--arch", "x86_64", "-o", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["info"]["platform"], "x86_64-linux");
  assert_eq!(report["info"]["libs"][0], "demo");
  assert_eq!(report["info"]["cppflags"][0], "-std=c++11");
}

#[test]
fn package_for_windows_uses_windows_layout() {
  let env = TestEnv::demo();
  env.write_file("_build/Release/demo.dll", "dll");
  env.write_file("_build/Release/demo.lib", "lib");

  env.package_for("windows");

  let package = env.package_dir();
  assert!(package.join("bin/demo.dll").is_file());
  assert!(package.join("lib/demo.lib").is_file());
  assert!(!package.join("lib/libdemo.a").exists());

  let info = std::fs::read_to_string(package.join("package_info.json")).unwrap();
  assert!(info.contains("/NODEFAULTLIB:LIBCMTD"));
}

#[test]
fn recipe_settings_are_used_when_flags_are_absent() {
  let recipe = format!("{}\n[settings]\nos = \"macos\"\narch = \"aarch64\"\nbuild_type = \"Debug\"\n", super::common::DEMO_RECIPE);
  let env = TestEnv::with_recipe(&recipe);

  env
    .stagekit_cmd()
    .arg("package")
    .arg(&env.recipe_path)
    .assert()
    .success();

  let info = std::fs::read_to_string(env.package_dir().join("package_info.json")).unwrap();
  assert!(info.contains("aarch64-macos"));
  assert!(info.contains("\"Debug\""));
  assert!(info.contains("-stdlib=libc++"));
}

#[test]
fn repackaging_replaces_metadata() {
  let env = TestEnv::demo();

  env.package_for("linux");
  env.package_for("windows");

  let info = std::fs::read_to_string(env.package_dir().join("package_info.json")).unwrap();
  assert!(info.contains("x86_64-windows"));
}
