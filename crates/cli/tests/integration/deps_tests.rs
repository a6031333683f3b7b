use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn deps_without_requirements() {
  let env = TestEnv::with_recipe("name = \"demo\"\nversion = \"0.1.0\"\n");

  env
    .stagekit_cmd()
    .arg("deps")
    .arg(&env.recipe_path)
    .args(["--os", "windows", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No system requirements"))
    .stdout(predicate::str::contains("No declared dependencies"));
}

#[test]
fn system_packages_are_skipped_without_a_package_manager() {
  let env = TestEnv::with_recipe(
    "name = \"demo\"\nversion = \"0.1.0\"\n\n[system_requirements]\nlinux = [\"libjack-dev\"]\nwindows = [\"jack2\"]\n",
  );

  env
    .stagekit_cmd()
    .arg("deps")
    .arg(&env.recipe_path)
    .args(["--os", "windows", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("jack2"))
    .stdout(predicate::str::contains("skipped"))
    .stdout(predicate::str::contains("libjack-dev").not());
}

#[test]
fn missing_cached_dependency_is_reported_not_fatal() {
  let env = TestEnv::with_recipe(
    "name = \"demo\"\nversion = \"0.1.0\"\nrequires = [\"glm/0.9.7.6@dlarudgus20/stable\"]\ndefault_options = [\"glm:shared=False\"]\n",
  );

  env
    .stagekit_cmd()
    .arg("deps")
    .arg(&env.recipe_path)
    .args(["--os", "macos", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("glm/0.9.7.6@dlarudgus20/stable"))
    .stdout(predicate::str::contains("not found"))
    .stderr(predicate::str::contains("1 dependencies missing"));
}

#[test]
fn deps_json_output_is_valid() {
  let env = TestEnv::with_recipe(
    "name = \"demo\"\nversion = \"0.1.0\"\nrequires = [\"zlib/1.2.8@lasote/stable\"]\n\n[system_requirements]\nmacos = [\"jack\"]\n",
  );

  let output = env
    .stagekit_cmd()
    .arg("deps")
    .arg(&env.recipe_path)
    .args(["--os", "macos", "--arch", "aarch64", "-o", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["os"], "macos");
  assert_eq!(value["system_requirements"][0][1], "skipped");
  assert_eq!(value["dependencies"][0]["requirement"]["reference"], "zlib/1.2.8@lasote/stable");
  assert!(value["dependencies"][0]["package"].is_null());
}
