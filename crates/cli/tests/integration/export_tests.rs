use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn export_after_package_populates_cache() {
  let env = TestEnv::demo();
  env.package_for("linux");

  env
    .stagekit_cmd()
    .arg("export")
    .arg(&env.recipe_path)
    .args(["--user", "demo", "--channel", "testing"])
    .assert()
    .success()
    .stdout(predicate::str::contains("demo/0.1.0@demo/testing"));

  let cached = env.cache_path().join("demo/0.1.0/demo/testing/package");
  assert!(cached.join("package_info.json").is_file());
  assert!(cached.join("lib/libdemo.a").is_file());
  assert!(cached.join("include/demo/demo.hpp").is_file());
  assert!(env.cache_path().join("demo/0.1.0/demo/testing/export/stagekit.toml").is_file());
}

#[test]
fn export_without_package_fails() {
  let env = TestEnv::demo();

  env
    .stagekit_cmd()
    .arg("export")
    .arg(&env.recipe_path)
    .args(["--user", "demo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no published package"));
}

#[test]
fn exported_package_resolves_for_consumers() {
  let env = TestEnv::demo();
  env.package_for("linux");
  env
    .stagekit_cmd()
    .arg("export")
    .arg(&env.recipe_path)
    .args(["--user", "demo", "--channel", "stable"])
    .assert()
    .success();

  env.write_file(
    "consumer/stagekit.toml",
    "name = \"consumer\"\nversion = \"1.0\"\nrequires = [\"demo/0.1.0@demo/stable\"]\n",
  );

  env
    .stagekit_cmd()
    .arg("deps")
    .arg(env.path("consumer/stagekit.toml"))
    .args(["--os", "windows", "--arch", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("All dependencies available"));
}
