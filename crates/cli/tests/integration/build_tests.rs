use predicates::prelude::*;

use super::common::{DEMO_RECIPE, TestEnv};

#[test]
fn missing_source_directory_fails_before_staging() {
  let recipe = format!("{}\n[build]\nsource_dir = \"missing\"\n", DEMO_RECIPE);
  let env = TestEnv::with_recipe(&recipe);

  env
    .stagekit_cmd()
    .arg("build")
    .arg(&env.recipe_path)
    .args(["--os", "linux", "--arch", "x86_64", "--skip-system-deps"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Build failed"));

  assert!(!env.package_dir().join("package_info.json").exists());
}

#[cfg(unix)]
mod with_fake_cmake {
  use predicates::prelude::*;
  use serial_test::serial;

  use super::super::common::{TestEnv, fake_cmake};

  #[test]
  #[serial]
  fn failing_configure_propagates_exit_code() {
    let env = TestEnv::demo();
    let bin = fake_cmake(env.temp.path(), 3);

    env
      .stagekit_cmd()
      .env("PATH", &bin)
      .arg("build")
      .arg(&env.recipe_path)
      .args(["--os", "linux", "--arch", "x86_64", "--skip-system-deps"])
      .assert()
      .code(3)
      .stderr(predicate::str::contains("configure"));

    assert!(!env.package_dir().exists());
  }

  #[test]
  #[serial]
  fn successful_build_stages_existing_outputs() {
    let env = TestEnv::demo();
    let bin = fake_cmake(env.temp.path(), 0);

    env
      .stagekit_cmd()
      .env("PATH", &bin)
      .arg("build")
      .arg(&env.recipe_path)
      .args(["--os", "linux", "--arch", "x86_64", "--skip-system-deps"])
      .assert()
      .success()
      .stdout(predicate::str::contains("Built demo 0.1.0"));

    assert!(env.package_dir().join("lib/libdemo.a").is_file());
    assert!(env.package_dir().join("package_info.json").is_file());
  }

  #[test]
  #[serial]
  fn clean_flag_discards_previous_build_tree() {
    let env = TestEnv::demo();
    let bin = fake_cmake(env.temp.path(), 0);

    env
      .stagekit_cmd()
      .env("PATH", &bin)
      .arg("build")
      .arg(&env.recipe_path)
      .args(["--os", "linux", "--arch", "x86_64", "--skip-system-deps", "--clean"])
      .assert()
      .success();

    assert!(env.path("_build").is_dir());
    assert!(!env.path("_build/libdemo.a").exists());
    assert!(!env.package_dir().join("lib").exists());
    assert!(env.package_dir().join("include/demo/demo.hpp").is_file());
  }
}
