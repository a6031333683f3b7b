//! Implementation of the `stagekit build` command.
//!
//! Ensures system requirements, looks up declared dependencies in the local
//! cache, then runs the configure/compile/stage/publish pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use stagekit_lib::build::{BuildOptions, build_package};
use stagekit_lib::execute::SystemRunner;
use stagekit_lib::lock::{LockMode, PackageLock};
use stagekit_lib::resolve::{DependencyCache, RequirementStatus, ensure_system_requirements, resolve_requirements};

use super::{SettingsArgs, load_recipe};
use crate::output::{OutputFormat, Status, elapsed, emit_json, field, status};

pub fn cmd_build(
  recipe_path: &Path,
  settings: SettingsArgs,
  clean: bool,
  skip_system_deps: bool,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  let loaded = load_recipe(recipe_path)?;
  let recipe = &loaded.recipe;
  let config = settings.resolve(&recipe.settings)?;

  let _lock = PackageLock::acquire(&loaded.layout.package_dir, LockMode::Exclusive, "build")
    .context("Failed to acquire package lock")?;

  let runner = SystemRunner;
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  let system = if skip_system_deps {
    Vec::new()
  } else {
    let packages = recipe.system_requirements.for_os(config.os);
    rt.block_on(ensure_system_requirements(&runner, config.os, packages))
      .context("Failed to ensure system requirements")?
  };

  let cache = DependencyCache::default_cache();
  let dependencies =
    resolve_requirements(&cache, recipe.requirements()).context("Failed to look up declared dependencies")?;

  let options = BuildOptions {
    clean: clean || recipe.build.clean,
    prefix_paths: prefix_paths(&dependencies),
  };
  info!(name = %recipe.name, version = %recipe.version, platform = %config.platform(), "building package");

  let report = rt
    .block_on(build_package(&runner, recipe, &config, &loaded.layout, &options))
    .context("Build failed")?;

  if output.is_json() {
    let json_output = serde_json::json!({
      "config": config,
      "system_requirements": system,
      "dependencies": dependencies,
      "build": report,
    });
    emit_json(&json_output)?;
  } else {
    for missing in dependencies.iter().filter(|s| s.package.is_none()) {
      status(
        Status::Warn,
        &format!("{} not found in {}", missing.requirement.reference, cache.root().display()),
      );
    }
    status(Status::Done, &format!("Built {} {}", recipe.name, recipe.version));
    field("Platform", config.platform().triple());
    field("Build type", config.build_type.as_str());
    field("Compiler", &config.compiler);
    field("Staged", report.package.staged.copied.len());
    field("Package", report.package.package_dir.display());
    field("Took", elapsed(start.elapsed()));
  }

  Ok(())
}

/// Package directories of the dependencies found in the cache.
fn prefix_paths(dependencies: &[RequirementStatus]) -> Vec<PathBuf> {
  dependencies
    .iter()
    .filter_map(|status| status.package.as_ref().map(|p| p.dir.clone()))
    .collect()
}
