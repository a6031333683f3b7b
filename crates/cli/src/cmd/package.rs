//! Implementation of the `stagekit package` command.
//!
//! Stages artifacts from an existing build tree and publishes the package
//! metadata without running CMake.

use std::path::Path;

use anyhow::{Context, Result};

use stagekit_lib::build::package;
use stagekit_lib::lock::{LockMode, PackageLock};

use super::{SettingsArgs, load_recipe};
use crate::output::{OutputFormat, Status, emit_json, field, flag_list, status};

pub fn cmd_package(recipe_path: &Path, settings: SettingsArgs, output: OutputFormat) -> Result<()> {
  let loaded = load_recipe(recipe_path)?;
  let config = settings.resolve(&loaded.recipe.settings)?;

  let _lock = PackageLock::acquire(&loaded.layout.package_dir, LockMode::Exclusive, "package")
    .context("Failed to acquire package lock")?;

  let report = package(&loaded.recipe, &config, &loaded.layout).context("Packaging failed")?;

  if output.is_json() {
    emit_json(&report)?;
  } else {
    status(Status::Done, &format!("Packaged {} {}", loaded.recipe.name, loaded.recipe.version));
    field("Platform", &report.info.platform);
    field("Staged", report.staged.copied.len());
    field("Libs", flag_list(&report.info.libs));
    field("Package", report.package_dir.display());
    for miss in &report.staged.misses {
      status(Status::Note, &format!("Nothing matched {}", miss));
    }
  }

  Ok(())
}
