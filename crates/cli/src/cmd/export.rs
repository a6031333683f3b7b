//! Implementation of the `stagekit export` command.

use std::path::Path;

use anyhow::{Context, Result};

use stagekit_lib::export::export;
use stagekit_lib::lock::{LockMode, PackageLock};
use stagekit_lib::resolve::DependencyCache;

use super::load_recipe;
use crate::output::{OutputFormat, Status, emit_json, field, status};

pub fn cmd_export(recipe_path: &Path, user: &str, channel: &str, output: OutputFormat) -> Result<()> {
  let loaded = load_recipe(recipe_path)?;

  let _lock = PackageLock::acquire(&loaded.layout.package_dir, LockMode::Shared, "export")
    .context("Failed to acquire package lock")?;

  let cache = DependencyCache::default_cache();
  let report = export(&loaded.recipe, &loaded.path, &loaded.layout, &cache, user, channel).context("Export failed")?;

  if output.is_json() {
    emit_json(&report)?;
  } else {
    status(
      Status::Done,
      &format!("Exported {} as {}", loaded.layout.package_dir.display(), report.reference),
    );
    field("Files", report.files);
    field("Sources", report.exported_sources);
    field("Cache", report.package_dir.display());
  }

  Ok(())
}
