//! Implementation of the `stagekit deps` command.
//!
//! Reports (and by default installs) the recipe's system requirements for
//! the target OS, and reports which declared dependencies the local cache holds.

use std::path::Path;

use anyhow::{Context, Result};

use stagekit_lib::execute::SystemRunner;
use stagekit_lib::resolve::{
  Availability, DependencyCache, check_system_requirements, ensure_system_requirements, resolve_requirements,
};

use super::{SettingsArgs, load_recipe};
use crate::output::{OutputFormat, Status, emit_json, field, heading, status};

pub fn cmd_deps(recipe_path: &Path, settings: SettingsArgs, check: bool, output: OutputFormat) -> Result<()> {
  let loaded = load_recipe(recipe_path)?;
  let recipe = &loaded.recipe;
  let config = settings.resolve(&recipe.settings)?;

  let runner = SystemRunner;
  let packages = recipe.system_requirements.for_os(config.os);
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let system = if check {
    rt.block_on(check_system_requirements(&runner, config.os, packages))
      .context("Failed to query system packages")?
  } else {
    rt.block_on(ensure_system_requirements(&runner, config.os, packages))
      .context("Failed to ensure system requirements")?
  };

  let cache = DependencyCache::default_cache();
  let dependencies =
    resolve_requirements(&cache, recipe.requirements()).context("Failed to look up declared dependencies")?;

  if output.is_json() {
    let json_output = serde_json::json!({
      "os": config.os,
      "cache": cache.root(),
      "system_requirements": system,
      "dependencies": dependencies,
    });
    emit_json(&json_output)?;
    return Ok(());
  }

  if system.is_empty() {
    status(Status::Note, &format!("No system requirements for {}", config.os));
  } else {
    heading(&format!("System requirements ({})", config.os));
    for (package, availability) in &system {
      field(package, availability_label(*availability));
    }
  }

  if dependencies.is_empty() {
    status(Status::Note, "No declared dependencies");
  } else {
    heading(&format!("Dependencies ({})", cache.root().display()));
    for dependency in &dependencies {
      let reference = dependency.requirement.reference.to_string();
      match &dependency.package {
        Some(found) => field(&reference, found.dir.display()),
        None => field(&reference, "not found"),
      }
    }
  }

  let missing = dependencies.iter().filter(|s| s.package.is_none()).count()
    + system.iter().filter(|(_, a)| *a == Availability::Missing).count();
  if missing == 0 {
    status(Status::Done, "All dependencies available");
  } else {
    status(Status::Warn, &format!("{} dependencies missing", missing));
  }

  Ok(())
}

fn availability_label(availability: Availability) -> &'static str {
  match availability {
    Availability::AlreadyInstalled => "installed",
    Availability::Installed => "installed now",
    Availability::Missing => "missing",
    Availability::Skipped => "skipped (no package manager for this OS)",
  }
}
