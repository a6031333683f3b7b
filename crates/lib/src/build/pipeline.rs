//! The build-and-package pipeline.
//!
//! Steps run strictly in order and never go back:
//! `clean (optional) → configure → compile → stage → publish`.
//! A failing configure or compile aborts the run before anything is staged;
//! nothing already written is rolled back.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::clean::clean;
use super::cmake::CMake;
use super::profile::PlatformProfile;
use super::publish::{PackageInfo, publish};
use super::stage::{StageReport, StageRoots, stage};
use super::types::{BuildError, BuildStep};
use crate::config::BuildConfig;
use crate::execute::{CommandRunner, Invocation};
use crate::recipe::Recipe;

/// Directories one run works in. Not shared between concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  pub package_dir: PathBuf,
}

impl BuildLayout {
  /// Resolve the recipe's relative directories against the recipe's own directory.
  pub fn from_recipe(recipe: &Recipe, recipe_dir: &Path) -> Self {
    Self {
      source_dir: recipe_dir.join(&recipe.build.source_dir),
      build_dir: recipe_dir.join(&recipe.build.build_dir),
      package_dir: recipe_dir.join(&recipe.package.dir),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// Remove the build directory before configuring.
  pub clean: bool,
  /// Extra CMake search prefixes (resolved cached dependencies).
  pub prefix_paths: Vec<PathBuf>,
}

/// Result of staging and publishing.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
  pub package_dir: PathBuf,
  pub staged: StageReport,
  pub info: PackageInfo,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub cleaned: bool,
  pub steps: Vec<BuildStep>,
  pub package: PackageReport,
}

/// Run the whole pipeline for `recipe` under `config`.
pub async fn build_package<R: CommandRunner + Sync>(
  runner: &R,
  recipe: &Recipe,
  config: &BuildConfig,
  layout: &BuildLayout,
  options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
  let mut steps = Vec::new();
  let cmake = CMake::new(config);

  let mut cleaned = false;
  if options.clean {
    cleaned = clean(&layout.build_dir);
    steps.push(BuildStep::Clean);
  }

  std::fs::create_dir_all(&layout.build_dir).map_err(|source| BuildError::Io {
    path: layout.build_dir.clone(),
    source,
  })?;

  info!(step = %BuildStep::Configure, platform = %config.platform(), build_type = %config.build_type, "configuring");
  let source_dir = dunce::canonicalize(&layout.source_dir).map_err(|source| BuildError::Io {
    path: layout.source_dir.clone(),
    source,
  })?;
  let configure = cmake.configure(
    &source_dir,
    &layout.build_dir,
    &recipe.build.definitions,
    &options.prefix_paths,
  );
  run_step(runner, BuildStep::Configure, &configure).await?;
  steps.push(BuildStep::Configure);

  info!(step = %BuildStep::Compile, "compiling");
  run_step(runner, BuildStep::Compile, &cmake.build(&layout.build_dir)).await?;
  steps.push(BuildStep::Compile);

  let packaged = package(recipe, config, layout)?;
  steps.extend([BuildStep::Stage, BuildStep::Publish]);

  Ok(BuildReport {
    cleaned,
    steps,
    package: packaged,
  })
}

/// Stage artifacts from an existing build tree and publish the metadata.
///
/// The platform profile is chosen once here and supplies both the binary
/// descriptors and the published flags.
pub fn package(recipe: &Recipe, config: &BuildConfig, layout: &BuildLayout) -> Result<PackageReport, BuildError> {
  let profile = PlatformProfile::for_os(config.os);
  info!(step = %BuildStep::Stage, profile = profile.as_str(), "staging artifacts");

  let mut descriptors = recipe.package.copy.clone();
  descriptors.extend(profile.binary_artifacts());

  let roots = StageRoots {
    source: layout.source_dir.clone(),
    build: layout.build_dir.clone(),
  };
  let staged = stage(&descriptors, &roots, &layout.package_dir)?;

  info!(step = %BuildStep::Publish, "publishing package metadata");
  let info = PackageInfo::assemble(recipe, config);
  publish(&layout.package_dir, &info)?;

  Ok(PackageReport {
    package_dir: layout.package_dir.clone(),
    staged,
    info,
  })
}

async fn run_step<R: CommandRunner + Sync>(
  runner: &R,
  step: BuildStep,
  invocation: &Invocation,
) -> Result<(), BuildError> {
  let output = runner.run(invocation).await?;
  if output.success() {
    return Ok(());
  }

  for line in output.stderr.lines().rev().take(20).collect::<Vec<_>>().into_iter().rev() {
    tracing::error!(step = %step, "{}", line);
  }

  Err(BuildError::ToolFailed {
    step,
    cmd: invocation.to_string(),
    code: output.code,
  })
}
