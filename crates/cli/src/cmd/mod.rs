mod build;
mod deps;
mod export;
mod info;
mod package;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use stagekit_lib::build::BuildLayout;
use stagekit_lib::config::{BuildConfig, BuildType, CompilerKind, Settings};
use stagekit_lib::platform::arch::Arch;
use stagekit_lib::platform::os::Os;
use stagekit_lib::recipe::Recipe;

pub use build::cmd_build;
pub use deps::cmd_deps;
pub use export::cmd_export;
pub use info::cmd_info;
pub use package::cmd_package;

/// Build settings given on the command line; unset ones fall back to the recipe, then the host.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
  /// Target operating system (linux, macos, windows, freebsd)
  #[arg(long)]
  pub os: Option<Os>,

  /// Target architecture (x86, x86_64, armv7, aarch64)
  #[arg(long)]
  pub arch: Option<Arch>,

  /// Build type (Debug or Release)
  #[arg(long)]
  pub build_type: Option<BuildType>,

  /// Compiler (msvc, gcc, clang, apple-clang)
  #[arg(long)]
  pub compiler: Option<CompilerKind>,

  /// Compiler version, e.g. 17 for Visual Studio 2022
  #[arg(long)]
  pub compiler_version: Option<String>,
}

impl SettingsArgs {
  fn into_settings(self) -> Settings {
    Settings {
      os: self.os,
      arch: self.arch,
      build_type: self.build_type,
      compiler: self.compiler,
      compiler_version: self.compiler_version,
    }
  }

  /// Resolve against the recipe's `[settings]` and then the host platform.
  fn resolve(self, fallback: &Settings) -> Result<BuildConfig> {
    let settings = self.into_settings().or(fallback);
    BuildConfig::resolve(&settings).context("Failed to resolve build configuration")
  }
}

/// A recipe together with the directories it resolves to.
struct LoadedRecipe {
  recipe: Recipe,
  path: PathBuf,
  layout: BuildLayout,
}

fn load_recipe(path: &Path) -> Result<LoadedRecipe> {
  let recipe = Recipe::load(path).with_context(|| format!("Failed to load recipe: {}", path.display()))?;
  let path = dunce::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))?;
  let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
  let layout = BuildLayout::from_recipe(&recipe, &dir);

  Ok(LoadedRecipe { recipe, path, layout })
}
