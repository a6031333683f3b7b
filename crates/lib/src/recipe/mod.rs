//! Recipe files: the static description of a package.
//!
//! A recipe (`stagekit.toml`) declares the package identity, the third-party
//! packages it requires, the system packages it needs per OS, how to drive
//! CMake, which source-tree files to ship, and which libraries consumers link.
//! Everything here is loaded once and never mutated.

pub mod reference;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::build::artifact::ArtifactDescriptor;
use crate::config::Settings;
use crate::platform::os::Os;

pub use reference::{DependencyOption, DependencyRef, ReferenceError};

#[derive(Debug, Error)]
pub enum RecipeError {
  #[error("failed to read recipe {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse recipe {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: Box<toml::de::Error>,
  },

  #[error("invalid recipe: {0}")]
  Invalid(String),

  #[error("dependency '{0}' is declared more than once")]
  DuplicateRequirement(String),
}

/// Native packages a recipe needs installed through the OS package manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemRequirements {
  #[serde(default)]
  pub linux: Vec<String>,
  #[serde(default)]
  pub macos: Vec<String>,
  #[serde(default)]
  pub windows: Vec<String>,
  #[serde(default)]
  pub freebsd: Vec<String>,
}

impl SystemRequirements {
  pub fn for_os(&self, os: Os) -> &[String] {
    match os {
      Os::Linux => &self.linux,
      Os::MacOs => &self.macos,
      Os::Windows => &self.windows,
      Os::FreeBsd => &self.freebsd,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
  /// Source tree passed to CMake, relative to the recipe directory.
  #[serde(default = "default_source_dir")]
  pub source_dir: PathBuf,
  /// Out-of-source build directory, relative to the recipe directory.
  #[serde(default = "default_build_dir")]
  pub build_dir: PathBuf,
  /// Remove the build directory before configuring.
  #[serde(default)]
  pub clean: bool,
  /// Extra `-D` cache entries for the configure step.
  #[serde(default)]
  pub definitions: BTreeMap<String, String>,
}

fn default_source_dir() -> PathBuf {
  PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
  PathBuf::from("_build")
}

impl Default for BuildSection {
  fn default() -> Self {
    Self {
      source_dir: default_source_dir(),
      build_dir: default_build_dir(),
      clean: false,
      definitions: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
  /// Package directory, relative to the recipe directory.
  #[serde(default = "default_package_dir")]
  pub dir: PathBuf,
  /// Source-tree files shipped regardless of platform.
  #[serde(default)]
  pub copy: Vec<ArtifactDescriptor>,
}

fn default_package_dir() -> PathBuf {
  PathBuf::from("package")
}

impl Default for PackageSection {
  fn default() -> Self {
    Self {
      dir: default_package_dir(),
      copy: Vec::new(),
    }
  }
}

/// Per-family additions to the published flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagAdditions {
  #[serde(default)]
  pub system_libs: Vec<String>,
  #[serde(default)]
  pub cppflags: Vec<String>,
  #[serde(default)]
  pub exelinkflags: Vec<String>,
  #[serde(default)]
  pub sharedlinkflags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInfoSection {
  /// Libraries consumers link against.
  #[serde(default)]
  pub libs: Vec<String>,
  /// Language standard flag value for GCC-style compilers.
  #[serde(default = "default_cppstd")]
  pub cppstd: String,
  #[serde(default)]
  pub windows: FlagAdditions,
  #[serde(default)]
  pub macos: FlagAdditions,
  #[serde(default)]
  pub unix: FlagAdditions,
}

fn default_cppstd() -> String {
  "c++11".to_string()
}

impl Default for PackageInfoSection {
  fn default() -> Self {
    Self {
      libs: Vec::new(),
      cppstd: default_cppstd(),
      windows: FlagAdditions::default(),
      macos: FlagAdditions::default(),
      unix: FlagAdditions::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub license: Option<String>,
  /// Source-tree patterns copied into the cache alongside the package on export.
  #[serde(default)]
  pub exports: Vec<String>,
  #[serde(default)]
  pub requires: Vec<DependencyRef>,
  #[serde(default)]
  pub default_options: Vec<DependencyOption>,
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub system_requirements: SystemRequirements,
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub package: PackageSection,
  #[serde(default)]
  pub package_info: PackageInfoSection,
}

/// A declared dependency together with the options that target it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
  pub reference: DependencyRef,
  pub options: BTreeMap<String, String>,
}

impl Recipe {
  /// Parse and validate recipe text.
  pub fn parse(content: &str, path: &Path) -> Result<Self, RecipeError> {
    let recipe: Recipe = toml::from_str(content).map_err(|e| RecipeError::Parse {
      path: path.to_path_buf(),
      source: Box::new(e),
    })?;
    recipe.validate()?;
    Ok(recipe)
  }

  /// Read a recipe from disk.
  pub fn load(path: &Path) -> Result<Self, RecipeError> {
    let content = std::fs::read_to_string(path).map_err(|source| RecipeError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let recipe = Self::parse(&content, path)?;
    debug!(name = %recipe.name, version = %recipe.version, path = %path.display(), "loaded recipe");
    Ok(recipe)
  }

  fn validate(&self) -> Result<(), RecipeError> {
    if self.name.trim().is_empty() {
      return Err(RecipeError::Invalid("name must not be empty".to_string()));
    }
    if self.version.trim().is_empty() {
      return Err(RecipeError::Invalid("version must not be empty".to_string()));
    }

    let mut seen = std::collections::HashSet::new();
    for reference in &self.requires {
      if !seen.insert(reference.name.as_str()) {
        return Err(RecipeError::DuplicateRequirement(reference.name.clone()));
      }
    }

    Ok(())
  }

  /// Declared dependencies with their default options attached.
  ///
  /// Options naming a package that is not declared are ignored with a warning.
  pub fn requirements(&self) -> Vec<Requirement> {
    for option in &self.default_options {
      if !self.requires.iter().any(|r| r.name == option.package) {
        warn!(option = %option, "option targets a package that is not required");
      }
    }

    self
      .requires
      .iter()
      .map(|reference| Requirement {
        reference: reference.clone(),
        options: self
          .default_options
          .iter()
          .filter(|o| o.package == reference.name)
          .map(|o| (o.key.clone(), o.value.clone()))
          .collect(),
      })
      .collect()
  }
}
