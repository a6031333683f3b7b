//! Local package cache lookups for declared dependencies.
//!
//! Layout: `<root>/<name>/<version>/<user>/<channel>/package/` holding a
//! published package. A package only counts as present once its
//! `package_info.json` exists, which publication writes last.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::build::{BuildError, PackageInfo};
use crate::platform::paths::package_cache_dir;
use crate::recipe::{DependencyRef, Requirement};

#[derive(Debug, Clone)]
pub struct DependencyCache {
  root: PathBuf,
}

/// A dependency found in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedPackage {
  pub reference: DependencyRef,
  pub dir: PathBuf,
  pub info: PackageInfo,
}

/// Cache status of one declared dependency.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementStatus {
  pub requirement: Requirement,
  pub package: Option<CachedPackage>,
}

impl DependencyCache {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// The cache at `STAGEKIT_CACHE` or the platform cache directory.
  pub fn default_cache() -> Self {
    Self::new(package_cache_dir())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding everything cached for one reference.
  pub fn reference_dir(&self, reference: &DependencyRef) -> PathBuf {
    self
      .root
      .join(&reference.name)
      .join(&reference.version)
      .join(&reference.user)
      .join(&reference.channel)
  }

  pub fn package_dir(&self, reference: &DependencyRef) -> PathBuf {
    self.reference_dir(reference).join("package")
  }

  pub fn export_dir(&self, reference: &DependencyRef) -> PathBuf {
    self.reference_dir(reference).join("export")
  }

  /// Find a published package for `reference`.
  pub fn lookup(&self, reference: &DependencyRef) -> Result<Option<CachedPackage>, BuildError> {
    let dir = self.package_dir(reference);
    let info = PackageInfo::read(&dir)?;
    debug!(reference = %reference, found = info.is_some(), "cache lookup");
    Ok(info.map(|info| CachedPackage {
      reference: reference.clone(),
      dir,
      info,
    }))
  }
}

/// Look up every requirement; missing ones are logged, not fatal.
pub fn resolve_requirements(
  cache: &DependencyCache,
  requirements: Vec<Requirement>,
) -> Result<Vec<RequirementStatus>, BuildError> {
  let mut statuses = Vec::with_capacity(requirements.len());
  for requirement in requirements {
    let package = cache.lookup(&requirement.reference)?;
    if package.is_none() {
      warn!(
        reference = %requirement.reference,
        cache = %cache.root().display(),
        "dependency not found in local cache"
      );
    }
    statuses.push(RequirementStatus { requirement, package });
  }
  Ok(statuses)
}
