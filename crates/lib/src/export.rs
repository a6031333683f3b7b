//! Export a published package into the local dependency cache.
//!
//! After export, other recipes that require `name/version@user/channel`
//! resolve to the copied package. The recipe file and the sources matched by
//! its `exports` patterns are stored next to it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::build::stage::copy_entry;
use crate::build::{BuildError, BuildLayout, PackageInfo};
use crate::consts::PACKAGE_INFO_FILENAME;
use crate::lock::lock_path_for;
use crate::recipe::{DependencyRef, Recipe};
use crate::resolve::DependencyCache;
use crate::util::pattern::wildcard_match;

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("no published package at {0}; run `stagekit build` or `stagekit package` first")]
  NotPublished(PathBuf),

  #[error("invalid user/channel '{0}'")]
  InvalidReference(String),

  #[error(transparent)]
  Build(#[from] BuildError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
  pub reference: DependencyRef,
  pub package_dir: PathBuf,
  pub files: usize,
  pub exported_sources: usize,
}

/// Copy the package at `layout.package_dir` into `cache` under `user/channel`.
///
/// Any previous export of the same reference is replaced. The metadata file is
/// copied last so a concurrent lookup never sees a half-copied package.
pub fn export(
  recipe: &Recipe,
  recipe_path: &Path,
  layout: &BuildLayout,
  cache: &DependencyCache,
  user: &str,
  channel: &str,
) -> Result<ExportReport, ExportError> {
  let reference: DependencyRef = format!("{}/{}@{}/{}", recipe.name, recipe.version, user, channel)
    .parse()
    .map_err(|_| ExportError::InvalidReference(format!("{}/{}", user, channel)))?;

  if PackageInfo::read(&layout.package_dir)?.is_none() {
    return Err(ExportError::NotPublished(layout.package_dir.clone()));
  }

  let target = cache.package_dir(&reference);
  remove_if_present(&target)?;

  let mut files = 0;
  let mut deferred_info = None;
  for (src, relative, is_symlink) in walk_files(&layout.package_dir)? {
    if relative == Path::new(PACKAGE_INFO_FILENAME) {
      deferred_info = Some(src);
      continue;
    }
    copy_entry(&src, is_symlink, &target.join(&relative))?;
    files += 1;
  }
  if let Some(src) = deferred_info {
    copy_entry(&src, false, &target.join(PACKAGE_INFO_FILENAME))?;
    files += 1;
  }

  let export_dir = cache.export_dir(&reference);
  remove_if_present(&export_dir)?;
  let exported_sources = export_sources(recipe, recipe_path, layout, cache.root(), &export_dir)?;

  info!(reference = %reference, files, exported_sources, "exported package to cache");
  Ok(ExportReport {
    reference,
    package_dir: target,
    files,
    exported_sources,
  })
}

fn export_sources(
  recipe: &Recipe,
  recipe_path: &Path,
  layout: &BuildLayout,
  cache_root: &Path,
  export_dir: &Path,
) -> Result<usize, ExportError> {
  copy_entry(recipe_path, false, &export_dir.join(crate::consts::RECIPE_FILENAME))?;
  let Ok(source_dir) = dunce::canonicalize(&layout.source_dir) else {
    return Ok(0);
  };
  if recipe.exports.is_empty() || !source_dir.is_dir() {
    return Ok(0);
  }

  // Build output, the package, its lock and the cache may all live under the
  // source dir; none of them are sources.
  let excluded: Vec<PathBuf> = [
    layout.build_dir.clone(),
    layout.package_dir.clone(),
    lock_path_for(&layout.package_dir),
    cache_root.to_path_buf(),
  ]
  .iter()
  .filter_map(|path| dunce::canonicalize(path).ok())
  .collect();

  let mut count = 0;
  let walker = WalkDir::new(&source_dir)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| !excluded.iter().any(|path| e.path() == path));
  for entry in walker {
    let entry = entry.map_err(|e| BuildError::Walk {
      path: source_dir.clone(),
      message: e.to_string(),
    })?;
    if entry.file_type().is_dir() {
      continue;
    }
    let relative = entry.path().strip_prefix(&source_dir).unwrap_or(entry.path());
    let key = relative.to_string_lossy().replace('\\', "/");
    if recipe.exports.iter().any(|pattern| wildcard_match(pattern, &key)) {
      debug!(file = %key, "exporting source");
      copy_entry(entry.path(), entry.file_type().is_symlink(), &export_dir.join(relative))?;
      count += 1;
    }
  }
  Ok(count)
}

/// Every non-directory entry below `root` as (absolute, relative, is_symlink).
fn walk_files(root: &Path) -> Result<Vec<(PathBuf, PathBuf, bool)>, BuildError> {
  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|e| BuildError::Walk {
      path: root.to_path_buf(),
      message: e.to_string(),
    })?;
    if entry.file_type().is_dir() {
      continue;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();
    files.push((entry.path().to_path_buf(), relative, entry.file_type().is_symlink()));
  }
  Ok(files)
}

fn remove_if_present(dir: &Path) -> Result<(), BuildError> {
  match std::fs::remove_dir_all(dir) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::Io {
      path: dir.to_path_buf(),
      source,
    }),
  }
}
