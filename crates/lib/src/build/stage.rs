//! Artifact staging: copy build outputs into the package layout.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::artifact::{ArtifactDescriptor, Root};
use super::types::BuildError;
use crate::util::pattern::wildcard_match;

/// Source and build trees a descriptor's `root` refers to.
#[derive(Debug, Clone)]
pub struct StageRoots {
  pub source: PathBuf,
  pub build: PathBuf,
}

impl StageRoots {
  fn get(&self, root: Root) -> &Path {
    match root {
      Root::Source => &self.source,
      Root::Build => &self.build,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageReport {
  /// Package-relative paths of every file written, each listed once.
  pub copied: Vec<PathBuf>,
  /// Descriptors that matched nothing, as `kind:pattern`.
  pub misses: Vec<String>,
}

/// Copy every descriptor's matches into `package_dir`.
///
/// A descriptor with no matches (or a missing source directory) is skipped
/// and recorded in [`StageReport::misses`]. Destination directories are only
/// created when a file is copied into them. The package directory itself is
/// never searched, even when it lies inside one of the roots. When flattening
/// maps two sources onto one target, the later file (in walk order) wins.
pub fn stage(
  descriptors: &[ArtifactDescriptor],
  roots: &StageRoots,
  package_dir: &Path,
) -> Result<StageReport, BuildError> {
  std::fs::create_dir_all(package_dir).map_err(|source| BuildError::Io {
    path: package_dir.to_path_buf(),
    source,
  })?;
  let package_canonical = dunce::canonicalize(package_dir).map_err(|source| BuildError::Io {
    path: package_dir.to_path_buf(),
    source,
  })?;

  let mut report = StageReport::default();
  let mut written = BTreeSet::new();

  for descriptor in descriptors {
    let copied = stage_one(descriptor, roots, package_dir, &package_canonical)?;
    if copied.is_empty() {
      debug!(kind = %descriptor.kind, pattern = %descriptor.pattern, "no files matched");
      report.misses.push(format!("{}:{}", descriptor.kind, descriptor.pattern));
    } else {
      debug!(kind = %descriptor.kind, pattern = %descriptor.pattern, count = copied.len(), "staged files");
      for path in copied {
        if written.insert(path.clone()) {
          report.copied.push(path);
        } else {
          debug!(path = %path.display(), "staged file overwritten by a later match");
        }
      }
    }
  }

  info!(copied = report.copied.len(), misses = report.misses.len(), "staging complete");
  Ok(report)
}

fn stage_one(
  descriptor: &ArtifactDescriptor,
  roots: &StageRoots,
  package_dir: &Path,
  package_canonical: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
  let base = roots.get(descriptor.root).join(&descriptor.src);
  let Ok(base) = dunce::canonicalize(&base) else {
    return Ok(Vec::new());
  };
  if !base.is_dir() {
    return Ok(Vec::new());
  }

  let walker = WalkDir::new(&base)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.path() != package_canonical);

  let mut copied = Vec::new();
  for entry in walker {
    let entry = entry.map_err(|e| BuildError::Walk {
      path: base.clone(),
      message: e.to_string(),
    })?;
    if entry.file_type().is_dir() {
      continue;
    }
    if !wildcard_match(&descriptor.pattern, &entry.file_name().to_string_lossy()) {
      continue;
    }

    let relative = if descriptor.keep_path {
      entry.path().strip_prefix(&base).unwrap_or(entry.path()).to_path_buf()
    } else {
      PathBuf::from(entry.file_name())
    };
    let package_relative = normalize(&descriptor.dst.join(&relative));
    let target = package_dir.join(&package_relative);

    copy_entry(entry.path(), entry.file_type().is_symlink(), &target)?;
    copied.push(package_relative);
  }

  Ok(copied)
}

/// Drop `.` components so `./Find.cmake` reports as `Find.cmake`.
fn normalize(path: &Path) -> PathBuf {
  path
    .components()
    .filter(|c| !matches!(c, std::path::Component::CurDir))
    .collect()
}

/// Copy one file, recreating symlinks (e.g. `libfoo.so -> libfoo.so.1`) where the platform allows.
pub(crate) fn copy_entry(src: &Path, is_symlink: bool, target: &Path) -> Result<(), BuildError> {
  let io_err = |path: &Path, source| BuildError::Io {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = target.parent() {
    std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
  }

  #[cfg(unix)]
  if is_symlink {
    let link = std::fs::read_link(src).map_err(|e| io_err(src, e))?;
    if std::fs::symlink_metadata(target).is_ok() {
      std::fs::remove_file(target).map_err(|e| io_err(target, e))?;
    }
    std::os::unix::fs::symlink(&link, target).map_err(|e| io_err(target, e))?;
    return Ok(());
  }

  #[cfg(not(unix))]
  let _ = is_symlink;

  std::fs::copy(src, target).map_err(|e| io_err(target, e))?;
  Ok(())
}
