//! Package metadata published for downstream consumers.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use super::profile::PlatformProfile;
use super::types::BuildError;
use crate::config::BuildConfig;
use crate::consts::PACKAGE_INFO_FILENAME;
use crate::recipe::Recipe;

/// Everything a consumer needs to compile and link against a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
  pub platform: String,
  pub build_type: String,
  pub compiler: String,
  pub libs: Vec<String>,
  pub system_libs: Vec<String>,
  pub cppflags: Vec<String>,
  pub exelinkflags: Vec<String>,
  pub sharedlinkflags: Vec<String>,
  pub include_dirs: Vec<String>,
  pub lib_dirs: Vec<String>,
  pub bin_dirs: Vec<String>,
  pub res_dirs: Vec<String>,
}

impl PackageInfo {
  /// Compute the full metadata for a recipe built with `config`.
  pub fn assemble(recipe: &Recipe, config: &BuildConfig) -> Self {
    let profile = PlatformProfile::for_os(config.os);
    let flags = profile.flags(&recipe.package_info);

    Self {
      name: recipe.name.clone(),
      version: recipe.version.clone(),
      platform: config.platform().triple(),
      build_type: config.build_type.to_string(),
      compiler: config.compiler.to_string(),
      libs: recipe.package_info.libs.clone(),
      system_libs: flags.system_libs,
      cppflags: flags.cppflags,
      exelinkflags: flags.exelinkflags,
      sharedlinkflags: flags.sharedlinkflags,
      include_dirs: vec!["include".to_string()],
      lib_dirs: vec!["lib".to_string()],
      bin_dirs: vec!["bin".to_string()],
      res_dirs: vec!["shaders".to_string()],
    }
  }

  /// Read the metadata of a published package, `None` if it was never published.
  pub fn read(package_dir: &Path) -> Result<Option<Self>, BuildError> {
    let path = package_dir.join(PACKAGE_INFO_FILENAME);
    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(BuildError::Io { path, source }),
    };
    serde_json::from_str(&content)
      .map(Some)
      .map_err(|e| BuildError::InvalidPackageInfo {
        path,
        message: e.to_string(),
      })
  }
}

/// Write `package_info.json` into `package_dir`.
///
/// The file is written to a temporary sibling and renamed into place, so
/// readers see either the previous metadata or the complete new one.
pub fn publish(package_dir: &Path, info: &PackageInfo) -> Result<(), BuildError> {
  let io_err = |source| BuildError::Io {
    path: package_dir.to_path_buf(),
    source,
  };

  std::fs::create_dir_all(package_dir).map_err(io_err)?;
  let json = serde_json::to_string_pretty(info).map_err(|e| BuildError::InvalidPackageInfo {
    path: package_dir.join(PACKAGE_INFO_FILENAME),
    message: e.to_string(),
  })?;

  let mut file = NamedTempFile::new_in(package_dir).map_err(io_err)?;
  file.write_all(json.as_bytes()).map_err(io_err)?;
  file.flush().map_err(io_err)?;

  let target = package_dir.join(PACKAGE_INFO_FILENAME);
  file.persist(&target).map_err(|e| BuildError::Io {
    path: target.clone(),
    source: e.error,
  })?;

  info!(path = %target.display(), libs = ?info.libs, "published package metadata");
  Ok(())
}
