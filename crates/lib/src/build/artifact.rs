//! Artifact descriptors: which build outputs land where in a package.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
  DynamicLibrary,
  StaticLibrary,
  Header,
  Shader,
  FindModule,
}

impl ArtifactKind {
  /// Package-relative directory this kind is staged into when a recipe does not say otherwise.
  pub fn default_destination(&self) -> &'static str {
    match self {
      Self::DynamicLibrary | Self::StaticLibrary => "lib",
      Self::Header => "include",
      Self::Shader => "shaders",
      Self::FindModule => ".",
    }
  }

  /// Libraries come out of the build tree; everything else ships with the sources.
  pub fn default_root(&self) -> Root {
    match self {
      Self::DynamicLibrary | Self::StaticLibrary => Root::Build,
      Self::Header | Self::Shader | Self::FindModule => Root::Source,
    }
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::DynamicLibrary => "dynamic-library",
      Self::StaticLibrary => "static-library",
      Self::Header => "header",
      Self::Shader => "shader",
      Self::FindModule => "find-module",
    };
    f.write_str(s)
  }
}

/// Tree a descriptor's `src` is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Root {
  Source,
  Build,
}

/// One category of files to stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArtifactSpec", into = "ArtifactSpec")]
pub struct ArtifactDescriptor {
  pub kind: ArtifactKind,
  pub root: Root,
  /// Directory under `root` to search; empty means the root itself.
  pub src: PathBuf,
  /// Wildcard matched against file names (`*`, `?`).
  pub pattern: String,
  /// Package-relative destination directory.
  pub dst: PathBuf,
  /// Keep the path below `src` instead of flattening into `dst`.
  pub keep_path: bool,
}

impl ArtifactDescriptor {
  /// A flattening descriptor with the kind's default root and destination.
  pub fn new(kind: ArtifactKind, pattern: &str) -> Self {
    Self {
      kind,
      root: kind.default_root(),
      src: PathBuf::new(),
      pattern: pattern.to_string(),
      dst: PathBuf::from(kind.default_destination()),
      keep_path: false,
    }
  }

  pub fn with_dst(mut self, dst: &str) -> Self {
    self.dst = PathBuf::from(dst);
    self
  }
}

/// On-disk form of a descriptor in a recipe's `[[package.copy]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactSpec {
  kind: ArtifactKind,
  pattern: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  root: Option<Root>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  src: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  dst: Option<PathBuf>,
  #[serde(default)]
  keep_path: bool,
}

impl From<ArtifactSpec> for ArtifactDescriptor {
  fn from(spec: ArtifactSpec) -> Self {
    Self {
      kind: spec.kind,
      root: spec.root.unwrap_or_else(|| spec.kind.default_root()),
      src: spec.src.unwrap_or_default(),
      pattern: spec.pattern,
      dst: spec
        .dst
        .unwrap_or_else(|| PathBuf::from(spec.kind.default_destination())),
      keep_path: spec.keep_path,
    }
  }
}

impl From<ArtifactDescriptor> for ArtifactSpec {
  fn from(d: ArtifactDescriptor) -> Self {
    Self {
      kind: d.kind,
      pattern: d.pattern,
      root: Some(d.root),
      src: Some(d.src),
      dst: Some(d.dst),
      keep_path: d.keep_path,
    }
  }
}
