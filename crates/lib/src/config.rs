//! Build configuration: the settings one invocation builds a package for.
//!
//! A [`BuildConfig`] is assembled once per run from three layers, highest
//! precedence first: command-line overrides, the recipe's `[settings]` table,
//! and detection of the host platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::platform::{ParseError, Platform};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  Platform(#[from] ParseError),

  #[error("unknown build type: {0} (expected Debug or Release)")]
  UnknownBuildType(String),

  #[error("unknown compiler: {0}")]
  UnknownCompiler(String),

  #[error("host platform is not supported; pass --os and --arch explicitly")]
  UnsupportedHost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildType {
  Debug,
  #[default]
  Release,
}

impl BuildType {
  /// The spelling CMake expects for `CMAKE_BUILD_TYPE` and `--config`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      _ => Err(ConfigError::UnknownBuildType(s.to_string())),
    }
  }
}

impl TryFrom<String> for BuildType {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<BuildType> for String {
  fn from(value: BuildType) -> Self {
    value.as_str().to_string()
  }
}

/// Compiler toolchains the CMake helper knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompilerKind {
  Msvc,
  Gcc,
  Clang,
  AppleClang,
}

impl CompilerKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Msvc => "Visual Studio",
      Self::Gcc => "gcc",
      Self::Clang => "clang",
      Self::AppleClang => "apple-clang",
    }
  }

  /// The toolchain a host OS builds with when nothing else is requested.
  pub fn default_for(os: Os) -> Self {
    match os {
      Os::Windows => Self::Msvc,
      Os::MacOs => Self::AppleClang,
      Os::Linux => Self::Gcc,
      Os::FreeBsd => Self::Clang,
    }
  }
}

impl fmt::Display for CompilerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CompilerKind {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "visual studio" | "msvc" | "vs" => Ok(Self::Msvc),
      "gcc" | "mingw" => Ok(Self::Gcc),
      "clang" => Ok(Self::Clang),
      "apple-clang" | "apple_clang" | "appleclang" => Ok(Self::AppleClang),
      _ => Err(ConfigError::UnknownCompiler(s.to_string())),
    }
  }
}

impl TryFrom<String> for CompilerKind {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<CompilerKind> for String {
  fn from(value: CompilerKind) -> Self {
    value.as_str().to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
  pub kind: CompilerKind,
  pub version: Option<String>,
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{} {}", self.kind, version),
      None => write!(f, "{}", self.kind),
    }
  }
}

/// Partially specified settings, as found in a recipe or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
  pub os: Option<Os>,
  pub arch: Option<Arch>,
  pub build_type: Option<BuildType>,
  pub compiler: Option<CompilerKind>,
  pub compiler_version: Option<String>,
}

impl Settings {
  /// Fill every unset field from `fallback`.
  pub fn or(self, fallback: &Settings) -> Settings {
    Settings {
      os: self.os.or(fallback.os),
      arch: self.arch.or(fallback.arch),
      build_type: self.build_type.or(fallback.build_type),
      compiler: self.compiler.or(fallback.compiler),
      compiler_version: self.compiler_version.or_else(|| fallback.compiler_version.clone()),
    }
  }
}

/// Fully resolved settings for one build. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
  pub os: Os,
  pub arch: Arch,
  pub build_type: BuildType,
  pub compiler: Compiler,
}

impl BuildConfig {
  /// Resolve settings against the host platform.
  ///
  /// The compiler defaults to the target OS's usual toolchain, and the build
  /// type defaults to Release.
  pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
    let host = Platform::current();
    let os = settings
      .os
      .or(host.map(|p| p.os))
      .ok_or(ConfigError::UnsupportedHost)?;
    let arch = settings
      .arch
      .or(host.map(|p| p.arch))
      .ok_or(ConfigError::UnsupportedHost)?;

    Ok(Self {
      os,
      arch,
      build_type: settings.build_type.unwrap_or_default(),
      compiler: Compiler {
        kind: settings.compiler.unwrap_or_else(|| CompilerKind::default_for(os)),
        version: settings.compiler_version.clone(),
      },
    })
  }

  pub fn platform(&self) -> Platform {
    Platform::new(self.arch, self.os)
  }
}
