//! Platform profiles: per-OS-family packaging rules as data.
//!
//! The profile is chosen once from the build configuration and supplies both
//! the binary artifact descriptors and the consumer flags for that family.

use serde::Serialize;

use super::artifact::{ArtifactDescriptor, ArtifactKind};
use crate::platform::os::{Os, OsFamily};
use crate::recipe::{FlagAdditions, PackageInfoSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformProfile {
  Windows,
  MacLike,
  UnixLike,
}

/// Flags and extra libraries a consumer applies when linking the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileFlags {
  pub system_libs: Vec<String>,
  pub cppflags: Vec<String>,
  pub exelinkflags: Vec<String>,
  pub sharedlinkflags: Vec<String>,
}

impl PlatformProfile {
  pub fn for_os(os: Os) -> Self {
    match os.family() {
      OsFamily::Windows => Self::Windows,
      OsFamily::MacLike => Self::MacLike,
      OsFamily::UnixLike => Self::UnixLike,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::MacLike => "mac-like",
      Self::UnixLike => "unix-like",
    }
  }

  /// Library descriptors for this family, matched against the build tree.
  pub fn binary_artifacts(&self) -> Vec<ArtifactDescriptor> {
    match self {
      Self::Windows => vec![
        ArtifactDescriptor::new(ArtifactKind::DynamicLibrary, "*.dll").with_dst("bin"),
        ArtifactDescriptor::new(ArtifactKind::StaticLibrary, "*.lib"),
      ],
      Self::MacLike => vec![
        ArtifactDescriptor::new(ArtifactKind::StaticLibrary, "*.a"),
        ArtifactDescriptor::new(ArtifactKind::DynamicLibrary, "*.dylib"),
      ],
      Self::UnixLike => vec![
        ArtifactDescriptor::new(ArtifactKind::DynamicLibrary, "*.so*"),
        ArtifactDescriptor::new(ArtifactKind::StaticLibrary, "*.a"),
      ],
    }
  }

  /// Family flags followed by the recipe's additions for that family.
  pub fn flags(&self, info: &PackageInfoSection) -> ProfileFlags {
    let std_flag = format!("-std={}", info.cppstd);

    let (mut flags, additions) = match self {
      Self::Windows => (
        ProfileFlags {
          exelinkflags: vec!["/NODEFAULTLIB:LIBCMTD".to_string(), "/NODEFAULTLIB:LIBCMT".to_string()],
          ..Default::default()
        },
        &info.windows,
      ),
      Self::MacLike => (
        ProfileFlags {
          cppflags: vec![std_flag, "-stdlib=libc++".to_string()],
          ..Default::default()
        },
        &info.macos,
      ),
      Self::UnixLike => (
        ProfileFlags {
          cppflags: vec![std_flag, "-Wl,--no-as-needed".to_string()],
          exelinkflags: info.unix.system_libs.iter().map(|lib| format!("-l{}", lib)).collect(),
          ..Default::default()
        },
        &info.unix,
      ),
    };

    merge(&mut flags, additions);
    flags
  }
}

fn merge(flags: &mut ProfileFlags, additions: &FlagAdditions) {
  flags.system_libs.extend(additions.system_libs.iter().cloned());
  flags.cppflags.extend(additions.cppflags.iter().cloned());
  flags.exelinkflags.extend(additions.exelinkflags.iter().cloned());
  flags.sharedlinkflags.extend(additions.sharedlinkflags.iter().cloned());
}
