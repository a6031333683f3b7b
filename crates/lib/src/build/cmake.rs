//! CMake command lines derived from a build configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, BuildType, CompilerKind};
use crate::execute::Invocation;
use crate::platform::arch::Arch;
use crate::platform::os::Os;

const CMAKE: &str = "cmake";

/// Translates a [`BuildConfig`] into configure and build invocations.
#[derive(Debug, Clone, Copy)]
pub struct CMake<'a> {
  config: &'a BuildConfig,
}

impl<'a> CMake<'a> {
  pub fn new(config: &'a BuildConfig) -> Self {
    Self { config }
  }

  fn is_msvc(&self) -> bool {
    self.config.os == Os::Windows && self.config.compiler.kind == CompilerKind::Msvc
  }

  /// Visual Studio generators hold every build type in one project.
  pub fn is_multi_config(&self) -> bool {
    self.is_msvc()
  }

  /// Visual Studio major version, when the compiler version names one.
  fn vs_major(&self) -> Option<u32> {
    let version = self.config.compiler.version.as_deref()?;
    version.split('.').next()?.parse().ok()
  }

  /// The `-G` value, or `None` to let CMake pick its platform default.
  pub fn generator(&self) -> Option<String> {
    if self.is_msvc() {
      let name = match self.vs_major()? {
        14 => "Visual Studio 14 2015",
        15 => "Visual Studio 15 2017",
        16 => "Visual Studio 16 2019",
        17 => "Visual Studio 17 2022",
        _ => return None,
      };
      // Before 2019 the target architecture is part of the generator name.
      let suffix = match (self.vs_major()?, self.config.arch) {
        (14 | 15, Arch::X86_64) => " Win64",
        (14 | 15, Arch::Armv7) => " ARM",
        _ => "",
      };
      return Some(format!("{}{}", name, suffix));
    }

    match (self.config.os, self.config.compiler.kind) {
      (Os::Windows, CompilerKind::Gcc) => Some("MinGW Makefiles".to_string()),
      _ => Some("Unix Makefiles".to_string()),
    }
  }

  /// `-A` platform for Visual Studio 2019+ (or an unversioned VS default).
  fn vs_platform(&self) -> Option<&'static str> {
    if !self.is_msvc() || matches!(self.vs_major(), Some(14 | 15)) {
      return None;
    }
    Some(match self.config.arch {
      Arch::X86 => "Win32",
      Arch::X86_64 => "x64",
      Arch::Armv7 => "ARM",
      Arch::Aarch64 => "ARM64",
    })
  }

  /// Cache entries describing the configuration.
  pub fn definitions(&self) -> BTreeMap<String, String> {
    let mut defs = BTreeMap::new();
    let compiler = &self.config.compiler;

    if !self.is_multi_config() {
      defs.insert("CMAKE_BUILD_TYPE".to_string(), self.config.build_type.to_string());
    }

    defs.insert("STAGEKIT_COMPILER".to_string(), compiler.kind.to_string());
    if let Some(version) = &compiler.version {
      defs.insert("STAGEKIT_COMPILER_VERSION".to_string(), version.clone());
    }

    if self.is_msvc() {
      let runtime = match self.config.build_type {
        BuildType::Debug => "MultiThreadedDebugDLL",
        BuildType::Release => "MultiThreadedDLL",
      };
      defs.insert("CMAKE_MSVC_RUNTIME_LIBRARY".to_string(), runtime.to_string());
    } else if self.config.arch.is_x86() && compiler.kind != CompilerKind::Msvc {
      let flag = format!("-m{}", self.config.arch.bits());
      for key in ["CMAKE_C_FLAGS", "CMAKE_CXX_FLAGS", "CMAKE_SHARED_LINKER_FLAGS"] {
        defs.insert(key.to_string(), flag.clone());
      }
    }

    defs
  }

  /// `cmake <source> [-G ...] [-A ...] -D...` run inside `build_dir`.
  ///
  /// Recipe definitions override the computed ones; `prefix_paths` becomes
  /// `CMAKE_PREFIX_PATH` so cached dependencies are found.
  pub fn configure(
    &self,
    source_dir: &Path,
    build_dir: &Path,
    extra: &BTreeMap<String, String>,
    prefix_paths: &[PathBuf],
  ) -> Invocation {
    let mut invocation = Invocation::new(CMAKE)
      .arg(source_dir.to_string_lossy())
      .current_dir(build_dir);

    if let Some(generator) = self.generator() {
      invocation = invocation.args(["-G".to_string(), generator]);
    }
    if let Some(platform) = self.vs_platform() {
      invocation = invocation.args(["-A", platform]);
    }

    let mut defs = self.definitions();
    if !prefix_paths.is_empty() {
      let joined = prefix_paths
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect::<Vec<_>>()
        .join(";");
      defs.insert("CMAKE_PREFIX_PATH".to_string(), joined);
    }
    defs.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

    invocation.args(defs.into_iter().map(|(k, v)| format!("-D{}={}", k, v)))
  }

  /// `cmake --build . [--config <type>]` run inside `build_dir`.
  pub fn build(&self, build_dir: &Path) -> Invocation {
    let invocation = Invocation::new(CMAKE).args(["--build", "."]).current_dir(build_dir);
    if self.is_multi_config() {
      invocation.args(["--config", self.config.build_type.as_str()])
    } else {
      invocation
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Compiler;

  fn config(os: Os, arch: Arch, kind: CompilerKind, version: Option<&str>, build_type: BuildType) -> BuildConfig {
    BuildConfig {
      os,
      arch,
      build_type,
      compiler: Compiler {
        kind,
        version: version.map(str::to_string),
      },
    }
  }

  #[test]
  fn linux_release_configure_line() {
    let config = config(Os::Linux, Arch::Aarch64, CompilerKind::Gcc, Some("9"), BuildType::Release);
    let cmake = CMake::new(&config);

    let invocation = cmake.configure(
      Path::new("/src/small3d"),
      Path::new("/src/small3d/_build"),
      &BTreeMap::from([("BUILD_WITH_CONAN".to_string(), "TRUE".to_string())]),
      &[],
    );

    assert_eq!(
      invocation.to_string(),
      "cmake /src/small3d -G \"Unix Makefiles\" -DBUILD_WITH_CONAN=TRUE -DCMAKE_BUILD_TYPE=Release \
       -DSTAGEKIT_COMPILER=gcc -DSTAGEKIT_COMPILER_VERSION=9"
    );
    assert_eq!(invocation.cwd, Some(PathBuf::from("/src/small3d/_build")));
  }

  #[test]
  fn x86_gcc_gets_width_flags() {
    let config = config(Os::Linux, Arch::X86, CompilerKind::Gcc, None, BuildType::Debug);
    let defs = CMake::new(&config).definitions();

    assert_eq!(defs.get("CMAKE_CXX_FLAGS").map(String::as_str), Some("-m32"));
    assert_eq!(defs.get("CMAKE_BUILD_TYPE").map(String::as_str), Some("Debug"));
  }

  #[test]
  fn single_config_build_passes_no_config_flag() {
    let config = config(Os::MacOs, Arch::Aarch64, CompilerKind::AppleClang, None, BuildType::Release);
    assert_eq!(CMake::new(&config).build(Path::new("_build")).to_string(), "cmake --build .");
  }

  #[test]
  fn old_visual_studio_encodes_arch_in_generator() {
    let config = config(Os::Windows, Arch::X86_64, CompilerKind::Msvc, Some("14"), BuildType::Release);
    let cmake = CMake::new(&config);

    assert_eq!(cmake.generator().as_deref(), Some("Visual Studio 14 2015 Win64"));
    assert!(cmake.vs_platform().is_none());
    assert!(!cmake.definitions().contains_key("CMAKE_BUILD_TYPE"));
    assert_eq!(
      cmake.build(Path::new("_build")).to_string(),
      "cmake --build . --config Release"
    );
  }

  #[test]
  fn new_visual_studio_uses_platform_flag() {
    let config = config(Os::Windows, Arch::X86, CompilerKind::Msvc, Some("17"), BuildType::Debug);
    let invocation = CMake::new(&config).configure(Path::new("C:/src"), Path::new("C:/src/_build"), &BTreeMap::new(), &[]);

    let line = invocation.to_string();
    assert!(line.contains("-G \"Visual Studio 17 2022\" -A Win32"), "{line}");
    assert!(line.contains("-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreadedDebugDLL"), "{line}");
  }

  #[test]
  fn mingw_generator_on_windows_gcc() {
    let config = config(Os::Windows, Arch::X86_64, CompilerKind::Gcc, None, BuildType::Release);
    let cmake = CMake::new(&config);

    assert_eq!(cmake.generator().as_deref(), Some("MinGW Makefiles"));
    assert!(!cmake.is_multi_config());
  }

  #[test]
  fn prefix_paths_are_joined() {
    let config = config(Os::Linux, Arch::Aarch64, CompilerKind::Clang, None, BuildType::Release);
    let invocation = CMake::new(&config).configure(
      Path::new("."),
      Path::new("_build"),
      &BTreeMap::new(),
      &[PathBuf::from("/cache/zlib"), PathBuf::from("/cache/glm")],
    );

    assert!(invocation.args.contains(&"-DCMAKE_PREFIX_PATH=/cache/zlib;/cache/glm".to_string()));
  }
}
