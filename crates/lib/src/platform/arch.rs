use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// CPU architecture variants a recipe can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
  X86,
  X86_64,
  Armv7,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "arm" => Some(Self::Armv7),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Armv7 => "armv7",
      Self::Aarch64 => "aarch64",
    }
  }

  /// Pointer width in bits
  pub fn bits(&self) -> u8 {
    match self {
      Self::X86 | Self::Armv7 => 32,
      Self::X86_64 | Self::Aarch64 => 64,
    }
  }

  pub fn is_x86(&self) -> bool {
    matches!(self, Self::X86 | Self::X86_64)
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "x86" | "i386" | "i686" => Ok(Self::X86),
      "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
      "armv7" | "armv7hf" | "arm" => Ok(Self::Armv7),
      "aarch64" | "armv8" | "arm64" => Ok(Self::Aarch64),
      _ => Err(ParseError::UnknownArch(s.to_string())),
    }
  }
}

impl TryFrom<String> for Arch {
  type Error = ParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Arch> for String {
  fn from(arch: Arch) -> Self {
    arch.as_str().to_string()
  }
}
