//! Dependency references (`name/version@user/channel`) and per-dependency options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReferenceError {
  #[error("invalid dependency reference '{0}': expected name/version@user/channel")]
  InvalidReference(String),

  #[error("invalid dependency option '{0}': expected package:option=value")]
  InvalidOption(String),
}

/// A declared third-party package, fixed at recipe-authoring time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyRef {
  pub name: String,
  pub version: String,
  pub user: String,
  pub channel: String,
}

impl FromStr for DependencyRef {
  type Err = ReferenceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ReferenceError::InvalidReference(s.to_string());

    let (name_version, user_channel) = s.trim().split_once('@').ok_or_else(invalid)?;
    let (name, version) = name_version.split_once('/').ok_or_else(invalid)?;
    let (user, channel) = user_channel.split_once('/').ok_or_else(invalid)?;

    let parts = [name, version, user, channel];
    if parts.iter().any(|p| p.is_empty() || p.contains(['/', '@', ' '])) {
      return Err(invalid());
    }

    Ok(Self {
      name: name.to_string(),
      version: version.to_string(),
      user: user.to_string(),
      channel: channel.to_string(),
    })
  }
}

impl fmt::Display for DependencyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}@{}/{}", self.name, self.version, self.user, self.channel)
  }
}

impl TryFrom<String> for DependencyRef {
  type Error = ReferenceError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<DependencyRef> for String {
  fn from(value: DependencyRef) -> Self {
    value.to_string()
  }
}

/// A `package:option=value` setting applied to one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyOption {
  pub package: String,
  pub key: String,
  pub value: String,
}

impl FromStr for DependencyOption {
  type Err = ReferenceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ReferenceError::InvalidOption(s.to_string());

    let (package, assignment) = s.trim().split_once(':').ok_or_else(invalid)?;
    let (key, value) = assignment.split_once('=').ok_or_else(invalid)?;
    let (package, key, value) = (package.trim(), key.trim(), value.trim());
    if package.is_empty() || key.is_empty() {
      return Err(invalid());
    }

    Ok(Self {
      package: package.to_string(),
      key: key.to_string(),
      value: value.to_string(),
    })
  }
}

impl fmt::Display for DependencyOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}={}", self.package, self.key, self.value)
  }
}

impl TryFrom<String> for DependencyOption {
  type Error = ReferenceError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<DependencyOption> for String {
  fn from(value: DependencyOption) -> Self {
    value.to_string()
  }
}
