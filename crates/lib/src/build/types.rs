//! Error and step types for the build-and-package pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::execute::ExecuteError;

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStep {
  Clean,
  Configure,
  Compile,
  Stage,
  Publish,
}

impl fmt::Display for BuildStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Clean => "clean",
      Self::Configure => "configure",
      Self::Compile => "compile",
      Self::Stage => "stage",
      Self::Publish => "publish",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Error)]
pub enum BuildError {
  /// CMake exited non-zero during configure or compile.
  #[error("{step} failed with exit code {code:?}: {cmd}")]
  ToolFailed {
    step: BuildStep,
    cmd: String,
    code: Option<i32>,
  },

  #[error(transparent)]
  Execute(#[from] ExecuteError),

  #[error("io error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to walk {path}: {message}")]
  Walk { path: PathBuf, message: String },

  #[error("invalid package metadata at {path}: {message}")]
  InvalidPackageInfo { path: PathBuf, message: String },
}

impl BuildError {
  /// Exit code of the failed external tool, if that is what went wrong.
  pub fn tool_exit_code(&self) -> Option<i32> {
    match self {
      Self::ToolFailed { code, .. } => *code,
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tool_failure_message_names_step() {
    let err = BuildError::ToolFailed {
      step: BuildStep::Compile,
      cmd: "cmake --build .".to_string(),
      code: Some(2),
    };

    assert_eq!(err.to_string(), "compile failed with exit code Some(2): cmake --build .");
    assert_eq!(err.tool_exit_code(), Some(2));
  }
}
