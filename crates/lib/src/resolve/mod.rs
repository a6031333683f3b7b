//! Dependency resolution.
//!
//! Two kinds of dependencies are handled here:
//! - system packages, installed through the OS package manager when missing
//!   ([`system`]);
//! - declared third-party packages, looked up in the local package cache
//!   ([`cache`]).

pub mod cache;
pub mod system;

use thiserror::Error;

use crate::execute::ExecuteError;

pub use cache::{CachedPackage, DependencyCache, RequirementStatus, resolve_requirements};
pub use system::{
  Apt, Availability, SystemPackageManager, check_system_requirements, ensure_available, ensure_system_requirements,
};

#[derive(Debug, Error)]
pub enum ResolveError {
  /// A required system package is still absent after an install attempt.
  #[error("{package} could not be installed with {manager}; install it manually and try again")]
  DependencyMissing { package: String, manager: String },

  #[error(transparent)]
  Execute(#[from] ExecuteError),
}
