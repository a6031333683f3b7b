//! System package verification and installation.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use super::ResolveError;
use crate::execute::{CommandRunner, Invocation};
use crate::platform::os::Os;

/// Query and mutate the OS package database.
pub trait SystemPackageManager {
  /// Human-readable backend name used in diagnostics.
  fn name(&self) -> &str;

  fn is_installed(&self, package: &str) -> impl Future<Output = Result<bool, ResolveError>> + Send;

  /// Attempt an installation. The outcome is judged by a later
  /// [`is_installed`](Self::is_installed) call, not by this method.
  fn install(&self, package: &str) -> impl Future<Output = Result<(), ResolveError>> + Send;
}

/// Debian-family backend: `dpkg -s` to query, `apt-get` to install.
pub struct Apt<'a, R> {
  runner: &'a R,
  use_sudo: bool,
}

impl<'a, R: CommandRunner + Sync> Apt<'a, R> {
  /// Prefix installs with `sudo` unless the process is already elevated.
  pub fn new(runner: &'a R) -> Self {
    Self {
      runner,
      use_sudo: !crate::platform::is_elevated(),
    }
  }

  pub fn with_sudo(runner: &'a R, use_sudo: bool) -> Self {
    Self { runner, use_sudo }
  }

  fn privileged(&self, program: &str) -> Invocation {
    if self.use_sudo {
      Invocation::new("sudo").arg(program)
    } else {
      Invocation::new(program)
    }
  }
}

impl<R: CommandRunner + Sync> SystemPackageManager for Apt<'_, R> {
  fn name(&self) -> &str {
    "apt-get"
  }

  async fn is_installed(&self, package: &str) -> Result<bool, ResolveError> {
    let output = self.runner.run(&Invocation::new("dpkg").args(["-s", package])).await?;
    Ok(dpkg_reports_installed(&output.stdout))
  }

  async fn install(&self, package: &str) -> Result<(), ResolveError> {
    let update = self.privileged("apt-get").arg("update");
    let output = self.runner.run(&update).await?;
    if !output.success() {
      warn!(code = ?output.code, "apt-get update failed");
      return Ok(());
    }

    let install = self.privileged("apt-get").args(["install", "-y", package]);
    let output = self.runner.run(&install).await?;
    if !output.success() {
      warn!(package = %package, code = ?output.code, "apt-get install failed");
    }
    Ok(())
  }
}

/// `dpkg -s` prints `Status: <want> <flag> <status>`; only `install ok installed`
/// means the package is usable. Removed packages that kept their config files
/// report `deinstall ok config-files`.
fn dpkg_reports_installed(stdout: &str) -> bool {
  stdout
    .lines()
    .filter_map(|line| line.strip_prefix("Status:"))
    .any(|status| status.trim() == "install ok installed")
}

/// Outcome of ensuring one system package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
  /// Present before anything was done.
  AlreadyInstalled,
  /// Absent at first, present after the install attempt.
  Installed,
  /// Absent, and no install was attempted.
  Missing,
  /// No package manager backend for the target OS.
  Skipped,
}

/// Check, install if missing, re-check once.
///
/// Fails with [`ResolveError::DependencyMissing`] when the package is still
/// absent after the single install attempt.
pub async fn ensure_available<M: SystemPackageManager + Sync>(
  manager: &M,
  package: &str,
) -> Result<Availability, ResolveError> {
  if manager.is_installed(package).await? {
    info!(package = %package, "system package already installed");
    return Ok(Availability::AlreadyInstalled);
  }

  warn!(
    package = %package,
    manager = %manager.name(),
    "system package is not installed, attempting to install it"
  );
  manager.install(package).await?;

  if manager.is_installed(package).await? {
    info!(package = %package, "system package installed");
    Ok(Availability::Installed)
  } else {
    Err(ResolveError::DependencyMissing {
      package: package.to_string(),
      manager: manager.name().to_string(),
    })
  }
}

/// Ensure every listed system package for `os`.
///
/// Only Linux has a backend; elsewhere each package is reported as skipped
/// without running anything. Stops at the first missing package.
pub async fn ensure_system_requirements<R: CommandRunner + Sync>(
  runner: &R,
  os: Os,
  packages: &[String],
) -> Result<Vec<(String, Availability)>, ResolveError> {
  if os != Os::Linux {
    return Ok(packages.iter().map(|p| (p.clone(), Availability::Skipped)).collect());
  }

  let apt = Apt::new(runner);
  ensure_packages(&apt, packages).await
}

/// Report each listed system package for `os` without installing anything.
pub async fn check_system_requirements<R: CommandRunner + Sync>(
  runner: &R,
  os: Os,
  packages: &[String],
) -> Result<Vec<(String, Availability)>, ResolveError> {
  if os != Os::Linux {
    return Ok(packages.iter().map(|p| (p.clone(), Availability::Skipped)).collect());
  }

  let apt = Apt::with_sudo(runner, false);
  let mut results = Vec::with_capacity(packages.len());
  for package in packages {
    let availability = if apt.is_installed(package).await? {
      Availability::AlreadyInstalled
    } else {
      Availability::Missing
    };
    results.push((package.clone(), availability));
  }
  Ok(results)
}

async fn ensure_packages<M: SystemPackageManager + Sync>(
  manager: &M,
  packages: &[String],
) -> Result<Vec<(String, Availability)>, ResolveError> {
  let mut results = Vec::with_capacity(packages.len());
  for package in packages {
    let availability = ensure_available(manager, package).await?;
    results.push((package.clone(), availability));
  }
  Ok(results)
}
