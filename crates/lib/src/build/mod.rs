//! Build-and-package orchestration.
//!
//! Drives CMake over a source tree and turns the results into a package:
//!
//! - [`cmake`] - configure/build command lines from a [`BuildConfig`](crate::config::BuildConfig)
//! - [`clean`] - best-effort removal of a previous build tree
//! - [`profile`] - per-OS-family artifact and flag tables
//! - [`stage`] - copying matched artifacts into the package layout
//! - [`publish`] - consumer metadata (`package_info.json`)
//! - [`pipeline`] - the ordered steps tying these together

pub mod artifact;
pub mod clean;
pub mod cmake;
pub mod pipeline;
pub mod profile;
pub mod publish;
pub mod stage;
mod types;

pub use artifact::{ArtifactDescriptor, ArtifactKind, Root};
pub use pipeline::{BuildLayout, BuildOptions, BuildReport, PackageReport, build_package, package};
pub use profile::{PlatformProfile, ProfileFlags};
pub use publish::PackageInfo;
pub use types::{BuildError, BuildStep};
