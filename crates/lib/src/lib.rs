//! stagekit-lib: Core types and logic for stagekit
//!
//! This crate provides everything needed to turn a CMake project into a
//! published package:
//! - `Recipe`: the static description of a package and its dependencies
//! - `BuildConfig`: the platform, compiler and build type one run targets
//! - `resolve`: system package installation and local cache lookups
//! - `build`: configure, compile, stage artifacts and publish metadata
//! - `export`: copy a published package into the local dependency cache

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod export;
pub mod lock;
pub mod platform;
pub mod recipe;
pub mod resolve;
pub mod util;
