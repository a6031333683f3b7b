//! Shared utilities.

pub mod pattern;
