//! CLI integration tests, one module per command.

mod common;

mod build_tests;
mod deps_tests;
mod export_tests;
mod package_tests;
