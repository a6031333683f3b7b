//! Implementation of the `stagekit info` command.

use anyhow::Result;

use stagekit_lib::build::PlatformProfile;
use stagekit_lib::build::cmake::CMake;
use stagekit_lib::config::Settings;
use stagekit_lib::platform::paths::package_cache_dir;
use stagekit_lib::platform::platform_triple;
use stagekit_lib::recipe::PackageInfoSection;

use super::SettingsArgs;
use crate::output::{OutputFormat, emit_json, field, flag_list, heading};

pub fn cmd_info(settings: SettingsArgs, output: OutputFormat) -> Result<()> {
  let host = platform_triple();
  let config = settings.resolve(&Settings::default())?;
  let profile = PlatformProfile::for_os(config.os);
  let flags = profile.flags(&PackageInfoSection::default());
  let patterns: Vec<String> = profile.binary_artifacts().into_iter().map(|d| d.pattern).collect();
  let cmake = CMake::new(&config);
  let generator = cmake.generator();

  if output.is_json() {
    let json_output = serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "host": host,
      "config": config,
      "profile": profile,
      "generator": generator,
      "binary_patterns": patterns,
      "flags": flags,
      "cache": package_cache_dir(),
    });
    return emit_json(&json_output);
  }

  println!("stagekit {}", env!("CARGO_PKG_VERSION"));
  println!();
  heading("System");
  field("Platform", host.as_deref().unwrap_or("unknown"));
  field("Cache", package_cache_dir().display());
  println!();
  heading("Target");
  field("Platform", config.platform().triple());
  field("Compiler", &config.compiler);
  field("Build type", config.build_type.as_str());
  field("Generator", generator.as_deref().unwrap_or("(cmake default)"));
  field("Profile", profile.as_str());
  field("Binaries", flag_list(&patterns));
  field("cppflags", flag_list(&flags.cppflags));
  field("exelinkflags", flag_list(&flags.exelinkflags));

  Ok(())
}
