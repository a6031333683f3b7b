mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stagekit_lib::build::BuildError;
use stagekit_lib::consts::RECIPE_FILENAME;

use cmd::SettingsArgs;
use output::{OutputFormat, Status, status};

/// stagekit - build a CMake project and stage it as a consumable package
#[derive(Parser)]
#[command(name = "stagekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Install system requirements, configure, compile, stage and publish
  Build {
    /// Path to the recipe file
    #[arg(default_value = RECIPE_FILENAME)]
    recipe: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Remove the build directory before configuring
    #[arg(long)]
    clean: bool,

    /// Do not check or install system requirements
    #[arg(long)]
    skip_system_deps: bool,
  },

  /// Stage and publish from an existing build tree
  Package {
    /// Path to the recipe file
    #[arg(default_value = RECIPE_FILENAME)]
    recipe: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
  },

  /// Check system requirements and declared dependencies
  Deps {
    /// Path to the recipe file
    #[arg(default_value = RECIPE_FILENAME)]
    recipe: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Only report missing system packages, never install them
    #[arg(long)]
    check: bool,
  },

  /// Copy a published package into the local dependency cache
  Export {
    /// Path to the recipe file
    #[arg(default_value = RECIPE_FILENAME)]
    recipe: PathBuf,

    /// User part of the exported reference
    #[arg(long)]
    user: String,

    /// Channel part of the exported reference
    #[arg(long, default_value = "stable")]
    channel: String,
  },

  /// Show platform and packaging information
  Info {
    #[command(flatten)]
    settings: SettingsArgs,
  },
}

fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Build {
      recipe,
      settings,
      clean,
      skip_system_deps,
    } => cmd::cmd_build(&recipe, settings, clean, skip_system_deps, cli.output),
    Commands::Package { recipe, settings } => cmd::cmd_package(&recipe, settings, cli.output),
    Commands::Deps {
      recipe,
      settings,
      check,
    } => cmd::cmd_deps(&recipe, settings, check, cli.output),
    Commands::Export { recipe, user, channel } => cmd::cmd_export(&recipe, &user, &channel, cli.output),
    Commands::Info { settings } => cmd::cmd_info(settings, cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      status(Status::Failed, &format!("{:#}", err));
      exit_code_for(&err)
    }
  }
}

/// A failed external tool's exit code is passed through; everything else exits with 1.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
  let code = err
    .downcast_ref::<BuildError>()
    .and_then(BuildError::tool_exit_code)
    .and_then(|code| u8::try_from(code).ok())
    .filter(|code| *code != 0)
    .unwrap_or(1);
  ExitCode::from(code)
}
