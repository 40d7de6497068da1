mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// stagebuild - staleness-aware multi-stage build orchestrator
#[derive(Parser)]
#[command(name = "stagebuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the configured stages in order
  Compile {
    /// Path to stagebuild.toml or its directory (default: ./stagebuild.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rerun every stage even if its sources are unchanged
    #[arg(short, long)]
    force: bool,

    /// Skip the consolidation stage
    #[arg(long)]
    no_consolidate: bool,

    /// Override the build directory
    #[arg(long)]
    build_path: Option<PathBuf>,

    /// Arguments forwarded to every stage
    #[arg(last = true)]
    args: Vec<String>,
  },

  /// List the registered stages
  Stages {
    /// Path to stagebuild.toml or its directory (default: ./stagebuild.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show whether the lock manifest is stale, without changing anything
  Status {
    /// Path to stagebuild.toml or its directory (default: ./stagebuild.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the build directory
    #[arg(long)]
    build_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Compile {
      config,
      force,
      no_consolidate,
      build_path,
      args,
    } => cmd::cmd_compile(cmd::CompileArgs {
      config,
      force,
      no_consolidate,
      build_path,
      args,
    }),
    Commands::Stages { config, format } => cmd::cmd_stages(config.as_deref(), format),
    Commands::Status {
      config,
      build_path,
      format,
    } => cmd::cmd_status(config.as_deref(), build_path.as_deref(), format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
