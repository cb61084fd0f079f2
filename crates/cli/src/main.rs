mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, Status, print_status};

/// assetsync - Fetch precompiled web assets from a remote bucket
#[derive(Parser)]
#[command(name = "assetsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the config file (default: config/asset_sync.yml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Project root that relative paths are resolved against (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Download assets into the public path
  Download {
    /// One of manifest, asset_files, webpacker_manifest, webpacker_asset_files
    #[arg(default_value = "asset_files")]
    target: String,
  },

  /// Show what a download would fetch, without fetching
  Plan {
    /// One of manifest, asset_files, webpacker_manifest, webpacker_asset_files
    #[arg(default_value = "asset_files")]
    target: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let config = cli.config.as_deref();
  let root = cli.root.as_deref();

  let result = match &cli.command {
    Commands::Download { target } => cmd::cmd_download(config, root, target, cli.output),
    Commands::Plan { target } => cmd::cmd_plan(config, root, target, cli.output),
  };

  if let Err(e) = result {
    print_status(Status::Failed, &format!("{:#}", e));
    std::process::exit(1);
  }
}
