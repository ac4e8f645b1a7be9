mod cmd;
mod output;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{ProjectArgs, cmd_clean, cmd_compile, cmd_env, cmd_info};
use crate::output::print_error;

/// portc - native port compiler
#[derive(Parser)]
#[command(name = "portc")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(flatten)]
  project: ProjectArgs,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile stale sources and relink stale targets
  Compile {
    /// Print the build report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Remove targets, objects and dependency files
  Clean {
    /// Print removed paths as JSON
    #[arg(long)]
    json: bool,
  },

  /// Print the resolved build environment
  Env {
    /// Resolve the environment of the spec building this target
    #[arg(long, value_name = "TARGET")]
    spec: Option<String>,

    /// Include variables inherited unchanged from the process environment
    #[arg(long)]
    all: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show platform and runtime information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = match cli.verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Compile { json } => cmd_compile(&cli.project, json),
    Commands::Clean { json } => cmd_clean(&cli.project, json),
    Commands::Env { spec, all, json } => cmd_env(&cli.project, spec.as_deref(), all, json),
    Commands::Info => cmd_info(&cli.project),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
