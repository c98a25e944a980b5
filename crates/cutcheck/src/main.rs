//! Cutcheck CLI - check print-ready images before they are submitted.
//!
//! Cutcheck verifies that a PNG or layered PSD file matches the active
//! submission profile exactly (pixel size, container format, color mode)
//! and reports every finding. Files with blocking errors make the command
//! exit with status 1.
//!
//! # Usage
//!
//! ```bash
//! # Check a single file against the default profile
//! cutcheck check cover.psd
//!
//! # Check a directory against another profile, writing JSON Lines
//! cutcheck check ./submissions/ --profile MBF_SPACE2 --format jsonl --output results.jsonl
//!
//! # List the known submission profiles
//! cutcheck profiles
//!
//! # View configuration
//! cutcheck config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod logging;

/// Cutcheck - check print-ready images against a submission profile.
#[derive(Parser, Debug)]
#[command(name = "cutcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "CUTCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check images and report whether they may be submitted
    Check(cli::check::CheckArgs),

    /// List the known submission profiles
    Profiles(cli::profiles::ProfilesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => cutcheck_core::Config::load_from(path)?,
        None => match cutcheck_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `cutcheck config path`."
                );
                cutcheck_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Cutcheck v{}", cutcheck_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Check(args) => {
            let all_clear = cli::check::execute(args, config).await?;
            Ok(if all_clear {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Profiles(args) => {
            cli::profiles::execute(args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => {
            cli::config::execute(args, &config, cli.config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
