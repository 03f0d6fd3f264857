//! Binary entry point for intake.
//!
//! This binary provides the CLI interface for checking, importing and
//! exporting member and task records.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::ConfirmMode;
use intake::config::IntakeConfig;
use intake::io::ImportKind;
use intake::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Intake - import loosely structured member and task data.
#[derive(Parser)]
#[command(name = "intake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file (defaults to `INTAKE_CONFIG_PATH`, then the
    /// user config dir).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Analyze a payload and report validation errors without merging.
    Check {
        /// Record kind: members or tasks.
        kind: ImportKind,

        /// Input file (.json, .csv, .xlsx, .xls); reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Import a payload into a collection file.
    Import {
        /// Record kind: members or tasks.
        kind: ImportKind,

        /// Input file (.json, .csv, .xlsx, .xls); reads stdin when omitted.
        file: Option<PathBuf>,

        /// Collection file to append to (created if missing).
        #[arg(long)]
        into: PathBuf,

        /// Merge the valid rows of a partially valid import without asking.
        #[arg(long, conflicts_with = "no")]
        yes: bool,

        /// Decline partially valid imports without asking.
        #[arg(long)]
        no: bool,
    },

    /// Export a collection file as JSON or CSV.
    Export {
        /// Record kind: members or tasks.
        kind: ImportKind,

        /// Collection file to read.
        #[arg(long)]
        from: PathBuf,

        /// Output file; the extension selects the format.
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match IntakeConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: IntakeConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check { kind, file } => commands::cmd_check(&config, kind, file).await?,

        Commands::Import {
            kind,
            file,
            into,
            yes,
            no,
        } => {
            commands::cmd_import(&config, kind, file, into, ConfirmMode::from_flags(yes, no))
                .await?;
        },

        Commands::Export { kind, from, output } => commands::cmd_export(kind, &from, &output)?,
    }
    Ok(())
}
