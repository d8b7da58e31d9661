//! conform CLI tool.
//!
//! Usage:
//! ```bash
//! conform check [OPTIONS] [PATH]
//! conform list-rules
//! conform init
//! ```
//!
//! Exit status: 0 clean, 1 violations at or above the fail-on threshold,
//! 2 fatal setup error, 130 interrupted.

use clap::{Parser, Subcommand};
use conform::SetupError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Exit status for configuration, catalog, and I/O failures.
const EXIT_FATAL: u8 = 2;

/// Checks a TypeScript/React codebase against its coding conventions
#[derive(Parser)]
#[command(name = "conform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CONFORM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a project tree
    Check(commands::check::CheckArgs),

    /// List the rules of the effective catalog
    ListRules {
        /// Project directory whose config is used (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Catalog file replacing the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Preset to apply before listing
        #[arg(long, value_parser = commands::preset_names())]
        preset: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for `list-rules`.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned table.
    #[default]
    Text,
    /// JSON array.
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let outcome = match cli.command {
        Commands::Check(args) => commands::check::run(&args, config),
        Commands::ListRules {
            path,
            catalog,
            preset,
            format,
        } => commands::list_rules::run(&path, config, catalog, preset, format).map(|()| 0),
        Commands::Init { force } => {
            commands::init::run(std::path::Path::new("."), force).map(|()| 0)
        }
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            report_fatal(err);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Prints a fatal error; setup errors get miette's diagnostic rendering.
fn report_fatal(err: anyhow::Error) {
    match err.downcast::<SetupError>() {
        Ok(setup) => eprintln!("{:?}", miette::Report::new(setup)),
        Err(other) => eprintln!("Error: {other:#}"),
    }
}
