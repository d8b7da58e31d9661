//! Check command implementation.

use anyhow::{Context, Result};
use conform::{AnalyzerError, Config, FailOn, Overrides, SetupError, Setup, SeverityFilter};
use std::path::{Path, PathBuf};

use super::output::{self, ReportFormat};
use crate::config_resolver;

/// Exit status when the run is interrupted.
const EXIT_INTERRUPTED: u8 = 130;

/// Arguments of `conform check`.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Project root to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Which entries to show; never affects the exit status
    #[arg(long, value_enum, default_value_t = SeverityArg::All)]
    pub severity: SeverityArg,

    /// Severity that makes the run fail (default: from config, else error)
    #[arg(long, value_enum)]
    pub fail_on: Option<FailOnArg>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Catalog file replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Preset to apply
    #[arg(long, value_parser = super::preset_names())]
    pub preset: Option<String>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Disable colored output (also honors `NO_COLOR`)
    #[arg(long)]
    pub no_color: bool,
}

/// `--severity` values.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SeverityArg {
    /// Errors only.
    Error,
    /// Warnings only.
    Warning,
    /// Everything.
    All,
}

impl From<SeverityArg> for SeverityFilter {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Error => Self::Error,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::All => Self::All,
        }
    }
}

/// `--fail-on` values.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FailOnArg {
    /// Fail on any error.
    Error,
    /// Fail on any warning or error.
    Warning,
    /// Never fail because of findings.
    None,
}

impl From<FailOnArg> for FailOn {
    fn from(arg: FailOnArg) -> Self {
        match arg {
            FailOnArg::Error => Self::Error,
            FailOnArg::Warning => Self::Warning,
            FailOnArg::None => Self::None,
        }
    }
}

/// Runs the check command and returns the process exit status.
///
/// # Errors
///
/// Returns an error for invalid config or catalog, an unreadable root, or a
/// runtime that cannot start.
pub fn run(args: &CheckArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = config_resolver::resolve(&args.path, config_path).load()?;
    let config = apply_cli(config, args);

    let overrides = Overrides {
        preset: args.preset.clone(),
        catalog: args.catalog.clone(),
    };
    let setup = Setup::with_overrides(config, &overrides)?;
    let analyzer = setup
        .analyzer(&args.path)?
        .build()
        .map_err(SetupError::from)?;

    tracing::info!(
        "Checking {} with {} rules ({} workers)",
        args.path.display(),
        analyzer.rule_count(),
        analyzer.concurrency()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(analyzer.concurrency())
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let report = match runtime.block_on(analyzer.run_until(interrupted())) {
        Ok(report) => report,
        Err(AnalyzerError::Cancelled) => {
            eprintln!("Interrupted; no results reported.");
            return Ok(EXIT_INTERRUPTED);
        }
        Err(e) => return Err(SetupError::from(e).into()),
    };

    let shown = SeverityFilter::from(args.severity).apply(&report);
    output::print(&shown, args.format, output::use_color(args.no_color))?;

    let fail_on = setup.fail_on(args.fail_on.map(FailOn::from));
    Ok(report.exit_code(fail_on))
}

/// Folds command-line flags into the loaded config.
fn apply_cli(mut config: Config, args: &CheckArgs) -> Config {
    config.analyzer.exclude.extend(args.exclude.iter().cloned());
    if args.concurrency.is_some() {
        config.analyzer.concurrency = args.concurrency;
    }
    config
}

/// Resolves on Ctrl-C. Never resolves where signals are unavailable.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
