//! Shared output formatting for reports.

use anyhow::Result;
use conform::{render, OutputFormat, Report};
use std::io::{IsTerminal, Write};

/// `--format` values.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable blocks with a summary line.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
    /// One line per entry.
    Compact,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Text => Self::Text,
            ReportFormat::Json => Self::Json,
            ReportFormat::Compact => Self::Compact,
        }
    }
}

/// Whether text output should be colored.
#[must_use]
pub fn use_color(no_color: bool) -> bool {
    !no_color
        && !matches!(std::env::var_os("NO_COLOR"), Some(v) if !v.is_empty())
        && std::io::stdout().is_terminal()
}

/// Print a report to stdout in the specified format.
pub fn print(report: &Report, format: ReportFormat, color: bool) -> Result<()> {
    let rendered = render(report, format.into(), color)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
