//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;

use clap::builder::PossibleValuesParser;
use conform::rules::Preset;

/// Accepted `--preset` values.
pub fn preset_names() -> PossibleValuesParser {
    PossibleValuesParser::new(Preset::ALL.map(Preset::as_str))
}
