//! List rules command implementation.

use anyhow::Result;
use conform::rules::Preset;
use conform::{Catalog, Overrides, Setup};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::ListFormat;

/// Runs the list-rules command against the effective catalog.
pub fn run(
    path: &Path,
    config_path: Option<&Path>,
    catalog: Option<PathBuf>,
    preset: Option<String>,
    format: ListFormat,
) -> Result<()> {
    let config = config_resolver::resolve(path, config_path).load()?;
    let setup = Setup::with_overrides(config, &Overrides { preset, catalog })?;

    match format {
        ListFormat::Text => print!("{}", table(setup.catalog(), setup.preset())),
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&json(setup.catalog()))?),
    }
    Ok(())
}

fn table(catalog: &Catalog, active: Preset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rules (catalog v{}, preset {active}):\n", catalog.version());
    let _ = writeln!(out, "{:<30} {:<8} {:<40} Description", "Id", "Severity", "Roles");
    let _ = writeln!(out, "{}", "-".repeat(110));
    for rule in catalog.rules() {
        let _ = writeln!(
            out,
            "{:<30} {:<8} {:<40} {}",
            rule.id().as_str(),
            rule.severity().as_str(),
            rule.roles().to_string(),
            rule.description()
        );
    }

    out.push_str("\nPresets:\n");
    out.push_str("  recommended  - catalog severities as written (default)\n");
    out.push_str("  strict       - every rule is an error\n");
    out.push_str("  minimal      - core naming and state rules only\n");
    out.push_str("\nDisable or re-level a rule in conform.toml, e.g.:\n");
    out.push_str("  [rules.quote-style]\n  severity = \"error\"\n");
    out
}

fn json(catalog: &Catalog) -> serde_json::Value {
    catalog
        .rules()
        .iter()
        .map(|rule| {
            serde_json::json!({
                "id": rule.id().as_str(),
                "severity": rule.severity().as_str(),
                "roles": rule.roles().to_string(),
                "check": rule.check().kind(),
                "description": rule.description(),
                "doc": rule.doc_ref(),
            })
        })
        .collect()
}
