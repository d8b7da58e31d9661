//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r##"# conform configuration
#
# Rules come from the built-in React/TypeScript guide catalog. List them
# with `conform list-rules`.

# recommended (default), strict, or minimal
preset = "recommended"

# Severity that makes `conform check` exit with status 1: error, warning, none
fail_on = "error"

# Replace the built-in catalog with your own (relative to this file)
# catalog = "conventions.toml"

[analyzer]
# Glob patterns to exclude, on top of the built-in ignore list
exclude = [
    "**/*.stories.tsx",
    "**/__generated__/**",
]

# Respect .gitignore files
respect_gitignore = true

# Maximum number of files processed at once (default: CPU count)
# concurrency = 8

# Assign roles by path before the naming heuristics run
# [[roles]]
# role = "util"
# paths = ["src/lib/**"]

# Extra module prefixes per import group
[import_groups]
# query = ["@acme/data"]
# internal = ["#/"]

# Each rule can be disabled or have its severity overridden

[rules.quote-style]
enabled = true
# severity = "error"

# [rules.component-body]
# enabled = false
"##;

/// File name written by `init`.
const CONFIG_NAME: &str = "conform.toml";

/// Runs the init command, writing `conform.toml` into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    tracing::debug!("Wrote {}", config_path.display());

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: conform check");

    Ok(())
}
