//! Configuration types for conform.

use crate::pattern::{GlobPattern, PatternError};
use crate::source::{FileRole, RoleResolver};
use crate::types::{FailOn, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Top-level configuration (`conform.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (`recommended`, `strict`, `minimal`).
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold that fails a run (default: `error`).
    #[serde(default)]
    pub fail_on: Option<FailOn>,

    /// Catalog file replacing the built-in guide catalog.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Role globs, consulted before the built-in heuristics.
    #[serde(default)]
    pub roles: Vec<RoleConfig>,

    /// Extra module prefixes per import group (e.g., `query = ["@acme/data"]`).
    #[serde(default)]
    pub import_groups: BTreeMap<String, Vec<String>>,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;
        // A relative catalog path is relative to the config file.
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot: glob syntax, role and group names.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.analyzer.exclude {
            GlobPattern::new(pattern)?;
        }
        self.role_resolver()?;
        for group in self.import_groups.keys() {
            group
                .parse::<crate::ir::ImportGroup>()
                .map_err(|message| ConfigError::Invalid { message })?;
        }
        if self.analyzer.concurrency == Some(0) {
            return Err(ConfigError::Invalid {
                message: "analyzer.concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the role resolver from `[[roles]]`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown role name or an invalid glob.
    pub fn role_resolver(&self) -> Result<RoleResolver, ConfigError> {
        let overrides = self
            .roles
            .iter()
            .map(|entry| {
                let role: FileRole = entry
                    .role
                    .parse()
                    .map_err(|message| ConfigError::Invalid { message })?;
                let patterns = entry
                    .paths
                    .iter()
                    .map(|p| GlobPattern::new(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((role, patterns))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(RoleResolver::new(overrides))
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Effective fail-on threshold.
    #[must_use]
    pub fn fail_on(&self) -> FailOn {
        self.fail_on.unwrap_or_default()
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Glob patterns to exclude, added to the built-in ignore list.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect `.gitignore` files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files processed at once.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
            concurrency: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A `[[roles]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role name (e.g., `hook`).
    pub role: String,
    /// Glob patterns for file paths.
    pub paths: Vec<String>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A well-formed but invalid value.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },

    /// A glob that does not compile.
    #[error("Invalid config: {0}")]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_on(), FailOn::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "warning"

[analyzer]
exclude = ["**/generated/**"]
concurrency = 4

[[roles]]
role = "util"
paths = ["src/shared/**"]

[import_groups]
query = ["@acme/data"]

[rules.quote-style]
enabled = false

[rules.class-name-order]
severity = "error"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.fail_on(), FailOn::Warning);
        assert_eq!(config.analyzer.concurrency, Some(4));
        assert!(!config.is_rule_enabled("quote-style"));
        assert!(config.is_rule_enabled("import-order"));
        assert_eq!(config.rule_severity("class-name-order"), Some(Severity::Error));

        let resolver = config.role_resolver().unwrap();
        assert_eq!(
            resolver.resolve(Path::new("src/shared/Button.tsx")),
            FileRole::Util
        );
    }

    #[test]
    fn rejects_unknown_role_and_group() {
        let err = Config::parse("[[roles]]\nrole = \"widget\"\npaths = [\"src/**\"]\n").unwrap_err();
        assert!(err.to_string().contains("unknown role `widget`"));

        let err = Config::parse("[import_groups]\nstate = [\"zustand\"]\n").unwrap_err();
        assert!(err.to_string().contains("unknown import group `state`"));
    }

    #[test]
    fn rejects_bad_glob_and_zero_concurrency() {
        assert!(matches!(
            Config::parse("[analyzer]\nexclude = [\"src/[oops\"]\n"),
            Err(ConfigError::Pattern(_))
        ));
        assert!(matches!(
            Config::parse("[analyzer]\nconcurrency = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn catalog_path_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conform.toml");
        std::fs::write(&path, "catalog = \"rules/guide.toml\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.catalog, Some(dir.path().join("rules/guide.toml")));
    }
}
