//! Wires configuration, catalog, presets, and the normalizer together.

use conform_core::catalog::load_catalog_file;
use conform_core::{
    evaluate_file, Analyzer, AnalyzerBuilder, AnalyzerError, Catalog, CatalogError, Config,
    ConfigError, FailOn, Normalizer, Report, RuleEngine, SourceFile, Violation,
};
use conform_rules::{builtin_catalog, Preset};
use conform_ts::{ImportClassifier, TsxNormalizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Config file names searched in a project root, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["conform.toml", ".conform.toml"];

/// Errors raised before any file is analyzed.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SetupError {
    /// The configuration file is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog is unreadable or invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    /// Unknown preset name.
    #[error("{0}")]
    Preset(String),

    /// `[import_groups]` names an unknown group.
    #[error("invalid import groups: {0}")]
    ImportGroups(String),

    /// The analyzer could not be built or the run failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Command-line style overrides that take priority over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Preset name.
    pub preset: Option<String>,
    /// Catalog file.
    pub catalog: Option<PathBuf>,
}

/// A resolved run setup: effective catalog and normalizer for a config.
pub struct Setup {
    config: Config,
    catalog: Arc<Catalog>,
    normalizer: Arc<dyn Normalizer>,
    preset: Preset,
    unknown_rules: Vec<String>,
}

impl Setup {
    /// Resolves a setup from config alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog, preset, or import groups are invalid.
    pub fn new(config: Config) -> Result<Self, SetupError> {
        Self::with_overrides(config, &Overrides::default())
    }

    /// Resolves a setup; `overrides` win over the config file.
    ///
    /// The catalog passes through the preset first and then the
    /// `[rules.<id>]` overrides, so config severities have the last word.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog, preset, or import groups are invalid.
    pub fn with_overrides(config: Config, overrides: &Overrides) -> Result<Self, SetupError> {
        let preset = resolve_preset(overrides.preset.as_deref(), &config)?;
        let catalog = load_catalog(overrides.catalog.as_deref(), &config)?;
        let (catalog, unknown_rules) = preset.apply(catalog).apply_config(&config);
        for id in &unknown_rules {
            warn!(rule = %id, "Config references a rule not in the catalog");
        }

        let classifier =
            ImportClassifier::with_groups(&config.import_groups).map_err(SetupError::ImportGroups)?;
        info!(preset = %preset, rules = catalog.len(), "Catalog ready");

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            normalizer: Arc::new(TsxNormalizer::with_classifier(classifier)),
            preset,
            unknown_rules,
        })
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The effective catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The applied preset.
    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// `[rules.<id>]` entries naming no catalog rule.
    #[must_use]
    pub fn unknown_rules(&self) -> &[String] {
        &self.unknown_rules
    }

    /// Effective fail-on threshold: explicit value, else config, else `error`.
    #[must_use]
    pub fn fail_on(&self, explicit: Option<FailOn>) -> FailOn {
        explicit.unwrap_or_else(|| self.config.fail_on())
    }

    /// An analyzer builder rooted at `root` with config excludes, roles,
    /// and concurrency applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a role glob is invalid.
    pub fn analyzer(&self, root: &Path) -> Result<AnalyzerBuilder, SetupError> {
        let analyzer = &self.config.analyzer;
        let mut builder = Analyzer::builder(Arc::clone(&self.normalizer), Arc::clone(&self.catalog))
            .root(root)
            .excludes(analyzer.exclude.iter().cloned())
            .respect_gitignore(analyzer.respect_gitignore)
            .roles(self.config.role_resolver()?);
        if let Some(n) = analyzer.concurrency {
            builder = builder.concurrency(n);
        }
        Ok(builder)
    }

    /// Checks one in-memory file.
    #[must_use]
    pub fn check_source(&self, file: &SourceFile) -> Vec<Violation> {
        let engine = RuleEngine::new(Arc::clone(&self.catalog));
        evaluate_file(self.normalizer.as_ref(), &engine, file)
    }
}

/// Finds a config file in `root`.
#[must_use]
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Loads the project config from `root`, or defaults when there is none.
///
/// # Errors
///
/// Returns an error if a config file exists but is invalid.
pub fn load_project_config(root: &Path) -> Result<Config, SetupError> {
    match find_config(root) {
        Some(path) => {
            debug!("Using config {}", path.display());
            Ok(Config::from_file(&path)?)
        }
        None => Ok(Config::default()),
    }
}

/// Lints a project tree with its own config (or defaults), blocking until
/// done.
///
/// Must not be called from inside an async runtime.
///
/// # Errors
///
/// Returns an error for invalid config/catalog or an unreadable root.
pub fn lint_project(root: impl AsRef<Path>) -> Result<Report, SetupError> {
    let root = root.as_ref();
    let setup = Setup::new(load_project_config(root)?)?;
    Ok(setup.analyzer(root)?.build()?.analyze()?)
}

/// Lints one in-memory file against the built-in catalog. The role is
/// inferred from `path`.
///
/// # Errors
///
/// Returns an error only if the built-in catalog is malformed.
pub fn lint_source(path: impl Into<PathBuf>, text: &str) -> Result<Vec<Violation>, SetupError> {
    let setup = Setup::new(Config::default())?;
    Ok(setup.check_source(&SourceFile::in_memory(path, text)))
}

/// Resolves the effective preset from explicit arg > config > default.
fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, SetupError> {
    explicit
        .or(config.preset.as_deref())
        .map_or(Ok(Preset::default()), |name| {
            name.parse().map_err(SetupError::Preset)
        })
}

/// Resolves the catalog from explicit path > config `catalog` > built-in.
fn load_catalog(explicit: Option<&Path>, config: &Config) -> Result<Catalog, SetupError> {
    match explicit.or(config.catalog.as_deref()) {
        Some(path) => {
            info!("Loading catalog {}", path.display());
            Ok(load_catalog_file(path)?)
        }
        None => Ok(builtin_catalog()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        let config = Config::default();
        assert_eq!(resolve_preset(None, &config).unwrap(), Preset::Recommended);
    }

    #[test]
    fn resolve_preset_explicit_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("minimal".to_string());
        assert_eq!(
            resolve_preset(Some("strict"), &config).unwrap(),
            Preset::Strict
        );
        assert_eq!(resolve_preset(None, &config).unwrap(), Preset::Minimal);
    }

    #[test]
    fn resolve_preset_invalid_is_an_error() {
        let err = resolve_preset(Some("nonexistent"), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("unknown preset"));
    }

    #[test]
    fn fail_on_explicit_overrides_config() {
        let config = Config::parse("fail_on = \"warning\"\n").unwrap();
        let setup = Setup::new(config).unwrap();
        assert_eq!(setup.fail_on(None), FailOn::Warning);
        assert_eq!(setup.fail_on(Some(FailOn::None)), FailOn::None);
    }

    #[test]
    fn config_overrides_apply_after_preset() {
        let config = Config::parse(
            "preset = \"strict\"\n\n[rules.quote-style]\nseverity = \"warning\"\n\n[rules.no-string-concat]\nenabled = false\n\n[rules.no-such-rule]\nenabled = false\n",
        )
        .unwrap();
        let setup = Setup::new(config).unwrap();
        let catalog = setup.catalog();
        assert_eq!(
            catalog.get("quote-style").unwrap().severity(),
            conform_core::Severity::Warning
        );
        assert_eq!(
            catalog.get("class-name-order").unwrap().severity(),
            conform_core::Severity::Error
        );
        assert!(catalog.get("no-string-concat").is_none());
        assert_eq!(setup.unknown_rules(), ["no-such-rule"]);
    }

    #[test]
    fn missing_catalog_file_is_fatal() {
        let overrides = Overrides {
            catalog: Some(PathBuf::from("/nonexistent/catalog.toml")),
            ..Overrides::default()
        };
        let err = Setup::with_overrides(Config::default(), &overrides)
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::Catalog(CatalogError::Io { .. })));
    }

    #[test]
    fn find_config_prefers_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".conform.toml"), "").unwrap();
        assert_eq!(
            find_config(dir.path()),
            Some(dir.path().join(".conform.toml"))
        );
        std::fs::write(dir.path().join("conform.toml"), "").unwrap();
        assert_eq!(find_config(dir.path()), Some(dir.path().join("conform.toml")));
    }
}
