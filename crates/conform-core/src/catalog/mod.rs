//! Declarative rule catalog driven by versioned TOML.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! dto types
//!   ↓ validate + convert (loader)
//! Catalog (pure domain model, indexed by role)
//!   ↓ Check::evaluate per file
//! Vec<Finding>
//! ```

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt;
use std::path::Path;

pub mod checks;
pub mod dto;
pub mod loader;
pub mod model;

pub use checks::{EvalError, Finding};
pub use model::{Catalog, Check, ModelError, Rule, RuleId};

/// The only catalog format version understood by this build.
pub const SUPPORTED_VERSION: u32 = 1;

/// One validation problem, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Where the error occurred (e.g., "rule[3] `import-order`.check").
    pub context: String,
    /// The underlying model error.
    pub error: ModelError,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}

/// Errors from reading, parsing, or validating a catalog. Always fatal.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    #[diagnostic(code(conform::catalog::io))]
    Io {
        /// Catalog path.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("invalid catalog TOML: {message}")]
    #[diagnostic(
        code(conform::catalog::toml),
        help("each [[rule]] needs id, roles, message and a [rule.check] table with a `kind`")
    )]
    Toml {
        /// Parser message.
        message: String,
        /// Catalog text, for rendering.
        #[source_code]
        src: NamedSource<String>,
        /// Offending range, when known.
        #[label("here")]
        span: Option<SourceSpan>,
    },

    /// The catalog declares a version this build does not understand.
    #[error("unsupported catalog version {found} (supported: {supported})")]
    #[diagnostic(code(conform::catalog::version), help("set `version = 1`"))]
    UnsupportedVersion {
        /// Declared version.
        found: u32,
        /// Supported version.
        supported: u32,
    },

    /// Domain validation failed; every problem is listed.
    #[error("catalog validation failed:\n{}", format_issues(.0))]
    #[diagnostic(code(conform::catalog::invalid))]
    Invalid(Vec<CatalogIssue>),
}

fn format_issues(issues: &[CatalogIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and validates catalog TOML. `name` labels the source in errors.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn parse_catalog(name: &str, content: &str) -> Result<Catalog, CatalogError> {
    let dto: dto::CatalogDto = toml::from_str(content).map_err(|e| CatalogError::Toml {
        message: e.message().to_string(),
        span: e.span().map(SourceSpan::from),
        src: NamedSource::new(name, content.to_string()),
    })?;
    let catalog = loader::load(dto)?;
    tracing::debug!(source = name, rules = catalog.len(), "Loaded rule catalog");
    Ok(catalog)
}

/// Reads, parses, and validates a catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog(&path.display().to_string(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_carry_a_span() {
        let err = parse_catalog("bad.toml", "version = 1\n[[rule]]\nid = \n").unwrap_err();
        match err {
            CatalogError::Toml { span, .. } => assert!(span.is_some()),
            other => panic!("expected Toml error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog_file(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn invalid_lists_issues_line_by_line() {
        let err = CatalogError::Invalid(vec![
            CatalogIssue {
                context: "rule[0].id".into(),
                error: ModelError::EmptyRuleId,
            },
            CatalogIssue {
                context: "rule[1].check".into(),
                error: ModelError::ZeroMinLines,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "catalog validation failed:\n  - rule[0].id: rule id must not be empty\n  - rule[1].check: min_lines must be at least 1"
        );
    }
}
