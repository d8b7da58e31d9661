//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDto {
    /// Format version; only `1` is supported.
    pub version: u32,

    /// `[[rule]]` entries.
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleDto>,
}

/// TOML representation of one rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Rule id (e.g., "import-order").
    pub id: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Target roles; `"*"` means every role.
    pub roles: Vec<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Message template with `{placeholders}`.
    pub message: String,
    /// Fix hint.
    #[serde(default)]
    pub help: Option<String>,
    /// Style guide reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Predicate definition.
    pub check: CheckDto,
}

/// TOML representation of a check, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CheckDto {
    /// `kind = "naming"`
    Naming {
        /// Declarations inspected.
        target: String,
        /// Casing (default: "any").
        #[serde(default = "default_case_str")]
        case: String,
        /// Required prefix.
        #[serde(default)]
        prefix: Option<String>,
        /// Required suffix.
        #[serde(default)]
        suffix: Option<String>,
    },
    /// `kind = "file-name"`
    FileName {
        /// Casing (default: "any").
        #[serde(default = "default_case_str")]
        case: String,
        /// Required prefix.
        #[serde(default)]
        prefix: Option<String>,
        /// Required suffix.
        #[serde(default)]
        suffix: Option<String>,
    },
    /// `kind = "export-style"`
    ExportStyle {
        /// Expected style.
        expect: String,
    },
    /// `kind = "import-order"`
    ImportOrder {
        /// Group precedence.
        order: Vec<String>,
    },
    /// `kind = "hooks-at-top"`
    HooksAtTop,
    /// `kind = "early-return-null"`
    EarlyReturnNull,
    /// `kind = "component-body"`
    ComponentBody {
        /// Minimum body length in lines.
        min_lines: i64,
        /// Require a blank line after the opening brace.
        #[serde(default)]
        blank_line_after_open: bool,
    },
    /// `kind = "class-name-order"`
    ClassNameOrder {
        /// Responsive modifiers (default: `sm: md: lg: xl: 2xl:`).
        #[serde(default)]
        responsive_prefixes: Option<Vec<String>>,
    },
    /// `kind = "action-type-case"`
    ActionTypeCase,
    /// `kind = "reset-returns-initial-state"`
    ResetReturnsInitialState {
        /// Reset action type (default: "RESET_CTX").
        #[serde(default)]
        action: Option<String>,
        /// Initial-state binding name (default: "initialState").
        #[serde(default)]
        initial_state: Option<String>,
    },
    /// `kind = "quote-style"`
    QuoteStyle {
        /// "double" or "single".
        prefer: String,
    },
    /// `kind = "no-string-concat"`
    NoStringConcat,
    /// `kind = "require-import"`
    RequireImport {
        /// Accepted module specifiers.
        sources: Vec<String>,
    },
}

impl CheckDto {
    /// The `kind` tag as written in TOML.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Naming { .. } => "naming",
            Self::FileName { .. } => "file-name",
            Self::ExportStyle { .. } => "export-style",
            Self::ImportOrder { .. } => "import-order",
            Self::HooksAtTop => "hooks-at-top",
            Self::EarlyReturnNull => "early-return-null",
            Self::ComponentBody { .. } => "component-body",
            Self::ClassNameOrder { .. } => "class-name-order",
            Self::ActionTypeCase => "action-type-case",
            Self::ResetReturnsInitialState { .. } => "reset-returns-initial-state",
            Self::QuoteStyle { .. } => "quote-style",
            Self::NoStringConcat => "no-string-concat",
            Self::RequireImport { .. } => "require-import",
        }
    }
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_case_str() -> String {
    "any".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: CatalogDto = toml::from_str("version = 1").unwrap();
        assert_eq!(dto.version, 1);
        assert!(dto.rules.is_empty());
    }

    #[test]
    fn deserialize_rules() {
        let toml_str = r#"
version = 1

[[rule]]
id = "hook-name"
description = "Hooks start with use"
roles = ["hook"]
message = "Hook `{name}` should be {expected}"

[rule.check]
kind = "naming"
target = "exported"
case = "camel"
prefix = "use"

[[rule]]
id = "hooks-at-top"
roles = ["*"]
severity = "warning"
message = "late hook"
check = { kind = "hooks-at-top" }

[[rule]]
id = "component-body"
roles = ["component"]
message = "short"
check = { kind = "component-body", min_lines = 4, blank_line_after_open = true }
"#;
        let dto: CatalogDto = toml::from_str(toml_str).unwrap();
        assert_eq!(dto.rules.len(), 3);
        assert_eq!(dto.rules[0].severity, "error");
        assert!(matches!(
            &dto.rules[0].check,
            CheckDto::Naming { prefix: Some(p), .. } if p == "use"
        ));
        assert_eq!(dto.rules[1].check.kind(), "hooks-at-top");
        assert!(matches!(
            dto.rules[2].check,
            CheckDto::ComponentBody {
                min_lines: 4,
                blank_line_after_open: true
            }
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let toml_str = r#"
version = 1
[[rule]]
id = "x"
roles = ["*"]
message = "m"
check = { kind = "no-such-check" }
"#;
        let err = toml::from_str::<CatalogDto>(toml_str).unwrap_err();
        assert!(err.to_string().contains("no-such-check"));
    }
}
