//! Pure domain model for the rule catalog.
//!
//! This module contains no serde and no I/O. All invariants are enforced at
//! construction time via validated newtypes.

use crate::config::Config;
use crate::ir::{ImportGroup, QuoteStyle};
use crate::source::FileRole;
use crate::types::Severity;
use std::collections::{HashMap, HashSet};
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated rule id (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new rule id.
    ///
    /// # Errors
    ///
    /// Returns error if the id is empty or contains invalid characters.
    pub fn new(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyRuleId);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ModelError::InvalidRuleId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier casing conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCase {
    /// `CartItem`
    Pascal,
    /// `formatPrice`
    Camel,
    /// `ADD_ITEM`
    ScreamingSnake,
    /// No casing constraint.
    Any,
}

impl NameCase {
    /// Parses a catalog case name.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown case name.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "pascal" => Ok(Self::Pascal),
            "camel" => Ok(Self::Camel),
            "screaming-snake" => Ok(Self::ScreamingSnake),
            "any" => Ok(Self::Any),
            _ => Err(ModelError::UnknownCase {
                value: value.to_string(),
            }),
        }
    }

    /// Tests whether an identifier follows this case.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        match self {
            Self::Pascal => first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric()),
            Self::Camel => first.is_ascii_lowercase() && chars.all(|c| c.is_ascii_alphanumeric()),
            Self::ScreamingSnake => {
                first.is_ascii_uppercase()
                    && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            }
            Self::Any => true,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pascal => "PascalCase",
            Self::Camel => "camelCase",
            Self::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            Self::Any => "any case",
        }
    }
}

/// Casing plus optional affixes an identifier must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    case: NameCase,
    prefix: Option<String>,
    suffix: Option<String>,
}

impl NamePattern {
    /// Creates a name pattern.
    #[must_use]
    pub fn new(case: NameCase, prefix: Option<String>, suffix: Option<String>) -> Self {
        Self {
            case,
            prefix: prefix.filter(|p| !p.is_empty()),
            suffix: suffix.filter(|s| !s.is_empty()),
        }
    }

    /// Tests whether a name satisfies the pattern.
    ///
    /// A prefix must end at a word boundary: `use` accepts `useCart` but
    /// not `user`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if let Some(prefix) = &self.prefix {
            let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                return false;
            };
            if !rest.chars().next().is_some_and(|c| c.is_ascii_uppercase() || c == '_') {
                return false;
            }
        }
        if let Some(suffix) = &self.suffix {
            if !name.ends_with(suffix.as_str()) || name.len() == suffix.len() {
                return false;
            }
        }
        self.case.matches(name)
    }

    /// Describes the pattern for messages, e.g. "camelCase starting with `use`".
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = self.case.label().to_string();
        if let Some(prefix) = &self.prefix {
            out.push_str(&format!(" starting with `{prefix}`"));
        }
        if let Some(suffix) = &self.suffix {
            let joiner = if self.prefix.is_some() { " and" } else { "" };
            out.push_str(&format!("{joiner} ending with `{suffix}`"));
        }
        out
    }
}

/// A message with `{placeholder}` slots, validated against a known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    raw: String,
}

/// Placeholders every rule message may use.
pub const COMMON_PLACEHOLDERS: &[&str] = &["file", "rule"];

impl MessageTemplate {
    /// Parses a template, rejecting placeholders not in `allowed`.
    ///
    /// # Errors
    ///
    /// Returns error for an empty message, an unclosed `{`, or an unknown
    /// placeholder.
    pub fn new(raw: &str, allowed: &[&str]) -> Result<Self, ModelError> {
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyMessage);
        }
        let mut rest = raw;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| ModelError::UnclosedPlaceholder {
                message: raw.to_string(),
            })?;
            let name = &after[..close];
            if !allowed.contains(&name) && !COMMON_PLACEHOLDERS.contains(&name) {
                return Err(ModelError::UnknownPlaceholder {
                    name: name.to_string(),
                    allowed: allowed.join(", "),
                });
            }
            rest = &after[close + 1..];
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// Substitutes placeholder values. Missing values render as empty.
    #[must_use]
    pub fn render(&self, values: &[(&str, String)]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut rest = self.raw.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let name = &after[..close];
            if let Some((_, value)) = values.iter().find(|(k, _)| *k == name) {
                out.push_str(value);
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }

    /// Returns the raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// ────────────────────────────────────────────
// Checks
// ────────────────────────────────────────────

/// Which declarations a `naming` check inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingTarget {
    /// Functions returning JSX.
    Component,
    /// Functions not returning JSX.
    Function,
    /// Functions named `use…`.
    Hook,
    /// `createContext` bindings.
    Context,
    /// Interfaces and type aliases.
    Type,
    /// Exported functions.
    Exported,
}

impl NamingTarget {
    /// Parses a catalog target name.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown target.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "component" => Ok(Self::Component),
            "function" => Ok(Self::Function),
            "hook" => Ok(Self::Hook),
            "context" => Ok(Self::Context),
            "type" => Ok(Self::Type),
            "exported" => Ok(Self::Exported),
            _ => Err(ModelError::UnknownTarget {
                value: value.to_string(),
            }),
        }
    }

    /// Catalog name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Function => "function",
            Self::Hook => "hook",
            Self::Context => "context",
            Self::Type => "type",
            Self::Exported => "exported",
        }
    }
}

/// Expected export shape of component functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStyle {
    /// `export default function Foo() {}`
    DefaultFunctionDeclaration,
    /// `export const Foo = () => {}`
    NamedArrow,
}

impl ExportStyle {
    /// Parses a catalog export style.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown style.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "default-function-declaration" => Ok(Self::DefaultFunctionDeclaration),
            "named-arrow" => Ok(Self::NamedArrow),
            _ => Err(ModelError::UnknownExportStyle {
                value: value.to_string(),
            }),
        }
    }
}

/// Default responsive modifiers for `class-name-order`.
pub const DEFAULT_RESPONSIVE_PREFIXES: &[&str] = &["sm:", "md:", "lg:", "xl:", "2xl:"];

/// A parameterized predicate family. The set is closed; catalogs pick one
/// variant per rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Declaration names follow a pattern.
    Naming {
        /// Declarations inspected.
        target: NamingTarget,
        /// Required shape.
        pattern: NamePattern,
    },
    /// The file stem follows a pattern.
    FileName {
        /// Required shape.
        pattern: NamePattern,
    },
    /// Component functions are exported in one style.
    ExportStyle {
        /// Required style.
        expect: ExportStyle,
    },
    /// Imports appear in group order.
    ImportOrder {
        /// Group precedence.
        order: Vec<ImportGroup>,
    },
    /// Hook calls precede other statements.
    HooksAtTop,
    /// Early returns in components return `null`.
    EarlyReturnNull,
    /// Component body shape.
    ComponentBody {
        /// Minimum body length in lines, inclusive.
        min_lines: usize,
        /// Require a blank line after the opening brace.
        blank_line_after_open: bool,
    },
    /// Responsive `className` tokens follow base tokens.
    ClassNameOrder {
        /// Modifiers treated as responsive.
        responsive_prefixes: Vec<String>,
    },
    /// Action type literals are SCREAMING_SNAKE_CASE.
    ActionTypeCase,
    /// The reset case returns the initial state itself.
    ResetReturnsInitialState {
        /// Reset action type.
        action: String,
        /// Name of the initial-state binding.
        initial_state: String,
    },
    /// String literals use one quote style.
    QuoteStyle {
        /// Required style.
        prefer: QuoteStyle,
    },
    /// No string concatenation with `+`.
    NoStringConcat,
    /// The file imports one of the given modules.
    RequireImport {
        /// Accepted module specifiers.
        sources: Vec<String>,
    },
}

impl Check {
    /// Catalog `kind` name.
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

    /// Placeholders this check provides to message templates.
    #[must_use]
    pub fn placeholders(kind: &str) -> &'static [&'static str] {
        match kind {
            "naming" => &["name", "expected", "target"],
            "file-name" | "quote-style" => &["value", "expected"],
            "export-style" => &["name", "expected"],
            "import-order" => &["source", "group", "position", "conflict"],
            "hooks-at-top" => &["hook", "function"],
            "early-return-null" => &["function", "returned"],
            "component-body" => &["name", "lines", "min", "detail"],
            "class-name-order" => &["tag", "token"],
            "action-type-case" => &["action"],
            "reset-returns-initial-state" => &["action", "returned", "expected"],
            "require-import" => &["expected"],
            _ => &[],
        }
    }
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// Roles a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    /// Every role (`"*"`).
    Any,
    /// Listed roles only.
    Roles(Vec<FileRole>),
}

impl RoleScope {
    /// Whether the rule applies to files of `role`.
    #[must_use]
    pub fn applies_to(&self, role: FileRole) -> bool {
        match self {
            Self::Any => true,
            Self::Roles(roles) => roles.contains(&role),
        }
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Roles(roles) => {
                let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// One checkable convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    description: String,
    roles: RoleScope,
    severity: Severity,
    message: MessageTemplate,
    help: Option<String>,
    doc_ref: Option<String>,
    check: Check,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RuleId,
        description: String,
        roles: RoleScope,
        severity: Severity,
        message: MessageTemplate,
        help: Option<String>,
        doc_ref: Option<String>,
        check: Check,
    ) -> Self {
        Self {
            id,
            description,
            roles,
            severity,
            message,
            help,
            doc_ref,
            check,
        }
    }

    /// Returns the rule id.
    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the target roles.
    #[must_use]
    pub fn roles(&self) -> &RoleScope {
        &self.roles
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message template.
    #[must_use]
    pub fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Returns the fix hint.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the style guide reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the predicate.
    #[must_use]
    pub fn check(&self) -> &Check {
        &self.check
    }

    /// Returns a copy with a different severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// The read-only rule registry, indexed by role.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    version: u32,
    rules: Vec<Rule>,
    by_role: HashMap<FileRole, Vec<usize>>,
}

impl Catalog {
    /// Builds a catalog. All cross-rule validation errors are collected.
    ///
    /// # Errors
    ///
    /// Returns every duplicate id found.
    pub fn new(version: u32, rules: Vec<Rule>) -> Result<Self, Vec<ModelError>> {
        let mut seen = HashSet::new();
        let errors: Vec<ModelError> = rules
            .iter()
            .filter(|r| !seen.insert(r.id.clone()))
            .map(|r| ModelError::DuplicateRuleId {
                id: r.id.to_string(),
            })
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::indexed(version, rules))
    }

    fn indexed(version: u32, rules: Vec<Rule>) -> Self {
        let mut by_role: HashMap<FileRole, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            for role in FileRole::ALL {
                if rule.roles.applies_to(role) {
                    by_role.entry(role).or_default().push(i);
                }
            }
        }
        Self {
            version,
            rules,
            by_role,
        }
    }

    /// Catalog format version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All rules in catalog order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id.as_str() == id)
    }

    /// Rules that apply to files of `role`, in catalog order.
    pub fn for_role(&self, role: FileRole) -> impl Iterator<Item = &Rule> {
        self.by_role
            .get(&role)
            .into_iter()
            .flatten()
            .map(|&i| &self.rules[i])
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keeps only rules matching the predicate.
    #[must_use]
    pub fn retain(self, keep: impl Fn(&Rule) -> bool) -> Self {
        let rules = self.rules.into_iter().filter(|r| keep(r)).collect();
        Self::indexed(self.version, rules)
    }

    /// Transforms every rule.
    #[must_use]
    pub fn map_rules(self, f: impl Fn(Rule) -> Rule) -> Self {
        let rules = self.rules.into_iter().map(f).collect();
        Self::indexed(self.version, rules)
    }

    /// Applies `[rules.<id>]` overrides. Returns configured ids that name no
    /// rule in this catalog.
    #[must_use]
    pub fn apply_config(self, config: &Config) -> (Self, Vec<String>) {
        let mut unknown: Vec<String> = config
            .rules
            .keys()
            .filter(|id| self.get(id).is_none())
            .cloned()
            .collect();
        unknown.sort();
        let catalog = self
            .retain(|r| config.is_rule_enabled(r.id.as_str()))
            .map_rules(|r| match config.rule_severity(r.id.as_str()) {
                Some(severity) => r.with_severity(severity),
                None => r,
            });
        (catalog, unknown)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Validation errors from domain model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rule id is empty.
    #[error("rule id must not be empty")]
    EmptyRuleId,

    /// Rule id contains characters outside `[a-z0-9-]`.
    #[error("invalid rule id `{id}`: must contain only [a-z0-9-]")]
    InvalidRuleId {
        /// The invalid id.
        id: String,
    },

    /// Two rules share an id.
    #[error("duplicate rule id `{id}`")]
    DuplicateRuleId {
        /// The repeated id.
        id: String,
    },

    /// A rule lists no roles.
    #[error("roles must not be empty")]
    EmptyRoles,

    /// Unknown role name.
    #[error("unknown role `{value}`")]
    UnknownRole {
        /// The invalid value.
        value: String,
    },

    /// Unknown severity.
    #[error("unknown severity `{value}`, expected: error, warning")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },

    /// Unknown casing convention.
    #[error("unknown case `{value}`, expected: pascal, camel, screaming-snake, any")]
    UnknownCase {
        /// The invalid value.
        value: String,
    },

    /// Unknown naming target.
    #[error(
        "unknown naming target `{value}`, expected: component, function, hook, context, type, exported"
    )]
    UnknownTarget {
        /// The invalid value.
        value: String,
    },

    /// Unknown export style.
    #[error("unknown export style `{value}`, expected: default-function-declaration, named-arrow")]
    UnknownExportStyle {
        /// The invalid value.
        value: String,
    },

    /// Unknown quote style.
    #[error("unknown quote style `{value}`, expected: double, single")]
    UnknownQuoteStyle {
        /// The invalid value.
        value: String,
    },

    /// Unknown import group.
    #[error("unknown import group `{value}`")]
    UnknownGroup {
        /// The invalid value.
        value: String,
    },

    /// An import group listed twice.
    #[error("import group `{value}` listed more than once")]
    DuplicateGroup {
        /// The repeated group.
        value: String,
    },

    /// An empty list where at least one entry is required.
    #[error("`{field}` must not be empty")]
    EmptyList {
        /// Field name.
        field: &'static str,
    },

    /// `min_lines` is zero.
    #[error("min_lines must be at least 1")]
    ZeroMinLines,

    /// Message is blank.
    #[error("message must not be empty")]
    EmptyMessage,

    /// `{` without a matching `}`.
    #[error("unclosed placeholder in message `{message}`")]
    UnclosedPlaceholder {
        /// The offending message.
        message: String,
    },

    /// A placeholder the check kind does not provide.
    #[error("unknown placeholder `{{{name}}}`, available: {allowed}")]
    UnknownPlaceholder {
        /// Placeholder name.
        name: String,
        /// Names the check provides.
        allowed: String,
    },
}
