//! Core types for violations, diagnostics, and run results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, but does not fail a run under the default threshold.
    Warning,
    /// Must be fixed.
    Error,
}

impl Severity {
    /// Returns the lowercase name used in catalogs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            other => Err(format!("unknown severity `{other}`, expected: error, warning")),
        }
    }
}

/// Threshold at which a run is considered failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    /// Fail when any error is present.
    #[default]
    Error,
    /// Fail when any warning or error is present.
    Warning,
    /// Never fail because of violations.
    None,
}

impl FailOn {
    /// Minimum severity that fails the run, if any.
    #[must_use]
    pub fn threshold(self) -> Option<Severity> {
        match self {
            Self::Error => Some(Severity::Error),
            Self::Warning => Some(Severity::Warning),
            Self::None => None,
        }
    }
}

impl std::str::FromStr for FailOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown fail-on level `{other}`, expected: error, warning, none"
            )),
        }
    }
}

/// Distinguishes rule findings from recoverable pipeline diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A catalog rule failed against a code location.
    Rule,
    /// A file could not be read.
    IoError,
    /// A file could not be normalized into IR.
    ParseError,
    /// A rule predicate misbehaved on a file's IR.
    RuleEvaluationError,
}

impl ViolationKind {
    /// Returns the kebab-case name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::IoError => "io-error",
            Self::ParseError => "parse-error",
            Self::RuleEvaluationError => "rule-evaluation-error",
        }
    }

    /// Returns `true` for pipeline diagnostics (anything but a rule finding).
    #[must_use]
    pub fn is_diagnostic(self) -> bool {
        self != Self::Rule
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location for findings about a file as a whole.
    #[must_use]
    pub fn file_start(file: impl Into<PathBuf>) -> Self {
        Self::new(file, 1, 1)
    }
}

/// A violation or diagnostic found during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Catalog rule id (e.g., "import-order"), or the diagnostic name.
    pub rule: String,
    /// Whether this is a rule finding or a pipeline diagnostic.
    pub kind: ViolationKind,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional hint for fixing, from the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Reference into the style guide (e.g., "STYLEGUIDE.md#imports").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new rule violation.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            kind: ViolationKind::Rule,
            severity,
            location,
            message: message.into(),
            help: None,
            doc_ref: None,
        }
    }

    /// Creates a pipeline diagnostic of the given kind.
    #[must_use]
    pub fn diagnostic(
        kind: ViolationKind,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            ..Self::new(rule, severity, location, message)
        }
    }

    /// An unreadable file; recoverable, reported as a warning.
    #[must_use]
    pub fn io_error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::diagnostic(
            ViolationKind::IoError,
            ViolationKind::IoError.as_str(),
            Severity::Warning,
            Location::file_start(file),
            message,
        )
    }

    /// A file that failed to normalize.
    #[must_use]
    pub fn parse_error(location: Location, message: impl Into<String>) -> Self {
        Self::diagnostic(
            ViolationKind::ParseError,
            ViolationKind::ParseError.as_str(),
            Severity::Error,
            location,
            message,
        )
    }

    /// A rule that failed while evaluating a file. Carries the rule id.
    #[must_use]
    pub fn rule_evaluation_error(
        rule: impl Into<String>,
        file: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::diagnostic(
            ViolationKind::RuleEvaluationError,
            rule,
            Severity::Error,
            Location::file_start(file),
            message,
        )
    }

    /// Adds a style guide reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Adds a fix hint to this violation.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule,
            self.message
        )?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

/// Result of a conformance run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// All violations and diagnostics, in reporting order.
    pub violations: Vec<Violation>,
    /// Number of files that were read and analyzed.
    pub files_checked: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any entry meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts entries as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }

    /// Counts pipeline diagnostics (non-rule entries).
    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.kind.is_diagnostic())
            .count()
    }

    /// Returns entries reported against one file.
    #[must_use]
    pub fn for_file(&self, file: &std::path::Path) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.location.file == file)
            .collect()
    }

    /// Returns entries produced by one rule id.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.rule == rule).collect()
    }

    /// Whether the run fails under the given threshold.
    #[must_use]
    pub fn fails(&self, fail_on: FailOn) -> bool {
        fail_on
            .threshold()
            .is_some_and(|severity| self.has_violations_at(severity))
    }

    /// Process exit code: 0 when clean under `fail_on`, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self, fail_on: FailOn) -> u8 {
        u8::from(self.fails(fail_on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "import-order",
            severity,
            Location::new("src/components/Cart/Cart.tsx", 3, 1),
            "Import `@tanstack/react-query` is out of order",
        )
    }

    #[test]
    fn violation_new_is_rule_kind_without_extras() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.kind, ViolationKind::Rule);
        assert!(v.doc_ref.is_none());
        assert!(v.help.is_none());
    }

    #[test]
    fn violation_display_is_compact() {
        let v = make_violation(Severity::Warning);
        assert_eq!(
            v.to_string(),
            "src/components/Cart/Cart.tsx:3:1: warning [import-order] Import `@tanstack/react-query` is out of order"
        );
    }

    #[test]
    fn severity_orders_warning_below_error() {
        assert!(Severity::Warning < Severity::Error);
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert!("info".parse::<Severity>().is_err());
    }

    #[test]
    fn exit_code_follows_fail_on() {
        let mut report = Report::new();
        report.violations.push(make_violation(Severity::Warning));

        assert_eq!(report.exit_code(FailOn::Error), 0);
        assert_eq!(report.exit_code(FailOn::Warning), 1);
        assert_eq!(report.exit_code(FailOn::None), 0);

        report.violations.push(make_violation(Severity::Error));
        assert_eq!(report.exit_code(FailOn::Error), 1);
        assert_eq!(report.exit_code(FailOn::None), 0);
    }

    #[test]
    fn counts_split_by_severity() {
        let mut report = Report::new();
        report.violations.push(make_violation(Severity::Warning));
        report.violations.push(make_violation(Severity::Error));
        report
            .violations
            .push(Violation::io_error("src/a.ts", "unreadable"));
        assert_eq!(report.count_by_severity(), (1, 2));
        assert_eq!(report.diagnostic_count(), 1);
    }
}
