//! Rule evaluation for one file.

use crate::catalog::{Catalog, Finding, Rule};
use crate::ir::FileIr;
use crate::source::SourceFile;
use crate::types::{Location, Violation};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Evaluates catalog rules against normalized files.
///
/// Rules are independent: a rule that errors or panics produces one
/// `rule-evaluation-error` entry and the remaining rules still run.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<Catalog>,
}

impl RuleEngine {
    /// Creates an engine over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Evaluates every rule applicable to the file's role.
    #[must_use]
    pub fn evaluate(&self, file: &SourceFile, ir: &FileIr) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in self.catalog.for_role(ir.role) {
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.check().evaluate(file, ir)));
            let message = match outcome {
                Ok(Ok(findings)) => {
                    match render_all(rule, file, findings) {
                        Ok(found) => {
                            if !found.is_empty() {
                                debug!(rule = %rule.id(), file = %file.relative_path().display(), count = found.len(), "Rule matched");
                            }
                            violations.extend(found);
                            continue;
                        }
                        Err(message) => message,
                    }
                }
                Ok(Err(e)) => e.message,
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            warn!(rule = %rule.id(), file = %file.relative_path().display(), "Rule evaluation failed: {message}");
            violations.push(Violation::rule_evaluation_error(
                rule.id().as_str(),
                file.relative_path(),
                format!("rule `{}` could not be evaluated: {message}", rule.id()),
            ));
        }
        violations
    }
}

/// Renders findings, rejecting any that point outside the file.
fn render_all(
    rule: &Rule,
    file: &SourceFile,
    findings: Vec<Finding>,
) -> Result<Vec<Violation>, String> {
    let line_count = file.line_count();
    findings
        .into_iter()
        .map(|finding| {
            if !finding.span.within(line_count) {
                return Err(format!(
                    "finding at line {} is outside the file ({line_count} lines)",
                    finding.span.start_line
                ));
            }
            Ok(render(rule, file, finding))
        })
        .collect()
}

fn render(rule: &Rule, file: &SourceFile, finding: Finding) -> Violation {
    let file_name = file.relative_path().display().to_string();
    let mut values = finding.args;
    values.push(("file", file_name));
    values.push(("rule", rule.id().to_string()));

    let mut violation = Violation::new(
        rule.id().as_str(),
        rule.severity(),
        Location::new(
            file.relative_path(),
            finding.span.start_line,
            finding.span.start_column.max(1),
        ),
        rule.message().render(&values),
    );
    if let Some(help) = rule.help() {
        violation = violation.with_help(help);
    }
    if let Some(doc_ref) = rule.doc_ref() {
        violation = violation.with_doc_ref(doc_ref);
    }
    violation
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
