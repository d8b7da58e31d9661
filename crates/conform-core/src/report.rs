//! Rendering a [`Report`] as text, compact lines, or JSON.
//!
//! Rendering is pure: the same report always renders to the same string.

use crate::types::{Report, Severity, Violation};
use serde::Serialize;
use std::fmt::Write;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable blocks plus a summary line.
    #[default]
    Text,
    /// A pretty-printed JSON array.
    Json,
    /// One line per entry.
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "unknown format `{other}`, expected: text, json, compact"
            )),
        }
    }
}

/// Which entries to show. Filtering never affects the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    /// Errors only.
    Error,
    /// Warnings only.
    Warning,
    /// Everything.
    #[default]
    All,
}

impl SeverityFilter {
    /// Whether an entry passes the filter.
    #[must_use]
    pub fn accepts(self, violation: &Violation) -> bool {
        match self {
            Self::Error => violation.severity == Severity::Error,
            Self::Warning => violation.severity == Severity::Warning,
            Self::All => true,
        }
    }

    /// Returns a copy of the report with only accepted entries.
    #[must_use]
    pub fn apply(self, report: &Report) -> Report {
        Report {
            violations: report
                .violations
                .iter()
                .filter(|v| self.accepts(v))
                .cloned()
                .collect(),
            files_checked: report.files_checked,
        }
    }
}

/// One JSON array element; field order is the output key order.
#[derive(Serialize)]
struct JsonEntry<'a> {
    rule: &'a str,
    file: String,
    line: usize,
    column: usize,
    severity: Severity,
    message: &'a str,
    kind: &'static str,
}

impl<'a> From<&'a Violation> for JsonEntry<'a> {
    fn from(v: &'a Violation) -> Self {
        Self {
            rule: &v.rule,
            file: v.location.file.to_string_lossy().replace('\\', "/"),
            line: v.location.line,
            column: v.location.column,
            severity: v.severity,
            message: &v.message,
            kind: v.kind.as_str(),
        }
    }
}

/// Renders a report.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render(report: &Report, format: OutputFormat, color: bool) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Text => render_text(report, color),
        OutputFormat::Json => {
            let entries: Vec<JsonEntry<'_>> = report.violations.iter().map(Into::into).collect();
            let mut out = serde_json::to_string_pretty(&entries)?;
            out.push('\n');
            out
        }
        OutputFormat::Compact => report
            .violations
            .iter()
            .map(|v| format!("{v}\n"))
            .collect(),
    })
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn render_text(report: &Report, color: bool) -> String {
    let mut out = String::new();
    for v in &report.violations {
        let severity = match v.severity {
            Severity::Error => paint("error", "31", color),
            Severity::Warning => paint("warning", "33", color),
        };
        if v.kind.is_diagnostic() {
            let _ = write!(out, "{} [{}]", v.rule, v.kind);
        } else {
            out.push_str(&v.rule);
        }
        let _ = writeln!(
            out,
            " at {}:{}:{}",
            v.location.file.display(),
            v.location.line,
            v.location.column
        );
        let _ = writeln!(out, "  {severity}: {}", v.message);
        if let Some(help) = &v.help {
            let _ = writeln!(out, "  = help: {help}");
        }
        if let Some(doc_ref) = &v.doc_ref {
            let _ = writeln!(out, "  = see: {doc_ref}");
        }
        out.push('\n');
    }

    let (errors, warnings) = report.count_by_severity();
    let summary = format!(
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        report.files_checked
    );
    let code = if errors > 0 {
        "31"
    } else if warnings > 0 {
        "33"
    } else {
        "32"
    };
    let _ = writeln!(out, "{}", paint(&summary, code, color));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn sample() -> Report {
        Report {
            violations: vec![
                Violation::new(
                    "import-order",
                    Severity::Error,
                    Location::new("src/components/Cart/Cart.tsx", 2, 1),
                    "Import `@/utils/format` (internal) is out of order relative to `@tanstack/react-query`",
                )
                .with_help("Order imports: framework, routing, query, form, external, internal, type"),
                Violation::io_error("src/broken.ts", "stream did not contain valid UTF-8"),
            ],
            files_checked: 3,
        }
    }

    #[test]
    fn compact_lines() {
        let out = render(&sample(), OutputFormat::Compact, false).unwrap();
        insta::assert_snapshot!(out, @r"
        src/components/Cart/Cart.tsx:2:1: error [import-order] Import `@/utils/format` (internal) is out of order relative to `@tanstack/react-query`
        src/broken.ts:1:1: warning [io-error] stream did not contain valid UTF-8
        ");
    }

    #[test]
    fn text_blocks_and_summary() {
        let out = render(&sample(), OutputFormat::Text, false).unwrap();
        insta::assert_snapshot!(out, @r"
        import-order at src/components/Cart/Cart.tsx:2:1
          error: Import `@/utils/format` (internal) is out of order relative to `@tanstack/react-query`
          = help: Order imports: framework, routing, query, form, external, internal, type

        io-error [io-error] at src/broken.ts:1:1
          warning: stream did not contain valid UTF-8

        Found 1 error(s), 1 warning(s) in 3 file(s)
        ");
    }

    #[test]
    fn text_block_ends_with_doc_reference() {
        let report = Report {
            violations: vec![Violation::new(
                "quote-style",
                Severity::Warning,
                Location::new("src/utils/format.ts", 4, 10),
                "String `total` should use double quotes",
            )
            .with_doc_ref("guide/style#quotes")],
            files_checked: 1,
        };
        let out = render(&report, OutputFormat::Text, false).unwrap();
        let block: Vec<&str> = out.lines().take(3).collect();
        assert_eq!(
            block,
            [
                "quote-style at src/utils/format.ts:4:10",
                "  warning: String `total` should use double quotes",
                "  = see: guide/style#quotes",
            ]
        );
    }

    #[test]
    fn text_color_is_optional() {
        let plain = render(&sample(), OutputFormat::Text, false).unwrap();
        let colored = render(&sample(), OutputFormat::Text, true).unwrap();
        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[31merror\x1b[0m"));
    }

    #[test]
    fn json_keys_in_order() {
        let out = render(&sample(), OutputFormat::Json, false).unwrap();
        let rule = out.find("\"rule\"").unwrap();
        let file = out.find("\"file\"").unwrap();
        let kind = out.find("\"kind\"").unwrap();
        assert!(rule < file && file < kind);

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["kind"], "io-error");
        assert_eq!(entries[0]["severity"], "error");
        assert_eq!(entries[0]["line"], 2);
    }

    #[test]
    fn empty_json_is_an_empty_array() {
        let out = render(&Report::new(), OutputFormat::Json, false).unwrap();
        assert_eq!(out, "[]\n");
    }

    #[test]
    fn severity_filter_keeps_counts_honest() {
        let report = sample();
        assert_eq!(SeverityFilter::Warning.apply(&report).violations.len(), 1);
        assert_eq!(SeverityFilter::Error.apply(&report).violations.len(), 1);
        assert_eq!(SeverityFilter::All.apply(&report).violations.len(), 2);
    }
}
