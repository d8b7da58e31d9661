//! Merging per-file results into one deterministic report.

use crate::types::{Report, Violation};
use std::collections::HashSet;

/// Collects per-file violation batches and produces the final [`Report`].
///
/// Batches may arrive in any order; [`Aggregator::finish`] sorts and
/// deduplicates so output never depends on scheduling.
#[derive(Debug, Default)]
pub struct Aggregator {
    violations: Vec<Violation>,
    files_checked: usize,
}

impl Aggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the results of one analyzed file.
    pub fn add_file(&mut self, violations: Vec<Violation>) {
        self.files_checked += 1;
        self.violations.extend(violations);
    }

    /// Adds entries that do not belong to an analyzed file (walk errors).
    pub fn add_unattributed(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    /// Sorts, deduplicates, and returns the report.
    #[must_use]
    pub fn finish(self) -> Report {
        let mut violations = self.violations;
        violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then_with(|| a.rule.cmp(&b.rule))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.message.cmp(&b.message))
        });
        let mut seen = HashSet::new();
        violations.retain(|v| {
            seen.insert((
                v.rule.clone(),
                v.kind,
                v.location.file.clone(),
                v.location.line,
                v.location.column,
            ))
        });
        Report {
            violations,
            files_checked: self.files_checked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};

    fn v(file: &str, line: usize, rule: &str, message: &str) -> Violation {
        Violation::new(rule, Severity::Error, Location::new(file, line, 1), message)
    }

    #[test]
    fn sorts_by_file_line_rule() {
        let mut agg = Aggregator::new();
        agg.add_file(vec![v("src/b.tsx", 1, "naming", "x")]);
        agg.add_file(vec![
            v("src/a.tsx", 9, "import-order", "x"),
            v("src/a.tsx", 2, "quote-style", "x"),
            v("src/a.tsx", 2, "hooks-at-top", "x"),
        ]);
        let report = agg.finish();
        let order: Vec<_> = report
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line, v.rule.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                ("src/a.tsx".to_string(), 2, "hooks-at-top"),
                ("src/a.tsx".to_string(), 2, "quote-style"),
                ("src/a.tsx".to_string(), 9, "import-order"),
                ("src/b.tsx".to_string(), 1, "naming"),
            ]
        );
        assert_eq!(report.files_checked, 2);
    }

    #[test]
    fn drops_exact_repeats_keeping_first_message() {
        let mut agg = Aggregator::new();
        agg.add_file(vec![
            v("src/a.tsx", 3, "naming", "second"),
            v("src/a.tsx", 3, "naming", "first"),
            v("src/a.tsx", 4, "naming", "other line"),
        ]);
        let report = agg.finish();
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].message, "first");
    }

    #[test]
    fn batch_order_does_not_matter() {
        let batches = vec![
            vec![v("src/x.ts", 1, "a", "m")],
            vec![v("src/y.ts", 5, "b", "m"), v("src/y.ts", 2, "c", "m")],
        ];
        let mut forward = Aggregator::new();
        let mut backward = Aggregator::new();
        for b in batches.clone() {
            forward.add_file(b);
        }
        for b in batches.into_iter().rev() {
            backward.add_file(b);
        }
        assert_eq!(forward.finish(), backward.finish());
    }
}
