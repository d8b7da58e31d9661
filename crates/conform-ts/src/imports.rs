//! Import classification: maps module specifiers to import groups.

use conform_core::ir::ImportGroup;
use std::collections::BTreeMap;

const FRAMEWORK: &[&str] = &["react", "react-dom", "next"];
const ROUTING: &[&str] = &[
    "react-router",
    "react-router-dom",
    "next/navigation",
    "next/router",
    "next/link",
    "@tanstack/react-router",
];
const QUERY: &[&str] = &["@tanstack/react-query", "react-query", "swr", "@apollo/client"];
const FORM: &[&str] = &["react-hook-form", "@hookform", "formik", "zod", "yup"];
const INTERNAL: &[&str] = &["@/", "~/", "src/"];

/// Resolves module specifiers to [`ImportGroup`]s.
///
/// Resolution uses longest-prefix-match so that more specific module
/// prefixes take priority over broader ones (`next/link` is routing even
/// though `next` is framework). Relative specifiers are always internal and
/// `import type` is always the type group.
#[derive(Debug, Clone)]
pub struct ImportClassifier {
    /// (prefix, group) sorted by prefix length descending.
    map: Vec<(String, ImportGroup)>,
}

impl Default for ImportClassifier {
    fn default() -> Self {
        let tables = [
            (ImportGroup::Framework, FRAMEWORK),
            (ImportGroup::Routing, ROUTING),
            (ImportGroup::Query, QUERY),
            (ImportGroup::Form, FORM),
            (ImportGroup::Internal, INTERNAL),
        ];
        let mut classifier = Self { map: Vec::new() };
        for (group, prefixes) in tables {
            classifier.extend(group, prefixes.iter().copied());
        }
        classifier
    }
}

impl ImportClassifier {
    /// Built-in tables extended with configured `[import_groups]`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unknown group.
    pub fn with_groups(groups: &BTreeMap<String, Vec<String>>) -> Result<Self, String> {
        let mut classifier = Self::default();
        for (name, prefixes) in groups {
            let group: ImportGroup = name.parse()?;
            classifier.extend(group, prefixes.iter().cloned());
        }
        Ok(classifier)
    }

    /// Adds module prefixes to a group. Later additions win over built-ins
    /// of the same length.
    pub fn extend<I, S>(&mut self, group: ImportGroup, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into();
            self.map.retain(|(p, _)| *p != prefix);
            self.map.push((prefix, group));
        }
        // Longest prefix first for correct matching
        self.map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Which group does this import belong to?
    #[must_use]
    pub fn classify(&self, source: &str, type_only: bool) -> ImportGroup {
        if type_only {
            return ImportGroup::Type;
        }
        if source.starts_with('.') {
            return ImportGroup::Internal;
        }
        self.map
            .iter()
            .find(|(prefix, _)| matches_prefix(source, prefix))
            .map_or(ImportGroup::External, |(_, group)| *group)
    }
}

fn matches_prefix(source: &str, prefix: &str) -> bool {
    if prefix.ends_with('/') {
        return source.starts_with(prefix);
    }
    source == prefix
        || source
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
