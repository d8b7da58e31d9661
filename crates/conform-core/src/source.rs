//! Loaded source files and role inference.

use crate::pattern::GlobPattern;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A file's inferred purpose, used to scope which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    /// The entry file of a component directory.
    #[serde(rename = "component")]
    ComponentEntry,
    /// A secondary component file beside an entry.
    SubComponent,
    /// A custom hook file.
    Hook,
    /// A utility module.
    Util,
    /// A form component.
    Form,
    /// A context/provider module.
    Context,
    /// A routed page.
    Page,
    /// A reducer module.
    Reducer,
    /// API action / action-creator module.
    Actions,
    /// Anything unclassified.
    Other,
}

impl FileRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::ComponentEntry,
        Self::SubComponent,
        Self::Hook,
        Self::Util,
        Self::Form,
        Self::Context,
        Self::Page,
        Self::Reducer,
        Self::Actions,
        Self::Other,
    ];

    /// Returns the catalog name of this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComponentEntry => "component",
            Self::SubComponent => "sub-component",
            Self::Hook => "hook",
            Self::Util => "util",
            Self::Form => "form",
            Self::Context => "context",
            Self::Page => "page",
            Self::Reducer => "reducer",
            Self::Actions => "actions",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role `{s}`"))
    }
}

/// A source file loaded from the project tree. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    relative_path: PathBuf,
    text: String,
    role: FileRole,
}

impl SourceFile {
    /// Creates a source file; `relative_path` is relative to the project root.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        text: impl Into<String>,
        role: FileRole,
    ) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
            text: text.into(),
            role,
        }
    }

    /// Builds an in-memory file, inferring its role from the relative path.
    #[must_use]
    pub fn in_memory(relative_path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let role = RoleResolver::default().resolve(&relative_path);
        Self::new(relative_path.clone(), relative_path, text, role)
    }

    /// Absolute path on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the project root; used in reports.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Raw file text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Inferred role.
    #[must_use]
    pub fn role(&self) -> FileRole {
        self.role
    }

    /// Number of lines in the file (at least 1).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }

    /// File name without any extension (`Cart.test.tsx` → `Cart`).
    #[must_use]
    pub fn stem(&self) -> &str {
        file_stem(&self.relative_path)
    }
}

/// Maps project-relative paths to roles.
///
/// Configured globs are consulted first, in order; unmatched paths fall
/// back to naming heuristics.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    overrides: Vec<(FileRole, Vec<GlobPattern>)>,
}

impl RoleResolver {
    /// Creates a resolver with configured role globs.
    #[must_use]
    pub fn new(overrides: Vec<(FileRole, Vec<GlobPattern>)>) -> Self {
        Self { overrides }
    }

    /// Which role does this path play?
    #[must_use]
    pub fn resolve(&self, relative_path: &Path) -> FileRole {
        self.overrides
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.matches(relative_path)))
            .map_or_else(|| infer_role(relative_path), |(role, _)| *role)
    }
}

fn file_stem(path: &Path) -> &str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.split('.').next().unwrap_or(name)
}

fn is_pascal_start(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn infer_role(path: &Path) -> FileRole {
    let stem = file_stem(path);
    let lower = stem.to_ascii_lowercase();
    let dirs: Vec<String> = path
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().to_ascii_lowercase()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    let in_dir = |names: &[&str]| dirs.iter().any(|d| names.contains(&d.as_str()));
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if in_dir(&["pages", "app"]) || lower == "page" {
        return FileRole::Page;
    }
    if (stem.starts_with("use") && stem[3..].chars().next().is_some_and(|c| c.is_ascii_uppercase()))
        || in_dir(&["hooks"])
    {
        return FileRole::Hook;
    }
    if stem.ends_with("Context") || stem.ends_with("Provider") || in_dir(&["context", "contexts"])
    {
        return FileRole::Context;
    }
    if lower.contains("reducer") {
        return FileRole::Reducer;
    }
    if lower.contains("actions") || in_dir(&["actions", "api"]) {
        return FileRole::Actions;
    }
    if stem.ends_with("Form") || in_dir(&["forms"]) {
        return FileRole::Form;
    }
    if in_dir(&["utils", "lib", "helpers"]) {
        return FileRole::Util;
    }
    if matches!(ext, "tsx" | "jsx") {
        let parent = dirs.last().map(String::as_str).unwrap_or("");
        if lower == "index" || (!parent.is_empty() && lower == parent) {
            return FileRole::ComponentEntry;
        }
        if is_pascal_start(stem) {
            return FileRole::SubComponent;
        }
    }
    FileRole::Other
}
