//! Source file discovery.

use crate::pattern::{GlobPattern, PatternError};
use crate::source::{FileRole, RoleResolver};
use crate::types::Violation;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Paths never analyzed: dependencies, build outputs, generated declarations.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.next/**",
    "**/out/**",
    "**/coverage/**",
    "**/.git/**",
    "**/*.d.ts",
];

/// The project root could not be walked.
#[derive(Debug, thiserror::Error)]
#[error("cannot read project root {path}: {source}")]
pub struct RootUnreadable {
    /// Root path.
    pub path: PathBuf,
    /// Underlying IO error.
    pub source: std::io::Error,
}

/// A file selected for analysis. Text is read later by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute (or root-joined) path.
    pub path: PathBuf,
    /// Path relative to the root.
    pub relative_path: PathBuf,
    /// Inferred role.
    pub role: FileRole,
}

/// Result of a walk: files in lexicographic order plus skipped-entry
/// diagnostics.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Candidate files, sorted by relative path.
    pub files: Vec<DiscoveredFile>,
    /// Warnings for entries the walker could not visit.
    pub skipped: Vec<Violation>,
}

/// Walks a project tree and selects source files.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    root: PathBuf,
    excludes: Vec<GlobPattern>,
    extensions: Vec<String>,
    respect_gitignore: bool,
    roles: RoleResolver,
}

impl SourceLoader {
    /// Creates a loader with the default ignore list.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in patterns; the `Result` covers their
    /// compilation.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PatternError> {
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .map(|p| GlobPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root: root.into(),
            excludes,
            extensions: vec!["ts".into(), "tsx".into(), "js".into(), "jsx".into()],
            respect_gitignore: true,
            roles: RoleResolver::default(),
        })
    }

    /// Adds an exclude glob.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid.
    pub fn exclude(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.excludes.push(GlobPattern::new(pattern)?);
        Ok(self)
    }

    /// Restricts discovery to these extensions (without dots).
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether `.gitignore` files are honored (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    /// Sets the role resolver.
    #[must_use]
    pub fn roles(mut self, roles: RoleResolver) -> Self {
        self.roles = roles;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree.
    ///
    /// # Errors
    ///
    /// Returns [`RootUnreadable`] if the root is missing or not a readable
    /// directory. Errors on individual entries are reported in
    /// [`Discovery::skipped`] instead.
    pub fn discover(&self) -> Result<Discovery, RootUnreadable> {
        std::fs::read_dir(&self.root).map_err(|source| RootUnreadable {
            path: self.root.clone(),
            source,
        })?;

        let root = Arc::new(self.root.clone());
        let excludes = Arc::new(self.excludes.clone());
        let mut builder = ignore::WalkBuilder::new(self.root.as_path());
        builder
            .hidden(false)
            .parents(self.respect_gitignore)
            .git_ignore(self.respect_gitignore)
            .git_global(false)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .ignore(false);
        {
            let root = Arc::clone(&root);
            let excludes = Arc::clone(&excludes);
            builder.filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let rel = entry.path().strip_prefix(root.as_path()).unwrap_or(entry.path());
                !excludes.iter().any(|p| p.matches_dir(rel))
            });
        }

        let mut discovery = Discovery::default();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let file = error_path(&err)
                        .map(|p| p.strip_prefix(root.as_path()).unwrap_or(p).to_path_buf())
                        .unwrap_or_else(|| PathBuf::from("."));
                    warn!(file = %file.display(), "Skipping unreadable entry: {err}");
                    discovery
                        .skipped
                        .push(Violation::io_error(file, format!("skipped during discovery: {err}")));
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !self.extensions.iter().any(|e| e == ext) {
                continue;
            }
            let relative = path.strip_prefix(root.as_path()).unwrap_or(path);
            if excludes.iter().any(|p| p.matches(relative)) {
                debug!("Excluding: {}", relative.display());
                continue;
            }
            discovery.files.push(DiscoveredFile {
                path: path.to_path_buf(),
                relative_path: relative.to_path_buf(),
                role: self.roles.resolve(relative),
            });
        }

        discovery
            .files
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(
            files = discovery.files.len(),
            skipped = discovery.skipped.len(),
            "Discovery complete"
        );
        Ok(discovery)
    }
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    fn relative(discovery: &Discovery) -> Vec<String> {
        discovery
            .files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn default_excludes_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/components/Cart/Cart.tsx");
        touch(root, "src/utils/format.ts");
        touch(root, "src/legacy/widget.jsx");
        touch(root, "src/env.d.ts");
        touch(root, "src/styles.css");
        touch(root, "node_modules/react/index.js");
        touch(root, "dist/bundle.js");
        touch(root, ".next/server/page.js");

        let discovery = SourceLoader::new(root).unwrap().discover().unwrap();
        assert_eq!(
            relative(&discovery),
            [
                "src/components/Cart/Cart.tsx",
                "src/legacy/widget.jsx",
                "src/utils/format.ts",
            ]
        );
        assert_eq!(discovery.files[0].role, FileRole::ComponentEntry);
        assert!(discovery.skipped.is_empty());
    }

    #[test]
    fn honors_gitignore_and_user_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        touch(root, "src/generated/api.ts");
        touch(root, "src/stories/Cart.stories.tsx");
        touch(root, "src/App.tsx");

        let loader = SourceLoader::new(root)
            .unwrap()
            .exclude("**/*.stories.tsx")
            .unwrap();
        assert_eq!(relative(&loader.discover().unwrap()), ["src/App.tsx"]);

        let all = SourceLoader::new(root)
            .unwrap()
            .respect_gitignore(false)
            .discover()
            .unwrap();
        assert_eq!(
            relative(&all),
            [
                "src/App.tsx",
                "src/generated/api.ts",
                "src/stories/Cart.stories.tsx"
            ]
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceLoader::new(dir.path().join("nope"))
            .unwrap()
            .discover()
            .unwrap_err();
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn extension_list_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.ts");
        touch(dir.path(), "b.js");
        let discovery = SourceLoader::new(dir.path())
            .unwrap()
            .extensions(["ts"])
            .discover()
            .unwrap();
        assert_eq!(relative(&discovery), ["a.ts"]);
    }
}
