//! Compiled glob patterns for matching project-relative paths.

use std::fmt;
use std::path::Path;

/// Error for an unusable glob pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern is empty.
    #[error("glob pattern must not be empty")]
    Empty,
    /// The pattern has invalid glob syntax.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    Invalid {
        /// The invalid pattern.
        pattern: String,
        /// Parser message.
        reason: String,
    },
}

/// A validated glob pattern.
///
/// The glob is compiled once at construction and reused for all match calls.
/// Paths are compared with `/` separators regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
    dir: Option<glob::Pattern>,
}

impl GlobPattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let compile = |p: &str| {
            glob::Pattern::new(p).map_err(|e| PatternError::Invalid {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        };
        let compiled = compile(pattern)?;
        let dir = match pattern.strip_suffix("/**") {
            Some(prefix) if !prefix.is_empty() => Some(compile(prefix)?),
            _ => None,
        };
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
            dir,
        })
    }

    /// Tests whether a relative file path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = normalize(path);
        if self.compiled.matches(&path_str) {
            return true;
        }
        // `dir/**` also covers everything below a directory matched by `dir`.
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if !normalized.contains('*')
                && path_str.starts_with(normalized)
                && path_str.as_bytes().get(normalized.len()) == Some(&b'/')
            {
                return true;
            }
        }
        false
    }

    /// Tests whether a directory should be pruned as a whole.
    ///
    /// Only `…/**` patterns prune directories.
    #[must_use]
    pub fn matches_dir(&self, dir: &Path) -> bool {
        let dir_str = normalize(dir);
        self.dir.as_ref().is_some_and(|p| p.matches(&dir_str))
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
