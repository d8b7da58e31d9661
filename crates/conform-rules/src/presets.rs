//! Catalog presets for common adoption levels.

use conform_core::{Catalog, Severity};
use std::fmt;
use std::str::FromStr;

/// Rules kept by [`Preset::Minimal`].
pub const MINIMAL_RULES: &[&str] = &[
    "component-name-pascal",
    "hook-name",
    "hooks-at-top",
    "action-type-case",
    "reset-returns-initial-state",
];

/// Preset configurations applied on top of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// The catalog as written.
    #[default]
    Recommended,
    /// Every rule, with warnings promoted to errors.
    Strict,
    /// Correctness rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::Strict, Self::Minimal];

    /// Preset name as used in config and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Applies this preset to a catalog.
    #[must_use]
    pub fn apply(self, catalog: Catalog) -> Catalog {
        match self {
            Self::Recommended => catalog,
            Self::Strict => catalog.map_rules(|r| r.with_severity(Severity::Error)),
            Self::Minimal => catalog.retain(|r| MINIMAL_RULES.contains(&r.id().as_str())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!("unknown preset `{s}` (expected recommended, strict, or minimal)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_catalog;

    #[test]
    fn recommended_keeps_catalog() {
        let catalog = builtin_catalog().unwrap();
        let len = catalog.len();
        assert_eq!(Preset::Recommended.apply(catalog).len(), len);
    }

    #[test]
    fn strict_promotes_warnings() {
        let catalog = Preset::Strict.apply(builtin_catalog().unwrap());
        assert!(catalog
            .rules()
            .iter()
            .all(|r| r.severity() == Severity::Error));
    }

    #[test]
    fn minimal_keeps_listed_rules() {
        let catalog = Preset::Minimal.apply(builtin_catalog().unwrap());
        assert_eq!(catalog.len(), MINIMAL_RULES.len());
        assert!(catalog.get("quote-style").is_none());
        assert!(catalog.get("hooks-at-top").is_some());
    }

    #[test]
    fn parses_names() {
        assert_eq!("strict".parse::<Preset>(), Ok(Preset::Strict));
        assert!("lenient".parse::<Preset>().is_err());
        assert_eq!(Preset::default(), Preset::Recommended);
    }
}
