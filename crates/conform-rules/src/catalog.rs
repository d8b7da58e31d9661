//! The compiled-in guide catalog.

use conform_core::catalog::parse_catalog;
use conform_core::{Catalog, CatalogError};
use tracing::debug;

/// Source of the built-in catalog.
pub const GUIDE_CATALOG: &str = include_str!("../catalog/guide.toml");

/// Parses the built-in catalog.
///
/// # Errors
///
/// Returns an error only if the embedded document is malformed.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    let catalog = parse_catalog("guide.toml", GUIDE_CATALOG)?;
    debug!(rules = catalog.len(), "Loaded built-in catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conform_core::{FileRole, Severity};

    #[test]
    fn builtin_catalog_loads() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.version(), 1);
        assert_eq!(catalog.len(), 19);
    }

    #[test]
    fn rule_ids_are_stable() {
        let catalog = builtin_catalog().unwrap();
        let ids: Vec<&str> = catalog.rules().iter().map(|r| r.id().as_str()).collect();
        insta::assert_snapshot!(ids.join("\n"), @r"
        component-name-pascal
        hook-name
        util-name-camel
        context-name
        type-name-pascal
        component-file-name
        hook-file-name
        component-default-export
        sub-component-named-arrow
        import-order
        hooks-at-top
        early-return-null
        component-body
        class-name-order
        action-type-case
        reset-returns-initial-state
        quote-style
        no-string-concat
        form-uses-react-hook-form
        ");
    }

    #[test]
    fn every_role_has_rules() {
        let catalog = builtin_catalog().unwrap();
        for role in FileRole::ALL {
            assert!(
                catalog.for_role(role).next().is_some(),
                "no rules for role {role}"
            );
        }
    }

    #[test]
    fn style_rules_are_warnings() {
        let catalog = builtin_catalog().unwrap();
        for id in ["quote-style", "no-string-concat", "class-name-order"] {
            assert_eq!(catalog.get(id).unwrap().severity(), Severity::Warning);
        }
        assert_eq!(catalog.get("import-order").unwrap().severity(), Severity::Error);
    }
}
