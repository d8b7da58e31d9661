//! # conform-rules
//!
//! Built-in convention catalog for conform.
//!
//! The catalog is a TOML document compiled into the binary. It encodes a
//! React + TypeScript style guide as declarative rules:
//!
//! | Id | Roles | Description |
//! |----|-------|-------------|
//! | `component-name-pascal` | component, sub-component, page, form | Components are PascalCase |
//! | `hook-name` | hook | Hooks are camelCase starting with `use` |
//! | `util-name-camel` | util | Utilities are camelCase |
//! | `context-name` | context | Contexts end with `Context` |
//! | `type-name-pascal` | * | Types are PascalCase |
//! | `component-file-name` | component, sub-component | Component files are PascalCase |
//! | `hook-file-name` | hook | Hook files are named `useX` |
//! | `component-default-export` | component, page | Default-exported function declarations |
//! | `sub-component-named-arrow` | sub-component | Named arrow exports |
//! | `import-order` | * | Grouped imports |
//! | `hooks-at-top` | components, hooks, context | Hooks before other statements |
//! | `early-return-null` | components | Early returns yield `null` |
//! | `component-body` | components | Padded, non-trivial bodies |
//! | `class-name-order` | components | Responsive classes last |
//! | `action-type-case` | reducer, context, actions | SCREAMING_SNAKE action types |
//! | `reset-returns-initial-state` | reducer, context | Reset returns the initial state |
//! | `quote-style` | * | Double quotes |
//! | `no-string-concat` | * | Template literals |
//! | `form-uses-react-hook-form` | form | Forms use react-hook-form |
//!
//! ## Usage
//!
//! ```ignore
//! use conform_rules::{builtin_catalog, Preset};
//!
//! let catalog = Preset::Strict.apply(builtin_catalog()?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod presets;

pub use catalog::{builtin_catalog, GUIDE_CATALOG};
pub use presets::{Preset, MINIMAL_RULES};

/// Re-export core types for convenience.
pub use conform_core::{Catalog, CatalogError, Rule, Severity};
