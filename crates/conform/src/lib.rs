//! # conform
//!
//! Checks a TypeScript/React codebase against a declarative convention
//! catalog.
//!
//! This is the facade crate: it re-exports the core framework, the
//! built-in catalog, and the tree-sitter normalizer, and wires them
//! together.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let report = conform::lint_project("./web")?;
//! for v in &report.violations {
//!     println!("{v}");
//! }
//! std::process::exit(report.exit_code(conform::FailOn::Error).into());
//! ```
//!
//! ## Configured runs
//!
//! ```rust,ignore
//! use conform::{Overrides, Setup};
//!
//! let config = conform::load_project_config("./web".as_ref())?;
//! let setup = Setup::with_overrides(config, &Overrides {
//!     preset: Some("strict".into()),
//!     ..Overrides::default()
//! })?;
//! let report = setup.analyzer("./web".as_ref())?.build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use conform_core::*;

/// Built-in catalog and presets.
pub mod rules {
    pub use conform_rules::*;
}

/// Tree-sitter normalizer for TypeScript and TSX.
pub mod ts {
    pub use conform_ts::*;
}

mod setup;

pub use setup::{
    find_config, lint_project, lint_source, load_project_config, Overrides, Setup, SetupError,
    CONFIG_CANDIDATES,
};
