//! # conform-core
//!
//! Core framework for checking a TypeScript/React codebase against a
//! declarative convention catalog.
//!
//! This crate is language-agnostic at its seams. It includes:
//!
//! - [`Normalizer`] trait turning source text into a syntax-independent [`FileIr`]
//! - [`Catalog`] of rules loaded from versioned TOML
//! - [`RuleEngine`] evaluating applicable rules per file
//! - [`Analyzer`] running the bounded concurrent pipeline
//! - [`Report`] and [`render`] for output
//!
//! ## Example
//!
//! ```ignore
//! use conform_core::{catalog, Analyzer};
//! use std::sync::Arc;
//!
//! let catalog = catalog::load_catalog_file("guide.toml".as_ref())?;
//! let analyzer = Analyzer::builder(Arc::new(MyNormalizer), Arc::new(catalog))
//!     .root("./web")
//!     .build()?;
//!
//! let report = analyzer.analyze()?;
//! std::process::exit(report.exit_code(FailOn::Error).into());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod analyzer;
pub mod catalog;
mod config;
mod discovery;
mod engine;
pub mod ir;
mod pattern;
mod report;
mod source;
mod types;

pub use aggregate::Aggregator;
pub use analyzer::{evaluate_file, Analyzer, AnalyzerBuilder, AnalyzerError, READ_RETRY_BACKOFF};
pub use catalog::{Catalog, CatalogError, Rule};
pub use config::{AnalyzerConfig, Config, ConfigError, RoleConfig, RuleConfig};
pub use discovery::{DiscoveredFile, Discovery, RootUnreadable, SourceLoader, DEFAULT_EXCLUDES};
pub use engine::RuleEngine;
pub use ir::{FileIr, Normalizer, ParseError};
pub use pattern::{GlobPattern, PatternError};
pub use report::{render, OutputFormat, SeverityFilter};
pub use source::{FileRole, RoleResolver, SourceFile};
pub use types::{FailOn, Location, Report, Severity, Violation, ViolationKind};
