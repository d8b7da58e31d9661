//! # conform-ts
//!
//! Tree-sitter based normalizer for TypeScript, TSX, and JavaScript sources.
//!
//! It turns a [`SourceFile`](conform_core::SourceFile) into the
//! syntax-independent [`FileIr`](conform_core::FileIr) that
//! `conform-core` rules are evaluated against:
//!
//! - [`TsxNormalizer`] parses with the TypeScript or TSX grammar
//! - [`ImportClassifier`] maps module specifiers to import groups

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod imports;
pub mod normalizer;

pub use imports::ImportClassifier;
pub use normalizer::TsxNormalizer;
