//! Structural code analysis for the ECMAScript family.
//!
//! This module turns one JavaScript/TypeScript source unit into a
//! [`CodeStructure`]: top-level functions, classes with their methods, doc
//! comments and line facts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source text │────▶│ Analyzer     │────▶│ Walker       │────▶│ CodeStructure │
//! └─────────────┘     │ (tree-sitter │     │ (Construct   │     │ (functions,   │
//!                     │  per dialect)│     │  dispatch)   │     │  classes)     │
//!                     └──────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! Parsing never fails from the caller's point of view: unparseable input and
//! internal errors both come back as `CodeStructure::invalid`.

mod analyzer;
mod comments;
mod context;
mod dialect;
mod facts;
mod parsed;
mod walker;

use thiserror::Error;

pub use analyzer::{analyze, analyze_bytes, Analyzer};
pub use comments::clean_block_comment;
pub use context::{AnalysisContext, AnalyzedUnit};
pub use dialect::{analyzer_for, Dialect, DialectChoice};
pub use facts::{
    count_lines, total_lines, ClassRecord, CodeStructure, FunctionRecord, LineStats, Span,
};
pub use parsed::ParsedUnit;
pub use walker::{ANONYMOUS, PARAM_PLACEHOLDER};

/// Errors raised while analyzing a unit.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The unit does not parse.
    #[error("{0}")]
    Syntax(String),

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree")]
    NoTree,

    #[error("node span {start}..{end} is outside the source")]
    SpanOutOfRange { start: usize, end: usize },

    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
}
