//! docgauge - structural analysis and documentation quality scoring for
//! JavaScript and TypeScript.
//!
//! docgauge extracts the functions and classes of a source unit, synthesizes
//! JSDoc documentation for them, and scores documentation text against a
//! reference.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `analysis`: Source unit to [`CodeStructure`] (functions, classes, doc comments)
//! - `synth`: Documentation payload synthesis (local templates or a remote model)
//! - `render`: JSDoc blocks and the combined markdown document
//! - `evaluation`: Keyword overlap, coverage, length and consistency metrics
//! - `score`: Weighting and grading
//! - `config`: YAML configuration
//! - `report`: Output formatting (pretty, JSON, markdown)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod evaluation;
pub mod render;
pub mod report;
pub mod score;
pub mod synth;

pub use analysis::{
    analyze, analyze_bytes, AnalysisContext, Analyzer, ClassRecord, CodeStructure, Dialect,
    DialectChoice, FunctionRecord,
};
pub use config::Config;
pub use evaluation::{evaluate, evaluate_payloads, EvaluationResult};
pub use score::Grade;
pub use synth::{DocumentationPayload, LocalSynthesizer, RemoteSynthesizer, Synthesizer};
