//! Grammar dialects of the ECMAScript family.

use std::fmt;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tree_sitter::Language;

use super::Analyzer;

/// A concrete grammar used to parse a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    TypeScript,
    /// Accepts plain JavaScript, TypeScript and JSX.
    #[default]
    Tsx,
    JavaScript,
}

impl Dialect {
    /// The tree-sitter language for this dialect.
    pub fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Map a file extension (without dot) to a dialect.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            "js" | "mjs" | "cjs" | "jsx" => Some(Dialect::JavaScript),
            _ => None,
        }
    }

    /// Every extension handled by some dialect.
    pub fn file_extensions() -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
            Dialect::JavaScript => "javascript",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configured dialect selection: a fixed dialect or per-file detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectChoice {
    #[default]
    Auto,
    TypeScript,
    Tsx,
    JavaScript,
}

impl DialectChoice {
    /// Resolve the dialect for a path. `Auto` falls back to the default
    /// dialect when the extension is unknown.
    pub fn resolve(self, path: &Path) -> Dialect {
        match self {
            DialectChoice::TypeScript => Dialect::TypeScript,
            DialectChoice::Tsx => Dialect::Tsx,
            DialectChoice::JavaScript => Dialect::JavaScript,
            DialectChoice::Auto => path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(Dialect::from_extension)
                .unwrap_or_default(),
        }
    }
}

/// Static storage for the TypeScript analyzer.
static TYPESCRIPT_ANALYZER: OnceCell<Analyzer> = OnceCell::new();

/// Static storage for the TSX analyzer.
static TSX_ANALYZER: OnceCell<Analyzer> = OnceCell::new();

/// Static storage for the JavaScript analyzer.
static JAVASCRIPT_ANALYZER: OnceCell<Analyzer> = OnceCell::new();

/// Get the shared analyzer for a dialect, creating it on first use.
pub fn analyzer_for(dialect: Dialect) -> &'static Analyzer {
    let cell = match dialect {
        Dialect::TypeScript => &TYPESCRIPT_ANALYZER,
        Dialect::Tsx => &TSX_ANALYZER,
        Dialect::JavaScript => &JAVASCRIPT_ANALYZER,
    };
    cell.get_or_init(|| Analyzer::new(dialect))
}
