//! A parse tree bundled with the text it was built from.

use super::{AnalysisError, Span};

/// Holds a parsed tree-sitter tree and the source it borrows from.
///
/// Kept separate from `CodeStructure` so one tree serves every extraction pass.
pub struct ParsedUnit<'s> {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source text.
    pub source: &'s str,
    lines: Vec<&'s str>,
}

impl<'s> ParsedUnit<'s> {
    pub fn new(tree: tree_sitter::Tree, source: &'s str) -> Self {
        Self {
            tree,
            source,
            lines: source.split('\n').collect(),
        }
    }

    /// Root node of the tree.
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Number of `'\n'`-separated lines in the source.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get text for a tree-sitter node.
    ///
    /// Fails when the node's byte range is not a valid slice of the source.
    pub fn node_text(&self, node: tree_sitter::Node) -> Result<&'s str, AnalysisError> {
        let range = node.byte_range();
        self.source
            .get(range.clone())
            .ok_or(AnalysisError::SpanOutOfRange {
                start: range.start,
                end: range.end,
            })
    }

    /// Join source lines `span.start_line..=span.end_line` with `'\n'`.
    ///
    /// Carriage returns stay attached to their lines.
    pub fn line_slice(&self, span: &Span) -> Result<String, AnalysisError> {
        let start = span.start_line.saturating_sub(1);
        let end = span.end_line.min(self.lines.len());
        if start >= end {
            return Err(AnalysisError::SpanOutOfRange {
                start: span.start_byte,
                end: span.end_byte,
            });
        }
        Ok(self.lines[start..end].join("\n"))
    }
}
