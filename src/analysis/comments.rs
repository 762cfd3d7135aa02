//! Doc comment attachment and cleaning.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use super::{AnalysisError, ParsedUnit};

const COMMENT_QUERY: &str = "(comment) @comment";

/// Find the block comment attached to `anchor`.
///
/// Walks preceding siblings, skipping decorators. The first comment found is
/// used when it is a block comment; a line comment or any other node breaks
/// the attachment.
pub(crate) fn doc_comment_for(
    unit: &ParsedUnit,
    anchor: Node,
) -> Result<Option<String>, AnalysisError> {
    let mut prev = anchor.prev_sibling();
    while let Some(node) = prev {
        match node.kind() {
            "decorator" => prev = node.prev_sibling(),
            "comment" => {
                let text = unit.node_text(node)?;
                return Ok(if text.starts_with("/*") {
                    clean_block_comment(text)
                } else {
                    None
                });
            }
            _ => return Ok(None),
        }
    }
    Ok(None)
}

/// The first comment of the unit, when it starts on line 1.
pub(crate) fn module_doc_comment(
    unit: &ParsedUnit,
    language: &Language,
) -> Result<Option<String>, AnalysisError> {
    let query = Query::new(language, COMMENT_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, unit.root(), unit.source.as_bytes());

    let Some(m) = matches.next() else {
        return Ok(None);
    };
    let Some(capture) = m.captures.first() else {
        return Ok(None);
    };
    let node = capture.node;
    if node.start_position().row != 0 {
        return Ok(None);
    }

    let text = unit.node_text(node)?;
    if text.starts_with("/*") {
        Ok(clean_block_comment(text))
    } else {
        let stripped = text.trim_start_matches('/').trim();
        Ok((!stripped.is_empty()).then(|| stripped.to_string()))
    }
}

/// Clean a raw `/* ... */` or `/** ... */` comment.
///
/// Strips the opener and closer (with any extra `*` before it), then leading
/// whitespace plus a run of `*`
/// from each line, removes the common indentation of non-blank lines and
/// drops blank lines at both ends. Returns `None` when nothing is left.
pub fn clean_block_comment(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix("/*")?;
    let inner = inner
        .strip_suffix("*/")
        .map(|body| body.trim_end_matches('*'))
        .unwrap_or(inner)
        .trim_start_matches('*');

    let lines: Vec<&str> = inner
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            let line = if trimmed.starts_with('*') {
                trimmed.trim_start_matches('*')
            } else {
                line
            };
            line.trim_end()
        })
        .collect();

    let indent = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|l| if l.is_empty() { *l } else { &l[indent..] })
        .collect();

    let first = dedented.iter().position(|l| !l.is_empty())?;
    let last = dedented.iter().rposition(|l| !l.is_empty())?;
    Some(dedented[first..=last].join("\n"))
}
