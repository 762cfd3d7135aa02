//! Source unit analyzer built on tree-sitter.

use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser};

use super::comments::module_doc_comment;
use super::dialect::analyzer_for;
use super::facts::total_lines;
use super::walker;
use super::{AnalysisError, CodeStructure, Dialect, ParsedUnit};

/// Maximum characters of offending text quoted in a syntax error.
const SNIPPET_CHARS: usize = 24;

/// Analyzer for one grammar dialect.
///
/// Holds only the tree-sitter language. A fresh `Parser` is created per call,
/// so one analyzer can be shared across threads.
pub struct Analyzer {
    dialect: Dialect,
    language: Language,
}

impl Analyzer {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            language: dialect.language(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse a source unit into a tree.
    ///
    /// Syntax errors still produce a tree with ERROR nodes.
    pub fn parse<'s>(&self, source: &'s str) -> Result<ParsedUnit<'s>, AnalysisError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or(AnalysisError::NoTree)?;
        Ok(ParsedUnit::new(tree, source))
    }

    /// Analyze a unit, surfacing every failure as an error.
    pub fn try_analyze(&self, source: &str) -> Result<CodeStructure, AnalysisError> {
        let unit = self.parse(source)?;

        if let Some(message) = syntax_error(&unit)? {
            return Err(AnalysisError::Syntax(message));
        }

        let collected = walker::collect(&unit)?;
        let module_doc = module_doc_comment(&unit, &self.language)?;

        debug!(
            dialect = %self.dialect,
            functions = collected.functions.len(),
            classes = collected.classes.len(),
            "analyzed unit"
        );

        Ok(CodeStructure::valid(
            collected.functions,
            collected.classes,
            module_doc,
            unit.line_count(),
        ))
    }

    /// Analyze a unit. Never fails: any error becomes an invalid structure.
    pub fn analyze(&self, source: &str) -> CodeStructure {
        match self.try_analyze(source) {
            Ok(structure) => structure,
            Err(AnalysisError::Syntax(message)) => {
                debug!(dialect = %self.dialect, %message, "unparseable unit");
                CodeStructure::invalid(message, total_lines(source))
            }
            Err(e) => {
                warn!(dialect = %self.dialect, error = %e, "analysis failed");
                CodeStructure::invalid(e.to_string(), total_lines(source))
            }
        }
    }
}

/// Analyze a unit with the default dialect, [`Dialect::Tsx`].
///
/// TSX accepts plain JavaScript, TypeScript and JSX, but not the TypeScript
/// angle-bracket cast `<T>expr`, which it reads as a JSX element. Use
/// [`analyzer_for`] with [`Dialect::TypeScript`] for sources that use it.
pub fn analyze(source: &str) -> CodeStructure {
    analyzer_for(Dialect::default()).analyze(source)
}

/// Analyze arbitrary bytes, decoded lossily as UTF-8.
pub fn analyze_bytes(bytes: &[u8]) -> CodeStructure {
    analyze(&String::from_utf8_lossy(bytes))
}

/// Describe the first ERROR or MISSING node in document order.
fn syntax_error(unit: &ParsedUnit) -> Result<Option<String>, AnalysisError> {
    let root = unit.root();
    if !root.has_error() {
        return Ok(None);
    }

    match first_error_node(root) {
        Some(node) => describe(unit, node).map(Some),
        None => Ok(Some("Syntax error: input could not be parsed".to_string())),
    }
}

/// Preorder search that only descends into subtrees containing errors.
fn first_error_node(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .children(&mut cursor)
            .filter(|child| child.has_error() || child.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn describe(unit: &ParsedUnit, node: Node) -> Result<String, AnalysisError> {
    let pos = node.start_position();
    let detail = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = unit
            .node_text(node)?
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(SNIPPET_CHARS)
            .collect();
        if snippet.is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{snippet}`")
        }
    };
    Ok(format!(
        "Syntax error at line {}, column {}: {}",
        pos.row + 1,
        pos.column + 1,
        detail
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_simple_function() {
        let structure = analyze("function add(a, b) {\n  return a + b;\n}\n");
        assert!(structure.is_valid);
        assert_eq!(structure.functions.len(), 1);

        let add = &structure.functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.parameters, vec!["a", "b"]);
        assert_eq!(add.line_start, 1);
        assert_eq!(add.line_end, 3);
        assert_eq!(add.body_text, "function add(a, b) {\n  return a + b;\n}");
        assert!(!add.is_async);
        assert!(!add.is_exported);
    }

    #[test]
    fn test_syntax_error_message() {
        let structure = analyze("function (");
        assert!(!structure.is_valid);
        assert!(structure.functions.is_empty());
        let message = structure.error_message.unwrap();
        assert!(message.starts_with("Syntax error at line 1"), "{message}");
    }

    #[test]
    fn test_empty_source() {
        let structure = analyze("");
        assert!(structure.is_valid);
        assert_eq!(structure.total_line_count, 1);
        assert_eq!(structure.function_count(), 0);
    }

    #[test]
    fn test_garbage_bytes_never_panic() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
        let structure = analyze_bytes(&bytes);
        if !structure.is_valid {
            assert!(structure.functions.is_empty());
            assert!(structure.classes.is_empty());
            assert!(structure.error_message.is_some());
        }
    }

    #[test]
    fn test_message_for_missing_token() {
        let structure = Analyzer::new(Dialect::JavaScript).analyze("function f() {\n  return 1;\n");
        assert!(!structure.is_valid);
        assert_eq!(structure.total_line_count, 3);
        assert!(structure.error_message.unwrap().contains("Syntax error at line"));
    }

    #[test]
    fn test_angle_bracket_cast_needs_typescript_dialect() {
        let source = "const cast = <number>foo;\n";
        assert!(!analyze(source).is_valid);
        assert!(analyzer_for(Dialect::TypeScript).analyze(source).is_valid);
    }

    #[test]
    fn test_idempotent() {
        let source = "/** Doc. */\nexport async function load(path: string): Promise<string> {\n  return path;\n}\n";
        assert_eq!(analyze(source), analyze(source));
    }
}
