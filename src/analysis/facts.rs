//! Structural facts extracted from one source unit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A function or method extracted from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    /// Declared or bound name, `"anonymous"` when none can be recovered.
    pub name: String,
    /// Parameter names in declaration order.
    pub parameters: Vec<String>,
    /// Raw return type annotation, without the leading `:`.
    pub return_type_text: Option<String>,
    /// Cleaned text of the attached block comment.
    pub leading_doc_comment: Option<String>,
    /// First line (1-indexed, inclusive).
    pub line_start: usize,
    /// Last line (1-indexed, inclusive).
    pub line_end: usize,
    /// Verbatim source lines `line_start..=line_end`.
    pub body_text: String,
    pub is_async: bool,
    /// Best effort. Always false for class methods.
    pub is_exported: bool,
}

impl FunctionRecord {
    /// Number of source lines covered by the record.
    pub fn line_count(&self) -> usize {
        self.line_end.saturating_sub(self.line_start) + 1
    }

    /// Whether the source already carries a doc comment for this function.
    pub fn has_doc_comment(&self) -> bool {
        self.leading_doc_comment.is_some()
    }
}

/// A class declaration and its ordinary methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub name: String,
    /// Method-kind members in source order. Constructors and accessors are excluded.
    pub methods: Vec<FunctionRecord>,
    pub leading_doc_comment: Option<String>,
    pub line_start: usize,
    pub line_end: usize,
}

/// The structural model of one source unit.
///
/// An invalid structure never carries partial results: build one through
/// [`CodeStructure::invalid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStructure {
    /// Top-level functions only.
    pub functions: Vec<FunctionRecord>,
    /// Every class in the unit, in document order.
    pub classes: Vec<ClassRecord>,
    pub module_doc_comment: Option<String>,
    pub total_line_count: usize,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CodeStructure {
    /// Create a valid structure.
    pub fn valid(
        functions: Vec<FunctionRecord>,
        classes: Vec<ClassRecord>,
        module_doc_comment: Option<String>,
        total_line_count: usize,
    ) -> Self {
        Self {
            functions,
            classes,
            module_doc_comment,
            total_line_count,
            is_valid: true,
            error_message: None,
        }
    }

    /// Create a structure for unparseable input.
    pub fn invalid(message: impl Into<String>, total_line_count: usize) -> Self {
        Self {
            functions: Vec::new(),
            classes: Vec::new(),
            module_doc_comment: None,
            total_line_count,
            is_valid: false,
            error_message: Some(message.into()),
        }
    }

    /// Top-level functions followed by every class's methods.
    pub fn documentable_functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }

    /// Number of documentable functions.
    pub fn function_count(&self) -> usize {
        self.documentable_functions().count()
    }

    /// Find the first documentable function with the given name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionRecord> {
        self.documentable_functions().find(|f| f.name == name)
    }

    /// Find a class by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Line counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    pub total: usize,
    pub blank: usize,
    pub comment: usize,
    pub code: usize,
}

/// Number of `'\n'`-separated segments. The empty string has one line.
pub fn total_lines(source: &str) -> usize {
    source.split('\n').count()
}

/// Count total, blank, comment and code lines.
///
/// A comment line starts with `//`, `/*`, `*` or `*/` once trimmed.
pub fn count_lines(source: &str) -> LineStats {
    let mut stats = LineStats::default();
    for line in source.split('\n') {
        stats.total += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            stats.blank += 1;
        } else if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
        {
            stats.comment += 1;
        }
    }
    stats.code = stats.total - stats.blank - stats.comment;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            parameters: vec![],
            return_type_text: None,
            leading_doc_comment: None,
            line_start: 3,
            line_end: 5,
            body_text: String::new(),
            is_async: false,
            is_exported: false,
        }
    }

    #[test]
    fn test_documentable_functions_order() {
        let structure = CodeStructure::valid(
            vec![record("top")],
            vec![ClassRecord {
                name: "Cache".to_string(),
                methods: vec![record("get"), record("put")],
                leading_doc_comment: None,
                line_start: 1,
                line_end: 10,
            }],
            None,
            10,
        );

        let names: Vec<_> = structure
            .documentable_functions()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["top", "get", "put"]);
        assert_eq!(structure.function_count(), 3);
        assert!(structure.find_function("put").is_some());
        assert!(structure.find_function("missing").is_none());
        assert!(structure.find_class("Cache").is_some());
    }

    #[test]
    fn test_invalid_has_no_facts() {
        let structure = CodeStructure::invalid("Syntax error at line 1, column 1: unexpected `(`", 2);
        assert!(!structure.is_valid);
        assert!(structure.functions.is_empty());
        assert!(structure.classes.is_empty());
        assert!(structure.module_doc_comment.is_none());
        assert_eq!(structure.total_line_count, 2);
        assert!(structure.error_message.is_some());
    }

    #[test]
    fn test_total_lines() {
        assert_eq!(total_lines(""), 1);
        assert_eq!(total_lines("a"), 1);
        assert_eq!(total_lines("a\n"), 2);
        assert_eq!(total_lines("a\r\nb"), 2);
    }

    #[test]
    fn test_count_lines() {
        let stats = count_lines("// header\n\nconst a = 1;\n/**\n * doc\n */\nfunction f() {}");
        assert_eq!(stats.total, 7);
        assert_eq!(stats.blank, 1);
        assert_eq!(stats.comment, 4);
        assert_eq!(stats.code, 2);
    }

    #[test]
    fn test_record_line_count() {
        assert_eq!(record("f").line_count(), 3);
    }

    #[test]
    fn test_structure_json_is_camel_case() {
        let json = serde_json::to_string(&CodeStructure::valid(vec![record("f")], vec![], None, 1))
            .unwrap();
        assert!(json.contains("\"totalLineCount\":1"));
        assert!(json.contains("\"isValid\":true"));
        assert!(json.contains("\"returnTypeText\":null"));
        assert!(!json.contains("errorMessage"));
    }
}
