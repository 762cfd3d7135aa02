//! Syntax tree traversal producing function and class records.
//!
//! The walk is an explicit preorder stack of `(node, scope)` pairs, so records
//! come out in document order. Each node is classified into a [`Construct`]
//! and handled by exactly one arm.

use tree_sitter::Node;

use super::comments::doc_comment_for;
use super::{AnalysisError, ClassRecord, FunctionRecord, ParsedUnit, Span};

/// Placeholder for names that cannot be recovered from the syntax.
pub const ANONYMOUS: &str = "anonymous";

/// Placeholder for destructured or otherwise complex parameters.
pub const PARAM_PLACEHOLDER: &str = "param";

/// Return type text used when the annotation span cannot be resolved.
const UNKNOWN_RETURN_TYPE: &str = "any";

/// Expression kinds that make a binding a function.
const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Directly under the program, or under a module-level `export`.
    Module,
    Nested,
}

/// Node kinds the walker reacts to.
enum Construct<'t> {
    Function(Node<'t>),
    Class(Node<'t>),
    Bindings(Node<'t>),
    Export(Node<'t>),
    Other(Node<'t>),
}

impl<'t> Construct<'t> {
    fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => Construct::Function(node),
            "class_declaration" | "abstract_class_declaration" => Construct::Class(node),
            // `export default class { ... }`
            "class" if node.parent().is_some_and(|p| p.kind() == "export_statement") => {
                Construct::Class(node)
            }
            "lexical_declaration" | "variable_declaration" => Construct::Bindings(node),
            "export_statement" => Construct::Export(node),
            _ => Construct::Other(node),
        }
    }
}

/// Records gathered by one walk.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
}

/// Walk the whole unit and collect top-level functions and all classes.
pub(crate) fn collect(unit: &ParsedUnit) -> Result<Collected, AnalysisError> {
    let mut out = Collected::default();
    let mut stack = Vec::new();
    push_children(&mut stack, unit.root(), Scope::Module);

    while let Some((node, scope)) = stack.pop() {
        match Construct::classify(node) {
            Construct::Function(func) => {
                if scope == Scope::Module {
                    let name = declared_name(unit, func)?;
                    out.functions.push(function_record(unit, name, func, func)?);
                }
                push_children(&mut stack, func, Scope::Nested);
            }
            Construct::Class(class) => {
                out.classes.push(class_record(unit, class)?);
                push_children(&mut stack, class, Scope::Nested);
            }
            Construct::Bindings(decl) => {
                if scope == Scope::Module {
                    bound_functions(unit, decl, &mut out.functions)?;
                }
                push_children(&mut stack, decl, Scope::Nested);
            }
            Construct::Export(export) => {
                if scope == Scope::Module {
                    if let Some(record) = default_export_function(unit, export)? {
                        out.functions.push(record);
                    }
                }
                // export passes its scope through
                push_children(&mut stack, export, scope);
            }
            Construct::Other(other) => push_children(&mut stack, other, Scope::Nested),
        }
    }

    Ok(out)
}

fn push_children<'t>(stack: &mut Vec<(Node<'t>, Scope)>, node: Node<'t>, scope: Scope) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    stack.extend(children.into_iter().rev().map(|child| (child, scope)));
}

/// The statement comments attach to: the `export` wrapper when present.
fn anchor_of(node: Node) -> Node {
    match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => node,
    }
}

/// Whether `node` has an anonymous token child of the given kind.
fn has_token(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == kind);
    found
}

fn declared_name(unit: &ParsedUnit, node: Node) -> Result<String, AnalysisError> {
    match node.child_by_field_name("name") {
        Some(name) => Ok(unit.node_text(name)?.to_string()),
        None => Ok(ANONYMOUS.to_string()),
    }
}

/// Build a record for a function-like node.
///
/// `func` carries the parameters, return type and modifiers. `extent` is the
/// node whose lines make up the record and whose anchor receives comments.
fn function_record(
    unit: &ParsedUnit,
    name: String,
    func: Node,
    extent: Node,
) -> Result<FunctionRecord, AnalysisError> {
    let anchor = anchor_of(extent);
    let span = Span::from_node(extent);

    Ok(FunctionRecord {
        name,
        parameters: parameter_names(unit, func)?,
        return_type_text: return_type_text(unit, func),
        leading_doc_comment: doc_comment_for(unit, anchor)?,
        line_start: span.start_line,
        line_end: span.end_line,
        body_text: unit.line_slice(&span)?,
        is_async: has_token(func, "async"),
        is_exported: anchor.kind() == "export_statement",
    })
}

/// `const f = () => ...` and friends at module scope.
fn bound_functions(
    unit: &ParsedUnit,
    decl: Node,
    out: &mut Vec<FunctionRecord>,
) -> Result<(), AnalysisError> {
    let mut cursor = decl.walk();
    let declarators: Vec<_> = decl
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "variable_declarator")
        .collect();

    for declarator in declarators {
        let Some(value) = declarator.child_by_field_name("value") else {
            continue;
        };
        if !FUNCTION_VALUE_KINDS.contains(&value.kind()) {
            continue;
        }
        let name = match declarator.child_by_field_name("name") {
            Some(id) if id.kind() == "identifier" => unit.node_text(id)?.to_string(),
            _ => ANONYMOUS.to_string(),
        };
        out.push(function_record(unit, name, value, decl)?);
    }

    Ok(())
}

/// `export default function () {}` and `export default () => ...`.
fn default_export_function(
    unit: &ParsedUnit,
    export: Node,
) -> Result<Option<FunctionRecord>, AnalysisError> {
    let Some(value) = export.child_by_field_name("value") else {
        return Ok(None);
    };
    if !FUNCTION_VALUE_KINDS.contains(&value.kind()) {
        return Ok(None);
    }
    let name = declared_name(unit, value)?;
    function_record(unit, name, value, value).map(Some)
}

fn class_record(unit: &ParsedUnit, class: Node) -> Result<ClassRecord, AnalysisError> {
    let span = Span::from_node(class);
    let mut methods = Vec::new();

    if let Some(body) = class.child_by_field_name("body") {
        let mut cursor = body.walk();
        let members: Vec<_> = body
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "method_definition")
            .collect();

        for member in members {
            // get/set accessors
            if has_token(member, "get") || has_token(member, "set") {
                continue;
            }
            let name = method_name(unit, member)?;
            if name == "constructor" {
                continue;
            }
            methods.push(function_record(unit, name, member, member)?);
        }
    }

    Ok(ClassRecord {
        name: declared_name(unit, class)?,
        methods,
        leading_doc_comment: doc_comment_for(unit, anchor_of(class))?,
        line_start: span.start_line,
        line_end: span.end_line,
    })
}

fn method_name(unit: &ParsedUnit, method: Node) -> Result<String, AnalysisError> {
    let Some(key) = method.child_by_field_name("name") else {
        return Ok(ANONYMOUS.to_string());
    };
    let name = match key.kind() {
        "string" => unquote(unit.node_text(key)?),
        "computed_property_name" => match key.named_child(0) {
            Some(inner) if inner.kind() == "string" => unquote(unit.node_text(inner)?),
            _ => ANONYMOUS.to_string(),
        },
        _ => unit.node_text(key)?.to_string(),
    };
    Ok(if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name
    })
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'').to_string()
}

fn parameter_names(unit: &ParsedUnit, func: Node) -> Result<Vec<String>, AnalysisError> {
    // single bare arrow parameter: `x => x`
    let Some(params) = func.child_by_field_name("parameters") else {
        return match func.child_by_field_name("parameter") {
            Some(param) => Ok(vec![pattern_name(unit, param)?]),
            None => Ok(Vec::new()),
        };
    };

    let mut cursor = params.walk();
    let children: Vec<_> = params.named_children(&mut cursor).collect();
    let mut names = Vec::with_capacity(children.len());

    for param in children {
        match param.kind() {
            "comment" | "decorator" => {}
            "required_parameter" | "optional_parameter" => {
                match param.child_by_field_name("pattern") {
                    Some(pattern) if pattern.kind() == "this" => {}
                    Some(pattern) => names.push(pattern_name(unit, pattern)?),
                    None => names.push(PARAM_PLACEHOLDER.to_string()),
                }
            }
            _ => names.push(pattern_name(unit, param)?),
        }
    }

    Ok(names)
}

fn pattern_name(unit: &ParsedUnit, pattern: Node) -> Result<String, AnalysisError> {
    let inner = match pattern.kind() {
        "identifier" => return Ok(unit.node_text(pattern)?.to_string()),
        "assignment_pattern" => pattern.child_by_field_name("left"),
        "rest_pattern" => pattern.named_child(0),
        _ => None,
    };
    match inner {
        Some(node) => pattern_name(unit, node),
        None => Ok(PARAM_PLACEHOLDER.to_string()),
    }
}

/// Annotation text without its `:` separator.
fn return_type_text(unit: &ParsedUnit, func: Node) -> Option<String> {
    let annotation = func.child_by_field_name("return_type")?;
    let text = unit
        .source
        .get(annotation.byte_range())
        .map(|raw| {
            let raw = raw.trim_start();
            raw.strip_prefix(':').unwrap_or(raw).trim().to_string()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_RETURN_TYPE.to_string());
    Some(text)
}
