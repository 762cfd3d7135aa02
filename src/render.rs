//! Rendering of documentation payloads.
//!
//! Produces JSDoc blocks, the combined markdown document that evaluation
//! scores, a module overview block and inline-comment annotation.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{CodeStructure, FunctionRecord};
use crate::synth::DocumentationPayload;

const RULE_WIDTH: usize = 60;

lazy_static! {
    /// A line that opens a function body.
    static ref FUNCTION_OPENER: Regex =
        Regex::new(r"\bfunction\b[^(]*\(|=>\s*\{\s*$").unwrap();
}

/// One function's rendered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDoc {
    pub function_name: String,
    pub block: String,
}

/// Render a `/** ... */` block.
///
/// Parameters come from `record` when present, otherwise from the payload's
/// own parameter map. A missing parameter description defaults to
/// `The <p> parameter`.
pub fn render_jsdoc(payload: &DocumentationPayload, record: Option<&FunctionRecord>) -> String {
    let mut body: Vec<String> = Vec::new();

    let mut description = payload.description.lines();
    body.push(description.next().unwrap_or("").trim().to_string());
    let detail: Vec<&str> = description.map(str::trim).filter(|l| !l.is_empty()).collect();
    if !detail.is_empty() {
        body.push(String::new());
        body.extend(detail.into_iter().map(str::to_string));
    }

    let params: Vec<&str> = match record {
        Some(r) => r.parameters.iter().map(String::as_str).collect(),
        None => payload.parameter_descriptions.keys().map(String::as_str).collect(),
    };
    let has_return = record.is_some_and(|r| r.return_type_text.is_some())
        || !payload.return_description.trim().is_empty();

    let mut tags: Vec<String> = Vec::new();
    for param in params {
        let desc = payload
            .parameter_descriptions
            .get(param)
            .cloned()
            .unwrap_or_else(|| format!("The {param} parameter"));
        tags.push(format!("@param {param} - {desc}"));
    }
    if has_return {
        tags.push(format!("@returns {}", payload.return_description.trim()).trim_end().to_string());
    }
    if !payload.examples.is_empty() {
        tags.push("@example".to_string());
        tags.extend(payload.examples.iter().cloned());
    }
    if !tags.is_empty() {
        body.push(String::new());
        body.extend(tags);
    }

    comment_block(&body)
}

/// Pair payloads with the documentable functions of `structure` by position.
///
/// Payloads are expected in [`CodeStructure::documentable_functions`] order.
/// A record is attached only when its name matches the payload at the same
/// position, so repeated names such as methods of different classes or
/// `anonymous` never borrow another function's record.
pub fn pair_records<'a>(
    structure: &'a CodeStructure,
    payloads: &'a [DocumentationPayload],
) -> impl Iterator<Item = (&'a DocumentationPayload, Option<&'a FunctionRecord>)> + 'a {
    let mut records = structure.documentable_functions();
    payloads.iter().map(move |payload| {
        let record = records.next().filter(|r| r.name == payload.function_name);
        (payload, record)
    })
}

/// Render every payload against the record at its position.
pub fn render_all(structure: &CodeStructure, payloads: &[DocumentationPayload]) -> Vec<RenderedDoc> {
    pair_records(structure, payloads)
        .map(|(payload, record)| RenderedDoc {
            function_name: payload.function_name.clone(),
            block: render_jsdoc(payload, record),
        })
        .collect()
}

/// Combine rendered blocks into the markdown document that evaluation reads.
pub fn render_document(docs: &[RenderedDoc]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = vec![
        "# Generated Documentation".to_string(),
        String::new(),
        "=".repeat(RULE_WIDTH),
        String::new(),
    ];
    for doc in docs {
        out.push(format!("## Function: {}", doc.function_name));
        out.push(String::new());
        out.push(doc.block.clone());
        out.push(String::new());
        out.push(rule.clone());
        out.push(String::new());
    }
    out.join("\n")
}

/// A module-level block listing functions and classes with the first line of
/// their existing doc comments.
pub fn render_module_overview(structure: &CodeStructure, title: &str) -> String {
    let mut body = vec![
        title.to_string(),
        String::new(),
        "This module provides the following functionality:".to_string(),
    ];

    if !structure.functions.is_empty() {
        body.push(String::new());
        body.push("Functions:".to_string());
        for f in &structure.functions {
            body.push(format!("  {}: {}", f.name, first_line(f.leading_doc_comment.as_deref(), "Function")));
        }
    }
    if !structure.classes.is_empty() {
        body.push(String::new());
        body.push("Classes:".to_string());
        for c in &structure.classes {
            body.push(format!("  {}: {}", c.name, first_line(c.leading_doc_comment.as_deref(), "Class")));
        }
    }

    comment_block(&body)
}

/// Insert `comments` in order, one after each line that opens a function.
///
/// Each comment takes the indentation of the line following the opener. An
/// opener on the last line gets nothing.
pub fn annotate_inline(source: &str, comments: &[String]) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut pending = comments.iter();
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + comments.len());

    for (i, line) in lines.iter().enumerate() {
        out.push(line.to_string());
        if !FUNCTION_OPENER.is_match(line) {
            continue;
        }
        let Some(next) = lines.get(i + 1) else {
            continue;
        };
        if let Some(comment) = pending.next() {
            out.push(format!("{}{comment}", indent_of(next)));
        }
    }

    out.join("\n")
}

/// Annotate one unit's source with the first inline comment of each payload.
///
/// Each comment goes after the first line of its function, indented like the
/// line that follows. Functions on a single line get nothing.
pub fn annotate_unit(
    structure: &CodeStructure,
    source: &str,
    payloads: &[DocumentationPayload],
) -> String {
    let mut after_line: BTreeMap<usize, &str> = BTreeMap::new();
    for (payload, record) in pair_records(structure, payloads) {
        let (Some(record), Some(comment)) = (record, payload.inline_comments.first()) else {
            continue;
        };
        if record.line_end > record.line_start {
            after_line.entry(record.line_start).or_insert(comment.as_str());
        }
    }

    let lines: Vec<&str> = source.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + after_line.len());
    for (i, line) in lines.iter().enumerate() {
        out.push(line.to_string());
        if let (Some(comment), Some(next)) = (after_line.get(&(i + 1)), lines.get(i + 1)) {
            out.push(format!("{}{comment}", indent_of(next)));
        }
    }
    out.join("\n")
}

fn indent_of(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

fn first_line<'a>(doc: Option<&'a str>, fallback: &'a str) -> &'a str {
    doc.and_then(|d| d.lines().next())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(fallback)
}

fn comment_block(body: &[String]) -> String {
    let mut out = vec!["/**".to_string()];
    for line in body {
        if line.is_empty() {
            out.push(" *".to_string());
        } else {
            out.push(format!(" * {line}"));
        }
    }
    out.push(" */".to_string());
    out.join("\n")
}
