//! Per-function comparison of two documentation documents.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// `## Function: name` section header.
    static ref SECTION_HEADER: Regex = Regex::new(r"^\s*##+\s*Function:\s*(.+?)\s*$").unwrap();
    /// A bare `function name` line also opens a section.
    static ref FUNCTION_LINE: Regex =
        Regex::new(r"^(?:export\s+)?(?:async\s+)?function\s*\*?\s*([\p{L}_$][\p{L}\p{N}_$]*)").unwrap();
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionComparison {
    pub function: String,
    pub generated: Option<String>,
    pub reference: Option<String>,
    /// Documented on both sides.
    pub matched: bool,
}

/// Counts over a comparison table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_functions: usize,
    pub both_documented: usize,
    pub only_generated: usize,
    pub only_reference: usize,
}

/// Split a document into sections keyed by function name.
///
/// Text before the first header belongs to no section. A `function name`
/// line starts a new section and is kept as its first line. A repeated name
/// keeps the last section.
pub fn split_by_function(doc: &str) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in doc.split('\n') {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            if let Some((name, body)) = current.take() {
                sections.insert(name, body.join("\n"));
            }
            current = Some((caps[1].to_string(), Vec::new()));
        } else if let Some(caps) = FUNCTION_LINE.captures(line) {
            if let Some((name, body)) = current.take() {
                sections.insert(name, body.join("\n"));
            }
            current = Some((caps[1].to_string(), vec![line]));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((name, body)) = current {
        sections.insert(name, body.join("\n"));
    }

    sections
}

/// Compare generated and reference documents function by function.
///
/// Rows are ordered by function name.
pub fn compare_sections(generated: &str, reference: &str) -> (Vec<SectionComparison>, ComparisonSummary) {
    let mut generated_sections = split_by_function(generated);
    let mut reference_sections = split_by_function(reference);

    let names: BTreeSet<String> = generated_sections
        .keys()
        .chain(reference_sections.keys())
        .cloned()
        .collect();

    let mut summary = ComparisonSummary {
        total_functions: names.len(),
        ..Default::default()
    };

    let rows = names
        .into_iter()
        .map(|function| {
            let generated = generated_sections.remove(&function).map(|s| s.trim().to_string());
            let reference = reference_sections.remove(&function).map(|s| s.trim().to_string());
            let matched = generated.is_some() && reference.is_some();
            match (&generated, &reference) {
                (Some(_), Some(_)) => summary.both_documented += 1,
                (Some(_), None) => summary.only_generated += 1,
                (None, Some(_)) => summary.only_reference += 1,
                (None, None) => {}
            }
            SectionComparison {
                function,
                generated,
                reference,
                matched,
            }
        })
        .collect();

    (rows, summary)
}
