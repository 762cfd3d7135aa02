//! Deterministic template-based synthesizer.
//!
//! Derives documentation from the function's name, parameters and return
//! annotation. No I/O; the same record always yields the same payload.

use std::collections::BTreeMap;

use async_trait::async_trait;
use phf::phf_map;

use super::{DocumentationPayload, Synthesizer};
use crate::analysis::FunctionRecord;

/// Leading name verb → description verb.
static ACTION_TEMPLATES: phf::Map<&'static str, &'static str> = phf_map! {
    "get" => "Retrieves",
    "set" => "Sets or updates",
    "calculate" => "Calculates",
    "compute" => "Computes",
    "process" => "Processes",
    "validate" => "Validates",
    "check" => "Checks",
    "find" => "Finds",
    "search" => "Searches for",
    "create" => "Creates",
    "generate" => "Generates",
    "build" => "Builds",
    "parse" => "Parses",
    "format" => "Formats",
    "convert" => "Converts",
    "transform" => "Transforms",
    "sort" => "Sorts",
    "filter" => "Filters",
    "load" => "Loads",
    "save" => "Saves",
    "delete" => "Deletes",
    "update" => "Updates",
    "add" => "Adds",
    "remove" => "Removes",
};

const DEFAULT_ACTION: &str = "process";

/// Template-based synthesizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSynthesizer;

impl LocalSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the payload synchronously.
    pub fn generate(&self, record: &FunctionRecord) -> DocumentationPayload {
        let parts = split_name(&record.name);

        let parameter_descriptions: BTreeMap<String, String> = record
            .parameters
            .iter()
            .map(|p| (p.clone(), describe_parameter(p)))
            .collect();

        DocumentationPayload {
            function_name: record.name.clone(),
            description: describe_function(&parts, record.parameters.len()),
            parameter_descriptions,
            return_description: describe_return(&parts, record.return_type_text.as_deref()),
            examples: examples(record),
            inline_comments: inline_comments(record),
        }
    }
}

#[async_trait]
impl Synthesizer for LocalSynthesizer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn synthesize(&self, record: &FunctionRecord) -> DocumentationPayload {
        self.generate(record)
    }
}

/// Split snake_case, camelCase or PascalCase into lower-case words.
///
/// Acronym runs stay together (`parseHTMLString` → parse, html, string) and
/// digit runs form their own word. Other punctuation separates words.
pub fn split_name(name: &str) -> Vec<String> {
    if name.contains('_') {
        return name
            .split('_')
            .filter(|p| !p.is_empty())
            .map(str::to_lowercase)
            .collect();
    }

    let chars: Vec<char> = name.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut parts);
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|j| chars.get(j)) {
            let next = chars.get(i + 1).copied();
            let boundary = (c.is_ascii_digit() != prev.is_ascii_digit() && prev.is_alphanumeric())
                || (c.is_uppercase() && prev.is_lowercase())
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                flush(&mut current, &mut parts);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut parts);

    parts
}

fn flush(current: &mut String, parts: &mut Vec<String>) {
    if !current.is_empty() {
        parts.push(current.to_lowercase());
        current.clear();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe_function(parts: &[String], param_count: usize) -> String {
    let action = parts.first().map(String::as_str).unwrap_or(DEFAULT_ACTION);
    let verb = ACTION_TEMPLATES
        .get(action)
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{}s", capitalize(action)));
    let object = (parts.len() > 1).then(|| parts[1..].join(" "));

    let mut description = match &object {
        Some(obj) => format!("{verb} {obj}"),
        None => format!("{verb} the input data"),
    };
    if param_count > 2 {
        description.push_str(" with multiple parameters");
    }
    description.push('.');

    description.push_str(&format!("\n\nThis function performs {action} operations"));
    if let Some(obj) = &object {
        description.push_str(&format!(" on {obj}"));
    }
    description.push_str(". It is designed to handle various input scenarios and provide reliable results.");
    description
}

/// `isEnabled` and `is_enabled` both count as flag names.
fn is_flag_name(param: &str) -> bool {
    let lower = param.to_lowercase();
    lower.contains("flag")
        || lower.contains("enable")
        || lower.starts_with("is_")
        || (param.starts_with("is") && param[2..].starts_with(|c: char| c.is_uppercase()))
}

fn describe_parameter(param: &str) -> String {
    let lower = param.to_lowercase();
    match lower.as_str() {
        "data" | "input" | "value" => format!("The input {param} to be processed"),
        "name" | "filename" | "file" => format!("The {param} of the file or resource"),
        "path" | "filepath" => format!("The {param} to the file or directory"),
        "key" | "id" | "identifier" => format!("Unique {param} for identification"),
        "options" | "config" | "settings" => format!("Configuration {param} for the operation"),
        "items" | "list" | "array" => format!("Collection of {param} to process"),
        _ if lower.contains("count") || lower.contains("num") || lower.contains("size") => {
            format!("The {param} specifying quantity")
        }
        _ if is_flag_name(param) => {
            let words: Vec<String> = split_name(param)
                .into_iter()
                .skip_while(|w| w == "is")
                .collect();
            format!("Boolean flag indicating whether to {}", words.join(" "))
        }
        _ => format!("The {param} parameter"),
    }
}

fn describe_return(parts: &[String], annotation: Option<&str>) -> String {
    if let Some(annotation) = annotation {
        let lower = annotation.to_lowercase();
        let text = if lower.starts_with("promise<") {
            "Promise that resolves with the result of the operation"
        } else if lower.contains("bool") {
            "Boolean value indicating success or validation result"
        } else if lower == "number" || lower == "bigint" {
            "Numeric value representing the computed result or count"
        } else if lower == "string" {
            "String containing the processed or formatted output"
        } else if lower.ends_with("[]") || lower.starts_with("array<") {
            "Array of processed items or results"
        } else if lower.starts_with("record<")
            || lower.starts_with("map<")
            || lower == "object"
            || lower.starts_with('{')
        {
            "Object containing structured result data"
        } else if lower == "void" || lower == "undefined" {
            "Nothing"
        } else {
            return format!("{annotation} value with the result");
        };
        return text.to_string();
    }

    match parts.first().map(String::as_str) {
        Some("is" | "has" | "check") => "Boolean value indicating the validation result",
        Some("get" | "find") => "The requested data or resource",
        Some("calculate" | "compute") => "The calculated numerical result",
        _ => "The processed result of the operation",
    }
    .to_string()
}

fn sample_argument(param: &str) -> String {
    let lower = param.to_lowercase();
    if lower.contains("name") || lower.contains("str") {
        "\"example\"".to_string()
    } else if lower.contains("num") || lower.contains("count") || lower.contains("size") {
        "10".to_string()
    } else if lower.contains("list") || lower.contains("items") || lower.contains("array") {
        "[1, 2, 3]".to_string()
    } else if lower.contains("data") || lower.contains("options") || lower.contains("config") {
        "{ key: \"value\" }".to_string()
    } else if is_flag_name(param) {
        "true".to_string()
    } else {
        param.to_string()
    }
}

fn examples(record: &FunctionRecord) -> Vec<String> {
    let args: Vec<String> = record.parameters.iter().map(|p| sample_argument(p)).collect();
    let call = format!("{}({})", record.name, args.join(", "));
    let call = if record.is_async {
        format!("await {call}")
    } else {
        call
    };
    vec![format!("const result = {call};"), "// => result".to_string()]
}

fn inline_comments(record: &FunctionRecord) -> Vec<String> {
    let mut comments = Vec::new();
    if record.parameters.len() > 1 {
        comments.push("// Validate input parameters".to_string());
    }
    comments.push("// Perform main operation".to_string());
    if record.body_text.to_lowercase().contains("return") || record.return_type_text.is_some() {
        comments.push("// Return processed result".to_string());
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, params: &[&str], ret: Option<&str>) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            parameters: params.iter().map(|p| p.to_string()).collect(),
            return_type_text: ret.map(str::to_string),
            leading_doc_comment: None,
            line_start: 1,
            line_end: 1,
            body_text: String::new(),
            is_async: false,
            is_exported: false,
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("getUserName"), vec!["get", "user", "name"]);
        assert_eq!(split_name("parseHTMLString"), vec!["parse", "html", "string"]);
        assert_eq!(split_name("load_config_file"), vec!["load", "config", "file"]);
        assert_eq!(split_name("Vector3D"), vec!["vector", "3", "d"]);
        assert_eq!(split_name("#private"), vec!["private"]);
        assert!(split_name("").is_empty());
    }

    #[test]
    fn test_description_known_verb() {
        let payload = LocalSynthesizer.generate(&record("getUserName", &["id"], None));
        assert_eq!(payload.brief(), "Retrieves user name.");
        assert!(payload
            .description
            .contains("This function performs get operations on user name."));
    }

    #[test]
    fn test_description_fallback_verb_and_many_params() {
        let payload = LocalSynthesizer.generate(&record("run", &["a", "b", "c"], None));
        assert_eq!(payload.brief(), "Runs the input data with multiple parameters.");
    }

    #[test]
    fn test_parameter_heuristics() {
        assert_eq!(describe_parameter("data"), "The input data to be processed");
        assert_eq!(describe_parameter("path"), "The path to the file or directory");
        assert_eq!(describe_parameter("id"), "Unique id for identification");
        assert_eq!(describe_parameter("maxCount"), "The maxCount specifying quantity");
        assert_eq!(
            describe_parameter("isVerbose"),
            "Boolean flag indicating whether to verbose"
        );
        assert_eq!(describe_parameter("thing"), "The thing parameter");
    }

    #[test]
    fn test_return_descriptions() {
        assert_eq!(
            describe_return(&[], Some("Promise<boolean>")),
            "Promise that resolves with the result of the operation"
        );
        assert_eq!(
            describe_return(&[], Some("boolean")),
            "Boolean value indicating success or validation result"
        );
        assert_eq!(describe_return(&[], Some("string[]")), "Array of processed items or results");
        assert_eq!(describe_return(&[], Some("User")), "User value with the result");
        assert_eq!(
            describe_return(&["has".to_string(), "key".to_string()], None),
            "Boolean value indicating the validation result"
        );
        assert_eq!(describe_return(&[], None), "The processed result of the operation");
    }

    #[test]
    fn test_examples_and_comments() {
        let mut rec = record("sumItems", &["items", "count"], Some("number"));
        rec.is_async = true;
        let payload = LocalSynthesizer.generate(&rec);
        assert_eq!(
            payload.examples,
            vec!["const result = await sumItems([1, 2, 3], 10);", "// => result"]
        );
        assert_eq!(
            payload.inline_comments,
            vec![
                "// Validate input parameters",
                "// Perform main operation",
                "// Return processed result"
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let rec = record("formatDate", &["value", "options"], Some("string"));
        assert_eq!(LocalSynthesizer.generate(&rec), LocalSynthesizer.generate(&rec));
    }
}
