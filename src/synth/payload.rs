//! Documentation content for one function.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Synthesized documentation for one function.
///
/// Any field may be empty; empty fields simply contribute nothing downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationPayload {
    pub function_name: String,
    /// Brief first line, optionally followed by further paragraphs.
    pub description: String,
    /// Parameter name to description. Need not cover every parameter.
    #[serde(default)]
    pub parameter_descriptions: BTreeMap<String, String>,
    #[serde(default)]
    pub return_description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub inline_comments: Vec<String>,
}

impl DocumentationPayload {
    pub fn new(function_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// True when there is no description, parameter, return or example text.
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty()
            && self.parameter_descriptions.is_empty()
            && self.return_description.trim().is_empty()
            && self.examples.is_empty()
    }

    /// First line of the description.
    pub fn brief(&self) -> &str {
        self.description.lines().next().unwrap_or("").trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(DocumentationPayload::new("f", "").is_empty());
        assert!(DocumentationPayload::new("f", "  \n").is_empty());
        assert!(!DocumentationPayload::new("f", "Does f.").is_empty());

        let mut payload = DocumentationPayload::new("f", "");
        payload.examples.push("f()".to_string());
        assert!(!payload.is_empty());

        // inline comments alone do not document a function
        let mut payload = DocumentationPayload::new("f", "");
        payload.inline_comments.push("// hi".to_string());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_brief() {
        let payload = DocumentationPayload::new("f", "Sorts items.\n\nLonger text.");
        assert_eq!(payload.brief(), "Sorts items.");
        assert_eq!(DocumentationPayload::default().brief(), "");
    }

    #[test]
    fn test_deserialize_partial() {
        let payload: DocumentationPayload =
            serde_json::from_str(r#"{"functionName":"f","description":"d"}"#).unwrap();
        assert_eq!(payload, DocumentationPayload::new("f", "d"));
    }
}
