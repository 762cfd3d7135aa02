//! OpenAI-compatible chat-completions synthesizer.
//!
//! Every failure is logged and answered by the local synthesizer, so callers
//! always get a payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DocumentationPayload, LocalSynthesizer, SynthError, Synthesizer};
use crate::analysis::FunctionRecord;

/// Maximum characters of the response kept as the description.
pub const DESCRIPTION_CHARS: usize = 200;

const SYSTEM_PROMPT: &str = "You are a technical documentation expert.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Settings for [`RemoteSynthesizer`].
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Synthesizer backed by a remote language model.
pub struct RemoteSynthesizer {
    http: Client,
    settings: RemoteSettings,
    fallback: LocalSynthesizer,
}

impl RemoteSynthesizer {
    pub fn new(settings: RemoteSettings) -> Result<Self, SynthError> {
        let http = Client::builder()
            .user_agent(concat!("docgauge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            settings,
            fallback: LocalSynthesizer::new(),
        })
    }

    /// Perform one completion request and turn it into a payload.
    pub async fn request(&self, record: &FunctionRecord) -> Result<DocumentationPayload, SynthError> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(record),
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .timeout(self.settings.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthError::Timeout
                } else {
                    SynthError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| SynthError::Decode(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(SynthError::EmptyContent)?;

        debug!(function = %record.name, chars = content.len(), "received completion");
        Ok(self.payload_from_content(record, &content))
    }

    /// The response supplies the description; everything else comes from the
    /// template generator.
    fn payload_from_content(&self, record: &FunctionRecord, content: &str) -> DocumentationPayload {
        let mut payload = self.fallback.generate(record);
        payload.description = truncate_chars(content.trim(), DESCRIPTION_CHARS).to_string();
        payload.parameter_descriptions = record
            .parameters
            .iter()
            .map(|p| (p.clone(), format!("Description of {p}")))
            .collect();
        payload
    }
}

#[async_trait]
impl Synthesizer for RemoteSynthesizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn synthesize(&self, record: &FunctionRecord) -> DocumentationPayload {
        match self.request(record).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(function = %record.name, error = %e, "remote synthesis failed, using local templates");
                self.fallback.generate(record)
            }
        }
    }
}

fn build_prompt(record: &FunctionRecord) -> String {
    format!(
        "Generate comprehensive documentation for this JavaScript/TypeScript function:\n\n\
         Function Name: {}\n\
         Parameters: {}\n\
         Return Type: {}\n\n\
         Provide:\n\
         1. Brief description (1-2 sentences)\n\
         2. Parameter descriptions\n\
         3. Return value description\n\
         4. Usage example\n\n\
         Format as a JSDoc comment.",
        record.name,
        record.parameters.join(", "),
        record.return_type_text.as_deref().unwrap_or("Not specified"),
    )
}

/// Longest prefix of at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FunctionRecord {
        FunctionRecord {
            name: "fetchUser".to_string(),
            parameters: vec!["id".to_string()],
            return_type_text: Some("Promise<User>".to_string()),
            leading_doc_comment: None,
            line_start: 1,
            line_end: 3,
            body_text: "async function fetchUser(id) {\n  return db.get(id);\n}".to_string(),
            is_async: true,
            is_exported: true,
        }
    }

    fn unreachable_settings() -> RemoteSettings {
        RemoteSettings {
            // discard port; nothing listens there
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_millis(500),
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn test_prompt_mentions_signature() {
        let prompt = build_prompt(&record());
        assert!(prompt.contains("Function Name: fetchUser"));
        assert!(prompt.contains("Parameters: id"));
        assert!(prompt.contains("Return Type: Promise<User>"));
    }

    #[test]
    fn test_payload_from_content() {
        let synth = RemoteSynthesizer::new(unreachable_settings()).unwrap();
        let long = "x".repeat(300);
        let payload = synth.payload_from_content(&record(), &long);
        assert_eq!(payload.description.chars().count(), DESCRIPTION_CHARS);
        assert_eq!(payload.parameter_descriptions["id"], "Description of id");
        assert!(!payload.examples.is_empty());
    }

    #[tokio::test]
    async fn test_request_error_on_unreachable_endpoint() {
        let synth = RemoteSynthesizer::new(unreachable_settings()).unwrap();
        assert!(synth.request(&record()).await.is_err());
    }

    #[tokio::test]
    async fn test_falls_back_to_local() {
        let synth = RemoteSynthesizer::new(unreachable_settings()).unwrap();
        let payload = synth.synthesize(&record()).await;
        assert_eq!(payload, LocalSynthesizer.generate(&record()));
    }
}
