//! Documentation synthesis.
//!
//! A [`Synthesizer`] turns one [`FunctionRecord`] into a
//! [`DocumentationPayload`]. Two strategies exist:
//! - [`LocalSynthesizer`]: deterministic templates, no I/O
//! - [`RemoteSynthesizer`]: an OpenAI-compatible chat-completions endpoint,
//!   falling back to the local templates on any failure
//!
//! Synthesis never fails from the caller's point of view.

mod local;
mod payload;
mod remote;

pub use local::{split_name, LocalSynthesizer};
pub use payload::DocumentationPayload;
pub use remote::{RemoteSettings, RemoteSynthesizer, DESCRIPTION_CHARS};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::{CodeStructure, FunctionRecord};
use crate::config::{SynthConfig, SynthMode};

/// Errors that can occur during a remote synthesis call.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("endpoint returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("response contained no content")]
    EmptyContent,
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
}

/// Strategy for producing documentation for one function.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Produce a payload. Infallible by contract.
    async fn synthesize(&self, record: &FunctionRecord) -> DocumentationPayload;
}

/// Build remote settings from config, reading the API key from the environment.
pub fn remote_settings(config: &SynthConfig) -> Result<RemoteSettings, SynthError> {
    let api_key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| SynthError::MissingApiKey(config.api_key_env.clone()))?;

    Ok(RemoteSettings {
        endpoint: config.endpoint.clone(),
        model: config.model.clone(),
        api_key,
        timeout: Duration::from_millis(config.timeout_ms),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    })
}

/// Select the synthesizer strategy for a configuration.
///
/// Remote mode without a usable API key or HTTP client falls back to local.
pub fn from_config(config: &SynthConfig) -> Box<dyn Synthesizer> {
    match config.mode {
        SynthMode::Local => Box::new(LocalSynthesizer::new()),
        SynthMode::Remote => match remote_settings(config).and_then(RemoteSynthesizer::new) {
            Ok(remote) => {
                info!(model = %config.model, endpoint = %config.endpoint, "using remote synthesizer");
                Box::new(remote)
            }
            Err(e) => {
                warn!(error = %e, "remote synthesis unavailable, using local templates");
                Box::new(LocalSynthesizer::new())
            }
        },
    }
}

/// Synthesize payloads for `records` with at most `concurrency` calls in
/// flight. Output order matches input order.
pub async fn synthesize_all(
    synth: &dyn Synthesizer,
    records: &[&FunctionRecord],
    concurrency: usize,
) -> Vec<DocumentationPayload> {
    use futures::stream::{self, StreamExt};

    stream::iter(records.iter().copied())
        .map(|record| synth.synthesize(record))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Synthesize every documentable function of a structure on a fresh runtime.
pub fn synthesize_structure_blocking(
    synth: &dyn Synthesizer,
    structure: &CodeStructure,
    concurrency: usize,
) -> anyhow::Result<Vec<DocumentationPayload>> {
    let records: Vec<&FunctionRecord> = structure.documentable_functions().collect();
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(synthesize_all(synth, &records, concurrency)))
}
