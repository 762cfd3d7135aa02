//! Configuration file for docgauge.
//!
//! Every field has a default, so a missing or empty file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::DialectChoice;

/// File names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["docgauge.yaml", ".docgauge.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// `auto` picks the dialect from each file's extension.
    #[serde(default)]
    pub dialect: DialectChoice,
    /// Glob patterns for paths to skip (e.g. "**/dist/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub synthesizer: SynthConfig,
}

/// Which synthesizer strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthMode {
    #[default]
    Local,
    Remote,
}

/// Synthesizer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthConfig {
    #[serde(default)]
    pub mode: SynthMode,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum synthesis calls in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_concurrency() -> usize {
    8
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            mode: SynthMode::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Parse configuration from YAML text. Blank text yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Check if a path matches one of the excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|g| g.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}

/// Find a project config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// The user-level config file, `<config dir>/docgauge/docgauge.yaml`.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "docgauge").map(|dirs| dirs.config_dir().join("docgauge.yaml"))
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise the working directory is searched,
/// then the user-level file, and finally the defaults are used.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => discover(Path::new("."))
            .or_else(|| user_config_path().filter(|p| p.is_file())),
    };

    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            let config = Config::parse_file(&p)?;
            Ok((config, Some(p)))
        }
        None => {
            debug!("no config file found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Validate a configuration.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    let synth = &config.synthesizer;
    if synth.concurrency == 0 {
        anyhow::bail!("synthesizer.concurrency must be at least 1");
    }
    if !(0.0..=2.0).contains(&synth.temperature) {
        anyhow::bail!(
            "synthesizer.temperature {} is out of range (0.0 to 2.0)",
            synth.temperature
        );
    }
    if synth.endpoint.trim().is_empty() {
        anyhow::bail!("synthesizer.endpoint must not be empty");
    }

    Ok(())
}
