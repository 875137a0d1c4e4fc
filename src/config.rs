// src/config.rs
//! Model settings and completion-endpoint configuration. Per-stage model
//! ids and sampling parameters come from an optional `models.toml` in the
//! data directory; the endpoint itself comes from the environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-stage model identifiers plus shared sampling configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub default_model: String,
    pub job_analysis: String,
    pub profile_match: String,
    pub ats_analysis: String,
    pub resume: String,
    pub cover_letter: String,
    pub validation: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            job_analysis: DEFAULT_MODEL.to_string(),
            profile_match: DEFAULT_MODEL.to_string(),
            ats_analysis: DEFAULT_MODEL.to_string(),
            resume: DEFAULT_MODEL.to_string(),
            cover_letter: DEFAULT_MODEL.to_string(),
            validation: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 4096,
        }
    }
}

impl ModelSettings {
    /// Load `models.toml` from the data directory, falling back to compiled
    /// defaults when the file does not exist.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("models.toml");
        if !path.exists() {
            info!("No models.toml found, using default model settings");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read model settings: {}", path.display()))?;
        let settings: ModelSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse model settings: {}", path.display()))?;
        info!("Loaded model settings from {}", path.display());
        Ok(settings)
    }
}

/// Completion endpoint location and credentials, resolved from environment.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
}

impl CompletionConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("COMPLETION_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        Ok(Self { base_url, api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_settings() {
        let settings = ModelSettings::default();
        assert_eq!(settings.default_model, DEFAULT_MODEL);
        assert_eq!(settings.temperature, 0.1);
        assert_eq!(settings.max_tokens, 4096);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: ModelSettings =
            toml::from_str("resume = \"gpt-4o\"\ntemperature = 0.3\n").unwrap();
        assert_eq!(settings.resume, "gpt-4o");
        assert_eq!(settings.temperature, 0.3);
        assert_eq!(settings.job_analysis, DEFAULT_MODEL);
    }
}
