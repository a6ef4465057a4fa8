use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-2".to_string()
}

fn default_image_size() -> String {
    "512x512".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Generation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Never written back to disk
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    /// Minimum spacing between backend requests across all workers, 0 disables
    #[serde(default)]
    pub min_request_interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Overrides the built-in enrichment prompt.
    /// Placeholders: `{language}`, `{word}`, `{dictionary_form}`, `{phrase}`
    #[serde(default)]
    pub prompt_template: Option<String>,
}

impl GenerationConfig {
    pub fn new() -> Self {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();

        let api_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| default_api_url());

        let min_request_interval_ms = env::var("WORDCARD_MIN_REQUEST_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            api_key,
            api_url,
            min_request_interval_ms,
            ..Self::default()
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            min_request_interval_ms: 0,
            request_timeout_secs: default_request_timeout_secs(),
            prompt_template: None,
        }
    }
}
