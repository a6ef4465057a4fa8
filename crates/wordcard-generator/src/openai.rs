use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use wordcard_config::generation::GenerationConfig;

use crate::limiter::RateLimiter;
use crate::{GenerateError, GenerationBackend, ProviderMetadata};

/// OpenAI-compatible chat completion and image generation client
#[derive(Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    text_model: String,
    image_model: String,
    image_size: String,
    limiter: Option<Arc<RateLimiter>>,
}

impl OpenAiBackend {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let limiter = (config.min_request_interval_ms > 0)
            .then(|| Arc::new(RateLimiter::new(config.min_request_interval_ms)));

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            limiter,
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::AuthenticationError);
        }

        if let Some(limiter) = &self.limiter {
            limiter.wait().await;
        }

        let response = self
            .client
            .post(format!("{}/{}", self.api_url, path))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| GenerateError::ApiError(format!("Failed to parse response: {}", e)))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerateError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GenerateError::ApiError(format!(
                "Image download failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = json!({
            "model": self.text_model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let json = self.post("chat/completions", body).await?;
        extract_completion(&json)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<Vec<u8>>, GenerateError> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": self.image_size,
            "n": 1,
        });

        let json = self.post("images/generations", body).await?;

        match extract_image(&json)? {
            Some(ImagePayload::Bytes(bytes)) => Ok(Some(bytes)),
            Some(ImagePayload::Url(url)) => {
                tracing::debug!("Downloading generated image from {}", url);
                self.download(&url).await.map(Some)
            }
            None => Ok(None),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI".to_string(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
        }
    }
}

#[derive(Debug, PartialEq)]
enum ImagePayload {
    Url(String),
    Bytes(Vec<u8>),
}

fn classify_failure(status: u16, body: &str) -> GenerateError {
    match status {
        429 if body.contains("insufficient_quota") => GenerateError::QuotaExceeded,
        429 => GenerateError::RateLimitExceeded,
        401 | 403 => GenerateError::AuthenticationError,
        _ => {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| body.trim().to_string());
            GenerateError::ApiError(format!("HTTP {}: {}", status, message))
        }
    }
}

fn extract_completion(json: &serde_json::Value) -> Result<String, GenerateError> {
    let text = json["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    Ok(text.to_string())
}

fn extract_image(json: &serde_json::Value) -> Result<Option<ImagePayload>, GenerateError> {
    let Some(first) = json["data"].get(0) else {
        return Ok(None);
    };

    if let Some(encoded) = first["b64_json"].as_str() {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| GenerateError::InvalidImage(e.to_string()))?;
        return Ok(Some(ImagePayload::Bytes(bytes)));
    }

    Ok(first["url"]
        .as_str()
        .map(|url| ImagePayload::Url(url.to_string())))
}
