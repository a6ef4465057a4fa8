mod limiter;
mod openai;

pub use limiter::RateLimiter;
pub use openai::OpenAiBackend;

/// Generative service interface: one text completion or one image per call
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Single free-text completion for a prompt
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Image bytes for a prompt, `None` when the service returned no result
    async fn generate_image(&self, prompt: &str) -> Result<Option<Vec<u8>>, GenerateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub text_model: String,
    pub image_model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Quota exhausted")]
    QuotaExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Empty completion")]
    EmptyResponse,

    #[error("No image returned")]
    NoResult,

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}
