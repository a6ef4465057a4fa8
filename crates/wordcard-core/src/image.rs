use std::path::PathBuf;
use std::sync::Arc;

use wordcard_generator::{GenerateError, GenerationBackend};
use wordcard_types::StagedImage;

use crate::error::PipelineError;

/// Filesystem-safe form of a name hint: every char outside `[A-Za-z0-9_-]`
/// becomes `_`, then surrounding `_` are trimmed. Idempotent.
pub fn sanitize(hint: &str) -> String {
    let replaced: String = hint
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    replaced.trim_matches('_').to_string()
}

/// Generates images and writes them to the staging directory
pub struct ImageMaterializer {
    backend: Arc<dyn GenerationBackend>,
    staging_dir: PathBuf,
    extension: String,
}

impl ImageMaterializer {
    pub fn new(backend: Arc<dyn GenerationBackend>, staging_dir: PathBuf, extension: String) -> Self {
        Self {
            backend,
            staging_dir,
            extension,
        }
    }

    /// Request an image for `prompt` and stage it as `<sanitized hint>.<ext>`.
    ///
    /// Concurrent calls must use distinct hints; equal hints write the same file.
    pub async fn materialize(&self, prompt: &str, name_hint: &str) -> Result<StagedImage, PipelineError> {
        let hint = sanitize(name_hint);
        if hint.is_empty() {
            return Err(PipelineError::Validation(format!(
                "name hint {name_hint:?} is empty after sanitization"
            )));
        }

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PipelineError::Validation("image prompt is empty".to_string()));
        }

        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| PipelineError::storage(&self.staging_dir, e))?;

        let bytes = self
            .backend
            .generate_image(prompt)
            .await?
            .ok_or(GenerateError::NoResult)?;

        let path = self.staging_dir.join(format!("{hint}.{}", self.extension));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| PipelineError::storage(&path, e))?;

        tracing::debug!("Staged {} bytes at {}", bytes.len(), path.display());

        Ok(StagedImage::new(hint, path))
    }
}
