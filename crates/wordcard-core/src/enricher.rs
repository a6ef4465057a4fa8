use std::sync::Arc;

use wordcard_generator::GenerationBackend;
use wordcard_types::{EnrichedWord, VocabularyItem};

use crate::error::PipelineError;
use crate::image::ImageMaterializer;
use crate::parser;
use crate::prompt::PromptTemplate;

/// Builds an `EnrichedWord` for one vocabulary item
pub struct Enricher {
    backend: Arc<dyn GenerationBackend>,
    images: ImageMaterializer,
    prompt: PromptTemplate,
}

impl Enricher {
    pub fn new(backend: Arc<dyn GenerationBackend>, images: ImageMaterializer, prompt: PromptTemplate) -> Self {
        Self {
            backend,
            images,
            prompt,
        }
    }

    /// Text enrichment failures are errors; image failures only leave the image fields unset
    pub async fn enrich(&self, language: &str, item: &VocabularyItem) -> Result<EnrichedWord, PipelineError> {
        let word = item.word.trim();
        if word.is_empty() {
            return Err(PipelineError::Validation(format!(
                "vocabulary item at position {} has no word",
                item.position
            )));
        }

        let prompt = self.prompt.render(language, item);
        let completion = self.backend.complete(&prompt).await?;
        let mut enriched = parser::parse(&completion);

        if enriched.original_word.as_deref().is_some_and(|w| w != word) {
            tracing::debug!(
                "Model echoed {:?} for {}, keeping the source word",
                enriched.original_word,
                word
            );
        }
        enriched.original_word = Some(word.to_string());
        if item.phrase.is_some() {
            enriched.original_phrase = item.phrase.clone();
        }
        if item.dictionary_form.is_some() {
            enriched.dictionary_form = item.dictionary_form.clone();
        }

        if enriched.is_sparse() {
            tracing::warn!("No short translation parsed for {}", word);
        }

        let Some(image_prompt) = enriched.image_prompt.clone() else {
            tracing::warn!("No image prompt parsed for {}, skipping image", word);
            return Ok(enriched);
        };

        let base = enriched.english_translation_short.as_deref().unwrap_or(word);
        let name_hint = format!("{} {}", base, item.position);

        match self.images.materialize(&image_prompt, &name_hint).await {
            Ok(staged) => {
                tracing::debug!("Staged image for {} at {}", word, staged.path.display());
                enriched.image = Some(staged);
            }
            Err(e) => {
                tracing::warn!("Image generation failed for {}: {}", word, e);
                enriched.image_prompt = None;
                enriched.image = None;
            }
        }

        Ok(enriched)
    }
}
