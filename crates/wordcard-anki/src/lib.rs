mod client;
mod media;
mod template;

pub use client::{AnkiConnectClient, Note, NoteFields, is_duplicate_error};
pub use media::{media_filename, resize_png};
pub use template::CardTemplate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use wordcard_types::PersistedRecord;

/// Counts from one export run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub added: usize,
    pub duplicates: usize,
    pub images: usize,
    pub failed: usize,
}

/// Add one note per record. Images come from the recorded path, else `<image_dir>/<id>.png`.
pub async fn export_records(
    client: &AnkiConnectClient,
    template: &CardTemplate,
    records: &[PersistedRecord],
    image_dir: &Path,
    image_size: u32,
    tags: &[String],
) -> Result<ExportReport> {
    client.prepare_deck(&template.deck).await?;

    let mut report = ExportReport::default();

    for record in records {
        let image_tag = match upload_image(client, record, image_dir, image_size).await {
            Ok(Some(filename)) => {
                report.images += 1;
                format!("<img src='{}'>", filename)
            }
            Ok(None) => {
                tracing::debug!("No image for #{} {}", record.id, record.word);
                String::new()
            }
            Err(e) => {
                tracing::warn!("Could not upload image for #{} {}: {}", record.id, record.word, e);
                String::new()
            }
        };

        match add_card(client, template, record, &image_tag, tags).await {
            Ok(note_id) => {
                tracing::info!("Added card for {}: note_id={}", record.word, note_id);
                report.added += 1;
            }
            Err(e) if is_duplicate_error(&e) => {
                tracing::info!("{} already has a card, skipping", record.word);
                report.duplicates += 1;
            }
            Err(e) => {
                tracing::error!("Failed to add card for {}: {}", record.word, e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Add a card to Anki using the provided client and template
pub async fn add_card(
    client: &AnkiConnectClient,
    template: &CardTemplate,
    record: &PersistedRecord,
    image_tag: &str,
    tags: &[String],
) -> Result<u64> {
    let note = Note {
        deck_name: &template.deck,
        model_name: &template.model,
        fields: NoteFields {
            front: template.format_front(record, image_tag),
            back: template.format_back(record, image_tag),
        },
        tags,
    };

    client.add_note(&note).await
}

async fn upload_image(
    client: &AnkiConnectClient,
    record: &PersistedRecord,
    image_dir: &Path,
    image_size: u32,
) -> Result<Option<String>> {
    let Some(bytes) = load_image(record, image_dir).await? else {
        return Ok(None);
    };

    let resized = resize_png(&bytes, image_size)?;
    let data = base64::engine::general_purpose::STANDARD.encode(resized);
    let stored = client.store_media_file(&media_filename(record.id), &data).await?;

    Ok(Some(stored))
}

/// Image bytes from the recorded path, else `<image_dir>/<id>.png`; `None` when absent
async fn load_image(record: &PersistedRecord, image_dir: &Path) -> Result<Option<Vec<u8>>> {
    let path = record
        .image_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| image_dir.join(format!("{}.png", record.id)));

    if !tokio::fs::try_exists(&path).await? {
        return Ok(None);
    }

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(bytes))
}
