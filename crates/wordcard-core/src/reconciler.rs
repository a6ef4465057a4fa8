use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wordcard_store::{RecordStore, StoreError};
use wordcard_types::{EnrichedWord, PersistedRecord, StagedImage, VocabularyItem};

use crate::error::{PipelineError, ReconciliationWarning};

/// Outcome of committing one enrichment
#[derive(Debug)]
pub enum Commit {
    /// A new row was written. `image` is the final image path, or why it could not be placed.
    Stored {
        record: PersistedRecord,
        image: Result<PathBuf, ReconciliationWarning>,
    },
    /// The word was already stored; the existing row wins and this enrichment is dropped
    Ignored {
        record: PersistedRecord,
        orphaned: Option<StagedImage>,
    },
}

impl Commit {
    pub fn record(&self) -> &PersistedRecord {
        match self {
            Commit::Stored { record, .. } | Commit::Ignored { record, .. } => record,
        }
    }
}

/// Writes enrichments to the record store and moves staged images to `<id>.<ext>`
pub struct PersistenceReconciler {
    store: Arc<dyn RecordStore>,
    image_dir: PathBuf,
}

impl PersistenceReconciler {
    pub fn new(store: Arc<dyn RecordStore>, image_dir: PathBuf) -> Self {
        Self { store, image_dir }
    }

    /// A store failure never triggers a rename; a rename failure never touches the row
    pub async fn commit(&self, item: &VocabularyItem, mut enriched: EnrichedWord) -> Result<Commit, PipelineError> {
        let staged = enriched.image.take();

        let inserted = match self.store.insert_or_ignore(&item.word, &enriched).await {
            Ok(inserted) => inserted,
            Err(e) => {
                report_orphan(&item.word, staged.as_ref());
                return Err(e.into());
            }
        };

        let record = match self.store.find_by_word(&item.word).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                report_orphan(&item.word, staged.as_ref());
                return Err(StoreError::WordNotFound(item.word.clone()).into());
            }
            Err(e) => {
                report_orphan(&item.word, staged.as_ref());
                return Err(e.into());
            }
        };

        if !inserted {
            tracing::info!("{} already stored as #{}, keeping existing record", item.word, record.id);
            report_orphan(&item.word, staged.as_ref());
            return Ok(Commit::Ignored {
                record,
                orphaned: staged,
            });
        }

        let image = match staged {
            Some(staged) => self.promote(staged, record.id).await,
            None => Err(ReconciliationWarning::NoStagedImage),
        };

        let record = match &image {
            Ok(path) => PersistedRecord {
                image_path: Some(path.to_string_lossy().into_owned()),
                ..record
            },
            Err(warning) => {
                tracing::warn!("{} committed as #{} with warning: {}", item.word, record.id, warning);
                record
            }
        };

        Ok(Commit::Stored { record, image })
    }

    /// Staged to final: `<image_dir>/<id>.<ext>`
    async fn promote(&self, staged: StagedImage, id: i64) -> Result<PathBuf, ReconciliationWarning> {
        let target = staged.final_path(&self.image_dir, id);

        if !tokio::fs::try_exists(&staged.path).await.unwrap_or(false) {
            return Err(ReconciliationWarning::StagedImageMissing { path: staged.path });
        }

        if let Err(source) = tokio::fs::create_dir_all(&self.image_dir).await {
            return Err(ReconciliationWarning::RenameFailed {
                from: staged.path,
                to: target,
                source,
            });
        }

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(ReconciliationWarning::TargetExists { path: target });
        }

        if let Err(source) = move_file(&staged.path, &target).await {
            return Err(ReconciliationWarning::RenameFailed {
                from: staged.path,
                to: target,
                source,
            });
        }

        if let Err(source) = self
            .store
            .set_image_path(id, &target.to_string_lossy())
            .await
        {
            return Err(ReconciliationWarning::ImagePathNotRecorded { path: target, source });
        }

        tracing::debug!("Moved {} to {}", staged.path.display(), target.display());
        Ok(target)
    }
}

/// Rename, or copy and remove when staging sits on another filesystem
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::debug!("{} is on another device, copying", from.display());
            copy_then_remove(from, to).await
        }
        result => result,
    }
}

async fn copy_then_remove(from: &Path, to: &Path) -> std::io::Result<()> {
    tokio::fs::copy(from, to).await?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        tracing::warn!("Copied {} but could not remove it: {}", from.display(), e);
    }
    Ok(())
}

fn report_orphan(word: &str, staged: Option<&StagedImage>) {
    if let Some(staged) = staged {
        tracing::warn!("Staged image for {} left at {}", word, staged.path.display());
    }
}
