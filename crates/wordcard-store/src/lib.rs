mod sqlite;

pub use sqlite::SqliteStore;

use wordcard_types::{EnrichedWord, PersistedRecord};

/// Durable record storage keyed uniquely on the original word
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a row for `word`, silently doing nothing if the word already exists.
    /// Returns whether a row was written.
    async fn insert_or_ignore(&self, word: &str, enriched: &EnrichedWord) -> Result<bool, StoreError>;

    /// Exact, case-sensitive lookup
    async fn find_by_word(&self, word: &str) -> Result<Option<PersistedRecord>, StoreError>;

    /// Record the reconciled image path of a row
    async fn set_image_path(&self, id: i64, path: &str) -> Result<(), StoreError>;

    /// All rows in identity order
    async fn all(&self) -> Result<Vec<PersistedRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No record with id {0}")]
    NotFound(i64),

    #[error("No record for word {0}")]
    WordNotFound(String),
}
