use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use wordcard_types::{EnrichedWord, PersistedRecord, Priority};

use crate::{RecordStore, StoreError};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS vocab_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT NOT NULL,
        phrase TEXT,
        dictionary_form TEXT,
        english_translation_short TEXT,
        english_translation_long TEXT,
        alternate_definitions TEXT,
        short_example TEXT,
        priority TEXT,
        image_prompt TEXT,
        image_path TEXT,
        full_response TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_vocab_word ON vocab_words(word)",
    "CREATE INDEX IF NOT EXISTS idx_vocab_english_short ON vocab_words(english_translation_short)",
];

const SELECT_COLUMNS: &str = r#"
    SELECT id, word, phrase, dictionary_form, english_translation_short,
           english_translation_long, alternate_definitions, short_example,
           priority, image_prompt, image_path, full_response
    FROM vocab_words
"#;

/// SQLite-backed record store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file and initialize the schema
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        tracing::debug!("Opening record store at {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private database living as long as the store, for tests and dry runs
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_or_ignore(&self, word: &str, enriched: &EnrichedWord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vocab_words (
                word, phrase, dictionary_form, english_translation_short,
                english_translation_long, alternate_definitions, short_example,
                priority, image_prompt, image_path, full_response
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)
            ON CONFLICT(word) DO NOTHING
            "#,
        )
        .bind(word)
        .bind(&enriched.original_phrase)
        .bind(&enriched.dictionary_form)
        .bind(&enriched.english_translation_short)
        .bind(&enriched.english_translation_long)
        .bind(enriched.alternate_definitions_joined())
        .bind(&enriched.short_example)
        .bind(enriched.priority.map(|p| p.as_str()))
        .bind(&enriched.image_prompt)
        .bind(&enriched.full_response)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_word(&self, word: &str) -> Result<Option<PersistedRecord>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE word = ?"))
            .bind(word)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn set_image_path(&self, id: i64, path: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE vocab_words SET image_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn all(&self) -> Result<Vec<PersistedRecord>, StoreError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }
}

fn record_from_row(row: &SqliteRow) -> PersistedRecord {
    let priority: Option<String> = row.get("priority");

    PersistedRecord {
        id: row.get("id"),
        word: row.get("word"),
        phrase: row.get("phrase"),
        dictionary_form: row.get("dictionary_form"),
        english_translation_short: row.get("english_translation_short"),
        english_translation_long: row.get("english_translation_long"),
        alternate_definitions: row.get("alternate_definitions"),
        short_example: row.get("short_example"),
        priority: priority.as_deref().and_then(Priority::parse),
        image_prompt: row.get("image_prompt"),
        image_path: row.get("image_path"),
        full_response: row.get("full_response"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn enriched(short: &str) -> EnrichedWord {
        EnrichedWord {
            original_word: Some("사과".to_string()),
            original_phrase: Some("사과를 먹었다".to_string()),
            english_translation_short: Some(short.to_string()),
            alternate_definitions: vec!["apology".to_string()],
            priority: Some(Priority::High),
            full_response: Some(format!("English Translation Short: {short}")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert!(store.insert_or_ignore("사과", &enriched("apple")).await.unwrap());

        let record = store.find_by_word("사과").await.unwrap().expect("row");
        assert!(record.id > 0);
        assert_eq!(record.word, "사과");
        assert_eq!(record.phrase.as_deref(), Some("사과를 먹었다"));
        assert_eq!(record.english_translation_short.as_deref(), Some("apple"));
        assert_eq!(record.alternate_definitions.as_deref(), Some("apology"));
        assert_eq!(record.priority, Some(Priority::High));
        assert_eq!(record.image_path, None);
    }

    #[tokio::test]
    async fn test_second_insert_is_ignored() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert!(store.insert_or_ignore("사과", &enriched("apple")).await.unwrap());
        assert!(!store.insert_or_ignore("사과", &enriched("apology")).await.unwrap());

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].english_translation_short.as_deref(), Some("apple"));
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_or_ignore("Haus", &EnrichedWord::default()).await.unwrap();

        assert!(store.find_by_word("haus").await.unwrap().is_none());
        assert!(store.insert_or_ignore("haus", &EnrichedWord::default()).await.unwrap());
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_image_path() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_or_ignore("사과", &enriched("apple")).await.unwrap();
        let id = store.find_by_word("사과").await.unwrap().unwrap().id;

        store.set_image_path(id, "raw_images/1.png").await.unwrap();
        let record = store.find_by_word("사과").await.unwrap().unwrap();
        assert_eq!(record.image_path.as_deref(), Some("raw_images/1.png"));

        assert!(matches!(
            store.set_image_path(id + 100, "x.png").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_word_keep_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(&dir.path().join("vocab.db"), 4).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_or_ignore("사과", &enriched(&format!("apple {i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.db");

        {
            let store = SqliteStore::open(&path, 1).await.unwrap();
            store.insert_or_ignore("사과", &enriched("apple")).await.unwrap();
            store.pool().close().await;
        }

        let store = SqliteStore::open(&path, 1).await.unwrap();
        assert!(store.find_by_word("사과").await.unwrap().is_some());
    }
}
