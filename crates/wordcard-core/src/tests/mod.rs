use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use wordcard_generator::{GenerateError, GenerationBackend, ProviderMetadata};
use wordcard_store::{RecordStore, SqliteStore, StoreError};
use wordcard_types::{EnrichedWord, PersistedRecord};


type CompletionFn = Box<dyn Fn(&str) -> Result<String, GenerateError> + Send + Sync>;

/// In-process backend that answers from a closure and records call concurrency
pub struct FakeBackend {
    completion: CompletionFn,
    images: bool,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl FakeBackend {
    pub const IMAGE: &'static [u8] = b"\x89PNG\r\n\x1a\nfake";

    /// Answers every prompt with a labeled entry for the prompted word
    pub fn new() -> Self {
        Self::with_completion(|prompt| {
            let word = prompted_word(prompt);
            Ok(format!(
                "Original Word: {word}\nEnglish Translation Short: gloss\nImage prompt: a picture of {word}"
            ))
        })
    }

    pub fn with_completion(
        completion: impl Fn(&str) -> Result<String, GenerateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            completion: Box::new(completion),
            images: true,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_images(mut self) -> Self {
        self.images = false;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn track<T>(&self, call: impl FnOnce() -> T) -> T {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = call();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// The `Word:` line of a rendered default prompt
pub fn prompted_word(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("Word: "))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.track(|| (self.completion)(prompt)).await
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Option<Vec<u8>>, GenerateError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let images = self.images;
        Ok(self.track(|| images.then(|| Self::IMAGE.to_vec())).await)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            text_model: "fake-text".to_string(),
            image_model: "fake-image".to_string(),
        }
    }
}

/// Which store call a `FlakyStore` breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// `insert_or_ignore` errors
    Insert,
    /// Inserts succeed but `find_by_word` sees nothing
    LostRow,
    /// `set_image_path` errors
    SetImagePath,
}

/// In-memory store with one call made to fail
pub struct FlakyStore {
    inner: SqliteStore,
    fault: StoreFault,
}

impl FlakyStore {
    pub async fn new(fault: StoreFault) -> Self {
        Self {
            inner: SqliteStore::in_memory().await.unwrap(),
            fault,
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn insert_or_ignore(&self, word: &str, enriched: &EnrichedWord) -> Result<bool, StoreError> {
        if self.fault == StoreFault::Insert {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.insert_or_ignore(word, enriched).await
    }

    async fn find_by_word(&self, word: &str) -> Result<Option<PersistedRecord>, StoreError> {
        if self.fault == StoreFault::LostRow {
            return Ok(None);
        }
        self.inner.find_by_word(word).await
    }

    async fn set_image_path(&self, id: i64, path: &str) -> Result<(), StoreError> {
        if self.fault == StoreFault::SetImagePath {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        self.inner.set_image_path(id, path).await
    }

    async fn all(&self) -> Result<Vec<PersistedRecord>, StoreError> {
        self.inner.all().await
    }
}
