use std::io::Read;
use std::path::Path;

use wordcard_store::RecordStore;
use wordcard_types::VocabularyItem;

use crate::SourceError;
use crate::normalize::{DefaultPreprocessor, Preprocessor};

/// Reads `word,phrase[,dictionary_form]` rows after a header line
pub struct CsvSource;

impl CsvSource {
    pub fn read_path(path: &Path) -> Result<Vec<VocabularyItem>, SourceError> {
        tracing::info!("Reading vocabulary from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }

    pub fn read<R: Read>(reader: R) -> Result<Vec<VocabularyItem>, SourceError> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let preprocessor = DefaultPreprocessor;
        let mut items = Vec::new();

        for record in rdr.records() {
            let record = record?;

            let word = preprocessor.process(record.get(0).unwrap_or_default());
            if word.is_empty() {
                continue;
            }

            let optional = |index: usize| {
                record
                    .get(index)
                    .map(|v| preprocessor.process(v))
                    .filter(|v| !v.is_empty())
            };

            let item = VocabularyItem::new(word, optional(1), items.len())
                .with_dictionary_form(optional(2));
            items.push(item);
        }

        tracing::info!("Read {} vocabulary rows", items.len());
        Ok(items)
    }
}

/// Drops items whose word already has a stored record
pub async fn filter_new(
    items: Vec<VocabularyItem>,
    store: &dyn RecordStore,
) -> Result<Vec<VocabularyItem>, SourceError> {
    let mut fresh = Vec::with_capacity(items.len());

    for item in items {
        if store.find_by_word(&item.word).await?.is_some() {
            tracing::debug!("{} already stored, skipping", item.word);
            continue;
        }
        fresh.push(item);
    }

    Ok(fresh)
}
