use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use wordcard_types::VocabularyItem;

use crate::SourceError;
use crate::normalize::{Preprocessor, ReadlangPreprocessor};

/// Readlang word exports: `word;phrase` rows, no header, `[[...]]` around the looked-up word
pub struct ReadlangSource {
    known: HashSet<String>,
}

impl ReadlangSource {
    pub fn new() -> Self {
        Self {
            known: HashSet::new(),
        }
    }

    /// Skip words whose first column already appears in an existing vocabulary CSV
    pub fn with_known_words(mut self, words: impl IntoIterator<Item = String>) -> Self {
        self.known.extend(words);
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<VocabularyItem>, SourceError> {
        tracing::info!("Reading Readlang export {}", path.display());
        let file = std::fs::File::open(path)?;
        self.read(file)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<VocabularyItem>, SourceError> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let preprocessor = ReadlangPreprocessor;
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut skipped = 0;

        for record in rdr.records() {
            let record = record?;

            let word = preprocessor.process(record.get(0).unwrap_or_default());
            if word.is_empty() {
                continue;
            }
            if self.known.contains(&word) || !seen.insert(word.clone()) {
                skipped += 1;
                continue;
            }

            let phrase = record
                .get(1)
                .map(|p| preprocessor.process(p))
                .filter(|p| !p.is_empty());

            items.push(VocabularyItem::new(word, phrase, items.len()));
        }

        tracing::info!("Imported {} new words, {} repeats skipped", items.len(), skipped);
        Ok(items)
    }
}

impl Default for ReadlangSource {
    fn default() -> Self {
        Self::new()
    }
}

/// First-column words of an existing vocabulary CSV, punctuation removed
pub fn known_words(path: &Path) -> Result<HashSet<String>, SourceError> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut words = HashSet::new();
    for record in rdr.records() {
        let record = record?;
        let word = ReadlangPreprocessor.process(record.get(0).unwrap_or_default());
        if !word.is_empty() {
            words.insert(word);
        }
    }

    Ok(words)
}

/// Writes items as the `word,phrase` CSV the enrich command reads
pub fn write_csv<W: Write>(items: &[VocabularyItem], writer: W) -> Result<(), SourceError> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(["word", "phrase"])?;

    for item in items {
        wtr.write_record([item.word.as_str(), item.phrase.as_deref().unwrap_or("")])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvSource;

    const EXPORT: &str = "[[사과]];[[사과]]를 먹었다.\n학교;학교에 가요!\n사과;사과가 맛있어요\n\n먹다\n";

    #[test]
    fn test_read_cleans_and_dedups() {
        let items = ReadlangSource::new().read(EXPORT.as_bytes()).unwrap();

        assert_eq!(
            items,
            vec![
                VocabularyItem::new("사과", Some("사과를 먹었다".into()), 0),
                VocabularyItem::new("학교", Some("학교에 가요".into()), 1),
                VocabularyItem::new("먹다", None, 2),
            ]
        );
    }

    #[test]
    fn test_known_words_are_skipped() {
        let source = ReadlangSource::new().with_known_words(["학교".to_string()]);
        let items = source.read(EXPORT.as_bytes()).unwrap();

        let words: Vec<_> = items.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["사과", "먹다"]);
        assert_eq!(items[1].position, 1);
    }

    #[test]
    fn test_known_words_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.csv");
        std::fs::write(&path, "word,phrase\n학교,\"학교에 가요\"\n사과!,\n").unwrap();

        let known = known_words(&path).unwrap();
        assert!(known.contains("학교"));
        assert!(known.contains("사과"));
    }

    #[test]
    fn test_written_csv_reads_back() {
        let items = ReadlangSource::new().read(EXPORT.as_bytes()).unwrap();

        let mut out = Vec::new();
        write_csv(&items, &mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("word,phrase\n"));

        assert_eq!(CsvSource::read(out.as_slice()).unwrap(), items);
    }
}
