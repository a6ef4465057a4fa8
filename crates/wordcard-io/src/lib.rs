pub mod csv;
pub mod normalize;
pub mod readlang;

pub use self::csv::{CsvSource, filter_new};
pub use self::normalize::{DefaultPreprocessor, Preprocessor, ReadlangPreprocessor};
pub use self::readlang::{ReadlangSource, known_words, write_csv};

use wordcard_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
