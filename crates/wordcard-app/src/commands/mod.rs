pub mod enrich;
pub mod export;
pub mod readlang;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Enrich new words from a vocabulary CSV and store them
    Enrich(enrich::EnrichArgs),
    /// Convert a Readlang word export into a vocabulary CSV
    ImportReadlang(readlang::ImportReadlangArgs),
    /// Add stored words to Anki through AnkiConnect
    Export(export::ExportArgs),
}
