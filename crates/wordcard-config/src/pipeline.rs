use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONCURRENCY: usize = 4;

fn default_language() -> String {
    "Korean".to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("vocab.csv")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the language being learned, substituted into the prompt
    pub language: String,
    /// Number of concurrent enrichment workers
    pub concurrency: usize,
    pub csv_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            concurrency: default_concurrency(),
            csv_path: default_csv_path(),
        }
    }
}
