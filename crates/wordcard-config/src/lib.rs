use std::env;

use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::generation::GenerationConfig;
use self::pipeline::PipelineConfig;
use self::storage::StorageConfig;

pub mod anki;
pub mod generation;
pub mod pipeline;
pub mod storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
    pub anki: AnkiConfig,

    pub log_format: LogFormat,
}

impl Config {
    pub fn new() -> Self {
        let mut pipeline = PipelineConfig::default();

        if let Ok(language) = env::var("WORDCARD_LANGUAGE") {
            pipeline.language = language;
        }

        if let Some(concurrency) = env::var("WORDCARD_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            pipeline.concurrency = concurrency;
        }

        let log_format = match env::var("WORDCARD_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Config {
            generation: GenerationConfig::new(),
            storage: StorageConfig::new(),
            pipeline,
            anki: AnkiConfig::new(),

            log_format,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            storage: StorageConfig::default(),
            pipeline: PipelineConfig::default(),
            anki: AnkiConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}
