use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Separator used when alternate definitions are flattened into one column
pub const ALTERNATES_DELIMITER: &str = "; ";

/// One vocabulary entry as produced by a source reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    pub dictionary_form: Option<String>,
    pub phrase: Option<String>,
    /// Ordinal in the source, unique within one run
    pub position: usize,
}

impl VocabularyItem {
    pub fn new(word: impl Into<String>, phrase: Option<String>, position: usize) -> Self {
        Self {
            word: word.into(),
            dictionary_form: None,
            phrase,
            position,
        }
    }

    pub fn with_dictionary_form(mut self, dictionary_form: Option<String>) -> Self {
        self.dictionary_form = dictionary_form;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parse the leading word of a label value, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        let first = value
            .split(|c: char| !c.is_alphabetic())
            .find(|s| !s.is_empty())?;

        match first.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image written to the staging directory before its record has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedImage {
    /// Sanitized name hint the file was written under
    pub hint: String,
    pub path: PathBuf,
}

impl StagedImage {
    pub fn new(hint: String, path: PathBuf) -> Self {
        Self { hint, path }
    }

    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("png")
    }

    /// Identity-addressed path this image moves to once reconciled
    pub fn final_path(&self, image_dir: &Path, id: i64) -> PathBuf {
        image_dir.join(format!("{id}.{}", self.extension()))
    }
}

/// Result of enriching a single vocabulary item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedWord {
    pub original_word: Option<String>,
    pub original_phrase: Option<String>,
    pub dictionary_form: Option<String>,
    pub english_translation_short: Option<String>,
    pub english_translation_long: Option<String>,
    pub alternate_definitions: Vec<String>,
    pub short_example: Option<String>,
    pub priority: Option<Priority>,
    pub image_prompt: Option<String>,
    pub image: Option<StagedImage>,
    /// Raw completion, kept for diagnostics
    pub full_response: Option<String>,
}

impl EnrichedWord {
    /// Alternate definitions flattened for storage, unset when there are none
    pub fn alternate_definitions_joined(&self) -> Option<String> {
        if self.alternate_definitions.is_empty() {
            None
        } else {
            Some(self.alternate_definitions.join(ALTERNATES_DELIMITER))
        }
    }

    /// True when the model produced none of the structured fields
    pub fn is_sparse(&self) -> bool {
        self.english_translation_short.is_none()
    }
}

/// A row in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: i64,
    pub word: String,
    pub phrase: Option<String>,
    pub dictionary_form: Option<String>,
    pub english_translation_short: Option<String>,
    pub english_translation_long: Option<String>,
    pub alternate_definitions: Option<String>,
    pub short_example: Option<String>,
    pub priority: Option<Priority>,
    pub image_prompt: Option<String>,
    pub image_path: Option<String>,
    pub full_response: Option<String>,
}

impl PersistedRecord {
    pub fn alternate_definitions(&self) -> Vec<String> {
        self.alternate_definitions
            .as_deref()
            .map(|joined| {
                joined
                    .split(ALTERNATES_DELIMITER.trim())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
