use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    /// AnkiConnect URL
    pub url: String,
    /// Target deck name
    pub deck: String,
    /// Note type with `Front` and `Back` fields
    pub model: String,
    /// Edge length images are resized to before upload
    pub image_size: u32,
    pub tags: Vec<String>,
    /// Placeholders: {word} {dictionary_form} {phrase} {short_example}
    /// {english_short} {english_long} {alternates} {image}
    pub front_template: String,
    pub back_template: String,
}

impl AnkiConfig {
    pub fn new() -> Self {
        Self {
            url: "http://localhost:8765".to_string(),
            deck: "Korean Vocab".to_string(),
            model: "Basic".to_string(),
            image_size: 360,
            tags: vec!["wordcard".to_string()],
            front_template: "<h2>{dictionary_form}</h2><br>{short_example}".to_string(),
            back_template: "{english_long}<br><br>Alternates: {alternates}<br><br>{image}".to_string(),
        }
    }
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self::new()
    }
}
