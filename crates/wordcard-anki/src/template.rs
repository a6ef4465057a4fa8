use serde::{Deserialize, Serialize};
use wordcard_config::anki::AnkiConfig;
use wordcard_types::{ALTERNATES_DELIMITER, PersistedRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTemplate {
    pub deck: String,
    pub model: String,
    pub front_template: String,
    pub back_template: String,
}

impl CardTemplate {
    pub fn new(deck: String, model: String, front: String, back: String) -> Self {
        Self {
            deck,
            model,
            front_template: front,
            back_template: back,
        }
    }

    pub fn from_config(config: &AnkiConfig) -> Self {
        Self::new(
            config.deck.clone(),
            config.model.clone(),
            config.front_template.clone(),
            config.back_template.clone(),
        )
    }

    /// Format the front of the card
    pub fn format_front(&self, record: &PersistedRecord, image_tag: &str) -> String {
        render(&self.front_template, record, image_tag)
    }

    /// Format the back of the card
    pub fn format_back(&self, record: &PersistedRecord, image_tag: &str) -> String {
        render(&self.back_template, record, image_tag)
    }
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::from_config(&AnkiConfig::default())
    }
}

fn render(template: &str, record: &PersistedRecord, image_tag: &str) -> String {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    // Words without a dictionary form show the word itself
    let dictionary_form = record
        .dictionary_form
        .clone()
        .unwrap_or_else(|| record.word.clone());

    template
        .replace("{word}", &record.word)
        .replace("{dictionary_form}", &dictionary_form)
        .replace("{phrase}", &text(&record.phrase))
        .replace("{short_example}", &text(&record.short_example))
        .replace("{english_short}", &text(&record.english_translation_short))
        .replace("{english_long}", &text(&record.english_translation_long))
        .replace("{alternates}", &record.alternate_definitions().join(ALTERNATES_DELIMITER))
        .replace("{image}", image_tag)
}
