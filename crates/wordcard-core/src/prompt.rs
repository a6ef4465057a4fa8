use wordcard_types::VocabularyItem;

/// Built-in enrichment prompt. Every label here is one the parser recognizes.
pub const DEFAULT_TEMPLATE: &str = r#"You are helping an English speaker learn {language}.
Word: {word}
Dictionary form (if known): {dictionary_form}
Phrase where the word was seen: {phrase}

Reply using exactly these labeled lines and nothing else:
Original Word: the word exactly as given
Original Phrase: the phrase exactly as given, or leave empty
Dictionary Form: the dictionary (base) form of the word
English Translation Short: a concise translation, ideally one word
English Translation Long: a fuller explanation of the meaning as used in the phrase
English Alternate Definitions: other common meanings separated by semicolons
Short Example Phrase: a short, simple {language} sentence using the word
Priority: High, Medium or Low, how important this word is for a learner
Image prompt: a short description of an image that would help the learner recall this word on a flashcard; no text in the image"#;

/// Renders the enrichment prompt for one item
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: String) -> Self {
        Self { template }
    }

    /// Configured template, or the built-in one
    pub fn from_config(template: Option<&str>) -> Self {
        Self::new(template.unwrap_or(DEFAULT_TEMPLATE).to_string())
    }

    pub fn render(&self, language: &str, item: &VocabularyItem) -> String {
        let dictionary_form = item
            .dictionary_form
            .as_deref()
            .unwrap_or("unknown, please provide it");
        let phrase = item.phrase.as_deref().unwrap_or("none given");

        self.template
            .replace("{language}", language)
            .replace("{word}", &item.word)
            .replace("{dictionary_form}", dictionary_form)
            .replace("{phrase}", phrase)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::from_config(None)
    }
}
