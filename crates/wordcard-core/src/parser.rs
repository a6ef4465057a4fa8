//! Extraction of labeled fields from a free-text model completion.
//!
//! The completion is read line by line. A line that starts with a known label
//! opens that field; any other line continues the field opened last. Text
//! before the first label is ignored.

use std::collections::HashMap;

use wordcard_types::{EnrichedWord, Priority};

/// Code fences and quote blocks models like to wrap their answer in
const FENCES: [&str; 2] = ["```", "\"\"\""];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    OriginalWord,
    OriginalPhrase,
    DictionaryForm,
    EnglishShort,
    EnglishLong,
    Alternates,
    ShortExample,
    Priority,
    ImagePrompt,
}

/// Label text (without the colon) for every field, matched case-insensitively
const LABELS: [(&str, Field); 12] = [
    ("original word", Field::OriginalWord),
    ("original phrase", Field::OriginalPhrase),
    ("dictionary form word", Field::DictionaryForm),
    ("dictionary form", Field::DictionaryForm),
    ("english translation short", Field::EnglishShort),
    ("english translation long", Field::EnglishLong),
    ("english alternate definitions", Field::Alternates),
    ("alternate definitions", Field::Alternates),
    ("short example phrase", Field::ShortExample),
    ("short example", Field::ShortExample),
    ("priority", Field::Priority),
    ("image prompt", Field::ImagePrompt),
];

/// Accumulates value fragments for each opened field
#[derive(Default)]
struct ParseState {
    current: Option<Field>,
    values: HashMap<Field, Vec<String>>,
}

impl ParseState {
    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some((field, value)) = match_label(line) {
            self.current = Some(field);
            let fragments = self.values.entry(field).or_default();
            if !value.is_empty() {
                fragments.push(value.to_string());
            }
            return;
        }

        if let Some(field) = self.current {
            self.values.entry(field).or_default().push(line.to_string());
        }
    }

    fn text(&self, field: Field) -> Option<String> {
        let joined = self.values.get(&field)?.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Parse a raw completion. Never fails; fields the model did not emit stay unset.
pub fn parse(raw: &str) -> EnrichedWord {
    let full = raw.trim();
    let mut state = ParseState::default();

    for line in strip_fences(full).lines() {
        state.feed(line);
    }

    EnrichedWord {
        original_word: state.text(Field::OriginalWord),
        original_phrase: state.text(Field::OriginalPhrase),
        dictionary_form: state.text(Field::DictionaryForm),
        english_translation_short: state.text(Field::EnglishShort),
        english_translation_long: state.text(Field::EnglishLong),
        alternate_definitions: state
            .text(Field::Alternates)
            .map(|v| split_alternates(&v))
            .unwrap_or_default(),
        short_example: state.text(Field::ShortExample),
        priority: state.text(Field::Priority).and_then(|v| Priority::parse(&v)),
        image_prompt: state.text(Field::ImagePrompt),
        image: None,
        full_response: (!full.is_empty()).then(|| full.to_string()),
    }
}

fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();

    loop {
        let before = text.len();
        for fence in FENCES {
            if let Some(rest) = text.strip_prefix(fence) {
                text = rest.trim();
            }
            if let Some(rest) = text.strip_suffix(fence) {
                text = rest.trim();
            }
        }
        if text.len() == before {
            return text;
        }
    }
}

/// Returns the field a line opens and the value that follows the label
fn match_label(line: &str) -> Option<(Field, &str)> {
    // Markdown bullets, headings and bold markers around the label
    let content = line.trim_start_matches(|c: char| c == '*' || c == '-' || c == '#' || c.is_whitespace());

    LABELS.iter().find_map(|&(label, field)| {
        let head = content.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }

        let rest = content[label.len()..].trim_start_matches(|c: char| c == '*' || c.is_whitespace());
        let value = rest.strip_prefix(':')?;
        Some((field, value.trim_start_matches('*').trim()))
    })
}

fn split_alternates(value: &str) -> Vec<String> {
    let delimiter = if value.contains(';') { ';' } else { ',' };

    value
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_labels() {
        let parsed = parse(
            "Original Word: 사과\nEnglish Translation Short: apple\nImage prompt: a red apple on a table",
        );

        assert_eq!(parsed.original_word.as_deref(), Some("사과"));
        assert_eq!(parsed.english_translation_short.as_deref(), Some("apple"));
        assert_eq!(parsed.image_prompt.as_deref(), Some("a red apple on a table"));
        assert_eq!(parsed.english_translation_long, None);
        assert_eq!(parsed.priority, None);
        assert!(parsed.alternate_definitions.is_empty());
    }

    #[test]
    fn test_no_labels_keeps_only_full_response() {
        let raw = "  Sorry, I cannot help with that.\nTry again later.  ";
        let parsed = parse(raw);

        assert_eq!(
            parsed,
            EnrichedWord {
                full_response: Some("Sorry, I cannot help with that.\nTry again later.".to_string()),
                ..Default::default()
            }
        );
        assert!(parsed.is_sparse());
    }

    #[test]
    fn test_blank_input_sets_nothing() {
        assert_eq!(parse(" \n\t "), EnrichedWord::default());
    }

    #[test]
    fn test_multiline_continuation_is_space_joined() {
        let parsed = parse(
            "English Translation Long: an apple, the round fruit\n  of the apple tree\n\nwhich is often red\nPriority: High",
        );

        assert_eq!(
            parsed.english_translation_long.as_deref(),
            Some("an apple, the round fruit of the apple tree which is often red")
        );
        assert_eq!(parsed.priority, Some(Priority::High));
    }

    #[test]
    fn test_value_may_start_on_next_line() {
        let parsed = parse("Short Example Phrase:\n사과가 맛있어요.");
        assert_eq!(parsed.short_example.as_deref(), Some("사과가 맛있어요."));
    }

    #[test]
    fn test_lines_before_first_label_are_discarded() {
        let parsed = parse("Here is the entry you asked for:\n\nOriginal Word: 먹다");
        assert_eq!(parsed.original_word.as_deref(), Some("먹다"));
        assert_eq!(parsed.english_translation_short, None);
    }

    #[test]
    fn test_labels_are_case_insensitive_and_tolerate_markdown() {
        let parsed = parse(
            "**ORIGINAL WORD:** 먹었다\n- dictionary form: 먹다\n## English Translation Short: to eat\n**Priority**: low",
        );

        assert_eq!(parsed.original_word.as_deref(), Some("먹었다"));
        assert_eq!(parsed.dictionary_form.as_deref(), Some("먹다"));
        assert_eq!(parsed.english_translation_short.as_deref(), Some("to eat"));
        assert_eq!(parsed.priority, Some(Priority::Low));
    }

    #[test]
    fn test_fences_are_stripped() {
        let parsed = parse("```\nOriginal Word: 사과\nEnglish Translation Short: apple\n```");
        assert_eq!(parsed.english_translation_short.as_deref(), Some("apple"));

        let parsed = parse("\"\"\"\nEnglish Translation Short: apple\n\"\"\"");
        assert_eq!(parsed.english_translation_short.as_deref(), Some("apple"));
    }

    #[test]
    fn test_fence_language_tag_is_ignored() {
        let parsed = parse("```text\nEnglish Translation Short: apple\n```");
        assert_eq!(parsed.english_translation_short.as_deref(), Some("apple"));
        assert_eq!(parsed.original_word, None);
    }

    #[test]
    fn test_alternate_definitions_are_split() {
        let parsed = parse("English Alternate Definitions: apology; excuse ;  ; regret");
        assert_eq!(parsed.alternate_definitions, vec!["apology", "excuse", "regret"]);

        let parsed = parse("English Alternate Definitions: apology, excuse");
        assert_eq!(parsed.alternate_definitions, vec!["apology", "excuse"]);
    }

    #[test]
    fn test_unknown_priority_is_unset() {
        let parsed = parse("Priority: very important");
        assert_eq!(parsed.priority, None);
    }

    #[test]
    fn test_whitespace_only_value_is_unset() {
        let parsed = parse("English Translation Short:   \nPriority: Medium");
        assert_eq!(parsed.english_translation_short, None);
        assert_eq!(parsed.priority, Some(Priority::Medium));
    }

    #[test]
    fn test_longer_label_is_not_shadowed() {
        let parsed = parse("Dictionary Form Word: 먹다\nShort Example: 밥을 먹다");
        assert_eq!(parsed.dictionary_form.as_deref(), Some("먹다"));
        assert_eq!(parsed.short_example.as_deref(), Some("밥을 먹다"));
    }

    #[test]
    fn test_repeated_label_extends_field() {
        let parsed = parse("Image prompt: a red apple\nPriority: High\nImage prompt: on a wooden table");
        assert_eq!(
            parsed.image_prompt.as_deref(),
            Some("a red apple on a wooden table")
        );
    }

    #[test]
    fn test_non_ascii_line_does_not_panic() {
        let parsed = parse("English Translation Short: apple\n사과는 빨갛다");
        assert_eq!(
            parsed.english_translation_short.as_deref(),
            Some("apple 사과는 빨갛다")
        );
    }
}
