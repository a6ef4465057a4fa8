use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Default cleanup for words and phrases read from exports
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Canonical composition, so decomposed Hangul compares equal to composed
        let text: String = text.nfc().collect();

        text.replace(['\n', '\r'], " ").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Drops ASCII punctuation, which also unwraps `[[...]]` markup
pub struct ReadlangPreprocessor;
impl Preprocessor for ReadlangPreprocessor {
    fn process(&self, text: &str) -> String {
        let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
        DefaultPreprocessor.process(&stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_composes_and_trims() {
        let decomposed: String = "사과".nfd().collect();
        assert_ne!(decomposed, "사과");
        assert_eq!(DefaultPreprocessor.process(&format!("  {decomposed}\n")), "사과");
    }

    #[test]
    fn test_default_joins_lines() {
        assert_eq!(DefaultPreprocessor.process("사과를\r\n먹었다"), "사과를  먹었다");
        assert_eq!(DefaultPreprocessor.process("   "), "");
    }

    #[test]
    fn test_readlang_strips_markup_and_punctuation() {
        assert_eq!(ReadlangPreprocessor.process("[[사과]]를 먹었다."), "사과를 먹었다");
        assert_eq!(ReadlangPreprocessor.process("\"먹다,\""), "먹다");
    }
}
