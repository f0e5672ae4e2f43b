use unicode_segmentation::UnicodeSegmentation;

use crate::core::token::Token;
use crate::core::types::Locale;

/// Splits a sentence into indexed tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, locale: Locale) -> Vec<Token>;
}

/// Tokenizer splitting on Unicode word boundaries (UAX #29).
///
/// Whitespace is dropped and punctuation becomes separate tokens, so
/// `"Dach."` yields `"Dach"` and `"."`. Decimal numbers such as `0.6` and
/// contractions such as `don't` stay whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str, _locale: Locale) -> Vec<Token> {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .enumerate()
            .map(|(i, segment)| Token::new(i, segment))
            .collect()
    }
}

/// Tokenize with the default [`WordTokenizer`]
pub fn tokenize(text: &str, locale: Locale) -> Vec<Token> {
    WordTokenizer.tokenize(text, locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        let tokens = tokenize("Die Katze sitzt auf dem Dach.", Locale::German);
        assert_eq!(
            texts(&tokens),
            vec!["Die", "Katze", "sitzt", "auf", "dem", "Dach", "."]
        );
        assert!(tokens.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn test_tokenize_keeps_numbers() {
        let tokens = tokenize("took 0.6 mg", Locale::English);
        assert_eq!(texts(&tokens), vec!["took", "0.6", "mg"]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("", Locale::German).is_empty());
        assert!(tokenize("   \t ", Locale::German).is_empty());
    }
}
