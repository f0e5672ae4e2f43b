use serde::{Deserialize, Serialize};

/// Representation of a token produced by one matching stage.
///
/// Two tokens match under a stage when their signatures at that stage's
/// index are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(pub String);

impl Signature {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single token of a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 0-based position within the sentence
    pub index: usize,

    /// Original token text
    pub text: String,

    /// One signature per applied stage, in stage order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            signatures: Vec::new(),
        }
    }

    /// Signature produced by the stage at `stage`, if that stage was applied
    #[must_use]
    pub fn signature(&self, stage: usize) -> Option<&Signature> {
        self.signatures.get(stage)
    }

    /// Whether both tokens carry the same signature at `stage`
    #[must_use]
    pub fn agrees_with(&self, other: &Token, stage: usize) -> bool {
        match (self.signature(stage), other.signature(stage)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Build tokens from plain words, numbering them from 0
pub fn tokens_from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<Token> {
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| Token::new(i, w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agrees_with() {
        let mut a = Token::new(0, "Frauen");
        let mut b = Token::new(3, "Frau");
        a.signatures = vec![Signature::new("Frauen"), Signature::new("frau")];
        b.signatures = vec![Signature::new("Frau"), Signature::new("frau")];

        assert!(!a.agrees_with(&b, 0));
        assert!(a.agrees_with(&b, 1));
        // Missing signatures never agree
        assert!(!a.agrees_with(&b, 2));
    }

    #[test]
    fn test_tokens_from_words() {
        let tokens = tokens_from_words(["Die", "Katze"]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].index, 1);
        assert_eq!(tokens[1].text, "Katze");
        assert!(tokens[0].signatures.is_empty());
    }
}
