//! End-to-end scoring of sentence pairs and corpora.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::core::token::Token;
use crate::core::types::{AlignmentMethod, Locale};
use crate::linguistics::{Tokenizer, WordTokenizer};
use crate::matching::engine::{Alignment, AlignmentConfig, AlignmentEngine};
use crate::matching::scoring::{macro_average, MeteorScore, ScoreError};
use crate::matching::stages::{default_stages, preprocess, Stage};
use crate::utils::validation::ValidationError;

/// Score and alignment of one sentence pair
#[derive(Debug, Clone, Serialize)]
pub struct PairScore {
    pub hypothesis: Vec<Token>,
    pub reference: Vec<Token>,
    pub alignment: Alignment,
    pub score: MeteorScore,
}

/// Per-pair scores and their macro-average
#[derive(Debug, Clone, Serialize)]
pub struct CorpusScore {
    pub scores: Vec<f64>,
    pub macro_average: f64,
    /// Pairs whose alignment fell back to an approximation
    pub approximate_pairs: usize,
}

/// Tokenizes, preprocesses, aligns and scores sentence pairs
pub struct Scorer {
    locale: Locale,
    tokenizer: Box<dyn Tokenizer>,
    stages: Vec<Box<dyn Stage>>,
    engine: AlignmentEngine,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("locale", &self.locale)
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Scorer {
    /// Create a scorer with the default tokenizer
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoStages` if `stages` is empty.
    pub fn new(
        locale: Locale,
        stages: Vec<Box<dyn Stage>>,
        engine: AlignmentEngine,
    ) -> Result<Self, ValidationError> {
        if stages.is_empty() {
            return Err(ValidationError::NoStages);
        }
        Ok(Self {
            locale,
            tokenizer: Box::new(WordTokenizer),
            stages,
            engine,
        })
    }

    /// Scorer with the default stages (identity 1.0, stemming 0.6) and limits
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ResourcesNotInitialized` if
    /// [`linguistics::initialize`](crate::linguistics::initialize) has not
    /// been called yet.
    pub fn with_defaults(locale: Locale) -> Result<Self, ValidationError> {
        Self::new(
            locale,
            default_stages(locale)?,
            AlignmentEngine::new(AlignmentConfig::default()),
        )
    }

    /// Replace the tokenizer
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn stages(&self) -> &[Box<dyn Stage>] {
        &self.stages
    }

    /// Tokenize a sentence and apply all stages to it
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnequalSignatures` if a stage misbehaves.
    pub fn preprocess(&self, text: &str) -> Result<Vec<Token>, ValidationError> {
        let mut tokens = self.tokenizer.tokenize(text, self.locale);
        preprocess(&self.stages, &mut tokens)?;
        Ok(tokens)
    }

    /// Score one hypothesis against one reference
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::Validation` for misbehaving stages or
    /// `ScoreError::Alignment` if the alignment could not be computed.
    pub fn score_pair(&self, hypothesis: &str, reference: &str) -> Result<PairScore, ScoreError> {
        let hyp_tokens = self.preprocess(hypothesis)?;
        let ref_tokens = self.preprocess(reference)?;

        let alignment = if hyp_tokens.is_empty() || ref_tokens.is_empty() {
            Alignment::empty()
        } else {
            self.engine.align(&hyp_tokens, &ref_tokens, &self.stages)?
        };

        let score = MeteorScore::compose(
            alignment.len(),
            hyp_tokens.len(),
            ref_tokens.len(),
            alignment.chunks(),
        );
        debug!(
            hyp_len = hyp_tokens.len(),
            ref_len = ref_tokens.len(),
            matches = alignment.len(),
            chunks = score.chunks,
            score = score.score,
            "scored pair"
        );

        Ok(PairScore {
            hypothesis: hyp_tokens,
            reference: ref_tokens,
            alignment,
            score,
        })
    }

    /// Score every hypothesis against the reference at the same position, in
    /// parallel, and macro-average the results
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::LengthMismatch` if the lists differ in length,
    /// `ScoreError::EmptyCorpus` if they are empty, or the first pair error.
    pub fn score_corpus<S: AsRef<str> + Sync>(
        &self,
        hypotheses: &[S],
        references: &[S],
    ) -> Result<CorpusScore, ScoreError> {
        if hypotheses.len() != references.len() {
            return Err(ScoreError::LengthMismatch {
                hypotheses: hypotheses.len(),
                references: references.len(),
            });
        }
        if hypotheses.is_empty() {
            return Err(ScoreError::EmptyCorpus);
        }

        let pairs: Vec<PairScore> = hypotheses
            .par_iter()
            .zip(references.par_iter())
            .map(|(h, r)| self.score_pair(h.as_ref(), r.as_ref()))
            .collect::<Result<_, _>>()?;

        let scores: Vec<f64> = pairs.iter().map(|p| p.score.score).collect();
        let approximate_pairs = pairs
            .iter()
            .filter(|p| p.alignment.method == AlignmentMethod::Approximate)
            .count();

        Ok(CorpusScore {
            macro_average: macro_average(&scores)?,
            scores,
            approximate_pairs,
        })
    }
}

/// Score one sentence pair with the given stages and default limits
///
/// # Errors
///
/// See [`Scorer::score_pair`]; also `ValidationError::NoStages` for an
/// empty stage list.
pub fn score_pair(
    hypothesis: &str,
    reference: &str,
    stages: Vec<Box<dyn Stage>>,
    locale: Locale,
) -> Result<f64, ScoreError> {
    let scorer = Scorer::new(locale, stages, AlignmentEngine::default())?;
    Ok(scorer.score_pair(hypothesis, reference)?.score.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::tokens_from_words;
    use crate::linguistics;

    fn scorer() -> Scorer {
        linguistics::initialize();
        Scorer::with_defaults(Locale::German).unwrap()
    }

    #[test]
    fn test_score_pair_cases() {
        let scorer = scorer();
        let cases = [
            ("Die Katze sitzt auf dem Dach.", "Die Katze sitzt auf dem Dach.", 1.0),
            ("Die Katze sitzt auf dem Dach.", "Auf dem Dach sitzt die Katze.", 0.91),
            ("Frau Frauen", "Frau Frau", 1.0),
            ("", "Haus Kind", 0.0),
            ("", "", 1.0),
        ];
        for (hyp, reference, expected) in cases {
            let result = scorer.score_pair(hyp, reference).unwrap();
            assert!(
                (result.score.score - expected).abs() < 0.005,
                "{hyp:?} vs {reference:?}: {}",
                result.score.score
            );
        }
    }

    #[test]
    fn test_pair_details() {
        let result = scorer()
            .score_pair("Die Katze sitzt auf dem Dach.", "Auf dem Dach sitzt die Katze.")
            .unwrap();
        assert_eq!(result.score.matches, 7);
        assert_eq!(result.score.chunks, 4);
        assert_eq!(result.hypothesis.len(), 7);
        assert_eq!(result.reference.len(), 7);
    }

    #[test]
    fn test_score_corpus() {
        let scorer = scorer();
        let hyps = vec!["Frau Frauen", "Haus Kind"];
        let refs = vec!["Frau Frau", "Frau Mann"];

        let corpus = scorer.score_corpus(&hyps, &refs).unwrap();
        assert_eq!(corpus.scores.len(), 2);
        assert!((corpus.macro_average - 0.5).abs() < 1e-9);
        assert_eq!(corpus.approximate_pairs, 0);
    }

    #[test]
    fn test_score_corpus_errors() {
        let scorer = scorer();
        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            scorer.score_corpus(&empty, &empty),
            Err(ScoreError::EmptyCorpus)
        ));
        assert!(matches!(
            scorer.score_corpus(&["a"], &["a", "b"]),
            Err(ScoreError::LengthMismatch {
                hypotheses: 1,
                references: 2
            })
        ));
    }

    #[test]
    fn test_no_stages_rejected() {
        assert!(matches!(
            Scorer::new(Locale::German, Vec::new(), AlignmentEngine::default()),
            Err(ValidationError::NoStages)
        ));
    }

    /// Splits on whitespace only, keeping punctuation attached
    struct WhitespaceTokenizer;

    impl Tokenizer for WhitespaceTokenizer {
        fn tokenize(&self, text: &str, _locale: Locale) -> Vec<Token> {
            tokens_from_words(text.split_whitespace())
        }
    }

    #[test]
    fn test_custom_tokenizer() {
        let scorer = scorer().with_tokenizer(Box::new(WhitespaceTokenizer));
        let result = scorer
            .score_pair("Die Katze sitzt auf dem Dach.", "Die Katze sitzt auf dem Dach")
            .unwrap();
        assert_eq!(result.hypothesis.len(), 6);
        assert_eq!(result.hypothesis[5].text, "Dach.");
        assert_eq!(result.score.matches, 5);
        assert_eq!(result.score.chunks, 1);
    }

    #[test]
    fn test_free_score_pair() {
        linguistics::initialize();
        let stages = default_stages(Locale::German).unwrap();
        let score = score_pair("Haus Kind", "Frau Mann", stages, Locale::German).unwrap();
        assert!((score - 0.0).abs() < 1e-12);
    }
}
