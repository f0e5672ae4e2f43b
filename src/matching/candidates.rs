//! Candidate graph: every token pair that some stage lets match.

use crate::core::token::Token;
use crate::matching::stages::Stage;
use crate::utils::validation::{validate_signatures_present, ValidationError};

/// A possible match between a hypothesis token and a reference token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub hyp: usize,
    pub reference: usize,
    /// Highest weight among the stages under which the two tokens agree
    pub weight: f64,
}

impl Candidate {
    #[must_use]
    pub fn pair(&self) -> (usize, usize) {
        (self.hyp, self.reference)
    }

    /// Whether the segments of two candidates cross when both sentences are
    /// drawn as parallel ordered lines
    #[must_use]
    pub fn crosses(&self, other: &Candidate) -> bool {
        (self.hyp < other.hyp && self.reference > other.reference)
            || (self.hyp > other.hyp && self.reference < other.reference)
    }
}

/// Weighted bipartite graph of candidate matches
#[derive(Debug, Clone, Default)]
pub struct CandidateGraph {
    /// Candidates in hypothesis-major, reference-minor order
    pub candidates: Vec<Candidate>,
}

impl CandidateGraph {
    /// Build the candidate graph of two preprocessed token sequences.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingSignatures` if any token lacks a
    /// signature for one of the given stages.
    pub fn build(
        hypothesis: &[Token],
        reference: &[Token],
        stages: &[Box<dyn Stage>],
    ) -> Result<Self, ValidationError> {
        validate_signatures_present(hypothesis, stages.len())?;
        validate_signatures_present(reference, stages.len())?;

        let mut candidates = Vec::new();
        for hyp_token in hypothesis {
            for ref_token in reference {
                let best = stages
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| hyp_token.agrees_with(ref_token, *i))
                    .map(|(_, stage)| stage.weight())
                    .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))));

                if let Some(weight) = best {
                    candidates.push(Candidate {
                        hyp: hyp_token.index,
                        reference: ref_token.index,
                        weight,
                    });
                }
            }
        }

        Ok(Self { candidates })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Index pairs of all candidates
    #[must_use]
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.candidates.iter().map(Candidate::pair).collect()
    }

    /// Weight of the candidate for `(hyp, reference)`, if there is one
    #[must_use]
    pub fn weight(&self, hyp: usize, reference: usize) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.hyp == hyp && c.reference == reference)
            .map(|c| c.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::tokens_from_words;
    use crate::core::types::Locale;
    use crate::linguistics;
    use crate::matching::stages::{default_stages, preprocess};

    fn graph(hyp: &str, reference: &str) -> CandidateGraph {
        linguistics::initialize();
        let stages = default_stages(Locale::German).unwrap();
        let mut hyp_tokens = tokens_from_words(hyp.split_whitespace());
        let mut ref_tokens = tokens_from_words(reference.split_whitespace());
        preprocess(&stages, &mut hyp_tokens).unwrap();
        preprocess(&stages, &mut ref_tokens).unwrap();
        CandidateGraph::build(&hyp_tokens, &ref_tokens, &stages).unwrap()
    }

    #[test]
    fn test_best_weight_wins() {
        let graph = graph("Frauen Frau", "Frau Frau");
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.weight(0, 0), Some(0.6));
        assert_eq!(graph.weight(0, 1), Some(0.6));
        assert_eq!(graph.weight(1, 0), Some(1.0));
        assert_eq!(graph.weight(1, 1), Some(1.0));
    }

    #[test]
    fn test_no_agreement_is_excluded() {
        assert!(graph("Haus Kind", "Frau Mann").is_empty());

        let partial = graph("Frau Mann", "Frau Frau");
        assert_eq!(partial.pairs(), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_missing_signatures_rejected() {
        linguistics::initialize();
        let stages = default_stages(Locale::German).unwrap();
        let tokens = tokens_from_words(["Haus"]);
        assert!(matches!(
            CandidateGraph::build(&tokens, &tokens, &stages),
            Err(ValidationError::MissingSignatures { .. })
        ));
    }

    #[test]
    fn test_crosses() {
        let a = Candidate { hyp: 0, reference: 2, weight: 1.0 };
        let b = Candidate { hyp: 1, reference: 1, weight: 1.0 };
        let c = Candidate { hyp: 2, reference: 3, weight: 1.0 };
        assert!(a.crosses(&b));
        assert!(b.crosses(&a));
        assert!(!a.crosses(&c));
        // Sharing an index is not a crossing
        let d = Candidate { hyp: 0, reference: 1, weight: 1.0 };
        assert!(!d.crosses(&b));
    }
}
