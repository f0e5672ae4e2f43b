use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::engine::AlignmentError;
use crate::utils::validation::ValidationError;

/// Recall counts this many times more than precision in the F-mean
pub const RECALL_WEIGHT: f64 = 9.0;

/// Scale of the fragmentation penalty
pub const PENALTY_GAMMA: f64 = 0.5;

/// Exponent of the fragmentation penalty
pub const PENALTY_BETA: i32 = 3;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Cannot average an empty corpus")]
    EmptyCorpus,

    #[error("Corpus length mismatch: {hypotheses} hypotheses but {references} references")]
    LengthMismatch {
        hypotheses: usize,
        references: usize,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Safely convert usize to f64 for ratio calculations
///
/// Token and match counts are far below the range where f64 loses integer
/// precision.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Score of one sentence pair with all of its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeteorScore {
    /// Number of aligned token pairs
    pub matches: usize,

    /// Hypothesis length in tokens
    pub hypothesis_len: usize,

    /// Reference length in tokens
    pub reference_len: usize,

    /// Number of contiguous aligned runs
    pub chunks: usize,

    /// matches / hypothesis length
    pub precision: f64,

    /// matches / reference length
    pub recall: f64,

    /// Harmonic mean weighting recall nine times precision
    pub fmean: f64,

    /// Fragmentation penalty in [0, 0.5]
    pub penalty: f64,

    /// Final score in [0, 1]
    pub score: f64,
}

impl MeteorScore {
    /// Combine match count, sentence lengths and chunk count into a score.
    ///
    /// Two empty sentences are identical (1.0); one empty sentence against a
    /// non-empty one is maximally dissimilar (0.0), as is a pair without any
    /// match.
    #[must_use]
    pub fn compose(matches: usize, hypothesis_len: usize, reference_len: usize, chunks: usize) -> Self {
        let mut result = Self {
            matches,
            hypothesis_len,
            reference_len,
            chunks,
            precision: 0.0,
            recall: 0.0,
            fmean: 0.0,
            penalty: 0.0,
            score: 0.0,
        };

        if hypothesis_len == 0 || reference_len == 0 {
            if hypothesis_len == reference_len {
                result.precision = 1.0;
                result.recall = 1.0;
                result.fmean = 1.0;
                result.score = 1.0;
            }
            return result;
        }
        if matches == 0 {
            return result;
        }

        let m = count_to_f64(matches);
        let precision = m / count_to_f64(hypothesis_len);
        let recall = m / count_to_f64(reference_len);
        let fmean = (10.0 * precision * recall) / (recall + RECALL_WEIGHT * precision);

        let penalty = if chunks > 1 {
            PENALTY_GAMMA * (count_to_f64(chunks) / m).powi(PENALTY_BETA)
        } else {
            0.0
        };

        result.precision = precision;
        result.recall = recall;
        result.fmean = fmean;
        result.penalty = penalty;
        result.score = fmean * (1.0 - penalty);
        result
    }
}

/// Unweighted arithmetic mean of per-pair scores
///
/// # Errors
///
/// Returns `ScoreError::EmptyCorpus` if `scores` is empty.
pub fn macro_average(scores: &[f64]) -> Result<f64, ScoreError> {
    if scores.is_empty() {
        return Err(ScoreError::EmptyCorpus);
    }
    Ok(scores.iter().sum::<f64>() / count_to_f64(scores.len()))
}
