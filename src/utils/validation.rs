//! Centralized validation and helper functions.

use crate::core::token::Token;

/// Default maximum number of candidate matches solved exactly for one pair.
///
/// Crossing variables grow quadratically with the candidate count, so this
/// bounds the size of a single alignment program.
pub const DEFAULT_MAX_CANDIDATES: usize = 300;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Unequal number of signatures after stage '{stage}': token {token} has {found}, expected {expected}"
    )]
    UnequalSignatures {
        stage: String,
        token: usize,
        expected: usize,
        found: usize,
    },
    #[error("Token {token} carries {found} signatures but {expected} stages were given")]
    MissingSignatures {
        token: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid stage weight {0}: must be in (0, 1]")]
    InvalidWeight(f64),
    #[error("No matching stages configured")]
    NoStages,
    #[error("Linguistic resources not initialized: call linguistics::initialize() first")]
    ResourcesNotInitialized,
}

/// Check that a stage weight lies in (0, 1].
///
/// # Examples
///
/// ```
/// use meteor_align::utils::validation::validate_weight;
///
/// assert!(validate_weight(1.0).is_ok());
/// assert!(validate_weight(0.6).is_ok());
/// assert!(validate_weight(0.0).is_err());
/// assert!(validate_weight(1.5).is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidWeight` for weights outside (0, 1] or NaN.
pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    if weight > 0.0 && weight <= 1.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidWeight(weight))
    }
}

/// Check that every token holds the same number of signatures.
///
/// # Errors
///
/// Returns `ValidationError::UnequalSignatures` naming the first token whose
/// count differs from the first token's.
pub fn validate_signature_counts(tokens: &[Token], stage: &str) -> Result<(), ValidationError> {
    let Some(first) = tokens.first() else {
        return Ok(());
    };
    let expected = first.signatures.len();

    match tokens.iter().find(|t| t.signatures.len() != expected) {
        Some(token) => Err(ValidationError::UnequalSignatures {
            stage: stage.to_string(),
            token: token.index,
            expected,
            found: token.signatures.len(),
        }),
        None => Ok(()),
    }
}

/// Check that every token carries a signature for each of `stage_count` stages.
///
/// # Errors
///
/// Returns `ValidationError::MissingSignatures` for the first token that
/// has fewer signatures than stages.
pub fn validate_signatures_present(
    tokens: &[Token],
    stage_count: usize,
) -> Result<(), ValidationError> {
    match tokens.iter().find(|t| t.signatures.len() < stage_count) {
        Some(token) => Err(ValidationError::MissingSignatures {
            token: token.index,
            expected: stage_count,
            found: token.signatures.len(),
        }),
        None => Ok(()),
    }
}

/// Check whether a candidate count exceeds the configured maximum.
///
/// Returns an error message if it does, None if the program may be built.
#[must_use]
pub fn check_candidate_limit(count: usize, max_candidates: usize) -> Option<String> {
    if count > max_candidates {
        Some(format!(
            "Too many candidate matches: {count} exceeds maximum of {max_candidates}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::Signature;

    fn token_with(index: usize, count: usize) -> Token {
        let mut token = Token::new(index, "x");
        token.signatures = vec![Signature::new("x"); count];
        token
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(f64::MIN_POSITIVE).is_ok());
        assert!(validate_weight(-0.1).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_signature_counts() {
        assert!(validate_signature_counts(&[], "identity").is_ok());

        let tokens = vec![token_with(0, 2), token_with(1, 2)];
        assert!(validate_signature_counts(&tokens, "identity").is_ok());

        let tokens = vec![token_with(0, 2), token_with(1, 1), token_with(2, 2)];
        match validate_signature_counts(&tokens, "broken") {
            Err(ValidationError::UnequalSignatures {
                stage,
                token,
                expected,
                found,
            }) => {
                assert_eq!(stage, "broken");
                assert_eq!(token, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected UnequalSignatures, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_signatures_present() {
        let tokens = vec![token_with(0, 2), token_with(1, 2)];
        assert!(validate_signatures_present(&tokens, 2).is_ok());
        assert!(matches!(
            validate_signatures_present(&tokens, 3),
            Err(ValidationError::MissingSignatures { token: 0, .. })
        ));
    }

    #[test]
    fn test_check_candidate_limit() {
        assert!(check_candidate_limit(10, 10).is_none());
        assert!(check_candidate_limit(11, 10).is_some());
    }
}
