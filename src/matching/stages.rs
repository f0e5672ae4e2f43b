//! Matching stages and the signature pipeline.
//!
//! A stage turns token text into a [`Signature`]. Stages are applied in order
//! and each appends one signature to every token of a sentence; two tokens
//! can be aligned when any stage gives them equal signatures.

use rust_stemmers::Stemmer;
use tracing::trace;

use crate::core::token::{Signature, Token};
use crate::core::types::Locale;
use crate::linguistics::{self, LinguisticResources};
use crate::utils::validation::{validate_signature_counts, validate_weight, ValidationError};

/// Default weight of the exact-match stage
pub const DEFAULT_IDENTITY_WEIGHT: f64 = 1.0;

/// Default weight of the stemming stage
pub const DEFAULT_STEMMING_WEIGHT: f64 = 0.6;

/// A token matching strategy
pub trait Stage: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Weight in (0, 1] of a match found by this stage
    fn weight(&self) -> f64;

    /// Signature of a single token text
    fn signature(&self, text: &str) -> Signature;

    /// Append this stage's signature to every token
    fn process_tokens(&self, tokens: &mut [Token]) {
        for token in tokens.iter_mut() {
            let signature = self.signature(&token.text);
            token.signatures.push(signature);
        }
    }
}

/// Exact matching of token text
#[derive(Debug, Clone)]
pub struct IdentityStage {
    weight: f64,
}

impl IdentityStage {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidWeight` if `weight` is not in (0, 1].
    pub fn new(weight: f64) -> Result<Self, ValidationError> {
        validate_weight(weight)?;
        Ok(Self { weight })
    }
}

impl Stage for IdentityStage {
    fn name(&self) -> &str {
        "identity"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn signature(&self, text: &str) -> Signature {
        Signature::new(text)
    }
}

/// Matching of lowercased Snowball stems. Stopwords are lowercased only.
pub struct StemmingStage {
    weight: f64,
    locale: Locale,
    stemmer: Stemmer,
    resources: &'static LinguisticResources,
}

impl std::fmt::Debug for StemmingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemmingStage")
            .field("weight", &self.weight)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl StemmingStage {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidWeight` if `weight` is not in (0, 1],
    /// or `ValidationError::ResourcesNotInitialized` if
    /// [`linguistics::initialize`] has not been called yet.
    pub fn new(weight: f64, locale: Locale) -> Result<Self, ValidationError> {
        validate_weight(weight)?;
        let resources = linguistics::resources().ok_or(ValidationError::ResourcesNotInitialized)?;

        Ok(Self {
            weight,
            locale,
            stemmer: Stemmer::create(locale.stemmer_algorithm()),
            resources,
        })
    }
}

impl Stage for StemmingStage {
    fn name(&self) -> &str {
        "stemming"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn signature(&self, text: &str) -> Signature {
        let lowered = text.to_lowercase();
        if self.resources.is_stopword(self.locale, &lowered) {
            return Signature(lowered);
        }
        Signature(self.stemmer.stem(&lowered).into_owned())
    }
}

/// The stages used when nothing else is configured: exact match (1.0)
/// followed by stemming (0.6).
///
/// # Errors
///
/// Returns `ValidationError::ResourcesNotInitialized` if
/// [`linguistics::initialize`] has not been called yet.
pub fn default_stages(locale: Locale) -> Result<Vec<Box<dyn Stage>>, ValidationError> {
    Ok(vec![
        Box::new(IdentityStage::new(DEFAULT_IDENTITY_WEIGHT)?),
        Box::new(StemmingStage::new(DEFAULT_STEMMING_WEIGHT, locale)?),
    ])
}

/// Apply every stage in order, appending one signature per stage to each token.
///
/// # Errors
///
/// Returns `ValidationError::UnequalSignatures` as soon as a stage leaves the
/// tokens with diverging signature counts.
pub fn preprocess(stages: &[Box<dyn Stage>], tokens: &mut [Token]) -> Result<(), ValidationError> {
    for stage in stages {
        stage.process_tokens(tokens);
        validate_signature_counts(tokens, stage.name())?;
        trace!(stage = stage.name(), tokens = tokens.len(), "applied stage");
    }
    Ok(())
}
