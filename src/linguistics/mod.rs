//! Default linguistic collaborators: tokenization and stemming resources.
//!
//! Stemming needs per-locale stopword lists. They are loaded once per
//! process by an explicit call to [`initialize`], which the host application
//! makes before building a [`StemmingStage`](crate::matching::stages::StemmingStage).
//! Calling it again is a no-op.
//!
//! ```rust
//! use meteor_align::linguistics;
//! use meteor_align::core::types::Locale;
//!
//! let resources = linguistics::initialize();
//! assert!(resources.is_stopword(Locale::German, "und"));
//! ```

pub mod stopwords;
pub mod tokenizer;

use std::collections::{HashMap, HashSet};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::core::types::Locale;

pub use tokenizer::{tokenize, Tokenizer, WordTokenizer};

static RESOURCES: OnceCell<LinguisticResources> = OnceCell::new();

/// Read-only per-locale data shared by all stages
#[derive(Debug)]
pub struct LinguisticResources {
    stopwords: HashMap<Locale, HashSet<&'static str>>,
}

impl LinguisticResources {
    fn load() -> Self {
        let stopwords: HashMap<Locale, HashSet<&'static str>> = Locale::ALL
            .iter()
            .map(|&locale| (locale, stopwords::for_locale(locale).iter().copied().collect()))
            .collect();

        for (locale, words) in &stopwords {
            debug!(%locale, count = words.len(), "loaded stopwords");
        }

        Self { stopwords }
    }

    /// Whether `word` (already lowercased) is a stopword in `locale`
    #[must_use]
    pub fn is_stopword(&self, locale: Locale, word: &str) -> bool {
        self.stopwords
            .get(&locale)
            .is_some_and(|words| words.contains(word))
    }
}

/// Load linguistic resources for every supported locale.
///
/// Idempotent: later calls return the already loaded resources.
pub fn initialize() -> &'static LinguisticResources {
    RESOURCES.get_or_init(LinguisticResources::load)
}

/// Resources loaded by [`initialize`], or `None` before the first call
pub fn resources() -> Option<&'static LinguisticResources> {
    RESOURCES.get()
}
