use serde::{Deserialize, Serialize};

/// Supported languages.
///
/// The locale selects the Snowball stemming algorithm and the stopword list
/// used by the stemming stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    German,
    English,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::German, Locale::English];

    #[must_use]
    pub fn stemmer_algorithm(self) -> rust_stemmers::Algorithm {
        match self {
            Self::German => rust_stemmers::Algorithm::German,
            Self::English => rust_stemmers::Algorithm::English,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::German => write!(f, "german"),
            Self::English => write!(f, "english"),
        }
    }
}

/// How an alignment was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMethod {
    /// Globally optimal solution of the alignment program
    Exact,
    /// Fallback result after a candidate or search limit was hit
    Approximate,
}

impl std::fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Approximate => write!(f, "approximate"),
        }
    }
}
