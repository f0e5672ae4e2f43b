//! # meteor-align
//!
//! A library for scoring sentence similarity with METEOR-style alignments.
//!
//! METEOR compares a hypothesis sentence with a reference sentence by
//! aligning their tokens, then combines precision and recall of the aligned
//! tokens with a penalty for fragmented alignments. The quality of the score
//! depends on the alignment: a greedy matcher can pick a matching with more
//! crossings than necessary, or miss matches altogether when a token has
//! several equally good partners.
//!
//! `meteor-align` instead finds the alignment exactly, by solving a small
//! 0-1 integer program per sentence pair.
//!
//! ## Features
//!
//! - **Matching stages**: exact and stem matching with configurable weights
//! - **Optimal alignment**: maximum match weight, then fewest crossings
//! - **Bounded search**: candidate, node and time limits with an
//!   approximate fallback
//! - **Corpus scoring**: parallel per-pair scoring and macro-averaging
//! - **Locales**: German and English stemming and stopwords
//!
//! ## Example
//!
//! ```rust
//! use meteor_align::{linguistics, Locale, Scorer};
//!
//! // Load stopword lists once per process
//! linguistics::initialize();
//!
//! let scorer = Scorer::with_defaults(Locale::German).unwrap();
//! let result = scorer.score_pair("Frau Frauen", "Frau Frau").unwrap();
//!
//! assert_eq!(result.alignment.pairs, vec![(0, 0), (1, 1)]);
//! assert!((result.score.score - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Tokens, signatures and shared enums
//! - [`linguistics`]: Tokenization, stopwords and resource initialization
//! - [`matching`]: Stages, alignment engine and scoring
//! - [`solver`]: Exact 0-1 integer programming backend
//! - [`parsing`]: Corpus file readers
//! - [`config`]: JSON configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod linguistics;
pub mod matching;
pub mod parsing;
pub mod solver;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::MeteorConfig;
pub use core::token::{Signature, Token};
pub use core::types::*;
pub use matching::engine::{align, Alignment, AlignmentConfig, AlignmentEngine, FallbackPolicy};
pub use matching::meteor::{score_pair, CorpusScore, PairScore, Scorer};
pub use matching::scoring::{macro_average, MeteorScore, ScoreError};
pub use matching::stages::{IdentityStage, Stage, StemmingStage};
pub use linguistics::Tokenizer;
pub use solver::SolverBackend;
