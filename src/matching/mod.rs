//! Token alignment and METEOR scoring.
//!
//! This module provides the core functionality:
//!
//! - [`stages`]: matching stages and the signature pipeline
//! - [`candidates`]: the weighted candidate graph between two sentences
//! - [`cliques`]: connected components of the candidate graph
//! - [`presolve`]: reductions no optimal alignment is affected by
//! - [`engine`]: the [`AlignmentEngine`](engine::AlignmentEngine)
//! - [`chunks`]: chunk counting
//! - [`scoring`]: score composition and macro-averaging
//! - [`meteor`]: the [`Scorer`](meteor::Scorer) tying everything together
//!
//! ## Alignment Algorithm
//!
//! 1. **Signatures**: every stage appends a signature to every token
//! 2. **Candidates**: token pairs agreeing under at least one stage, weighted
//!    by the best agreeing stage
//! 3. **Cliques**: connected components bound how many matches a maximum
//!    matching contains
//! 4. **Presolve**: cliques of interchangeable tokens are matched in order,
//!    and crossing pairs that a trade of partners would improve are excluded
//! 5. **Binary program**: maximize total match weight minus the number of
//!    crossing match pairs, subject to one match per token and a maximum
//!    matching per clique
//!
//! ## Scoring
//!
//! - **Precision / recall**: matches over hypothesis / reference length
//! - **F-mean**: `10PR / (R + 9P)`
//! - **Penalty**: `0.5 * (chunks / matches)^3` when there is more than one chunk
//! - **Score**: `fmean * (1 - penalty)`
//!
//! ## Example
//!
//! ```rust
//! use meteor_align::core::types::Locale;
//! use meteor_align::linguistics;
//! use meteor_align::matching::meteor::Scorer;
//!
//! linguistics::initialize();
//! let scorer = Scorer::with_defaults(Locale::German).unwrap();
//! let result = scorer
//!     .score_pair("Die Katze sitzt auf dem Dach.", "Auf dem Dach sitzt die Katze.")
//!     .unwrap();
//!
//! assert_eq!(result.score.chunks, 4);
//! assert!((result.score.score - 0.91).abs() < 0.005);
//! ```

pub mod candidates;
pub mod chunks;
pub mod cliques;
pub mod engine;
pub mod meteor;
pub mod presolve;
pub mod scoring;
pub mod stages;

pub use stages::{IdentityStage, Stage, StemmingStage};
