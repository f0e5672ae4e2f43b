//! Core data types for sentence alignment and scoring.
//!
//! - [`Token`](token::Token): a word of a sentence with its position and per-stage signatures
//! - [`Signature`](token::Signature): the comparable representation a matching stage assigns to a token
//! - [`Locale`](types::Locale): the supported languages, selecting tokenizer and stemmer resources
//! - [`AlignmentMethod`](types::AlignmentMethod): whether an alignment is proven optimal or approximate
//!
//! ## Signatures
//!
//! Every matching stage appends exactly one signature to every token, so the
//! i-th signature of any token was produced by the i-th stage:
//!
//! | Stage     | "Frauen" | "Frau" |
//! |-----------|----------|--------|
//! | identity  | Frauen   | Frau   |
//! | stemming  | frau     | frau   |

pub mod token;
pub mod types;
