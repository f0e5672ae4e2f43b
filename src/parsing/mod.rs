//! Parsers for corpus input files.
//!
//! Corpora are plain UTF-8 text with one sentence per line. A hypothesis
//! file and a reference file are paired line by line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meteor_align::parsing::corpus::read_parallel;
//! use std::path::Path;
//!
//! let (hypotheses, references) =
//!     read_parallel(Path::new("hyp.txt"), Path::new("ref.txt")).unwrap();
//! assert_eq!(hypotheses.len(), references.len());
//! ```

pub mod corpus;
