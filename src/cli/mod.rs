//! Command-line interface for meteor-align.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **score**: Score one hypothesis sentence against one reference
//! - **align**: Show the optimal token alignment of a sentence pair
//! - **corpus**: Macro-average scores over two sentence-per-line files
//!
//! ## Usage
//!
//! ```text
//! # Score a sentence pair
//! meteor-align score "Die Katze sitzt auf dem Dach." "Auf dem Dach sitzt die Katze."
//!
//! # Inspect the alignment as JSON
//! meteor-align align "Frau Frauen" "Frau Frau" --format json
//!
//! # Score a corpus
//! meteor-align corpus -H hypotheses.txt -r references.txt
//!
//! # English stemming with custom limits
//! meteor-align --locale english --config meteor.json corpus -H hyp.txt -r ref.txt
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::MeteorConfig;
use crate::core::types::Locale;
use crate::linguistics;
use crate::matching::meteor::Scorer;

pub mod align;
pub mod corpus;
pub mod score;

#[derive(Parser)]
#[command(name = "meteor-align")]
#[command(version)]
#[command(about = "Score sentence similarity with optimal METEOR alignments")]
#[command(
    long_about = "meteor-align scores a hypothesis sentence against a reference sentence.\n\nTokens are matched exactly and by stem, and the matching with the highest total weight and the fewest crossings is found by exact integer optimization. The score combines recall-weighted precision and recall with a fragmentation penalty."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Language for stemming and stopwords (overrides the config file)
    #[arg(short, long, global = true)]
    pub locale: Option<Locale>,

    /// JSON config file with stages and alignment limits
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a hypothesis sentence against a reference sentence
    Score(score::ScoreArgs),

    /// Show the alignment between two sentences
    Align(align::AlignArgs),

    /// Macro-average scores over a hypothesis and a reference file
    Corpus(corpus::CorpusArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the configuration and build a scorer from it
///
/// # Errors
///
/// Returns an error if the config file cannot be read or describes invalid
/// stages.
pub fn load_scorer(config: Option<&Path>, locale: Option<Locale>) -> anyhow::Result<Scorer> {
    let mut config = match config {
        Some(path) => MeteorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MeteorConfig::default(),
    };
    if let Some(locale) = locale {
        config.locale = locale;
    }

    linguistics::initialize();
    Ok(config.build_scorer()?)
}
