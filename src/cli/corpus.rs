//! Corpus command - macro-average scores over two sentence-per-line files.

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::matching::meteor::{CorpusScore, Scorer};
use crate::parsing::corpus::read_parallel;

/// Arguments for the corpus command
#[derive(Args)]
pub struct CorpusArgs {
    /// File with one hypothesis sentence per line
    #[arg(short = 'H', long, required = true)]
    pub hypotheses: PathBuf,

    /// File with one reference sentence per line
    #[arg(short, long, required = true)]
    pub references: PathBuf,

    /// Also print the score of every pair
    #[arg(long)]
    pub per_pair: bool,
}

/// Execute the corpus command
///
/// # Errors
///
/// Returns an error if the files cannot be read, differ in sentence count,
/// are empty, or a pair cannot be aligned.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: CorpusArgs, format: OutputFormat, scorer: &Scorer) -> anyhow::Result<()> {
    let (hypotheses, references) = read_parallel(&args.hypotheses, &args.references)?;
    info!(
        pairs = hypotheses.len(),
        locale = %scorer.locale(),
        "scoring corpus"
    );

    let corpus = scorer.score_corpus(&hypotheses, &references)?;
    if corpus.approximate_pairs > 0 {
        warn!(
            "{} of {} pairs were aligned approximately",
            corpus.approximate_pairs,
            corpus.scores.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&corpus, args.per_pair),
        OutputFormat::Json => print_json(&corpus)?,
        OutputFormat::Tsv => print_tsv(&corpus),
    }

    Ok(())
}

fn print_text(corpus: &CorpusScore, per_pair: bool) {
    if per_pair {
        for (i, score) in corpus.scores.iter().enumerate() {
            println!("{}\t{score:.4}", i + 1);
        }
    }
    println!("METEOR macro average: {:.3}", corpus.macro_average);
}

fn print_json(corpus: &CorpusScore) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "pairs": corpus.scores.len(),
        "macro_average": corpus.macro_average,
        "approximate_pairs": corpus.approximate_pairs,
        "scores": corpus.scores,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(corpus: &CorpusScore) {
    println!("pair\tscore");
    for (i, score) in corpus.scores.iter().enumerate() {
        println!("{}\t{score:.4}", i + 1);
    }
    println!("macro_average\t{:.4}", corpus.macro_average);
}
