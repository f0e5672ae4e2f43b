//! Score command - score one sentence pair and show the score components.

use clap::Args;

use crate::cli::OutputFormat;
use crate::matching::meteor::{PairScore, Scorer};

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Hypothesis (candidate) sentence
    #[arg(required = true)]
    pub hypothesis: String,

    /// Reference sentence
    #[arg(required = true)]
    pub reference: String,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if the pair cannot be aligned.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ScoreArgs, format: OutputFormat, scorer: &Scorer) -> anyhow::Result<()> {
    let result = scorer.score_pair(&args.hypothesis, &args.reference)?;

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Tsv => print_tsv(&result),
    }

    Ok(())
}

fn print_text(result: &PairScore) {
    let score = &result.score;

    println!("\nMETEOR score: {:.4}", score.score);
    println!(
        "\n   Matches: {} of {} hypothesis / {} reference tokens",
        score.matches, score.hypothesis_len, score.reference_len
    );
    println!(
        "   Precision: {:.4}   Recall: {:.4}   F-mean: {:.4}",
        score.precision, score.recall, score.fmean
    );
    println!(
        "   Chunks: {}   Penalty: {:.4}",
        score.chunks, score.penalty
    );
    println!("   Alignment: {}", result.alignment.method);
}

fn print_json(result: &PairScore) -> anyhow::Result<()> {
    let score = &result.score;
    let output = serde_json::json!({
        "score": score.score,
        "matches": score.matches,
        "hypothesis_len": score.hypothesis_len,
        "reference_len": score.reference_len,
        "chunks": score.chunks,
        "precision": score.precision,
        "recall": score.recall,
        "fmean": score.fmean,
        "penalty": score.penalty,
        "method": result.alignment.method,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(result: &PairScore) {
    let score = &result.score;

    println!(
        "score\tmatches\thypothesis_len\treference_len\tchunks\tprecision\trecall\tfmean\tpenalty\tmethod"
    );
    println!(
        "{:.4}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{}",
        score.score,
        score.matches,
        score.hypothesis_len,
        score.reference_len,
        score.chunks,
        score.precision,
        score.recall,
        score.fmean,
        score.penalty,
        result.alignment.method,
    );
}
