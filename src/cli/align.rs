//! Align command - show which tokens of a sentence pair are matched.

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::token::Token;
use crate::matching::meteor::{PairScore, Scorer};

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// Hypothesis (candidate) sentence
    #[arg(required = true)]
    pub hypothesis: String,

    /// Reference sentence
    #[arg(required = true)]
    pub reference: String,

    /// Also list unmatched tokens
    #[arg(long)]
    pub show_unmatched: bool,
}

/// Execute the align command
///
/// # Errors
///
/// Returns an error if the pair cannot be aligned.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AlignArgs, format: OutputFormat, scorer: &Scorer) -> anyhow::Result<()> {
    let result = scorer.score_pair(&args.hypothesis, &args.reference)?;

    match format {
        OutputFormat::Text => print_text(&result, args.show_unmatched),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Tsv => print_tsv(&result),
    }

    Ok(())
}

fn token_text(tokens: &[Token], index: usize) -> &str {
    tokens.get(index).map_or("", |t| t.text.as_str())
}

fn unmatched<'a>(tokens: &'a [Token], matched: impl Fn(usize) -> bool) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|t| !matched(t.index))
        .map(|t| t.text.as_str())
        .collect()
}

fn print_text(result: &PairScore, show_unmatched: bool) {
    let pairs = &result.alignment.pairs;

    println!(
        "\nAlignment ({}): {} matches in {} chunks",
        result.alignment.method,
        pairs.len(),
        result.score.chunks
    );

    if pairs.is_empty() {
        println!("\n   No tokens matched.");
    } else {
        println!();
        for &(h, r) in pairs {
            println!(
                "   {h:>3} {:<20} -> {r:>3} {}",
                token_text(&result.hypothesis, h),
                token_text(&result.reference, r)
            );
        }
    }

    if show_unmatched {
        let hyp_unmatched = unmatched(&result.hypothesis, |i| pairs.iter().any(|p| p.0 == i));
        let ref_unmatched = unmatched(&result.reference, |i| pairs.iter().any(|p| p.1 == i));
        println!("\n   Unmatched hypothesis tokens: {}", hyp_unmatched.join(" "));
        println!("   Unmatched reference tokens: {}", ref_unmatched.join(" "));
    }
}

fn print_json(result: &PairScore) -> anyhow::Result<()> {
    let pairs: Vec<serde_json::Value> = result
        .alignment
        .pairs
        .iter()
        .map(|&(h, r)| {
            serde_json::json!({
                "hypothesis": h,
                "reference": r,
                "hypothesis_text": token_text(&result.hypothesis, h),
                "reference_text": token_text(&result.reference, r),
            })
        })
        .collect();

    let output = serde_json::json!({
        "hypothesis": result.hypothesis.iter().map(|t| &t.text).collect::<Vec<_>>(),
        "reference": result.reference.iter().map(|t| &t.text).collect::<Vec<_>>(),
        "pairs": pairs,
        "chunks": result.score.chunks,
        "method": result.alignment.method,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(result: &PairScore) {
    println!("hyp_index\thyp_text\tref_index\tref_text");
    for &(h, r) in &result.alignment.pairs {
        println!(
            "{}\t{}\t{}\t{}",
            h,
            token_text(&result.hypothesis, h),
            r,
            token_text(&result.reference, r)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::tokens_from_words;

    #[test]
    fn test_token_text() {
        let tokens = tokens_from_words(["Frau", "Mann"]);
        assert_eq!(token_text(&tokens, 1), "Mann");
        assert_eq!(token_text(&tokens, 5), "");
    }

    #[test]
    fn test_unmatched() {
        let tokens = tokens_from_words(["Haus", "Kind", "Frau"]);
        let pairs = [(2, 0)];
        let rest = unmatched(&tokens, |i| pairs.iter().any(|p| p.0 == i));
        assert_eq!(rest, vec!["Haus", "Kind"]);
    }
}
