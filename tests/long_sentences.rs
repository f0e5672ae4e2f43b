//! Realistic-length English sentence pairs with repeated function words.

use meteor_align::linguistics;
use meteor_align::matching::engine::AlignmentError;
use meteor_align::matching::stages::default_stages;
use meteor_align::{
    AlignmentConfig, AlignmentEngine, AlignmentMethod, FallbackPolicy, Locale, ScoreError, Scorer,
};

const CLAUSES: &str = "the cat and the dog and the bird sat on the mat , and the man , \
                       the woman and the child saw the cat , the dog and the bird .";

const CLAUSES_SWAPPED: &str = "the man , the woman and the child saw the cat , the dog and \
                               the bird , and the cat and the dog and the bird sat on the mat .";

const CLAUSES_SWAPPED_LONGER: &str = "the man , the woman and the child saw the cat , the dog \
                                      and the bird , and the cat and the dog and the bird sat \
                                      on the old mat by the door .";

const CLINICAL: &str = "The patient was admitted due to type 2 diabetes mellitus, and began to \
                        receive subcutaneous injection of liraglutide injection (0.6 mg/day) at \
                        9: 00 on 09-Jun-2020.";

const CLINICAL_REFERENCE: &str = "The patient was admitted to hospital for type 2 diabetes \
                                  mellitus, and liraglutide injection (0.6 mg/day) was \
                                  administered subcutaneously at 9 o 'clock on June 9th, 2020.";

fn english_scorer(config: AlignmentConfig) -> Scorer {
    linguistics::initialize();
    Scorer::new(
        Locale::English,
        default_stages(Locale::English).unwrap(),
        AlignmentEngine::new(config),
    )
    .unwrap()
}

fn time_limited(fallback: FallbackPolicy) -> AlignmentConfig {
    AlignmentConfig {
        max_nodes: None,
        time_limit_ms: Some(0),
        fallback,
        ..AlignmentConfig::default()
    }
}

#[test]
fn test_swapped_clauses_align_exactly() {
    let result = english_scorer(AlignmentConfig::default())
        .score_pair(CLAUSES, CLAUSES_SWAPPED)
        .unwrap();

    assert_eq!(result.hypothesis.len(), 32);
    assert_eq!(result.reference.len(), 32);
    assert_eq!(result.alignment.method, AlignmentMethod::Exact);
    assert_eq!(result.score.matches, 32);
    assert!((0.0..=1.0).contains(&result.score.score));

    // Repeated words keep their relative order
    let hyp_the: Vec<usize> = result
        .hypothesis
        .iter()
        .filter(|t| t.text == "the")
        .map(|t| t.index)
        .collect();
    let partners: Vec<usize> = result
        .alignment
        .pairs
        .iter()
        .filter(|(h, _)| hyp_the.contains(h))
        .map(|&(_, r)| r)
        .collect();
    assert_eq!(partners.len(), 10);
    assert!(partners.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_swapped_clauses_need_no_search() {
    // Every clique is decided before the solver runs, so a zero time budget
    // still yields the exact alignment
    let scorer = english_scorer(time_limited(FallbackPolicy::Reject));
    let result = scorer.score_pair(CLAUSES, CLAUSES_SWAPPED).unwrap();
    assert_eq!(result.alignment.method, AlignmentMethod::Exact);
    assert_eq!(result.score.matches, 32);
}

#[test]
fn test_swapped_clauses_with_extra_words_align_exactly() {
    // One more "the" in the reference: the solver picks which one stays free
    let result = english_scorer(AlignmentConfig::default())
        .score_pair(CLAUSES, CLAUSES_SWAPPED_LONGER)
        .unwrap();

    assert_eq!(result.reference.len(), 36);
    assert_eq!(result.alignment.method, AlignmentMethod::Exact);
    assert_eq!(result.score.matches, 32);
    assert!((0.0..=1.0).contains(&result.score.score));
}

#[test]
fn test_clinical_sentence_regression() {
    let result = english_scorer(AlignmentConfig::default())
        .score_pair(CLINICAL, CLINICAL_REFERENCE)
        .unwrap();

    assert_eq!(result.alignment.method, AlignmentMethod::Exact);
    let score = result.score.score;
    assert!((0.6..=0.8).contains(&score), "score was {score}");
}

#[test]
fn test_time_limit_through_scorer() {
    // "the" and "and" occur more often in the reference, so the solver runs
    let hypothesis = "the cat and the dog";
    let reference = "the dog and the cat and the bird";

    let exact = english_scorer(AlignmentConfig::default())
        .score_pair(hypothesis, reference)
        .unwrap();
    assert_eq!(exact.alignment.method, AlignmentMethod::Exact);
    assert_eq!(exact.score.matches, 5);

    let approximate = english_scorer(time_limited(FallbackPolicy::Approximate))
        .score_pair(hypothesis, reference)
        .unwrap();
    assert_eq!(approximate.alignment.method, AlignmentMethod::Approximate);
    assert_eq!(approximate.score.matches, 5);
    assert!((0.0..=1.0).contains(&approximate.score.score));

    let rejected = english_scorer(time_limited(FallbackPolicy::Reject))
        .score_pair(hypothesis, reference);
    assert!(matches!(
        rejected,
        Err(ScoreError::Alignment(AlignmentError::BudgetExhausted { .. }))
    ));
}

#[test]
fn test_corpus_counts_approximate_pairs() {
    let scorer = english_scorer(time_limited(FallbackPolicy::Approximate));
    let corpus = scorer
        .score_corpus(
            &[CLAUSES, "the cat and the dog"],
            &[CLAUSES_SWAPPED, "the dog and the cat and the bird"],
        )
        .unwrap();
    assert_eq!(corpus.scores.len(), 2);
    assert_eq!(corpus.approximate_pairs, 1);
}
