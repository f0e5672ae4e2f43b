//! Reductions applied before the alignment program is built.
//!
//! Both reductions only remove assignments that no optimal alignment uses.
//!
//! **Swap cuts.** If `(h1, r2)` and `(h2, r1)` cross and `(h1, r1)`, `(h2, r2)`
//! are candidates too, trading the first pair for the second keeps every
//! token and clique count, removes their crossing and never adds one. When
//! the weight given up by the trade is less than one crossing, no optimum
//! selects both, and the pair gets `x_a + x_b <= 1` instead of a crossing
//! variable.
//!
//! **Ordered cliques.** In a complete clique where every crossing pair is
//! swap-cut, optimal matches inside the clique do not cross, so the i-th
//! matched hypothesis token takes the i-th matched reference token. With as
//! many hypothesis as reference tokens the clique is fixed outright;
//! otherwise each token keeps a band of `|#hyp - #ref| + 1` partners.
//! Repeated function words form exactly such cliques.

use std::collections::HashMap;

use crate::matching::candidates::Candidate;
use crate::matching::cliques::Clique;

/// Objective cost of one crossing pair
pub const CROSSING_PENALTY: f64 = 1.0;

const EPSILON: f64 = 1e-9;

/// Outcome of presolving a candidate graph
#[derive(Debug, Clone)]
pub struct Presolve {
    /// Candidate indices selected in every optimal alignment, ascending
    pub fixed: Vec<usize>,
    /// Whether each candidate is left to the solver
    pub open: Vec<bool>,
    weights: HashMap<(usize, usize), f64>,
}

impl Presolve {
    #[must_use]
    pub fn new(candidates: &[Candidate], cliques: &[Clique]) -> Self {
        let index: HashMap<(usize, usize), usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.pair(), i))
            .collect();
        let mut presolve = Self {
            fixed: Vec::new(),
            open: vec![true; candidates.len()],
            weights: candidates.iter().map(|c| (c.pair(), c.weight)).collect(),
        };

        for clique in cliques {
            let hyps: Vec<usize> = clique.hyp_nodes().into_iter().collect();
            let refs: Vec<usize> = clique.ref_nodes().into_iter().collect();
            if !clique.is_complete() || !presolve.uncrossable(&hyps, &refs) {
                continue;
            }

            let slack = hyps.len().abs_diff(refs.len());
            for (i, &h) in hyps.iter().enumerate() {
                for (j, &r) in refs.iter().enumerate() {
                    let Some(&candidate) = index.get(&(h, r)) else {
                        continue;
                    };
                    let in_band = if hyps.len() <= refs.len() {
                        i <= j && j <= i + slack
                    } else {
                        j <= i && i <= j + slack
                    };
                    if !in_band || slack == 0 {
                        presolve.open[candidate] = false;
                    }
                    if in_band && slack == 0 {
                        presolve.fixed.push(candidate);
                    }
                }
            }
        }

        presolve.fixed.sort_unstable();
        presolve
    }

    /// Whether two crossing candidates are never selected together
    #[must_use]
    pub fn swap_cut(&self, a: &Candidate, b: &Candidate) -> bool {
        let (first, second) = if a.hyp < b.hyp { (a, b) } else { (b, a) };
        self.swap_gain(first.hyp, second.hyp, second.reference, first.reference)
            .is_some_and(|gain| gain > EPSILON)
    }

    /// Objective gained by replacing `(h1, r2), (h2, r1)` with
    /// `(h1, r1), (h2, r2)`, if all four are candidates
    fn swap_gain(&self, h1: usize, h2: usize, r1: usize, r2: usize) -> Option<f64> {
        let kept = self.weights.get(&(h1, r1))? + self.weights.get(&(h2, r2))?;
        let crossed = self.weights.get(&(h1, r2))? + self.weights.get(&(h2, r1))?;
        Some(kept + CROSSING_PENALTY - crossed)
    }

    /// Every crossing pair inside the block `hyps x refs` is swap-cut
    fn uncrossable(&self, hyps: &[usize], refs: &[usize]) -> bool {
        hyps.iter().enumerate().all(|(i, &h1)| {
            hyps[i + 1..].iter().all(|&h2| {
                refs.iter().enumerate().all(|(j, &r1)| {
                    refs[j + 1..].iter().all(|&r2| {
                        self.swap_gain(h1, h2, r1, r2)
                            .is_some_and(|gain| gain > EPSILON)
                    })
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::cliques::compute_cliques;

    fn candidates(cells: &[(usize, usize, f64)]) -> Vec<Candidate> {
        cells
            .iter()
            .map(|&(hyp, reference, weight)| Candidate {
                hyp,
                reference,
                weight,
            })
            .collect()
    }

    fn presolve(cells: &[(usize, usize, f64)]) -> (Vec<Candidate>, Presolve) {
        let candidates = candidates(cells);
        let pairs: Vec<(usize, usize)> = candidates.iter().map(Candidate::pair).collect();
        let presolve = Presolve::new(&candidates, &compute_cliques(&pairs));
        (candidates, presolve)
    }

    fn fixed_pairs(candidates: &[Candidate], presolve: &Presolve) -> Vec<(usize, usize)> {
        presolve.fixed.iter().map(|&i| candidates[i].pair()).collect()
    }

    #[test]
    fn test_square_block_is_fixed_in_order() {
        // Three occurrences of the same word on both sides, interleaved with
        // other tokens
        let mut cells = Vec::new();
        for h in [0, 3, 5] {
            for r in [1, 2, 6] {
                cells.push((h, r, 1.0));
            }
        }
        let (candidates, presolve) = presolve(&cells);
        assert_eq!(
            fixed_pairs(&candidates, &presolve),
            vec![(0, 1), (3, 2), (5, 6)]
        );
        assert!(presolve.open.iter().all(|open| !open));
    }

    #[test]
    fn test_uneven_block_keeps_a_band() {
        // Two hypothesis tokens, three reference tokens: slack of one
        let mut cells = Vec::new();
        for h in [0, 1] {
            for r in [0, 1, 2] {
                cells.push((h, r, 1.0));
            }
        }
        let (candidates, presolve) = presolve(&cells);
        assert!(presolve.fixed.is_empty());
        let open: Vec<(usize, usize)> = candidates
            .iter()
            .zip(&presolve.open)
            .filter(|(_, open)| **open)
            .map(|(c, _)| c.pair())
            .collect();
        assert_eq!(open, vec![(0, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_stem_weights_still_ordered() {
        // Frauen Frau vs Frau Frau: the trade loses no weight
        let (candidates, presolve) =
            presolve(&[(0, 0, 0.6), (0, 1, 0.6), (1, 0, 1.0), (1, 1, 1.0)]);
        assert_eq!(fixed_pairs(&candidates, &presolve), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_costly_trade_is_not_cut() {
        // Keeping the crossing pair is worth 2.0, the trade only 0.2 + 1
        let (candidates, presolve) =
            presolve(&[(0, 0, 0.1), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 0.1)]);
        assert!(presolve.fixed.is_empty());
        assert!(presolve.open.iter().all(|open| *open));
        assert!(!presolve.swap_cut(&candidates[1], &candidates[2]));
    }

    #[test]
    fn test_incomplete_clique_is_left_open() {
        // (0,0) is missing, so (0,1) and (1,0) have no trade
        let (candidates, presolve) = presolve(&[(0, 1, 1.0), (1, 0, 1.0), (1, 1, 0.6)]);
        assert!(presolve.fixed.is_empty());
        assert!(presolve.open.iter().all(|open| *open));
        assert!(!presolve.swap_cut(&candidates[0], &candidates[1]));
    }

    #[test]
    fn test_swap_cut_is_symmetric() {
        let (candidates, presolve) =
            presolve(&[(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0)]);
        assert!(presolve.swap_cut(&candidates[1], &candidates[2]));
        assert!(presolve.swap_cut(&candidates[2], &candidates[1]));
    }
}
