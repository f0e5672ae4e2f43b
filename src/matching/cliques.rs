//! Connected components of the candidate graph.
//!
//! Two candidates belong to the same clique when a chain of candidates, each
//! sharing a hypothesis or reference index with the next, connects them.
//! Cliques never share a token, so a maximum matching of the whole graph is
//! the union of maximum matchings of its cliques.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::maximum_matching;
use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;

/// A maximal connected set of candidate matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clique {
    /// Distinct (hyp, ref) pairs in input order
    pub matches: Vec<(usize, usize)>,
}

impl Clique {
    #[must_use]
    pub fn hyp_nodes(&self) -> BTreeSet<usize> {
        self.matches.iter().map(|&(h, _)| h).collect()
    }

    #[must_use]
    pub fn ref_nodes(&self) -> BTreeSet<usize> {
        self.matches.iter().map(|&(_, r)| r).collect()
    }

    /// `min(distinct hyp indices, distinct ref indices)`: the number of
    /// matches a maximum matching selects from this clique
    #[must_use]
    pub fn required_matches(&self) -> usize {
        self.hyp_nodes().len().min(self.ref_nodes().len())
    }

    /// Whether every hypothesis token of the clique can match every
    /// reference token of it
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matches.len() == self.hyp_nodes().len() * self.ref_nodes().len()
    }

    /// Size of a maximum matching of this clique.
    ///
    /// Equal to [`required_matches`](Self::required_matches) whenever the
    /// clique is complete, which is the case for stages that compare
    /// signatures for equality and refine each other.
    #[must_use]
    pub fn maximum_matching(&self) -> usize {
        let mut graph: UnGraph<(), ()> = UnGraph::default();
        let mut hyp_nodes = HashMap::new();
        let mut ref_nodes = HashMap::new();
        for &(h, r) in &self.matches {
            let a = *hyp_nodes.entry(h).or_insert_with(|| graph.add_node(()));
            let b = *ref_nodes.entry(r).or_insert_with(|| graph.add_node(()));
            graph.add_edge(a, b, ());
        }
        maximum_matching(&graph).len()
    }
}

/// Partition candidate matches into cliques.
///
/// Cliques are ordered by their first member; members keep input order.
#[must_use]
pub fn compute_cliques(matches: &[(usize, usize)]) -> Vec<Clique> {
    let mut sets: UnionFind<usize> = UnionFind::new(matches.len());
    let mut first_by_hyp: HashMap<usize, usize> = HashMap::new();
    let mut first_by_ref: HashMap<usize, usize> = HashMap::new();

    for (i, &(h, r)) in matches.iter().enumerate() {
        match first_by_hyp.get(&h) {
            Some(&j) => {
                sets.union(i, j);
            }
            None => {
                first_by_hyp.insert(h, i);
            }
        }
        match first_by_ref.get(&r) {
            Some(&j) => {
                sets.union(i, j);
            }
            None => {
                first_by_ref.insert(r, i);
            }
        }
    }

    let mut position: HashMap<usize, usize> = HashMap::new();
    let mut cliques: Vec<Clique> = Vec::new();
    for (i, &pair) in matches.iter().enumerate() {
        let root = sets.find(i);
        let slot = *position.entry(root).or_insert_with(|| {
            cliques.push(Clique {
                matches: Vec::new(),
            });
            cliques.len() - 1
        });
        cliques[slot].matches.push(pair);
    }

    cliques
}

/// Sum of [`Clique::required_matches`] over all cliques
#[must_use]
pub fn required_matches(cliques: &[Clique]) -> usize {
    cliques.iter().map(Clique::required_matches).sum()
}
