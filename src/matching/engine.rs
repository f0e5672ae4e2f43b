use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::core::token::Token;
use crate::core::types::AlignmentMethod;
use crate::matching::candidates::{Candidate, CandidateGraph};
use crate::matching::chunks::count_chunks;
use crate::matching::cliques::{compute_cliques, required_matches};
use crate::matching::presolve::{Presolve, CROSSING_PENALTY};
use crate::matching::stages::Stage;
use crate::solver::{
    BinaryProgram, BranchAndBound, Relation, SolveError, SolveStatus, SolverBackend,
    SolverLimits, VarId,
};
use crate::utils::validation::{check_candidate_limit, ValidationError, DEFAULT_MAX_CANDIDATES};

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error(
        "Alignment program infeasible ({candidates} candidates, {required} required matches). \
         This is a bug, please report it."
    )]
    SolverInfeasible { candidates: usize, required: usize },

    #[error("{0}")]
    CandidateLimit(String),

    #[error("Solver budget exhausted after {nodes} nodes")]
    BudgetExhausted { nodes: u64 },

    #[error("Solver error: {0}")]
    Solver(#[from] SolveError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What to do when a pair is too large to solve exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fail with an error
    Reject,
    /// Use the solver's best assignment so far, or a greedy alignment
    #[default]
    Approximate,
}

/// Resource limits of the alignment engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Largest candidate count solved exactly
    pub max_candidates: usize,
    /// Cap on branch and bound nodes per pair
    pub max_nodes: Option<u64>,
    /// Wall-clock budget per pair in milliseconds
    pub time_limit_ms: Option<u64>,
    /// Behaviour when a limit is hit
    pub fallback: FallbackPolicy,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        let limits = SolverLimits::default();
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_nodes: limits.max_nodes,
            time_limit_ms: limits
                .time_limit
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl AlignmentConfig {
    #[must_use]
    pub fn solver_limits(&self) -> SolverLimits {
        SolverLimits {
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

/// A one-to-one partial matching between hypothesis and reference tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// (hyp, ref) pairs sorted by hypothesis index
    pub pairs: Vec<(usize, usize)>,
    pub method: AlignmentMethod,
}

impl Alignment {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            method: AlignmentMethod::Exact,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn chunks(&self) -> usize {
        count_chunks(&self.pairs)
    }
}

/// Finds the maximum-weight, minimum-crossing alignment of two sentences.
///
/// The alignment is the solution of a binary program with one decision
/// variable per candidate match (objective: its weight) and one crossing
/// variable per crossing candidate pair (objective: -1):
///
/// - every token is matched at most once;
/// - every clique of the candidate graph contributes a maximum matching, and
///   so does the graph as a whole;
/// - a crossing variable is 1 whenever both of its candidates are selected.
///
/// [`Presolve`] first fixes or narrows cliques of interchangeable tokens and
/// replaces crossing variables by cuts where a trade of partners is always
/// better. When it decides every match the solver is not called.
pub struct AlignmentEngine {
    config: AlignmentConfig,
    backend: Box<dyn SolverBackend>,
}

impl std::fmt::Debug for AlignmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentEngine")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self::new(AlignmentConfig::default())
    }
}

impl AlignmentEngine {
    /// Create an engine using the built-in branch and bound backend
    #[must_use]
    pub fn new(config: AlignmentConfig) -> Self {
        let backend = Box::new(BranchAndBound::new(config.solver_limits()));
        Self { config, backend }
    }

    /// Create an engine with a custom optimization backend
    #[must_use]
    pub fn with_backend(config: AlignmentConfig, backend: Box<dyn SolverBackend>) -> Self {
        Self { config, backend }
    }

    /// Align two preprocessed token sequences
    ///
    /// # Errors
    ///
    /// Returns `AlignmentError::Validation` if tokens lack signatures for the
    /// stages, `AlignmentError::SolverInfeasible` on an internal defect, or a
    /// limit error under [`FallbackPolicy::Reject`].
    pub fn align(
        &self,
        hypothesis: &[Token],
        reference: &[Token],
        stages: &[Box<dyn Stage>],
    ) -> Result<Alignment, AlignmentError> {
        let graph = CandidateGraph::build(hypothesis, reference, stages)?;
        self.align_graph(&graph)
    }

    /// Align using an already built candidate graph
    ///
    /// # Errors
    ///
    /// See [`align`](Self::align).
    pub fn align_graph(&self, graph: &CandidateGraph) -> Result<Alignment, AlignmentError> {
        if graph.is_empty() {
            return Ok(Alignment::empty());
        }

        if let Some(message) = check_candidate_limit(graph.len(), self.config.max_candidates) {
            return match self.config.fallback {
                FallbackPolicy::Reject => Err(AlignmentError::CandidateLimit(message)),
                FallbackPolicy::Approximate => {
                    warn!("{message}; using greedy alignment");
                    Ok(approximate(greedy_alignment(&graph.candidates)))
                }
            };
        }

        let Formulation {
            program,
            decisions,
            fixed,
            required,
        } = formulate(graph);
        let fixed_pairs: Vec<(usize, usize)> =
            fixed.iter().map(|&i| graph.candidates[i].pair()).collect();

        if program.num_vars() == 0 {
            debug!(matches = fixed_pairs.len(), "alignment fixed by presolve");
            return Ok(Alignment {
                pairs: sorted(fixed_pairs),
                method: AlignmentMethod::Exact,
            });
        }

        debug!(
            candidates = graph.len(),
            fixed = fixed_pairs.len(),
            vars = program.num_vars(),
            constraints = program.constraints().len(),
            required,
            backend = self.backend.name(),
            "solving alignment program"
        );

        match self.backend.solve(&program) {
            Ok(solution) => {
                let mut pairs = fixed_pairs;
                pairs.extend(
                    graph
                        .candidates
                        .iter()
                        .zip(&decisions)
                        .filter(|(_, var)| var.is_some_and(|var| solution.is_selected(var)))
                        .map(|(c, _)| c.pair()),
                );

                match solution.status {
                    SolveStatus::Optimal => Ok(Alignment {
                        pairs: sorted(pairs),
                        method: AlignmentMethod::Exact,
                    }),
                    SolveStatus::Feasible => match self.config.fallback {
                        FallbackPolicy::Reject => Err(AlignmentError::BudgetExhausted {
                            nodes: solution.nodes,
                        }),
                        FallbackPolicy::Approximate => {
                            warn!(
                                nodes = solution.nodes,
                                "solver budget exhausted; using best alignment found"
                            );
                            Ok(approximate(pairs))
                        }
                    },
                }
            }
            Err(SolveError::Infeasible) => {
                error!(
                    candidates = graph.len(),
                    required, "alignment program infeasible"
                );
                Err(AlignmentError::SolverInfeasible {
                    candidates: graph.len(),
                    required,
                })
            }
            Err(SolveError::LimitReached { nodes }) => match self.config.fallback {
                FallbackPolicy::Reject => Err(AlignmentError::BudgetExhausted { nodes }),
                FallbackPolicy::Approximate => {
                    warn!(nodes, "solver budget exhausted; using greedy alignment");
                    let open: Vec<Candidate> = graph
                        .candidates
                        .iter()
                        .zip(&decisions)
                        .filter(|(_, var)| var.is_some())
                        .map(|(c, _)| *c)
                        .collect();
                    let mut pairs = fixed_pairs;
                    pairs.extend(greedy_alignment(&open));
                    Ok(approximate(pairs))
                }
            },
            Err(e) => Err(e.into()),
        }
    }
}

/// The binary program left after presolve
struct Formulation {
    program: BinaryProgram,
    /// Decision variable of each candidate, `None` once presolve decided it
    decisions: Vec<Option<VarId>>,
    /// Candidate indices selected by presolve
    fixed: Vec<usize>,
    /// Total number of matches, fixed ones included
    required: usize,
}

fn formulate(graph: &CandidateGraph) -> Formulation {
    let candidates = &graph.candidates;
    let pairs = graph.pairs();
    let cliques = compute_cliques(&pairs);
    let presolve = Presolve::new(candidates, &cliques);

    // Crossings with fixed matches are a constant part of each candidate's cost
    let mut program = BinaryProgram::new();
    let mut decisions = Vec::with_capacity(candidates.len());
    for (c, &open) in candidates.iter().zip(&presolve.open) {
        decisions.push(open.then(|| {
            let crossed = presolve
                .fixed
                .iter()
                .filter(|&&f| candidates[f].crosses(c))
                .count();
            program.add_var(c.weight - CROSSING_PENALTY * count_as_rhs(crossed))
        }));
    }

    // Each token is matched at most once
    let mut by_hyp: BTreeMap<usize, Vec<(VarId, f64)>> = BTreeMap::new();
    let mut by_ref: BTreeMap<usize, Vec<(VarId, f64)>> = BTreeMap::new();
    for (c, var) in candidates.iter().zip(&decisions) {
        if let Some(var) = *var {
            by_hyp.entry(c.hyp).or_default().push((var, 1.0));
            by_ref.entry(c.reference).or_default().push((var, 1.0));
        }
    }
    for terms in by_hyp.into_values().chain(by_ref.into_values()) {
        program.add_constraint(terms, Relation::LessEq, 1.0);
    }

    // Every clique contributes a maximum matching
    let position: HashMap<(usize, usize), usize> =
        pairs.iter().enumerate().map(|(i, &pair)| (pair, i)).collect();
    let mut required = 0;
    for clique in &cliques {
        let count = clique.required_matches().min(clique.maximum_matching());
        required += count;

        let members: Vec<usize> = clique
            .matches
            .iter()
            .filter_map(|pair| position.get(pair).copied())
            .collect();
        let fixed_here = members
            .iter()
            .filter(|&&i| presolve.fixed.binary_search(&i).is_ok())
            .count();
        let terms: Vec<(VarId, f64)> = members
            .iter()
            .filter_map(|&i| decisions[i])
            .map(|var| (var, 1.0))
            .collect();
        if !terms.is_empty() {
            program.add_constraint(
                terms,
                Relation::Equal,
                count_as_rhs(count.saturating_sub(fixed_here)),
            );
        }
    }
    let bound = required_matches(&cliques);
    if required < bound {
        warn!(
            bound,
            achievable = required,
            "cliques cannot reach min(hyp, ref) matches; using their maximum matchings"
        );
    }

    let open: Vec<(usize, VarId)> = decisions
        .iter()
        .enumerate()
        .filter_map(|(i, var)| var.map(|var| (i, var)))
        .collect();
    if !open.is_empty() {
        program.add_constraint(
            open.iter().map(|&(_, var)| (var, 1.0)).collect(),
            Relation::Equal,
            count_as_rhs(required.saturating_sub(presolve.fixed.len())),
        );
    }

    // Crossing pairs: a cut when a trade of partners beats them, otherwise
    // a crossing variable
    let (mut cuts, mut crossings) = (0usize, 0usize);
    for (x, &(i, a)) in open.iter().enumerate() {
        for &(j, b) in &open[x + 1..] {
            if !candidates[i].crosses(&candidates[j]) {
                continue;
            }
            if presolve.swap_cut(&candidates[i], &candidates[j]) {
                program.add_constraint(vec![(a, 1.0), (b, 1.0)], Relation::LessEq, 1.0);
                cuts += 1;
            } else {
                let crossing = program.add_var(-CROSSING_PENALTY);
                program.add_constraint(
                    vec![(a, 1.0), (b, 1.0), (crossing, -1.0)],
                    Relation::LessEq,
                    1.0,
                );
                crossings += 1;
            }
        }
    }
    debug!(
        cliques = cliques.len(),
        fixed = presolve.fixed.len(),
        cuts,
        crossings,
        required,
        "formulated alignment program"
    );

    Formulation {
        program,
        decisions,
        fixed: presolve.fixed,
        required,
    }
}

#[inline]
fn count_as_rhs(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

fn sorted(mut pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    pairs.sort_unstable();
    pairs
}

fn approximate(pairs: Vec<(usize, usize)>) -> Alignment {
    Alignment {
        pairs: sorted(pairs),
        method: AlignmentMethod::Approximate,
    }
}

/// Greedy partial matching: heaviest candidates first, then those closest to
/// the diagonal, each taken when both of its tokens are still free.
#[must_use]
pub fn greedy_alignment(candidates: &[Candidate]) -> Vec<(usize, usize)> {
    let mut order: Vec<&Candidate> = candidates.iter().collect();
    order.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.hyp.abs_diff(a.reference).cmp(&b.hyp.abs_diff(b.reference)))
            .then_with(|| a.pair().cmp(&b.pair()))
    });

    let mut used_hyp = std::collections::HashSet::new();
    let mut used_ref = std::collections::HashSet::new();
    let mut pairs = Vec::new();
    for c in order {
        if !used_hyp.contains(&c.hyp) && !used_ref.contains(&c.reference) {
            used_hyp.insert(c.hyp);
            used_ref.insert(c.reference);
            pairs.push(c.pair());
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Align two preprocessed token sequences with the default engine
///
/// # Errors
///
/// See [`AlignmentEngine::align`].
pub fn align(
    hypothesis: &[Token],
    reference: &[Token],
    stages: &[Box<dyn Stage>],
) -> Result<Vec<(usize, usize)>, AlignmentError> {
    AlignmentEngine::default()
        .align(hypothesis, reference, stages)
        .map(|alignment| alignment.pairs)
}
