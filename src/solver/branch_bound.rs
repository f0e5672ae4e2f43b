//! Depth-first branch and bound for [`BinaryProgram`]s.
//!
//! Each node fixes one free variable and runs activity-based propagation over
//! the constraints that mention it. A node is pruned when its objective upper
//! bound does not strictly beat the incumbent, so the first optimum found is
//! the one returned and results are deterministic.
//!
//! The bound is the fixed contribution plus a relaxation of the rest:
//!
//! - equality rows with unit coefficients (cardinality groups) take their
//!   best remaining coefficients, exactly as many as they still need and at
//!   most one from each `<= 1` row;
//! - every other free variable counts when its coefficient is positive;
//! - a pair-penalty row `x_a + x_b - p <= 1` whose `a` is fixed at one
//!   charges the penalty of `p` to `b`, since selecting `b` forces `p`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{
    BinaryProgram, Constraint, Relation, Solution, SolveError, SolveStatus, SolverBackend,
};

/// Tolerance for all floating point comparisons in the search
pub(crate) const EPSILON: f64 = 1e-9;

/// Default cap on explored nodes
pub const DEFAULT_MAX_NODES: u64 = 2_000_000;

/// Default wall-clock budget for a single solve
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

const FREE: i8 = -1;

/// Search budget for a single solve. `None` means unlimited.
#[derive(Debug, Clone, Copy)]
pub struct SolverLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_nodes: Some(DEFAULT_MAX_NODES),
            time_limit: Some(DEFAULT_TIME_LIMIT),
        }
    }
}

impl SolverLimits {
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_nodes: None,
            time_limit: None,
        }
    }
}

/// Exact branch and bound backend
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    limits: SolverLimits,
}

impl BranchAndBound {
    #[must_use]
    pub fn new(limits: SolverLimits) -> Self {
        Self { limits }
    }
}

impl SolverBackend for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolveError> {
        program.validate()?;

        let mut search = Search::new(program, self.limits);
        let mut root = vec![FREE; program.num_vars()];
        let all_constraints: Vec<usize> = (0..program.constraints().len()).collect();

        if search.propagate(&mut root, all_constraints) {
            search.explore(root);
        }

        debug!(
            vars = program.num_vars(),
            constraints = program.constraints().len(),
            nodes = search.nodes,
            exhausted = search.exhausted,
            "branch and bound finished"
        );

        match search.best {
            Some((objective, assignment)) => Ok(Solution {
                values: assignment
                    .iter()
                    .map(|&v| if v == 1 { 1.0 } else { 0.0 })
                    .collect(),
                objective,
                status: if search.exhausted {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                },
                nodes: search.nodes,
            }),
            None if search.exhausted => Err(SolveError::LimitReached {
                nodes: search.nodes,
            }),
            None => Err(SolveError::Infeasible),
        }
    }
}

/// Equality row with unit coefficients, its members split by the first
/// `<= 1` row that holds them
#[derive(Debug, Clone)]
struct Group {
    rows: Vec<Vec<usize>>,
    count: usize,
}

/// Free-variable charge of a pair-penalty row
#[derive(Debug, Clone, Copy)]
struct Penalty {
    partner: usize,
    penalty: usize,
    cost: f64,
}

struct Search<'p> {
    program: &'p BinaryProgram,
    /// Constraint indices mentioning each variable
    watches: Vec<Vec<usize>>,
    groups: Vec<Group>,
    grouped: Vec<bool>,
    /// Pair-penalty rows by member variable
    penalties: Vec<Vec<Penalty>>,
    best: Option<(f64, Vec<i8>)>,
    nodes: u64,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
    exhausted: bool,
}

impl<'p> Search<'p> {
    fn new(program: &'p BinaryProgram, limits: SolverLimits) -> Self {
        let mut watches = vec![Vec::new(); program.num_vars()];
        for (i, constraint) in program.constraints().iter().enumerate() {
            for (var, _) in &constraint.terms {
                watches[var.index()].push(i);
            }
        }

        let constraints = program.constraints();
        let mut packing_row = vec![None; program.num_vars()];
        for (i, constraint) in constraints.iter().enumerate() {
            if is_packing(constraint) {
                for (var, _) in &constraint.terms {
                    packing_row[var.index()].get_or_insert(i);
                }
            }
        }

        let mut groups = Vec::new();
        let mut grouped = vec![false; program.num_vars()];
        for constraint in constraints {
            let Some(count) = cardinality(constraint) else {
                continue;
            };
            let members: Vec<usize> = constraint
                .terms
                .iter()
                .map(|(var, _)| var.index())
                .collect();
            if members.iter().any(|&var| grouped[var]) {
                continue;
            }
            let mut rows: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            for &var in &members {
                grouped[var] = true;
                // Members outside any packing row get a row of their own
                let key = packing_row[var].unwrap_or(constraints.len() + var);
                rows.entry(key).or_default().push(var);
            }
            groups.push(Group {
                rows: rows.into_values().collect(),
                count,
            });
        }

        let mut penalties = vec![Vec::new(); program.num_vars()];
        for constraint in program.constraints() {
            let Some((a, b, penalty)) = pair_penalty(constraint) else {
                continue;
            };
            let cost = -program.objective[penalty];
            // A penalty shared by several rows could be charged twice
            if cost <= 0.0 || watches[penalty].len() != 1 {
                continue;
            }
            penalties[a].push(Penalty {
                partner: b,
                penalty,
                cost,
            });
            penalties[b].push(Penalty {
                partner: a,
                penalty,
                cost,
            });
        }

        Self {
            program,
            watches,
            groups,
            grouped,
            penalties,
            best: None,
            nodes: 0,
            max_nodes: limits.max_nodes,
            deadline: limits.time_limit.map(|limit| Instant::now() + limit),
            exhausted: false,
        }
    }

    fn out_of_budget(&self) -> bool {
        if self.max_nodes.is_some_and(|max| self.nodes >= max) {
            return true;
        }
        // The clock is read on the first node and every 256th after it
        self.nodes % 256 == 1 && self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn explore(&mut self, assignment: Vec<i8>) {
        self.nodes += 1;
        if self.out_of_budget() {
            self.exhausted = true;
            return;
        }

        // An infinite bound means a cardinality group can no longer be met
        let bound = self.upper_bound(&assignment);
        if !bound.is_finite()
            || self
                .best
                .as_ref()
                .is_some_and(|(incumbent, _)| bound <= incumbent + EPSILON)
        {
            return;
        }

        let Some(var) = assignment.iter().position(|&v| v == FREE) else {
            self.record(assignment);
            return;
        };

        // With only non-positive coefficients left, all-zero is the best
        // completion whenever it is feasible.
        let program = self.program;
        let objective = &program.objective;
        let only_costs_left = assignment
            .iter()
            .zip(objective)
            .all(|(&v, &coef)| v != FREE || coef <= 0.0);
        if only_costs_left {
            let completed: Vec<i8> = assignment
                .iter()
                .map(|&v| if v == FREE { 0 } else { v })
                .collect();
            let values: Vec<bool> = completed.iter().map(|&v| v == 1).collect();
            if program.is_feasible(&values) {
                self.record(completed);
                return;
            }
        }

        // Dive towards selections: group members must be picked anyway
        let order: [i8; 2] = if objective[var] > 0.0 || self.grouped[var] {
            [1, 0]
        } else {
            [0, 1]
        };
        for value in order {
            let mut child = assignment.clone();
            child[var] = value;
            if self.propagate(&mut child, self.watches[var].clone()) {
                self.explore(child);
            }
            if self.exhausted {
                return;
            }
        }
    }

    fn record(&mut self, assignment: Vec<i8>) {
        let values: Vec<bool> = assignment.iter().map(|&v| v == 1).collect();
        if !self.program.is_feasible(&values) {
            return;
        }
        let objective = self.program.objective_value(&values);
        let improves = self
            .best
            .as_ref()
            .map_or(true, |(incumbent, _)| objective > incumbent + EPSILON);
        if improves {
            self.best = Some((objective, assignment));
        }
    }

    /// Objective of a free variable including the penalties it would force
    fn effective_coef(&self, assignment: &[i8], var: usize) -> f64 {
        let forced: f64 = self.penalties[var]
            .iter()
            .filter(|p| assignment[p.partner] == 1 && assignment[p.penalty] == FREE)
            .map(|p| p.cost)
            .sum();
        self.program.objective[var] - forced
    }

    fn upper_bound(&self, assignment: &[i8]) -> f64 {
        let objective = &self.program.objective;
        let mut bound = 0.0;
        for (var, &value) in assignment.iter().enumerate() {
            match value {
                1 => bound += objective[var],
                FREE if !self.grouped[var] => {
                    bound += self.effective_coef(assignment, var).max(0.0);
                }
                _ => {}
            }
        }

        for group in &self.groups {
            let mut selected = 0;
            let mut open = Vec::with_capacity(group.rows.len());
            for row in &group.rows {
                let ones = row.iter().filter(|&&var| assignment[var] == 1).count();
                if ones > 0 {
                    selected += ones;
                    continue;
                }
                let best = row
                    .iter()
                    .filter(|&&var| assignment[var] == FREE)
                    .map(|&var| self.effective_coef(assignment, var))
                    .max_by(f64::total_cmp);
                open.extend(best);
            }

            let Some(needed) = group.count.checked_sub(selected) else {
                return f64::NEG_INFINITY;
            };
            if open.len() < needed {
                return f64::NEG_INFINITY;
            }
            open.sort_unstable_by(|a, b| b.total_cmp(a));
            bound += open[..needed].iter().sum::<f64>();
        }

        bound
    }

    /// Tighten free variables until a fixpoint. Returns false on a conflict.
    fn propagate(&self, assignment: &mut [i8], initial: Vec<usize>) -> bool {
        let constraints = self.program.constraints();
        let mut queued = vec![false; constraints.len()];
        let mut queue = std::collections::VecDeque::with_capacity(initial.len());
        for c in initial {
            if !queued[c] {
                queued[c] = true;
                queue.push_back(c);
            }
        }

        while let Some(c) = queue.pop_front() {
            queued[c] = false;
            let constraint = &constraints[c];

            let (mut min_act, mut max_act) = (0.0, 0.0);
            for &(var, coef) in &constraint.terms {
                match assignment[var.index()] {
                    1 => {
                        min_act += coef;
                        max_act += coef;
                    }
                    FREE if coef > 0.0 => max_act += coef,
                    FREE => min_act += coef,
                    _ => {}
                }
            }

            let upper = matches!(constraint.relation, Relation::LessEq | Relation::Equal);
            let lower = matches!(constraint.relation, Relation::GreaterEq | Relation::Equal);
            if (upper && min_act > constraint.rhs + EPSILON)
                || (lower && max_act < constraint.rhs - EPSILON)
            {
                return false;
            }

            let forced = constraint.terms.iter().find_map(|&(var, coef)| {
                if assignment[var.index()] != FREE {
                    return None;
                }
                let span = coef.abs();
                if upper && min_act + span > constraint.rhs + EPSILON {
                    // Taking the costly side would overshoot
                    return Some((var, if coef > 0.0 { 0 } else { 1 }));
                }
                if lower && max_act - span < constraint.rhs - EPSILON {
                    return Some((var, if coef > 0.0 { 1 } else { 0 }));
                }
                None
            });

            if let Some((var, value)) = forced {
                assignment[var.index()] = value;
                for &other in &self.watches[var.index()] {
                    if !queued[other] {
                        queued[other] = true;
                        queue.push_back(other);
                    }
                }
            }
        }

        true
    }
}

fn is_unit(coef: f64) -> bool {
    (coef - 1.0).abs() < EPSILON
}

/// `sum x_i <= 1` over unit coefficients
fn is_packing(constraint: &Constraint) -> bool {
    constraint.relation == Relation::LessEq
        && is_unit(constraint.rhs)
        && constraint.terms.iter().all(|&(_, coef)| is_unit(coef))
}

/// `sum x_i = k` over unit coefficients
fn cardinality(constraint: &Constraint) -> Option<usize> {
    let rhs = constraint.rhs;
    if constraint.relation != Relation::Equal
        || rhs < -EPSILON
        || (rhs - rhs.round()).abs() > EPSILON
        || !constraint.terms.iter().all(|&(_, coef)| is_unit(coef))
    {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = rhs.round() as usize;
    Some(count)
}

/// `x_a + x_b - p <= 1`, returned as `(a, b, p)`
fn pair_penalty(constraint: &Constraint) -> Option<(usize, usize, usize)> {
    if constraint.relation != Relation::LessEq
        || !is_unit(constraint.rhs)
        || constraint.terms.len() != 3
    {
        return None;
    }
    let mut members = constraint
        .terms
        .iter()
        .filter(|&&(_, coef)| is_unit(coef))
        .map(|(var, _)| var.index());
    let (a, b) = (members.next()?, members.next()?);
    let (penalty, _) = constraint
        .terms
        .iter()
        .find(|&&(_, coef)| is_unit(-coef))?;
    Some((a, b, penalty.index()))
}
