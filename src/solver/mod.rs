//! Exact 0-1 integer programming.
//!
//! The alignment engine states its problem as a [`BinaryProgram`]: binary
//! decision variables, linear constraints and a linear objective to maximize.
//! Any [`SolverBackend`] that returns a globally optimal assignment can solve
//! it. The crate ships [`BranchAndBound`], a depth-first branch and bound with
//! constraint propagation that is exact for the program sizes produced by
//! sentence alignment.
//!
//! ## Example
//!
//! ```rust
//! use meteor_align::solver::{BinaryProgram, BranchAndBound, Relation, SolverBackend};
//!
//! let mut program = BinaryProgram::new();
//! let a = program.add_var(2.0);
//! let b = program.add_var(3.0);
//! program.add_constraint(vec![(a, 1.0), (b, 1.0)], Relation::LessEq, 1.0);
//!
//! let solution = BranchAndBound::default().solve(&program).unwrap();
//! assert!(solution.is_selected(b));
//! assert!(!solution.is_selected(a));
//! ```

pub mod branch_bound;

use thiserror::Error;

pub use branch_bound::{BranchAndBound, SolverLimits};

/// Values at or above this are read as a selected binary variable.
pub const SELECTION_THRESHOLD: f64 = 0.99;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("Program has no feasible assignment")]
    Infeasible,

    #[error("Search limit reached after {nodes} nodes without a feasible assignment")]
    LimitReached { nodes: u64 },

    #[error("Invalid program: {0}")]
    InvalidProgram(String),
}

/// Handle to a binary variable of a [`BinaryProgram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Comparison between a constraint's left-hand side and its right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

/// A linear constraint `sum(coef * var) <relation> rhs`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub terms: Vec<(VarId, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    fn activity(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| values[var.0])
            .map(|(_, coef)| coef)
            .sum()
    }

    fn is_satisfied(&self, values: &[bool]) -> bool {
        let activity = self.activity(values);
        match self.relation {
            Relation::LessEq => activity <= self.rhs + branch_bound::EPSILON,
            Relation::GreaterEq => activity >= self.rhs - branch_bound::EPSILON,
            Relation::Equal => (activity - self.rhs).abs() <= branch_bound::EPSILON,
        }
    }
}

/// A maximization problem over binary variables
#[derive(Debug, Clone, Default)]
pub struct BinaryProgram {
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl BinaryProgram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binary variable with the given objective coefficient
    pub fn add_var(&mut self, objective_coef: f64) -> VarId {
        self.objective.push(objective_coef);
        VarId(self.objective.len() - 1)
    }

    /// Add a linear constraint. Repeated variables in `terms` are merged.
    pub fn add_constraint(&mut self, terms: Vec<(VarId, f64)>, relation: Relation, rhs: f64) {
        let mut merged: Vec<(VarId, f64)> = Vec::with_capacity(terms.len());
        for (var, coef) in terms {
            match merged.iter_mut().find(|(v, _)| *v == var) {
                Some((_, existing)) => *existing += coef,
                None => merged.push((var, coef)),
            }
        }
        merged.retain(|(_, coef)| *coef != 0.0);

        self.constraints.push(Constraint {
            terms: merged,
            relation,
            rhs,
        });
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Objective value of a complete assignment
    #[must_use]
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, selected)| **selected)
            .map(|(coef, _)| coef)
            .sum()
    }

    /// Whether a complete assignment satisfies every constraint
    #[must_use]
    pub fn is_feasible(&self, values: &[bool]) -> bool {
        values.len() == self.num_vars() && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Check that every constraint refers to declared variables and finite numbers
    ///
    /// # Errors
    ///
    /// Returns `SolveError::InvalidProgram` describing the first problem found.
    pub fn validate(&self) -> Result<(), SolveError> {
        if let Some(pos) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(SolveError::InvalidProgram(format!(
                "objective coefficient of variable {pos} is not finite"
            )));
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if !constraint.rhs.is_finite() {
                return Err(SolveError::InvalidProgram(format!(
                    "constraint {i} has a non-finite right-hand side"
                )));
            }
            for (var, coef) in &constraint.terms {
                if var.0 >= self.num_vars() {
                    return Err(SolveError::InvalidProgram(format!(
                        "constraint {i} refers to undeclared variable {}",
                        var.0
                    )));
                }
                if !coef.is_finite() {
                    return Err(SolveError::InvalidProgram(format!(
                        "constraint {i} has a non-finite coefficient"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// How a solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven globally optimal
    Optimal,
    /// Best assignment found before the search limits were hit
    Feasible,
}

/// Variable assignment returned by a backend
#[derive(Debug, Clone)]
pub struct Solution {
    pub values: Vec<f64>,
    pub objective: f64,
    pub status: SolveStatus,
    pub nodes: u64,
}

impl Solution {
    #[must_use]
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }

    #[must_use]
    pub fn is_selected(&self, var: VarId) -> bool {
        self.value(var) >= SELECTION_THRESHOLD
    }
}

/// An exact binary optimization backend
pub trait SolverBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Maximize the program's objective subject to its constraints
    ///
    /// # Errors
    ///
    /// Returns `SolveError::Infeasible` if no assignment satisfies the
    /// constraints, or `SolveError::LimitReached` if the backend gave up
    /// before finding any feasible assignment.
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolveError>;
}
