//! The incremental SAT solver abstraction. Literals are non-zero DIMACS
//! integers (negative means negated); variables 1 and 2 are pinned true and
//! false by unit clauses once at construction so encoders can reference
//! constants.

mod cadical;

pub use cadical::CadicalSolver;

use crate::planning::{Error, SolverName};
use std::time::Duration;

/// Result of one assumption-guarded solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    Sat,
    Unsat,
    Timeout,
}

/// A satisfying assignment, indexed by 1-based variable. Unassigned or
/// out-of-range variables read as false.
#[derive(Debug, Clone, Default)]
pub struct Model {
    assignment: Vec<bool>,
}

impl Model {
    pub fn new(assignment: Vec<bool>) -> Self {
        Self { assignment }
    }

    #[inline(always)]
    pub fn value(&self, variable: u64) -> bool {
        self.assignment
            .get(variable as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// An incremental solver in the IPASIR mould: clauses are streamed literal
/// by literal with `0` as terminator, assumptions hold for the next solve
/// only, and a deadline is enforced through the backend's termination
/// callback.
pub trait Solver {
    fn add_literal(&mut self, literal: i32) -> Result<(), Error>;

    fn assume(&mut self, literal: i32);

    fn solve(&mut self, limit: Option<Duration>) -> Result<SolveResult, Error>;

    /// The model of the last solve. Only meaningful after [`SolveResult::Sat`].
    fn model(&self) -> &Model;
}

pub fn create_solver(name: SolverName) -> Box<dyn Solver> {
    match name {
        SolverName::Cadical => Box::new(CadicalSolver::new()),
    }
}

/// Pins the constant variables 1 (true) and 2 (false).
pub fn pin_constants(solver: &mut dyn Solver) -> Result<(), Error> {
    solver.add_literal(1)?;
    solver.add_literal(0)?;
    solver.add_literal(-2)?;
    solver.add_literal(0)?;
    Ok(())
}
