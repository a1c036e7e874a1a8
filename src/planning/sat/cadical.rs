//! CaDiCaL bound through `rustsat`. CaDiCaL is the reference IPASIR
//! implementation and supports the termination callback the solve loop
//! relies on for deadlines.

use crate::planning::sat::{Model, SolveResult, Solver};
use crate::planning::Error;
use rustsat::solvers::{ControlSignal, Solve, SolveIncremental, SolverResult, Terminate};
use rustsat::types::{Clause, Lit, TernaryVal};
use rustsat_cadical::CaDiCaL;
use std::time::{Duration, Instant};

/// Stand-in deadline for unlimited solves; the terminator never fires.
const UNLIMITED: Duration = Duration::from_secs(60 * 60 * 24 * 365);

pub struct CadicalSolver {
    solver: CaDiCaL<'static, 'static>,
    clause: Vec<Lit>,
    assumptions: Vec<Lit>,
    model: Model,
    max_var: u32,
}

fn to_lit(literal: i32) -> Lit {
    debug_assert_ne!(literal, 0);
    let variable = literal.unsigned_abs() - 1;
    if literal > 0 {
        Lit::positive(variable)
    } else {
        Lit::negative(variable)
    }
}

impl CadicalSolver {
    pub fn new() -> Self {
        Self {
            solver: CaDiCaL::default(),
            clause: Vec::new(),
            assumptions: Vec::new(),
            model: Model::default(),
            max_var: 0,
        }
    }

    fn track(&mut self, literal: i32) {
        self.max_var = self.max_var.max(literal.unsigned_abs());
    }
}

impl Default for CadicalSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CadicalSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CadicalSolver")
            .field("max_var", &self.max_var)
            .finish()
    }
}

impl Solver for CadicalSolver {
    fn add_literal(&mut self, literal: i32) -> Result<(), Error> {
        if literal != 0 {
            self.track(literal);
            self.clause.push(to_lit(literal));
            return Ok(());
        }
        let clause: Clause = self.clause.drain(..).collect();
        self.solver
            .add_clause(clause)
            .map_err(|error| Error::Solver(error.to_string()))
    }

    fn assume(&mut self, literal: i32) {
        self.track(literal);
        self.assumptions.push(to_lit(literal));
    }

    fn solve(&mut self, limit: Option<Duration>) -> Result<SolveResult, Error> {
        let end = Instant::now() + limit.unwrap_or(UNLIMITED);
        self.solver.attach_terminator(move || {
            if Instant::now() >= end {
                ControlSignal::Terminate
            } else {
                ControlSignal::Continue
            }
        });

        let assumptions = std::mem::take(&mut self.assumptions);
        let result = self
            .solver
            .solve_assumps(&assumptions)
            .map_err(|error| Error::Solver(error.to_string()))?;

        match result {
            SolverResult::Sat => {
                let mut assignment = vec![false; self.max_var as usize + 1];
                for variable in 1..=self.max_var {
                    let value = self
                        .solver
                        .lit_val(Lit::positive(variable - 1))
                        .map_err(|error| Error::Solver(error.to_string()))?;
                    assignment[variable as usize] = matches!(value, TernaryVal::True);
                }
                self.model = Model::new(assignment);
                Ok(SolveResult::Sat)
            }
            SolverResult::Unsat => Ok(SolveResult::Unsat),
            SolverResult::Interrupted => Ok(SolveResult::Timeout),
        }
    }

    fn model(&self) -> &Model {
        &self.model
    }
}
