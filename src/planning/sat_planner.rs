//! The outer solve loop: assert the initial state and the first universal
//! block, extend the horizon geometrically, assume the goal at the current
//! step and hand the query to the incremental solver until a model appears.

use crate::planning::encoding::{ForeachEncoder, Formula, Variable};
use crate::planning::sat::{create_solver, pin_constants, SolveResult, Solver};
use crate::planning::{Config, Error, Plan, Problem, Timer};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct SatPlanner<'a> {
    config: &'a Config,
}

impl<'a> SatPlanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Searches for a plan within the given wall-clock budget (`None` is
    /// unlimited).
    pub fn find_plan(&self, problem: &Problem, budget: Option<Duration>) -> Result<Plan, Error> {
        let timer = Timer::start();
        let deadline = timer.deadline(budget);

        info!("Encoding problem with {} schemata", problem.actions.len());
        let encoder = ForeachEncoder::new(problem, self.config, deadline)?;

        if encoder.goal_unreachable() {
            info!("A goal condition is rigidly refuted, no horizon can satisfy it");
            return Err(Error::MaxStepsExceeded);
        }

        let mut solver = create_solver(self.config.solver);
        pin_constants(solver.as_mut())?;
        Self::add_formula(solver.as_mut(), &encoder, encoder.init_clauses(), 0)?;
        Self::add_formula(solver.as_mut(), &encoder, encoder.universal_clauses(), 0)?;

        let mut step: u32 = 0;
        let mut target = 1.0f64;
        loop {
            if self.config.max_steps > 0 && step >= self.config.max_steps {
                info!("No plan within {} steps", self.config.max_steps);
                return Err(Error::MaxStepsExceeded);
            }
            if timer.is_expired(deadline) {
                return Err(Error::Timeout);
            }

            while f64::from(step) < target {
                Self::add_formula(solver.as_mut(), &encoder, encoder.transition_clauses(), step)?;
                step += 1;
                Self::add_formula(solver.as_mut(), &encoder, encoder.universal_clauses(), step)?;
            }

            for clause in &encoder.goal_clauses().clauses {
                for &literal in &clause.literals {
                    solver.assume(encoder.to_sat_var(literal, step));
                }
            }

            let limit = timer.remaining(budget);
            match limit {
                Some(limit) => info!(
                    "Solving step {} with a budget of {}",
                    step,
                    humantime::format_duration(limit)
                ),
                None => info!("Solving step {}", step),
            }

            match solver.solve(limit)? {
                SolveResult::Sat => {
                    info!("Plan found at step {}", step);
                    return Ok(encoder.extract_plan(solver.model(), step));
                }
                SolveResult::Timeout => return Err(Error::Timeout),
                SolveResult::Unsat => {
                    debug!("No plan with {} steps", step);
                }
            }

            target = next_target(step, self.config.step_factor);
        }
    }

    fn add_formula(
        solver: &mut dyn Solver,
        encoder: &ForeachEncoder,
        formula: &Formula<Variable>,
        step: u32,
    ) -> Result<(), Error> {
        for clause in &formula.clauses {
            for &literal in &clause.literals {
                solver.add_literal(encoder.to_sat_var(literal, step))?;
            }
            solver.add_literal(0)?;
        }
        Ok(())
    }
}

/// The horizon target after an unsuccessful solve at `step`: grow
/// geometrically, but always advance by at least one step.
fn next_target(step: u32, step_factor: f64) -> f64 {
    (f64::from(step) * step_factor).max(f64::from(step) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::{Domain, Problem as ParsedProblem};
    use crate::parsers::Parser;
    use crate::planning::problem::normalize;
    use crate::planning::{validate, Grounder};
    use crate::test_utils::*;

    fn normalized(domain: &str, problem: &str) -> Problem {
        let domain = Domain::from_str(domain).expect("domain should parse");
        let problem = ParsedProblem::from_str(problem).expect("problem should parse");
        normalize(&domain, &problem).expect("normalization should succeed")
    }

    fn plan_for(domain: &str, problem: &str, config: &Config) -> Result<(Plan, Problem), Error> {
        let problem = normalized(domain, problem);
        let mut grounder = Grounder::new(&problem, config);
        grounder.refine(config.preprocess_progress, None).unwrap();
        let extracted = grounder.extract_problem();
        let planner = SatPlanner::new(config);
        planner.find_plan(&extracted, None).map(|plan| {
            validate(&plan, &extracted).expect("extracted plan must execute");
            (plan, extracted)
        })
    }

    #[test]
    fn satisfied_goal_yields_the_empty_plan() {
        let config = Config::default();
        let (plan, _) = plan_for(SWAP_DOMAIN, SWAP_TRIVIAL_PROBLEM, &config).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn single_swap_needs_one_step() {
        let config = Config::default();
        let (plan, extracted) = plan_for(SWAP_DOMAIN, SWAP_PROBLEM, &config).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.to_text(&extracted), "0: (move a b c)\n");
    }

    #[test]
    fn lifted_schemata_also_solve() {
        // Keeping the schema fully lifted must produce the same plan.
        let mut config = Config::default();
        config.preprocess_progress = 0.0;
        let (plan, extracted) = plan_for(SWAP_DOMAIN, SWAP_PROBLEM, &config).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.to_text(&extracted), "0: (move a b c)\n");
    }

    #[test]
    fn rigidly_refuted_goals_report_no_plan() {
        let config = Config::default();
        let result = plan_for(RIGID_DOMAIN, RIGID_PROBLEM, &config);
        assert!(matches!(result, Err(Error::MaxStepsExceeded)));
    }

    #[test]
    fn problems_without_actions_report_no_plan() {
        let config = Config::default();
        let result = plan_for(INERT_DOMAIN, INERT_PROBLEM, &config);
        assert!(matches!(result, Err(Error::MaxStepsExceeded)));
    }

    #[test]
    fn max_steps_bound_is_respected() {
        let mut config = Config::default();
        config.max_steps = 2;
        // Blocksworld needs more than two steps here.
        let result = plan_for(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM, &config);
        assert!(matches!(result, Err(Error::MaxStepsExceeded)));
    }

    #[test]
    fn blocksworld_plans_are_sound() {
        let config = Config::default();
        let (plan, _) = plan_for(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM, &config).unwrap();
        // Moving b under a takes at least unstack, putdown, pickup, stack.
        assert!(plan.len() >= 4);
    }

    #[test]
    fn helper_variables_leave_plans_intact() {
        let mut config = Config::default();
        config.dnf_threshold = 1;
        let (plan, _) = plan_for(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM, &config).unwrap();
        assert!(plan.len() >= 4);
    }

    #[test]
    fn parameter_implies_action_variant_is_equivalent() {
        let mut config = Config::default();
        config.parameter_implies_action = true;
        let (plan, _) = plan_for(SWAP_DOMAIN, SWAP_PROBLEM, &config).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn horizon_growth_follows_the_geometric_schedule() {
        // Simulates the solve loop without a solver: the horizons attempted
        // for factor 1.5 are 1, 2, 3, 5, 8, 12, 18, …
        let mut step: u32 = 0;
        let mut target = 1.0f64;
        let mut horizons = Vec::new();
        for _ in 0..7 {
            while f64::from(step) < target {
                step += 1;
            }
            horizons.push(step);
            target = next_target(step, 1.5);
        }
        assert_eq!(horizons, vec![1, 2, 3, 5, 8, 12, 18]);
    }

    #[test]
    fn degenerate_step_factors_still_advance() {
        assert_eq!(next_target(4, 1.0), 5.0);
        assert!(next_target(4, 1.5) > 5.0);
    }
}
