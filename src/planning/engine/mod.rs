//! Orchestration of grounder refinement and planner invocations under the
//! wall-clock budget. All modes share the same pattern: refine to a progress
//! target, solve with a time slice, refine further on failure.

mod fixed;
mod interrupt;
mod oneshot;

use crate::planning::{Config, EngineName, Error, Plan, Problem, Timer};

/// Runs the engine selected by the configuration and returns the plan
/// together with the residual problem it indexes into. `Err(Timeout)` and
/// `Err(MaxStepsExceeded)` mean no plan was found within the limits;
/// anything else is a hard error.
pub fn run(problem: &Problem, config: &Config, timer: Timer) -> Result<(Plan, Problem), Error> {
    match config.engine {
        EngineName::Oneshot => oneshot::run(problem, config, timer),
        EngineName::Interrupt => interrupt::run(problem, config, timer),
        EngineName::Fixed => fixed::run(problem, config, timer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Domain;
    use crate::parsers::Parser;
    use crate::planning::{validate, EngineName};
    use crate::test_utils::*;
    use std::time::Duration;

    fn normalized(domain: &str, problem: &str) -> Problem {
        let domain = Domain::from_str(domain).expect("domain should parse");
        let problem = crate::parsed_types::Problem::from_str(problem).expect("problem should parse");
        crate::planning::problem::normalize(&domain, &problem).expect("normalization should succeed")
    }

    #[test]
    fn oneshot_finds_a_swap_plan() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let config = Config::default();
        let (plan, residual) = run(&problem, &config, Timer::start()).unwrap();
        assert_eq!(plan.len(), 1);
        validate(&plan, &residual).unwrap();
    }

    #[test]
    fn interrupt_mode_reaches_the_final_attempt() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM);
        let mut config = Config::default();
        config.engine = EngineName::Interrupt;
        config.num_solvers = 3;
        config.solver_timeout = Duration::from_secs(30);
        let (plan, residual) = run(&problem, &config, Timer::start()).unwrap();
        validate(&plan, &residual).unwrap();
    }

    #[test]
    fn fixed_mode_solves_partially_ground_problems() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM);
        let mut config = Config::default();
        config.engine = EngineName::Fixed;
        config.preprocess_progress = 0.5;
        let (plan, residual) = run(&problem, &config, Timer::start()).unwrap();
        validate(&plan, &residual).unwrap();
    }

    #[test]
    fn unreachable_goals_surface_as_no_plan() {
        let problem = normalized(RIGID_DOMAIN, RIGID_PROBLEM);
        let config = Config::default();
        let result = run(&problem, &config, Timer::start());
        assert!(matches!(result, Err(Error::MaxStepsExceeded)));
    }
}
