//! Interleaves grounding with time-sliced solver attempts: the progress
//! target is stepped in `num_solvers − 1` equal increments, every attempt
//! but the last is bounded by the per-solver timeout, and the final attempt
//! receives the residual budget.

use crate::planning::{Config, Error, Grounder, Plan, Problem, SatPlanner, Timer};
use std::cmp::min;
use tracing::info;

pub fn run(problem: &Problem, config: &Config, timer: Timer) -> Result<(Plan, Problem), Error> {
    let mut grounder = Grounder::new(problem, config);
    let planner = SatPlanner::new(config);

    if config.num_solvers <= 1 {
        grounder.refine(1.0, timer.deadline(config.timeout))?;
        let extracted = grounder.extract_problem();
        let plan = planner.find_plan(&extracted, timer.remaining(config.timeout))?;
        return Ok((plan, extracted));
    }

    let num_solvers = config.num_solvers.max(2);
    let step_size = config.preprocess_progress / f64::from(num_solvers - 1);
    let mut target = 0.0;

    loop {
        grounder.refine(target, timer.deadline(config.timeout))?;
        let last = grounder.is_exhausted()
            || grounder.groundness() >= config.preprocess_progress
            || target >= config.preprocess_progress;
        info!(
            "Attempting to solve at groundness {:.3} ({} schemata)",
            grounder.groundness(),
            grounder.num_schemata()
        );

        let extracted = grounder.extract_problem();
        let budget = if last {
            timer.remaining(config.timeout)
        } else {
            Some(match timer.remaining(config.timeout) {
                Some(remaining) => min(remaining, config.solver_timeout),
                None => config.solver_timeout,
            })
        };

        match planner.find_plan(&extracted, budget) {
            Ok(plan) => return Ok((plan, extracted)),
            Err(error) if last => return Err(error),
            Err(Error::Timeout) | Err(Error::MaxStepsExceeded) => {
                info!("Attempt unsuccessful, refining further");
            }
            Err(error) => return Err(error),
        }

        target += step_size;
    }
}
