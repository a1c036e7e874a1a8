//! Ground to the configured progress target, then one planner call with the
//! remaining budget.

use crate::planning::{Config, Error, Grounder, Plan, Problem, SatPlanner, Timer};
use tracing::info;

pub fn run(problem: &Problem, config: &Config, timer: Timer) -> Result<(Plan, Problem), Error> {
    let mut grounder = Grounder::new(problem, config);
    grounder.refine(config.preprocess_progress, timer.deadline(config.timeout))?;
    info!(
        "Grounding reached {:.3} with {} schemata",
        grounder.groundness(),
        grounder.num_schemata()
    );

    let extracted = grounder.extract_problem();
    let planner = SatPlanner::new(config);
    let plan = planner.find_plan(&extracted, timer.remaining(config.timeout))?;
    Ok((plan, extracted))
}
