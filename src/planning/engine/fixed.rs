//! Ground to a fixed groundness, then solve without a timeout.

use crate::planning::{Config, Error, Grounder, Plan, Problem, SatPlanner, Timer};
use tracing::info;

pub fn run(problem: &Problem, config: &Config, timer: Timer) -> Result<(Plan, Problem), Error> {
    let mut grounder = Grounder::new(problem, config);
    grounder.refine(config.preprocess_progress, timer.deadline(config.timeout))?;
    info!(
        "Grounding fixed at {:.3} with {} schemata",
        grounder.groundness(),
        grounder.num_schemata()
    );

    let extracted = grounder.extract_problem();
    let plan = SatPlanner::new(config).find_plan(&extracted, None)?;
    Ok((plan, extracted))
}
