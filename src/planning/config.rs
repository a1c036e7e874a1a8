//! The shared planner configuration. A [`Config`] value is built once from
//! the command line and threaded through all components by reference.

use std::path::PathBuf;
use std::time::Duration;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningMode {
    /// Stop after parsing the input files.
    Parse,
    /// Stop after building the normalized model.
    Normalize,
    /// Stop after grounding.
    Preprocess,
    /// Run the full pipeline.
    Plan,
}

/// How the grounder picks the next parameters of a schema to instantiate.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSelection {
    /// The parameter with the most occurrences in conditions.
    MostFrequent,
    /// The precondition whose instantiation yields the fewest new atoms.
    MinNew,
    /// The precondition with the most rigidly refuted instantiations.
    MaxRigid,
    /// Like `min-new` but without iterating instantiations.
    ApproxMinNew,
    /// Like `max-rigid` but without iterating instantiations.
    ApproxMaxRigid,
    /// The parameters of the first non-ground effect.
    FirstEffect,
}

/// Caching of rigidity and uselessness verdicts.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// No caching at all.
    None,
    /// Cache only confirmed verdicts.
    NoUnsuccessful,
    /// Cache confirmed and refuted verdicts. Refuted caches are cleared on
    /// every pruning round since prunings can make further atoms rigid.
    Unsuccessful,
}

impl CachePolicy {
    #[inline(always)]
    pub fn caches_successful(self) -> bool {
        self != Self::None
    }

    #[inline(always)]
    pub fn caches_unsuccessful(self) -> bool {
        self == Self::Unsuccessful
    }
}

/// How aggressively the grounder decides that a schema is unreachable.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruningPolicy {
    /// Instantiate lifted conditions to decide validity.
    Eager,
    /// Only judge conditions that are already ground.
    Trivial,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Sequential,
    Foreach,
    Exists,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverName {
    Cadical,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineName {
    /// Ground to the progress target, then solve with the remaining budget.
    Oneshot,
    /// Interleave grounding steps with time-sliced solver attempts.
    Interrupt,
    /// Ground to a fixed groundness and solve without a timeout.
    Fixed,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub domain_file: PathBuf,
    pub problem_file: PathBuf,
    pub mode: PlanningMode,
    pub plan_file: Option<PathBuf>,

    /// Overall wall-clock budget. `None` is unlimited.
    pub timeout: Option<Duration>,

    // Grounding
    pub parameter_selection: ParameterSelection,
    pub cache_policy: CachePolicy,
    pub pruning_policy: PruningPolicy,
    /// Groundness target in `[0, 1]`.
    pub preprocess_progress: f64,

    // Encoding
    pub encoding: Encoding,
    pub parameter_implies_action: bool,
    /// Number of non-unit DNF conjuncts above which helper variables are
    /// introduced during frame-axiom emission. `0` disables helpers.
    pub dnf_threshold: usize,

    // Solving
    pub solver: SolverName,
    pub engine: EngineName,
    /// Horizon growth factor, strictly greater than one.
    pub step_factor: f64,
    /// Maximum horizon. `0` is unlimited.
    pub max_steps: u32,
    /// Solver attempts in interrupt mode, at least two.
    pub num_solvers: u32,
    /// Budget of each non-final solver attempt in interrupt mode.
    pub solver_timeout: Duration,
    /// Worker threads; anything above one is accepted but unused.
    pub num_threads: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain_file: PathBuf::new(),
            problem_file: PathBuf::new(),
            mode: PlanningMode::Plan,
            plan_file: None,
            timeout: None,
            parameter_selection: ParameterSelection::MostFrequent,
            cache_policy: CachePolicy::Unsuccessful,
            pruning_policy: PruningPolicy::Eager,
            preprocess_progress: 1.0,
            encoding: Encoding::Foreach,
            parameter_implies_action: false,
            dnf_threshold: 16,
            solver: SolverName::Cadical,
            engine: EngineName::Oneshot,
            step_factor: 1.4,
            max_steps: 0,
            num_solvers: 2,
            solver_timeout: Duration::from_secs(120),
            num_threads: 1,
        }
    }
}
