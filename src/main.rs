use clap::Parser;
use satplan::parsed_types::{Domain, Problem as ParsedProblem};
use satplan::parsers::Parser as _;
use satplan::planning::{
    engine, problem::normalize, CachePolicy, Config, Encoding, EngineName, Error, Grounder,
    ParameterSelection, PlanningMode, PruningPolicy, SolverName, Timer,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Exit code when a plan was found.
const EXIT_PLAN_FOUND: i32 = 0;
/// Exit code when no plan was found within the limits.
const EXIT_NO_PLAN: i32 = 1;
/// Exit code for bad input or solver failures.
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(version)]
/// A classical planner that reduces PDDL planning to a sequence of
/// incremental SAT queries.
struct Args {
    #[arg(help = "The PDDL domain file")]
    domain: PathBuf,
    #[arg(help = "The PDDL problem instance file")]
    problem: PathBuf,
    #[arg(
        value_enum,
        short = 'm',
        long = "mode",
        id = "MODE",
        default_value_t = PlanningMode::Plan,
        help = "How far to run the pipeline"
    )]
    mode: PlanningMode,
    #[arg(
        short = 't',
        long = "timeout",
        id = "SECONDS",
        default_value_t = 0,
        help = "Overall wall-clock timeout in seconds (0 = unlimited)"
    )]
    timeout: u64,
    #[arg(
        short = 'o',
        long = "plan-file",
        id = "PATH",
        help = "Write the plan to this file instead of stdout"
    )]
    plan_file: Option<PathBuf>,
    #[arg(
        value_enum,
        short = 'c',
        long = "selection",
        id = "STRATEGY",
        default_value_t = ParameterSelection::MostFrequent,
        help = "Parameter selection strategy for grounding"
    )]
    parameter_selection: ParameterSelection,
    #[arg(
        short = 'r',
        long = "progress",
        id = "FRACTION",
        default_value_t = 1.0,
        help = "Grounding progress target in [0, 1]"
    )]
    preprocess_progress: f64,
    #[arg(
        value_enum,
        short = 'e',
        long = "encoding",
        id = "ENCODING",
        default_value_t = Encoding::Foreach,
        help = "SAT encoding (sequential and exists fall back to foreach)"
    )]
    encoding: Encoding,
    #[arg(
        value_enum,
        short = 's',
        long = "solver",
        id = "SOLVER",
        default_value_t = SolverName::Cadical,
        help = "SAT solver adapter"
    )]
    solver: SolverName,
    #[arg(
        short = 'f',
        long = "step-factor",
        id = "FACTOR",
        default_value_t = 1.4,
        help = "Horizon growth factor, greater than 1"
    )]
    step_factor: f64,
    #[arg(
        short = 'l',
        long = "max-steps",
        id = "STEPS",
        default_value_t = 0,
        help = "Maximum horizon (0 = unlimited)"
    )]
    max_steps: u32,
    #[arg(
        short = 'i',
        long = "num-solvers",
        id = "ATTEMPTS",
        help = "Solver attempts in interrupt mode, at least 2; implies --engine interrupt"
    )]
    num_solvers: Option<u32>,
    #[arg(
        short = 'u',
        long = "solver-timeout",
        id = "SOLVERSECONDS",
        default_value_t = 120,
        help = "Budget of each non-final solver attempt in interrupt mode"
    )]
    solver_timeout: u64,
    #[arg(
        short = 'j',
        long = "num-threads",
        id = "THREADS",
        default_value_t = 1,
        help = "Worker threads for grounding"
    )]
    num_threads: u32,
    #[arg(
        short = 'd',
        long = "dnf-threshold",
        id = "THRESHOLD",
        default_value_t = 16,
        help = "Helper-variable threshold for frame-axiom DNF explosion"
    )]
    dnf_threshold: usize,
    #[arg(
        value_enum,
        short = 'g',
        long = "engine",
        id = "ENGINE",
        help = "Orchestration mode (defaults to oneshot)"
    )]
    engine: Option<EngineName>,
    #[arg(
        value_enum,
        long = "cache-policy",
        id = "CACHE",
        default_value_t = CachePolicy::Unsuccessful,
        help = "Caching of rigidity and uselessness verdicts"
    )]
    cache_policy: CachePolicy,
    #[arg(
        value_enum,
        long = "pruning-policy",
        id = "PRUNING",
        default_value_t = PruningPolicy::Eager,
        help = "How aggressively unreachable schemata are pruned"
    )]
    pruning_policy: PruningPolicy,
    #[arg(
        long = "parameter-implies-action",
        help = "Add clauses making chosen parameter values imply the action"
    )]
    parameter_implies_action: bool,
    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    verbose: bool,
}

fn build_config(args: &Args) -> Config {
    let mut preprocess_progress = args.preprocess_progress;
    if !(0.0..=1.0).contains(&preprocess_progress) {
        warn!("Grounding progress target should be within [0, 1]");
        preprocess_progress = preprocess_progress.clamp(0.0, 1.0);
    }
    let mut step_factor = args.step_factor;
    if step_factor <= 1.0 {
        warn!("Step factor should be greater than 1");
        step_factor = 1.0 + f64::EPSILON;
    }
    let num_solvers = match args.num_solvers {
        Some(num_solvers) if num_solvers < 2 => {
            warn!("Number of solvers should be at least 2");
            2
        }
        Some(num_solvers) => num_solvers,
        None => 2,
    };
    let engine = args.engine.unwrap_or(if args.num_solvers.is_some() {
        EngineName::Interrupt
    } else {
        EngineName::Oneshot
    });

    Config {
        domain_file: args.domain.clone(),
        problem_file: args.problem.clone(),
        mode: args.mode,
        plan_file: args.plan_file.clone(),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        parameter_selection: args.parameter_selection,
        cache_policy: args.cache_policy,
        pruning_policy: args.pruning_policy,
        preprocess_progress,
        encoding: args.encoding,
        parameter_implies_action: args.parameter_implies_action,
        dnf_threshold: args.dnf_threshold,
        solver: args.solver,
        engine,
        step_factor,
        max_steps: args.max_steps,
        num_solvers,
        solver_timeout: Duration::from_secs(args.solver_timeout),
        num_threads: args.num_threads,
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    let timer = Timer::start();
    let config = build_config(args);

    if config.num_threads > 1 {
        warn!("Parallel grounding is not available, running single-threaded");
    }
    if config.encoding != Encoding::Foreach {
        warn!("The {:?} encoding is not supported, using foreach", config.encoding);
    }

    let domain_text = match std::fs::read_to_string(&config.domain_file) {
        Ok(text) => text,
        Err(error) => {
            error!("Cannot read domain file: {}", error);
            return EXIT_ERROR;
        }
    };
    let problem_text = match std::fs::read_to_string(&config.problem_file) {
        Ok(text) => text,
        Err(error) => {
            error!("Cannot read problem file: {}", error);
            return EXIT_ERROR;
        }
    };

    let domain = match Domain::from_str(&domain_text) {
        Ok(domain) => domain,
        Err(error) => {
            error!("Failed to parse domain file: {:?}", error);
            return EXIT_ERROR;
        }
    };
    let parsed_problem = match ParsedProblem::from_str(&problem_text) {
        Ok(problem) => problem,
        Err(error) => {
            error!("Failed to parse problem file: {:?}", error);
            return EXIT_ERROR;
        }
    };
    info!(
        "Parsed domain '{}' ({} predicates, {} actions) and problem '{}' ({} objects)",
        domain.name(),
        domain.predicates().len(),
        domain.actions().len(),
        parsed_problem.name(),
        parsed_problem.objects().len()
    );
    if config.mode == PlanningMode::Parse {
        return EXIT_PLAN_FOUND;
    }

    let problem = match normalize(&domain, &parsed_problem) {
        Ok(problem) => problem,
        Err(error) => {
            error!("Invalid planning model: {}", error);
            return EXIT_ERROR;
        }
    };
    info!(
        "Normalized to {} schemata, {} init atoms, {} goal conditions",
        problem.actions.len(),
        problem.init.len(),
        problem.goal.len()
    );
    if config.mode == PlanningMode::Normalize {
        return EXIT_PLAN_FOUND;
    }

    if config.mode == PlanningMode::Preprocess {
        let mut grounder = Grounder::new(&problem, &config);
        return match grounder.refine(
            config.preprocess_progress,
            timer.deadline(config.timeout),
        ) {
            Ok(()) => {
                info!(
                    "Grounding reached {:.3} with {} schemata",
                    grounder.groundness(),
                    grounder.num_schemata()
                );
                EXIT_PLAN_FOUND
            }
            Err(_) => {
                info!("Grounding timed out");
                EXIT_NO_PLAN
            }
        };
    }

    match engine::run(&problem, &config, timer) {
        Ok((plan, residual)) => {
            let text = plan.to_text(&residual);
            info!(
                "Plan with {} steps found after {}",
                plan.len(),
                humantime::format_duration(round_seconds(timer.elapsed()))
            );
            match &config.plan_file {
                Some(path) => {
                    if let Err(error) = std::fs::write(path, &text) {
                        error!("Cannot write plan file: {}", error);
                        return EXIT_ERROR;
                    }
                }
                None => print!("{}", text),
            }
            EXIT_PLAN_FOUND
        }
        Err(Error::Timeout) | Err(Error::MaxStepsExceeded) => {
            info!("No plan found within the limits");
            EXIT_NO_PLAN
        }
        Err(error) => {
            error!("Planning failed: {}", error);
            EXIT_ERROR
        }
    }
}

fn round_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}
