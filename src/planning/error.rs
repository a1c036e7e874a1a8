//! Error types for the planning pipeline.

use crate::parsed_types::Name;
use thiserror::Error;

/// Renders the parse position of a name, when known, for error messages.
fn located(name: &Name) -> String {
    match name.location() {
        Some(location) => format!(" at {}", location),
        None => String::new(),
    }
}

/// Errors raised while turning the parsed AST into a normalized problem.
/// All of these abort with exit code 2. The offending symbols carry their
/// source position from parsing, which the messages report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate type definition '{}'{}", .0, located(.0))]
    DuplicateType(Name),
    #[error("duplicate constant definition '{}'{}", .0, located(.0))]
    DuplicateConstant(Name),
    #[error("duplicate predicate definition '{}'{}", .0, located(.0))]
    DuplicatePredicate(Name),
    #[error("duplicate parameter '?{}' in action '{}'{}", .0, .1, located(.0))]
    DuplicateParameter(Name, Name),
    #[error("unknown type '{}'{}", .0, located(.0))]
    UnknownType(Name),
    #[error("unknown predicate '{}'{}", .0, located(.0))]
    UnknownPredicate(Name),
    #[error("unknown constant or object '{}'{}", .0, located(.0))]
    UnknownConstant(Name),
    #[error("variable '?{}' is not a parameter of action '{}'{}", .0, .1, located(.0))]
    UnknownVariable(Name, Name),
    #[error("variable '?{}' used outside an action{}", .0, located(.0))]
    VariableOutsideAction(Name),
    #[error("predicate '{}' expects {} arguments, got {}{}", .0, .1, .2, located(.0))]
    ArityMismatch(Name, usize, usize),
    #[error(
        "argument '{}' of predicate '{}' is not a subtype of the declared parameter type{}",
        .0, .1, located(.0)
    )]
    ArgumentTypeMismatch(Name, Name),
    #[error("cyclic type hierarchy involving '{}'{}", .0, located(.0))]
    CyclicTypeHierarchy(Name),
    #[error("equality cannot appear in an effect of action '{}'{}", .0, located(.0))]
    EqualityInEffect(Name),
    #[error("the '{}' construct is not supported{}", .0, located(.0))]
    UnsupportedConstruct(Name),
    #[error("contradictory init: '{}' occurs both positively and negated{}", .0, located(.1))]
    ContradictoryInit(String, Name),
    #[error("mismatched domain name: problem expects '{}'{}, domain defines '{}'", .0, located(.0), .1)]
    DomainMismatch(Name, Name),
    #[error("disjunctive goals are not supported")]
    DisjunctiveGoal,
}

/// Errors raised by the planning phases once the model is built.
#[derive(Debug, Error)]
pub enum Error {
    #[error("planning timed out")]
    Timeout,
    #[error("maximum number of steps exceeded")]
    MaxStepsExceeded,
    #[error("solver error: {0}")]
    Solver(String),
}
