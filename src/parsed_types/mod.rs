//! Abstract syntax for the supported PDDL subset, as produced by
//! [`crate::parsers`].

mod action_definition;
mod atom;
mod condition;
mod domain;
mod effect;
mod literal;
mod name;
mod predicate_definition;
mod problem;
mod term;
mod typed;
mod variable;

pub use action_definition::ActionDefinition;
pub use atom::Atom;
pub use condition::Condition;
pub use domain::Domain;
pub use effect::Effect;
pub use literal::Literal;
pub use name::{Location, Name};
pub use predicate_definition::PredicateDefinition;
pub use problem::Problem;
pub use term::Term;
pub use typed::{Typed, OBJECT_TYPE};
pub use variable::Variable;
