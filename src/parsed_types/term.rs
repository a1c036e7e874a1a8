//! Contains the [`Term`] type.

use crate::parsed_types::{Name, Variable};
use std::fmt::{Display, Formatter};

/// An argument position inside an action: either a constant name or a
/// reference to one of the action's parameters.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    Name(Name),
    Variable(Variable),
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Name(name) => write!(f, "{}", name),
            Term::Variable(variable) => write!(f, "{}", variable),
        }
    }
}

impl From<Name> for Term {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}
