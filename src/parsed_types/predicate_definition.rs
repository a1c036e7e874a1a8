//! Contains the [`PredicateDefinition`] type.

use crate::parsed_types::{Name, Typed, Variable};
use std::fmt::{Display, Formatter};

/// A predicate declaration from a `(:predicates …)` section.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PredicateDefinition {
    name: Name,
    variables: Vec<Typed<Variable>>,
}

impl PredicateDefinition {
    pub fn new(name: Name, variables: Vec<Typed<Variable>>) -> Self {
        Self { name, variables }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn variables(&self) -> &[Typed<Variable>] {
        &self.variables
    }
}

impl Display for PredicateDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.name)?;
        for variable in &self.variables {
            write!(f, " {}", variable)?;
        }
        write!(f, ")")
    }
}
