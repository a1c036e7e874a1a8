//! Contains the [`ActionDefinition`] type.

use crate::parsed_types::{Condition, Effect, Name, Typed, Variable};
use std::fmt::{Display, Formatter};

/// A `(:action …)` block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ActionDefinition {
    name: Name,
    parameters: Vec<Typed<Variable>>,
    precondition: Option<Condition>,
    effect: Effect,
}

impl ActionDefinition {
    pub fn new(
        name: Name,
        parameters: Vec<Typed<Variable>>,
        precondition: Option<Condition>,
        effect: Effect,
    ) -> Self {
        Self {
            name,
            parameters,
            precondition,
            effect,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn parameters(&self) -> &[Typed<Variable>] {
        &self.parameters
    }

    pub fn precondition(&self) -> Option<&Condition> {
        self.precondition.as_ref()
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }
}

impl Display for ActionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(:action {}", self.name)?;
        write!(f, " :parameters (")?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, ")")?;
        if let Some(precondition) = &self.precondition {
            write!(f, " :precondition {}", precondition)?;
        }
        write!(f, " :effect {})", self.effect)
    }
}
