//! Contains the [`Effect`] type.

use crate::parsed_types::{Literal, Name, Term};
use std::fmt::{Display, Formatter};

/// An action effect: a conjunction of literals. Positive literals add atoms
/// to the state, negative literals delete them. Conditional and quantified
/// sub-effects are recorded by keyword so normalization can reject them;
/// only the literal part of an effect is ever translated.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Effect {
    literals: Vec<Literal<Term>>,
    unsupported: Vec<Name>,
}

impl Effect {
    pub fn new(literals: Vec<Literal<Term>>) -> Self {
        Self {
            literals,
            unsupported: Vec::new(),
        }
    }

    pub fn with_unsupported(literals: Vec<Literal<Term>>, unsupported: Vec<Name>) -> Self {
        Self {
            literals,
            unsupported,
        }
    }

    pub fn literals(&self) -> &[Literal<Term>] {
        &self.literals
    }

    /// Keywords of recognized but unsupported sub-effects, with their
    /// source positions.
    pub fn unsupported(&self) -> &[Name] {
        &self.unsupported
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.unsupported.is_empty()
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.literals.len() == 1 && self.unsupported.is_empty() {
            return write!(f, "{}", self.literals[0]);
        }
        write!(f, "(and")?;
        for literal in &self.literals {
            write!(f, " {}", literal)?;
        }
        for name in &self.unsupported {
            write!(f, " ({})", name)?;
        }
        write!(f, ")")
    }
}
