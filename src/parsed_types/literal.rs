//! Contains the [`Literal`] type.

use crate::parsed_types::Atom;
use std::fmt::{Display, Formatter};

/// A possibly negated [`Atom`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Literal<T> {
    Positive(Atom<T>),
    Negative(Atom<T>),
}

impl<T> Literal<T> {
    pub fn new(negated: bool, atom: Atom<T>) -> Self {
        if negated {
            Self::Negative(atom)
        } else {
            Self::Positive(atom)
        }
    }

    #[inline(always)]
    pub fn atom(&self) -> &Atom<T> {
        match self {
            Self::Positive(atom) => atom,
            Self::Negative(atom) => atom,
        }
    }

    #[inline(always)]
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Negative(_))
    }
}

impl<T: Display> Display for Literal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive(atom) => write!(f, "{}", atom),
            Self::Negative(atom) => write!(f, "(not {})", atom),
        }
    }
}
