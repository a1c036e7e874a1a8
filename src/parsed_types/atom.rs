//! Contains the [`Atom`] type.

use crate::parsed_types::Name;
use std::fmt::{Display, Formatter};

/// A predicate applied to a list of arguments. The argument type is generic:
/// atoms inside actions range over [`crate::parsed_types::Term`], atoms in
/// the initial state over [`Name`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Atom<T> {
    predicate_name: Name,
    values: Vec<T>,
}

impl<T> Atom<T> {
    pub fn new(predicate_name: Name, values: Vec<T>) -> Self {
        Self {
            predicate_name,
            values,
        }
    }

    pub fn predicate_name(&self) -> &Name {
        &self.predicate_name
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Display> Display for Atom<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.predicate_name)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        write!(f, ")")
    }
}
