//! Contains the [`Variable`] type.

use crate::parsed_types::Name;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// A variable name, i.e. a name with a `?` prefix in the source. The wrapped
/// [`Name`] does not include the prefix.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Variable(Name);

impl Variable {
    pub fn new(name: Name) -> Self {
        Self(name)
    }

    pub fn from_str(name: &str) -> Self {
        Self(Name::new(name))
    }

    pub fn name(&self) -> &Name {
        &self.0
    }
}

impl Deref for Variable {
    type Target = Name;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.0)
    }
}
