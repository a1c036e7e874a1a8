//! Contains typed elements.

use crate::parsed_types::Name;
use std::fmt::{Display, Formatter};

/// The type every object belongs to, and the root of every type hierarchy.
pub const OBJECT_TYPE: &str = "object";

/// An element together with its (primitive) type. Elements without an
/// explicit type in the source default to `object`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Typed<O> {
    value: O,
    r#type: Name,
}

impl<O> Typed<O> {
    pub fn new(value: O, r#type: Name) -> Self {
        Self { value, r#type }
    }

    pub fn new_object(value: O) -> Self {
        Self::new(value, Name::new(OBJECT_TYPE))
    }

    pub fn value(&self) -> &O {
        &self.value
    }

    pub fn type_(&self) -> &Name {
        &self.r#type
    }
}

impl<O: Display> Display for Typed<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.value, self.r#type)
    }
}
