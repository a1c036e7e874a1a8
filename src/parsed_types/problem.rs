//! Contains the [`Problem`] type.

use crate::parsed_types::{Condition, Literal, Name, Typed};
use std::fmt::{Display, Formatter};

/// A parsed problem instance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Problem {
    name: Name,
    domain: Name,
    requirements: Vec<Name>,
    objects: Vec<Typed<Name>>,
    init: Vec<Literal<Name>>,
    goal: Condition,
}

impl Problem {
    pub fn new(
        name: Name,
        domain: Name,
        requirements: Vec<Name>,
        objects: Vec<Typed<Name>>,
        init: Vec<Literal<Name>>,
        goal: Condition,
    ) -> Self {
        Self {
            name,
            domain,
            requirements,
            objects,
            init,
            goal,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn domain(&self) -> &Name {
        &self.domain
    }

    pub fn requirements(&self) -> &[Name] {
        &self.requirements
    }

    pub fn objects(&self) -> &[Typed<Name>] {
        &self.objects
    }

    pub fn init(&self) -> &[Literal<Name>] {
        &self.init
    }

    pub fn goal(&self) -> &Condition {
        &self.goal
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "(define (problem {})", self.name)?;
        writeln!(f, "  (:domain {})", self.domain)?;
        if !self.requirements.is_empty() {
            write!(f, "  (:requirements")?;
            for requirement in &self.requirements {
                write!(f, " :{}", requirement)?;
            }
            writeln!(f, ")")?;
        }
        if !self.objects.is_empty() {
            write!(f, "  (:objects")?;
            for object in &self.objects {
                write!(f, " {}", object)?;
            }
            writeln!(f, ")")?;
        }
        write!(f, "  (:init")?;
        for literal in &self.init {
            write!(f, " {}", literal)?;
        }
        writeln!(f, ")")?;
        writeln!(f, "  (:goal {})", self.goal)?;
        write!(f, ")")
    }
}
