//! Contains the [`Domain`] type.

use crate::parsed_types::{ActionDefinition, Name, PredicateDefinition, Typed};
use std::fmt::{Display, Formatter};

/// A parsed domain definition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Domain {
    name: Name,
    requirements: Vec<Name>,
    types: Vec<Typed<Name>>,
    constants: Vec<Typed<Name>>,
    predicates: Vec<PredicateDefinition>,
    actions: Vec<ActionDefinition>,
}

impl Domain {
    pub fn builder(name: Name, actions: Vec<ActionDefinition>) -> Self {
        Self {
            name,
            requirements: vec![],
            types: vec![],
            constants: vec![],
            predicates: vec![],
            actions,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<Name>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_types(mut self, types: Vec<Typed<Name>>) -> Self {
        self.types = types;
        self
    }

    pub fn with_constants(mut self, constants: Vec<Typed<Name>>) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_predicates(mut self, predicates: Vec<PredicateDefinition>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn requirements(&self) -> &[Name] {
        &self.requirements
    }

    pub fn types(&self) -> &[Typed<Name>] {
        &self.types
    }

    pub fn constants(&self) -> &[Typed<Name>] {
        &self.constants
    }

    pub fn predicates(&self) -> &[PredicateDefinition] {
        &self.predicates
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "(define (domain {})", self.name)?;
        if !self.requirements.is_empty() {
            write!(f, "  (:requirements")?;
            for requirement in &self.requirements {
                write!(f, " :{}", requirement)?;
            }
            writeln!(f, ")")?;
        }
        if !self.types.is_empty() {
            write!(f, "  (:types")?;
            for r#type in &self.types {
                write!(f, " {}", r#type)?;
            }
            writeln!(f, ")")?;
        }
        if !self.constants.is_empty() {
            write!(f, "  (:constants")?;
            for constant in &self.constants {
                write!(f, " {}", constant)?;
            }
            writeln!(f, ")")?;
        }
        if !self.predicates.is_empty() {
            write!(f, "  (:predicates")?;
            for predicate in &self.predicates {
                write!(f, " {}", predicate)?;
            }
            writeln!(f, ")")?;
        }
        for action in &self.actions {
            writeln!(f, "  {}", action)?;
        }
        write!(f, ")")
    }
}
