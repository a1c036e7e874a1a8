//! Turns the parsed AST into a normalized [`Problem`]: preconditions become
//! conjunctions of literals (one schema per DNF disjunct), effects become
//! conjunctions of literals, `(= x y)` is lowered onto the reserved equality
//! predicate, and the model is validated along the way.

use crate::parsed_types::{
    ActionDefinition, Atom as ParsedAtom, Domain, Literal, Name, Problem as ParsedProblem, Term,
    Typed, OBJECT_TYPE,
};
use crate::parsers::EQUALITY_NAME;
use crate::planning::problem::utils::is_subtype_in;
use crate::planning::problem::{
    Action, Argument, Atom, Constant, ConstantIndex, ConstantTuple, Condition, GroundAtom,
    GroundCondition, Parameter, ParameterIndex, Predicate, PredicateIndex, Problem, Type,
    TypeIndex, EQUALITY_PREDICATE, ROOT_TYPE,
};
use crate::planning::ModelError;
use std::collections::HashMap;
use tracing::{info, warn};

/// Symbol tables shared by all resolution steps.
struct Normalizer {
    types: Vec<Type>,
    type_table: HashMap<Name, TypeIndex>,
    constants: Vec<Constant>,
    constant_table: HashMap<Name, ConstantIndex>,
    predicates: Vec<Predicate>,
    predicate_table: HashMap<Name, PredicateIndex>,
}

pub fn normalize(domain: &Domain, problem: &ParsedProblem) -> Result<Problem, ModelError> {
    if problem.domain() != domain.name() {
        return Err(ModelError::DomainMismatch(
            problem.domain().clone(),
            domain.name().clone(),
        ));
    }

    let mut normalizer = Normalizer::new();
    normalizer.add_types(domain.types())?;
    normalizer.add_constants(domain.constants())?;
    normalizer.add_constants(problem.objects())?;
    normalizer.add_predicates(domain.predicates())?;

    let mut actions = Vec::new();
    for action in domain.actions() {
        actions.extend(normalizer.normalize_action(action)?);
    }

    let init = normalizer.normalize_init(problem.init())?;
    let goal = normalizer.normalize_goal(problem)?;

    let (constants_of_type, constant_type_map) = normalizer.constants_by_type();

    Ok(Problem {
        domain_name: domain.name().clone(),
        problem_name: problem.name().clone(),
        requirements: domain.requirements().to_vec(),
        types: normalizer.types,
        constants: normalizer.constants,
        constants_of_type,
        constant_type_map,
        predicates: normalizer.predicates,
        actions,
        init,
        goal,
    })
}

impl Normalizer {
    fn new() -> Self {
        let root = Type {
            name: Name::new(OBJECT_TYPE),
            supertype: ROOT_TYPE,
        };
        let equality = Predicate {
            name: Name::new(EQUALITY_NAME),
            parameter_types: vec![ROOT_TYPE, ROOT_TYPE],
        };
        Self {
            type_table: HashMap::from([(root.name.clone(), ROOT_TYPE)]),
            types: vec![root],
            constants: Vec::new(),
            constant_table: HashMap::new(),
            predicate_table: HashMap::from([(equality.name.clone(), EQUALITY_PREDICATE)]),
            predicates: vec![equality],
        }
    }

    fn register_type(&mut self, name: &Name) -> TypeIndex {
        if let Some(&index) = self.type_table.get(name) {
            return index;
        }
        let index = TypeIndex(self.types.len());
        self.types.push(Type {
            name: name.clone(),
            supertype: ROOT_TYPE,
        });
        self.type_table.insert(name.clone(), index);
        index
    }

    fn add_types(&mut self, types: &[Typed<Name>]) -> Result<(), ModelError> {
        // Declared names first so that forward references to supertypes
        // resolve; supertypes never declared themselves become children of
        // the root.
        for typed in types {
            if *typed.value() == OBJECT_TYPE {
                continue;
            }
            if self.type_table.contains_key(typed.value()) {
                return Err(ModelError::DuplicateType(typed.value().clone()));
            }
            self.register_type(typed.value());
        }
        for typed in types {
            // The root cannot be reparented.
            if *typed.value() == OBJECT_TYPE {
                continue;
            }
            let index = self.type_table[typed.value()];
            let supertype = self.register_type(typed.type_());
            self.types[index.0].supertype = supertype;
        }

        // Following supertype links must terminate at the root.
        for index in 0..self.types.len() {
            let mut current = TypeIndex(index);
            for _ in 0..=self.types.len() {
                let supertype = self.types[current.0].supertype;
                if supertype == current {
                    break;
                }
                current = supertype;
            }
            if self.types[current.0].supertype != current {
                return Err(ModelError::CyclicTypeHierarchy(
                    self.types[index].name.clone(),
                ));
            }
        }
        Ok(())
    }

    fn add_constants(&mut self, constants: &[Typed<Name>]) -> Result<(), ModelError> {
        for typed in constants {
            if self.constant_table.contains_key(typed.value()) {
                return Err(ModelError::DuplicateConstant(typed.value().clone()));
            }
            let r#type = self.resolve_type(typed.type_())?;
            let index = ConstantIndex(self.constants.len());
            self.constants.push(Constant {
                name: typed.value().clone(),
                r#type,
            });
            self.constant_table.insert(typed.value().clone(), index);
        }
        Ok(())
    }

    fn add_predicates(
        &mut self,
        predicates: &[crate::parsed_types::PredicateDefinition],
    ) -> Result<(), ModelError> {
        for definition in predicates {
            if self.predicate_table.contains_key(definition.name()) {
                return Err(ModelError::DuplicatePredicate(definition.name().clone()));
            }
            let parameter_types = definition
                .variables()
                .iter()
                .map(|variable| self.resolve_type(variable.type_()))
                .collect::<Result<Vec<_>, _>>()?;
            let index = PredicateIndex(self.predicates.len());
            self.predicates.push(Predicate {
                name: definition.name().clone(),
                parameter_types,
            });
            self.predicate_table.insert(definition.name().clone(), index);
        }
        Ok(())
    }

    fn resolve_type(&self, name: &Name) -> Result<TypeIndex, ModelError> {
        self.type_table
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownType(name.clone()))
    }

    fn resolve_predicate(&self, name: &Name) -> Result<PredicateIndex, ModelError> {
        self.predicate_table
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownPredicate(name.clone()))
    }

    fn resolve_constant(&self, name: &Name) -> Result<ConstantIndex, ModelError> {
        self.constant_table
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownConstant(name.clone()))
    }

    /// Resolves an atom occurring inside an action body.
    fn resolve_atom(
        &self,
        atom: &ParsedAtom<Term>,
        action: &Name,
        parameter_table: &HashMap<Name, ParameterIndex>,
        parameters: &[Parameter],
    ) -> Result<Atom, ModelError> {
        let predicate = self.resolve_predicate(atom.predicate_name())?;
        let declared = &self.predicates[predicate.0].parameter_types;
        if declared.len() != atom.values().len() {
            return Err(ModelError::ArityMismatch(
                atom.predicate_name().clone(),
                declared.len(),
                atom.values().len(),
            ));
        }

        let mut arguments = Vec::with_capacity(atom.values().len());
        for (term, &declared_type) in atom.values().iter().zip(declared) {
            match term {
                Term::Name(name) => {
                    let constant = self.resolve_constant(name)?;
                    if !is_subtype_in(&self.types, self.constants[constant.0].r#type, declared_type)
                    {
                        return Err(ModelError::ArgumentTypeMismatch(
                            name.clone(),
                            atom.predicate_name().clone(),
                        ));
                    }
                    arguments.push(Argument::Constant(constant));
                }
                Term::Variable(variable) => {
                    let &parameter = parameter_table.get(variable.name()).ok_or_else(|| {
                        ModelError::UnknownVariable(variable.name().clone(), action.clone())
                    })?;
                    let parameter_type = parameters[parameter.0]
                        .type_()
                        .expect("parameters are free before grounding");
                    if !is_subtype_in(&self.types, parameter_type, declared_type) {
                        return Err(ModelError::ArgumentTypeMismatch(
                            variable.name().clone(),
                            atom.predicate_name().clone(),
                        ));
                    }
                    arguments.push(Argument::Parameter(parameter));
                }
            }
        }
        Ok(Atom {
            predicate,
            arguments,
        })
    }

    /// Resolves an atom whose arguments are plain names (init and goal).
    fn resolve_ground_atom(&self, atom: &ParsedAtom<Name>) -> Result<GroundAtom, ModelError> {
        let predicate = self.resolve_predicate(atom.predicate_name())?;
        let declared = &self.predicates[predicate.0].parameter_types;
        if declared.len() != atom.values().len() {
            return Err(ModelError::ArityMismatch(
                atom.predicate_name().clone(),
                declared.len(),
                atom.values().len(),
            ));
        }
        let mut arguments = ConstantTuple::new();
        for (name, &declared_type) in atom.values().iter().zip(declared) {
            let constant = self.resolve_constant(name)?;
            if !is_subtype_in(&self.types, self.constants[constant.0].r#type, declared_type) {
                return Err(ModelError::ArgumentTypeMismatch(
                    name.clone(),
                    atom.predicate_name().clone(),
                ));
            }
            arguments.push(constant);
        }
        Ok(GroundAtom {
            predicate,
            arguments,
        })
    }

    /// Normalizes one parsed action into zero or more schemata: one per
    /// disjunct of the precondition's DNF. Actions without effects are
    /// dropped; recognized but unsupported constructs are rejected by
    /// keyword before any flattening.
    fn normalize_action(&self, action: &ActionDefinition) -> Result<Vec<Action>, ModelError> {
        if let Some(name) = action
            .precondition()
            .and_then(|condition| condition.find_unsupported())
        {
            return Err(ModelError::UnsupportedConstruct(name.clone()));
        }
        if let Some(name) = action.effect().unsupported().first() {
            return Err(ModelError::UnsupportedConstruct(name.clone()));
        }

        let mut parameter_table: HashMap<Name, ParameterIndex> = HashMap::new();
        let mut parameters = Vec::with_capacity(action.parameters().len());
        for (index, parameter) in action.parameters().iter().enumerate() {
            if parameter_table
                .insert(parameter.value().name().clone(), ParameterIndex(index))
                .is_some()
            {
                return Err(ModelError::DuplicateParameter(
                    parameter.value().name().clone(),
                    action.name().clone(),
                ));
            }
            parameters.push(Parameter::Free(self.resolve_type(parameter.type_())?));
        }

        let mut effects = Vec::new();
        for literal in action.effect().literals() {
            if *literal.atom().predicate_name() == EQUALITY_NAME {
                return Err(ModelError::EqualityInEffect(action.name().clone()));
            }
            effects.push(Condition {
                atom: self.resolve_atom(
                    literal.atom(),
                    action.name(),
                    &parameter_table,
                    &parameters,
                )?,
                positive: !literal.is_negated(),
            });
        }
        if effects.is_empty() {
            warn!("Dropping action '{}': it has no effects", action.name());
            return Ok(vec![]);
        }

        let disjuncts: Vec<Vec<Literal<Term>>> = match action.precondition() {
            Some(condition) => condition.to_dnf(),
            None => vec![vec![]],
        };
        if disjuncts.len() > 1 {
            info!(
                "Action '{}' splits into {} schemata by precondition DNF",
                action.name(),
                disjuncts.len()
            );
        }

        let mut schemata = Vec::with_capacity(disjuncts.len());
        for disjunct in &disjuncts {
            let mut preconditions = Vec::with_capacity(disjunct.len());
            for literal in disjunct {
                preconditions.push(Condition {
                    atom: self.resolve_atom(
                        literal.atom(),
                        action.name(),
                        &parameter_table,
                        &parameters,
                    )?,
                    positive: !literal.is_negated(),
                });
            }
            schemata.push(Action {
                name: action.name().clone(),
                parameters: parameters.clone(),
                preconditions,
                pre_instantiated: Vec::new(),
                effects: effects.clone(),
                eff_instantiated: Vec::new(),
            });
        }
        Ok(schemata)
    }

    fn normalize_init(&self, init: &[Literal<Name>]) -> Result<Vec<GroundAtom>, ModelError> {
        let mut positive: Vec<GroundAtom> = Vec::new();
        let mut negative: Vec<(GroundAtom, Name)> = Vec::new();
        for literal in init {
            let atom = self.resolve_ground_atom(literal.atom())?;
            if literal.is_negated() {
                if negative.iter().any(|(existing, _)| *existing == atom) {
                    warn!("Duplicate init atom '{}'", literal.atom());
                } else {
                    negative.push((atom, literal.atom().predicate_name().clone()));
                }
            } else if positive.contains(&atom) {
                warn!("Duplicate init atom '{}'", literal.atom());
            } else {
                positive.push(atom);
            }
        }

        for (atom, occurrence) in &negative {
            if positive.contains(atom) {
                return Err(ModelError::ContradictoryInit(
                    self.ground_atom_name(atom),
                    occurrence.clone(),
                ));
            }
        }
        // Negated init atoms are redundant under the closed-world reading
        // once consistency is established.

        // Equality atoms (c, c) are part of every initial state.
        for index in 0..self.constants.len() {
            positive.push(GroundAtom {
                predicate: EQUALITY_PREDICATE,
                arguments: ConstantTuple::from_slice(&[
                    ConstantIndex(index),
                    ConstantIndex(index),
                ]),
            });
        }
        Ok(positive)
    }

    fn normalize_goal(&self, problem: &ParsedProblem) -> Result<Vec<GroundCondition>, ModelError> {
        if let Some(name) = problem.goal().find_unsupported() {
            return Err(ModelError::UnsupportedConstruct(name.clone()));
        }
        let disjuncts = problem.goal().to_dnf();
        if disjuncts.len() != 1 {
            return Err(ModelError::DisjunctiveGoal);
        }

        let mut goal = Vec::with_capacity(disjuncts[0].len());
        for literal in &disjuncts[0] {
            let mut names = Vec::with_capacity(literal.atom().values().len());
            for term in literal.atom().values() {
                match term {
                    Term::Name(name) => names.push(name.clone()),
                    Term::Variable(variable) => {
                        return Err(ModelError::VariableOutsideAction(variable.name().clone()))
                    }
                }
            }
            let atom = ParsedAtom::new(literal.atom().predicate_name().clone(), names);
            goal.push(GroundCondition {
                atom: self.resolve_ground_atom(&atom)?,
                positive: !literal.is_negated(),
            });
        }
        Ok(goal)
    }

    fn ground_atom_name(&self, atom: &GroundAtom) -> String {
        let mut result = format!("({}", self.predicates[atom.predicate.0].name);
        for &argument in &atom.arguments {
            result.push(' ');
            result.push_str(&self.constants[argument.0].name);
        }
        result.push(')');
        result
    }

    /// Subtype-expanded constants-of-type tables.
    fn constants_by_type(
        &self,
    ) -> (Vec<Vec<ConstantIndex>>, Vec<HashMap<ConstantIndex, usize>>) {
        let mut constants_of_type = vec![Vec::new(); self.types.len()];
        let mut constant_type_map = vec![HashMap::new(); self.types.len()];
        for (type_index, (of_type, type_map)) in constants_of_type
            .iter_mut()
            .zip(&mut constant_type_map)
            .enumerate()
        {
            for (constant_index, constant) in self.constants.iter().enumerate() {
                if is_subtype_in(&self.types, constant.r#type, TypeIndex(type_index)) {
                    type_map.insert(ConstantIndex(constant_index), of_type.len());
                    of_type.push(ConstantIndex(constant_index));
                }
            }
        }
        (constants_of_type, constant_type_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parser;
    use crate::test_utils::*;

    fn normalized(domain: &str, problem: &str) -> Result<Problem, ModelError> {
        let domain = Domain::from_str(domain).expect("domain should parse");
        let problem = ParsedProblem::from_str(problem).expect("problem should parse");
        normalize(&domain, &problem)
    }

    #[test]
    fn blocksworld_normalizes() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM).unwrap();

        // object + block
        assert_eq!(problem.types.len(), 2);
        // equality + on + clear + ontable + holding + handempty
        assert_eq!(problem.predicates.len(), 6);
        assert_eq!(problem.constants.len(), 3);
        assert_eq!(problem.actions.len(), 4);
        // 6 declared atoms + 3 equality atoms
        assert_eq!(problem.init.len(), 9);
        assert_eq!(problem.goal.len(), 2);
    }

    #[test]
    fn constants_of_type_expand_subtypes() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM).unwrap();

        let block = TypeIndex(1);
        assert_eq!(problem.constants_of_type(block).len(), 3);
        // Blocks are objects too.
        assert_eq!(problem.constants_of_type(ROOT_TYPE).len(), 3);
        assert_eq!(
            problem.constant_position(ConstantIndex(2), block),
            2
        );
    }

    #[test]
    fn disjunctive_preconditions_split_schemata() {
        let domain = r#"
        (define (domain d)
            (:predicates (p ?x) (q ?x) (r ?x))
            (:action a
                :parameters (?x)
                :precondition (or (p ?x) (q ?x))
                :effect (r ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o))
            (:goal (r o)))"#;

        let problem = normalized(domain, problem).unwrap();
        assert_eq!(problem.actions.len(), 2);
        assert_eq!(problem.actions[0].name, problem.actions[1].name);
        assert_eq!(problem.actions[0].preconditions.len(), 1);
    }

    #[test]
    fn actions_without_effects_are_dropped() {
        let domain = r#"
        (define (domain d)
            (:predicates (p ?x))
            (:action a :parameters (?x) :effect (and)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o))
            (:goal (p o)))"#;

        let problem = normalized(domain, problem).unwrap();
        assert!(problem.actions.is_empty());
    }

    #[test]
    fn contradictory_init_is_rejected() {
        let domain = r#"
        (define (domain d) (:predicates (p ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o) (not (p o)))
            (:goal (p o)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::ContradictoryInit(_, _))
        ));
    }

    #[test]
    fn quantified_preconditions_are_rejected() {
        let domain = r#"
        (define (domain d)
            (:predicates (p ?x) (q ?x))
            (:action a
                :parameters (?x)
                :precondition (forall (?y) (p ?y))
                :effect (q ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o))
            (:goal (q o)))"#;

        match normalized(domain, problem) {
            Err(ModelError::UnsupportedConstruct(name)) => {
                assert_eq!(name, "forall");
                assert!(name.location().is_some());
            }
            other => panic!("expected an unsupported-construct error, got {:?}", other),
        }
    }

    #[test]
    fn conditional_effects_are_rejected() {
        let domain = r#"
        (define (domain d)
            (:predicates (p ?x) (q ?x))
            (:action a
                :parameters (?x)
                :precondition (p ?x)
                :effect (and (q ?x) (when (q ?x) (not (p ?x))))))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o))
            (:goal (q o)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn model_errors_carry_source_locations() {
        let domain = r#"(define (domain d) (:predicates (p ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (q o))
            (:goal (p o)))"#;

        match normalized(domain, problem) {
            Err(ModelError::UnknownPredicate(name)) => {
                let location = name.location().expect("parsed names carry locations");
                assert_eq!(location.line, 4);
            }
            other => panic!("expected an unknown-predicate error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_references_are_rejected() {
        let domain = r#"
        (define (domain d) (:predicates (p ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (q o))
            (:goal (p o)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::UnknownPredicate(_))
        ));
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let domain = r#"
        (define (domain d) (:predicates (p ?x)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (p o o))
            (:goal (p o)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::ArityMismatch(_, 1, 2))
        ));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let domain = r#"
        (define (domain d)
            (:types block table)
            (:predicates (on ?x - block ?y - table)))"#;
        let problem = r#"
        (define (problem i) (:domain d)
            (:objects b - block t - table)
            (:init (on t b))
            (:goal (on b t)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::ArgumentTypeMismatch(_, _))
        ));
    }

    #[test]
    fn equality_is_reserved() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM).unwrap();
        assert_eq!(problem.predicates[0].name, "=");
        assert_eq!(problem.predicates[0].arity(), 2);
        // (= a a), (= b b), (= c c) appended to init
        assert!(problem
            .init
            .iter()
            .filter(|atom| atom.predicate == EQUALITY_PREDICATE)
            .all(|atom| atom.arguments[0] == atom.arguments[1]));
    }

    #[test]
    fn domain_mismatch_is_rejected() {
        let domain = r#"(define (domain d) (:predicates (p)))"#;
        let problem = r#"
        (define (problem i) (:domain other)
            (:init (p))
            (:goal (p)))"#;

        assert!(matches!(
            normalized(domain, problem),
            Err(ModelError::DomainMismatch(_, _))
        ));
    }
}
