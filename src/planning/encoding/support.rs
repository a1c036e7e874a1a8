//! The support index: for every reachable ground atom, which (schema,
//! partial substitution) pairs read or write it, in which polarity.

use crate::planning::problem::utils::{
    get_assignment, get_mapping, instantiate, num_instantiations_of_predicate,
};
use crate::planning::problem::{
    ActionIndex, Argument, GroundAtom, ParameterAssignment, Problem,
};
use crate::planning::CartesianProduct;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Dense id of a ground atom, interned on first use. Ids stay below the
/// total instantiation count `Σ_p Π_t |constants_of_type(t)|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroundAtomId(pub usize);

#[derive(Debug, Clone, Default)]
pub struct ConditionSupport {
    pub pos_precondition: Vec<(ActionIndex, ParameterAssignment)>,
    pub neg_precondition: Vec<(ActionIndex, ParameterAssignment)>,
    pub pos_effect: Vec<(ActionIndex, ParameterAssignment)>,
    pub neg_effect: Vec<(ActionIndex, ParameterAssignment)>,
}

impl ConditionSupport {
    fn select(&mut self, positive: bool, is_effect: bool) -> &mut Vec<(ActionIndex, ParameterAssignment)> {
        match (positive, is_effect) {
            (true, true) => &mut self.pos_effect,
            (true, false) => &mut self.pos_precondition,
            (false, true) => &mut self.neg_effect,
            (false, false) => &mut self.neg_precondition,
        }
    }
}

#[derive(Debug)]
pub struct Support<'a> {
    problem: &'a Problem,
    num_instantiations: usize,
    init: HashSet<GroundAtomId>,
    ids: RefCell<HashMap<GroundAtom, GroundAtomId>>,
    condition_supports: Vec<ConditionSupport>,
}

impl<'a> Support<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        let num_instantiations = problem
            .predicates
            .iter()
            .map(|predicate| num_instantiations_of_predicate(predicate, problem) as usize)
            .sum();

        let mut support = Self {
            problem,
            num_instantiations,
            init: HashSet::with_capacity(problem.init.len()),
            ids: RefCell::new(HashMap::with_capacity(problem.init.len())),
            condition_supports: vec![ConditionSupport::default(); num_instantiations],
        };

        for atom in &problem.init {
            let id = support.get_id(atom);
            support.init.insert(id);
        }
        support.set_supports();
        debug!(
            "Support index over {} potential ground atoms built",
            num_instantiations
        );
        support
    }

    #[inline(always)]
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    #[inline(always)]
    pub fn num_instantiations(&self) -> usize {
        self.num_instantiations
    }

    /// Interns the atom on first use and returns its dense id.
    pub fn get_id(&self, atom: &GroundAtom) -> GroundAtomId {
        let mut ids = self.ids.borrow_mut();
        let next = GroundAtomId(ids.len());
        *ids.entry(atom.clone()).or_insert(next)
    }

    pub fn support(
        &self,
        id: GroundAtomId,
        positive: bool,
        is_effect: bool,
    ) -> &[(ActionIndex, ParameterAssignment)] {
        let buckets = &self.condition_supports[id.0];
        match (positive, is_effect) {
            (true, true) => &buckets.pos_effect,
            (true, false) => &buckets.pos_precondition,
            (false, true) => &buckets.neg_effect,
            (false, false) => &buckets.neg_precondition,
        }
    }

    #[inline(always)]
    pub fn is_init(&self, id: GroundAtomId) -> bool {
        self.init.contains(&id)
    }

    /// An atom is rigid in a polarity when no schema can push it towards the
    /// opposite polarity and its initial value matches.
    pub fn is_rigid(&self, id: GroundAtomId, positive: bool) -> bool {
        let effects = if positive {
            &self.condition_supports[id.0].neg_effect
        } else {
            &self.condition_supports[id.0].pos_effect
        };
        effects.is_empty() && self.is_init(id) == positive
    }

    fn set_supports(&mut self) {
        let problem = self.problem;
        for (index, action) in problem.actions.iter().enumerate() {
            let action_index = ActionIndex(index);

            for is_effect in [true, false] {
                let instantiated = if is_effect {
                    &action.eff_instantiated
                } else {
                    &action.pre_instantiated
                };
                for condition in instantiated {
                    let id = self.get_id(&condition.atom);
                    self.condition_supports[id.0]
                        .select(condition.positive, is_effect)
                        .push((action_index, ParameterAssignment::new()));
                }

                let lifted = if is_effect {
                    &action.effects
                } else {
                    &action.preconditions
                };
                for condition in lifted {
                    let mapping = get_mapping(action, &condition.atom);
                    let sizes = mapping
                        .parameters
                        .iter()
                        .map(|&parameter| {
                            let r#type = action
                                .parameter(parameter)
                                .type_()
                                .expect("mapped parameter must be free");
                            problem.constants_of_type(r#type).len()
                        })
                        .collect();
                    for combination in CartesianProduct::new(sizes) {
                        let constants: Vec<_> = combination
                            .iter()
                            .enumerate()
                            .map(|(position, &choice)| {
                                let r#type = action
                                    .parameter(mapping.parameters[position])
                                    .type_()
                                    .expect("mapped parameter must be free");
                                problem.constants_of_type(r#type)[choice]
                            })
                            .collect();

                        let mut instance = condition.atom.clone();
                        for (position, &constant) in constants.iter().enumerate() {
                            for &argument_position in &mapping.argument_positions[position] {
                                instance.arguments[argument_position] =
                                    Argument::Constant(constant);
                            }
                        }
                        let id = self.get_id(&instantiate(&instance));
                        let assignment = get_assignment(&mapping, &constants);
                        self.condition_supports[id.0]
                            .select(condition.positive, is_effect)
                            .push((action_index, assignment));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::{Domain, Problem as ParsedProblem};
    use crate::parsers::Parser;
    use crate::planning::problem::{normalize, ConstantIndex, ParameterIndex, PredicateIndex};
    use crate::test_utils::*;

    fn normalized(domain: &str, problem: &str) -> Problem {
        let domain = Domain::from_str(domain).expect("domain should parse");
        let problem = ParsedProblem::from_str(problem).expect("problem should parse");
        normalize(&domain, &problem).expect("normalization should succeed")
    }

    fn on(x: usize, y: usize) -> GroundAtom {
        GroundAtom {
            predicate: PredicateIndex(1),
            arguments: [ConstantIndex(x), ConstantIndex(y)].into_iter().collect(),
        }
    }

    #[test]
    fn instantiation_count_is_typed() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let support = Support::new(&problem);
        // equality over 3 objects plus `on` over 3 blocks: 9 + 9.
        assert_eq!(support.num_instantiations(), 18);
    }

    #[test]
    fn effect_support_lists_all_producers() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let support = Support::new(&problem);

        // (on a c) is produced by the lifted (move ?x ?y ?z) through its
        // effect (on ?x ?z); the assignment fixes exactly ?x and ?z, while
        // ?y stays unmentioned.
        let id = support.get_id(&on(0, 2));
        let producers = support.support(id, true, true);
        assert_eq!(producers.len(), 1);
        let (action, assignment) = &producers[0];
        assert_eq!(*action, ActionIndex(0));
        assert_eq!(
            assignment,
            &vec![
                (ParameterIndex(0), ConstantIndex(0)),
                (ParameterIndex(2), ConstantIndex(2)),
            ]
        );
    }

    #[test]
    fn precondition_support_lists_all_consumers() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let support = Support::new(&problem);

        // (on a b) is read by the precondition (on ?x ?y), with ?x and ?y
        // fixed by the atom.
        let id = support.get_id(&on(0, 1));
        let consumers = support.support(id, true, false);
        assert_eq!(consumers.len(), 1);
        assert_eq!(consumers[0].1.len(), 2);
    }

    #[test]
    fn support_closure_holds() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM);
        let support = Support::new(&problem);

        let ids: Vec<(GroundAtom, GroundAtomId)> = support
            .ids
            .borrow()
            .iter()
            .map(|(atom, id)| (atom.clone(), *id))
            .collect();
        for (atom, id) in ids {
            for (action_index, assignment) in support.support(id, true, true) {
                let action = problem.action(*action_index);
                // Some positive effect of the schema unifies with the atom
                // under the recorded assignment.
                let matches = action.effects.iter().any(|effect| {
                    effect.positive
                        && effect.atom.predicate == atom.predicate
                        && crate::planning::problem::utils::is_instantiatable(
                            &effect.atom,
                            &atom.arguments,
                            &crate::planning::problem::utils::ground(assignment, action),
                            &problem,
                        )
                }) || action
                    .eff_instantiated
                    .iter()
                    .any(|effect| effect.positive && effect.atom == atom);
                assert!(matches, "no effect of {:?} supports {:?}", action.name, atom);
            }
        }
    }

    #[test]
    fn rigidity_follows_effect_support() {
        let problem = normalized(RIGID_DOMAIN, RIGID_PROBLEM);
        let support = Support::new(&problem);

        let handempty = GroundAtom {
            predicate: PredicateIndex(1),
            arguments: Default::default(),
        };
        let p = GroundAtom {
            predicate: PredicateIndex(2),
            arguments: [ConstantIndex(0)].into_iter().collect(),
        };
        assert!(support.is_rigid(support.get_id(&handempty), true));
        assert!(!support.is_rigid(support.get_id(&handempty), false));
        assert!(!support.is_rigid(support.get_id(&p), true));
    }
}
