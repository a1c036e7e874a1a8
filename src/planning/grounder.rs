//! The partial-instantiation engine. The grounder refines action schemata by
//! binding selected parameters to constants, pruning candidates that can
//! never fire (rigidity analysis) or whose effects nobody reads (uselessness
//! analysis), until a caller-chosen groundness fraction is reached or no
//! refinement is possible.

use crate::planning::problem::utils::{
    assignments, ground, ground_instances, is_ground, is_instantiatable,
    num_instantiations_of_action, num_instantiations_of_parameters, get_referenced_parameters,
};
use crate::planning::problem::{
    Action, Argument, Condition, GroundAtom, ParameterIndex, PredicateIndex, Problem,
};
use crate::planning::{Config, Error, ParameterSelection, PruningPolicy};
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Canonical 64-bit id of a ground atom: a per-predicate offset plus base-|C|
/// positional encoding of the argument tuple, so ids are disjoint across
/// predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomId(pub u64);

#[derive(Debug, Default)]
struct Cache {
    pos_rigid: HashSet<AtomId>,
    neg_rigid: HashSet<AtomId>,
    useless: HashSet<AtomId>,
}

#[derive(Debug)]
pub struct Grounder<'a> {
    problem: &'a Problem,
    config: &'a Config,
    /// Current partial instantiations of each original schema.
    schemata_by_origin: Vec<Vec<Action>>,
    /// Set once a full refinement pass grounds nothing further.
    exhausted: bool,
    /// Predicates that no schema ever affects.
    trivially_rigid: Vec<bool>,
    /// Predicates that no schema reads.
    trivially_useless: Vec<bool>,
    init_ids: Vec<Vec<AtomId>>,
    pos_goal_ids: Vec<Vec<AtomId>>,
    neg_goal_ids: Vec<Vec<AtomId>>,
    id_offsets: Vec<u64>,
    num_original_instantiations: u64,
    num_pruned: u64,
    groundness: f64,
    successful: RefCell<Vec<Cache>>,
    unsuccessful: RefCell<Vec<Cache>>,
}

impl<'a> Grounder<'a> {
    pub fn new(problem: &'a Problem, config: &'a Config) -> Self {
        let num_original_instantiations = problem
            .actions
            .iter()
            .map(|action| num_instantiations_of_action(action, problem))
            .sum();

        let mut trivially_rigid = vec![true; problem.predicates.len()];
        let mut trivially_useless = vec![true; problem.predicates.len()];
        for action in &problem.actions {
            for condition in &action.preconditions {
                trivially_useless[condition.atom.predicate.0] = false;
            }
            for condition in &action.effects {
                trivially_rigid[condition.atom.predicate.0] = false;
            }
        }

        let base = problem.constants.len() as u64;
        let mut id_offsets = Vec::with_capacity(problem.predicates.len());
        let mut offset = 0u64;
        for predicate in &problem.predicates {
            id_offsets.push(offset);
            offset += base.pow(predicate.arity() as u32).max(1);
        }

        let mut grounder = Self {
            problem,
            config,
            schemata_by_origin: problem
                .actions
                .iter()
                .map(|action| vec![action.clone()])
                .collect(),
            exhausted: false,
            trivially_rigid,
            trivially_useless,
            init_ids: vec![Vec::new(); problem.predicates.len()],
            pos_goal_ids: vec![Vec::new(); problem.predicates.len()],
            neg_goal_ids: vec![Vec::new(); problem.predicates.len()],
            id_offsets,
            num_original_instantiations,
            num_pruned: 0,
            groundness: 0.0,
            successful: RefCell::new(
                (0..problem.predicates.len()).map(|_| Cache::default()).collect(),
            ),
            unsuccessful: RefCell::new(
                (0..problem.predicates.len()).map(|_| Cache::default()).collect(),
            ),
        };

        for atom in &problem.init {
            let id = grounder.get_id(atom);
            grounder.init_ids[atom.predicate.0].push(id);
        }
        grounder.init_ids.iter_mut().for_each(|ids| ids.sort());

        for condition in &problem.goal {
            let id = grounder.get_id(&condition.atom);
            if condition.positive {
                grounder.pos_goal_ids[condition.atom.predicate.0].push(id);
            } else {
                grounder.neg_goal_ids[condition.atom.predicate.0].push(id);
            }
        }
        grounder.pos_goal_ids.iter_mut().for_each(|ids| ids.sort());
        grounder.neg_goal_ids.iter_mut().for_each(|ids| ids.sort());

        grounder.prune();
        grounder.update_groundness();
        grounder
    }

    /// Refines until the groundness fraction reaches `target`, nothing can
    /// be instantiated further, or the deadline expires.
    pub fn refine(&mut self, target: f64, deadline: Option<Instant>) -> Result<(), Error> {
        while self.groundness < target && !self.exhausted {
            if expired(deadline) {
                return Err(Error::Timeout);
            }
            let mut is_grounding = false;
            let mut reached_target = false;
            for origin in 0..self.schemata_by_origin.len() {
                let current = self.schemata_by_origin[origin].clone();
                let mut new_schemata = Vec::with_capacity(current.len());
                let mut newly_pruned = 0;
                for schema in &current {
                    let selection = self.select(schema);
                    if !selection.is_empty() {
                        is_grounding = true;
                    }
                    for assignment in assignments(&selection, schema, self.problem) {
                        let mut candidate = ground(&assignment, schema);
                        if self.is_valid(&candidate) {
                            self.simplify(&mut candidate);
                            new_schemata.push(candidate);
                        } else {
                            newly_pruned +=
                                num_instantiations_of_action(&candidate, self.problem);
                        }
                    }
                }
                self.num_pruned += newly_pruned;
                self.schemata_by_origin[origin] = new_schemata;
                self.update_groundness();
                if self.groundness >= target {
                    reached_target = true;
                    break;
                }
            }
            // Only a complete pass where no selection produced anything
            // proves there is nothing left to instantiate.
            if !is_grounding && !reached_target {
                self.exhausted = true;
                debug!("No schema can be instantiated further");
                return Ok(());
            }
            self.prune();
            self.update_groundness();
        }
        Ok(())
    }

    pub fn groundness(&self) -> f64 {
        self.groundness
    }

    pub fn num_schemata(&self) -> usize {
        self.schemata_by_origin.iter().map(|list| list.len()).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Snapshots the residual problem: the original tables, the current
    /// schemata in origin order, and the goal without rigidly satisfied
    /// conditions.
    pub fn extract_problem(&self) -> Problem {
        let mut extracted = self.problem.clone();
        extracted.actions = self
            .schemata_by_origin
            .iter()
            .flat_map(|list| list.iter().cloned())
            .collect();
        extracted.goal = self
            .problem
            .goal
            .iter()
            .filter(|condition| !self.is_rigid(&condition.atom, condition.positive))
            .cloned()
            .collect();
        info!(
            "Extracted {} schemata at groundness {:.3}",
            extracted.actions.len(),
            self.groundness
        );
        extracted
    }

    pub fn get_id(&self, atom: &GroundAtom) -> AtomId {
        let base = self.problem.constants.len() as u64;
        let mut code = 0u64;
        for &argument in &atom.arguments {
            code = code * base + argument.0 as u64;
        }
        AtomId(self.id_offsets[atom.predicate.0] + code)
    }

    fn update_groundness(&mut self) {
        self.groundness = if self.num_original_instantiations == 0 {
            1.0
        } else {
            (self.num_schemata() as u64 + self.num_pruned) as f64
                / self.num_original_instantiations as f64
        };
    }

    fn init_contains(&self, atom: &GroundAtom) -> bool {
        self.init_ids[atom.predicate.0]
            .binary_search(&self.get_id(atom))
            .is_ok()
    }

    fn is_goal(&self, atom: &GroundAtom) -> bool {
        let id = self.get_id(atom);
        self.pos_goal_ids[atom.predicate.0].binary_search(&id).is_ok()
            || self.neg_goal_ids[atom.predicate.0].binary_search(&id).is_ok()
    }

    fn has_effect(&self, action: &Action, atom: &GroundAtom, positive: bool) -> bool {
        action
            .eff_instantiated
            .iter()
            .any(|condition| condition.positive == positive && condition.atom == *atom)
            || action.effects.iter().any(|condition| {
                condition.atom.predicate == atom.predicate
                    && condition.positive == positive
                    && is_instantiatable(&condition.atom, &atom.arguments, action, self.problem)
            })
    }

    fn has_precondition(&self, action: &Action, atom: &GroundAtom) -> bool {
        action
            .pre_instantiated
            .iter()
            .any(|condition| condition.atom == *atom)
            || action.preconditions.iter().any(|condition| {
                condition.atom.predicate == atom.predicate
                    && is_instantiatable(&condition.atom, &atom.arguments, action, self.problem)
            })
    }

    /// Whether the atom's truth value equals `positive` in every reachable
    /// state: its initial polarity matches and no current schema can change
    /// it.
    fn is_rigid(&self, atom: &GroundAtom, positive: bool) -> bool {
        let predicate = atom.predicate.0;
        let id = self.get_id(atom);
        let policy = self.config.cache_policy;

        if policy.caches_successful() {
            let successful = self.successful.borrow();
            let rigid = if positive {
                &successful[predicate].pos_rigid
            } else {
                &successful[predicate].neg_rigid
            };
            if rigid.contains(&id) {
                return true;
            }
        }
        if policy.caches_unsuccessful() {
            let unsuccessful = self.unsuccessful.borrow();
            let not_rigid = if positive {
                &unsuccessful[predicate].pos_rigid
            } else {
                &unsuccessful[predicate].neg_rigid
            };
            if not_rigid.contains(&id) {
                return false;
            }
        }

        let verdict = self.compute_rigid(atom, positive);

        if verdict && policy.caches_successful() {
            let mut successful = self.successful.borrow_mut();
            let rigid = if positive {
                &mut successful[predicate].pos_rigid
            } else {
                &mut successful[predicate].neg_rigid
            };
            rigid.insert(id);
        } else if !verdict && policy.caches_unsuccessful() {
            let mut unsuccessful = self.unsuccessful.borrow_mut();
            let not_rigid = if positive {
                &mut unsuccessful[predicate].pos_rigid
            } else {
                &mut unsuccessful[predicate].neg_rigid
            };
            not_rigid.insert(id);
        }
        verdict
    }

    fn compute_rigid(&self, atom: &GroundAtom, positive: bool) -> bool {
        if self.init_contains(atom) != positive {
            return false;
        }
        if self.trivially_rigid[atom.predicate.0] {
            return true;
        }
        if self.config.pruning_policy == PruningPolicy::Trivial {
            return false;
        }
        // An effect of opposite polarity in any current schema refutes
        // rigidity; original schemata gate the scan cheaply.
        for (origin, base_action) in self.problem.actions.iter().enumerate() {
            if !self.has_effect(base_action, atom, !positive) {
                continue;
            }
            for schema in &self.schemata_by_origin[origin] {
                if self.has_effect(schema, atom, !positive) {
                    return false;
                }
            }
        }
        true
    }

    /// Whether no current schema reads the atom and it is not a goal.
    fn is_useless(&self, atom: &GroundAtom) -> bool {
        let predicate = atom.predicate.0;
        let id = self.get_id(atom);
        let policy = self.config.cache_policy;

        if policy.caches_successful() && self.successful.borrow()[predicate].useless.contains(&id) {
            return true;
        }
        if policy.caches_unsuccessful()
            && self.unsuccessful.borrow()[predicate].useless.contains(&id)
        {
            return false;
        }

        let verdict = self.compute_useless(atom);

        if verdict && policy.caches_successful() {
            self.successful.borrow_mut()[predicate].useless.insert(id);
        } else if !verdict && policy.caches_unsuccessful() {
            self.unsuccessful.borrow_mut()[predicate].useless.insert(id);
        }
        verdict
    }

    fn compute_useless(&self, atom: &GroundAtom) -> bool {
        if self.is_goal(atom) {
            return false;
        }
        if self.trivially_useless[atom.predicate.0] {
            return true;
        }
        if self.config.pruning_policy == PruningPolicy::Trivial {
            return false;
        }
        for (origin, base_action) in self.problem.actions.iter().enumerate() {
            if !self.has_precondition(base_action, atom) {
                continue;
            }
            for schema in &self.schemata_by_origin[origin] {
                if self.has_precondition(schema, atom) {
                    return false;
                }
            }
        }
        true
    }

    fn select(&self, action: &Action) -> Vec<ParameterIndex> {
        match self.config.parameter_selection {
            ParameterSelection::MostFrequent => self.select_most_frequent(action),
            ParameterSelection::MinNew => self.select_min_new(action),
            ParameterSelection::MaxRigid => self.select_max_rigid(action),
            ParameterSelection::ApproxMinNew => self.select_approx_min_new(action),
            ParameterSelection::ApproxMaxRigid => self.select_approx_max_rigid(action),
            ParameterSelection::FirstEffect => self.select_first_effect(action),
        }
    }

    /// The free parameter with the most occurrences in condition argument
    /// positions; ties go to the lowest index. Empty exactly when the schema
    /// has no free parameters.
    fn select_most_frequent(&self, action: &Action) -> Vec<ParameterIndex> {
        let mut frequency = vec![0u32; action.parameters.len()];
        for condition in action.preconditions.iter().chain(&action.effects) {
            for argument in &condition.atom.arguments {
                if let Argument::Parameter(parameter) = argument {
                    frequency[parameter.0] += 1;
                }
            }
        }

        let mut best: Option<ParameterIndex> = None;
        for (index, parameter) in action.parameters.iter().enumerate() {
            if !parameter.is_free() {
                continue;
            }
            match best {
                Some(current) if frequency[current.0] >= frequency[index] => {}
                _ => best = Some(ParameterIndex(index)),
            }
        }
        best.map(|parameter| vec![parameter]).unwrap_or_default()
    }

    /// The precondition whose instantiation yields the fewest atoms that are
    /// not already rigidly refuted.
    fn select_min_new(&self, action: &Action) -> Vec<ParameterIndex> {
        let mut best: Option<(&Condition, u64)> = None;
        for condition in &action.preconditions {
            if is_ground(&condition.atom) {
                continue;
            }
            let selection = get_referenced_parameters(action, &condition.atom);
            let mut current = num_instantiations_of_parameters(&selection, action, self.problem);
            for instance in ground_instances(&condition.atom, action, self.problem) {
                if self.is_rigid(&instance, !condition.positive) {
                    current -= 1;
                }
            }
            if best.map_or(true, |(_, min)| current < min) {
                best = Some((condition, current));
            }
        }
        match best {
            Some((condition, _)) => get_referenced_parameters(action, &condition.atom),
            None => self.select_most_frequent(action),
        }
    }

    /// The precondition with the most rigidly refuted instantiations; these
    /// candidates will be pruned immediately.
    fn select_max_rigid(&self, action: &Action) -> Vec<ParameterIndex> {
        let mut best: Option<(&Condition, u64)> = None;
        for condition in &action.preconditions {
            if is_ground(&condition.atom) {
                continue;
            }
            let selection = get_referenced_parameters(action, &condition.atom);
            let upper_bound =
                num_instantiations_of_parameters(&selection, action, self.problem) + 1;
            if best.map_or(false, |(_, max)| upper_bound <= max) {
                continue;
            }
            let mut current = 1;
            for instance in ground_instances(&condition.atom, action, self.problem) {
                if self.is_rigid(&instance, !condition.positive) {
                    current += 1;
                }
            }
            if best.map_or(true, |(_, max)| current > max) {
                best = Some((condition, current));
            }
        }
        match best {
            Some((condition, _)) => get_referenced_parameters(action, &condition.atom),
            None => self.select_most_frequent(action),
        }
    }

    fn select_approx_min_new(&self, action: &Action) -> Vec<ParameterIndex> {
        let mut best: Option<(&Condition, u64)> = None;
        for condition in &action.preconditions {
            if is_ground(&condition.atom) {
                continue;
            }
            let selection = get_referenced_parameters(action, &condition.atom);
            let current = num_instantiations_of_parameters(&selection, action, self.problem);
            if best.map_or(true, |(_, min)| current < min) {
                best = Some((condition, current));
            }
        }
        match best {
            Some((condition, _)) => get_referenced_parameters(action, &condition.atom),
            None => self.select_most_frequent(action),
        }
    }

    /// Approximates `max-rigid` by the size of the successful rigidity cache
    /// of the opposite polarity.
    fn select_approx_max_rigid(&self, action: &Action) -> Vec<ParameterIndex> {
        let successful = self.successful.borrow();
        let mut best: Option<(&Condition, u64)> = None;
        for condition in &action.preconditions {
            if is_ground(&condition.atom) {
                continue;
            }
            let cache = &successful[condition.atom.predicate.0];
            let current = 1 + if condition.positive {
                cache.neg_rigid.len() as u64
            } else {
                cache.pos_rigid.len() as u64
            };
            if best.map_or(true, |(_, max)| current > max) {
                best = Some((condition, current));
            }
        }
        match best {
            Some((condition, _)) => get_referenced_parameters(action, &condition.atom),
            None => self.select_most_frequent(action),
        }
    }

    fn select_first_effect(&self, action: &Action) -> Vec<ParameterIndex> {
        for condition in &action.effects {
            if !is_ground(&condition.atom) {
                return get_referenced_parameters(action, &condition.atom);
            }
        }
        self.select_most_frequent(action)
    }

    /// Repeatedly removes invalid schemata and simplifies the remainder
    /// until nothing changes. Refuted-verdict caches are cleared each round
    /// since a pruning can turn further atoms rigid.
    fn prune(&mut self) {
        loop {
            let mut changed = false;
            if self.config.cache_policy.caches_unsuccessful() {
                for cache in self.unsuccessful.borrow_mut().iter_mut() {
                    cache.pos_rigid.clear();
                    cache.neg_rigid.clear();
                    cache.useless.clear();
                }
            }
            for origin in 0..self.schemata_by_origin.len() {
                let flags: Vec<bool> = self.schemata_by_origin[origin]
                    .iter()
                    .map(|schema| self.is_valid(schema))
                    .collect();
                if flags.iter().any(|&valid| !valid) {
                    let mut pruned = 0;
                    for (schema, &valid) in self.schemata_by_origin[origin].iter().zip(&flags) {
                        if !valid {
                            pruned += num_instantiations_of_action(schema, self.problem);
                        }
                    }
                    let mut index = 0;
                    self.schemata_by_origin[origin].retain(|_| {
                        let keep = flags[index];
                        index += 1;
                        keep
                    });
                    self.num_pruned += pruned;
                    changed = true;
                }

                for index in 0..self.schemata_by_origin[origin].len() {
                    let mut schema = self.schemata_by_origin[origin][index].clone();
                    if self.simplify(&mut schema) {
                        self.schemata_by_origin[origin][index] = schema;
                        changed = true;
                    }
                }
            }
            if !changed {
                return;
            }
        }
    }

    /// A schema is invalid if some precondition can never be satisfied, or
    /// if every effect is a no-op (already rigid in its polarity) or
    /// useless (read by nobody).
    fn is_valid(&self, action: &Action) -> bool {
        for condition in &action.pre_instantiated {
            if self.is_rigid(&condition.atom, !condition.positive) {
                return false;
            }
        }
        for condition in &action.preconditions {
            if self.config.pruning_policy != PruningPolicy::Eager && !is_ground(&condition.atom) {
                continue;
            }
            let mut all_refuted = true;
            for instance in ground_instances(&condition.atom, action, self.problem) {
                if !self.is_rigid(&instance, !condition.positive) {
                    all_refuted = false;
                    break;
                }
            }
            if all_refuted {
                return false;
            }
        }

        if self.config.pruning_policy != PruningPolicy::Eager
            && action
                .effects
                .iter()
                .any(|condition| !is_ground(&condition.atom))
        {
            return true;
        }
        let instantiated_noop = action.eff_instantiated.iter().all(|condition| {
            self.is_rigid(&condition.atom, condition.positive) || self.is_useless(&condition.atom)
        });
        let lifted_noop = action.effects.iter().all(|condition| {
            ground_instances(&condition.atom, action, self.problem).all(|instance| {
                self.is_rigid(&instance, condition.positive) || self.is_useless(&instance)
            })
        });
        if instantiated_noop && lifted_noop {
            return false;
        }
        true
    }

    /// Drops effects that are already rigid in their polarity or useless,
    /// and preconditions that are rigidly satisfied. Returns whether the
    /// schema changed.
    fn simplify(&self, action: &mut Action) -> bool {
        let mut changed = false;

        let before = action.eff_instantiated.len();
        action.eff_instantiated.retain(|condition| {
            !(self.is_rigid(&condition.atom, condition.positive)
                || self.is_useless(&condition.atom))
        });
        changed |= action.eff_instantiated.len() != before;

        let before = action.effects.len();
        action.effects.retain(|condition| {
            if !is_ground(&condition.atom) {
                return true;
            }
            let instance = crate::planning::problem::utils::instantiate(&condition.atom);
            !(self.is_rigid(&instance, condition.positive) || self.is_useless(&instance))
        });
        changed |= action.effects.len() != before;

        let before = action.pre_instantiated.len();
        action
            .pre_instantiated
            .retain(|condition| !self.is_rigid(&condition.atom, condition.positive));
        changed |= action.pre_instantiated.len() != before;

        let before = action.preconditions.len();
        action.preconditions.retain(|condition| {
            if !is_ground(&condition.atom) {
                return true;
            }
            let instance = crate::planning::problem::utils::instantiate(&condition.atom);
            !self.is_rigid(&instance, condition.positive)
        });
        changed |= action.preconditions.len() != before;

        changed
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::{Domain, Problem as ParsedProblem};
    use crate::parsers::Parser;
    use crate::planning::problem::{normalize, ConstantIndex, EQUALITY_PREDICATE};
    use crate::test_utils::*;

    fn normalized(domain: &str, problem: &str) -> Problem {
        let domain = Domain::from_str(domain).expect("domain should parse");
        let problem = ParsedProblem::from_str(problem).expect("problem should parse");
        normalize(&domain, &problem).expect("normalization should succeed")
    }

    fn atom(predicate: usize, arguments: &[usize]) -> GroundAtom {
        GroundAtom {
            predicate: PredicateIndex(predicate),
            arguments: arguments.iter().map(|&index| ConstantIndex(index)).collect(),
        }
    }

    #[test]
    fn ids_are_disjoint_across_predicates() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let config = Config::default();
        let grounder = Grounder::new(&problem, &config);

        // Equality has offset 0; arity-2 `on` starts after |C|² ids.
        assert_eq!(grounder.get_id(&atom(0, &[0, 0])), AtomId(0));
        assert_eq!(grounder.get_id(&atom(1, &[0, 0])), AtomId(9));
        assert_eq!(grounder.get_id(&atom(1, &[1, 2])), AtomId(9 + 5));
    }

    #[test]
    fn nullary_id_equals_predicate_offset() {
        let problem = normalized(RIGID_DOMAIN, RIGID_PROBLEM);
        let config = Config::default();
        let grounder = Grounder::new(&problem, &config);

        // One constant, so equality occupies the single id 0; the nullary
        // (handempty) gets exactly its offset.
        assert_eq!(grounder.get_id(&atom(1, &[])), AtomId(1));
        assert_eq!(grounder.get_id(&atom(2, &[0])), AtomId(2));
    }

    #[test]
    fn equality_is_rigid() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let config = Config::default();
        let grounder = Grounder::new(&problem, &config);

        let same = GroundAtom {
            predicate: EQUALITY_PREDICATE,
            arguments: atom(0, &[1, 1]).arguments,
        };
        let different = GroundAtom {
            predicate: EQUALITY_PREDICATE,
            arguments: atom(0, &[0, 1]).arguments,
        };
        assert!(grounder.is_rigid(&same, true));
        assert!(grounder.is_rigid(&different, false));
        assert!(!grounder.is_rigid(&different, true));
    }

    #[test]
    fn unaffected_predicates_are_rigid() {
        let problem = normalized(RIGID_DOMAIN, RIGID_PROBLEM);
        let config = Config::default();
        let grounder = Grounder::new(&problem, &config);

        // (handempty) has no effects anywhere and holds initially.
        assert!(grounder.is_rigid(&atom(1, &[]), true));
        // (p o) is consumed by the `consume` schema.
        assert!(!grounder.is_rigid(&atom(2, &[0]), true));
    }

    #[test]
    fn rigidly_satisfied_goals_are_filtered_on_extract() {
        let domain = r#"
        (define (domain d)
            (:predicates (fixed) (p ?x))
            (:action flip
                :parameters (?x)
                :precondition (p ?x)
                :effect (not (p ?x))))"#;
        let problem_text = r#"
        (define (problem i) (:domain d)
            (:objects o)
            (:init (fixed) (p o))
            (:goal (and (fixed) (not (p o)))))"#;
        let problem = normalized(domain, problem_text);
        let config = Config::default();
        let grounder = Grounder::new(&problem, &config);

        let extracted = grounder.extract_problem();
        // (fixed) is rigidly true, only (not (p o)) remains.
        assert_eq!(extracted.goal.len(), 1);
        assert!(!extracted.goal[0].positive);
    }

    #[test]
    fn full_refinement_grounds_every_schema() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let config = Config::default();
        let mut grounder = Grounder::new(&problem, &config);

        grounder.refine(1.0, None).unwrap();
        assert!(grounder.groundness() >= 1.0);

        let extracted = grounder.extract_problem();
        for action in &extracted.actions {
            assert!(action.parameters.iter().all(|p| !p.is_free()));
        }
        // No (on x y) atom is rigid while the move schema can produce any of
        // them, so all 3³ instantiations survive.
        assert_eq!(extracted.actions.len(), 27);
    }

    #[test]
    fn refinement_to_zero_keeps_lifted_schemata() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let config = Config::default();
        let mut grounder = Grounder::new(&problem, &config);

        grounder.refine(0.0, None).unwrap();
        assert_eq!(grounder.num_schemata(), 1);
    }

    #[test]
    fn groundness_reaches_one_on_exhaustion() {
        let problem = normalized(BLOCKSWORLD_DOMAIN, BLOCKSWORLD_PROBLEM);
        let config = Config::default();
        let mut grounder = Grounder::new(&problem, &config);

        grounder.refine(1.0, None).unwrap();
        assert!((grounder.groundness() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn selection_strategies_agree_on_ground_leaves() {
        let problem = normalized(SWAP_DOMAIN, SWAP_PROBLEM);
        let mut config = Config::default();
        let strategies = [
            ParameterSelection::MostFrequent,
            ParameterSelection::MinNew,
            ParameterSelection::MaxRigid,
            ParameterSelection::ApproxMinNew,
            ParameterSelection::ApproxMaxRigid,
            ParameterSelection::FirstEffect,
        ];
        for strategy in strategies {
            config.parameter_selection = strategy;
            let mut grounder = Grounder::new(&problem, &config);
            grounder.refine(1.0, None).unwrap();
            let extracted = grounder.extract_problem();
            assert_eq!(extracted.actions.len(), 27, "strategy {:?}", strategy);
        }
    }
}
