//! The foreach encoder: allocates per-step propositional variables for
//! schemata, parameter values and ground atoms, and emits the four
//! step-parameterized clause groups (init, universal, transition, goal).

use crate::planning::encoding::{Formula, GroundAtomId, Literal, Support};
use crate::planning::problem::{
    ActionIndex, ConstantIndex, Parameter, ParameterAssignment, ParameterIndex, Problem,
};
use crate::planning::sat::Model;
use crate::planning::{Config, Error, Plan};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Placeholder variable; translates to an always-true literal.
pub const DONTCARE: u64 = 0;
/// Variable pinned true by a unit clause at solver construction.
pub const SAT: u64 = 1;
/// Variable pinned false by a unit clause at solver construction.
pub const UNSAT: u64 = 2;

/// A step-relative propositional variable: the actual SAT variable is
/// `index + step · num_vars`, with `step` incremented once for literals
/// that talk about the successor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub index: u64,
    pub this_step: bool,
}

impl Variable {
    /// A variable evaluated at the current step.
    pub fn new(index: u64) -> Self {
        Self {
            index,
            this_step: true,
        }
    }

    /// A variable evaluated at the following step.
    pub fn next(index: u64) -> Self {
        Self {
            index,
            this_step: false,
        }
    }
}

#[derive(Debug)]
pub struct ForeachEncoder<'a> {
    support: Support<'a>,
    /// Per-step variable count, exclusive of the three global constants.
    num_vars: u64,
    /// One firing variable per schema.
    actions: Vec<u64>,
    /// One value variable per (schema, free parameter, constant of its
    /// type). Bound parameters have empty tables.
    parameters: Vec<Vec<Vec<u64>>>,
    /// One holds-variable per ground atom id; rigid atoms are pinned to the
    /// constants instead.
    predicates: Vec<u64>,
    /// Helper variables standing for (schema ∧ parameter assignment),
    /// introduced to curb DNF explosion in the frame axioms.
    dnf_helpers: Vec<HashMap<ParameterAssignment, u64>>,
    init: Formula<Variable>,
    universal: Formula<Variable>,
    transition: Formula<Variable>,
    goal: Formula<Variable>,
}

impl<'a> ForeachEncoder<'a> {
    pub fn new(
        problem: &'a Problem,
        config: &Config,
        deadline: Option<Instant>,
    ) -> Result<Self, Error> {
        let support = Support::new(problem);
        let mut encoder = Self {
            support,
            num_vars: 3,
            actions: Vec::new(),
            parameters: Vec::new(),
            predicates: Vec::new(),
            dnf_helpers: vec![HashMap::new(); problem.actions.len()],
            init: Formula::new(),
            universal: Formula::new(),
            transition: Formula::new(),
            goal: Formula::new(),
        };

        encoder.init_sat_vars();
        encoder.encode_init();
        encoder.encode_actions(config);
        encoder.parameter_implies_predicate(config, deadline)?;
        encoder.interference(config, deadline)?;
        encoder.frame_axioms(config, deadline)?;
        encoder.assume_goal();
        encoder.num_vars -= 3;

        debug!("Variables per step: {}", encoder.num_vars);
        debug!(
            "Helper variables to mitigate dnf explosion: {}",
            encoder
                .dnf_helpers
                .iter()
                .map(|helpers| helpers.len())
                .sum::<usize>()
        );
        debug!("Init clauses: {}", encoder.init.num_clauses());
        debug!("Universal clauses: {}", encoder.universal.num_clauses());
        debug!("Transition clauses: {}", encoder.transition.num_clauses());
        debug!("Goal clauses: {}", encoder.goal.num_clauses());
        Ok(encoder)
    }

    pub fn num_vars(&self) -> u64 {
        self.num_vars
    }

    pub fn init_clauses(&self) -> &Formula<Variable> {
        &self.init
    }

    pub fn universal_clauses(&self) -> &Formula<Variable> {
        &self.universal
    }

    pub fn transition_clauses(&self) -> &Formula<Variable> {
        &self.transition
    }

    pub fn goal_clauses(&self) -> &Formula<Variable> {
        &self.goal
    }

    /// Whether some goal condition is pinned to the wrong constant, i.e.
    /// rigidly refuted: no horizon can satisfy it.
    pub fn goal_unreachable(&self) -> bool {
        self.goal.clauses.iter().any(|clause| {
            clause.literals.iter().all(|literal| {
                (literal.variable.index == UNSAT && literal.positive)
                    || (literal.variable.index == SAT && !literal.positive)
            })
        })
    }

    /// Translates a step-relative literal into a DIMACS literal.
    pub fn to_sat_var(&self, literal: Literal<Variable>, step: u32) -> i32 {
        let variable = literal.variable.index;
        if variable == DONTCARE {
            return SAT as i32;
        }
        if variable == SAT || variable == UNSAT {
            let value = variable as i32;
            return if literal.positive { value } else { -value };
        }
        let step = u64::from(step) + if literal.variable.this_step { 0 } else { 1 };
        let value = (variable + step * self.num_vars) as i32;
        if literal.positive {
            value
        } else {
            -value
        }
    }

    /// Decodes a satisfying assignment at the given horizon into a plan.
    pub fn extract_plan(&self, model: &Model, steps: u32) -> Plan {
        let problem = self.support.problem();
        let mut plan = Plan::empty();
        for step in 0..u64::from(steps) {
            for (index, action) in problem.actions.iter().enumerate() {
                if !model.value(self.actions[index] + step * self.num_vars) {
                    continue;
                }
                let mut constants = Vec::with_capacity(action.parameters.len());
                for (position, parameter) in action.parameters.iter().enumerate() {
                    match parameter {
                        Parameter::Bound(constant) => constants.push(*constant),
                        Parameter::Free(r#type) => {
                            let of_type = problem.constants_of_type(*r#type);
                            let chosen = (0..of_type.len()).find(|&candidate| {
                                model.value(
                                    self.parameters[index][position][candidate]
                                        + step * self.num_vars,
                                )
                            });
                            if let Some(candidate) = chosen {
                                constants.push(of_type[candidate]);
                            }
                        }
                    }
                    debug_assert_eq!(constants.len(), position + 1);
                }
                plan.push(ActionIndex(index), constants);
            }
        }
        plan
    }

    fn init_sat_vars(&mut self) {
        let problem = self.support.problem();
        self.actions.reserve(problem.actions.len());
        self.parameters.resize(problem.actions.len(), Vec::new());
        for (index, action) in problem.actions.iter().enumerate() {
            self.actions.push(self.num_vars);
            self.num_vars += 1;

            self.parameters[index] = vec![Vec::new(); action.parameters.len()];
            for (position, parameter) in action.parameters.iter().enumerate() {
                if let Parameter::Free(r#type) = parameter {
                    let num_constants = problem.constants_of_type(*r#type).len();
                    self.parameters[index][position] =
                        (self.num_vars..self.num_vars + num_constants as u64).collect();
                    self.num_vars += num_constants as u64;
                }
            }
        }

        self.predicates = (0..self.support.num_instantiations())
            .map(|id| {
                let id = GroundAtomId(id);
                if self.support.is_rigid(id, true) {
                    SAT
                } else if self.support.is_rigid(id, false) {
                    UNSAT
                } else {
                    let variable = self.num_vars;
                    self.num_vars += 1;
                    variable
                }
            })
            .collect();
    }

    /// Unit clauses fixing every atom to its initial polarity at step 0.
    fn encode_init(&mut self) {
        for id in 0..self.support.num_instantiations() {
            let positive = self.support.is_init(GroundAtomId(id));
            self.init
                .add_clause([Literal::new(Variable::new(self.predicates[id]), positive)]);
        }
    }

    /// Parameter consistency per schema: a firing action takes exactly one
    /// value for each free parameter, and optionally a chosen value implies
    /// the action fires.
    fn encode_actions(&mut self, config: &Config) {
        let problem = self.support.problem();
        for (index, action) in problem.actions.iter().enumerate() {
            let action_variable = Variable::new(self.actions[index]);
            for (position, parameter) in action.parameters.iter().enumerate() {
                if !parameter.is_free() {
                    continue;
                }
                let argument_variables: Vec<Variable> = self.parameters[index][position]
                    .iter()
                    .map(|&variable| Variable::new(variable))
                    .collect();

                self.universal.add(Literal::new(action_variable, false));
                for &argument in &argument_variables {
                    self.universal.add(Literal::new(argument, true));
                }
                self.universal.end_clause();

                self.universal.at_most_one(&argument_variables);

                if config.parameter_implies_action {
                    for &argument in &argument_variables {
                        self.universal.add_clause([
                            Literal::new(argument, false),
                            Literal::new(action_variable, true),
                        ]);
                    }
                }
            }
        }
    }

    /// Firing with a given (partial) assignment implies the supported
    /// precondition at this step, and the supported effect at the next.
    fn parameter_implies_predicate(
        &mut self,
        config: &Config,
        deadline: Option<Instant>,
    ) -> Result<(), Error> {
        for id in 0..self.support.num_instantiations() {
            if expired(deadline) {
                return Err(Error::Timeout);
            }
            for positive in [true, false] {
                for is_effect in [true, false] {
                    let mut clauses: Vec<Vec<Literal<Variable>>> = Vec::new();
                    for (action_index, assignment) in
                        self.support.support(GroundAtomId(id), positive, is_effect)
                    {
                        let mut clause = Vec::with_capacity(assignment.len() + 2);
                        if !config.parameter_implies_action || assignment.is_empty() {
                            clause.push(Literal::new(
                                Variable::new(self.actions[action_index.0]),
                                false,
                            ));
                        }
                        for &(parameter, constant) in assignment {
                            clause.push(Literal::new(
                                Variable::new(self.parameter_variable(
                                    *action_index,
                                    parameter,
                                    constant,
                                )),
                                false,
                            ));
                        }
                        let atom_variable = if is_effect {
                            Variable::next(self.predicates[id])
                        } else {
                            Variable::new(self.predicates[id])
                        };
                        clause.push(Literal::new(atom_variable, positive));
                        clauses.push(clause);
                    }
                    let formula = if is_effect {
                        &mut self.transition
                    } else {
                        &mut self.universal
                    };
                    for clause in clauses {
                        formula.add_clause(clause);
                    }
                }
            }
        }
        Ok(())
    }

    /// Two schemata may not fire at the same step with assignments where
    /// one's effect falsifies the other's precondition.
    fn interference(&mut self, config: &Config, deadline: Option<Instant>) -> Result<(), Error> {
        for id in 0..self.support.num_instantiations() {
            if expired(deadline) {
                return Err(Error::Timeout);
            }
            for positive in [true, false] {
                let preconditions = self.support.support(GroundAtomId(id), positive, false);
                let effects = self.support.support(GroundAtomId(id), !positive, true);
                let mut clauses: Vec<Vec<Literal<Variable>>> = Vec::new();
                for (precondition_action, precondition_assignment) in preconditions {
                    for (effect_action, effect_assignment) in effects {
                        if precondition_action == effect_action {
                            continue;
                        }
                        let mut clause = Vec::new();
                        for (action_index, assignment) in [
                            (precondition_action, precondition_assignment),
                            (effect_action, effect_assignment),
                        ] {
                            if !config.parameter_implies_action || assignment.is_empty() {
                                clause.push(Literal::new(
                                    Variable::new(self.actions[action_index.0]),
                                    false,
                                ));
                            }
                            for &(parameter, constant) in assignment {
                                clause.push(Literal::new(
                                    Variable::new(self.parameter_variable(
                                        *action_index,
                                        parameter,
                                        constant,
                                    )),
                                    false,
                                ));
                            }
                        }
                        clauses.push(clause);
                    }
                }
                for clause in clauses {
                    self.universal.add_clause(clause);
                }
            }
        }
        Ok(())
    }

    /// An atom may only flip polarity across a step if a supporting effect
    /// fires. The flip condition is a DNF (stays, was already, or one of
    /// the producers fired) distributed into CNF; above the configured
    /// threshold, helper variables replace the producer conjunctions.
    fn frame_axioms(&mut self, config: &Config, deadline: Option<Instant>) -> Result<(), Error> {
        let trivial_size = if config.parameter_implies_action { 1 } else { 0 };
        for id in 0..self.support.num_instantiations() {
            if expired(deadline) {
                return Err(Error::Timeout);
            }
            for positive in [true, false] {
                let supports = self
                    .support
                    .support(GroundAtomId(id), positive, true)
                    .to_vec();

                let use_helper = config.dnf_threshold > 0
                    && supports
                        .iter()
                        .filter(|(_, assignment)| assignment.len() > trivial_size)
                        .count()
                        >= config.dnf_threshold;

                let mut dnf = Formula::new();
                dnf.add_clause([Literal::new(
                    Variable::new(self.predicates[id]),
                    positive,
                )]);
                dnf.add_clause([Literal::new(
                    Variable::next(self.predicates[id]),
                    !positive,
                )]);

                for (action_index, assignment) in &supports {
                    if use_helper && assignment.len() > trivial_size {
                        let helper = self.dnf_helper(config, *action_index, assignment);
                        dnf.add_clause([Literal::new(Variable::new(helper), true)]);
                    } else {
                        let mut conjunct = Vec::with_capacity(assignment.len() + 1);
                        if !config.parameter_implies_action || assignment.is_empty() {
                            conjunct.push(Literal::new(
                                Variable::new(self.actions[action_index.0]),
                                true,
                            ));
                        }
                        for &(parameter, constant) in assignment {
                            conjunct.push(Literal::new(
                                Variable::new(self.parameter_variable(
                                    *action_index,
                                    parameter,
                                    constant,
                                )),
                                true,
                            ));
                        }
                        dnf.add_clause(conjunct);
                    }
                }
                self.transition.add_dnf(&dnf);
            }
        }
        Ok(())
    }

    /// Returns (allocating on first use) the helper variable standing for
    /// `action ∧ assignment`, together with its defining implications.
    fn dnf_helper(
        &mut self,
        config: &Config,
        action_index: ActionIndex,
        assignment: &ParameterAssignment,
    ) -> u64 {
        if let Some(&helper) = self.dnf_helpers[action_index.0].get(assignment) {
            return helper;
        }
        let helper = self.num_vars;
        self.num_vars += 1;
        self.dnf_helpers[action_index.0].insert(assignment.clone(), helper);

        if !config.parameter_implies_action {
            self.universal.add_clause([
                Literal::new(Variable::new(helper), false),
                Literal::new(Variable::new(self.actions[action_index.0]), true),
            ]);
        }
        for &(parameter, constant) in assignment {
            let parameter_variable = self.parameter_variable(action_index, parameter, constant);
            self.universal.add_clause([
                Literal::new(Variable::new(helper), false),
                Literal::new(Variable::new(parameter_variable), true),
            ]);
        }
        helper
    }

    /// Unit clauses assumed (not asserted) at the current horizon.
    fn assume_goal(&mut self) {
        let problem = self.support.problem();
        for condition in &problem.goal {
            let id = self.support.get_id(&condition.atom);
            self.goal.add_clause([Literal::new(
                Variable::new(self.predicates[id.0]),
                condition.positive,
            )]);
        }
    }

    fn parameter_variable(
        &self,
        action: ActionIndex,
        parameter: ParameterIndex,
        constant: ConstantIndex,
    ) -> u64 {
        let problem = self.support.problem();
        let r#type = problem
            .action(action)
            .parameter(parameter)
            .type_()
            .expect("assigned parameter must be free in the schema");
        let position = problem.constant_position(constant, r#type);
        self.parameters[action.0][parameter.0][position]
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}
