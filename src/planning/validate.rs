//! Plan validation by execution: the state is the set of true ground atoms,
//! a step must have its preconditions satisfied, and applying it deletes the
//! negative effects before asserting the positive ones.

use crate::planning::problem::utils::ground;
use crate::planning::problem::{GroundAtom, ParameterAssignment, ParameterIndex, Problem};
use crate::planning::Plan;
use std::collections::HashSet;

pub fn validate(plan: &Plan, problem: &Problem) -> Result<(), String> {
    let mut state: HashSet<GroundAtom> = problem.init.iter().cloned().collect();

    for (step, (action_index, constants)) in plan.steps().iter().enumerate() {
        let schema = problem.action(*action_index);
        if schema.parameters.len() != constants.len() {
            return Err(format!(
                "step {}: expected {} arguments for '{}', got {}",
                step,
                schema.parameters.len(),
                schema.name,
                constants.len()
            ));
        }

        let assignment: ParameterAssignment = schema
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, parameter)| parameter.is_free())
            .map(|(index, _)| (ParameterIndex(index), constants[index]))
            .collect();
        let ground_action = ground(&assignment, schema);
        debug_assert!(ground_action.preconditions.is_empty());
        debug_assert!(ground_action.effects.is_empty());

        for condition in &ground_action.pre_instantiated {
            if state.contains(&condition.atom) != condition.positive {
                return Err(format!(
                    "step {}: precondition {} of '{}' does not hold",
                    step,
                    problem.ground_atom_to_string(&condition.atom),
                    schema.name
                ));
            }
        }

        for condition in &ground_action.eff_instantiated {
            if !condition.positive {
                state.remove(&condition.atom);
            }
        }
        for condition in &ground_action.eff_instantiated {
            if condition.positive {
                state.insert(condition.atom.clone());
            }
        }
    }

    for condition in &problem.goal {
        if state.contains(&condition.atom) != condition.positive {
            return Err(format!(
                "goal {} does not hold in the final state",
                problem.ground_atom_to_string(&condition.atom)
            ));
        }
    }
    Ok(())
}
