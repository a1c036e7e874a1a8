//! Instantiation helpers over the normalized model.

use crate::planning::problem::{
    Action, Argument, Atom, ConstantIndex, ConstantTuple, Condition, GroundAtom, GroundCondition,
    Parameter, ParameterAssignment, ParameterIndex, Predicate, Problem, Type, TypeIndex,
};
use crate::planning::CartesianProduct;

/// Whether `subtype` equals `r#type` or is a transitive descendant of it.
pub fn is_subtype(problem: &Problem, subtype: TypeIndex, r#type: TypeIndex) -> bool {
    is_subtype_in(&problem.types, subtype, r#type)
}

/// [`is_subtype`] over a bare type table, for use while the [`Problem`] is
/// still being built.
pub(crate) fn is_subtype_in(types: &[Type], mut subtype: TypeIndex, r#type: TypeIndex) -> bool {
    if subtype == r#type {
        return true;
    }
    while types[subtype.0].supertype != subtype {
        subtype = types[subtype.0].supertype;
        if subtype == r#type {
            return true;
        }
    }
    false
}

/// Maps an action's parameters to the argument positions of one atom that
/// reference them. Only parameters actually referenced appear.
#[derive(Debug, Clone)]
pub struct ParameterMapping {
    pub parameters: Vec<ParameterIndex>,
    pub argument_positions: Vec<Vec<usize>>,
}

#[inline]
pub fn is_ground(atom: &Atom) -> bool {
    atom.arguments.iter().all(|argument| argument.is_constant())
}

/// Converts an atom whose arguments are all constants into a [`GroundAtom`].
pub fn instantiate(atom: &Atom) -> GroundAtom {
    let arguments: ConstantTuple = atom
        .arguments
        .iter()
        .map(|argument| {
            argument
                .constant()
                .expect("instantiate called on a lifted atom")
        })
        .collect();
    GroundAtom {
        predicate: atom.predicate,
        arguments,
    }
}

/// Converts an atom into a [`GroundAtom`], resolving parameter references
/// through the action. Referenced parameters must be bound.
pub fn instantiate_with(atom: &Atom, action: &Action) -> GroundAtom {
    let arguments: ConstantTuple = atom
        .arguments
        .iter()
        .map(|argument| match argument {
            Argument::Constant(constant) => *constant,
            Argument::Parameter(parameter) => action
                .parameter(*parameter)
                .constant()
                .expect("instantiate_with called with a free parameter reference"),
        })
        .collect();
    GroundAtom {
        predicate: atom.predicate,
        arguments,
    }
}

/// Replaces parameter references whose parameter is bound in `action` by the
/// bound constant. Returns whether every argument is a constant afterwards.
pub fn update_arguments(atom: &mut Atom, action: &Action) -> bool {
    let mut all_ground = true;
    for argument in &mut atom.arguments {
        if let Argument::Parameter(parameter) = *argument {
            match action.parameter(parameter) {
                Parameter::Bound(constant) => *argument = Argument::Constant(constant),
                Parameter::Free(_) => all_ground = false,
            }
        }
    }
    all_ground
}

/// Applies a parameter assignment to an action, producing a new schema.
/// Conditions that become fully ground move into the instantiated lists.
pub fn ground(assignment: &ParameterAssignment, action: &Action) -> Action {
    let mut parameters = action.parameters.clone();
    for &(parameter, constant) in assignment {
        parameters[parameter.0] = Parameter::Bound(constant);
    }

    let mut new_action = Action {
        name: action.name.clone(),
        parameters,
        preconditions: Vec::new(),
        pre_instantiated: action.pre_instantiated.clone(),
        effects: Vec::new(),
        eff_instantiated: action.eff_instantiated.clone(),
    };

    for condition in &action.preconditions {
        let mut atom = condition.atom.clone();
        if update_arguments(&mut atom, &new_action) {
            new_action.pre_instantiated.push(GroundCondition {
                atom: instantiate(&atom),
                positive: condition.positive,
            });
        } else {
            new_action.preconditions.push(Condition {
                atom,
                positive: condition.positive,
            });
        }
    }
    for condition in &action.effects {
        let mut atom = condition.atom.clone();
        if update_arguments(&mut atom, &new_action) {
            new_action.eff_instantiated.push(GroundCondition {
                atom: instantiate(&atom),
                positive: condition.positive,
            });
        } else {
            new_action.effects.push(Condition {
                atom,
                positive: condition.positive,
            });
        }
    }
    new_action
}

pub fn get_mapping(action: &Action, atom: &Atom) -> ParameterMapping {
    let mut matches: Vec<Vec<usize>> = vec![Vec::new(); action.parameters.len()];
    for (position, argument) in atom.arguments.iter().enumerate() {
        if let Argument::Parameter(parameter) = argument {
            matches[parameter.0].push(position);
        }
    }

    let mut mapping = ParameterMapping {
        parameters: Vec::new(),
        argument_positions: Vec::new(),
    };
    for (index, positions) in matches.into_iter().enumerate() {
        if !positions.is_empty() {
            mapping.parameters.push(ParameterIndex(index));
            mapping.argument_positions.push(positions);
        }
    }
    mapping
}

/// The parameters of `action` referenced by `atom`, in index order.
pub fn get_referenced_parameters(action: &Action, atom: &Atom) -> Vec<ParameterIndex> {
    let mut referenced = vec![false; action.parameters.len()];
    for argument in &atom.arguments {
        if let Argument::Parameter(parameter) = argument {
            referenced[parameter.0] = true;
        }
    }
    referenced
        .into_iter()
        .enumerate()
        .filter_map(|(index, hit)| hit.then_some(ParameterIndex(index)))
        .collect()
}

pub fn get_assignment(
    mapping: &ParameterMapping,
    arguments: &[ConstantIndex],
) -> ParameterAssignment {
    debug_assert_eq!(mapping.parameters.len(), arguments.len());
    mapping
        .parameters
        .iter()
        .zip(arguments)
        .map(|(&parameter, &constant)| (parameter, constant))
        .collect()
}

pub fn num_instantiations_of_predicate(predicate: &Predicate, problem: &Problem) -> u64 {
    predicate
        .parameter_types
        .iter()
        .map(|&r#type| problem.constants_of_type(r#type).len() as u64)
        .product()
}

/// Number of ground actions a schema still expands to, i.e. the product of
/// the domain sizes of its free parameters.
pub fn num_instantiations_of_action(action: &Action, problem: &Problem) -> u64 {
    action
        .parameters
        .iter()
        .map(|parameter| match parameter {
            Parameter::Free(r#type) => problem.constants_of_type(*r#type).len() as u64,
            Parameter::Bound(_) => 1,
        })
        .product()
}

pub fn num_instantiations_of_parameters(
    selection: &[ParameterIndex],
    action: &Action,
    problem: &Problem,
) -> u64 {
    selection
        .iter()
        .map(|&parameter| {
            let r#type = action
                .parameter(parameter)
                .type_()
                .expect("selected parameter must be free");
            problem.constants_of_type(r#type).len() as u64
        })
        .product()
}

/// Iterates every assignment of the selected free parameters to constants of
/// their types.
pub fn assignments<'a>(
    selection: &'a [ParameterIndex],
    action: &'a Action,
    problem: &'a Problem,
) -> impl Iterator<Item = ParameterAssignment> + 'a {
    let sizes = selection
        .iter()
        .map(|&parameter| {
            let r#type = action
                .parameter(parameter)
                .type_()
                .expect("selected parameter must be free");
            problem.constants_of_type(r#type).len()
        })
        .collect();
    CartesianProduct::new(sizes).map(move |combination| {
        combination
            .iter()
            .enumerate()
            .map(|(index, &position)| {
                let parameter = selection[index];
                let r#type = action
                    .parameter(parameter)
                    .type_()
                    .expect("selected parameter must be free");
                (parameter, problem.constants_of_type(r#type)[position])
            })
            .collect()
    })
}

/// Iterates every ground instance of `atom` obtainable by assigning the
/// free parameters of `action` that it references.
pub fn ground_instances<'a>(
    atom: &'a Atom,
    action: &'a Action,
    problem: &'a Problem,
) -> impl Iterator<Item = GroundAtom> + 'a {
    let mapping = get_mapping(action, atom);
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
    CartesianProduct::new(sizes).map(move |combination| {
        let mut instance = atom.clone();
        for (index, &position) in combination.iter().enumerate() {
            let r#type = action
                .parameter(mapping.parameters[index])
                .type_()
                .expect("mapped parameter must be free");
            let constant = problem.constants_of_type(r#type)[position];
            for &argument_position in &mapping.argument_positions[index] {
                instance.arguments[argument_position] = Argument::Constant(constant);
            }
        }
        instantiate(&instance)
    })
}

/// Whether the (possibly lifted) atom can be instantiated so that its
/// argument vector equals `arguments`: fixed constants must match, free
/// parameters must accept the constant by type, and repeated parameters
/// must unify to the same constant.
pub fn is_instantiatable(
    atom: &Atom,
    arguments: &[ConstantIndex],
    action: &Action,
    problem: &Problem,
) -> bool {
    debug_assert_eq!(atom.arguments.len(), arguments.len());
    let mut parameters = action.parameters.clone();
    for (argument, &constant) in atom.arguments.iter().zip(arguments) {
        match argument {
            Argument::Constant(fixed) => {
                if *fixed != constant {
                    return false;
                }
            }
            Argument::Parameter(index) => match parameters[index.0] {
                Parameter::Bound(bound) => {
                    if bound != constant {
                        return false;
                    }
                }
                Parameter::Free(r#type) => {
                    if !is_subtype(problem, problem.constant(constant).r#type, r#type) {
                        return false;
                    }
                    parameters[index.0] = Parameter::Bound(constant);
                }
            },
        }
    }
    true
}
