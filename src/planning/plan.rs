//! Plans and their textual rendering.

use crate::planning::problem::{ActionIndex, ConstantIndex, Problem};
use itertools::Itertools;

/// A totally ordered sequence of ground actions. Each step carries the
/// schema index and one constant per schema parameter, in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    steps: Vec<(ActionIndex, Vec<ConstantIndex>)>,
}

impl Plan {
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, action: ActionIndex, constants: Vec<ConstantIndex>) {
        self.steps.push((action, constants));
    }

    pub fn steps(&self) -> &[(ActionIndex, Vec<ConstantIndex>)] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders the plan as one step per line, `<step>: (<name> <arg> …)`,
    /// with step indexing from 0 and names in their source spelling.
    pub fn to_text(&self, problem: &Problem) -> String {
        let mut text = String::new();
        for (step, (action, constants)) in self.steps.iter().enumerate() {
            let arguments = constants
                .iter()
                .map(|&constant| problem.constant(constant).name.as_ref())
                .join(" ");
            text.push_str(&format!("{}: ({}", step, problem.action(*action).name));
            if !arguments.is_empty() {
                text.push(' ');
                text.push_str(&arguments);
            }
            text.push_str(")\n");
        }
        text
    }
}

impl IntoIterator for Plan {
    type Item = (ActionIndex, Vec<ConstantIndex>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
