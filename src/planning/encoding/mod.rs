//! The SAT encoding layer: a clause accumulator, the support index over
//! ground atoms, and the foreach encoder that emits the step-parameterized
//! formulas.

mod foreach;
mod formula;
mod support;

pub use foreach::{ForeachEncoder, Variable, DONTCARE, SAT, UNSAT};
pub use formula::{Clause, Formula, Literal};
pub use support::{ConditionSupport, GroundAtomId, Support};
