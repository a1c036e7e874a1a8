//! Contains the [`Condition`] tree.

use crate::parsed_types::{Literal, Name, Term};
use std::fmt::{Display, Formatter};

/// A goal-description formula: literals combined with `and`, `or` and `not`.
/// Normalization flattens these trees into disjunctive normal form, so no
/// depth restriction is imposed here.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Condition {
    Literal(Literal<Term>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    /// A construct the grammar recognizes but the planner does not support
    /// (`forall`, `exists`, `imply`, `when`). Kept in the tree so
    /// normalization can report it by keyword and position.
    Unsupported(Name),
}

impl Condition {
    /// The keyword of the first unsupported construct in the tree, if any.
    pub fn find_unsupported(&self) -> Option<&Name> {
        match self {
            Condition::Literal(_) => None,
            Condition::And(parts) | Condition::Or(parts) => {
                parts.iter().find_map(|part| part.find_unsupported())
            }
            Condition::Not(inner) => inner.find_unsupported(),
            Condition::Unsupported(name) => Some(name),
        }
    }

    /// Flattens the tree into disjunctive normal form: a list of conjuncts,
    /// each a list of literals. Negations are pushed down to the atoms.
    pub fn to_dnf(&self) -> Vec<Vec<Literal<Term>>> {
        self.dnf(false)
    }

    fn dnf(&self, negated: bool) -> Vec<Vec<Literal<Term>>> {
        match self {
            Condition::Literal(literal) => {
                let literal = if negated {
                    Literal::new(!literal.is_negated(), literal.atom().clone())
                } else {
                    literal.clone()
                };
                vec![vec![literal]]
            }
            Condition::Not(inner) => inner.dnf(!negated),
            Condition::And(parts) if !negated => Self::distribute(parts, false),
            Condition::Or(parts) if negated => Self::distribute(parts, true),
            // A disjunction (or a negated conjunction) concatenates the
            // disjuncts of its parts.
            Condition::And(parts) | Condition::Or(parts) => {
                parts.iter().flat_map(|part| part.dnf(negated)).collect()
            }
            // Callers reject unsupported constructs before flattening.
            Condition::Unsupported(_) => vec![vec![]],
        }
    }

    /// Cartesian distribution of a conjunction over the disjuncts of its
    /// parts.
    fn distribute(parts: &[Condition], negated: bool) -> Vec<Vec<Literal<Term>>> {
        let mut disjuncts: Vec<Vec<Literal<Term>>> = vec![vec![]];
        for part in parts {
            let part_disjuncts = part.dnf(negated);
            let mut next = Vec::with_capacity(disjuncts.len() * part_disjuncts.len());
            for conjunct in &disjuncts {
                for part_conjunct in &part_disjuncts {
                    let mut combined = conjunct.clone();
                    combined.extend(part_conjunct.iter().cloned());
                    next.push(combined);
                }
            }
            disjuncts = next;
        }
        disjuncts
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Literal(literal) => write!(f, "{}", literal),
            Condition::And(parts) => {
                write!(f, "(and")?;
                for part in parts {
                    write!(f, " {}", part)?;
                }
                write!(f, ")")
            }
            Condition::Or(parts) => {
                write!(f, "(or")?;
                for part in parts {
                    write!(f, " {}", part)?;
                }
                write!(f, ")")
            }
            Condition::Not(inner) => write!(f, "(not {})", inner),
            Condition::Unsupported(name) => write!(f, "({})", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::{Atom, Name};

    fn atom(name: &str) -> Condition {
        Condition::Literal(Literal::Positive(Atom::new(Name::new(name), vec![])))
    }

    #[test]
    fn literal_dnf_is_singleton() {
        let dnf = atom("p").to_dnf();
        assert_eq!(dnf.len(), 1);
        assert_eq!(dnf[0].len(), 1);
    }

    #[test]
    fn or_of_ands_distributes() {
        // (and (or p q) r) => (p ∧ r) ∨ (q ∧ r)
        let condition = Condition::And(vec![
            Condition::Or(vec![atom("p"), atom("q")]),
            atom("r"),
        ]);
        let dnf = condition.to_dnf();
        assert_eq!(dnf.len(), 2);
        assert!(dnf.iter().all(|conjunct| conjunct.len() == 2));
    }

    #[test]
    fn negation_pushes_to_atoms() {
        // (not (and p q)) => (¬p) ∨ (¬q)
        let condition = Condition::Not(Box::new(Condition::And(vec![atom("p"), atom("q")])));
        let dnf = condition.to_dnf();
        assert_eq!(dnf.len(), 2);
        assert!(dnf.iter().all(|conjunct| conjunct[0].is_negated()));
    }
}
