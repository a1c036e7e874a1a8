//! A propositional formula builder, generic over the variable type.

use crate::planning::CartesianProduct;

/// A literal over an abstract variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<V> {
    pub variable: V,
    pub positive: bool,
}

impl<V> Literal<V> {
    pub fn new(variable: V, positive: bool) -> Self {
        Self { variable, positive }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clause<V> {
    pub literals: Vec<Literal<V>>,
}

/// A conjunction of clauses, built literal by literal. [`Formula::add_dnf`]
/// additionally interprets a formula as a *disjunction of conjunctions* and
/// distributes it into clauses.
#[derive(Debug, Clone)]
pub struct Formula<V> {
    current: Vec<Literal<V>>,
    pub clauses: Vec<Clause<V>>,
}

impl<V: Copy> Formula<V> {
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
            clauses: Vec::new(),
        }
    }

    /// Appends a literal to the clause under construction.
    pub fn add(&mut self, literal: Literal<V>) {
        self.current.push(literal);
    }

    /// Finishes the clause under construction.
    pub fn end_clause(&mut self) {
        self.clauses.push(Clause {
            literals: std::mem::take(&mut self.current),
        });
    }

    pub fn add_clause<I: IntoIterator<Item = Literal<V>>>(&mut self, literals: I) {
        debug_assert!(self.current.is_empty());
        self.clauses.push(Clause {
            literals: literals.into_iter().collect(),
        });
    }

    /// Pairwise exclusion clauses over a group of variables.
    pub fn at_most_one(&mut self, group: &[V]) {
        for (index, &first) in group.iter().enumerate() {
            for &second in &group[index + 1..] {
                self.add_clause([Literal::new(first, false), Literal::new(second, false)]);
            }
        }
    }

    /// Reads `dnf` as a disjunction of conjunctions (each stored clause is
    /// one conjunct) and appends its CNF, obtained by cartesian
    /// distribution: one clause per way of picking a literal from every
    /// conjunct.
    pub fn add_dnf(&mut self, dnf: &Formula<V>) {
        let sizes = dnf
            .clauses
            .iter()
            .map(|clause| clause.literals.len())
            .collect();
        for combination in CartesianProduct::new(sizes) {
            for (clause_index, &literal_index) in combination.iter().enumerate() {
                self.add(dnf.clauses[clause_index].literals[literal_index]);
            }
            self.end_clause();
        }
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}

impl<V: Copy> Default for Formula<V> {
    fn default() -> Self {
        Self::new()
    }
}
