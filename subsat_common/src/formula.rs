use std::fmt;

use crate::lit::{Lit, Var};

/// A boolean expression tree: a literal, a conjunction, or a disjunction.
///
/// Children are owned exclusively by their parent node; the tree never
/// shares subexpressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Formula {
    Lit(Lit),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

impl Formula {
    /// An empty conjunction (logically true until children are pushed).
    pub fn and() -> Self {
        Formula::And(Vec::new())
    }

    /// An empty disjunction (logically false until children are pushed).
    pub fn or() -> Self {
        Formula::Or(Vec::new())
    }

    /// Append a child to an `And`/`Or` node.
    ///
    /// # Panics
    ///
    /// Panics when called on a literal node; that is a programmer error,
    /// not a recoverable condition.
    pub fn push(&mut self, child: impl Into<Formula>) {
        match self {
            Formula::And(children) | Formula::Or(children) => children.push(child.into()),
            Formula::Lit(_) => panic!("cannot push a child onto a literal node"),
        }
    }

    /// Immediate child count; literals have none.
    pub fn len(&self) -> usize {
        match self {
            Formula::Lit(_) => 0,
            Formula::And(children) | Formula::Or(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transform the tree into its logical complement in place: literals
    /// flip polarity, `And` and `Or` swap with all children negated.
    /// Applying `negate` twice restores an equivalent formula.
    pub fn negate(&mut self) {
        match self {
            Formula::Lit(lit) => *lit = !*lit,
            Formula::And(children) => {
                for child in children.iter_mut() {
                    child.negate();
                }
                *self = Formula::Or(std::mem::take(children));
            }
            Formula::Or(children) => {
                for child in children.iter_mut() {
                    child.negate();
                }
                *self = Formula::And(std::mem::take(children));
            }
        }
    }

    /// Largest variable mentioned anywhere in the tree, if any.
    pub fn max_var(&self) -> Option<Var> {
        match self {
            Formula::Lit(lit) => Some(lit.var()),
            Formula::And(children) | Formula::Or(children) => {
                children.iter().filter_map(Formula::max_var).max()
            }
        }
    }

    /// Evaluate the tree under a total assignment of its variables.
    ///
    /// An empty conjunction is true, an empty disjunction false.
    pub fn evaluate(&self, model: &[bool]) -> bool {
        match self {
            Formula::Lit(lit) => lit.eval_with(model[lit.var() as usize]),
            Formula::And(children) => children.iter().all(|c| c.evaluate(model)),
            Formula::Or(children) => children.iter().any(|c| c.evaluate(model)),
        }
    }
}

impl From<Lit> for Formula {
    fn from(lit: Lit) -> Self {
        Formula::Lit(lit)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Lit(lit) => write!(f, "{lit}"),
            Formula::And(children) => write_children(f, children, "&"),
            Formula::Or(children) => write_children(f, children, "|"),
        }
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Formula], op: &str) -> fmt::Result {
    write!(f, "(")?;
    if children.is_empty() {
        write!(f, "{op}")?;
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}
