use subsat_common::{Lit, Var};

/// Truth value of a variable during search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Value {
    True,
    False,
    #[default]
    Unassigned,
}

impl Value {
    pub fn from_bool(b: bool) -> Self {
        if b { Value::True } else { Value::False }
    }
}

/// The solver's current partial assignment, indexed by variable.
#[derive(Clone, Debug, Default)]
pub struct Assignment(Vec<Value>);

impl Assignment {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value(&self, var: Var) -> Value {
        self.0[var as usize]
    }

    /// Value of a literal: the value of its variable, inverted for a
    /// negated literal. Unassigned stays unassigned.
    pub fn lit_value(&self, lit: Lit) -> Value {
        match self.value(lit.var()) {
            Value::Unassigned => Value::Unassigned,
            Value::True => Value::from_bool(!lit.is_negated()),
            Value::False => Value::from_bool(lit.is_negated()),
        }
    }

    pub(crate) fn grow(&mut self) {
        self.0.push(Value::Unassigned);
    }

    pub(crate) fn set(&mut self, var: Var, value: bool) {
        self.0[var as usize] = Value::from_bool(value);
    }

    pub(crate) fn unset(&mut self, var: Var) {
        self.0[var as usize] = Value::Unassigned;
    }

    pub(crate) fn snapshot(&self) -> Vec<bool> {
        self.0.iter().map(|&v| v == Value::True).collect()
    }
}
