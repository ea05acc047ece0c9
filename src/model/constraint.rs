//! Named linear constraints, indexed by labelled coordinates.
use super::Variable;
use crate::expression::{Coords, LinearTerms};
use float_cmp::approx_eq;
use indexmap::IndexMap;

/// The relation between the left- and right-hand sides of a constraint row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// lhs == rhs
    Equal,
    /// lhs <= rhs
    LessEqual,
    /// lhs >= rhs
    GreaterEqual,
}

/// A single linear relation: `sum(coeff * var) <sense> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRow {
    /// Coefficient for each variable
    pub terms: IndexMap<Variable, f64>,
    /// The relation between the two sides
    pub sense: ConstraintSense,
    /// The right-hand side
    pub rhs: f64,
}

impl ConstraintRow {
    /// The value of the left-hand side for the given variable values
    pub fn lhs_value(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values[var.index()])
            .sum()
    }

    /// The right-hand side minus the value of the left-hand side
    pub fn residual(&self, values: &[f64]) -> f64 {
        self.rhs - self.lhs_value(values)
    }

    /// Whether the row holds for the given variable values
    pub fn is_satisfied(&self, values: &[f64]) -> bool {
        let lhs = self.lhs_value(values);
        match self.sense {
            ConstraintSense::Equal => approx_eq!(f64, lhs, self.rhs),
            ConstraintSense::LessEqual => lhs <= self.rhs,
            ConstraintSense::GreaterEqual => lhs >= self.rhs,
        }
    }
}

/// A family of constraint rows, one for each coordinate of the remaining dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    dims: Vec<String>,
    rows: IndexMap<Coords, ConstraintRow>,
}

impl Constraint {
    /// Build a constraint from the cells of a linear expression.
    ///
    /// Each cell's constant is moved to the right-hand side.
    pub fn from_cells<'a, I>(dims: Vec<String>, cells: I, sense: ConstraintSense, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (&'a Coords, &'a LinearTerms)>,
    {
        let rows = cells
            .into_iter()
            .map(|(coords, terms)| {
                let row = ConstraintRow {
                    terms: terms.terms.clone(),
                    sense,
                    rhs: rhs - terms.constant,
                };
                (coords.clone(), row)
            })
            .collect();

        Self { dims, rows }
    }

    /// Names of the dimensions the constraint is indexed over
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Get the row at the given coordinates
    pub fn get(&self, coords: &[&str]) -> Option<&ConstraintRow> {
        let coords: Coords = coords.iter().map(ToString::to_string).collect();
        self.rows.get(&coords)
    }

    /// Iterate over the rows of the constraint
    pub fn iter(&self) -> impl Iterator<Item = (&Coords, &ConstraintRow)> {
        self.rows.iter()
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the constraint has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows which do not hold for the given variable values
    pub fn iter_violations<'a>(
        &'a self,
        values: &'a [f64],
    ) -> impl Iterator<Item = (&'a Coords, &'a ConstraintRow)> {
        self.rows
            .iter()
            .filter(move |(_, row)| !row.is_satisfied(values))
    }
}
