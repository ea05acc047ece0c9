//! Linear expressions over labelled dimensions.
//!
//! A [`LinearExpression`] maps each coordinate (one label per dimension) to a sum of decision
//! variables multiplied by coefficients, plus a constant. Expressions can be restricted to a
//! single label of a dimension, summed over a dimension, subtracted from each other and compared to
//! produce [`Constraint`]s.
use crate::model::{Constraint, ConstraintSense, Variable};
use indexmap::{IndexMap, IndexSet};
use std::error::Error;
use std::fmt;

/// The labels identifying a single cell of an expression, in dimension order
pub type Coords = Vec<String>;

/// A named dimension along with its labels
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Name of the dimension (e.g. "REGION")
    pub name: String,
    /// Labels for the dimension, in order
    pub labels: IndexSet<String>,
}

impl Dimension {
    /// Create a new [`Dimension`]
    pub fn new<I, S>(name: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors arising from looking up or manipulating linear expressions
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// No expression with this key is in the registry
    Missing(String),
    /// The expression has no dimension with this name
    MissingDimension(String),
    /// The dimension has no such label
    MissingLabel {
        /// Name of the dimension
        dim: String,
        /// The label which was requested
        label: String,
    },
    /// Two expressions cannot be combined because their dimensions differ
    DimensionMismatch {
        /// Dimensions of the left-hand expression
        lhs: Vec<String>,
        /// Dimensions of the right-hand expression
        rhs: Vec<String>,
    },
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Missing(key) => write!(f, "No linear expression named {key}"),
            ExpressionError::MissingDimension(dim) => {
                write!(f, "Expression has no dimension {dim}")
            }
            ExpressionError::MissingLabel { dim, label } => {
                write!(f, "Dimension {dim} has no label {label}")
            }
            ExpressionError::DimensionMismatch { lhs, rhs } => write!(
                f,
                "Dimensions do not match: [{}] vs [{}]",
                lhs.join(", "),
                rhs.join(", ")
            ),
        }
    }
}

impl Error for ExpressionError {}

/// A sum of variables multiplied by coefficients, plus a constant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearTerms {
    /// Coefficient for each variable
    pub terms: IndexMap<Variable, f64>,
    /// Constant term
    pub constant: f64,
}

impl LinearTerms {
    /// A single variable with a coefficient of one
    pub fn from_variable(var: Variable) -> Self {
        Self::from_terms([(var, 1.0)])
    }

    /// Create from (variable, coefficient) pairs. Repeated variables have their coefficients added.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let mut out = Self::default();
        for (var, coeff) in terms {
            out.add_term(var, coeff);
        }
        out
    }

    /// Add `coeff * var`
    pub fn add_term(&mut self, var: Variable, coeff: f64) {
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coeff;
        if *entry == 0.0 {
            self.terms.shift_remove(&var);
        }
    }

    /// Add `scale * other` to these terms
    fn add_scaled(&mut self, other: &LinearTerms, scale: f64) {
        for (var, coeff) in &other.terms {
            self.add_term(*var, scale * coeff);
        }
        self.constant += scale * other.constant;
    }

    /// Evaluate these terms given a value for every variable, indexed by [`Variable::index`]
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values[var.index()])
            .sum::<f64>()
            + self.constant
    }
}

/// A linear expression indexed by labelled dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpression {
    dims: Vec<Dimension>,
    cells: IndexMap<Coords, LinearTerms>,
}

impl LinearExpression {
    /// Create an empty expression with the given dimensions
    pub fn new(dims: Vec<Dimension>) -> Self {
        Self {
            dims,
            cells: IndexMap::new(),
        }
    }

    /// Set the terms for the cell at `coords`.
    ///
    /// `coords` must contain one known label for each dimension, in order.
    pub fn insert(&mut self, coords: Coords, terms: LinearTerms) -> Result<(), ExpressionError> {
        if coords.len() != self.dims.len() {
            return Err(ExpressionError::DimensionMismatch {
                lhs: self.dim_names(),
                rhs: coords,
            });
        }
        for (dim, label) in self.dims.iter().zip(&coords) {
            if !dim.labels.contains(label) {
                return Err(ExpressionError::MissingLabel {
                    dim: dim.name.clone(),
                    label: label.clone(),
                });
            }
        }
        self.cells.insert(coords, terms);

        Ok(())
    }

    /// The dimensions of this expression
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// The names of this expression's dimensions, in order
    pub fn dim_names(&self) -> Vec<String> {
        self.dims.iter().map(|dim| dim.name.clone()).collect()
    }

    /// Get the terms for a cell
    pub fn get(&self, coords: &[&str]) -> Option<&LinearTerms> {
        let coords: Coords = coords.iter().map(ToString::to_string).collect();
        self.cells.get(&coords)
    }

    /// Iterate over the cells of the expression
    pub fn iter(&self) -> impl Iterator<Item = (&Coords, &LinearTerms)> {
        self.cells.iter()
    }

    fn dim_index(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d.name == dim)
    }

    /// Restrict the expression to a single label of `dim`, dropping that dimension
    pub fn sel(&self, dim: &str, label: &str) -> Result<LinearExpression, ExpressionError> {
        let idx = self
            .dim_index(dim)
            .ok_or_else(|| ExpressionError::MissingDimension(dim.to_string()))?;
        if !self.dims[idx].labels.contains(label) {
            return Err(ExpressionError::MissingLabel {
                dim: dim.to_string(),
                label: label.to_string(),
            });
        }

        let mut dims = self.dims.clone();
        dims.remove(idx);
        let cells = self
            .cells
            .iter()
            .filter(|(coords, _)| coords[idx] == label)
            .map(|(coords, terms)| {
                let mut coords = coords.clone();
                coords.remove(idx);
                (coords, terms.clone())
            })
            .collect();

        Ok(LinearExpression { dims, cells })
    }

    /// Sum the expression over `dim`, dropping that dimension.
    ///
    /// If the expression has no such dimension, it is returned unchanged.
    pub fn sum(&self, dim: &str) -> LinearExpression {
        let Some(idx) = self.dim_index(dim) else {
            return self.clone();
        };

        let mut dims = self.dims.clone();
        dims.remove(idx);
        let mut cells: IndexMap<Coords, LinearTerms> = IndexMap::new();
        for (coords, terms) in &self.cells {
            let mut coords = coords.clone();
            coords.remove(idx);
            cells.entry(coords).or_default().add_scaled(terms, 1.0);
        }

        LinearExpression { dims, cells }
    }

    /// Subtract `other` from this expression.
    ///
    /// Both expressions must have the same dimensions, though not necessarily in the same order.
    /// The result covers the union of both expressions' cells; a cell which is only present on one
    /// side is treated as zero on the other.
    pub fn sub(&self, other: &LinearExpression) -> Result<LinearExpression, ExpressionError> {
        let mismatch = || ExpressionError::DimensionMismatch {
            lhs: self.dim_names(),
            rhs: other.dim_names(),
        };
        if self.dims.len() != other.dims.len() {
            return Err(mismatch());
        }

        // Position of each of our dimensions in `other`
        let order: Vec<usize> = self
            .dims
            .iter()
            .map(|dim| other.dim_index(&dim.name).ok_or_else(mismatch))
            .collect::<Result<_, _>>()?;

        let mut dims = self.dims.clone();
        for (dim, &other_idx) in dims.iter_mut().zip(&order) {
            dim.labels
                .extend(other.dims[other_idx].labels.iter().cloned());
        }

        let mut cells = self.cells.clone();
        for (coords, terms) in &other.cells {
            let coords = order.iter().map(|&i| coords[i].clone()).collect();
            cells.entry(coords).or_default().add_scaled(terms, -1.0);
        }

        Ok(LinearExpression { dims, cells })
    }

    /// Constrain this expression to equal `other` in every cell
    pub fn equal_to(&self, other: &LinearExpression) -> Result<Constraint, ExpressionError> {
        Ok(self.sub(other)?.compare(ConstraintSense::Equal, 0.0))
    }

    /// Constrain this expression to be at most `rhs` in every cell
    pub fn less_equal(&self, rhs: f64) -> Constraint {
        self.compare(ConstraintSense::LessEqual, rhs)
    }

    /// Constrain this expression to be at least `rhs` in every cell
    pub fn greater_equal(&self, rhs: f64) -> Constraint {
        self.compare(ConstraintSense::GreaterEqual, rhs)
    }

    fn compare(&self, sense: ConstraintSense, rhs: f64) -> Constraint {
        Constraint::from_cells(self.dim_names(), self.cells.iter(), sense, rhs)
    }
}

/// Linear expressions for the model, keyed by name
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpressionRegistry(IndexMap<String, LinearExpression>);

impl ExpressionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expression, replacing any existing one with the same key
    pub fn insert(&mut self, key: &str, expr: LinearExpression) {
        self.0.insert(key.to_string(), expr);
    }

    /// Look up an expression by key
    pub fn get(&self, key: &str) -> Result<&LinearExpression, ExpressionError> {
        self.0
            .get(key)
            .ok_or_else(|| ExpressionError::Missing(key.to_string()))
    }

    /// The number of expressions in the registry
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
