//! The optimisation model holds the decision variables and named constraints of the linear
//! program while it is being assembled.
//!
//! Constraint builders only ever add to the model. Names are unique across the whole model, so a
//! builder can never overwrite constraints belonging to another.
use crate::expression::Coords;
use anyhow::{Result, ensure};
use highs::RowProblem as Problem;
use indexmap::IndexMap;
use std::ops::RangeInclusive;

pub mod constraint;
pub use constraint::{Constraint, ConstraintRow, ConstraintSense};

pub mod parameters;
pub use parameters::ModelParameters;

/// A decision variable in the model.
///
/// This is only a handle; values for variables are supplied separately, indexed by
/// [`Variable::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {
    /// The position of this variable in the model
    pub fn index(self) -> usize {
        self.0
    }
}

/// Objective cost and bounds of a variable
#[derive(Debug, Clone, PartialEq)]
struct VariableDefinition {
    cost: f64,
    bounds: RangeInclusive<f64>,
}

/// Key for each row of a lowered problem: the constraint name and the row's coordinates
pub type RowKeys = Vec<(String, Coords)>;

/// A linear/mixed-integer program under construction
#[derive(Debug, Default)]
pub struct OptimisationModel {
    variables: Vec<VariableDefinition>,
    constraints: IndexMap<String, Constraint>,
}

impl OptimisationModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a continuous variable with the given objective cost and bounds
    pub fn add_variable(&mut self, cost: f64, bounds: RangeInclusive<f64>) -> Variable {
        let var = Variable(self.variables.len());
        self.variables.push(VariableDefinition { cost, bounds });
        var
    }

    /// The number of variables in the model
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Register a constraint under `name`.
    ///
    /// Returns an error if a constraint with this name already exists.
    pub fn add_constraint(&mut self, name: &str, constraint: Constraint) -> Result<()> {
        ensure!(
            !self.constraints.contains_key(name),
            "A constraint named {name} already exists"
        );

        self.constraints.insert(name.to_string(), constraint);

        Ok(())
    }

    /// Get a constraint by name
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    /// Whether a constraint with this name has been registered
    pub fn has_constraint(&self, name: &str) -> bool {
        self.constraints.contains_key(name)
    }

    /// Iterate over constraints in the order they were added
    pub fn iter_constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints
            .iter()
            .map(|(name, constraint)| (name.as_str(), constraint))
    }

    /// Iterate over the names of constraints in the order they were added
    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    /// The total number of constraint rows
    pub fn num_rows(&self) -> usize {
        self.constraints.values().map(Constraint::len).sum()
    }

    /// Convert the model into a HiGHS problem.
    ///
    /// Columns are added in variable order and rows in the order constraints were registered, so
    /// that values and duals in the solution can be matched up with the returned keys.
    pub fn to_row_problem(&self) -> (Problem, RowKeys) {
        let mut problem = Problem::default();
        let columns: Vec<highs::Col> = self
            .variables
            .iter()
            .map(|var| problem.add_column(var.cost, var.bounds.clone()))
            .collect();

        let mut keys = Vec::with_capacity(self.num_rows());
        for (name, constraint) in &self.constraints {
            for (coords, row) in constraint.iter() {
                let terms = row
                    .terms
                    .iter()
                    .map(|(var, coeff)| (columns[var.index()], *coeff));
                let rhs = row.rhs;
                match row.sense {
                    ConstraintSense::Equal => problem.add_row(rhs..=rhs, terms),
                    ConstraintSense::LessEqual => problem.add_row(..=rhs, terms),
                    ConstraintSense::GreaterEqual => problem.add_row(rhs.., terms),
                };
                keys.push((name.clone(), coords.clone()));
            }
        }

        (problem, keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Dimension, LinearExpression, LinearTerms};
    use crate::fixture::assert_error;
    use highs::{HighsModelStatus, Sense};

    /// `x - y` over a single year
    fn difference(model: &mut OptimisationModel, upper: f64) -> LinearExpression {
        let x = model.add_variable(-1.0, 0.0..=upper);
        let y = model.add_variable(0.0, 0.0..=2.0);
        let mut expr = LinearExpression::new(vec![Dimension::new("YEAR", ["2020"])]);
        expr.insert(
            vec!["2020".into()],
            LinearTerms::from_terms([(x, 1.0), (y, -1.0)]),
        )
        .unwrap();
        expr
    }

    #[test]
    fn add_constraint_duplicate_name() {
        let mut model = OptimisationModel::new();
        let expr = difference(&mut model, 10.0);
        model.add_constraint("c", expr.less_equal(0.0)).unwrap();
        assert_error!(
            model.add_constraint("c", expr.greater_equal(0.0)),
            "A constraint named c already exists"
        );
        assert_eq!(model.constraint("c").unwrap(), &expr.less_equal(0.0));
    }

    #[test]
    fn constraints_keep_order() {
        let mut model = OptimisationModel::new();
        let expr = difference(&mut model, 10.0);
        model.add_constraint("b", expr.less_equal(0.0)).unwrap();
        model.add_constraint("a", expr.greater_equal(0.0)).unwrap();
        assert!(model.constraint_names().eq(["b", "a"]));
        assert_eq!(model.num_rows(), 2);
        assert!(model.has_constraint("a"));
        assert!(!model.has_constraint("c"));
    }

    #[test]
    fn to_row_problem_keys() {
        let mut model = OptimisationModel::new();
        let expr = difference(&mut model, 10.0);
        model.add_constraint("upper", expr.less_equal(1.0)).unwrap();
        model.add_constraint("lower", expr.greater_equal(-1.0)).unwrap();

        let (_, keys) = model.to_row_problem();
        assert_eq!(
            keys,
            [
                ("upper".to_string(), vec!["2020".to_string()]),
                ("lower".to_string(), vec!["2020".to_string()])
            ]
        );
    }

    #[test]
    fn to_row_problem_solves() {
        // Maximise x subject to x - y <= 1 and y <= 2
        let mut model = OptimisationModel::new();
        let expr = difference(&mut model, 10.0);
        model.add_constraint("upper", expr.less_equal(1.0)).unwrap();

        let (problem, _) = model.to_row_problem();
        let solved = problem.optimise(Sense::Minimise).try_solve().unwrap();
        assert!(matches!(solved.status(), HighsModelStatus::Optimal));
        let values = solved.get_solution().columns().to_vec();
        assert!((values[0] - 3.0).abs() < 1e-6);
        let constraint = model.constraint("upper").unwrap();
        assert!(constraint.iter_violations(&values).next().is_none());
    }

    #[test]
    fn to_row_problem_infeasible() {
        // x - y == 5 cannot hold with x <= 1 and y >= 0
        let mut model = OptimisationModel::new();
        let expr = difference(&mut model, 1.0);
        let mut rhs = LinearExpression::new(vec![Dimension::new("YEAR", ["2020"])]);
        rhs.insert(
            vec!["2020".into()],
            LinearTerms {
                constant: 5.0,
                ..LinearTerms::default()
            },
        )
        .unwrap();
        model
            .add_constraint("equal", expr.equal_to(&rhs).unwrap())
            .unwrap();

        let (problem, _) = model.to_row_problem();
        let solved = problem.optimise(Sense::Minimise).try_solve().unwrap();
        assert!(matches!(
            solved.status(),
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible
        ));
    }
}
