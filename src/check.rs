//! Check a model's production against its commodity balance constraints.
//!
//! This assembles a minimal optimisation model from the model's input data (one production
//! variable per region, time slice, commodity and year), adds the commodity balance constraints to
//! it and, if production values were supplied, reports which constraint rows they violate.
use crate::commodity_balance::{PRODUCTION_EXPRESSION, add_commodity_balance_constraints};
use crate::dataset::{FUEL, ParameterDataset, REGION, TIMESLICE, YEAR};
use crate::expression::{Coords, Dimension, ExpressionRegistry, LinearExpression, LinearTerms};
use crate::input::{ModelInput, ProductionMap};
use crate::model::{OptimisationModel, Variable};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::iproduct;

/// Production variables, keyed by (region, time slice, commodity, year) coordinates
pub type ProductionVariableMap = IndexMap<Coords, Variable>;

/// A constraint row which does not hold for the supplied production values
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Name of the constraint
    pub name: String,
    /// Coordinates of the row
    pub coords: Coords,
    /// Right-hand side minus left-hand side
    pub residual: f64,
}

/// The result of checking a model
#[derive(Debug)]
pub struct CheckReport {
    /// The model, including the commodity balance constraints
    pub model: OptimisationModel,
    /// Violated constraint rows, if production values were supplied
    pub violations: Option<Vec<Violation>>,
}

/// Add a non-negative production variable for every combination of region, time slice, commodity
/// and year in the dataset.
///
/// # Returns
///
/// The production expression and the variable for each of its cells.
pub fn add_production_variables(
    dataset: &ParameterDataset,
    model: &mut OptimisationModel,
) -> Result<(LinearExpression, ProductionVariableMap)> {
    let dims = [REGION, TIMESLICE, FUEL, YEAR]
        .into_iter()
        .map(|name| {
            dataset
                .coords(name)
                .map(|labels| Dimension::new(name, labels.iter().cloned()))
                .with_context(|| format!("Dataset has no {name} dimension"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut variables = ProductionVariableMap::new();
    let mut production = LinearExpression::new(dims.clone());
    for (region, time_slice, commodity, year) in iproduct!(
        &dims[0].labels,
        &dims[1].labels,
        &dims[2].labels,
        &dims[3].labels
    ) {
        let coords: Coords = vec![
            region.clone(),
            time_slice.clone(),
            commodity.clone(),
            year.clone(),
        ];
        let var = model.add_variable(0.0, 0.0..=f64::INFINITY);
        production.insert(coords.clone(), LinearTerms::from_variable(var))?;
        variables.insert(coords, var);
    }

    Ok((production, variables))
}

/// Build the model's commodity balance constraints and check them against `production`.
///
/// # Arguments
///
/// * `input` - The model's static input data
/// * `production` - Production values; combinations which are not present are taken to be zero
pub fn check_model(input: &ModelInput, production: Option<&ProductionMap>) -> Result<CheckReport> {
    let dataset = input.to_dataset()?;
    let mut model = OptimisationModel::new();
    let (expr, variables) = add_production_variables(&dataset, &mut model)?;
    let mut expressions = ExpressionRegistry::new();
    expressions.insert(PRODUCTION_EXPRESSION, expr);

    add_commodity_balance_constraints(
        &dataset,
        &mut model,
        &expressions,
        input.parameters.commodity_balance_tolerance,
    )?;

    let violations =
        production.map(|production| find_violations(&model, &variables, production));

    Ok(CheckReport { model, violations })
}

/// Evaluate every constraint row at the given production values
fn find_violations(
    model: &OptimisationModel,
    variables: &ProductionVariableMap,
    production: &ProductionMap,
) -> Vec<Violation> {
    let mut values = vec![0.0; model.num_variables()];
    for ((region_id, time_slice, commodity_id, year), value) in production {
        let coords = vec![
            region_id.to_string(),
            time_slice.to_string(),
            commodity_id.to_string(),
            year.to_string(),
        ];
        values[variables[&coords].index()] = *value;
    }

    model
        .iter_constraints()
        .flat_map(|(name, constraint)| {
            constraint
                .iter_violations(&values)
                .map(|(coords, row)| Violation {
                    name: name.to_string(),
                    coords: coords.clone(),
                    residual: row.residual(&values),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
