//! Commodity balance constraints tie paired commodity streams together so that the optimiser
//! cannot create or destroy energy between them.
//!
//! Each pair is described by a [`CommodityBalanceRule`]. For every rule whose commodities are both
//! present in the dataset's `FUEL` dimension, production of each commodity is totalled over all
//! regions and the two totals are compared for every time slice and year:
//!
//! * Exact rules add a single equality constraint named after the rule.
//! * Tolerant rules add two one-sided constraints, `{name}_upper` and `{name}_lower`, which keep
//!   the difference between the totals within `±tolerance`.
//!
//! Rules whose commodities are missing from the dataset are skipped without error.
use crate::commodity::{FINAL_ELC, GEN_ELC, PRIMARY_ELECTRICITY, SECONDARY_ELECTRICITY};
use crate::dataset::{FUEL, ParameterDataset, REGION};
use crate::expression::{ExpressionRegistry, LinearExpression};
use crate::model::OptimisationModel;
use anyhow::{Result, ensure};
use log::{debug, info};

/// Key of the production expression in the [`ExpressionRegistry`]
pub const PRODUCTION_EXPRESSION: &str = "Production";

/// How the totals of the two commodities in a rule are compared
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceComparison {
    /// The totals must be equal
    Exact,
    /// The difference between the totals must lie within `±tolerance`
    Tolerant(f64),
}

/// A balance law between two commodities
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityBalanceRule {
    /// Name of the constraint (or prefix of the names, for tolerant rules)
    pub name: &'static str,
    /// The first commodity
    pub commodity_a: &'static str,
    /// The second commodity
    pub commodity_b: &'static str,
    /// How the two commodities' totals are compared
    pub comparison: BalanceComparison,
}

/// The commodity balance rules applied to every model.
///
/// # Arguments
///
/// * `tolerance` - Half-width of the band for tolerant rules
pub fn commodity_balance_rules(tolerance: f64) -> [CommodityBalanceRule; 2] {
    [
        // All generated electricity must be consumed or transmitted
        CommodityBalanceRule {
            name: "CommodityBalance_GenELC_Equals_FinalELC",
            commodity_a: GEN_ELC,
            commodity_b: FINAL_ELC,
            comparison: BalanceComparison::Exact,
        },
        // An exact equality here is numerically brittle, hence the tolerance band
        CommodityBalanceRule {
            name: "CommodityBalance_PrimarySecondaryElectricity",
            commodity_a: PRIMARY_ELECTRICITY,
            commodity_b: SECONDARY_ELECTRICITY,
            comparison: BalanceComparison::Tolerant(tolerance),
        },
    ]
}

impl CommodityBalanceRule {
    /// Names of the constraints this rule adds to the model
    pub fn constraint_names(&self) -> Vec<String> {
        match self.comparison {
            BalanceComparison::Exact => vec![self.name.to_string()],
            BalanceComparison::Tolerant(_) => {
                vec![format!("{}_upper", self.name), format!("{}_lower", self.name)]
            }
        }
    }

    /// Whether both of the rule's commodities are in the dataset
    fn applies_to(&self, dataset: &ParameterDataset) -> bool {
        dataset.contains(FUEL, self.commodity_a) && dataset.contains(FUEL, self.commodity_b)
    }

    /// Production of `commodity`, summed over all regions
    fn total_production(
        production: &LinearExpression,
        commodity: &str,
    ) -> Result<LinearExpression> {
        Ok(production.sel(FUEL, commodity)?.sum(REGION))
    }

    /// Add the constraints for this rule to the model.
    ///
    /// Either all of the rule's constraints are added or, on error, none are.
    fn add_to_model(
        &self,
        production: &LinearExpression,
        model: &mut OptimisationModel,
    ) -> Result<()> {
        let names = self.constraint_names();
        for name in &names {
            ensure!(
                !model.has_constraint(name),
                "A constraint named {name} already exists"
            );
        }

        let total_a = Self::total_production(production, self.commodity_a)?;
        let total_b = Self::total_production(production, self.commodity_b)?;
        match self.comparison {
            BalanceComparison::Exact => {
                model.add_constraint(&names[0], total_a.equal_to(&total_b)?)?;
            }
            BalanceComparison::Tolerant(tolerance) => {
                let difference = total_a.sub(&total_b)?;
                let upper = difference.less_equal(tolerance);
                let lower = difference.greater_equal(-tolerance);
                model.add_constraint(&names[0], upper)?;
                model.add_constraint(&names[1], lower)?;
            }
        }

        info!(
            "Added commodity balance between {} and {}: {}",
            self.commodity_a,
            self.commodity_b,
            names.join(", ")
        );

        Ok(())
    }
}

/// Add commodity balance constraints to the model.
///
/// The `"Production"` expression must be present in `expressions` (even if no rules apply) and is
/// expected to be indexed over `REGION`, `TIMESLICE`, `FUEL` and `YEAR`. If it has no `REGION`
/// dimension, no summation over regions takes place.
///
/// Only `model` is modified and constraints are only ever added to it.
///
/// # Arguments
///
/// * `dataset` - The parameter dataset; only membership of the `FUEL` dimension is checked
/// * `model` - The optimisation model to add constraints to
/// * `expressions` - Linear expressions for the model
/// * `tolerance` - Half-width of the band for tolerant balances
pub fn add_commodity_balance_constraints(
    dataset: &ParameterDataset,
    model: &mut OptimisationModel,
    expressions: &ExpressionRegistry,
    tolerance: f64,
) -> Result<()> {
    let production = expressions.get(PRODUCTION_EXPRESSION)?;

    for rule in commodity_balance_rules(tolerance) {
        if !rule.applies_to(dataset) {
            debug!(
                "Skipping commodity balance {}: {} and {} are not both present in {FUEL}",
                rule.name, rule.commodity_a, rule.commodity_b
            );
            continue;
        }

        rule.add_to_model(production, model)?;
    }

    Ok(())
}
