//! Fixtures for tests

use crate::check::{ProductionVariableMap, add_production_variables};
use crate::commodity::{FINAL_ELC, GEN_ELC, PRIMARY_ELECTRICITY, SECONDARY_ELECTRICITY};
use crate::commodity_balance::PRODUCTION_EXPRESSION;
use crate::dataset::{FUEL, ParameterDataset, REGION, TIMESLICE, YEAR};
use crate::expression::ExpressionRegistry;
use crate::input::ModelInput;
use crate::model::parameters::DEFAULT_COMMODITY_BALANCE_TOLERANCE;
use crate::model::{ModelParameters, OptimisationModel};
use indexmap::IndexSet;
use rstest::fixture;
use std::fs;
use std::path::Path;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn model_input() -> ModelInput {
    ModelInput {
        parameters: ModelParameters {
            milestone_years: vec![2020, 2030],
            commodity_balance_tolerance: DEFAULT_COMMODITY_BALANCE_TOLERANCE,
        },
        region_ids: IndexSet::from(["GBR".into(), "USA".into()]),
        time_slice_ids: IndexSet::from(["winter.day".into(), "summer.day".into()]),
        commodity_ids: [GEN_ELC, FINAL_ELC, PRIMARY_ELECTRICITY, SECONDARY_ELECTRICITY]
            .into_iter()
            .map(Into::into)
            .collect(),
    }
}

/// Write a minimal model directory with two regions, two time slices and the given commodities
pub fn write_model_dir(dir: &Path, commodities: &[&str]) {
    fs::write(dir.join("model.toml"), "milestone_years = [2020, 2030]\n").unwrap();
    fs::write(
        dir.join("regions.csv"),
        "id,description\nGBR,United Kingdom\nUSA,United States\n",
    )
    .unwrap();
    fs::write(dir.join("time_slices.csv"), "id\nwinter.day\nsummer.day\n").unwrap();

    let mut commodities_csv = String::from("id\n");
    for commodity in commodities {
        commodities_csv.push_str(commodity);
        commodities_csv.push('\n');
    }
    fs::write(dir.join("commodities.csv"), commodities_csv).unwrap();
}

/// A dataset and model with one production variable per region, time slice and fuel, for 2020
pub struct ProductionFixture {
    pub dataset: ParameterDataset,
    pub model: OptimisationModel,
    pub expressions: ExpressionRegistry,
    pub variables: ProductionVariableMap,
}

impl ProductionFixture {
    /// Create a fixture with regions GBR and USA, time slices day and night and the given fuels
    pub fn new(fuels: &[&str]) -> Self {
        let dataset = ParameterDataset::new()
            .with_dimension(REGION, ["GBR", "USA"])
            .unwrap()
            .with_dimension(TIMESLICE, ["day", "night"])
            .unwrap()
            .with_dimension(FUEL, fuels.iter().copied())
            .unwrap()
            .with_dimension(YEAR, ["2020"])
            .unwrap();
        let mut model = OptimisationModel::new();
        let (production, variables) = add_production_variables(&dataset, &mut model).unwrap();
        let mut expressions = ExpressionRegistry::new();
        expressions.insert(PRODUCTION_EXPRESSION, production);

        Self {
            dataset,
            model,
            expressions,
            variables,
        }
    }

    /// Variable values for the given (region, time slice, fuel, production) tuples in 2020.
    ///
    /// All other variables are zero.
    pub fn values(&self, production: &[(&str, &str, &str, f64)]) -> Vec<f64> {
        let mut values = vec![0.0; self.model.num_variables()];
        for &(region, time_slice, fuel, value) in production {
            let coords = vec![
                region.to_string(),
                time_slice.to_string(),
                fuel.to_string(),
                "2020".to_string(),
            ];
            values[self.variables[&coords].index()] = value;
        }

        values
    }
}
