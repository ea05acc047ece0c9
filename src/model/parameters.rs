//! Read and validate model parameters from `model.toml`.
use crate::input::{input_err_msg, is_sorted_and_unique, read_toml};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// Default half-width of the tolerance band for tolerant commodity balances.
///
/// This absorbs solver and rounding noise; it is not meant to permit genuine imbalances.
pub const DEFAULT_COMMODITY_BALANCE_TOLERANCE: f64 = 1e-3;

fn default_commodity_balance_tolerance() -> f64 {
    DEFAULT_COMMODITY_BALANCE_TOLERANCE
}

/// Model parameters as defined in the `model.toml` file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// Milestone years
    pub milestone_years: Vec<u32>,
    /// Tolerance applied to commodity balances which need not hold exactly
    #[serde(default = "default_commodity_balance_tolerance")]
    pub commodity_balance_tolerance: f64,
}

/// Check that the `milestone_years` parameter is valid
fn check_milestone_years(years: &[u32]) -> Result<()> {
    ensure!(!years.is_empty(), "`milestone_years` is empty");

    ensure!(
        is_sorted_and_unique(years),
        "`milestone_years` must be composed of unique values in order"
    );

    Ok(())
}

/// Check that the `commodity_balance_tolerance` parameter is valid
fn check_commodity_balance_tolerance(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "commodity_balance_tolerance must be a finite number greater than or equal to zero"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_milestone_years(&self.milestone_years)?;
        check_commodity_balance_tolerance(self.commodity_balance_tolerance)?;

        Ok(())
    }
}
