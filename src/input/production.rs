//! Code for reading a production point (a value for each production variable) from a CSV file.
use super::{ModelInput, input_err_msg, read_csv_optional};
use crate::commodity::CommodityID;
use crate::dataset::{RegionID, TimeSliceID};
use crate::id::IDCollection;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

const PRODUCTION_FILE_NAME: &str = "production.csv";

/// Production values, keyed by region, time slice, commodity and year
pub type ProductionMap = IndexMap<(RegionID, TimeSliceID, CommodityID, u32), f64>;

#[derive(Deserialize)]
struct ProductionRaw {
    region_id: String,
    time_slice: String,
    commodity_id: String,
    year: u32,
    value: f64,
}

/// Read production values from the model directory.
///
/// The file is optional. Combinations of parameters which are not listed are assumed to have a
/// production of zero.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `input` - The model's static input data
///
/// # Returns
///
/// `None` if there is no production file, otherwise the values read from it or an error.
pub fn read_production(model_dir: &Path, input: &ModelInput) -> Result<Option<ProductionMap>> {
    let file_path = model_dir.join(PRODUCTION_FILE_NAME);
    if !file_path.exists() {
        return Ok(None);
    }

    let production_csv: Vec<ProductionRaw> = read_csv_optional(&file_path)?;
    let production = read_production_from_iter(production_csv.into_iter(), input)
        .with_context(|| input_err_msg(&file_path))?;

    Ok(Some(production))
}

fn read_production_from_iter<I>(iter: I, input: &ModelInput) -> Result<ProductionMap>
where
    I: Iterator<Item = ProductionRaw>,
{
    let mut map = ProductionMap::new();
    for raw in iter {
        let region_id = input.region_ids.get_id(&raw.region_id)?;
        let time_slice = input.time_slice_ids.get_id(&raw.time_slice)?;
        let commodity_id = input.commodity_ids.get_id(&raw.commodity_id)?;
        ensure!(
            input.parameters.milestone_years.contains(&raw.year),
            "Year {} is not a milestone year",
            raw.year
        );
        ensure!(
            raw.value.is_finite(),
            "Production values must be finite numbers"
        );

        let key = (region_id, time_slice, commodity_id, raw.year);
        ensure!(
            map.insert(key, raw.value).is_none(),
            "Duplicate production value for region {}, time slice {}, commodity {}, year {}",
            raw.region_id,
            raw.time_slice,
            raw.commodity_id,
            raw.year
        );
    }

    Ok(map)
}
