//! Common routines for handling input data.
use crate::commodity::CommodityID;
use crate::dataset::{FUEL, ParameterDataset, REGION, RegionID, TIMESLICE, TimeSliceID, YEAR};
use crate::model::ModelParameters;
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::Path;

mod commodity;
use commodity::read_commodity_ids;
mod production;
pub use production::{ProductionMap, read_production};

const REGIONS_FILE_NAME: &str = "regions.csv";
const TIME_SLICES_FILE_NAME: &str = "time_slices.csv";

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = read_csv_internal(file_path)?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}

/// Read a series of type `T`s from a CSV file, returning an empty `Vec` if the file is missing
pub fn read_csv_optional<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    if !file_path.exists() {
        return Ok(Vec::new());
    }

    read_csv_internal(file_path)
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Check whether the values are strictly increasing (i.e. sorted with no duplicates)
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// A row of a CSV file which defines a set of IDs.
///
/// Other columns (e.g. `description`) are ignored.
#[derive(Deserialize)]
struct IDRaw {
    id: String,
}

/// Read a CSV file of IDs, checking that they are non-empty and unique
fn read_id_file<ID>(file_path: &Path) -> Result<IndexSet<ID>>
where
    ID: From<String> + Eq + Hash + Display,
{
    let mut ids = IndexSet::new();
    for raw in read_csv::<IDRaw>(file_path)? {
        let id = raw.id.trim();
        ensure!(!id.is_empty(), "IDs cannot be empty ({})", file_path.display());
        let id = ID::from(id.to_string());
        ensure!(
            !ids.contains(&id),
            "Duplicate ID {id} found in {}",
            file_path.display()
        );
        ids.insert(id);
    }

    Ok(ids)
}

/// The static input data for a model
#[derive(Debug)]
pub struct ModelInput {
    /// Parameters from `model.toml`
    pub parameters: ModelParameters,
    /// All region IDs
    pub region_ids: IndexSet<RegionID>,
    /// All time slice IDs
    pub time_slice_ids: IndexSet<TimeSliceID>,
    /// All commodity IDs
    pub commodity_ids: IndexSet<CommodityID>,
}

impl ModelInput {
    /// Build the parameter dataset with `REGION`, `TIMESLICE`, `FUEL` and `YEAR` dimensions
    pub fn to_dataset(&self) -> Result<ParameterDataset> {
        ParameterDataset::new()
            .with_dimension(REGION, self.region_ids.iter().map(ToString::to_string))?
            .with_dimension(TIMESLICE, self.time_slice_ids.iter().map(ToString::to_string))?
            .with_dimension(FUEL, self.commodity_ids.iter().map(ToString::to_string))?
            .with_dimension(
                YEAR,
                self.parameters.milestone_years.iter().map(ToString::to_string),
            )
    }
}

/// Read the model's parameters, regions, time slices and commodities.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<ModelInput> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let region_ids = read_id_file(&model_dir.join(REGIONS_FILE_NAME))?;
    let time_slice_ids = read_id_file(&model_dir.join(TIME_SLICES_FILE_NAME))?;
    let commodity_ids = read_commodity_ids(model_dir)?;

    Ok(ModelInput {
        parameters,
        region_ids,
        time_slice_ids,
        commodity_ids,
    })
}
