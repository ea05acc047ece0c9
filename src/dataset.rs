//! The parameter dataset holds the labelled coordinates of a model's dimensions.
//!
//! Only coordinate membership is stored here. The dataset is populated once, while the model is
//! being assembled, and is read-only afterwards.
use crate::id::define_id_type;
use anyhow::{Result, ensure};
use indexmap::{IndexMap, IndexSet};

define_id_type! {RegionID}
define_id_type! {TimeSliceID}

/// Name of the region dimension
pub const REGION: &str = "REGION";
/// Name of the time slice dimension
pub const TIMESLICE: &str = "TIMESLICE";
/// Name of the commodity (fuel) dimension
pub const FUEL: &str = "FUEL";
/// Name of the year dimension
pub const YEAR: &str = "YEAR";

/// Labelled coordinates for each dimension, keyed by dimension name.
///
/// The order of dimensions and of labels within each dimension is preserved (see [`IndexMap`]).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParameterDataset {
    coords: IndexMap<String, IndexSet<String>>,
}

impl ParameterDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension with the given labels.
    ///
    /// Returns an error if the dimension already exists or a label is repeated.
    pub fn add_dimension<I, S>(&mut self, name: &str, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure!(
            !self.coords.contains_key(name),
            "Dimension {name} is already present in dataset"
        );

        let mut set = IndexSet::new();
        for label in labels {
            let label = label.into();
            ensure!(
                !set.contains(&label),
                "Duplicate label {label} for dimension {name}"
            );
            set.insert(label);
        }
        self.coords.insert(name.to_string(), set);

        Ok(())
    }

    /// Builder-style version of [`ParameterDataset::add_dimension`]
    pub fn with_dimension<I, S>(mut self, name: &str, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_dimension(name, labels)?;
        Ok(self)
    }

    /// The labels for the given dimension, if present
    pub fn coords(&self, dim: &str) -> Option<&IndexSet<String>> {
        self.coords.get(dim)
    }

    /// Whether `label` is one of the coordinate values of `dim`.
    ///
    /// A missing dimension contains no labels.
    pub fn contains(&self, dim: &str, label: &str) -> bool {
        self.coords
            .get(dim)
            .is_some_and(|labels| labels.contains(label))
    }

    /// Iterate over the names of the dataset's dimensions
    pub fn iter_dims(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(String::as_str)
    }
}
