//! Code for reading in commodity IDs from a CSV file.
use super::{input_err_msg, read_id_file};
use crate::commodity::CommodityID;
use anyhow::{Context, Result};
use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;
use std::path::Path;

const COMMODITY_FILE_NAME: &str = "commodities.csv";

/// Read commodity IDs from the specified model directory.
///
/// These become the labels of the dataset's `FUEL` dimension.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The commodity IDs, in file order, or an error.
pub fn read_commodity_ids(model_dir: &Path) -> Result<IndexSet<CommodityID>> {
    let file_path = model_dir.join(COMMODITY_FILE_NAME);
    let commodity_ids: IndexSet<CommodityID> =
        read_id_file(&file_path).with_context(|| input_err_msg(&file_path))?;
    debug!(
        "Read {} commodities: {}",
        commodity_ids.len(),
        commodity_ids.iter().join(", ")
    );

    Ok(commodity_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn read_commodity_ids_works() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(COMMODITY_FILE_NAME)).unwrap();
            writeln!(
                file,
                "id,description\ngen-ELC,Generated electricity\nfinal-ELC,Final electricity"
            )
            .unwrap();
        }

        let ids = read_commodity_ids(dir.path()).unwrap();
        assert!(ids.iter().map(CommodityID::as_str).eq(["gen-ELC", "final-ELC"]));
    }

    #[test]
    fn read_commodity_ids_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_commodity_ids(dir.path()).is_err());
    }
}
