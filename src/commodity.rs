//! Commodities are forms of energy or material tracked along the `FUEL` dimension.
use crate::id::define_id_type;

define_id_type! {CommodityID}

/// Electricity as generated by power plants
pub const GEN_ELC: &str = "gen-ELC";
/// Electricity as delivered to final consumers
pub const FINAL_ELC: &str = "final-ELC";
/// Primary electricity
pub const PRIMARY_ELECTRICITY: &str = "primary-electricity";
/// Secondary electricity
pub const SECONDARY_ELECTRICITY: &str = "secondary-electricity";
