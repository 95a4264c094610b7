//! Greek exposure aggregated by strike.
//!
//! `exposure = greek * open interest * contract multiplier`, summed per strike.

use optlens_core::{columns, CleanedTable, Strike};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total exposure at one strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeExposure {
    pub strike: f64,
    pub exposure: f64,
}

/// Sum `greek * Open Int * multiplier` per strike, ascending by strike.
///
/// Rows missing the strike, the greek or open interest are skipped. A table
/// without those columns yields an empty series.
pub fn exposure_by_strike(
    table: &CleanedTable,
    greek_column: &str,
    multiplier: f64,
) -> Vec<StrikeExposure> {
    let (Some(strike_idx), Some(greek_idx), Some(oi_idx)) = (
        table.column_index(columns::STRIKE),
        table.column_index(greek_column),
        table.column_index(columns::OPEN_INT),
    ) else {
        return Vec::new();
    };

    let mut by_strike: BTreeMap<Strike, f64> = BTreeMap::new();
    for row in table.rows() {
        let (Some(strike), Some(greek), Some(oi)) = (
            row[strike_idx].as_number(),
            row[greek_idx].as_number(),
            row[oi_idx].as_number(),
        ) else {
            continue;
        };
        *by_strike.entry(OrderedFloat(strike)).or_insert(0.0) += greek * oi * multiplier;
    }

    by_strike
        .into_iter()
        .map(|(strike, exposure)| StrikeExposure {
            strike: strike.0,
            exposure,
        })
        .collect()
}

/// Sum of a series' exposures.
pub fn total_exposure(series: &[StrikeExposure]) -> f64 {
    series.iter().map(|p| p.exposure).sum()
}
