//! Highlighted unusual-flow trades.
//!
//! A trade is highlighted when its premium reaches the configured quantile of
//! all premiums and its volume is large relative to open interest.

use crate::percentile::percentile;
use chrono::NaiveDateTime;
use optlens_core::{columns, config::MetricsConfig, Cell, CleanedTable};
use serde::{Deserialize, Serialize};

/// Thresholds used to select highlighted trades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightCriteria {
    /// Premium quantile a trade must reach (0.75 = top quartile).
    pub premium_quantile: f64,
    /// Minimum `Volume / (Open Int + offset)`.
    pub min_vol_oi_ratio: f64,
    /// Zero-guard added to open interest.
    pub open_interest_offset: f64,
}

impl Default for HighlightCriteria {
    fn default() -> Self {
        Self::from(&MetricsConfig::default())
    }
}

impl From<&MetricsConfig> for HighlightCriteria {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            premium_quantile: config.highlight_quantile,
            min_vol_oi_ratio: config.min_vol_oi_ratio,
            open_interest_offset: config.open_interest_offset,
        }
    }
}

/// Fixed projection of a highlighted trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedTrade {
    pub symbol: Option<String>,
    pub option_type: Option<String>,
    pub strike: Option<f64>,
    pub expires: Option<NaiveDateTime>,
    pub side: Option<String>,
    pub premium: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub vol_oi_ratio: f64,
    pub code: Option<String>,
    pub time: Option<String>,
}

/// Highlighted trades plus the thresholds that selected them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightReport {
    /// Premium quantile over all rows; `None` for an empty table.
    pub premium_threshold: Option<f64>,
    pub min_vol_oi_ratio: f64,
    /// Selected trades, premium descending.
    pub trades: Vec<HighlightedTrade>,
}

/// Select trades with `Premium >= quantile` and `vol/OI >= min`, premium descending.
///
/// Rows missing premium, volume or open interest are ignored, both for the
/// quantile and for selection. Equal premiums keep their input order.
pub fn highlighted_trades(table: &CleanedTable, criteria: &HighlightCriteria) -> HighlightReport {
    let mut report = HighlightReport {
        premium_threshold: None,
        min_vol_oi_ratio: criteria.min_vol_oi_ratio,
        trades: Vec::new(),
    };

    let (Some(premium_idx), Some(volume_idx), Some(oi_idx)) = (
        table.column_index(columns::PREMIUM),
        table.column_index(columns::VOLUME),
        table.column_index(columns::OPEN_INT),
    ) else {
        return report;
    };

    let candidates: Vec<(usize, f64, f64, f64)> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            Some((
                i,
                row[premium_idx].as_number()?,
                row[volume_idx].as_number()?,
                row[oi_idx].as_number()?,
            ))
        })
        .collect();

    let premiums: Vec<f64> = candidates.iter().map(|c| c.1).collect();
    let Some(threshold) = percentile(&premiums, criteria.premium_quantile) else {
        return report;
    };
    report.premium_threshold = Some(threshold);

    let projection = Projection::new(table);
    for (row, premium, volume, open_interest) in candidates {
        let vol_oi_ratio = volume / (open_interest + criteria.open_interest_offset);
        if premium >= threshold && vol_oi_ratio >= criteria.min_vol_oi_ratio {
            report.trades.push(projection.trade(
                &table.rows()[row],
                premium,
                volume,
                open_interest,
                vol_oi_ratio,
            ));
        }
    }
    report.trades.sort_by(|a, b| b.premium.total_cmp(&a.premium));
    report
}

/// Column positions of the optional projected fields.
struct Projection {
    symbol: Option<usize>,
    option_type: Option<usize>,
    strike: Option<usize>,
    expires: Option<usize>,
    side: Option<usize>,
    code: Option<usize>,
    time: Option<usize>,
}

impl Projection {
    fn new(table: &CleanedTable) -> Self {
        Self {
            symbol: table.column_index(columns::SYMBOL),
            option_type: table.column_index(columns::TYPE),
            strike: table.column_index(columns::STRIKE),
            expires: table.column_index(columns::EXPIRES),
            side: table.column_index(columns::SIDE),
            code: table.column_index(columns::CODE),
            time: table.column_index(columns::TIME),
        }
    }

    fn trade(
        &self,
        row: &[Cell],
        premium: f64,
        volume: f64,
        open_interest: f64,
        vol_oi_ratio: f64,
    ) -> HighlightedTrade {
        let text = |idx: Option<usize>| idx.and_then(|i| row[i].group_key());
        HighlightedTrade {
            symbol: text(self.symbol),
            option_type: text(self.option_type),
            strike: self.strike.and_then(|i| row[i].as_number()),
            expires: self.expires.and_then(|i| row[i].as_timestamp()),
            side: text(self.side),
            premium,
            volume,
            open_interest,
            vol_oi_ratio,
            code: text(self.code),
            time: text(self.time),
        }
    }
}
