//! Metrics engine.
//!
//! Combines all metric components into a unified interface. Every operation
//! reads one cleaned table and returns freshly allocated values.

use crate::{
    distribution::{premium_distribution, PremiumDistribution},
    exposure::{exposure_by_strike, StrikeExposure},
    grouping::{grouped_sum, GroupOrder, GroupSum},
    highlight::{highlighted_trades, HighlightCriteria, HighlightReport},
    profile::{strike_profile, StrikeProfile},
    ratios::{put_call_ratio, Sentiment},
};
use optlens_core::{columns, config::MetricsConfig, CleanedTable, Measure};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything derived from one snapshot's cleaned tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Put/call ratio by volume (chain).
    pub put_call_volume: f64,
    /// Put/call ratio by open interest (chain).
    pub put_call_open_interest: f64,
    /// Call/put volume, open interest and IV per strike (chain).
    pub strike_profile: Vec<StrikeProfile>,
    /// Vega exposure per strike (greeks).
    pub vega_exposure: Vec<StrikeExposure>,
    /// Theta exposure per strike (greeks).
    pub theta_exposure: Vec<StrikeExposure>,
    /// Premium per (Type, Side), first-appearance order (flow).
    pub premium_by_type_side: Vec<GroupSum>,
    /// Premium per Code, largest first (flow).
    pub premium_by_code: Vec<GroupSum>,
    /// Premium statistics per side (flow).
    pub premium_distribution: Vec<PremiumDistribution>,
    /// Highlighted trades (flow).
    pub highlights: HighlightReport,
}

impl DerivedMetrics {
    /// Sentiment reading of the volume put/call ratio.
    pub fn volume_sentiment(&self) -> Sentiment {
        Sentiment::from_ratio(self.put_call_volume)
    }

    /// Sentiment reading of the open-interest put/call ratio.
    pub fn open_interest_sentiment(&self) -> Sentiment {
        Sentiment::from_ratio(self.put_call_open_interest)
    }
}

/// Metrics computation engine.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    /// Shares per contract for exposure series.
    contract_multiplier: f64,
    /// Highlight thresholds.
    criteria: HighlightCriteria,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(&MetricsConfig::default())
    }
}

impl MetricsEngine {
    /// Create a new metrics engine from configuration.
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            contract_multiplier: config.contract_multiplier,
            criteria: HighlightCriteria::from(config),
        }
    }

    /// Put-side sum over call-side sum of a measure.
    pub fn put_call_ratio(&self, table: &CleanedTable, measure: Measure) -> f64 {
        put_call_ratio(table, measure)
    }

    /// `greek * Open Int * multiplier` summed per strike, ascending.
    pub fn exposure_by_strike(&self, table: &CleanedTable, greek_column: &str) -> Vec<StrikeExposure> {
        exposure_by_strike(table, greek_column, self.contract_multiplier)
    }

    /// Top-quantile premium trades with elevated volume to open interest.
    pub fn highlighted_trades(&self, table: &CleanedTable) -> HighlightReport {
        highlighted_trades(table, &self.criteria)
    }

    /// Sum of a value column per key tuple.
    pub fn grouped_sum(
        &self,
        table: &CleanedTable,
        group_columns: &[&str],
        value_column: &str,
        order: GroupOrder,
    ) -> Vec<GroupSum> {
        grouped_sum(table, group_columns, value_column, order)
    }

    /// Derive all metrics, each from its own dataset.
    ///
    /// An empty table (dataset not loaded) yields identity values for the
    /// metrics that depend on it.
    pub fn derive(
        &self,
        chain: &CleanedTable,
        greeks: &CleanedTable,
        flow: &CleanedTable,
    ) -> DerivedMetrics {
        let metrics = DerivedMetrics {
            put_call_volume: self.put_call_ratio(chain, Measure::Volume),
            put_call_open_interest: self.put_call_ratio(chain, Measure::OpenInterest),
            strike_profile: strike_profile(chain),
            vega_exposure: self.exposure_by_strike(greeks, columns::VEGA),
            theta_exposure: self.exposure_by_strike(greeks, columns::THETA),
            premium_by_type_side: self.grouped_sum(
                flow,
                &[columns::TYPE, columns::SIDE],
                columns::PREMIUM,
                GroupOrder::FirstSeen,
            ),
            premium_by_code: self.grouped_sum(
                flow,
                &[columns::CODE],
                columns::PREMIUM,
                GroupOrder::ValueDescending,
            ),
            premium_distribution: premium_distribution(flow),
            highlights: self.highlighted_trades(flow),
        };

        debug!(
            chain_rows = chain.len(),
            greeks_rows = greeks.len(),
            flow_rows = flow.len(),
            highlighted = metrics.highlights.trades.len(),
            "derived metrics"
        );
        metrics
    }
}
