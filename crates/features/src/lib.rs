//! Derived market metrics for the optlens system.
//!
//! This crate handles:
//! - Put/call ratios by volume and open interest
//! - Vega/theta exposure aggregated by strike
//! - Highlighted unusual-flow trades (top-quartile premium, high vol/OI)
//! - Grouped premium summaries and per-side premium distribution
//! - Per-strike call/put profile of the chain

pub mod distribution;
pub mod engine;
pub mod exposure;
pub mod grouping;
pub mod highlight;
pub mod percentile;
pub mod profile;
pub mod ratios;

#[cfg(test)]
mod testutil;

pub use distribution::PremiumDistribution;
pub use engine::{DerivedMetrics, MetricsEngine};
pub use exposure::StrikeExposure;
pub use grouping::{GroupOrder, GroupSum};
pub use highlight::{HighlightCriteria, HighlightReport, HighlightedTrade};
pub use percentile::percentile;
pub use profile::StrikeProfile;
pub use ratios::Sentiment;
