//! Put/call ratios.

use optlens_core::{columns, CleanedTable, Measure, OptionType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Market reading of a put/call ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// More put than call activity (bearish or hedging).
    Bearish,
    /// More call than put activity.
    Bullish,
    Neutral,
}

impl Sentiment {
    /// Read a put/call ratio: above 1 bearish, below 1 bullish.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 1.0 {
            Sentiment::Bearish
        } else if ratio < 1.0 {
            Sentiment::Bullish
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Bearish => f.pad("bearish"),
            Sentiment::Bullish => f.pad("bullish"),
            Sentiment::Neutral => f.pad("neutral"),
        }
    }
}

/// Put-side sum of `measure` divided by the call-side sum.
///
/// Returns 0 when the call side sums to zero (including an empty table or a
/// table without the required columns).
pub fn put_call_ratio(table: &CleanedTable, measure: Measure) -> f64 {
    let (Some(type_idx), Some(value_idx)) = (
        table.column_index(columns::TYPE),
        table.column_index(measure.column()),
    ) else {
        return 0.0;
    };

    let mut calls = 0.0;
    let mut puts = 0.0;
    for row in table.rows() {
        let Some(value) = row[value_idx].as_number() else {
            continue;
        };
        match OptionType::from_cell(&row[type_idx]) {
            Some(OptionType::Call) => calls += value,
            Some(OptionType::Put) => puts += value,
            None => {}
        }
    }

    if calls > 0.0 {
        puts / calls
    } else {
        0.0
    }
}
