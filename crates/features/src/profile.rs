//! Per-strike call/put profile of the option chain.

use optlens_core::{columns, CleanedTable, OptionType, Strike};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Call and put activity at one strike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrikeProfile {
    pub strike: f64,
    pub call_volume: f64,
    pub put_volume: f64,
    pub call_open_interest: f64,
    pub put_open_interest: f64,
    /// Mean implied volatility of the calls at this strike.
    pub call_iv: Option<f64>,
    /// Mean implied volatility of the puts at this strike.
    pub put_iv: Option<f64>,
}

#[derive(Default)]
struct Accumulator {
    profile: StrikeProfile,
    call_iv: (f64, usize),
    put_iv: (f64, usize),
}

/// Volume, open interest and mean IV per strike, split by option type,
/// ascending by strike. Rows without a strike or a recognised type are skipped.
pub fn strike_profile(table: &CleanedTable) -> Vec<StrikeProfile> {
    let (Some(type_idx), Some(strike_idx)) = (
        table.column_index(columns::TYPE),
        table.column_index(columns::STRIKE),
    ) else {
        return Vec::new();
    };
    let volume_idx = table.column_index(columns::VOLUME);
    let oi_idx = table.column_index(columns::OPEN_INT);
    let iv_idx = table.column_index(columns::IV);

    let mut by_strike: BTreeMap<Strike, Accumulator> = BTreeMap::new();
    for row in table.rows() {
        let (Some(option_type), Some(strike)) = (
            OptionType::from_cell(&row[type_idx]),
            row[strike_idx].as_number(),
        ) else {
            continue;
        };
        let value = |idx: Option<usize>| idx.and_then(|i| row[i].as_number());
        let volume = value(volume_idx).unwrap_or(0.0);
        let open_interest = value(oi_idx).unwrap_or(0.0);
        let iv = value(iv_idx);

        let acc = by_strike.entry(OrderedFloat(strike)).or_default();
        acc.profile.strike = strike;
        let iv_sum = match option_type {
            OptionType::Call => {
                acc.profile.call_volume += volume;
                acc.profile.call_open_interest += open_interest;
                &mut acc.call_iv
            }
            OptionType::Put => {
                acc.profile.put_volume += volume;
                acc.profile.put_open_interest += open_interest;
                &mut acc.put_iv
            }
        };
        if let Some(iv) = iv {
            iv_sum.0 += iv;
            iv_sum.1 += 1;
        }
    }

    by_strike
        .into_values()
        .map(|acc| {
            let mean = |(sum, n): (f64, usize)| (n > 0).then(|| sum / n as f64);
            StrikeProfile {
                call_iv: mean(acc.call_iv),
                put_iv: mean(acc.put_iv),
                ..acc.profile
            }
        })
        .collect()
}
