//! Premium distribution per trade side (box-plot statistics).

use crate::percentile::percentile_sorted;
use optlens_core::{columns, CleanedTable};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Five-number summary plus mean and standard deviation of premium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumDistribution {
    pub side: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two trades.
    pub std_dev: Option<f64>,
}

/// Premium statistics per side, in order of first appearance.
pub fn premium_distribution(table: &CleanedTable) -> Vec<PremiumDistribution> {
    let (Some(side_idx), Some(premium_idx)) = (
        table.column_index(columns::SIDE),
        table.column_index(columns::PREMIUM),
    ) else {
        return Vec::new();
    };

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for row in table.rows() {
        let (Some(side), Some(premium)) = (row[side_idx].group_key(), row[premium_idx].as_number())
        else {
            continue;
        };
        match groups.iter_mut().find(|(s, _)| *s == side) {
            Some((_, values)) => values.push(premium),
            None => groups.push((side, vec![premium])),
        }
    }

    groups
        .into_iter()
        .map(|(side, mut values)| {
            values.sort_by(f64::total_cmp);
            let count = values.len();
            PremiumDistribution {
                side,
                count,
                min: values[0],
                q1: percentile_sorted(&values, 0.25),
                median: percentile_sorted(&values, 0.5),
                q3: percentile_sorted(&values, 0.75),
                max: values[count - 1],
                mean: values.iter().mean(),
                std_dev: (count > 1).then(|| values.iter().std_dev()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::cleaned;
    use approx::assert_relative_eq;
    use optlens_core::Cell;

    fn flow(rows: &[(&str, f64)]) -> CleanedTable {
        cleaned(
            &["Side", "Premium"],
            rows.iter()
                .map(|(s, p)| vec![Cell::text(*s), Cell::Number(*p)])
                .collect(),
        )
    }

    #[test]
    fn test_per_side_summary() {
        let table = flow(&[
            ("ask", 100.0),
            ("bid", 40.0),
            ("ask", 300.0),
            ("ask", 200.0),
            ("ask", 400.0),
        ]);
        let dist = premium_distribution(&table);

        assert_eq!(dist.len(), 2);
        let ask = &dist[0];
        assert_eq!(ask.side, "ask");
        assert_eq!(ask.count, 4);
        assert_eq!(ask.min, 100.0);
        assert_eq!(ask.max, 400.0);
        assert_relative_eq!(ask.q1, 175.0);
        assert_relative_eq!(ask.median, 250.0);
        assert_relative_eq!(ask.q3, 325.0);
        assert_relative_eq!(ask.mean, 250.0);
        // Sample std dev of 100, 200, 300, 400.
        assert_relative_eq!(ask.std_dev.unwrap(), 129.09944487358058, max_relative = 1e-12);

        let bid = &dist[1];
        assert_eq!(bid.count, 1);
        assert_eq!(bid.median, 40.0);
        assert_eq!(bid.std_dev, None);
    }

    #[test]
    fn test_empty() {
        assert!(premium_distribution(&CleanedTable::empty()).is_empty());
    }
}
