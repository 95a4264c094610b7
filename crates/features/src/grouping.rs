//! Grouped sums over one or more key columns.

use optlens_core::CleanedTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Output order of [`grouped_sum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupOrder {
    /// Order in which each group first appears.
    #[default]
    FirstSeen,
    /// Largest total first; ties keep first-appearance order.
    ValueDescending,
}

/// Sum of the value column for one key tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSum {
    /// Key values, one per group column.
    pub keys: Vec<String>,
    pub total: f64,
}

/// Group rows by the tuple of `group_columns` and sum `value_column`.
///
/// Rows with a missing or blank key are skipped. Missing values add nothing
/// but still create their group. Absent columns yield an empty result.
pub fn grouped_sum(
    table: &CleanedTable,
    group_columns: &[&str],
    value_column: &str,
    order: GroupOrder,
) -> Vec<GroupSum> {
    let Some(key_idx) = group_columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Option<Vec<_>>>()
    else {
        return Vec::new();
    };
    let Some(value_idx) = table.column_index(value_column) else {
        return Vec::new();
    };

    let mut groups: Vec<GroupSum> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();

    for row in table.rows() {
        let Some(keys) = key_idx
            .iter()
            .map(|&i| row[i].group_key())
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let value = row[value_idx].as_number().unwrap_or(0.0);

        let slot = *index.entry(keys.clone()).or_insert_with(|| {
            groups.push(GroupSum { keys, total: 0.0 });
            groups.len() - 1
        });
        groups[slot].total += value;
    }

    if order == GroupOrder::ValueDescending {
        groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::cleaned;
    use optlens_core::Cell;

    fn flow(rows: &[(&str, &str, f64)]) -> CleanedTable {
        cleaned(
            &["Type", "Side", "Premium"],
            rows.iter()
                .map(|(t, s, p)| vec![Cell::text(*t), Cell::text(*s), Cell::Number(*p)])
                .collect(),
        )
    }

    fn keys(groups: &[GroupSum]) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|g| g.keys.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_first_seen_order() {
        let table = flow(&[
            ("Put", "ask", 100.0),
            ("Call", "bid", 50.0),
            ("Put", "ask", 25.0),
            ("Call", "ask", 10.0),
        ]);
        let groups = grouped_sum(&table, &["Type", "Side"], "Premium", GroupOrder::FirstSeen);

        assert_eq!(keys(&groups), vec![vec!["Put", "ask"], vec!["Call", "bid"], vec!["Call", "ask"]]);
        assert_eq!(groups[0].total, 125.0);
    }

    #[test]
    fn test_value_descending() {
        let table = flow(&[("Call", "a", 5.0), ("Put", "b", 50.0), ("Call", "a", 10.0)]);
        let groups = grouped_sum(&table, &["Type"], "Premium", GroupOrder::ValueDescending);
        assert_eq!(keys(&groups), vec![vec!["Put"], vec!["Call"]]);
        assert_eq!(groups[1].total, 15.0);
    }

    #[test]
    fn test_blank_keys_skipped() {
        let table = flow(&[("Call", "", 5.0), ("Call", "ask", 7.0)]);
        let groups = grouped_sum(&table, &["Type", "Side"], "Premium", GroupOrder::FirstSeen);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total, 7.0);
    }

    #[test]
    fn test_missing_columns() {
        let table = flow(&[("Call", "ask", 5.0)]);
        assert!(grouped_sum(&table, &["Code"], "Premium", GroupOrder::FirstSeen).is_empty());
        assert!(grouped_sum(&table, &["Type"], "Size", GroupOrder::FirstSeen).is_empty());
        assert!(grouped_sum(&CleanedTable::empty(), &["Type"], "Premium", GroupOrder::FirstSeen).is_empty());
    }
}
