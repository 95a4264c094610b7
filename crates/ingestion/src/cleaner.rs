//! Schema-driven table cleaning.
//!
//! Normalizes every declared column of a raw table, then drops rows with a
//! missing value in any critical column.

use crate::normalizer::FieldNormalizer;
use optlens_core::{
    config::NormalizerConfig, CleanReport, CleanWarning, CleanedTable, ColumnSchema, RawTable,
};
use tracing::{debug, warn};

/// Applies a [`ColumnSchema`] to raw tables.
#[derive(Debug, Clone, Default)]
pub struct TableCleaner {
    normalizer: FieldNormalizer,
}

impl TableCleaner {
    /// Create a cleaner from normalizer configuration.
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            normalizer: FieldNormalizer::new(config),
        }
    }

    /// Clean a raw table. The input is not modified.
    ///
    /// Columns are normalized in schema order, each one completely before the
    /// next. Declared columns absent from the input are reported as warnings;
    /// an absent critical column drops every row.
    pub fn clean(&self, raw: &RawTable, schema: &ColumnSchema) -> CleanedTable {
        let mut table = raw.clone();
        let mut report = CleanReport {
            schema: schema.name.clone(),
            rows_in: raw.len(),
            ..CleanReport::default()
        };
        let mut critical_idx = Vec::new();
        let mut critical_absent = false;

        for spec in &schema.columns {
            let Some(idx) = table.column_index(&spec.name) else {
                warn!(
                    schema = %schema.name,
                    column = %spec.name,
                    critical = spec.critical,
                    "declared column not found"
                );
                critical_absent |= spec.critical;
                report.warnings.push(CleanWarning::SchemaMismatch {
                    column: spec.name.clone(),
                    critical: spec.critical,
                });
                continue;
            };

            let column = raw.rows().iter().map(|row| &row[idx]);
            let normalized = self.normalizer.normalize_column(column, spec);
            for (cell, value) in table.column_mut(idx).zip(normalized.cells) {
                *cell = value;
            }

            if normalized.stats.rescaled {
                debug!(column = %spec.name, "ambiguous column rescaled by 1/100");
            }
            if normalized.stats.parse_failures > 0 {
                report.warnings.push(CleanWarning::ParseFailures {
                    column: spec.name.clone(),
                    count: normalized.stats.parse_failures,
                });
            }
            if spec.critical {
                critical_idx.push(idx);
            }
            report.columns.push(normalized.stats);
        }

        if critical_absent {
            table.retain_rows(|_| false);
        } else {
            table.retain_rows(|row| critical_idx.iter().all(|&i| !row[i].is_missing()));
        }
        report.rows_out = table.len();

        if report.rows_dropped() > 0 {
            debug!(
                schema = %schema.name,
                dropped = report.rows_dropped(),
                kept = report.rows_out,
                "dropped rows with missing critical values"
            );
        }

        CleanedTable::from_parts(table, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{chain_schema, flow_schema};
    use optlens_core::{columns::*, Cell, ColumnKind, Table};

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    fn chain_table(rows: &[&[&str]]) -> RawTable {
        Table::from_rows(
            ["Type", STRIKE, BID, VOLUME, OPEN_INT, IV, DELTA, MONEYNESS],
            rows.iter().map(|r| text_row(r)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_clean_chain() {
        let raw = chain_table(&[
            &["Call", "10", "1.2", "150", "300", "75.37%", "0.55", "+15.62%"],
            &["Put", "12.5", "N/A", "80", "90", "60%", "-0.4", "-3.2%"],
        ]);
        let cleaned = TableCleaner::default().clean(&raw, &chain_schema());

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.cell(0, STRIKE), Some(&Cell::Number(10.0)));
        assert!((cleaned.cell(0, IV).unwrap().as_number().unwrap() - 0.7537).abs() < 1e-12);
        assert!((cleaned.cell(1, MONEYNESS).unwrap().as_number().unwrap() + 0.032).abs() < 1e-12);
        // Non-critical placeholder stays missing, row kept.
        assert_eq!(cleaned.cell(1, BID), Some(&Cell::Missing));
        // Undeclared columns are untouched.
        assert_eq!(cleaned.cell(1, "Type"), Some(&Cell::text("Put")));
        // Input is not mutated.
        assert_eq!(raw.cell(0, IV), Some(&Cell::text("75.37%")));
    }

    #[test]
    fn test_rows_with_missing_critical_dropped_in_order() {
        let raw = chain_table(&[
            &["Call", "10", "1", "1", "1", "50%", "0.5", "+1%"],
            &["Call", "11", "1", "unch", "1", "50%", "0.5", "+1%"],
            &["Put", "12", "1", "1", "1", "abc", "0.5", "+1%"],
            &["Put", "13", "1", "1", "1", "50%", "0.5", "+1%"],
        ]);
        let cleaned = TableCleaner::default().clean(&raw, &chain_schema());

        let strikes: Vec<_> = cleaned.numbers(STRIKE).into_iter().flatten().collect();
        assert_eq!(strikes, vec![10.0, 13.0]);
        assert_eq!(cleaned.report().rows_in, 4);
        assert_eq!(cleaned.report().rows_out, 2);
        assert_eq!(cleaned.report().column(IV).unwrap().parse_failures, 1);
        assert!(cleaned
            .report()
            .warnings
            .contains(&CleanWarning::ParseFailures { column: IV.to_string(), count: 1 }));
    }

    #[test]
    fn test_missing_non_critical_column_is_warning() {
        // Chain schema declares Mid, Ask and Last which are absent here.
        let raw = chain_table(&[&["Call", "10", "1", "1", "1", "50%", "0.5", "+1%"]]);
        let cleaned = TableCleaner::default().clean(&raw, &chain_schema());

        assert_eq!(cleaned.len(), 1);
        let missing: Vec<_> = cleaned
            .report()
            .warnings
            .iter()
            .filter_map(|w| match w {
                CleanWarning::SchemaMismatch { column, critical: false } => Some(column.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec![MID, ASK, LAST]);
    }

    #[test]
    fn test_missing_critical_column_drops_all_rows() {
        let raw = Table::from_rows(
            [STRIKE, VOLUME],
            vec![text_row(&["10", "5"]), text_row(&["11", "6"])],
        )
        .unwrap();
        let cleaned = TableCleaner::default().clean(&raw, &chain_schema());

        assert!(cleaned.is_empty());
        assert!(cleaned.report().warnings.contains(&CleanWarning::SchemaMismatch {
            column: IV.to_string(),
            critical: true,
        }));
    }

    #[test]
    fn test_ambiguous_delta_scaled_column_wide() {
        let raw = Table::from_rows(
            [DELTA],
            vec![text_row(&["0.15"]), text_row(&["0.32"]), text_row(&["45"])],
        )
        .unwrap();
        let schema = ColumnSchema::new("delta").critical(DELTA, ColumnKind::AmbiguousMagnitude);
        let cleaned = TableCleaner::default().clean(&raw, &schema);

        let deltas: Vec<f64> = cleaned.numbers(DELTA).into_iter().flatten().collect();
        let expected = [0.0015, 0.0032, 0.45];
        for (got, want) in deltas.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
        assert_eq!(cleaned.report().rescaled_columns().collect::<Vec<_>>(), vec![DELTA]);
    }

    #[test]
    fn test_unparsable_critical_timestamp_drops_row() {
        let raw = Table::from_rows(
            [EXPIRES],
            vec![text_row(&["2025-06-20"]), text_row(&["later"])],
        )
        .unwrap();
        let schema = ColumnSchema::new("ts").critical(EXPIRES, ColumnKind::Timestamp);
        let cleaned = TableCleaner::default().clean(&raw, &schema);

        assert_eq!(cleaned.len(), 1);
        assert!(cleaned.cell(0, EXPIRES).unwrap().as_timestamp().is_some());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = Table::from_rows(
            [EXPIRES, IV, DELTA, STRIKE, SIZE, PREMIUM, VOLUME, OPEN_INT],
            vec![
                text_row(&["2025-06-20", "45%", "15", "10", "5", "1000", "50", "10"]),
                text_row(&["2025-07-18", "52.5", "-45", "12", "1", "2500", "5", "100"]),
                text_row(&["N/A", "40%", "30", "14", "2", "800", "7", "7"]),
            ],
        )
        .unwrap();
        let cleaner = TableCleaner::default();
        let once = cleaner.clean(&raw, &flow_schema());
        let twice = cleaner.clean(once.table(), &flow_schema());

        assert_eq!(once.table(), twice.table());
        assert_eq!(twice.report().rows_dropped(), 0);
    }

    #[test]
    fn test_empty_table() {
        let raw = RawTable::default();
        let cleaned = TableCleaner::default().clean(&raw, &flow_schema());
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.report().rows_out, 0);
    }
}
