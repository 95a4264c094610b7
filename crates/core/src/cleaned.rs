//! Cleaned tables and the report describing how they were produced.

use crate::types::{Cell, ColumnKind, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Per-column normalization statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name.
    pub column: String,
    /// Declared kind.
    pub kind: ColumnKind,
    /// Declared critical.
    pub critical: bool,
    /// Cells that produced a value.
    pub parsed: usize,
    /// Cells that matched a placeholder token or were already missing.
    pub placeholders: usize,
    /// Cells that could not be coerced.
    pub parse_failures: usize,
    /// Whole column was divided by 100 (ambiguous magnitude rule).
    pub rescaled: bool,
}

impl ColumnStats {
    /// Empty statistics for a declared column.
    pub fn new(column: impl Into<String>, kind: ColumnKind, critical: bool) -> Self {
        Self {
            column: column.into(),
            kind,
            critical,
            parsed: 0,
            placeholders: 0,
            parse_failures: 0,
            rescaled: false,
        }
    }

    /// Cells that ended up missing.
    pub fn missing(&self) -> usize {
        self.placeholders + self.parse_failures
    }
}

/// Non-fatal problem found while cleaning a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CleanWarning {
    /// A declared column is absent from the input.
    SchemaMismatch { column: String, critical: bool },
    /// Some cells of a column could not be coerced.
    ParseFailures { column: String, count: usize },
}

impl fmt::Display for CleanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanWarning::SchemaMismatch { column, critical: true } => {
                write!(f, "critical column '{column}' not found; all rows dropped")
            }
            CleanWarning::SchemaMismatch { column, critical: false } => {
                write!(f, "column '{column}' not found; skipped")
            }
            CleanWarning::ParseFailures { column, count } => {
                write!(f, "{count} cell(s) in column '{column}' could not be parsed")
            }
        }
    }
}

/// What the cleaner did to one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Schema applied.
    pub schema: String,
    /// Rows before the critical-column drop.
    pub rows_in: usize,
    /// Rows kept.
    pub rows_out: usize,
    /// Statistics for every declared column present in the input.
    pub columns: Vec<ColumnStats>,
    /// Collected warnings, in discovery order.
    pub warnings: Vec<CleanWarning>,
}

impl CleanReport {
    /// Rows discarded by the critical-column rule.
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }

    /// Statistics for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.column == name)
    }

    /// Columns that were rescaled by the ambiguous magnitude rule.
    pub fn rescaled_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.rescaled)
            .map(|c| c.column.as_str())
    }
}

/// A table whose declared columns are normalized and whose critical columns
/// hold no missing values.
///
/// Only the cleaner constructs non-empty instances; downstream code reads it
/// through `Deref<Target = Table>` and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedTable {
    table: Table,
    report: CleanReport,
}

impl CleanedTable {
    /// Wrap a normalized table. The caller upholds the critical-column invariant.
    pub fn from_parts(table: Table, report: CleanReport) -> Self {
        Self { table, report }
    }

    /// Zero-row table, used when a dataset could not be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Underlying table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Cleaning report.
    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    /// Numeric value at (row, column position).
    #[inline]
    pub fn number_at(&self, row: usize, col: usize) -> Option<f64> {
        self.table.rows().get(row)?.get(col)?.as_number()
    }

    /// Numeric values of one column, `None` where missing.
    pub fn numbers(&self, column: &str) -> Vec<Option<f64>> {
        self.table
            .column(column)
            .map(|cells| cells.map(Cell::as_number).collect())
            .unwrap_or_default()
    }

    /// Consume and return the table.
    pub fn into_table(self) -> Table {
        self.table
    }
}

impl Deref for CleanedTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}
