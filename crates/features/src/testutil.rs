//! Table builders shared by the unit tests.

use optlens_core::{Cell, CleanReport, CleanedTable, Table};

/// Wrap rows of already-normalized cells as a cleaned table.
pub(crate) fn cleaned(columns: &[&str], rows: Vec<Vec<Cell>>) -> CleanedTable {
    let table = Table::from_rows(columns.iter().copied(), rows).expect("row widths match");
    CleanedTable::from_parts(table, CleanReport::default())
}
