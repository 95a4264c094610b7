//! Core data types for the optlens system.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strike price with ordering support (used as a grouping key).
pub type Strike = OrderedFloat<f64>;

/// Column names shared by the three option datasets.
pub mod columns {
    pub const SYMBOL: &str = "Symbol";
    pub const TYPE: &str = "Type";
    pub const STRIKE: &str = "Strike";
    pub const EXPIRES: &str = "Expires";
    pub const SIDE: &str = "Side";
    pub const CODE: &str = "Code";
    pub const TIME: &str = "Time";
    pub const BID: &str = "Bid";
    pub const MID: &str = "Mid";
    pub const ASK: &str = "Ask";
    pub const LAST: &str = "Last";
    pub const VOLUME: &str = "Volume";
    pub const OPEN_INT: &str = "Open Int";
    pub const IV: &str = "IV";
    pub const DELTA: &str = "Delta";
    pub const GAMMA: &str = "Gamma";
    pub const THETA: &str = "Theta";
    pub const VEGA: &str = "Vega";
    pub const ITM_PROB: &str = "ITM Prob";
    pub const MONEYNESS: &str = "Moneyness";
    pub const PRICE: &str = "Price~";
    pub const DTE: &str = "DTE";
    pub const TRADE: &str = "Trade";
    pub const SIZE: &str = "Size";
    pub const PREMIUM: &str = "Premium";
}

/// A single table cell, raw or normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// No value.
    Missing,
    /// Unparsed text as read from the source.
    Text(String),
    /// Typed number. Normalized columns hold only this or `Missing`.
    Number(f64),
    /// Parsed date/time.
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Create a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Is this cell missing?
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if the cell holds one.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if the cell holds one.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Timestamp value, if the cell holds one.
    #[inline]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Key used when grouping rows. Missing and blank cells have no key.
    pub fn group_key(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M")),
        }
    }
}

/// Row-oriented table with named columns. Rows are identified by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// A table as produced by the dataset loader, before normalization.
pub type RawTable = Table;

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and rows, checking row widths.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::data(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column name).
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Iterate over one column's cells.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Mutable access to one column's cells, by position.
    pub fn column_mut(&mut self, idx: usize) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.iter_mut().map(move |r| &mut r[idx])
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    pub fn retain_rows(&mut self, keep: impl FnMut(&Vec<Cell>) -> bool) {
        self.rows.retain(keep);
    }
}

/// Semantic kind of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Decimal number.
    PlainNumeric,
    /// Percentage, with or without a trailing `%`; always divided by 100.
    Percentage,
    /// Percentage that may carry a leading `+`.
    SignedPercentage,
    /// Ratio or percentage number, decided once per column.
    AmbiguousMagnitude,
    /// Date/time.
    Timestamp,
}

/// Declaration of one column within a dataset schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the header.
    pub name: String,
    /// How cells are normalized.
    pub kind: ColumnKind,
    /// Rows missing this column after normalization are dropped.
    pub critical: bool,
}

/// Declarative per-dataset column schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Schema name (usually the dataset name).
    pub name: String,
    /// Declared columns in normalization order.
    pub columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Declare a non-critical column.
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind,
            critical: false,
        });
        self
    }

    /// Declare a critical column.
    pub fn critical(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind,
            critical: true,
        });
        self
    }

    /// Look up a column declaration.
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the critical columns.
    pub fn critical_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.critical)
            .map(|c| c.name.as_str())
    }
}

/// The three datasets of an options snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    /// Option chain quotes.
    Chain,
    /// Per-contract greeks.
    Greeks,
    /// Unusual flow trade prints.
    Flow,
}

impl Dataset {
    /// All datasets in display order.
    pub const ALL: [Dataset; 3] = [Dataset::Chain, Dataset::Greeks, Dataset::Flow];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Chain => "chain",
            Dataset::Greeks => "greeks",
            Dataset::Flow => "flow",
        }
    }

    /// Parse a dataset name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "chain" | "cadena" => Some(Dataset::Chain),
            "greeks" | "griegas" => Some(Dataset::Greeks),
            "flow" | "inusual" | "unusual" => Some(Dataset::Flow),
            _ => None,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Option contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Parse a `Type` label ("Call" / "Put", any case).
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("call") {
            Some(OptionType::Call)
        } else if label.eq_ignore_ascii_case("put") {
            Some(OptionType::Put)
        } else {
            None
        }
    }

    /// Parse the option type held in a cell.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        cell.as_text().and_then(Self::parse)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("Call"),
            OptionType::Put => f.write_str("Put"),
        }
    }
}

/// Quantity summed by the put/call ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measure {
    Volume,
    OpenInterest,
}

impl Measure {
    /// Column holding this measure.
    pub fn column(self) -> &'static str {
        match self {
            Measure::Volume => columns::VOLUME,
            Measure::OpenInterest => columns::OPEN_INT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_rows(
            ["Type", "Strike"],
            vec![
                vec![Cell::text("Call"), Cell::Number(10.0)],
                vec![Cell::text("Put"), Cell::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_width_checked() {
        let mut table = Table::new(["A", "B"]);
        assert!(table.push_row(vec![Cell::Missing]).is_err());
        assert!(table.push_row(vec![Cell::Missing, Cell::Missing]).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_cell_lookup() {
        let table = sample_table();
        assert_eq!(table.cell(0, "Strike"), Some(&Cell::Number(10.0)));
        assert_eq!(table.cell(1, "Strike"), Some(&Cell::Missing));
        assert_eq!(table.cell(0, "Nope"), None);
        assert_eq!(table.cell(5, "Type"), None);
    }

    #[test]
    fn test_column_iter() {
        let table = sample_table();
        let types: Vec<_> = table.column("Type").unwrap().filter_map(|c| c.as_text()).collect();
        assert_eq!(types, vec!["Call", "Put"]);
        assert!(table.column("Missing").is_none());
    }

    #[test]
    fn test_group_key() {
        assert_eq!(Cell::text(" ask ").group_key(), Some("ask".to_string()));
        assert_eq!(Cell::text("  ").group_key(), None);
        assert_eq!(Cell::Missing.group_key(), None);
        assert_eq!(Cell::Number(2.5).group_key(), Some("2.5".to_string()));
    }

    #[test]
    fn test_option_type_parse() {
        assert_eq!(OptionType::parse("Call"), Some(OptionType::Call));
        assert_eq!(OptionType::parse(" put "), Some(OptionType::Put));
        assert_eq!(OptionType::parse("Straddle"), None);
        assert_eq!(OptionType::from_cell(&Cell::Number(1.0)), None);
    }

    #[test]
    fn test_schema_builder() {
        let schema = ColumnSchema::new("test")
            .critical("IV", ColumnKind::Percentage)
            .column("Bid", ColumnKind::PlainNumeric);
        assert_eq!(schema.critical_columns().collect::<Vec<_>>(), vec!["IV"]);
        assert_eq!(schema.get("Bid").map(|c| c.critical), Some(false));
    }

    #[test]
    fn test_dataset_parse() {
        assert_eq!(Dataset::parse("Griegas"), Some(Dataset::Greeks));
        assert_eq!(Dataset::parse("FLOW"), Some(Dataset::Flow));
        assert_eq!(Dataset::parse("bars"), None);
    }
}
