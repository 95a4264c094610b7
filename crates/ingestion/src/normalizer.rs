//! Single-cell normalization.
//!
//! Coerces raw cells (text as read from CSV, or already-typed numbers) into
//! `f64` values according to their declared [`ColumnKind`]. Normalization
//! never fails: every problem degrades to a missing value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use optlens_core::{config::NormalizerConfig, Cell, ColumnKind, ColumnSpec, ColumnStats};

/// Result of normalizing one cell, before column-level rules are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    /// Parsed from text.
    Parsed(f64),
    /// Already a typed number; taken as canonical.
    Typed(f64),
    /// Placeholder token or already missing.
    Placeholder,
    /// Text that could not be coerced.
    Failure,
}

impl Outcome {
    fn value(self) -> Option<f64> {
        match self {
            Outcome::Parsed(v) | Outcome::Typed(v) => Some(v),
            Outcome::Placeholder | Outcome::Failure => None,
        }
    }
}

/// A normalized column plus its statistics.
#[derive(Debug, Clone)]
pub struct NormalizedColumn {
    /// Normalized cells, one per input cell, in order.
    pub cells: Vec<Cell>,
    /// What happened to the column.
    pub stats: ColumnStats,
}

/// Converts raw cells into typed values.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    /// Tokens that always mean "missing".
    placeholders: Vec<String>,
    /// Ambiguous columns with any |value| above this are divided by 100.
    ambiguous_threshold: f64,
    /// Timestamp formats tried after RFC 3339.
    timestamp_formats: Vec<String>,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl FieldNormalizer {
    /// Create a normalizer from configuration.
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            placeholders: config.placeholder_tokens.clone(),
            ambiguous_threshold: config.ambiguous_threshold,
            timestamp_formats: config.timestamp_formats.clone(),
        }
    }

    /// Does the (trimmed) text match a placeholder token?
    pub fn is_placeholder(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.placeholders.iter().any(|p| p == trimmed)
    }

    /// Normalize a single cell.
    ///
    /// `AmbiguousMagnitude` is parsed like `PlainNumeric` here; the scaling
    /// decision needs the whole column (see [`normalize_column`]).
    /// `Timestamp` yields milliseconds since the Unix epoch.
    ///
    /// [`normalize_column`]: FieldNormalizer::normalize_column
    pub fn normalize(&self, cell: &Cell, kind: ColumnKind) -> Option<f64> {
        match kind {
            ColumnKind::Timestamp => self
                .parse_timestamp(cell)
                .map(|ts| ts.and_utc().timestamp_millis() as f64),
            _ => self.classify(cell, kind).value(),
        }
    }

    /// Parse a date/time cell.
    pub fn parse_timestamp(&self, cell: &Cell) -> Option<NaiveDateTime> {
        match cell {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(text) if !self.is_placeholder(text) => self.parse_timestamp_text(text.trim()),
            _ => None,
        }
    }

    fn parse_timestamp_text(&self, text: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_utc());
        }
        self.timestamp_formats.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(text, fmt)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, fmt)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        })
    }

    /// Classify one cell for a numeric kind.
    fn classify(&self, cell: &Cell, kind: ColumnKind) -> Outcome {
        let text = match cell {
            Cell::Missing => return Outcome::Placeholder,
            Cell::Number(v) if v.is_finite() => return Outcome::Typed(*v),
            Cell::Number(_) | Cell::Timestamp(_) => return Outcome::Failure,
            Cell::Text(text) => text,
        };

        if self.is_placeholder(text) {
            return Outcome::Placeholder;
        }

        let trimmed = text.trim();
        let parsed = match kind {
            ColumnKind::PlainNumeric | ColumnKind::AmbiguousMagnitude => parse_decimal(trimmed),
            ColumnKind::Percentage => parse_percentage(trimmed),
            ColumnKind::SignedPercentage => {
                parse_percentage(trimmed.strip_prefix('+').unwrap_or(trimmed))
            }
            ColumnKind::Timestamp => None,
        };

        parsed.map_or(Outcome::Failure, Outcome::Parsed)
    }

    /// Normalize every cell of a declared column.
    ///
    /// For `AmbiguousMagnitude` the scaling decision is made once, after all
    /// cells are parsed: if any value exceeds the threshold in magnitude, every
    /// value in the column is divided by 100. A column holding only typed
    /// numbers is already normalized and is never rescaled.
    pub fn normalize_column<'a>(
        &self,
        cells: impl IntoIterator<Item = &'a Cell>,
        spec: &ColumnSpec,
    ) -> NormalizedColumn {
        let mut stats = ColumnStats::new(spec.name.clone(), spec.kind, spec.critical);

        if spec.kind == ColumnKind::Timestamp {
            let cells = cells
                .into_iter()
                .map(|cell| {
                    match (cell, self.parse_timestamp(cell)) {
                        (_, Some(ts)) => {
                            stats.parsed += 1;
                            return Cell::Timestamp(ts);
                        }
                        (Cell::Missing, None) => stats.placeholders += 1,
                        (Cell::Text(t), None) if self.is_placeholder(t) => stats.placeholders += 1,
                        _ => stats.parse_failures += 1,
                    }
                    Cell::Missing
                })
                .collect();
            return NormalizedColumn { cells, stats };
        }

        let outcomes: Vec<Outcome> = cells
            .into_iter()
            .map(|cell| self.classify(cell, spec.kind))
            .collect();

        let rescale = spec.kind == ColumnKind::AmbiguousMagnitude
            && outcomes.iter().any(|o| matches!(o, Outcome::Parsed(_)))
            && outcomes
                .iter()
                .filter_map(|o| o.value())
                .any(|v| v.abs() > self.ambiguous_threshold);
        stats.rescaled = rescale;

        let cells = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Outcome::Parsed(v) | Outcome::Typed(v) => {
                    stats.parsed += 1;
                    Cell::Number(if rescale { v / 100.0 } else { v })
                }
                Outcome::Placeholder => {
                    stats.placeholders += 1;
                    Cell::Missing
                }
                Outcome::Failure => {
                    stats.parse_failures += 1;
                    Cell::Missing
                }
            })
            .collect();

        NormalizedColumn { cells, stats }
    }
}

/// Parse a finite decimal number.
fn parse_decimal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a percentage: strip one trailing `%` if present, always divide by 100.
fn parse_percentage(text: &str) -> Option<f64> {
    let number = text.strip_suffix('%').unwrap_or(text).trim_end();
    parse_decimal(number).map(|v| v / 100.0)
}
