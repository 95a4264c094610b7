//! Column schemas of the three option datasets.

use optlens_core::{columns::*, ColumnKind::*, ColumnSchema, Dataset};

/// Option chain quotes (`CADENA.csv`).
pub fn chain_schema() -> ColumnSchema {
    ColumnSchema::new(Dataset::Chain.name())
        .critical(STRIKE, PlainNumeric)
        .column(BID, PlainNumeric)
        .column(MID, PlainNumeric)
        .column(ASK, PlainNumeric)
        .column(LAST, PlainNumeric)
        .critical(VOLUME, PlainNumeric)
        .critical(OPEN_INT, PlainNumeric)
        .critical(IV, Percentage)
        .critical(DELTA, PlainNumeric)
        .critical(MONEYNESS, SignedPercentage)
}

/// Per-contract greeks (`Griegas.csv`).
pub fn greeks_schema() -> ColumnSchema {
    ColumnSchema::new(Dataset::Greeks.name())
        .critical(STRIKE, PlainNumeric)
        .critical(BID, PlainNumeric)
        .critical(ASK, PlainNumeric)
        .critical(VOLUME, PlainNumeric)
        .critical(OPEN_INT, PlainNumeric)
        .critical(IV, Percentage)
        .critical(DELTA, PlainNumeric)
        .critical(GAMMA, PlainNumeric)
        .critical(THETA, PlainNumeric)
        .critical(VEGA, PlainNumeric)
        .critical(ITM_PROB, Percentage)
}

/// Unusual flow prints (`Inusual.csv`).
pub fn flow_schema() -> ColumnSchema {
    ColumnSchema::new(Dataset::Flow.name())
        .column(EXPIRES, Timestamp)
        .critical(IV, Percentage)
        .critical(DELTA, AmbiguousMagnitude)
        .column(PRICE, PlainNumeric)
        .critical(STRIKE, PlainNumeric)
        .column(DTE, PlainNumeric)
        .column(TRADE, PlainNumeric)
        .critical(SIZE, PlainNumeric)
        .critical(PREMIUM, PlainNumeric)
        .critical(VOLUME, PlainNumeric)
        .critical(OPEN_INT, PlainNumeric)
}

/// Schema for a dataset.
pub fn schema_for(dataset: Dataset) -> ColumnSchema {
    match dataset {
        Dataset::Chain => chain_schema(),
        Dataset::Greeks => greeks_schema(),
        Dataset::Flow => flow_schema(),
    }
}
