//! Data ingestion and normalization for the optlens system.
//!
//! This crate handles:
//! - CSV loading with an optional per-path cache
//! - Cell normalization (percentages, signed percentages, ambiguous magnitudes)
//! - Schema-driven table cleaning and critical-column row drops
//! - The column schemas of the chain, greeks and flow datasets

pub mod cleaner;
pub mod loader;
pub mod normalizer;
pub mod schema;

pub use cleaner::TableCleaner;
pub use loader::{load_csv, parse_csv, DatasetLoader};
pub use normalizer::{FieldNormalizer, NormalizedColumn};
pub use schema::{chain_schema, flow_schema, greeks_schema, schema_for};
