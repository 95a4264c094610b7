//! Core types and configuration for the optlens system.
//!
//! This crate provides shared types used across all other crates:
//! - Table types (raw cells, cleaned tables, clean reports)
//! - Column schemas and dataset descriptors
//! - Configuration structures
//! - Common error types

pub mod cleaned;
pub mod config;
pub mod error;
pub mod types;

pub use cleaned::{CleanReport, CleanWarning, CleanedTable, ColumnStats};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
