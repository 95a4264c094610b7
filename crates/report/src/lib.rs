//! Snapshot pipeline and report for the optlens system.
//!
//! This crate provides:
//! - Loading, cleaning and deriving metrics for one CSV snapshot
//! - Per-dataset load status that degrades instead of failing
//! - Plain-text rendering used by the `optlens` binary

pub mod render;
pub mod snapshot;

pub use render::{render, RenderOptions};
pub use snapshot::{DatasetStatus, Snapshot, SnapshotRunner, SnapshotSummary};
