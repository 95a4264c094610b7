//! Plain-text rendering of a snapshot.

use crate::snapshot::{DatasetStatus, Snapshot};
use optlens_core::Dataset;
use optlens_features::{GroupSum, StrikeExposure};
use std::fmt::{self, Write};

/// Render options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Highlighted trades to list.
    pub top: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { top: 10 }
    }
}

/// Render the full report.
pub fn render(snapshot: &Snapshot, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, snapshot, options);
    out
}

fn write_report(out: &mut String, snapshot: &Snapshot, options: RenderOptions) -> fmt::Result {
    writeln!(out, "== Datasets ==")?;
    for (dataset, status) in &snapshot.statuses {
        match status {
            DatasetStatus::Loaded { raw_rows, clean_rows } => {
                writeln!(out, "{:<8} {} rows ({} dropped)", dataset, clean_rows, raw_rows - clean_rows)?
            }
            DatasetStatus::Missing => writeln!(out, "{:<8} missing", dataset)?,
            DatasetStatus::Malformed(reason) => writeln!(out, "{:<8} malformed: {}", dataset, reason)?,
        }
        let report = snapshot.table(*dataset).report();
        for warning in &report.warnings {
            writeln!(out, "         warning: {}", warning)?;
        }
        for column in report.rescaled_columns() {
            writeln!(out, "         rescaled: {}", column)?;
        }
    }

    let metrics = &snapshot.metrics;
    if snapshot.status(Dataset::Chain).is_some_and(DatasetStatus::is_loaded) {
        writeln!(out, "\n== Put/Call ==")?;
        writeln!(
            out,
            "volume        {:>8.3}  {}",
            metrics.put_call_volume,
            metrics.volume_sentiment()
        )?;
        writeln!(
            out,
            "open interest {:>8.3}  {}",
            metrics.put_call_open_interest,
            metrics.open_interest_sentiment()
        )?;
    }

    if !metrics.vega_exposure.is_empty() {
        write_exposure(out, "Vega exposure", &metrics.vega_exposure)?;
        write_exposure(out, "Theta exposure", &metrics.theta_exposure)?;
    }

    if !metrics.premium_by_type_side.is_empty() {
        write_groups(out, "Premium by type/side", &metrics.premium_by_type_side)?;
        write_groups(out, "Premium by code", &metrics.premium_by_code)?;
    }

    if !metrics.premium_distribution.is_empty() {
        writeln!(out, "\n== Premium distribution ==")?;
        for d in &metrics.premium_distribution {
            writeln!(
                out,
                "{:<6} n={:<4} min={:.0} q1={:.0} med={:.0} q3={:.0} max={:.0} mean={:.0}",
                d.side, d.count, d.min, d.q1, d.median, d.q3, d.max, d.mean
            )?;
        }
    }

    let highlights = &metrics.highlights;
    if let Some(threshold) = highlights.premium_threshold {
        writeln!(
            out,
            "\n== Highlighted trades (premium >= {:.0}, vol/OI >= {:.2}) ==",
            threshold, highlights.min_vol_oi_ratio
        )?;
        for trade in highlights.trades.iter().take(options.top) {
            writeln!(
                out,
                "{:<6} {:<4} {:>8} {:<10} {:<4} premium={:<10.0} vol/OI={:.2} {}",
                trade.symbol.as_deref().unwrap_or("-"),
                trade.option_type.as_deref().unwrap_or("-"),
                trade.strike.map_or_else(|| "-".to_string(), |k| k.to_string()),
                trade.expires.map_or_else(|| "-".to_string(), |e| e.date().to_string()),
                trade.side.as_deref().unwrap_or("-"),
                trade.premium,
                trade.vol_oi_ratio,
                trade.code.as_deref().unwrap_or(""),
            )?;
        }
        if highlights.trades.len() > options.top {
            writeln!(out, "... {} more", highlights.trades.len() - options.top)?;
        }
    }
    Ok(())
}

fn write_exposure(out: &mut String, title: &str, series: &[StrikeExposure]) -> fmt::Result {
    writeln!(out, "\n== {} ==", title)?;
    for point in series {
        writeln!(out, "{:>8} {:>14.2}", point.strike, point.exposure)?;
    }
    Ok(())
}

fn write_groups(out: &mut String, title: &str, groups: &[GroupSum]) -> fmt::Result {
    writeln!(out, "\n== {} ==", title)?;
    for group in groups {
        writeln!(out, "{:<16} {:>14.0}", group.keys.join(" / "), group.total)?;
    }
    Ok(())
}
