//! Configuration structures for the optlens system.

use crate::error::{Error, Result};
use crate::types::Dataset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a snapshot run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset locations.
    pub data: DataConfig,
    /// Cell normalization configuration.
    pub normalizer: NormalizerConfig,
    /// Derived metrics configuration.
    pub metrics: MetricsConfig,
}

impl Config {
    /// Parse a configuration from JSON text. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        self.normalizer.validate()?;
        self.metrics.validate()
    }
}

/// Dataset file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the CSV files.
    pub data_dir: PathBuf,
    /// Option chain quotes.
    pub chain_file: String,
    /// Per-contract greeks.
    pub greeks_file: String,
    /// Unusual flow prints.
    pub flow_file: String,
    /// Memoize loaded tables by path.
    pub cache: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            chain_file: "CADENA.csv".to_string(),
            greeks_file: "Griegas.csv".to_string(),
            flow_file: "Inusual.csv".to_string(),
            cache: true,
        }
    }
}

impl DataConfig {
    /// File name configured for a dataset.
    pub fn file_name(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Chain => &self.chain_file,
            Dataset::Greeks => &self.greeks_file,
            Dataset::Flow => &self.flow_file,
        }
    }

    /// Full path of a dataset's CSV file.
    pub fn path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(self.file_name(dataset))
    }

    fn validate(&self) -> Result<()> {
        for (label, file) in [
            ("chain_file", &self.chain_file),
            ("greeks_file", &self.greeks_file),
            ("flow_file", &self.flow_file),
        ] {
            if file.trim().is_empty() {
                return Err(Error::config(format!("{label} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Cell normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Tokens that always mean "missing" (compared after trimming, case as given).
    pub placeholder_tokens: Vec<String>,
    /// Magnitude above which an ambiguous column is treated as percentage numbers.
    pub ambiguous_threshold: f64,
    /// chrono formats tried in order after RFC 3339.
    pub timestamp_formats: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            placeholder_tokens: vec!["unch".to_string(), "N/A".to_string(), String::new()],
            ambiguous_threshold: 5.0,
            timestamp_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                // Two-digit years first: `%Y` would also accept "25" as year 25.
                "%m/%d/%y %H:%M".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
                "%Y-%m-%d".to_string(),
                "%m/%d/%y".to_string(),
                "%m/%d/%Y".to_string(),
            ],
        }
    }
}

impl NormalizerConfig {
    fn validate(&self) -> Result<()> {
        if !(self.ambiguous_threshold > 0.0) {
            return Err(Error::config("ambiguous_threshold must be positive"));
        }
        Ok(())
    }
}

/// Derived metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Shares per contract used by exposure series.
    pub contract_multiplier: f64,
    /// Premium quantile a trade must reach to be highlighted.
    pub highlight_quantile: f64,
    /// Minimum Volume / (Open Int + offset) for a highlighted trade.
    pub min_vol_oi_ratio: f64,
    /// Zero-guard added to open interest in the vol/OI ratio.
    pub open_interest_offset: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: 100.0,
            highlight_quantile: 0.75,
            min_vol_oi_ratio: 1.0,
            open_interest_offset: 1.0,
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.highlight_quantile) {
            return Err(Error::config("highlight_quantile must be within [0, 1]"));
        }
        if !(self.contract_multiplier > 0.0) {
            return Err(Error::config("contract_multiplier must be positive"));
        }
        if self.min_vol_oi_ratio < 0.0 || self.open_interest_offset < 0.0 {
            return Err(Error::config(
                "min_vol_oi_ratio and open_interest_offset must be non-negative",
            ));
        }
        Ok(())
    }
}
