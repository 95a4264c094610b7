//! Snapshot runner.
//!
//! Loads the three datasets, cleans each against its schema and derives the
//! metrics. A dataset that fails to load is reported and replaced by an empty
//! table; the run only fails when nothing could be loaded.

use optlens_core::{CleanReport, CleanedTable, Config, Dataset, Error, RawTable, Result};
use optlens_features::{DerivedMetrics, MetricsEngine};
use optlens_ingestion::{schema_for, DatasetLoader, TableCleaner};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Load outcome of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetStatus {
    /// Loaded and cleaned.
    Loaded { raw_rows: usize, clean_rows: usize },
    /// File not found.
    Missing,
    /// File present but unreadable as a table.
    Malformed(String),
}

impl DatasetStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DatasetStatus::Loaded { .. })
    }
}

/// Cleaned tables and derived metrics for one set of CSV files.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub chain: CleanedTable,
    pub greeks: CleanedTable,
    pub flow: CleanedTable,
    /// Load outcome per dataset, in `Dataset::ALL` order.
    pub statuses: Vec<(Dataset, DatasetStatus)>,
    pub metrics: DerivedMetrics,
}

/// Serializable view of a snapshot without the table bodies.
#[derive(Debug, Serialize)]
pub struct SnapshotSummary<'a> {
    pub statuses: &'a [(Dataset, DatasetStatus)],
    pub clean_reports: Vec<&'a CleanReport>,
    pub metrics: &'a DerivedMetrics,
}

impl Snapshot {
    /// Run the full pipeline once with a fresh loader.
    pub fn run(config: &Config) -> Result<Self> {
        SnapshotRunner::new(config).run()
    }

    /// Clean and derive from tables already in memory.
    ///
    /// `None` marks a dataset as missing.
    pub fn from_tables(
        config: &Config,
        chain: Option<RawTable>,
        greeks: Option<RawTable>,
        flow: Option<RawTable>,
    ) -> Result<Self> {
        let loaded = [chain, greeks, flow].map(|table| table.ok_or(DatasetStatus::Missing));
        assemble(&TableCleaner::new(&config.normalizer), &MetricsEngine::new(&config.metrics), loaded)
    }

    /// Cleaned table of a dataset.
    pub fn table(&self, dataset: Dataset) -> &CleanedTable {
        match dataset {
            Dataset::Chain => &self.chain,
            Dataset::Greeks => &self.greeks,
            Dataset::Flow => &self.flow,
        }
    }

    /// Load outcome of a dataset.
    pub fn status(&self, dataset: Dataset) -> Option<&DatasetStatus> {
        self.statuses
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, status)| status)
    }

    pub fn summary(&self) -> SnapshotSummary<'_> {
        SnapshotSummary {
            statuses: &self.statuses,
            clean_reports: Dataset::ALL.iter().map(|d| self.table(*d).report()).collect(),
            metrics: &self.metrics,
        }
    }
}

/// Reusable pipeline; keeps the loader cache between runs.
#[derive(Debug)]
pub struct SnapshotRunner {
    config: Config,
    loader: DatasetLoader,
    cleaner: TableCleaner,
    engine: MetricsEngine,
}

impl SnapshotRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            loader: DatasetLoader::new(config.data.cache),
            cleaner: TableCleaner::new(&config.normalizer),
            engine: MetricsEngine::new(&config.metrics),
        }
    }

    /// Forget cached tables so the next run rereads the files.
    pub fn refresh(&mut self) {
        self.loader.clear();
    }

    pub fn run(&mut self) -> Result<Snapshot> {
        let loaded = Dataset::ALL.map(|dataset| self.load(dataset));
        assemble(&self.cleaner, &self.engine, loaded)
    }

    fn load(&mut self, dataset: Dataset) -> std::result::Result<RawTable, DatasetStatus> {
        let path = self.config.data.path(dataset);
        match self.loader.load(&path) {
            Ok(table) => Ok(table),
            Err(Error::MissingSource(_)) => {
                warn!(dataset = %dataset, path = %path.display(), "dataset missing");
                Err(DatasetStatus::Missing)
            }
            Err(e) => {
                warn!(dataset = %dataset, path = %path.display(), error = %e, "dataset unreadable");
                Err(DatasetStatus::Malformed(e.to_string()))
            }
        }
    }
}

type Loaded = std::result::Result<RawTable, DatasetStatus>;

fn clean_one(cleaner: &TableCleaner, dataset: Dataset, loaded: Loaded) -> (CleanedTable, DatasetStatus) {
    match loaded {
        Ok(raw) => {
            let cleaned = cleaner.clean(&raw, &schema_for(dataset));
            for warning in &cleaned.report().warnings {
                warn!(dataset = %dataset, "{}", warning);
            }
            let status = DatasetStatus::Loaded {
                raw_rows: raw.len(),
                clean_rows: cleaned.len(),
            };
            (cleaned, status)
        }
        Err(status) => (CleanedTable::empty(), status),
    }
}

/// Loaded tables in `Dataset::ALL` order.
fn assemble(cleaner: &TableCleaner, engine: &MetricsEngine, loaded: [Loaded; 3]) -> Result<Snapshot> {
    let [chain, greeks, flow] = loaded;
    let (chain, chain_status) = clean_one(cleaner, Dataset::Chain, chain);
    let (greeks, greeks_status) = clean_one(cleaner, Dataset::Greeks, greeks);
    let (flow, flow_status) = clean_one(cleaner, Dataset::Flow, flow);
    let statuses = vec![
        (Dataset::Chain, chain_status),
        (Dataset::Greeks, greeks_status),
        (Dataset::Flow, flow_status),
    ];

    if !statuses.iter().any(|(_, s)| s.is_loaded()) {
        return Err(Error::NoDatasets);
    }

    let metrics = engine.derive(&chain, &greeks, &flow);
    info!(
        chain_rows = chain.len(),
        greeks_rows = greeks.len(),
        flow_rows = flow.len(),
        highlighted = metrics.highlights.trades.len(),
        "snapshot complete"
    );

    Ok(Snapshot {
        chain,
        greeks,
        flow,
        statuses,
        metrics,
    })
}
