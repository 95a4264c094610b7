//! PyO3 bindings for the optlens snapshot pipeline.
//!
//! Exposes to Python:
//! - CSV cleaning per dataset schema
//! - Full snapshot runs with derived metrics
//! - Percentile helper

use pyo3::exceptions::{PyFileNotFoundError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use optlens_core::{Cell, Config as RustConfig, Dataset, Error as RustError};
use optlens_features::{
    GroupSum as RustGroupSum,
    HighlightedTrade as RustHighlightedTrade,
    PremiumDistribution as RustPremiumDistribution,
    StrikeExposure as RustStrikeExposure,
};
use optlens_ingestion::{load_csv, schema_for, TableCleaner};
use optlens_report::{render, DatasetStatus, RenderOptions, Snapshot as RustSnapshot};

fn to_py_err(e: RustError) -> PyErr {
    match e {
        RustError::MissingSource(_) => PyFileNotFoundError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn cell_to_py(py: Python<'_>, cell: &Cell) -> PyObject {
    match cell {
        Cell::Missing => py.None(),
        Cell::Text(s) => s.as_str().into_py(py),
        Cell::Number(v) => (*v).into_py(py),
        Cell::Timestamp(ts) => ts.to_string().into_py(py),
    }
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Exposure at one strike.
#[pyclass]
#[derive(Clone)]
pub struct StrikeExposure {
    #[pyo3(get)]
    pub strike: f64,
    #[pyo3(get)]
    pub exposure: f64,
}

#[pymethods]
impl StrikeExposure {
    fn __repr__(&self) -> String {
        format!("StrikeExposure(strike={}, exposure={:.2})", self.strike, self.exposure)
    }
}

impl From<RustStrikeExposure> for StrikeExposure {
    fn from(e: RustStrikeExposure) -> Self {
        StrikeExposure {
            strike: e.strike,
            exposure: e.exposure,
        }
    }
}

/// Summed value for one group key tuple.
#[pyclass]
#[derive(Clone)]
pub struct GroupSum {
    #[pyo3(get)]
    pub keys: Vec<String>,
    #[pyo3(get)]
    pub total: f64,
}

#[pymethods]
impl GroupSum {
    fn __repr__(&self) -> String {
        format!("GroupSum(keys={:?}, total={})", self.keys, self.total)
    }
}

impl From<RustGroupSum> for GroupSum {
    fn from(g: RustGroupSum) -> Self {
        GroupSum {
            keys: g.keys,
            total: g.total,
        }
    }
}

/// Highlighted unusual-flow trade.
#[pyclass]
#[derive(Clone)]
pub struct HighlightedTrade {
    #[pyo3(get)]
    pub symbol: Option<String>,
    #[pyo3(get)]
    pub option_type: Option<String>,
    #[pyo3(get)]
    pub strike: Option<f64>,
    /// Expiry as `YYYY-MM-DD HH:MM:SS`.
    #[pyo3(get)]
    pub expires: Option<String>,
    #[pyo3(get)]
    pub side: Option<String>,
    #[pyo3(get)]
    pub premium: f64,
    #[pyo3(get)]
    pub volume: f64,
    #[pyo3(get)]
    pub open_interest: f64,
    #[pyo3(get)]
    pub vol_oi_ratio: f64,
    #[pyo3(get)]
    pub code: Option<String>,
    #[pyo3(get)]
    pub time: Option<String>,
}

#[pymethods]
impl HighlightedTrade {
    fn __repr__(&self) -> String {
        format!(
            "HighlightedTrade(symbol={:?}, type={:?}, strike={:?}, premium={}, vol_oi={:.2})",
            self.symbol, self.option_type, self.strike, self.premium, self.vol_oi_ratio
        )
    }
}

impl From<RustHighlightedTrade> for HighlightedTrade {
    fn from(t: RustHighlightedTrade) -> Self {
        HighlightedTrade {
            symbol: t.symbol,
            option_type: t.option_type,
            strike: t.strike,
            expires: t.expires.map(|e| e.to_string()),
            side: t.side,
            premium: t.premium,
            volume: t.volume,
            open_interest: t.open_interest,
            vol_oi_ratio: t.vol_oi_ratio,
            code: t.code,
            time: t.time,
        }
    }
}

/// Premium statistics for one trade side.
#[pyclass]
#[derive(Clone)]
pub struct PremiumDistribution {
    #[pyo3(get)]
    pub side: String,
    #[pyo3(get)]
    pub count: usize,
    #[pyo3(get)]
    pub min: f64,
    #[pyo3(get)]
    pub q1: f64,
    #[pyo3(get)]
    pub median: f64,
    #[pyo3(get)]
    pub q3: f64,
    #[pyo3(get)]
    pub max: f64,
    #[pyo3(get)]
    pub mean: f64,
    #[pyo3(get)]
    pub std_dev: Option<f64>,
}

impl From<RustPremiumDistribution> for PremiumDistribution {
    fn from(d: RustPremiumDistribution) -> Self {
        PremiumDistribution {
            side: d.side,
            count: d.count,
            min: d.min,
            q1: d.q1,
            median: d.median,
            q3: d.q3,
            max: d.max,
            mean: d.mean,
            std_dev: d.std_dev,
        }
    }
}

fn convert<T: Clone, U: From<T>>(items: &[T]) -> Vec<U> {
    items.iter().cloned().map(U::from).collect()
}

// ============================================================================
// Snapshot
// ============================================================================

/// Cleaned datasets and derived metrics for one data directory.
#[pyclass]
pub struct Snapshot {
    inner: RustSnapshot,
}

#[pymethods]
impl Snapshot {
    /// Run the pipeline over `data_dir`, optionally with a JSON config file.
    #[new]
    #[pyo3(signature = (data_dir, config_path=None))]
    fn new(data_dir: &str, config_path: Option<&str>) -> PyResult<Self> {
        let mut config = match config_path {
            Some(path) => RustConfig::from_json_file(path).map_err(to_py_err)?,
            None => RustConfig::default(),
        };
        config.data.data_dir = data_dir.into();
        let inner = RustSnapshot::run(&config).map_err(to_py_err)?;
        Ok(Snapshot { inner })
    }

    /// Load status per dataset: "loaded", "missing" or "malformed: <reason>".
    fn statuses<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        for (dataset, status) in &self.inner.statuses {
            let label = match status {
                DatasetStatus::Loaded { .. } => "loaded".to_string(),
                DatasetStatus::Missing => "missing".to_string(),
                DatasetStatus::Malformed(reason) => format!("malformed: {reason}"),
            };
            dict.set_item(dataset.name(), label)?;
        }
        Ok(dict)
    }

    #[getter]
    fn put_call_volume(&self) -> f64 {
        self.inner.metrics.put_call_volume
    }

    #[getter]
    fn put_call_open_interest(&self) -> f64 {
        self.inner.metrics.put_call_open_interest
    }

    #[getter]
    fn volume_sentiment(&self) -> String {
        self.inner.metrics.volume_sentiment().to_string()
    }

    #[getter]
    fn open_interest_sentiment(&self) -> String {
        self.inner.metrics.open_interest_sentiment().to_string()
    }

    #[getter]
    fn vega_exposure(&self) -> Vec<StrikeExposure> {
        convert(&self.inner.metrics.vega_exposure)
    }

    #[getter]
    fn theta_exposure(&self) -> Vec<StrikeExposure> {
        convert(&self.inner.metrics.theta_exposure)
    }

    #[getter]
    fn premium_by_type_side(&self) -> Vec<GroupSum> {
        convert(&self.inner.metrics.premium_by_type_side)
    }

    #[getter]
    fn premium_by_code(&self) -> Vec<GroupSum> {
        convert(&self.inner.metrics.premium_by_code)
    }

    #[getter]
    fn premium_distribution(&self) -> Vec<PremiumDistribution> {
        convert(&self.inner.metrics.premium_distribution)
    }

    /// Premium quantile used for highlighting; `None` without flow data.
    #[getter]
    fn premium_threshold(&self) -> Option<f64> {
        self.inner.metrics.highlights.premium_threshold
    }

    #[getter]
    fn highlights(&self) -> Vec<HighlightedTrade> {
        convert(&self.inner.metrics.highlights.trades)
    }

    /// Plain-text report.
    #[pyo3(signature = (top=10))]
    fn report(&self, top: usize) -> String {
        render(&self.inner, RenderOptions { top })
    }

    /// Summary (statuses, clean reports, metrics) as JSON text.
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.summary()).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Snapshot(chain={}, greeks={}, flow={}, highlights={})",
            self.inner.chain.len(),
            self.inner.greeks.len(),
            self.inner.flow.len(),
            self.inner.metrics.highlights.trades.len()
        )
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Load and clean one CSV as `dataset` ("chain", "greeks" or "flow").
///
/// Returns a dict of column name to list of values; unparseable cells are `None`.
#[pyfunction]
fn clean_csv<'py>(py: Python<'py>, path: &str, dataset: &str) -> PyResult<Bound<'py, PyDict>> {
    let dataset = Dataset::parse(dataset)
        .ok_or_else(|| PyValueError::new_err(format!("unknown dataset: {dataset}")))?;
    let raw = load_csv(path).map_err(to_py_err)?;
    let cleaned = TableCleaner::default().clean(&raw, &schema_for(dataset));

    let dict = PyDict::new_bound(py);
    for (idx, name) in cleaned.columns().iter().enumerate() {
        let values = cleaned.rows().iter().map(|row| cell_to_py(py, &row[idx]));
        dict.set_item(name, PyList::new_bound(py, values))?;
    }
    Ok(dict)
}

/// Linear-interpolated percentile, `q` in [0, 1].
#[pyfunction]
fn percentile(values: Vec<f64>, q: f64) -> Option<f64> {
    optlens_features::percentile(&values, q)
}

// ============================================================================
// Module Definition
// ============================================================================

/// optlens - options snapshot metrics implemented in Rust.
#[pymodule]
fn optlens(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<StrikeExposure>()?;
    m.add_class::<GroupSum>()?;
    m.add_class::<HighlightedTrade>()?;
    m.add_class::<PremiumDistribution>()?;
    m.add_class::<Snapshot>()?;

    // Functions
    m.add_function(wrap_pyfunction!(clean_csv, m)?)?;
    m.add_function(wrap_pyfunction!(percentile, m)?)?;

    Ok(())
}
