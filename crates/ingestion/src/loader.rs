//! CSV dataset loading.
//!
//! Reads headered CSV files into [`RawTable`]s with every field kept as text.
//! Distinguishes an absent file from one that cannot be parsed, and optionally
//! memoizes tables by path.

use optlens_core::{Cell, Error, RawTable, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse CSV text from any reader. `source_name` labels errors.
pub fn parse_csv<R: Read>(reader: R, source_name: &str) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| Error::malformed(source_name, e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = RawTable::new(headers);
    for record in rdr.records() {
        let record = record.map_err(|e| Error::malformed(source_name, e.to_string()))?;
        table.push_row(record.iter().map(Cell::text).collect())?;
    }
    Ok(table)
}

/// Load a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::missing_source(name.clone()),
        _ => Error::malformed(name.clone(), e.to_string()),
    })?;
    let table = parse_csv(std::io::BufReader::new(file), &name)?;
    debug!(path = %name, rows = table.len(), columns = table.columns().len(), "loaded CSV");
    Ok(table)
}

/// Loads datasets from disk, optionally memoizing successful loads by path.
///
/// Failed loads are never cached, so a file that appears later is picked up.
#[derive(Debug, Default)]
pub struct DatasetLoader {
    cache: Option<HashMap<PathBuf, RawTable>>,
}

impl DatasetLoader {
    /// Create a loader. With `cache` set, each path is read at most once.
    pub fn new(cache: bool) -> Self {
        Self {
            cache: cache.then(HashMap::new),
        }
    }

    /// Load a table, returning a fresh copy.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<RawTable> {
        let path = path.as_ref();
        let Some(cache) = self.cache.as_mut() else {
            return load_csv(path);
        };
        if let Some(table) = cache.get(path) {
            debug!(path = %path.display(), "CSV cache hit");
            return Ok(table.clone());
        }
        let table = load_csv(path)?;
        cache.insert(path.to_path_buf(), table.clone());
        Ok(table)
    }

    /// Forget a cached table.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) {
        if let Some(cache) = self.cache.as_mut() {
            cache.remove(path.as_ref());
        }
    }

    /// Forget all cached tables.
    pub fn clear(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    /// Number of cached tables.
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }
}
