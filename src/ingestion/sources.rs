//! City → data source mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::BikeshareResult;
use crate::types::{CityId, Dataset};

use super::unified::{IngestionFormat, IngestionOptions, ingest_for_city};

/// Where each city's trip data lives.
///
/// By default `<data_dir>/<stem>.csv` (`chicago.csv`, `new_york_city.csv`, `washington.csv`).
/// If that file is absent, the first `<data_dir>/<stem>.*` with a supported extension is used.
/// Explicit overrides win over both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    /// Directory searched for `<stem>.<ext>` files.
    pub data_dir: PathBuf,
    /// Per-city paths that bypass the directory lookup.
    pub overrides: BTreeMap<CityId, PathBuf>,
}

impl Default for DataSources {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataSources {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Point `city` at an explicit file.
    pub fn with_override(mut self, city: CityId, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(city, path.into());
        self
    }

    /// Resolve the path for `city`.
    ///
    /// Always returns a path; whether it is readable is only known once ingestion opens it.
    pub fn resolve(&self, city: CityId) -> PathBuf {
        if let Some(p) = self.overrides.get(&city) {
            return p.clone();
        }
        let default = self.data_dir.join(format!("{}.csv", city.file_stem()));
        if default.exists() {
            return default;
        }
        find_alternate_format(&self.data_dir, city.file_stem()).unwrap_or(default)
    }
}

fn find_alternate_format(dir: &Path, stem: &str) -> Option<PathBuf> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped_dir}/{}.*", glob::Pattern::escape(stem));
    let mut candidates: Vec<PathBuf> = glob::glob(&pattern)
        .ok()?
        .filter_map(Result::ok)
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .and_then(IngestionFormat::from_extension)
                .is_some()
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Load the dataset for `city`.
///
/// Fails with [`crate::BikeshareError::DataSourceNotFound`] if the resolved source cannot be
/// opened or read, and with [`crate::BikeshareError::MalformedRecord`] if a row has no valid
/// start time.
///
/// ```no_run
/// use bikeshare_explorer::ingestion::{load_city, DataSources, IngestionOptions};
/// use bikeshare_explorer::types::CityId;
///
/// # fn main() -> Result<(), bikeshare_explorer::BikeshareError> {
/// let sources = DataSources::new("data");
/// let ds = load_city(CityId::Chicago, &sources, &IngestionOptions::default())?;
/// println!("trips={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_city(city: CityId, sources: &DataSources, options: &IngestionOptions) -> BikeshareResult<Dataset> {
    let path = sources.resolve(city);
    tracing::debug!(city = city.name(), path = %path.display(), "resolved data source");
    ingest_for_city(&path, Some(city), options)
}
