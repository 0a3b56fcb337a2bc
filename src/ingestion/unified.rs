//! Unified ingestion entrypoint.
//!
//! Most callers should use [`super::load_city`]; [`ingest_from_path`] is the path-based layer
//! underneath it.
//!
//! - If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//!   extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ::parquet::errors::ParquetError;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{CityId, Dataset};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json, parquet};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Options controlling ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest a trip file into an in-memory [`Dataset`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use bikeshare_explorer::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
///
/// # fn main() -> Result<(), bikeshare_explorer::BikeshareError> {
/// // Uses `.csv` to select CSV ingestion.
/// let ds = ingest_from_path("chicago.csv", &IngestionOptions::default())?;
/// println!("trips={}", ds.row_count());
///
/// // Force a format when the extension is missing or misleading.
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Json),
///     ..Default::default()
/// };
/// let ds = ingest_from_path("trips_export", &opts)?;
/// println!("trips={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> BikeshareResult<Dataset> {
    ingest_for_city(path.as_ref(), None, options)
}

/// Shared body of [`ingest_from_path`] and [`super::load_city`].
///
/// With a `city`, the dataset is tagged with it and an unreadable source is reported as
/// [`BikeshareError::DataSourceNotFound`].
pub(crate) fn ingest_for_city(
    path: &Path,
    city: Option<CityId>,
    options: &IngestionOptions,
) -> BikeshareResult<Dataset> {
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
        city,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Json => json::ingest_json_from_path(path),
        IngestionFormat::Parquet => parquet::ingest_parquet_from_path(path),
    };

    let result = match city {
        Some(city) => result
            .map(|ds| ds.with_city(city))
            .map_err(|e| source_not_found(city, path, e)),
        None => result,
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(&ctx, IngestionStats { rows: ds.row_count() }),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn source_not_found(city: CityId, path: &Path, e: BikeshareError) -> BikeshareError {
    let io = match e {
        BikeshareError::Io(io) => io,
        BikeshareError::Csv(err) => {
            let kind = match err.kind() {
                ::csv::ErrorKind::Io(io) => Some(io.kind()),
                _ => None,
            };
            match kind {
                Some(kind) => std::io::Error::new(kind, err),
                None => return BikeshareError::Csv(err),
            }
        }
        // The parquet reader wraps the failed open in `External`.
        BikeshareError::Parquet(ParquetError::External(err)) => match err.downcast::<std::io::Error>() {
            Ok(io) => *io,
            Err(err) => return BikeshareError::Parquet(ParquetError::External(err)),
        },
        other => return other,
    };
    BikeshareError::DataSourceNotFound {
        city,
        path: path.to_path_buf(),
        source: io,
    }
}

fn severity_for_error(e: &BikeshareError) -> IngestionSeverity {
    match e {
        BikeshareError::Io(_) | BikeshareError::DataSourceNotFound { .. } => IngestionSeverity::Critical,
        BikeshareError::Parquet(err) => {
            // Best-effort: parquet errors often wrap IO, but not always in a structured way.
            if error_chain_contains_io(err) {
                IngestionSeverity::Critical
            } else {
                IngestionSeverity::Error
            }
        }
        BikeshareError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        BikeshareError::SchemaMismatch { .. }
        | BikeshareError::MalformedRecord { .. }
        | BikeshareError::ParseError { .. }
        | BikeshareError::EmptyDataset { .. }
        | BikeshareError::MissingValues { .. } => IngestionSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_path(path: &Path) -> BikeshareResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| BikeshareError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| BikeshareError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("ndjson"), Some(IngestionFormat::Json));
        assert_eq!(IngestionFormat::from_extension("pq"), Some(IngestionFormat::Parquet));
        assert_eq!(IngestionFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn missing_extension_is_schema_mismatch() {
        let err = infer_format_from_path(Path::new("trips")).unwrap_err();
        assert!(err.to_string().contains("path has no extension"));
    }

    #[test]
    fn io_errors_become_source_not_found_for_a_city() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = source_not_found(CityId::Washington, Path::new("washington.csv"), BikeshareError::Io(io));
        assert!(matches!(
            err,
            BikeshareError::DataSourceNotFound { city: CityId::Washington, .. }
        ));
        assert_eq!(severity_for_error(&err), IngestionSeverity::Critical);
    }

    #[test]
    fn record_errors_pass_through_unchanged() {
        let err = source_not_found(
            CityId::Chicago,
            Path::new("chicago.csv"),
            BikeshareError::MalformedRecord {
                row: 2,
                raw: "x".to_string(),
                message: "bad".to_string(),
            },
        );
        assert!(matches!(err, BikeshareError::MalformedRecord { row: 2, .. }));
        assert_eq!(severity_for_error(&err), IngestionSeverity::Error);
    }

    #[test]
    fn wrapped_io_errors_become_source_not_found() {
        let csv_err = ::csv::Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = source_not_found(CityId::Chicago, Path::new("chicago.csv"), BikeshareError::Csv(csv_err));
        match err {
            BikeshareError::DataSourceNotFound { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let pq_err = ParquetError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = source_not_found(CityId::Chicago, Path::new("chicago.parquet"), BikeshareError::Parquet(pq_err));
        match err {
            BikeshareError::DataSourceNotFound { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_io_format_errors_pass_through() {
        let csv_err = ::csv::Reader::from_reader(&b"a\n\xff\n"[..])
            .records()
            .next()
            .unwrap()
            .unwrap_err();
        let err = source_not_found(CityId::Chicago, Path::new("chicago.csv"), BikeshareError::Csv(csv_err));
        assert!(matches!(err, BikeshareError::Csv(_)));

        let pq_err = ParquetError::External("not a parquet file".into());
        let err = source_not_found(CityId::Chicago, Path::new("chicago.parquet"), BikeshareError::Parquet(pq_err));
        assert!(matches!(err, BikeshareError::Parquet(ParquetError::External(_))));
    }
}
