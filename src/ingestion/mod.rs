//! Record loading.
//!
//! Most callers should use [`load_city`] (from [`sources`]) which:
//!
//! - resolves the city's data file through [`DataSources`]
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads trips into an in-memory [`crate::types::Dataset`], deriving month/weekday/hour
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]

pub mod csv;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod record;
pub mod sources;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use record::{ColumnLayout, TripColumn};
pub use sources::{DataSources, load_city};
pub use unified::{IngestionFormat, IngestionOptions, ingest_from_path};
