//! `bikeshare-explorer` loads bike-share trip data for a city into an in-memory
//! [`types::Dataset`], filters it by month and weekday, and computes descriptive statistics.
//!
//! The primary entrypoint is [`ingestion::load_city`], which resolves a [`types::CityId`] to a
//! data file (see [`ingestion::DataSources`]) and auto-detects the ingestion format from the
//! file extension.
//!
//! ## Source data
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Parquet**: `.parquet`, `.pq`
//!
//! **Columns** (matched by header name, any order, extra columns ignored):
//!
//! | Column          | Required | Notes                                   |
//! |-----------------|----------|-----------------------------------------|
//! | `Start Time`    | yes      | month, weekday and hour derive from it  |
//! | `End Time`      | no       |                                         |
//! | `Trip Duration` | yes      | seconds, non-negative                   |
//! | `Start Station` | yes      |                                         |
//! | `End Station`   | yes      |                                         |
//! | `User Type`     | yes      | blank cells are kept as absent          |
//! | `Gender`        | no       | Washington has no such column           |
//! | `Birth Year`    | no       | whole years, `1992.0` accepted          |
//!
//! ## Example
//!
//! ```no_run
//! use bikeshare_explorer::ingestion::{load_city, DataSources, IngestionOptions};
//! use bikeshare_explorer::processing::{apply, page, summarize};
//! use bikeshare_explorer::types::{CityId, FilterSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = FilterSpec::new(
//!     "chicago".parse::<CityId>()?,
//!     "march".parse()?,
//!     "all".parse()?,
//! );
//! let ds = load_city(spec.city, &DataSources::new("data"), &IngestionOptions::default())?;
//! let march = apply(&ds, &spec);
//!
//! let summary = summarize(&march);
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//!
//! for trip in page(&march, 0) {
//!     println!("{} {} -> {}", trip.start_time, trip.start_station, trip.end_station);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: city/source resolution and format-specific loaders
//! - [`types`]: trip records, datasets, and filter selections
//! - [`processing`]: filtering, statistics and paging
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{BikeshareError, BikeshareResult, FilterParseError};
