//! In-memory filtering, statistics and paging.
//!
//! The processing layer operates on [`crate::types::Dataset`] values produced by ingestion.
//! Every function here reads its input and returns a new value; nothing is mutated in place.
//!
//! - [`apply()`] / [`filter()`]: month/day filtering, or filtering by any predicate
//! - [`time_stats()`], [`station_stats()`], [`duration_stats()`], [`user_stats()`]: the four
//!   statistic groups
//! - [`summarize()`]: all four groups at once
//! - [`page()`]: five raw records at a time
//!
//! ## Example: filter → statistics → paging
//!
//! ```rust
//! use bikeshare_explorer::processing::{apply, page, station_stats, Tally};
//! use bikeshare_explorer::types::{
//!     CityId, Dataset, DayFilter, FilterSpec, MonthFilter, OptionalColumns, TripRecord,
//! };
//! use chrono::NaiveDate;
//!
//! let t = |m, d| NaiveDate::from_ymd_opt(2017, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let ds = Dataset::new(
//!     OptionalColumns::none(),
//!     vec![
//!         TripRecord::new(t(1, 2), 300.0, "A", "B"),
//!         TripRecord::new(t(2, 6), 420.0, "B", "A"),
//!         TripRecord::new(t(1, 9), 360.0, "A", "C"),
//!     ],
//! );
//!
//! let spec = FilterSpec::new(CityId::Chicago, "january".parse().unwrap(), DayFilter::All);
//! assert_eq!(spec.month, MonthFilter::Only(bikeshare_explorer::types::Month::January));
//! let january = apply(&ds, &spec);
//! assert_eq!(january.row_count(), 2);
//!
//! let stations = station_stats(&january).unwrap();
//! assert_eq!(stations.popular_start, Tally::new("A".to_string(), 2));
//!
//! assert_eq!(page(&january, 0).len(), 2);
//! assert!(page(&january, 5).is_empty());
//! ```

pub mod aggregate;
pub mod filter;
pub mod paging;
pub mod stats;
pub mod summary;

pub use aggregate::{Tally, mode, value_counts};
pub use filter::{apply, filter};
pub use paging::{PAGE_SIZE, next_offset, page};
pub use stats::{
    BirthYearStats, DurationStats, GenderStats, StationPair, StationStats, TimeStats, UserStats, duration_stats,
    station_stats, time_stats, user_stats,
};
pub use summary::{Availability, Summary, summarize};
