//! All four statistic groups for one filtered dataset.

use serde::Serialize;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::Dataset;

use super::stats::{
    DurationStats, StationStats, TimeStats, UserStats, duration_stats, station_stats, time_stats, user_stats,
};

/// A statistic group that is undefined when no trips match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    /// No trips match the filter.
    Empty,
    /// Trips match but the group still cannot be computed (e.g. every station cell is blank).
    Unavailable { reason: String },
}

impl<T> Availability<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Empty | Availability::Unavailable { .. } => None,
        }
    }

    fn from_result(r: BikeshareResult<T>) -> Self {
        match r {
            Ok(v) => Availability::Available(v),
            Err(BikeshareError::EmptyDataset { .. }) => Availability::Empty,
            Err(e) => Availability::Unavailable { reason: e.to_string() },
        }
    }
}

/// Complete statistics for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub trips: usize,
    pub time: Availability<TimeStats>,
    pub stations: Availability<StationStats>,
    pub durations: DurationStats,
    pub users: UserStats,
}

/// Compute every statistic group.
///
/// The groups only read `dataset`, so they run concurrently on the rayon pool; the result is
/// the same as calling [`time_stats`], [`station_stats`], [`duration_stats`] and
/// [`user_stats`] one after another.
pub fn summarize(dataset: &Dataset) -> Summary {
    let ((time, stations), (durations, users)) = rayon::join(
        || rayon::join(|| time_stats(dataset), || station_stats(dataset)),
        || rayon::join(|| duration_stats(dataset), || user_stats(dataset)),
    );
    tracing::debug!(trips = dataset.row_count(), "computed summary");

    Summary {
        trips: dataset.row_count(),
        time: Availability::from_result(time),
        stations: Availability::from_result(stations),
        durations,
        users,
    }
}
