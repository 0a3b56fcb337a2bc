//! The four statistic groups computed over a (filtered) [`Dataset`].
//!
//! Each function is pure and reads the dataset only. Mode-based results follow the tie-break
//! rule documented in [`super::aggregate`]: numeric ascending for month/hour/birth year,
//! lexical ascending for day names, station names and station pairs (start, then end).

use serde::Serialize;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{Dataset, DayOfWeek};

use super::aggregate::{Tally, mean, mode, sum, value_counts};

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// Month number, 1 = January.
    pub popular_month: Tally<u32>,
    pub popular_day: Tally<DayOfWeek>,
    /// Start hour, 0..=23.
    pub popular_hour: Tally<u32>,
}

/// An ordered (start, end) station combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub popular_start: Tally<String>,
    pub popular_end: Tally<String>,
    pub popular_trip: Tally<StationPair>,
}

/// Total and mean trip duration.
///
/// Durations stay in seconds in the records; the hour/minute fields are conversions of the
/// second-based ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub total_hours: f64,
    /// `None` when there are no trips.
    pub mean_seconds: Option<f64>,
    pub mean_minutes: Option<f64>,
}

/// Gender breakdown, or no data when the source lacks the column or every value is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "counts", rename_all = "snake_case")]
pub enum GenderStats {
    Breakdown(Vec<Tally<String>>),
    NoData,
}

/// Birth-year summary, or no data when the source lacks the column or every value is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BirthYearStats {
    Summary {
        /// Oldest riders.
        earliest: i32,
        /// Youngest riders.
        most_recent: i32,
        most_common: Tally<i32>,
    },
    NoData,
}

/// User demographics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Count per user type, highest first; blank user types are not counted.
    pub user_types: Vec<Tally<String>>,
    pub gender: GenderStats,
    pub birth_years: BirthYearStats,
}

/// Most common month, weekday and start hour.
///
/// Fails with [`BikeshareError::EmptyDataset`] on zero records.
pub fn time_stats(dataset: &Dataset) -> BikeshareResult<TimeStats> {
    let empty = || BikeshareError::EmptyDataset {
        group: "time-of-travel statistics",
    };

    let popular_month = mode(dataset.iter().map(|r| r.month)).ok_or_else(empty)?;
    // Keyed by name so ties break lexically ("Friday" before "Monday").
    let popular_day = mode(dataset.iter().map(|r| (r.day_of_week.name(), r.day_of_week)))
        .ok_or_else(empty)?
        .map(|(_, day)| day);
    let popular_hour = mode(dataset.iter().map(|r| r.hour)).ok_or_else(empty)?;

    Ok(TimeStats {
        popular_month,
        popular_day,
        popular_hour,
    })
}

/// Most common start station, end station and (start, end) pair.
///
/// Blank station names are not counted, and a pair counts only when both ends are named.
/// Fails with [`BikeshareError::EmptyDataset`] on zero records, and with
/// [`BikeshareError::MissingValues`] when every station cell is blank.
pub fn station_stats(dataset: &Dataset) -> BikeshareResult<StationStats> {
    const GROUP: &str = "station statistics";
    if dataset.is_empty() {
        return Err(BikeshareError::EmptyDataset { group: GROUP });
    }
    let missing = || BikeshareError::MissingValues { group: GROUP };

    let popular_start = mode(
        dataset
            .iter()
            .map(|r| r.start_station.as_str())
            .filter(|s| !s.is_empty()),
    )
    .ok_or_else(missing)?;
    let popular_end = mode(
        dataset
            .iter()
            .map(|r| r.end_station.as_str())
            .filter(|s| !s.is_empty()),
    )
    .ok_or_else(missing)?;
    let popular_trip = mode(
        dataset
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str()))
            .filter(|(start, end)| !start.is_empty() && !end.is_empty()),
    )
    .ok_or_else(missing)?;

    Ok(StationStats {
        popular_start: popular_start.map(str::to_owned),
        popular_end: popular_end.map(str::to_owned),
        popular_trip: popular_trip.map(|(start, end)| StationPair {
            start: start.to_owned(),
            end: end.to_owned(),
        }),
    })
}

/// Total travel time and mean travel time. Zero total and no mean on zero records.
pub fn duration_stats(dataset: &Dataset) -> DurationStats {
    let total_seconds = sum(dataset.iter().map(|r| r.trip_duration_seconds));
    let mean_seconds = mean(dataset.iter().map(|r| r.trip_duration_seconds));
    DurationStats {
        trips: dataset.row_count(),
        total_seconds,
        total_hours: total_seconds / 3600.0,
        mean_seconds,
        mean_minutes: mean_seconds.map(|s| s / 60.0),
    }
}

/// User type counts, gender breakdown and birth-year summary.
pub fn user_stats(dataset: &Dataset) -> UserStats {
    let user_types = value_counts(dataset.iter().filter_map(|r| r.user_type.as_deref()))
        .into_iter()
        .map(|t| t.map(str::to_owned))
        .collect();

    UserStats {
        user_types,
        gender: gender_stats(dataset),
        birth_years: birth_year_stats(dataset),
    }
}

fn gender_stats(dataset: &Dataset) -> GenderStats {
    if !dataset.columns.gender {
        return GenderStats::NoData;
    }
    let counts = value_counts(dataset.iter().filter_map(|r| r.gender.as_deref()));
    if counts.is_empty() {
        return GenderStats::NoData;
    }
    GenderStats::Breakdown(counts.into_iter().map(|t| t.map(str::to_owned)).collect())
}

fn birth_year_stats(dataset: &Dataset) -> BirthYearStats {
    if !dataset.columns.birth_year {
        return BirthYearStats::NoData;
    }
    let years = || dataset.iter().filter_map(|r| r.birth_year);
    match (years().min(), years().max(), mode(years())) {
        (Some(earliest), Some(most_recent), Some(most_common)) => BirthYearStats::Summary {
            earliest,
            most_recent,
            most_common,
        },
        _ => BirthYearStats::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OptionalColumns, TripRecord};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn trip(start: &str, end: &str) -> TripRecord {
        TripRecord::new(at(1, 2, 8), 600.0, start, end)
    }

    #[test]
    fn month_mode_scenario() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![
                TripRecord::new(at(1, 2, 8), 60.0, "A", "B"),
                TripRecord::new(at(1, 9, 8), 60.0, "A", "B"),
                TripRecord::new(at(3, 6, 8), 60.0, "A", "B"),
            ],
        );
        let stats = time_stats(&ds).unwrap();
        assert_eq!(stats.popular_month, Tally::new(1, 2));
    }

    #[test]
    fn day_ties_break_lexically_by_name() {
        // 2017-01-02 Monday, 2017-01-06 Friday: one each, "Friday" sorts first.
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![
                TripRecord::new(at(1, 2, 8), 60.0, "A", "B"),
                TripRecord::new(at(1, 6, 9), 60.0, "A", "B"),
            ],
        );
        let stats = time_stats(&ds).unwrap();
        assert_eq!(stats.popular_day, Tally::new(DayOfWeek::Friday, 1));
        assert_eq!(stats.popular_hour, Tally::new(8, 1));
    }

    #[test]
    fn time_stats_on_empty_dataset_is_an_error() {
        let ds = Dataset::new(OptionalColumns::all(), Vec::new());
        let err = time_stats(&ds).unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyDataset { .. }));
    }

    #[test]
    fn start_station_scenario() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![trip("A", "X"), trip("B", "X"), trip("A", "Y")],
        );
        let stats = station_stats(&ds).unwrap();
        assert_eq!(stats.popular_start, Tally::new("A".to_string(), 2));
        assert_eq!(stats.popular_end, Tally::new("X".to_string(), 2));
    }

    #[test]
    fn station_pair_ties_compare_start_then_end() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![trip("B", "A"), trip("A", "Z"), trip("A", "C"), trip("B", "A"), trip("A", "C")],
        );
        let stats = station_stats(&ds).unwrap();
        assert_eq!(
            stats.popular_trip,
            Tally::new(
                StationPair {
                    start: "A".to_string(),
                    end: "C".to_string()
                },
                2
            )
        );
    }

    #[test]
    fn station_stats_on_empty_dataset_is_an_error() {
        let ds = Dataset::new(OptionalColumns::none(), Vec::new());
        assert!(matches!(
            station_stats(&ds),
            Err(BikeshareError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn blank_stations_are_not_counted() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![trip("", "X"), trip("", "Y"), trip("A", ""), trip("A", "X"), trip("B", "Y")],
        );
        let stats = station_stats(&ds).unwrap();
        assert_eq!(stats.popular_start, Tally::new("A".to_string(), 2));
        assert_eq!(stats.popular_end, Tally::new("X".to_string(), 2));
        assert_eq!(
            stats.popular_trip,
            Tally::new(
                StationPair {
                    start: "A".to_string(),
                    end: "X".to_string()
                },
                1
            )
        );
    }

    #[test]
    fn all_blank_stations_are_missing_values_not_empty() {
        let ds = Dataset::new(OptionalColumns::none(), vec![trip("", ""), trip("", "")]);
        assert!(matches!(
            station_stats(&ds),
            Err(BikeshareError::MissingValues { .. })
        ));
    }

    #[test]
    fn duration_totals_and_means() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![
                TripRecord::new(at(1, 2, 8), 3600.0, "A", "B"),
                TripRecord::new(at(1, 2, 9), 1800.0, "A", "B"),
            ],
        );
        let stats = duration_stats(&ds);
        assert_eq!(stats.trips, 2);
        assert_eq!(stats.total_seconds, 5400.0);
        assert_eq!(stats.total_hours, 1.5);
        assert_eq!(stats.mean_seconds, Some(2700.0));
        assert_eq!(stats.mean_minutes, Some(45.0));
    }

    #[test]
    fn duration_on_empty_dataset_has_zero_total_and_no_mean() {
        let stats = duration_stats(&Dataset::new(OptionalColumns::none(), Vec::new()));
        assert_eq!(stats.total_seconds, 0.0);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.mean_seconds, None);
        assert_eq!(stats.mean_minutes, None);
    }

    #[test]
    fn user_types_ordered_by_count_and_blanks_skipped() {
        let ds = Dataset::new(
            OptionalColumns::none(),
            vec![
                trip("A", "B").with_user_type(Some("Customer".to_string())),
                trip("A", "B").with_user_type(Some("Subscriber".to_string())),
                trip("A", "B").with_user_type(Some("Subscriber".to_string())),
                trip("A", "B"),
            ],
        );
        let stats = user_stats(&ds);
        assert_eq!(
            stats.user_types,
            vec![
                Tally::new("Subscriber".to_string(), 2),
                Tally::new("Customer".to_string(), 1),
            ]
        );
        assert_eq!(stats.gender, GenderStats::NoData);
        assert_eq!(stats.birth_years, BirthYearStats::NoData);
    }

    #[test]
    fn gender_absent_on_every_record_reports_no_data() {
        let ds = Dataset::new(OptionalColumns::all(), vec![trip("A", "B"), trip("B", "A")]);
        assert_eq!(user_stats(&ds).gender, GenderStats::NoData);
    }

    #[test]
    fn gender_breakdown_ignores_blank_values() {
        let ds = Dataset::new(
            OptionalColumns::all(),
            vec![
                trip("A", "B").with_gender(Some("Female".to_string())),
                trip("A", "B").with_gender(Some("Male".to_string())),
                trip("A", "B").with_gender(Some("Male".to_string())),
                trip("A", "B"),
            ],
        );
        assert_eq!(
            user_stats(&ds).gender,
            GenderStats::Breakdown(vec![
                Tally::new("Male".to_string(), 2),
                Tally::new("Female".to_string(), 1),
            ])
        );
    }

    #[test]
    fn birth_year_summary_with_ascending_tie_break() {
        let years = [1991, 1990, 1991, 1990];
        let mut records: Vec<TripRecord> = years
            .iter()
            .map(|y| trip("A", "B").with_birth_year(Some(*y)))
            .collect();
        records.push(trip("A", "B"));
        let ds = Dataset::new(OptionalColumns::all(), records);

        assert_eq!(
            user_stats(&ds).birth_years,
            BirthYearStats::Summary {
                earliest: 1990,
                most_recent: 1991,
                most_common: Tally::new(1990, 2),
            }
        );
    }

    #[test]
    fn birth_year_column_missing_reports_no_data() {
        let mut ds = Dataset::new(
            OptionalColumns::all(),
            vec![trip("A", "B").with_birth_year(Some(1980))],
        );
        ds.columns.birth_year = false;
        assert_eq!(user_stats(&ds).birth_years, BirthYearStats::NoData);
    }
}
