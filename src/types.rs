//! Core data model types.
//!
//! Ingestion produces an in-memory [`Dataset`] of [`TripRecord`]s for one [`CityId`]. A
//! [`FilterSpec`] selects the city plus optional month and weekday predicates.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::error::FilterParseError;

/// A supported city, each backed by its own data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CityId {
    Chicago,
    NewYorkCity,
    Washington,
}

impl CityId {
    /// All supported cities in display order.
    pub const ALL: [CityId; 3] = [CityId::Chicago, CityId::NewYorkCity, CityId::Washington];

    /// Human-readable name ("New York City").
    pub fn name(self) -> &'static str {
        match self {
            CityId::Chicago => "Chicago",
            CityId::NewYorkCity => "New York City",
            CityId::Washington => "Washington",
        }
    }

    /// File stem of the city's default data source (`new_york_city` for `new_york_city.csv`).
    pub fn file_stem(self) -> &'static str {
        match self {
            CityId::Chicago => "chicago",
            CityId::NewYorkCity => "new_york_city",
            CityId::Washington => "washington",
        }
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CityId {
    type Err = FilterParseError;

    /// Case-insensitive; accepts "new york city" and "new_york_city".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', " ");
        match normalised.as_str() {
            "chicago" => Ok(CityId::Chicago),
            "new york city" => Ok(CityId::NewYorkCity),
            "washington" => Ok(CityId::Washington),
            _ => Err(FilterParseError {
                kind: "city",
                input: s.to_string(),
                expected: "Chicago, New York City, Washington",
            }),
        }
    }
}

/// A month that can be selected as a filter. Only January through June are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based month number (January = 1).
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day of the week derived from a trip's start time.
///
/// Serialized (and displayed) as the capitalized English name, e.g. `"Monday"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Case-insensitive lookup by full day name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Month predicate: everything, or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl FromStr for MonthFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .map(MonthFilter::Only)
            .ok_or_else(|| FilterParseError {
                kind: "month",
                input: s.to_string(),
                expected: "all, January, February, March, April, May, June",
            })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all months"),
            MonthFilter::Only(m) => write!(f, "{m}"),
        }
    }
}

/// Weekday predicate: everything, or a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DayFilter {
    #[default]
    All,
    Only(DayOfWeek),
}

impl FromStr for DayFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        DayOfWeek::from_name(s)
            .map(DayFilter::Only)
            .ok_or_else(|| FilterParseError {
                kind: "day",
                input: s.to_string(),
                expected: "all, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday",
            })
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all days"),
            DayFilter::Only(d) => write!(f, "{d}"),
        }
    }
}

/// The city plus month and weekday predicates selected for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub city: CityId,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(city: CityId, month: MonthFilter, day: DayFilter) -> Self {
        Self { city, month, day }
    }

    /// A spec that keeps every record of `city`.
    pub fn unfiltered(city: CityId) -> Self {
        Self::new(city, MonthFilter::All, DayFilter::All)
    }

    /// Returns `true` if `record` passes both the month and the day predicate.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Only(m) => record.month == m.number(),
        };
        let day_ok = match self.day {
            DayFilter::All => true,
            DayFilter::Only(d) => record.day_of_week.name().eq_ignore_ascii_case(d.name()),
        };
        month_ok && day_ok
    }
}

/// One bike-share trip.
///
/// `month`, `day_of_week` and `hour` are derived from `start_time` when the record is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Trip length in seconds, as read from the source.
    pub trip_duration_seconds: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    /// 1..=12
    pub month: u32,
    pub day_of_week: DayOfWeek,
    /// 0..=23
    pub hour: u32,
}

impl TripRecord {
    /// Create a record with the required fields; optional fields start absent.
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration_seconds: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            trip_duration_seconds,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday().into(),
            hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }
}

/// Which optional columns the source exposed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OptionalColumns {
    pub gender: bool,
    pub birth_year: bool,
}

impl OptionalColumns {
    /// Both optional columns present (Chicago, New York City).
    pub fn all() -> Self {
        Self {
            gender: true,
            birth_year: true,
        }
    }

    /// Neither optional column present (Washington).
    pub fn none() -> Self {
        Self::default()
    }
}

/// In-memory, ordered collection of trips.
///
/// Record order is the source row order and is preserved by every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// City the records were loaded for, if known.
    pub city: Option<CityId>,
    /// Optional columns present in the source.
    pub columns: OptionalColumns,
    /// Records in source order.
    pub records: Vec<TripRecord>,
}

impl Dataset {
    /// Create a dataset from its optional-column flags and records.
    pub fn new(columns: OptionalColumns, records: Vec<TripRecord>) -> Self {
        Self {
            city: None,
            columns,
            records,
        }
    }

    /// Tag the dataset with the city it was loaded for.
    pub fn with_city(mut self, city: CityId) -> Self {
        self.city = Some(city);
        self
    }

    /// Number of records in the dataset.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    /// Create a new dataset containing only records that match `predicate`.
    ///
    /// The returned dataset keeps the city and column flags.
    pub fn filter_records<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&TripRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self {
            city: self.city,
            columns: self.columns,
            records,
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
