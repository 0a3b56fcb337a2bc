//! Source columns and the conversion of one source row into a [`TripRecord`].
//!
//! Every format reads its cells into [`Cell`]s and hands them to [`build_record`], so the
//! parsing rules (timestamp shapes, numeric coercions, empty-cell handling) live in one place.

use chrono::NaiveDateTime;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{OptionalColumns, TripRecord};

/// A column the loader knows about, addressed by its header name in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripColumn {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
}

impl TripColumn {
    pub const ALL: [TripColumn; 8] = [
        TripColumn::StartTime,
        TripColumn::EndTime,
        TripColumn::TripDuration,
        TripColumn::StartStation,
        TripColumn::EndStation,
        TripColumn::UserType,
        TripColumn::Gender,
        TripColumn::BirthYear,
    ];

    /// Header name used by the source files.
    pub fn header(self) -> &'static str {
        match self {
            TripColumn::StartTime => "Start Time",
            TripColumn::EndTime => "End Time",
            TripColumn::TripDuration => "Trip Duration",
            TripColumn::StartStation => "Start Station",
            TripColumn::EndStation => "End Station",
            TripColumn::UserType => "User Type",
            TripColumn::Gender => "Gender",
            TripColumn::BirthYear => "Birth Year",
        }
    }

    /// Whether a source without this column is rejected.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            TripColumn::EndTime | TripColumn::Gender | TripColumn::BirthYear
        )
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Position of each known column in a source's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    positions: [Option<usize>; 8],
}

impl ColumnLayout {
    /// Map known columns to header positions.
    ///
    /// Unknown headers are ignored and column order is free. Fails with
    /// [`BikeshareError::SchemaMismatch`] if a required column is missing.
    pub fn resolve<'a, I>(headers: I) -> BikeshareResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let mut positions = [None; 8];
        for col in TripColumn::ALL {
            positions[col.slot()] = headers.iter().position(|h| *h == col.header());
            if positions[col.slot()].is_none() && col.is_required() {
                return Err(BikeshareError::SchemaMismatch {
                    message: format!(
                        "missing required column '{}'. headers={headers:?}",
                        col.header()
                    ),
                });
            }
        }
        Ok(Self { positions })
    }

    /// Source position of `column`, if the source has it.
    pub fn position(&self, column: TripColumn) -> Option<usize> {
        self.positions[column.slot()]
    }

    pub fn optional_columns(&self) -> OptionalColumns {
        OptionalColumns {
            gender: self.position(TripColumn::Gender).is_some(),
            birth_year: self.position(TripColumn::BirthYear).is_some(),
        }
    }
}

/// A raw cell value as read by a format reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Absent column, empty string or explicit null.
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Text cell, mapping blank strings to [`Cell::Missing`].
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_owned())
        }
    }

    fn raw(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Timestamp(ts) => ts.to_string(),
        }
    }
}

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a timestamp in one of the accepted shapes.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| "expected timestamp like 'YYYY-MM-DD HH:MM:SS'".to_string())
}

/// Build one [`TripRecord`] from a row, pulling each column's cell through `cell_for`.
///
/// `row` is the user-facing row number reported in errors.
pub fn build_record<F>(row: usize, mut cell_for: F) -> BikeshareResult<TripRecord>
where
    F: FnMut(TripColumn) -> Cell,
{
    let start_time = match cell_for(TripColumn::StartTime) {
        Cell::Timestamp(ts) => ts,
        Cell::Text(s) => parse_timestamp(&s).map_err(|message| BikeshareError::MalformedRecord {
            row,
            raw: s.clone(),
            message,
        })?,
        Cell::Missing => {
            return Err(BikeshareError::MalformedRecord {
                row,
                raw: String::new(),
                message: "start time is missing".to_string(),
            });
        }
        other => {
            return Err(BikeshareError::MalformedRecord {
                row,
                raw: other.raw(),
                message: "start time is not a timestamp".to_string(),
            });
        }
    };

    let end_time = optional_timestamp(row, cell_for(TripColumn::EndTime));
    let duration = required_duration(row, cell_for(TripColumn::TripDuration))?;
    let start_station = station_text(cell_for(TripColumn::StartStation));
    let end_station = station_text(cell_for(TripColumn::EndStation));
    let user_type = optional_text(cell_for(TripColumn::UserType));
    let gender = optional_text(cell_for(TripColumn::Gender));
    let birth_year = optional_year(row, cell_for(TripColumn::BirthYear))?;

    Ok(TripRecord::new(start_time, duration, start_station, end_station)
        .with_end_time(end_time)
        .with_user_type(user_type)
        .with_gender(gender)
        .with_birth_year(birth_year))
}

fn parse_error(row: usize, column: TripColumn, cell: &Cell, message: impl Into<String>) -> BikeshareError {
    BikeshareError::ParseError {
        row,
        column: column.header().to_string(),
        raw: cell.raw(),
        message: message.into(),
    }
}

/// End time is informational only, so an unreadable value is dropped instead of failing the load.
fn optional_timestamp(row: usize, cell: Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Missing => None,
        Cell::Timestamp(ts) => Some(ts),
        Cell::Text(ref s) => match parse_timestamp(s) {
            Ok(ts) => Some(ts),
            Err(message) => {
                tracing::debug!(row, raw = %s, %message, "ignoring unparseable end time");
                None
            }
        },
        ref other => {
            tracing::debug!(row, raw = %other.raw(), "ignoring non-timestamp end time");
            None
        }
    }
}

fn required_duration(row: usize, cell: Cell) -> BikeshareResult<f64> {
    let col = TripColumn::TripDuration;
    let seconds = match cell {
        Cell::Int(v) => v as f64,
        Cell::Float(v) => v,
        Cell::Text(ref s) => s
            .parse::<f64>()
            .map_err(|e| parse_error(row, col, &cell, e.to_string()))?,
        Cell::Missing => return Err(parse_error(row, col, &cell, "trip duration is missing")),
        Cell::Timestamp(_) => return Err(parse_error(row, col, &cell, "expected number of seconds")),
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(parse_error(row, col, &cell, "trip duration must be a non-negative number"));
    }
    Ok(seconds)
}

/// Station name; a blank cell becomes the empty string and is left out of station counts.
fn station_text(cell: Cell) -> String {
    optional_text(cell).unwrap_or_default()
}

fn optional_text(cell: Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => Some(s),
        Cell::Int(v) => Some(v.to_string()),
        Cell::Float(v) => Some(v.to_string()),
        Cell::Timestamp(ts) => Some(ts.to_string()),
        Cell::Missing => None,
    }
}

fn optional_year(row: usize, cell: Cell) -> BikeshareResult<Option<i32>> {
    let col = TripColumn::BirthYear;
    let value = match cell {
        Cell::Missing => return Ok(None),
        Cell::Int(v) => v as f64,
        Cell::Float(v) => v,
        Cell::Text(ref s) => s
            .parse::<f64>()
            .map_err(|e| parse_error(row, col, &cell, e.to_string()))?,
        Cell::Timestamp(_) => return Err(parse_error(row, col, &cell, "expected year")),
    };
    // Sources store years as floats ("1992.0").
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(parse_error(row, col, &cell, "expected a whole year"));
    }
    Ok(Some(value as i32))
}
