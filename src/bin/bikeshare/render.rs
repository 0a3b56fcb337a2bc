//! Plain-text rendering of statistic results.

use std::io::{self, Write};

use bikeshare_explorer::BikeshareResult;
use bikeshare_explorer::processing::{
    BirthYearStats, DurationStats, GenderStats, StationStats, TimeStats, UserStats,
};
use bikeshare_explorer::types::{Month, TripRecord};

pub const RULE: &str = "----------------------------------------";

fn month_label(number: u32) -> String {
    match Month::ALL.iter().find(|m| m.number() == number) {
        Some(m) => m.name().to_string(),
        None => format!("month {number}"),
    }
}

pub fn time(out: &mut impl Write, stats: &BikeshareResult<TimeStats>) -> io::Result<()> {
    writeln!(out, "\nMost frequent times of travel\n")?;
    match stats {
        Ok(s) => {
            writeln!(
                out,
                "  month: {} ({} trips)",
                month_label(s.popular_month.value),
                s.popular_month.count
            )?;
            writeln!(out, "  day:   {} ({} trips)", s.popular_day.value, s.popular_day.count)?;
            writeln!(
                out,
                "  hour:  {:02}:00 ({} trips)",
                s.popular_hour.value, s.popular_hour.count
            )
        }
        Err(e) => writeln!(out, "  {e}"),
    }
}

pub fn stations(out: &mut impl Write, stats: &BikeshareResult<StationStats>) -> io::Result<()> {
    writeln!(out, "\nMost popular stations and trip\n")?;
    match stats {
        Ok(s) => {
            writeln!(
                out,
                "  start station: {} ({} trips)",
                s.popular_start.value, s.popular_start.count
            )?;
            writeln!(
                out,
                "  end station:   {} ({} trips)",
                s.popular_end.value, s.popular_end.count
            )?;
            writeln!(
                out,
                "  trip:          {} -> {} ({} trips)",
                s.popular_trip.value.start, s.popular_trip.value.end, s.popular_trip.count
            )
        }
        Err(e) => writeln!(out, "  {e}"),
    }
}

pub fn durations(out: &mut impl Write, stats: &DurationStats) -> io::Result<()> {
    writeln!(out, "\nTrip duration\n")?;
    writeln!(out, "  total travel time: {:.2} hours", stats.total_hours)?;
    match stats.mean_minutes {
        Some(m) => writeln!(out, "  mean travel time:  {m:.2} minutes"),
        None => writeln!(out, "  mean travel time:  no data"),
    }
}

pub fn users(out: &mut impl Write, stats: &UserStats) -> io::Result<()> {
    writeln!(out, "\nUser stats\n")?;
    if stats.user_types.is_empty() {
        writeln!(out, "  no user type data")?;
    }
    for t in &stats.user_types {
        writeln!(out, "  {:<12} {}", t.value, t.count)?;
    }

    match &stats.gender {
        GenderStats::Breakdown(counts) => {
            writeln!(out, "\n  gender:")?;
            for t in counts {
                writeln!(out, "  {:<12} {}", t.value, t.count)?;
            }
        }
        GenderStats::NoData => writeln!(out, "\n  no gender data")?,
    }

    match &stats.birth_years {
        BirthYearStats::Summary {
            earliest,
            most_recent,
            most_common,
        } => writeln!(
            out,
            "\n  oldest riders born in {earliest}, youngest in {most_recent}, most common birth year {}",
            most_common.value
        ),
        BirthYearStats::NoData => writeln!(out, "\n  no birth year data"),
    }
}

pub fn records(out: &mut impl Write, offset: usize, records: &[TripRecord]) -> io::Result<()> {
    for (i, r) in records.iter().enumerate() {
        writeln!(
            out,
            "#{:<6} {}  {:>8.0}s  {} -> {}  {}  {}  {}",
            offset + i + 1,
            r.start_time,
            r.trip_duration_seconds,
            r.start_station,
            r.end_station,
            r.user_type.as_deref().unwrap_or("-"),
            r.gender.as_deref().unwrap_or("-"),
            r.birth_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
        )?;
    }
    Ok(())
}
