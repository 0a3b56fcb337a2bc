//! Prompting, reporting and the restart loop.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use bikeshare_explorer::FilterParseError;
use bikeshare_explorer::ingestion::{DataSources, IngestionOptions, load_city};
use bikeshare_explorer::processing::{
    apply, duration_stats, next_offset, page, station_stats, summarize, time_stats, user_stats,
};
use bikeshare_explorer::types::{CityId, Dataset, DayFilter, FilterSpec, MonthFilter};

use crate::render;

/// How a one-shot run prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMode {
    pub json: bool,
    /// Pages of raw records printed after the statistics.
    pub raw_pages: usize,
}

pub struct Session<R, W> {
    input: R,
    out: W,
    sources: DataSources,
    options: IngestionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, sources: DataSources, options: IngestionOptions) -> Self {
        Self {
            input,
            out,
            sources,
            options,
        }
    }

    /// Load, filter and report once for a spec given on the command line.
    pub fn run_once(&mut self, spec: FilterSpec, mode: OutputMode) -> Result<()> {
        let dataset = load_city(spec.city, &self.sources, &self.options)
            .with_context(|| format!("loading trip data for {}", spec.city))?;
        let filtered = apply(&dataset, &spec);

        if mode.json {
            let summary = summarize(&filtered);
            serde_json::to_writer_pretty(&mut self.out, &summary)?;
            writeln!(self.out)?;
        } else {
            self.report(&spec, &filtered)?;
        }

        let mut offset = 0;
        for _ in 0..mode.raw_pages {
            let rows = page(&filtered, offset);
            if rows.is_empty() {
                break;
            }
            if mode.json {
                serde_json::to_writer(&mut self.out, rows)?;
                writeln!(self.out)?;
            } else {
                render::records(&mut self.out, offset, rows)?;
            }
            offset = next_offset(offset);
        }
        Ok(())
    }

    /// Prompt for filters, report, offer raw rows, and repeat until the user declines a restart.
    ///
    /// End of input ends the session quietly.
    pub fn run_interactive(&mut self) -> Result<()> {
        writeln!(self.out, "Hello! Let's explore some US bikeshare data!")?;
        loop {
            let Some(spec) = self.prompt_filters()? else {
                return Ok(());
            };

            match load_city(spec.city, &self.sources, &self.options) {
                Ok(dataset) => {
                    let filtered = apply(&dataset, &spec);
                    self.report(&spec, &filtered)?;
                    self.browse(&filtered)?;
                }
                Err(e) => {
                    tracing::warn!(city = spec.city.name(), error = %e, "load failed");
                    writeln!(self.out, "\nCould not load data for {}: {e}", spec.city)?;
                }
            }

            if !self.confirm("\nWould you like to restart? Enter yes or no.")? {
                return Ok(());
            }
        }
    }

    fn prompt_filters(&mut self) -> Result<Option<FilterSpec>> {
        let Some(city) = self.prompt::<CityId>("Give city name (Chicago, New York City, or Washington):")? else {
            return Ok(None);
        };
        let Some(month) = self.prompt::<MonthFilter>("Give the month (January through June) or type all:")? else {
            return Ok(None);
        };
        let Some(day) = self.prompt::<DayFilter>("Give the day of the week or type all:")? else {
            return Ok(None);
        };
        writeln!(self.out, "{}", render::RULE)?;
        Ok(Some(FilterSpec::new(city, month, day)))
    }

    /// Ask `question` until the answer parses. `None` on end of input.
    fn prompt<T>(&mut self, question: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = FilterParseError>,
    {
        loop {
            let Some(line) = self.ask(question)? else {
                return Ok(None);
            };
            match line.parse::<T>() {
                Ok(v) => return Ok(Some(v)),
                Err(e) => writeln!(self.out, "Sorry, that didn't work: {e}")?,
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.out, "{question}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .ask(question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }

    fn report(&mut self, spec: &FilterSpec, dataset: &Dataset) -> Result<()> {
        writeln!(
            self.out,
            "\n{}: {} trips ({}, {})",
            spec.city,
            dataset.row_count(),
            spec.month,
            spec.day
        )?;

        let started = Instant::now();
        render::time(&mut self.out, &time_stats(dataset))?;
        self.elapsed(started)?;

        let started = Instant::now();
        render::stations(&mut self.out, &station_stats(dataset))?;
        self.elapsed(started)?;

        let started = Instant::now();
        render::durations(&mut self.out, &duration_stats(dataset))?;
        self.elapsed(started)?;

        let started = Instant::now();
        render::users(&mut self.out, &user_stats(dataset))?;
        self.elapsed(started)?;
        Ok(())
    }

    fn elapsed(&mut self, started: Instant) -> Result<()> {
        writeln!(self.out, "\nThis took {:.6} seconds.", started.elapsed().as_secs_f64())?;
        writeln!(self.out, "{}", render::RULE)?;
        Ok(())
    }

    fn browse(&mut self, dataset: &Dataset) -> Result<()> {
        let mut offset = 0;
        while self.confirm("\nWould you like to see five rows of the data? Enter yes or no.")? {
            let rows = page(dataset, offset);
            if rows.is_empty() {
                writeln!(self.out, "No more rows.")?;
                break;
            }
            render::records(&mut self.out, offset, rows)?;
            offset = next_offset(offset);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-01-02 08:00:00,2017-01-02 08:05:00,300,A,B,Subscriber
1,2017-01-03 09:00:00,2017-01-03 09:10:00,600,A,C,Customer
";

    fn sources() -> (tempfile::TempDir, DataSources) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("washington.csv"), CSV).unwrap();
        let sources = DataSources::new(dir.path());
        (dir, sources)
    }

    fn run(input: &str) -> String {
        let (_dir, sources) = sources();
        let mut out = Vec::new();
        let mut session = Session::new(Cursor::new(input.to_string()), &mut out, sources, IngestionOptions::default());
        session.run_interactive().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn reprompts_on_invalid_city_and_reports() {
        let out = run("boston\nwashington\njanuary\nall\nno\nno\n");
        assert!(out.contains("unrecognised city 'boston'"));
        assert!(out.contains("Washington: 2 trips"));
        assert!(out.contains("start station: A (2 trips)"));
        assert!(out.contains("no gender data"));
        assert!(out.contains("no birth year data"));
    }

    #[test]
    fn pages_raw_rows_until_exhausted() {
        let out = run("washington\nall\nall\nyes\nyes\nno\n");
        assert!(out.contains("#1 "));
        assert!(out.contains("#2 "));
        assert!(out.contains("No more rows."));
    }

    #[test]
    fn missing_city_source_is_reported_and_session_continues() {
        let out = run("chicago\nall\nall\nyes\nwashington\nall\nall\nno\nno\n");
        assert!(out.contains("Could not load data for Chicago"));
        assert!(out.contains("Washington: 2 trips"));
    }

    #[test]
    fn empty_filter_reports_no_data_per_group() {
        let out = run("washington\njune\nall\nno\nno\n");
        assert!(out.contains("Washington: 0 trips"));
        assert!(out.contains("cannot compute time-of-travel statistics"));
        assert!(out.contains("cannot compute station statistics"));
        assert!(out.contains("mean travel time:  no data"));
    }

    #[test]
    fn one_shot_json_output() {
        let (_dir, sources) = sources();
        let mut out = Vec::new();
        let mut session = Session::new(Cursor::new(String::new()), &mut out, sources, IngestionOptions::default());
        session
            .run_once(
                FilterSpec::unfiltered(CityId::Washington),
                OutputMode {
                    json: true,
                    raw_pages: 1,
                },
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"trips\": 2"));
        assert!(text.contains("\"start_station\":\"A\""));
    }
}
