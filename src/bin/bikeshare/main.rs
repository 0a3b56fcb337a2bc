mod bootstrap;
mod render;
mod session;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use bikeshare_explorer::ingestion::DataSources;
use bikeshare_explorer::types::{CityId, DayFilter, FilterSpec, MonthFilter};
use clap::Parser;

use session::{OutputMode, Session};

/// Explore US bike-share trip data: popular times, stations, trip durations and riders.
///
/// Without `--city` the session is interactive: it asks for city, month and day, prints the
/// statistics, offers raw rows five at a time, and offers to restart.
#[derive(Debug, Parser)]
#[command(name = "bikeshare", version, about)]
struct Cli {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    /// (any of them may also be .json, .ndjson or .parquet).
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// City to analyze (Chicago, "New York City", Washington). Omit for an interactive session.
    #[arg(long)]
    city: Option<CityId>,

    /// Month filter: all, or January through June.
    #[arg(long, default_value = "all")]
    month: MonthFilter,

    /// Day filter: all, or Monday through Sunday.
    #[arg(long, default_value = "all")]
    day: DayFilter,

    /// Print the statistics (and raw pages) as JSON.
    #[arg(long)]
    json: bool,

    /// Number of five-row pages of raw trips to print after the statistics.
    #[arg(long, default_value_t = 0)]
    raw: usize,

    /// Log filter directive for stderr logging.
    #[arg(long, env = "BIKESHARE_LOG", default_value = "warn")]
    log_level: String,

    /// Append ingestion outcomes to this file.
    #[arg(long)]
    audit_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bootstrap::setup_logging(&cli.log_level);
    tracing::debug!(?cli, "starting");

    let sources = DataSources::new(&cli.data_dir);
    let options = bootstrap::ingestion_options(cli.audit_log.as_deref());
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout().lock(), sources, options);

    match cli.city {
        Some(city) => session.run_once(
            FilterSpec::new(city, cli.month, cli.day),
            OutputMode {
                json: cli.json,
                raw_pages: cli.raw,
            },
        ),
        None => session.run_interactive(),
    }
}
