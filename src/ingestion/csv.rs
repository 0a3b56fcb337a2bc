//! CSV ingestion implementation.

use std::path::Path;

use crate::error::BikeshareResult;
use crate::types::Dataset;

use super::record::{ColumnLayout, Cell, build_record};

/// Ingest a CSV file into an in-memory [`Dataset`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all required trip columns (order can differ, extra columns are ignored).
/// - `Gender` and `Birth Year` may be missing entirely; the dataset's column flags record this.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> BikeshareResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> BikeshareResult<Dataset> {
    let headers = rdr.headers()?.clone();
    let layout = ColumnLayout::resolve(headers.iter())?;

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let row = result?;

        records.push(build_record(user_row, |col| {
            layout
                .position(col)
                .and_then(|idx| row.get(idx))
                .map(Cell::text)
                .unwrap_or(Cell::Missing)
        })?);
    }

    Ok(Dataset::new(layout.optional_columns(), records))
}
