//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::DateTime;
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{Dataset, OptionalColumns};

use super::record::{Cell, TripColumn, build_record};

/// Ingest a Parquet file into an in-memory [`Dataset`].
///
/// Notes:
/// - Validates that all required trip columns exist as Parquet leaf columns (by column path string)
/// - Timestamps may be stored as UTF-8 strings or as `TIMESTAMP(MILLIS|MICROS)` values
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> BikeshareResult<Dataset> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let available_columns = parquet_leaf_column_paths(&reader);
    for col in TripColumn::ALL.into_iter().filter(|c| c.is_required()) {
        if !available_columns.contains(col.header()) {
            return Err(BikeshareError::SchemaMismatch {
                message: format!("missing required column '{}'", col.header()),
            });
        }
    }
    let columns = OptionalColumns {
        gender: available_columns.contains(TripColumn::Gender.header()),
        birth_year: available_columns.contains(TripColumn::BirthYear.header()),
    };

    let mut records = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        // Build a name->Field map for lookup.
        let mut map: HashMap<&str, &Field> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            map.insert(name.as_str(), field);
        }

        records.push(build_record(row_num, |col| {
            map.get(col.header())
                .map(|f| convert_parquet_field(f))
                .unwrap_or(Cell::Missing)
        })?);
    }

    Ok(Dataset::new(columns, records))
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(f: &Field) -> Cell {
    match f {
        Field::Null => Cell::Missing,
        Field::Str(s) => Cell::text(s),
        Field::Byte(v) => Cell::Int(i64::from(*v)),
        Field::Short(v) => Cell::Int(i64::from(*v)),
        Field::Int(v) => Cell::Int(i64::from(*v)),
        Field::Long(v) => Cell::Int(*v),
        Field::UByte(v) => Cell::Int(i64::from(*v)),
        Field::UShort(v) => Cell::Int(i64::from(*v)),
        Field::UInt(v) => Cell::Int(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(v) => Cell::Int(v),
            Err(_) => Cell::Text(v.to_string()),
        },
        Field::Float(v) => Cell::Float(f64::from(*v)),
        Field::Double(v) => Cell::Float(*v),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map(|dt| Cell::Timestamp(dt.naive_utc()))
            .unwrap_or_else(|| Cell::Text(ms.to_string())),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map(|dt| Cell::Timestamp(dt.naive_utc()))
            .unwrap_or_else(|| Cell::Text(us.to_string())),
        // Anything else surfaces as text so the column's parser reports it.
        other => Cell::Text(other.to_string()),
    }
}
