//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"Start Time": "...", ...}, ...]`
//! - Newline-delimited JSON (NDJSON), one trip object per line
//!
//! Object keys use the same names as the CSV headers.

use std::fs;
use std::path::Path;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{Dataset, OptionalColumns};

use super::record::{Cell, TripColumn, build_record};

/// Ingest JSON into an in-memory [`Dataset`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> BikeshareResult<Dataset> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`Dataset`].
pub fn ingest_json_from_str(input: &str) -> BikeshareResult<Dataset> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BikeshareError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v)),
            _ => Err(BikeshareError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                BikeshareError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[serde_json::Value]) -> BikeshareResult<Dataset> {
    let mut records = Vec::with_capacity(values.len());
    let mut columns = OptionalColumns::none();

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| BikeshareError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        if let Some(col) = TripColumn::ALL
            .into_iter()
            .find(|c| c.is_required() && !obj.contains_key(c.header()))
        {
            return Err(BikeshareError::SchemaMismatch {
                message: format!("row {row_num} missing required field '{}'", col.header()),
            });
        }
        columns.gender |= obj.contains_key(TripColumn::Gender.header());
        columns.birth_year |= obj.contains_key(TripColumn::BirthYear.header());

        records.push(build_record(row_num, |col| {
            obj.get(col.header()).map(convert_json_value).unwrap_or(Cell::Missing)
        })?);
    }

    Ok(Dataset::new(columns, records))
}

fn convert_json_value(v: &serde_json::Value) -> Cell {
    match v {
        serde_json::Value::Null => Cell::Missing,
        serde_json::Value::String(s) => Cell::text(s),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Missing),
        },
        other => Cell::Text(other.to_string()),
    }
}
