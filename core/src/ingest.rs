//! Dataset ingestion boundary
//!
//! Materializes CSV files into [`Dataset`]s with whole-column type
//! inference. The core engine never parses raw bytes itself; everything
//! downstream consumes the typed dataset produced here.

use crate::dataset::{Column, ColumnType, Dataset, Value};
use crate::error::{AlterisError, Result};
use chrono::NaiveDate;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load a dataset from a file, dispatching on extension.
///
/// Unsupported extensions are reported as `UnsupportedFormat` so the caller
/// can recover at the boundary; that file simply yields no dataset.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some(ext) => Err(AlterisError::unsupported_format(ext)),
        None => Err(AlterisError::unsupported_format("<none>")),
    }
}

/// Load a CSV file with header row into a typed dataset.
///
/// Types are inferred per column over all rows: Integer, then Float, then
/// Boolean, then Date (%Y-%m-%d), falling back to String. Empty cells are
/// nulls; an all-null column resolves to String (an "unknown" type is never
/// stored).
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| AlterisError::load_error(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AlterisError::load_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AlterisError::load_error(path, e))?;
        if record.len() != headers.len() {
            return Err(AlterisError::load_error(
                path,
                format!(
                    "row {} has {} fields, expected {}",
                    records.len() + 1,
                    record.len(),
                    headers.len()
                ),
            ));
        }
        records.push(record);
    }

    log::debug!(
        "loaded {} rows x {} columns from {}",
        records.len(),
        headers.len(),
        path.display()
    );

    let mut columns = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        let cells: Vec<&str> = records.iter().map(|r| &r[idx]).collect();
        let column_type = infer_column_type(&cells);
        let values = cells
            .iter()
            .map(|raw| parse_cell(raw, column_type, path))
            .collect::<Result<Vec<_>>>()?;
        columns.push(Column::new(name, column_type, values)?);
    }

    Dataset::new(columns)
}

/// Infer the narrowest type every non-empty cell of a column satisfies
fn infer_column_type(cells: &[&str]) -> ColumnType {
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut all_date = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        any = true;
        all_int &= cell.parse::<i64>().is_ok();
        all_float &= cell.parse::<f64>().is_ok();
        all_bool &= cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false");
        all_date &= NaiveDate::parse_from_str(cell, DATE_FORMAT).is_ok();
    }

    if !any {
        return ColumnType::String;
    }
    if all_int {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else if all_bool {
        ColumnType::Boolean
    } else if all_date {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}

fn parse_cell(raw: &str, column_type: ColumnType, path: &Path) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = match column_type {
        ColumnType::Integer => trimmed.parse::<i64>().map(Value::Integer).ok(),
        ColumnType::Float => trimmed.parse::<f64>().map(Value::Float).ok(),
        ColumnType::Boolean => Some(Value::Boolean(trimmed.eq_ignore_ascii_case("true"))),
        ColumnType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Value::Date)
            .ok(),
        ColumnType::String => Some(Value::String(raw.to_string())),
    };
    value.map(Some).ok_or_else(|| {
        AlterisError::load_error(path, format!("cannot parse '{raw}' as {column_type}"))
    })
}
