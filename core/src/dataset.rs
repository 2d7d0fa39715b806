//! In-memory columnar dataset model
//!
//! A [`Dataset`] is an ordered sequence of named, typed columns of equal
//! length. Cells are `Option<Value>` where `None` is the null indicator.
//! Datasets are immutable once constructed - the diff engine and profiler
//! never mutate their inputs.

use crate::error::{AlterisError, Result};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a column, resolved once at ingestion.
/// "Unknown" is not a valid stored type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    String,
    Date,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Boolean => "Boolean",
            ColumnType::String => "String",
            ColumnType::Date => "Date",
        };
        write!(f, "{name}")
    }
}

/// A single typed cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Date(NaiveDate),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::String(_) => ColumnType::String,
            Value::Date(_) => ColumnType::Date,
        }
    }

    /// Cell equality as the diff engine sees it: floats compare by bit
    /// pattern, so NaN equals NaN and a row that did not change is never
    /// reported as modified. Consistent with the canonical encoding used
    /// for key grouping and distinct counting.
    pub fn canonical_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Canonical byte encoding used for key grouping, distinct counting and
    /// content fingerprints. Type-tagged and length-prefixed so distinct
    /// values can never encode to the same bytes.
    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Value::Integer(v) => {
                out.push(b'i');
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Float(v) => {
                out.push(b'f');
                out.extend_from_slice(&v.to_bits().to_le_bytes());
            }
            Value::Boolean(v) => {
                out.push(b'b');
                out.push(*v as u8);
            }
            Value::String(v) => {
                out.push(b's');
                out.extend_from_slice(&(v.len() as u64).to_le_bytes());
                out.extend_from_slice(v.as_bytes());
            }
            Value::Date(v) => {
                out.push(b'd');
                out.extend_from_slice(&v.num_days_from_ce().to_le_bytes());
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

/// A named, homogeneously typed column with per-cell null indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Option<Value>>,
}

impl Column {
    /// Create a column, validating that every non-null cell matches the
    /// declared type.
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<Option<Value>>,
    ) -> Result<Self> {
        let name = name.into();
        for (row, cell) in values.iter().enumerate() {
            if let Some(value) = cell {
                if value.column_type() != column_type {
                    return Err(AlterisError::invalid_input(format!(
                        "column '{}' is declared {} but row {} holds a {} value",
                        name,
                        column_type,
                        row,
                        value.column_type()
                    )));
                }
            }
        }
        Ok(Self {
            name,
            column_type,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Copy of this column restricted to the given rows, in the given order.
    pub(crate) fn project_rows(&self, rows: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            column_type: self.column_type,
            values: rows.iter().map(|&r| self.values[r].clone()).collect(),
        }
    }

    /// Same values under a different name (used for join disambiguation).
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Column {
        Column {
            name: name.into(),
            column_type: self.column_type,
            values: self.values.clone(),
        }
    }
}

/// Mapping from column name to declared element type, in column order.
/// Derived from a [`Dataset`], not independently persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    columns: IndexMap<String, ColumnType>,
}

impl Schema {
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Ordered collection of uniquely named columns of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
}

impl Dataset {
    /// Build a dataset from columns, validating name uniqueness and equal
    /// lengths. Column order is preserved.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(columns.len());
        let mut row_count: Option<usize> = None;
        for column in columns {
            match row_count {
                None => row_count = Some(column.len()),
                Some(expected) if expected != column.len() => {
                    return Err(AlterisError::invalid_input(format!(
                        "column '{}' has {} rows, expected {}",
                        column.name(),
                        column.len(),
                        expected
                    )));
                }
                Some(_) => {}
            }
            let name = column.name().to_string();
            if map.insert(name.clone(), column).is_some() {
                return Err(AlterisError::invalid_input(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self { columns: map })
    }

    /// Dataset with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.values().next().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Derive the schema (name -> declared type, in column order)
    pub fn schema(&self) -> Schema {
        Schema {
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.column_type()))
                .collect(),
        }
    }

    /// New dataset with the same column layout restricted to the given rows,
    /// in the given order. Row indices may repeat.
    pub fn project_rows(&self, rows: &[usize]) -> Dataset {
        Dataset {
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.project_rows(rows)))
                .collect(),
        }
    }

    /// Content fingerprint over schema and cell data. Identical datasets
    /// always produce identical fingerprints; used as a memoization key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.columns.len() as u64).to_le_bytes());
        hasher.update(&(self.row_count() as u64).to_le_bytes());
        let mut buf = Vec::new();
        for column in self.columns.values() {
            hasher.update(&(column.name().len() as u64).to_le_bytes());
            hasher.update(column.name().as_bytes());
            hasher.update(column.column_type().to_string().as_bytes());
            for cell in column.values() {
                buf.clear();
                match cell {
                    Some(value) => value.write_canonical(&mut buf),
                    None => buf.push(b'n'),
                }
                hasher.update(&buf);
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}
