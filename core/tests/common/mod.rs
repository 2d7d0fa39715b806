//! Shared fixtures for integration tests
#![allow(dead_code)]

use alteris_core::dataset::{Column, ColumnType, Dataset, Value};

pub fn int_col(name: &str, values: &[Option<i64>]) -> Column {
    Column::new(
        name,
        ColumnType::Integer,
        values.iter().map(|v| v.map(Value::Integer)).collect(),
    )
    .unwrap()
}

pub fn float_col(name: &str, values: &[Option<f64>]) -> Column {
    Column::new(
        name,
        ColumnType::Float,
        values.iter().map(|v| v.map(Value::Float)).collect(),
    )
    .unwrap()
}

pub fn str_col(name: &str, values: &[Option<&str>]) -> Column {
    Column::new(
        name,
        ColumnType::String,
        values
            .iter()
            .map(|v| v.map(|s| Value::String(s.to_string())))
            .collect(),
    )
    .unwrap()
}

pub fn dataset(columns: Vec<Column>) -> Dataset {
    Dataset::new(columns).unwrap()
}

/// Two-column (id, val) dataset, the workhorse shape of most scenarios
pub fn id_val(rows: &[(i64, Option<i64>)]) -> Dataset {
    let ids: Vec<Option<i64>> = rows.iter().map(|&(id, _)| Some(id)).collect();
    let vals: Vec<Option<i64>> = rows.iter().map(|&(_, v)| v).collect();
    dataset(vec![int_col("id", &ids), int_col("val", &vals)])
}

pub fn cell(ds: &Dataset, column: &str, row: usize) -> Option<Value> {
    ds.column(column).unwrap().values()[row].clone()
}

pub fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
