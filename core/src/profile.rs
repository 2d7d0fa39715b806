//! Per-column statistical profiling for spotting distributional drift
//!
//! Profiles one column's values from each dataset version over a fixed
//! metric set. Stored metric values are unrounded; 2-decimal rounding
//! happens only at display time.

use crate::dataset::{Column, Value};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// The fixed metric set computed for every profiled column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Mean,
    StdDev,
    Min,
    Max,
    NullCount,
    DistinctCount,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Mean,
        Metric::StdDev,
        Metric::Min,
        Metric::Max,
        Metric::NullCount,
        Metric::DistinctCount,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Metric::Mean => "Mean",
            Metric::StdDev => "Std Dev",
            Metric::Min => "Min",
            Metric::Max => "Max",
            Metric::NullCount => "Nulls",
            Metric::DistinctCount => "Distinct Values",
        };
        write!(f, "{label}")
    }
}

/// A single metric value for one side of the comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Count(usize),
    /// Numeric metric requested on a non-numeric column, or not enough data
    NotApplicable,
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // display precision is fixed at 2 decimal places
            MetricValue::Number(v) => write!(f, "{v:.2}"),
            MetricValue::Text(v) => write!(f, "{v}"),
            MetricValue::Count(v) => write!(f, "{v}"),
            MetricValue::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// One metric with its base-side and current-side values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEntry {
    pub metric: Metric,
    pub base: MetricValue,
    pub current: MetricValue,
}

/// Summary statistics for one column across two dataset versions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub entries: Vec<ProfileEntry>,
}

impl ColumnProfile {
    pub fn entry(&self, metric: Metric) -> Option<&ProfileEntry> {
        self.entries.iter().find(|e| e.metric == metric)
    }
}

/// Profile a single column's values from each dataset version.
///
/// The caller ensures both columns carry the same logical column (pulled by
/// name from each dataset). Mean and standard deviation are computed only
/// when both sides are numeric, so a retyped column profiles consistently.
pub fn profile_column(base: &Column, current: &Column) -> ColumnProfile {
    let numeric = base.column_type().is_numeric() && current.column_type().is_numeric();

    let entries = Metric::ALL
        .iter()
        .map(|&metric| ProfileEntry {
            metric,
            base: metric_value(base, metric, numeric),
            current: metric_value(current, metric, numeric),
        })
        .collect();

    ColumnProfile {
        column: base.name().to_string(),
        entries,
    }
}

fn metric_value(column: &Column, metric: Metric, numeric: bool) -> MetricValue {
    match metric {
        Metric::Mean if numeric => mean(column).map_or(MetricValue::NotApplicable, MetricValue::Number),
        Metric::StdDev if numeric => {
            std_dev(column).map_or(MetricValue::NotApplicable, MetricValue::Number)
        }
        Metric::Mean | Metric::StdDev => MetricValue::NotApplicable,
        Metric::Min => extreme(column, Ordering::Less, numeric),
        Metric::Max => extreme(column, Ordering::Greater, numeric),
        Metric::NullCount => MetricValue::Count(column.null_count()),
        Metric::DistinctCount => MetricValue::Count(distinct_count(column)),
    }
}

fn numeric_values(column: &Column) -> impl Iterator<Item = f64> + '_ {
    column.values().iter().filter_map(|cell| match cell {
        Some(Value::Integer(v)) => Some(*v as f64),
        Some(Value::Float(v)) => Some(*v),
        _ => None,
    })
}

fn mean(column: &Column) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in numeric_values(column) {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation (n - 1), consistent across base and current
fn std_dev(column: &Column) -> Option<f64> {
    let values: Vec<f64> = numeric_values(column).collect();
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Min or max over non-null cells, by the type's natural ordering
fn extreme(column: &Column, keep: Ordering, numeric: bool) -> MetricValue {
    let mut best: Option<&Value> = None;
    for cell in column.values().iter().flatten() {
        best = match best {
            None => Some(cell),
            Some(current) if compare_values(cell, current) == keep => Some(cell),
            Some(current) => Some(current),
        };
    }
    match best {
        None => MetricValue::NotApplicable,
        Some(Value::Integer(v)) if numeric => MetricValue::Number(*v as f64),
        Some(Value::Float(v)) if numeric => MetricValue::Number(*v),
        // non-numeric extremes are stringified for display
        Some(value) => MetricValue::Text(value.to_string()),
    }
}

/// Natural ordering within a column type: numeric for numbers, lexicographic
/// for strings, chronological for dates, false < true for booleans. Mixed
/// variants (only possible across retyped columns) fall back to display
/// string comparison.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Integer(x), Value::Float(y)) => (*x as f64).total_cmp(y),
        (Value::Float(x), Value::Integer(y)) => x.total_cmp(&(*y as f64)),
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Distinct values counted identically regardless of type. Null counts as
/// one distinct value when present, whatever the number of null cells.
fn distinct_count(column: &Column) -> usize {
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    for cell in column.values().iter().flatten() {
        let mut encoded = Vec::new();
        cell.write_canonical(&mut encoded);
        seen.insert(encoded);
    }
    seen.len() + usize::from(column.null_count() > 0)
}
