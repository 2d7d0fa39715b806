//! # alteris-core
//!
//! Core library for alteris - a structured data diff tool that compares two
//! versions of a tabular dataset and reports schema-level changes, row-level
//! changes with per-row field attribution, and per-column statistical
//! profiles for spotting distributional drift.
//!
//! This crate provides the core functionality that can be used by different
//! interfaces (CLI, web APIs, etc.).

pub mod cache;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod profile;
pub mod report;
pub mod row_diff;
pub mod schema_diff;

// Re-export the most commonly used types for convenience
pub use cache::DiffCache;
pub use dataset::{Column, ColumnType, Dataset, Schema, Value};
pub use error::{AlterisError, Result};
pub use profile::{profile_column, ColumnProfile, Metric, MetricValue};
pub use report::{write_report, ReportOptions};
pub use row_diff::{common_columns, diff, ModificationDetection, RowDiffResult};
pub use schema_diff::{compare_schemas, SchemaDiff};
