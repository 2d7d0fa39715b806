//! Report assembly: renders a diff result into an exportable workbook
//!
//! The workbook is a directory of CSV sheets, one per non-empty category in
//! fixed priority order: Modified, Added, Removed. Empty categories are
//! omitted. This is the presentation boundary - string-joining of changed
//! fields and null-to-empty rendering happen here, never in the core
//! structures.

use crate::dataset::Dataset;
use crate::error::{AlterisError, Result};
use crate::row_diff::RowDiffResult;
use crate::schema_diff::SchemaDiff;
use std::path::Path;

/// Sheet names in fixed priority order
pub const SHEET_ORDER: [&str; 3] = ["Modified", "Added", "Removed"];

/// Display column appended to the modified sheet
pub const CHANGED_FIELDS_HEADER: &str = "changed_fields";

/// Options for report export
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Overwrite an existing report directory
    pub force: bool,
    /// Append a "Schema" sheet when the schema diff is non-empty
    pub include_schema_sheet: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            force: false,
            include_schema_sheet: true,
        }
    }
}

/// Write the report workbook, returning the sheet names actually written
pub fn write_report(
    result: &RowDiffResult,
    schema_diff: &SchemaDiff,
    dir: &Path,
    options: &ReportOptions,
) -> Result<Vec<String>> {
    if dir.exists() {
        if !options.force {
            return Err(AlterisError::invalid_input(format!(
                "Report directory already exists: {}. Use force option to overwrite.",
                dir.display()
            )));
        }
        remove_stale_sheets(dir)?;
    }
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();

    if !result.modified.is_empty() {
        write_modified_sheet(result, &dir.join("Modified.csv"))?;
        written.push("Modified".to_string());
    }
    if !result.added.is_empty() {
        write_dataset_sheet(&result.added, &dir.join("Added.csv"))?;
        written.push("Added".to_string());
    }
    if !result.removed.is_empty() {
        write_dataset_sheet(&result.removed, &dir.join("Removed.csv"))?;
        written.push("Removed".to_string());
    }
    if options.include_schema_sheet && schema_diff.has_changes() {
        write_schema_sheet(schema_diff, &dir.join("Schema.csv"))?;
        written.push("Schema".to_string());
    }

    log::info!("report written to {} ({} sheets)", dir.display(), written.len());
    Ok(written)
}

/// Remove sheet files left over from an earlier export, so an overwritten
/// report never mixes sheets from two different results.
fn remove_stale_sheets(dir: &Path) -> Result<()> {
    for name in SHEET_ORDER.iter().chain(["Schema"].iter()) {
        let path = dir.join(format!("{name}.csv"));
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Data-row counts per category sheet present in a report directory,
/// in sheet priority order. Used to verify the export round-trips.
pub fn sheet_row_counts(dir: &Path) -> Result<Vec<(String, usize)>> {
    let mut counts = Vec::new();
    for name in SHEET_ORDER {
        let path = dir.join(format!("{name}.csv"));
        if !path.exists() {
            continue;
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| AlterisError::load_error(&path, e))?;
        let mut rows = 0usize;
        for record in reader.records() {
            record.map_err(|e| AlterisError::load_error(&path, e))?;
            rows += 1;
        }
        counts.push((name.to_string(), rows));
    }
    Ok(counts)
}

fn write_dataset_sheet(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(dataset.column_names())?;
    for row in 0..dataset.row_count() {
        let record: Vec<String> = dataset
            .columns()
            .map(|col| render_cell(&col.values()[row]))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_modified_sheet(result: &RowDiffResult, path: &Path) -> Result<()> {
    let table = &result.modified.table;
    let mut writer = csv::Writer::from_path(path)?;

    let mut headers: Vec<&str> = table.column_names().collect();
    headers.push(CHANGED_FIELDS_HEADER);
    writer.write_record(&headers)?;

    for (row, fields) in result.modified.changed_fields.iter().enumerate() {
        let mut record: Vec<String> = table
            .columns()
            .map(|col| render_cell(&col.values()[row]))
            .collect();
        // comma-joining is a display concern, confined to this layer
        record.push(fields.join(", "));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_schema_sheet(schema_diff: &SchemaDiff, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["change", "column", "base_type", "current_type"])?;
    for column in &schema_diff.added {
        writer.write_record(["added", column, "", ""])?;
    }
    for column in &schema_diff.removed {
        writer.write_record(["removed", column, "", ""])?;
    }
    for change in &schema_diff.type_changes {
        writer.write_record([
            "retyped",
            change.column.as_str(),
            change.base_type.as_str(),
            change.current_type.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn render_cell(cell: &Option<crate::dataset::Value>) -> String {
    match cell {
        Some(value) => value.to_string(),
        None => String::new(),
    }
}
