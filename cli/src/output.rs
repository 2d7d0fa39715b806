//! Output formatting utilities

use alteris_core::error::{AlterisError, Result};
use alteris_core::profile::ColumnProfile;
use alteris_core::row_diff::{ModificationDetection, RowDiffResult};
use alteris_core::schema_diff::SchemaDiff;
use serde::Serialize;

/// Pretty printer for alteris output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the high-level diff summary
    pub fn print_diff_summary(result: &RowDiffResult, schema_diff: &SchemaDiff) {
        println!("📄 Difference Report");
        println!("├─ ➕ Rows added: {}", result.added.row_count());
        println!("├─ ➖ Rows removed: {}", result.removed.row_count());
        println!("└─ ✏️ Rows modified: {}", result.modified.len());

        if result.duplicate_keys.any() {
            println!(
                "⚠️  Duplicate key values (base: {}, current: {}) - joined row counts multiply; check your key selection",
                result.duplicate_keys.base, result.duplicate_keys.current
            );
        }
        if let ModificationDetection::Disabled { reason } = &result.modification_detection {
            println!("⚠️  Modification detection disabled: {reason}");
        }

        Self::print_schema_diff(schema_diff);
        Self::print_modified_rows(result);
    }

    /// Print schema-level changes
    pub fn print_schema_diff(schema_diff: &SchemaDiff) {
        if !schema_diff.has_changes() {
            println!("🏛️ No schema changes detected.");
            return;
        }
        println!("🏛️ Schema Changes:");
        for column in &schema_diff.added {
            println!("├─ added: {column}");
        }
        for column in &schema_diff.removed {
            println!("├─ removed: {column}");
        }
        for change in &schema_diff.type_changes {
            println!(
                "├─ retyped: {} ({} -> {})",
                change.column, change.base_type, change.current_type
            );
        }
        println!("└─ done");
    }

    /// Print modified rows with their changed-field attribution
    fn print_modified_rows(result: &RowDiffResult) {
        if result.modified.is_empty() {
            return;
        }
        println!("✏️ Modified Rows:");
        let table = &result.modified.table;
        let headers: Vec<&str> = table.column_names().collect();
        for (row, fields) in result.modified.changed_fields.iter().enumerate() {
            let cells: Vec<String> = table
                .columns()
                .enumerate()
                .map(|(col, column)| {
                    let value = match &column.values()[row] {
                        Some(v) => v.to_string(),
                        None => "null".to_string(),
                    };
                    format!("{}={}", headers[col], value)
                })
                .collect();
            let prefix = if row == result.modified.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            // joining the changed-fields list is display-only
            println!("{prefix} {} [changed: {}]", cells.join(" "), fields.join(", "));
        }
    }

    /// Print a column profile as a metric table
    pub fn print_profile(profile: &ColumnProfile) {
        println!("📈 Profile for column '{}'", profile.column);
        for (i, entry) in profile.entries.iter().enumerate() {
            let prefix = if i == profile.entries.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!(
                "{prefix} {}: base={} current={}",
                entry.metric, entry.base, entry.current
            );
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn print<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| AlterisError::invalid_input(format!("JSON encoding failed: {e}")))?;
        println!("{json}");
        Ok(())
    }
}
