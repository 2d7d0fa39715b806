//! Command implementations for alteris CLI

use crate::cli::Commands;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::create_spinner;
use crate::session::ReportSession;
use alteris_core::error::{AlterisError, Result};
use alteris_core::report::{self, ReportOptions};
use alteris_core::row_diff::{self, RowDiffResult};
use alteris_core::schema_diff::{compare_schemas, SchemaDiff};
use alteris_core::{ingest, profile_column, Dataset};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Diff {
            base,
            current,
            keys,
            export,
            force,
            json,
        } => diff_command(&base, &current, keys, export, force, json),
        Commands::Schema {
            base,
            current,
            json,
        } => schema_command(&base, &current, json),
        Commands::Profile {
            base,
            current,
            column,
            json,
        } => profile_command(&base, &current, &column, json),
    }
}

/// Full diff report as emitted with --json
#[derive(Serialize)]
struct DiffReport<'a> {
    schema: &'a SchemaDiff,
    rows: &'a RowDiffResult,
}

fn diff_command(
    base_path: &Path,
    current_path: &Path,
    keys: Vec<String>,
    export: Option<PathBuf>,
    force: bool,
    json: bool,
) -> Result<()> {
    let (base, current) = load_pair(base_path, current_path)?;

    let mut session = ReportSession::new();
    session.set_inputs(base.fingerprint(), current.fingerprint());

    // Hard stop before keys are even considered
    row_diff::common_columns(&base, &current)?;
    session.set_keys(keys);

    let spinner = if json {
        None
    } else {
        Some(create_spinner("Analyzing differences..."))
    };
    let schema_diff = compare_schemas(&base.schema(), &current.schema());
    let result = row_diff::diff(&base, &current, session.keys())?;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    session.mark_report_generated();

    if json {
        JsonFormatter::print(&DiffReport {
            schema: &schema_diff,
            rows: &result,
        })?;
    } else {
        PrettyPrinter::print_diff_summary(&result, &schema_diff);
    }

    if let Some(dir) = export {
        let options = ReportOptions {
            force,
            ..ReportOptions::default()
        };
        let sheets = report::write_report(&result, &schema_diff, &dir, &options)?;
        if !json {
            println!("⬇️ Report written to {} (sheets: {})", dir.display(), sheets.join(", "));
        }
    }

    Ok(())
}

fn schema_command(base_path: &Path, current_path: &Path, json: bool) -> Result<()> {
    let (base, current) = load_pair(base_path, current_path)?;
    row_diff::common_columns(&base, &current)?;

    let schema_diff = compare_schemas(&base.schema(), &current.schema());
    if json {
        JsonFormatter::print(&schema_diff)?;
    } else {
        PrettyPrinter::print_schema_diff(&schema_diff);
    }
    Ok(())
}

fn profile_command(base_path: &Path, current_path: &Path, column: &str, json: bool) -> Result<()> {
    let (base, current) = load_pair(base_path, current_path)?;

    let base_column = base.column(column).ok_or_else(|| {
        AlterisError::invalid_input(format!("column '{column}' not found in the base dataset"))
    })?;
    let current_column = current.column(column).ok_or_else(|| {
        AlterisError::invalid_input(format!(
            "column '{column}' not found in the current dataset"
        ))
    })?;

    let profile = profile_column(base_column, current_column);
    if json {
        JsonFormatter::print(&profile)?;
    } else {
        PrettyPrinter::print_profile(&profile);
    }
    Ok(())
}

fn load_pair(base_path: &Path, current_path: &Path) -> Result<(Dataset, Dataset)> {
    let base = ingest::load_dataset(base_path)?;
    let current = ingest::load_dataset(current_path)?;
    log::debug!(
        "loaded base ({} rows) and current ({} rows)",
        base.row_count(),
        current.row_count()
    );
    Ok((base, current))
}
