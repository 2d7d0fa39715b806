//! Integration tests for report export

use alteris_core::report::{sheet_row_counts, write_report, ReportOptions};
use alteris_core::row_diff::diff;
use alteris_core::schema_diff::compare_schemas;

mod common;
use common::{id_val, keys};

#[test]
fn test_round_trip_row_counts() {
    let base = id_val(&[(1, Some(10)), (2, Some(20)), (3, Some(30))]);
    let current = id_val(&[(1, Some(11)), (3, Some(30)), (4, Some(40)), (5, Some(50))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    let schema_diff = compare_schemas(&base.schema(), &current.schema());

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("report");
    let sheets = write_report(&result, &schema_diff, &dir, &ReportOptions::default()).unwrap();
    assert_eq!(sheets, vec!["Modified", "Added", "Removed"]);

    let counts = sheet_row_counts(&dir).unwrap();
    assert_eq!(
        counts,
        vec![
            ("Modified".to_string(), 1),
            ("Added".to_string(), 2),
            ("Removed".to_string(), 1),
        ]
    );
}

#[test]
fn test_empty_categories_are_omitted() {
    let base = id_val(&[(1, Some(10))]);
    let current = id_val(&[(1, Some(10)), (2, Some(20))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    let schema_diff = compare_schemas(&base.schema(), &current.schema());

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("report");
    let sheets = write_report(&result, &schema_diff, &dir, &ReportOptions::default()).unwrap();
    assert_eq!(sheets, vec!["Added"]);

    assert!(!dir.join("Modified.csv").exists());
    assert!(!dir.join("Removed.csv").exists());
    assert!(dir.join("Added.csv").exists());
}

#[test]
fn test_existing_directory_requires_force() {
    let base = id_val(&[(1, Some(10))]);
    let current = id_val(&[(2, Some(20))]);
    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    let schema_diff = compare_schemas(&base.schema(), &current.schema());

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();

    let blocked = write_report(&result, &schema_diff, &dir, &ReportOptions::default());
    assert!(blocked.is_err(), "Existing directory must not be overwritten");

    let forced = write_report(
        &result,
        &schema_diff,
        &dir,
        &ReportOptions {
            force: true,
            ..ReportOptions::default()
        },
    );
    assert!(forced.is_ok());
}

#[test]
fn test_forced_overwrite_removes_stale_sheets() {
    let base = id_val(&[(1, Some(5)), (2, Some(20))]);
    let current = id_val(&[(1, Some(7)), (2, Some(20))]);
    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    let schema_diff = compare_schemas(&base.schema(), &current.schema());

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("report");
    let sheets = write_report(&result, &schema_diff, &dir, &ReportOptions::default()).unwrap();
    assert_eq!(sheets, vec!["Modified"]);

    // Re-export a result with no modified rows into the same directory;
    // the old Modified sheet must not survive.
    let unchanged = diff(&base, &base, &keys(&["id"])).unwrap();
    let sheets = write_report(
        &unchanged,
        &schema_diff,
        &dir,
        &ReportOptions {
            force: true,
            ..ReportOptions::default()
        },
    )
    .unwrap();
    assert!(sheets.is_empty());

    assert!(!dir.join("Modified.csv").exists());
    assert!(sheet_row_counts(&dir).unwrap().is_empty());
}

#[test]
fn test_modified_sheet_carries_changed_fields_column() {
    let base = id_val(&[(1, Some(5))]);
    let current = id_val(&[(1, Some(7))]);
    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    let schema_diff = compare_schemas(&base.schema(), &current.schema());

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("report");
    write_report(&result, &schema_diff, &dir, &ReportOptions::default()).unwrap();

    let contents = std::fs::read_to_string(dir.join("Modified.csv")).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("id,val,val_current,changed_fields"));
    assert_eq!(lines.next(), Some("1,5,7,val"));
}
