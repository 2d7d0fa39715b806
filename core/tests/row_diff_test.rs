//! Integration tests for the row diff engine
//! Covers the partition/identity/null properties and the concrete scenarios
//! for added, removed, modified, duplicate-key and degraded-mode behavior.

use alteris_core::dataset::Value;
use alteris_core::row_diff::{diff, ModificationDetection};

mod common;
use common::{cell, dataset, float_col, id_val, int_col, keys, str_col};

#[test]
fn test_added_and_removed_by_key_presence() {
    // base [(1,10),(2,20)], current [(1,10),(3,30)]
    let base = id_val(&[(1, Some(10)), (2, Some(20))]);
    let current = id_val(&[(1, Some(10)), (3, Some(30))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    assert_eq!(result.added.row_count(), 1);
    assert_eq!(cell(&result.added, "id", 0), Some(Value::Integer(3)));
    assert_eq!(cell(&result.added, "val", 0), Some(Value::Integer(30)));

    assert_eq!(result.removed.row_count(), 1);
    assert_eq!(cell(&result.removed, "id", 0), Some(Value::Integer(2)));
    assert_eq!(cell(&result.removed, "val", 0), Some(Value::Integer(20)));

    assert!(result.modified.is_empty());
    assert!(!result.duplicate_keys.any());
    assert_eq!(result.modification_detection, ModificationDetection::Enabled);
}

#[test]
fn test_modified_row_carries_both_sides_and_changed_fields() {
    let base = id_val(&[(1, Some(5))]);
    let current = id_val(&[(1, Some(7))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    assert!(result.added.is_empty());
    assert!(result.removed.is_empty());
    assert_eq!(result.modified.len(), 1);

    let table = &result.modified.table;
    let names: Vec<_> = table.column_names().collect();
    assert_eq!(names, vec!["id", "val", "val_current"]);
    assert_eq!(cell(table, "id", 0), Some(Value::Integer(1)));
    assert_eq!(cell(table, "val", 0), Some(Value::Integer(5)));
    assert_eq!(cell(table, "val_current", 0), Some(Value::Integer(7)));
    assert_eq!(result.modified.changed_fields[0], vec!["val".to_string()]);
}

#[test]
fn test_null_on_both_sides_is_unchanged() {
    let base = id_val(&[(1, None)]);
    let current = id_val(&[(1, None)]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    assert!(!result.has_changes(), "null == null must not be a change");
}

#[test]
fn test_null_on_one_side_is_a_change() {
    let base = id_val(&[(1, None), (2, Some(9))]);
    let current = id_val(&[(1, Some(7)), (2, None)]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    assert_eq!(result.modified.len(), 2);
    for fields in &result.modified.changed_fields {
        assert_eq!(fields, &vec!["val".to_string()]);
    }
}

#[test]
fn test_matched_rows_with_null_payload_stay_matched() {
    // A null business value in a non-key column must not unmatch the row
    let base = dataset(vec![
        int_col("id", &[Some(1)]),
        int_col("a", &[None]),
        int_col("b", &[Some(2)]),
    ]);
    let current = dataset(vec![
        int_col("id", &[Some(1)]),
        int_col("a", &[None]),
        int_col("b", &[Some(3)]),
    ]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    assert!(result.added.is_empty());
    assert!(result.removed.is_empty());
    assert_eq!(result.modified.len(), 1);
    assert_eq!(result.modified.changed_fields[0], vec!["b".to_string()]);
}

#[test]
fn test_duplicate_keys_produce_cross_product() {
    // base has id=1 twice with different val; current has id=1 once
    let base = id_val(&[(1, Some(5)), (1, Some(7))]);
    let current = id_val(&[(1, Some(7))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    // two candidate rows, each compared independently: (5 vs 7) differs,
    // (7 vs 7) is unchanged
    assert_eq!(result.modified.len(), 1);
    assert_eq!(cell(&result.modified.table, "val", 0), Some(Value::Integer(5)));
    assert!(result.added.is_empty());
    assert!(result.removed.is_empty());
    assert_eq!(result.duplicate_keys.base, 1);
    assert_eq!(result.duplicate_keys.current, 0);
}

#[test]
fn test_duplicate_keys_on_both_sides_multiply() {
    let base = id_val(&[(1, Some(1)), (1, Some(2))]);
    let current = id_val(&[(1, Some(3)), (1, Some(4))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    // 2 x 2 cross product, every pair differs
    assert_eq!(result.modified.len(), 4);
    assert_eq!(result.duplicate_keys.base, 1);
    assert_eq!(result.duplicate_keys.current, 1);
}

#[test]
fn test_degraded_mode_when_no_comparable_payload() {
    // base {id,val}, current {id,score}: only the key overlaps
    let base = dataset(vec![
        int_col("id", &[Some(1), Some(2)]),
        int_col("val", &[Some(10), Some(20)]),
    ]);
    let current = dataset(vec![
        int_col("id", &[Some(2), Some(3)]),
        int_col("score", &[Some(7), Some(8)]),
    ]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    assert!(result.is_degraded());
    assert!(matches!(
        result.modification_detection,
        ModificationDetection::Disabled { .. }
    ));
    // added/removed still computed from key presence alone
    assert_eq!(result.added.row_count(), 1);
    assert_eq!(cell(&result.added, "id", 0), Some(Value::Integer(3)));
    assert_eq!(result.removed.row_count(), 1);
    assert_eq!(cell(&result.removed, "id", 0), Some(Value::Integer(1)));
    assert!(result.modified.is_empty());
}

#[test]
fn test_identity_diff_is_empty() {
    let ds = dataset(vec![
        int_col("id", &[Some(1), Some(2), Some(3)]),
        int_col("val", &[Some(10), None, Some(30)]),
        str_col("name", &[Some("a"), Some("b"), None]),
    ]);

    let result = diff(&ds, &ds, &keys(&["id"])).unwrap();
    assert!(result.added.is_empty());
    assert!(result.removed.is_empty());
    assert!(result.modified.is_empty());
    assert!(!result.is_degraded());
}

#[test]
fn test_identity_diff_is_empty_with_nan_values() {
    // NaN parses from CSV like any other float, so matched rows can carry
    // NaN on both sides; they must still count as unchanged
    let ds = dataset(vec![
        int_col("id", &[Some(1), Some(2)]),
        float_col("val", &[Some(f64::NAN), Some(1.5)]),
    ]);

    let result = diff(&ds, &ds, &keys(&["id"])).unwrap();
    assert!(!result.has_changes(), "a dataset never differs from itself");
}

#[test]
fn test_nan_against_number_is_a_change() {
    let base = dataset(vec![
        int_col("id", &[Some(1)]),
        float_col("val", &[Some(f64::NAN)]),
    ]);
    let current = dataset(vec![
        int_col("id", &[Some(1)]),
        float_col("val", &[Some(1.5)]),
    ]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    assert_eq!(result.modified.len(), 1);
    assert_eq!(result.modified.changed_fields[0], vec!["val".to_string()]);
}

#[test]
fn test_partition_is_disjoint_and_exhaustive() {
    // keys: base {1,2,3,4}, current {3,4,5,6}; 3 modified, 4 unchanged
    let base = id_val(&[(1, Some(1)), (2, Some(2)), (3, Some(3)), (4, Some(4))]);
    let current = id_val(&[(3, Some(99)), (4, Some(4)), (5, Some(5)), (6, Some(6))]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    let collect_ids = |ds: &alteris_core::Dataset| -> Vec<i64> {
        ds.column("id")
            .unwrap()
            .values()
            .iter()
            .map(|v| match v {
                Some(Value::Integer(id)) => *id,
                other => panic!("unexpected id cell {other:?}"),
            })
            .collect()
    };

    let added = collect_ids(&result.added);
    let removed = collect_ids(&result.removed);
    let modified = collect_ids(&result.modified.table);

    assert_eq!(added, vec![5, 6]);
    assert_eq!(removed, vec![1, 2]);
    assert_eq!(modified, vec![3]);

    // disjointness over the key union; the remainder (id=4) is unchanged
    // and not materialized anywhere
    for id in &added {
        assert!(!removed.contains(id) && !modified.contains(id));
    }
    for id in &removed {
        assert!(!modified.contains(id));
    }
    let classified = added.len() + removed.len() + modified.len();
    let union_size = 6; // keys 1..=6
    assert_eq!(union_size - classified, 1, "exactly id=4 stays unchanged");
}

#[test]
fn test_composite_keys_match_on_all_columns() {
    let base = dataset(vec![
        int_col("region", &[Some(1), Some(1)]),
        int_col("id", &[Some(1), Some(2)]),
        int_col("val", &[Some(10), Some(20)]),
    ]);
    let current = dataset(vec![
        int_col("region", &[Some(1), Some(2)]),
        int_col("id", &[Some(1), Some(2)]),
        int_col("val", &[Some(10), Some(20)]),
    ]);

    let result = diff(&base, &current, &keys(&["region", "id"])).unwrap();
    // (1,2) exists only in base, (2,2) only in current
    assert_eq!(result.removed.row_count(), 1);
    assert_eq!(result.added.row_count(), 1);
    assert!(result.modified.is_empty());
}

#[test]
fn test_added_and_removed_keep_their_sides_layout() {
    let base = dataset(vec![
        int_col("id", &[Some(1), Some(2)]),
        int_col("val", &[Some(1), Some(2)]),
        str_col("base_only", &[Some("x"), Some("y")]),
    ]);
    let current = dataset(vec![
        int_col("id", &[Some(2), Some(3)]),
        int_col("val", &[Some(2), Some(3)]),
        str_col("cur_only", &[Some("p"), Some("q")]),
    ]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();

    let added_names: Vec<_> = result.added.column_names().collect();
    assert_eq!(added_names, vec!["id", "val", "cur_only"]);
    let removed_names: Vec<_> = result.removed.column_names().collect();
    assert_eq!(removed_names, vec!["id", "val", "base_only"]);

    // only 'val' is comparable; the modified layout reflects that
    let result2 = diff(&base, &current, &keys(&["id"])).unwrap();
    let modified_names: Vec<_> = result2.modified.table.column_names().collect();
    assert_eq!(modified_names, vec!["id", "val", "val_current"]);
}

#[test]
fn test_changed_fields_follow_base_column_order() {
    let base = dataset(vec![
        int_col("id", &[Some(1)]),
        int_col("b", &[Some(1)]),
        int_col("a", &[Some(1)]),
    ]);
    let current = dataset(vec![
        int_col("id", &[Some(1)]),
        int_col("a", &[Some(2)]),
        int_col("b", &[Some(2)]),
    ]);

    let result = diff(&base, &current, &keys(&["id"])).unwrap();
    assert_eq!(
        result.modified.changed_fields[0],
        vec!["b".to_string(), "a".to_string()]
    );
}

#[test]
fn test_output_order_is_deterministic() {
    let base = id_val(&[(3, Some(3)), (1, Some(1)), (2, Some(2))]);
    let current = id_val(&[(9, Some(9)), (8, Some(8))]);

    let first = diff(&base, &current, &keys(&["id"])).unwrap();
    let second = diff(&base, &current, &keys(&["id"])).unwrap();
    assert_eq!(first, second);

    // removed rows keep base row order, added rows keep current row order
    let removed_ids: Vec<_> = first.removed.column("id").unwrap().values().to_vec();
    assert_eq!(
        removed_ids,
        vec![
            Some(Value::Integer(3)),
            Some(Value::Integer(1)),
            Some(Value::Integer(2))
        ]
    );
    let added_ids: Vec<_> = first.added.column("id").unwrap().values().to_vec();
    assert_eq!(
        added_ids,
        vec![Some(Value::Integer(9)), Some(Value::Integer(8))]
    );
}
