//! Row-level change detection between two dataset versions
//!
//! Rows are matched across versions by user-chosen key columns via a full
//! outer join, then partitioned into exactly one of added, removed, modified
//! or unchanged. For modified rows the engine attributes precisely which
//! non-key common columns changed.

use crate::dataset::{Column, Dataset, Value};
use crate::error::{AlterisError, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

/// Default suffix attached to current-side payload columns in the modified
/// table. Extended with underscores if it collides with an existing column.
pub const CURRENT_SUFFIX: &str = "_current";

/// Whether modification detection ran for this diff.
///
/// `Disabled` is the degraded mode: the key selection left no non-key common
/// column to compare, so added/removed were computed from key presence alone
/// and the modified table is empty. It is a warning, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModificationDetection {
    Enabled,
    Disabled { reason: String },
}

/// Per-side count of rows beyond the first occurrence of their key value.
///
/// Non-zero counts mean the outer join produced a cross product for those
/// keys and downstream row counts multiply - usually a sign of a malformed
/// key selection, surfaced to callers as a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateKeys {
    pub base: usize,
    pub current: usize,
}

impl DuplicateKeys {
    pub fn any(&self) -> bool {
        self.base > 0 || self.current > 0
    }
}

/// Modified rows: key columns, base-side payload values, current-side
/// payload values under `current_suffix`, plus per-row changed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifiedRows {
    pub table: Dataset,
    /// Ordered, de-duplicated list of common-column names whose values
    /// differ, aligned with the rows of `table`. The canonical form is a
    /// list; joining into a display string belongs to the presentation
    /// layer.
    pub changed_fields: Vec<Vec<String>>,
    /// Suffix actually used for current-side columns in `table`
    pub current_suffix: String,
}

impl ModifiedRows {
    fn empty() -> Self {
        Self {
            table: Dataset::empty(),
            changed_fields: Vec::new(),
            current_suffix: CURRENT_SUFFIX.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.changed_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields.is_empty()
    }
}

/// Complete result of one diff invocation. Created fresh per call and not
/// mutated afterward; all members are independently well-formed tabular
/// datasets suitable for direct serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiffResult {
    /// Current-side rows whose key is absent from base, in current's layout
    pub added: Dataset,
    /// Base-side rows whose key is absent from current, in base's layout
    pub removed: Dataset,
    pub modified: ModifiedRows,
    pub duplicate_keys: DuplicateKeys,
    pub modification_detection: ModificationDetection,
}

impl RowDiffResult {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self.modification_detection,
            ModificationDetection::Disabled { .. }
        )
    }
}

/// Column names present in both datasets, in base column order.
///
/// An empty intersection means the comparison cannot proceed at all - this
/// is checked before key selection is even offered.
pub fn common_columns(base: &Dataset, current: &Dataset) -> Result<Vec<String>> {
    let common: Vec<String> = base
        .column_names()
        .filter(|name| current.has_column(name))
        .map(str::to_string)
        .collect();
    if common.is_empty() {
        return Err(AlterisError::NoCommonColumns);
    }
    Ok(common)
}

/// Compare two dataset versions joined on `keys`.
///
/// Every key value present in either dataset ends up in exactly one of
/// {added, removed, modified, unchanged}; unchanged rows are not
/// materialized. Duplicate key values produce the cross product of matching
/// rows (standard outer-join semantics) and are counted in the result.
pub fn diff(base: &Dataset, current: &Dataset, keys: &[String]) -> Result<RowDiffResult> {
    validate_keys(base, current, keys)?;

    let comparable = comparable_columns(base, current, keys);

    let base_groups = key_groups(base, keys)?;
    let current_groups = key_groups(current, keys)?;

    let duplicate_keys = DuplicateKeys {
        base: base_groups.values().map(|rows| rows.len() - 1).sum(),
        current: current_groups.values().map(|rows| rows.len() - 1).sum(),
    };
    if duplicate_keys.any() {
        log::warn!(
            "duplicate key values detected (base: {}, current: {}); joined row counts will multiply",
            duplicate_keys.base,
            duplicate_keys.current
        );
    }

    // Full outer join bookkeeping. Side presence comes from which key map a
    // row appears in, never from scanning payload cells for nulls - a row
    // with a legitimately null business value stays matched.
    let mut removed_rows = Vec::new();
    let mut matched: Vec<(usize, usize)> = Vec::new();
    for (key, base_rows) in &base_groups {
        match current_groups.get(key) {
            Some(current_rows) => {
                for &b in base_rows {
                    for &c in current_rows {
                        matched.push((b, c));
                    }
                }
            }
            None => removed_rows.extend(base_rows.iter().copied()),
        }
    }
    let mut added_rows = Vec::new();
    for (key, current_rows) in &current_groups {
        if !base_groups.contains_key(key) {
            added_rows.extend(current_rows.iter().copied());
        }
    }

    let added = current.project_rows(&added_rows);
    let removed = base.project_rows(&removed_rows);

    if comparable.is_empty() {
        log::warn!("no comparable non-key column exists; modification detection is disabled");
        return Ok(RowDiffResult {
            added,
            removed,
            modified: ModifiedRows::empty(),
            duplicate_keys,
            modification_detection: ModificationDetection::Disabled {
                reason: "base and current share no non-key column".to_string(),
            },
        });
    }

    // Column-wise comparison over all matched pairs: null == null is not a
    // change, null vs non-null is, and float cells compare by bit pattern
    // so NaN equals NaN.
    let column_pairs = comparable
        .iter()
        .map(|name| Ok((column(base, name)?, column(current, name)?)))
        .collect::<Result<Vec<_>>>()?;

    let change_masks: Vec<Vec<bool>> = column_pairs
        .par_iter()
        .map(|(base_col, current_col)| {
            matched
                .iter()
                .map(|&(b, c)| !cells_equal(&base_col.values()[b], &current_col.values()[c]))
                .collect()
        })
        .collect();

    let mut modified_pairs = Vec::new();
    let mut changed_fields = Vec::new();
    for (pair_idx, &pair) in matched.iter().enumerate() {
        let fields: Vec<String> = comparable
            .iter()
            .enumerate()
            .filter(|(col_idx, _)| change_masks[*col_idx][pair_idx])
            .map(|(_, name)| name.clone())
            .collect();
        if !fields.is_empty() {
            modified_pairs.push(pair);
            changed_fields.push(fields);
        }
    }

    let suffix = disambiguation_suffix(base, current, &comparable);
    let table = build_modified_table(base, current, keys, &comparable, &modified_pairs, &suffix)?;

    Ok(RowDiffResult {
        added,
        removed,
        modified: ModifiedRows {
            table,
            changed_fields,
            current_suffix: suffix,
        },
        duplicate_keys,
        modification_detection: ModificationDetection::Enabled,
    })
}

fn validate_keys(base: &Dataset, current: &Dataset, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        return Err(AlterisError::invalid_key_selection(
            "no key columns selected",
        ));
    }
    for key in keys {
        if !base.has_column(key) {
            return Err(AlterisError::invalid_key_selection(format!(
                "key column '{key}' is missing from the base dataset"
            )));
        }
        if !current.has_column(key) {
            return Err(AlterisError::invalid_key_selection(format!(
                "key column '{key}' is missing from the current dataset"
            )));
        }
    }
    Ok(())
}

/// Non-key columns present in both datasets, in base column order
fn comparable_columns(base: &Dataset, current: &Dataset, keys: &[String]) -> Vec<String> {
    base.column_names()
        .filter(|name| current.has_column(name) && !keys.iter().any(|k| k == name))
        .map(str::to_string)
        .collect()
}

/// Group row indices by canonical key encoding, preserving row order.
/// Key cells may be null; a null key cell matches another null key cell.
fn key_groups(ds: &Dataset, keys: &[String]) -> Result<IndexMap<Vec<u8>, Vec<usize>>> {
    let key_cols = keys
        .iter()
        .map(|k| column(ds, k))
        .collect::<Result<Vec<_>>>()?;
    let mut groups: IndexMap<Vec<u8>, Vec<usize>> = IndexMap::new();
    for row in 0..ds.row_count() {
        let mut encoded = Vec::new();
        for col in &key_cols {
            match &col.values()[row] {
                Some(value) => value.write_canonical(&mut encoded),
                None => encoded.push(b'n'),
            }
        }
        groups.entry(encoded).or_default().push(row);
    }
    Ok(groups)
}

/// Pick a current-side suffix that cannot collide with any existing column
fn disambiguation_suffix(base: &Dataset, current: &Dataset, comparable: &[String]) -> String {
    let mut suffix = CURRENT_SUFFIX.to_string();
    let collides = |suffix: &str| {
        comparable.iter().any(|name| {
            let candidate = format!("{name}{suffix}");
            base.has_column(&candidate) || current.has_column(&candidate)
        })
    };
    while collides(&suffix) {
        suffix.push('_');
    }
    suffix
}

fn build_modified_table(
    base: &Dataset,
    current: &Dataset,
    keys: &[String],
    comparable: &[String],
    pairs: &[(usize, usize)],
    suffix: &str,
) -> Result<Dataset> {
    let base_rows: Vec<usize> = pairs.iter().map(|&(b, _)| b).collect();
    let current_rows: Vec<usize> = pairs.iter().map(|&(_, c)| c).collect();

    let mut columns = Vec::with_capacity(keys.len() + 2 * comparable.len());
    // Key values are identical on both sides by join construction
    for key in keys {
        columns.push(column(base, key)?.project_rows(&base_rows));
    }
    for name in comparable {
        columns.push(column(base, name)?.project_rows(&base_rows));
    }
    for name in comparable {
        columns.push(
            column(current, name)?
                .project_rows(&current_rows)
                .renamed(format!("{name}{suffix}")),
        );
    }
    Dataset::new(columns)
}

fn cells_equal(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.canonical_eq(b),
        (None, None) => true,
        _ => false,
    }
}

fn column<'a>(ds: &'a Dataset, name: &str) -> Result<&'a Column> {
    ds.column(name)
        .ok_or_else(|| AlterisError::invalid_input(format!("column '{name}' not found")))
}
