//! Schema comparison between two dataset versions

use crate::dataset::Schema;
use serde::Serialize;
use std::collections::BTreeSet;

/// A column present in both schemas whose declared type differs.
/// Types are stringified for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeChange {
    pub column: String,
    pub base_type: String,
    pub current_type: String,
}

/// Schema-level differences between a base and a current dataset.
///
/// A column name appears in at most one of the three buckets, and
/// `added` and `removed` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub type_changes: Vec<TypeChange>,
}

impl SchemaDiff {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.type_changes.is_empty()
    }
}

/// Compare two schemas by column name.
///
/// Pure and total: empty schemas are valid and yield an all-empty diff.
/// `type_changes` follows base column order, which is stable within an
/// invocation; callers sort for display if they need another order.
pub fn compare_schemas(base: &Schema, current: &Schema) -> SchemaDiff {
    let added = current
        .names()
        .filter(|name| !base.contains(name))
        .map(str::to_string)
        .collect();
    let removed = base
        .names()
        .filter(|name| !current.contains(name))
        .map(str::to_string)
        .collect();

    let type_changes = base
        .names()
        .filter_map(|name| {
            let base_type = base.column_type(name)?;
            let current_type = current.column_type(name)?;
            if base_type != current_type {
                Some(TypeChange {
                    column: name.to_string(),
                    base_type: base_type.to_string(),
                    current_type: current_type.to_string(),
                })
            } else {
                None
            }
        })
        .collect();

    SchemaDiff {
        added,
        removed,
        type_changes,
    }
}
