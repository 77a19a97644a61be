use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ColumnKey, RowId};

/// One record of a dynamic table.
///
/// `cells` may hold keys that are no longer in the table's column set (a
/// removed dynamic column); those values are inert and never read back
/// through the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub cells: BTreeMap<ColumnKey, String>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    /// Cell value, or `""` when the row predates the column.
    pub fn get(&self, key: &str) -> &str {
        self.cells.get(key).map(String::as_str).unwrap_or("")
    }

    /// Store a value, returning the previous one.
    pub fn set(&mut self, key: ColumnKey, value: impl Into<String>) -> Option<String> {
        self.cells.insert(key, value.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }
}
