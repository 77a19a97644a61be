//! Record schema: the column layout of one dynamic table.
//!
//! Fixed columns come from the form declaration and never change. Dynamic
//! columns are appended by the user at run time and are always plain text.
//! Derived columns are evaluated in dependency order, which is computed once
//! when the schema is built.

use std::collections::BTreeSet;

use tracing::debug;

use formgrid_model::{ColumnDef, ColumnKey, DynamicColumn};

use crate::{SchemaError, TableError};

#[derive(Debug, Clone)]
pub struct RecordSchema {
    columns: Vec<ColumnDef>,
    dynamic: Vec<DynamicColumn>,
    /// Indices into `columns` of derived columns, inputs before outputs.
    derivation_order: Vec<usize>,
    min_rows: usize,
    seed_rows: usize,
}

impl RecordSchema {
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        let mut keys = BTreeSet::new();
        for column in &columns {
            if !keys.insert(column.key.as_str()) {
                return Err(SchemaError::DuplicateKey(column.key.to_string()));
            }
        }
        for column in &columns {
            let Some(rule) = &column.derived else {
                continue;
            };
            for input in rule.inputs() {
                if input == &column.key {
                    return Err(SchemaError::SelfReference(column.key.clone()));
                }
                if !keys.contains(input.as_str()) {
                    return Err(SchemaError::UnknownInput {
                        column: column.key.clone(),
                        input: input.clone(),
                    });
                }
            }
        }
        let derivation_order = derivation_order(&columns)?;
        Ok(Self {
            columns,
            dynamic: Vec::new(),
            derivation_order,
            min_rows: 0,
            seed_rows: 1,
        })
    }

    /// Minimum number of rows required at validation time.
    #[must_use]
    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    /// Number of empty rows a new document starts with.
    #[must_use]
    pub fn with_seed_rows(mut self, seed_rows: usize) -> Self {
        self.seed_rows = seed_rows;
        self
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn seed_rows(&self) -> usize {
        self.seed_rows
    }

    /// Fixed columns in declaration order, excluding dynamic ones.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn dynamic_columns(&self) -> &[DynamicColumn] {
        &self.dynamic
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.key.as_str() == key)
    }

    pub fn dynamic_column(&self, key: &str) -> Option<&DynamicColumn> {
        self.dynamic.iter().find(|column| column.key.as_str() == key)
    }

    /// Returns true if `key` is a fixed or dynamic column.
    pub fn contains(&self, key: &str) -> bool {
        self.column(key).is_some() || self.dynamic_column(key).is_some()
    }

    /// Resolve `key` to the owned key stored in the schema.
    pub fn key(&self, key: &str) -> Option<&ColumnKey> {
        self.column(key)
            .map(|column| &column.key)
            .or_else(|| self.dynamic_column(key).map(|column| &column.key))
    }

    /// Every column key in scope: fixed columns, then dynamic columns.
    pub fn column_keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns
            .iter()
            .map(|column| &column.key)
            .chain(self.dynamic.iter().map(|column| &column.key))
    }

    /// Fixed and dynamic column definitions in display order.
    pub fn all_columns(&self) -> Vec<ColumnDef> {
        self.columns
            .iter()
            .cloned()
            .chain(self.dynamic.iter().map(DynamicColumn::to_column_def))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len() + self.dynamic.len()
    }

    /// Append a user-defined text column.
    ///
    /// The key is the label with all whitespace removed. A key that matches
    /// any fixed or dynamic column is rejected and the schema is unchanged.
    pub fn add_dynamic_column(&mut self, label: &str) -> Result<DynamicColumn, TableError> {
        let column = DynamicColumn::from_label(label)
            .map_err(|_| TableError::InvalidLabel(label.to_string()))?;
        if self.contains(column.key.as_str()) {
            return Err(TableError::AlreadyExists(column.key));
        }
        debug!(column = %column.key, "dynamic column added");
        self.dynamic.push(column.clone());
        Ok(column)
    }

    /// Remove a dynamic column. Returns false when no such dynamic column
    /// exists; fixed columns are never removed.
    pub fn remove_dynamic_column(&mut self, key: &str) -> bool {
        let Some(position) = self
            .dynamic
            .iter()
            .position(|column| column.key.as_str() == key)
        else {
            return false;
        };
        self.dynamic.remove(position);
        debug!(column = key, "dynamic column removed");
        true
    }

    /// Derived columns, each after every derived column it reads.
    pub fn derived_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.derivation_order
            .iter()
            .map(|&position| &self.columns[position])
    }

    /// Derived columns whose value can change when `key` changes, directly
    /// or through another derived column, in evaluation order.
    pub fn affected_by(&self, key: &str) -> Vec<&ColumnDef> {
        let mut dirty: BTreeSet<&str> = BTreeSet::from([key]);
        let mut affected = Vec::new();
        for column in self.derived_columns() {
            let Some(rule) = &column.derived else {
                continue;
            };
            if rule.inputs().iter().any(|input| dirty.contains(input.as_str())) {
                dirty.insert(column.key.as_str());
                affected.push(column);
            }
        }
        affected
    }

    /// Returns true if any derivation reads `key`.
    pub fn is_derivation_input(&self, key: &str) -> bool {
        self.derived_columns()
            .filter_map(|column| column.derived.as_ref())
            .any(|rule| rule.reads(key))
    }
}

/// Order derived columns so that every derived input is evaluated first.
///
/// Declaration order is kept among columns with no mutual dependency.
fn derivation_order(columns: &[ColumnDef]) -> Result<Vec<usize>, SchemaError> {
    let derived: BTreeSet<&str> = columns
        .iter()
        .filter(|column| column.is_derived())
        .map(|column| column.key.as_str())
        .collect();
    let mut pending: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, column)| column.is_derived())
        .map(|(position, _)| position)
        .collect();
    let mut done: BTreeSet<&str> = BTreeSet::new();
    let mut order = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&position| {
            let column = &columns[position];
            let ready = column.derived.as_ref().is_none_or(|rule| {
                rule.inputs().iter().all(|input| {
                    !derived.contains(input.as_str()) || done.contains(input.as_str())
                })
            });
            if ready {
                done.insert(column.key.as_str());
                order.push(position);
            }
            !ready
        });
        if pending.len() == before {
            return Err(SchemaError::DerivationCycle(
                pending
                    .iter()
                    .map(|&position| columns[position].key.clone())
                    .collect(),
            ));
        }
    }
    Ok(order)
}
