//! Dynamic table store.
//!
//! An ordered sequence of rows conforming to a [`RecordSchema`]. Row order
//! is insertion order; positions shift down when a row is removed. Every
//! operation is applied in full or not at all.

use tracing::{debug, warn};

use formgrid_model::{ColumnDef, ColumnKey, DynamicColumn, Row, RowId, TableName};

use crate::derive::{self, format_display};
use crate::redact::redact_value;
use crate::schema::RecordSchema;
use crate::TableError;

#[derive(Debug, Clone)]
pub struct DynamicTable {
    name: TableName,
    label: String,
    schema: RecordSchema,
    rows: Vec<Row>,
    next_row_id: u64,
}

impl DynamicTable {
    /// Create an empty table (no rows).
    pub fn new(name: TableName, label: impl Into<String>, schema: RecordSchema) -> Self {
        Self {
            name,
            label: label.into(),
            schema,
            rows: Vec::new(),
            next_row_id: 1,
        }
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column keys in scope, fixed first.
    pub fn column_keys(&self) -> Vec<ColumnKey> {
        self.schema.column_keys().cloned().collect()
    }

    /// Fixed and dynamic column definitions in display order.
    pub fn columns(&self) -> Vec<ColumnDef> {
        self.schema.all_columns()
    }

    /// Current value of a cell; blank when the row predates the column.
    pub fn cell(&self, index: usize, key: &str) -> Result<&str, TableError> {
        let row = self.rows.get(index).ok_or(TableError::OutOfRange {
            index,
            len: self.rows.len(),
        })?;
        if !self.schema.contains(key) {
            return Err(TableError::UnknownColumn(key.to_string()));
        }
        Ok(row.get(key))
    }

    /// Append a row. Every column in scope not present in `initial` starts
    /// blank; keys outside the schema are dropped. Returns the new position.
    pub fn add_row<I, K, V>(&mut self, initial: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Row::new(RowId::new(self.next_row_id));
        self.next_row_id += 1;
        for key in self.schema.column_keys() {
            row.set(key.clone(), String::new());
        }
        for (key, value) in initial {
            let key = key.as_ref();
            match self.schema.key(key) {
                Some(owned) => {
                    row.set(owned.clone(), value);
                }
                None => warn!(table = %self.name, column = key, "dropping value for unknown column"),
            }
        }
        derive::recompute_row(&self.schema, &mut row, None);
        self.rows.push(row);
        let index = self.rows.len() - 1;
        debug!(table = %self.name, row = index, "row added");
        index
    }

    /// Remove the row at `index`; later rows shift down by one.
    pub fn remove_row(&mut self, index: usize) -> Result<Row, TableError> {
        if index >= self.rows.len() {
            return Err(TableError::OutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let removed = self.rows.remove(index);
        debug!(table = %self.name, row = index, remaining = self.rows.len(), "row removed");
        Ok(removed)
    }

    /// Write one cell and recompute the derived cells that read it.
    ///
    /// Returns every key whose value changed in the row: the edited key
    /// followed by affected derived columns. Derived columns are written
    /// only by their rule and reject direct edits.
    pub fn set_cell(
        &mut self,
        index: usize,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Vec<ColumnKey>, TableError> {
        let len = self.rows.len();
        let owned = self
            .schema
            .key(key)
            .cloned()
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))?;
        if self.schema.column(key).is_some_and(ColumnDef::is_derived) {
            return Err(TableError::DerivedColumn(owned));
        }
        let row = self
            .rows
            .get_mut(index)
            .ok_or(TableError::OutOfRange { index, len })?;
        let value = value.into();
        debug!(
            table = %self.name,
            row = index,
            column = key,
            value = redact_value(&value),
            "cell updated"
        );
        row.set(owned.clone(), value);
        let mut changed = vec![owned];
        if self.schema.is_derivation_input(key) {
            changed.extend(derive::recompute_row(&self.schema, row, Some(key)));
        }
        Ok(changed)
    }

    /// Add a user-defined text column; every existing row gets a blank cell.
    pub fn add_column(&mut self, label: &str) -> Result<DynamicColumn, TableError> {
        let column = match self.schema.add_dynamic_column(label) {
            Ok(column) => column,
            Err(error) => {
                warn!(table = %self.name, %error, "column not added");
                return Err(error);
            }
        };
        for row in &mut self.rows {
            row.set(column.key.clone(), String::new());
        }
        Ok(column)
    }

    /// Remove a user-defined column. Stored values for the key stay in the
    /// rows but are no longer part of the table.
    pub fn remove_column(&mut self, key: &str) -> bool {
        self.schema.remove_dynamic_column(key)
    }

    pub fn recompute_all(&mut self) {
        for row in &mut self.rows {
            derive::recompute_row(&self.schema, row, None);
        }
    }

    /// Display strings for every row, in column order.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| format_display(row.get(column.key.as_str()), &column.field_type))
                    .collect()
            })
            .collect()
    }
}
