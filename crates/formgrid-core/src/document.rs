//! Document assembly.
//!
//! A [`DocumentSchema`] is the declaration of one business form: flat
//! fields, tables and aggregate roll-ups. A [`Document`] is one editing
//! session of that form. It is created with blank fields and seed rows,
//! mutated only through the methods below, and either submitted or dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::{debug, info, warn};

use formgrid_model::{
    AggregateRule, ColumnDef, ColumnKey, DynamicColumn, TableName, ValidationIssue,
};

use crate::derive;
use crate::host::ColumnLabelSource;
use crate::payload::{Payload, scalar_to_string};
use crate::redact::redact_value;
use crate::registry::FieldRegistry;
use crate::schema::RecordSchema;
use crate::submit::SubmissionHandler;
use crate::table::DynamicTable;
use crate::{DocumentError, SchemaError, TableError, ValidationFailed, checks};

/// A named table declaration inside a document.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: TableName,
    pub label: String,
    pub schema: RecordSchema,
}

impl TableSchema {
    pub fn new(
        name: &str,
        label: impl Into<String>,
        schema: RecordSchema,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name: TableName::new(name)?,
            label: label.into(),
            schema,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DocumentSchema {
    id: String,
    title: String,
    fields: FieldRegistry,
    tables: Vec<TableSchema>,
    aggregates: Vec<AggregateRule>,
}

impl DocumentSchema {
    /// Build and check a form declaration.
    ///
    /// Field keys and table names share one namespace (they are siblings in
    /// the payload). Aggregates must write a declared flat field and read a
    /// fixed column of a declared table.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<ColumnDef>,
        tables: Vec<TableSchema>,
        aggregates: Vec<AggregateRule>,
    ) -> Result<Self, SchemaError> {
        let fields = FieldRegistry::new(fields)?;
        let mut names = BTreeSet::new();
        for table in &tables {
            if fields.contains(table.name.as_str()) || !names.insert(table.name.as_str()) {
                return Err(SchemaError::DuplicateKey(table.name.to_string()));
            }
        }

        let mut outputs = BTreeSet::new();
        for rule in &aggregates {
            if !fields.contains(rule.output.as_str()) {
                return Err(SchemaError::UnknownAggregateOutput {
                    output: rule.output.clone(),
                });
            }
            if !outputs.insert(rule.output.as_str()) {
                return Err(SchemaError::DuplicateAggregate(rule.output.clone()));
            }
            let Some(table) = tables.iter().find(|table| table.name == rule.table) else {
                return Err(SchemaError::UnknownAggregateTable {
                    output: rule.output.clone(),
                    table: rule.table.clone(),
                });
            };
            let read = std::iter::once(&rule.column)
                .chain(rule.filter.as_ref().map(|filter| filter.column()));
            for column in read {
                if table.schema.column(column.as_str()).is_none() {
                    return Err(SchemaError::UnknownAggregateColumn {
                        output: rule.output.clone(),
                        table: rule.table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }

        Ok(Self {
            id: id.into(),
            title: title.into(),
            fields,
            tables,
            aggregates,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name.as_str() == name)
    }

    pub fn aggregates(&self) -> &[AggregateRule] {
        &self.aggregates
    }

    /// The aggregate writing flat field `key`, if any.
    pub fn aggregate_for(&self, key: &str) -> Option<&AggregateRule> {
        self.aggregates
            .iter()
            .find(|rule| rule.output.as_str() == key)
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    schema: DocumentSchema,
    fields: BTreeMap<ColumnKey, String>,
    tables: Vec<DynamicTable>,
}

impl Document {
    /// Open a fresh document: blank flat fields and the declared number of
    /// blank seed rows per table.
    pub fn new(schema: &DocumentSchema) -> Self {
        let mut document = Self::empty(schema);
        for table in &mut document.tables {
            for _ in 0..table.schema().seed_rows() {
                table.add_row(std::iter::empty::<(&str, String)>());
            }
        }
        document.refresh_all_aggregates();
        info!(document = schema.id(), "document opened");
        document
    }

    /// Rebuild a document from a payload previously produced by
    /// [`Document::submit`] or [`Document::to_payload`].
    ///
    /// Row keys that are not fixed columns become dynamic columns in the
    /// order they are first seen. Tables missing from the payload get their
    /// seed rows; unknown top-level keys are dropped. Derived cells and
    /// aggregates are recomputed from the loaded inputs.
    ///
    /// Dynamic columns are only carried as row keys, so a table submitted
    /// with zero rows comes back without its dynamic columns.
    pub fn from_payload(schema: &DocumentSchema, payload: &Payload) -> Result<Self, DocumentError> {
        let mut document = Self::empty(schema);
        let mut seen_tables = BTreeSet::new();

        for (key, value) in payload.as_map() {
            if let Some(field) = document.schema.fields.get(key) {
                let text = scalar_to_string(key, value)?;
                document.fields.insert(field.key.clone(), text);
                continue;
            }
            let Some(position) = document.table_position(key) else {
                warn!(document = schema.id(), key = key.as_str(), "dropping unknown payload key");
                continue;
            };
            let Value::Array(rows) = value else {
                return Err(DocumentError::InvalidPayload {
                    key: key.clone(),
                    reason: "expected an array of rows".to_string(),
                });
            };
            seen_tables.insert(key.as_str());
            load_rows(&mut document.tables[position], rows)?;
        }

        for table in &mut document.tables {
            if seen_tables.contains(table.name().as_str()) {
                continue;
            }
            for _ in 0..table.schema().seed_rows() {
                table.add_row(std::iter::empty::<(&str, String)>());
            }
        }

        document.recompute();
        info!(document = schema.id(), "document restored from payload");
        Ok(document)
    }

    fn empty(schema: &DocumentSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| (field.key.clone(), String::new()))
            .collect();
        let tables = schema
            .tables
            .iter()
            .map(|table| DynamicTable::new(table.name.clone(), &table.label, table.schema.clone()))
            .collect();
        Self {
            schema: schema.clone(),
            fields,
            tables,
        }
    }

    pub fn id(&self) -> &str {
        self.schema.id()
    }

    pub fn schema(&self) -> &DocumentSchema {
        &self.schema
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Flat fields with their values, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&ColumnDef, &str)> {
        self.schema
            .fields
            .iter()
            .map(|field| (field, self.field(field.key.as_str()).unwrap_or("")))
    }

    pub fn tables(&self) -> &[DynamicTable] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&DynamicTable> {
        self.tables.iter().find(|table| table.name().as_str() == name)
    }

    /// Set a flat field. Aggregate outputs are computed and cannot be set.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<(), DocumentError> {
        let Some(field) = self.schema.fields.get(key) else {
            return Err(DocumentError::UnknownField(key.to_string()));
        };
        if self.schema.aggregate_for(key).is_some() {
            return Err(DocumentError::ComputedField(field.key.clone()));
        }
        let value = value.into();
        debug!(field = key, value = redact_value(&value), "field updated");
        self.fields.insert(field.key.clone(), value);
        Ok(())
    }

    /// Append a row to `table`; returns its position.
    pub fn add_row<I, K, V>(&mut self, table: &str, initial: I) -> Result<usize, DocumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let index = self.table_mut(table)?.add_row(initial);
        self.refresh_aggregates(table, None);
        Ok(index)
    }

    pub fn remove_row(&mut self, table: &str, index: usize) -> Result<(), DocumentError> {
        let target = self.table_mut(table)?;
        target.remove_row(index).map_err(|source| DocumentError::Table {
            table: target.name().clone(),
            source,
        })?;
        self.refresh_aggregates(table, None);
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        table: &str,
        index: usize,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let target = self.table_mut(table)?;
        let changed = target
            .set_cell(index, key, value)
            .map_err(|source| DocumentError::Table {
                table: target.name().clone(),
                source,
            })?;
        self.refresh_aggregates(table, Some(&changed));
        Ok(())
    }

    /// Add a user-defined column to `table`.
    ///
    /// `AlreadyExists` and `InvalidLabel` come back wrapped in
    /// [`DocumentError::Table`]; the table is unchanged in both cases.
    pub fn add_column(&mut self, table: &str, label: &str) -> Result<DynamicColumn, DocumentError> {
        let target = self.table_mut(table)?;
        target.add_column(label).map_err(|source| DocumentError::Table {
            table: target.name().clone(),
            source,
        })
    }

    /// Ask the host for a label and add the column. `Ok(None)` means the
    /// user cancelled.
    pub fn add_column_from<S>(
        &mut self,
        table: &str,
        source: &mut S,
    ) -> Result<Option<DynamicColumn>, DocumentError>
    where
        S: ColumnLabelSource + ?Sized,
    {
        if self.table_position(table).is_none() {
            return Err(DocumentError::UnknownTable(table.to_string()));
        }
        match source.request_column_label() {
            Some(label) => self.add_column(table, &label).map(Some),
            None => {
                debug!(table, "column label request cancelled");
                Ok(None)
            }
        }
    }

    /// Remove a user-defined column. Returns false if it does not exist.
    pub fn remove_column(&mut self, table: &str, key: &str) -> Result<bool, DocumentError> {
        Ok(self.table_mut(table)?.remove_column(key))
    }

    /// Recompute every derived cell and every aggregate.
    pub fn recompute(&mut self) {
        for table in &mut self.tables {
            table.recompute_all();
        }
        self.refresh_all_aggregates();
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        checks::run_all(self)
    }

    /// Current state as a payload, without validation.
    pub fn to_payload(&self) -> Payload {
        Payload::from_document(self)
    }

    /// Validate and, if clean, return the full payload.
    pub fn submit(&self) -> Result<Payload, ValidationFailed> {
        let issues = self.validate();
        if !issues.is_empty() {
            warn!(document = self.id(), issues = issues.len(), "submission blocked");
            return Err(ValidationFailed { issues });
        }
        Ok(self.to_payload())
    }

    /// [`Document::submit`], then hand the payload to `handler`. The handler
    /// is not called when validation fails.
    pub fn submit_with<H>(&self, handler: &mut H) -> Result<Payload, ValidationFailed>
    where
        H: SubmissionHandler + ?Sized,
    {
        let payload = self.submit()?;
        handler.handle(self.id(), &payload);
        Ok(payload)
    }

    fn table_position(&self, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|table| table.name().as_str() == name)
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut DynamicTable, DocumentError> {
        self.tables
            .iter_mut()
            .find(|table| table.name().as_str() == name)
            .ok_or_else(|| DocumentError::UnknownTable(name.to_string()))
    }

    /// Recompute the aggregates over `table` that can be affected by a
    /// change to `changed` (all of them when `None`).
    fn refresh_aggregates(&mut self, table: &str, changed: Option<&[ColumnKey]>) {
        let Some(source) = self.tables.iter().find(|t| t.name().as_str() == table) else {
            return;
        };
        for rule in &self.schema.aggregates {
            if rule.table.as_str() != table {
                continue;
            }
            let affected = changed.is_none_or(|keys| {
                keys.iter()
                    .any(|key| rule.depends_on(table, key.as_str()))
            });
            if affected {
                let total = derive::aggregate(rule, source.rows());
                self.fields.insert(rule.output.clone(), total);
            }
        }
    }

    fn refresh_all_aggregates(&mut self) {
        for rule in &self.schema.aggregates {
            let Some(source) = self.tables.iter().find(|t| t.name() == &rule.table) else {
                continue;
            };
            let total = derive::aggregate(rule, source.rows());
            self.fields.insert(rule.output.clone(), total);
        }
    }
}

fn load_rows(table: &mut DynamicTable, rows: &[Value]) -> Result<(), DocumentError> {
    for (index, row) in rows.iter().enumerate() {
        let Value::Object(cells) = row else {
            return Err(DocumentError::InvalidPayload {
                key: format!("{}[{index}]", table.name()),
                reason: "expected an object".to_string(),
            });
        };
        let mut initial = Vec::with_capacity(cells.len());
        for (column, cell) in cells {
            let text = scalar_to_string(&format!("{}[{index}].{column}", table.name()), cell)?;
            let key = if table.schema().contains(column) {
                column.clone()
            } else {
                match table.add_column(column) {
                    Ok(added) => added.key.to_string(),
                    Err(TableError::AlreadyExists(existing)) => existing.to_string(),
                    Err(error) => {
                        warn!(table = %table.name(), column = column.as_str(), %error, "skipping payload column");
                        continue;
                    }
                }
            };
            initial.push((key, text));
        }
        table.add_row(initial);
    }
    Ok(())
}
