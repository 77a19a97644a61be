use thiserror::Error;

use formgrid_model::{ColumnKey, ModelError, TableName, ValidationIssue};

/// A schema declaration that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("derived column {0} reads its own value")]
    SelfReference(ColumnKey),
    #[error("derived column {column} reads unknown column {input}")]
    UnknownInput { column: ColumnKey, input: ColumnKey },
    #[error("derivation cycle between columns: {}", join_keys(.0))]
    DerivationCycle(Vec<ColumnKey>),
    #[error("flat field {0} cannot carry a row derivation")]
    DerivedFlatField(ColumnKey),
    #[error("aggregate {output} targets unknown field")]
    UnknownAggregateOutput { output: ColumnKey },
    #[error("aggregate {output} reads unknown table {table}")]
    UnknownAggregateTable { output: ColumnKey, table: TableName },
    #[error("aggregate {output} reads unknown column {table}.{column}")]
    UnknownAggregateColumn {
        output: ColumnKey,
        table: TableName,
        column: ColumnKey,
    },
    #[error("field {0} is written by more than one aggregate")]
    DuplicateAggregate(ColumnKey),
}

/// Errors from dynamic table operations.
///
/// `OutOfRange` and `UnknownColumn` mean the caller addressed something that
/// does not exist. `DerivedColumn` marks an edit to a computed cell.
/// `AlreadyExists` and `InvalidLabel` are user-facing. All of them leave the
/// table untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {index} out of range (table has {len} rows)")]
    OutOfRange { index: usize, len: usize },
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("column {0} already exists")]
    AlreadyExists(ColumnKey),
    #[error("column label {0:?} is empty after removing whitespace")]
    InvalidLabel(String),
    #[error("column {0} is derived and cannot be edited")]
    DerivedColumn(ColumnKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {0} is computed from table rows and cannot be set")]
    ComputedField(ColumnKey),
    #[error("table {table}: {source}")]
    Table {
        table: TableName,
        #[source]
        source: TableError,
    },
    #[error("invalid payload at {key}: {reason}")]
    InvalidPayload { key: String, reason: String },
}

/// Submission was blocked by validation issues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed with {} issue(s)", issues.len())]
pub struct ValidationFailed {
    pub issues: Vec<ValidationIssue>,
}

fn join_keys(keys: &[ColumnKey]) -> String {
    keys.iter()
        .map(ColumnKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
