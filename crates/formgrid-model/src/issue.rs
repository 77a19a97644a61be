//! Validation issue types.
//!
//! Issues are values returned from validation. They never interrupt
//! editing; the host renders them next to the offending field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ColumnKey, TableName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required flat field or row cell is blank.
    MissingRequired,
    /// A value does not conform to its field type or option list.
    InvalidFormat,
    /// A table holds fewer rows than it declares as a minimum.
    MinItems { min: usize, actual: usize },
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "Missing required",
            ErrorKind::InvalidFormat => "Invalid format",
            ErrorKind::MinItems { .. } => "Too few rows",
        }
    }
}

/// Where an issue applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueLocation {
    Field {
        key: ColumnKey,
    },
    Cell {
        table: TableName,
        row: usize,
        column: ColumnKey,
    },
    Table {
        table: TableName,
    },
}

impl IssueLocation {
    /// Path-style key (`period`, `entries[2].hoursWorked`, `entries`).
    pub fn field_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLocation::Field { key } => write!(f, "{key}"),
            IssueLocation::Cell { table, row, column } => write!(f, "{table}[{row}].{column}"),
            IssueLocation::Table { table } => write!(f, "{table}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub location: IssueLocation,
    pub kind: ErrorKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn missing_required(location: IssueLocation, label: &str) -> Self {
        Self {
            message: format!("{label} is required"),
            location,
            kind: ErrorKind::MissingRequired,
        }
    }

    pub fn invalid_format(location: IssueLocation, label: &str, expected: &str) -> Self {
        Self {
            message: format!("{label} must be a valid {expected}"),
            location,
            kind: ErrorKind::InvalidFormat,
        }
    }

    pub fn min_items(table: TableName, label: &str, min: usize, actual: usize) -> Self {
        let noun = if min == 1 { "row" } else { "rows" };
        Self {
            message: format!("{label} needs at least {min} {noun}, found {actual}"),
            location: IssueLocation::Table { table },
            kind: ErrorKind::MinItems { min, actual },
        }
    }

    pub fn field_key(&self) -> String {
        self.location.field_key()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}
