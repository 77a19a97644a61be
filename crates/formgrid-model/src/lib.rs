//! Data model for structured form documents.
//!
//! A document is a set of flat fields plus zero or more dynamic tables. This
//! crate only holds the plain data types; the engine that mutates and
//! validates documents lives in `formgrid-core`.

pub mod column;
pub mod derivation;
pub mod error;
pub mod field;
pub mod ids;
pub mod issue;
pub mod row;

pub use column::{ColumnDef, DynamicColumn};
pub use derivation::{AggregateRule, DerivationRule, NumberFormat, RowFilter};
pub use error::{ModelError, Result};
pub use field::FieldType;
pub use ids::{ColumnKey, RowId, TableName};
pub use issue::{ErrorKind, IssueLocation, ValidationIssue};
pub use row::Row;
