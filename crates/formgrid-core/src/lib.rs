//! Document engine for forms with dynamic tables.
//!
//! - **registry**: flat field lookup (type, required flag)
//! - **schema**: fixed + user-added columns of a table, derivation order
//! - **table**: the dynamic table store (rows, cells, dynamic columns)
//! - **derive**: row-scoped derivations and document-scoped aggregates
//! - **document**: flat fields + tables, validation, submit
//! - **checks**: required / format / cardinality validation passes
//!
//! Everything here is synchronous and single-owner: a [`Document`] is
//! mutated by one host through `&mut self` and every operation completes
//! before it returns.

pub mod checks;
pub mod derive;
pub mod document;
pub mod error;
pub mod host;
pub mod payload;
pub mod redact;
pub mod registry;
pub mod schema;
pub mod submit;
pub mod table;

pub use document::{Document, DocumentSchema, TableSchema};
pub use error::{DocumentError, SchemaError, TableError, ValidationFailed};
pub use host::ColumnLabelSource;
pub use payload::Payload;
pub use registry::FieldRegistry;
pub use schema::RecordSchema;
pub use submit::{LogSubmission, SubmissionHandler};
pub use table::DynamicTable;
