//! Business form declarations.
//!
//! Each form is a thin declaration (flat fields, tables, aggregates) consumed
//! by the generic document engine in `formgrid-core`:
//!
//! - **timesheet**: timesheet submission with billable-hour totals
//! - **wages**: wage register with gross/net pay per worker
//! - **meter**: meter reading / measurement sheet with consumption
//! - **leakage**: revenue leakage check with variance per item
//! - **access_card**: key/access card issue request

pub mod access_card;
pub mod catalog;
mod columns;
pub mod leakage;
pub mod meter;
pub mod timesheet;
pub mod wages;

pub use catalog::FormCatalog;
