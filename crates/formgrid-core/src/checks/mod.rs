//! Validation check modules.
//!
//! Each module performs one kind of check over a whole document.

mod cardinality;
mod format;
mod required;

use formgrid_model::ValidationIssue;

use crate::Document;

/// Run all validation checks on a document.
pub fn run_all(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // 1. Required flat fields and required row cells
    issues.extend(required::check(document));

    // 2. Values that do not fit their field type or option list
    issues.extend(format::check(document));

    // 3. Tables below their declared minimum row count
    issues.extend(cardinality::check(document));

    issues
}
