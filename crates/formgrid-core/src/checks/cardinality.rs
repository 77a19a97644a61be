//! Minimum row counts.

use formgrid_model::ValidationIssue;

use crate::Document;

pub fn check(document: &Document) -> Vec<ValidationIssue> {
    document
        .tables()
        .iter()
        .filter(|table| table.len() < table.schema().min_rows())
        .map(|table| {
            ValidationIssue::min_items(
                table.name().clone(),
                table.label(),
                table.schema().min_rows(),
                table.len(),
            )
        })
        .collect()
}
