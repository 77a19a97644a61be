//! Required-field checks.

use formgrid_model::{IssueLocation, ValidationIssue};

use crate::Document;

/// Blank required flat fields, then blank required cells table by table.
pub fn check(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in document.schema().fields().iter() {
        if !field.required {
            continue;
        }
        let value = document.field(field.key.as_str()).unwrap_or("");
        if value.trim().is_empty() {
            issues.push(ValidationIssue::missing_required(
                IssueLocation::Field {
                    key: field.key.clone(),
                },
                &field.label,
            ));
        }
    }

    for table in document.tables() {
        let required: Vec<_> = table
            .schema()
            .columns()
            .iter()
            .filter(|column| column.required)
            .collect();
        for (index, row) in table.rows().iter().enumerate() {
            for column in &required {
                if row.get(column.key.as_str()).trim().is_empty() {
                    issues.push(ValidationIssue::missing_required(
                        IssueLocation::Cell {
                            table: table.name().clone(),
                            row: index,
                            column: column.key.clone(),
                        },
                        &column.label,
                    ));
                }
            }
        }
    }

    issues
}
