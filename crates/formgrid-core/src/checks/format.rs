//! Field type conformance (numbers, dates, times, select options).

use formgrid_model::{FieldType, IssueLocation, ValidationIssue};

use crate::Document;

pub fn check(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in document.schema().fields().iter() {
        let value = document.field(field.key.as_str()).unwrap_or("");
        if !field.field_type.conforms(value) {
            issues.push(ValidationIssue::invalid_format(
                IssueLocation::Field {
                    key: field.key.clone(),
                },
                &field.label,
                &expected(&field.field_type),
            ));
        }
    }

    // Dynamic columns are free text and always conform.
    for table in document.tables() {
        for (index, row) in table.rows().iter().enumerate() {
            for column in table.schema().columns() {
                if column.field_type.conforms(row.get(column.key.as_str())) {
                    continue;
                }
                issues.push(ValidationIssue::invalid_format(
                    IssueLocation::Cell {
                        table: table.name().clone(),
                        row: index,
                        column: column.key.clone(),
                    },
                    &column.label,
                    &expected(&column.field_type),
                ));
            }
        }
    }

    issues
}

fn expected(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Select(options) => format!("choice ({})", options.join(", ")),
        FieldType::Date => "date (YYYY-MM-DD)".to_string(),
        FieldType::Time => "time (HH:MM)".to_string(),
        other => other.as_str().to_string(),
    }
}
