//! Derivation engine.
//!
//! Row-scoped rules read cells of one row and write one cell of the same
//! row. Aggregates read one column across every row of a table and write a
//! flat field. Evaluation never fails: blank or unparseable inputs count as
//! zero.
//!
//! Recomputation is driven by edits (a cell was written, a row was added or
//! removed), never by reads.

use formgrid_model::{AggregateRule, ColumnKey, DerivationRule, FieldType, NumberFormat, Row};

use crate::schema::RecordSchema;

/// Permissive numeric parse: blank, non-numeric and non-finite input is 0.
pub fn parse_number(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}

/// Evaluate a row-scoped rule against the current cells of `row`.
///
/// A row where every input is blank yields a blank result, so fresh rows
/// stay empty until the user enters something.
pub fn evaluate(rule: &DerivationRule, row: &Row) -> String {
    let inputs = rule.inputs();
    if inputs.iter().all(|key| row.get(key.as_str()).trim().is_empty()) {
        return String::new();
    }
    let value = |key: &ColumnKey| parse_number(row.get(key.as_str()));
    let result = match rule {
        DerivationRule::Difference {
            minuend,
            subtrahend,
        } => value(minuend) - value(subtrahend),
        DerivationRule::Product { left, right } => value(left) * value(right),
        DerivationRule::ClampedDifference {
            minuend,
            subtrahend,
        } => {
            let difference = value(minuend) - value(subtrahend);
            if difference < 0.0 {
                return String::new();
            }
            difference
        }
        DerivationRule::Sum { inputs } => inputs.iter().map(value).sum(),
    };
    NumberFormat::Plain.format(result)
}

/// Recompute the derived cells of `row`.
///
/// With `changed = Some(key)` only columns depending on `key` are
/// evaluated; with `None` every derived column is. Returns the keys whose
/// stored value changed.
pub fn recompute_row(
    schema: &RecordSchema,
    row: &mut Row,
    changed: Option<&str>,
) -> Vec<ColumnKey> {
    let columns = match changed {
        Some(key) => schema.affected_by(key),
        None => schema.derived_columns().collect(),
    };
    let mut updated = Vec::new();
    for column in columns {
        let Some(rule) = &column.derived else {
            continue;
        };
        let value = evaluate(rule, row);
        if row.get(column.key.as_str()) != value || !row.contains(column.key.as_str()) {
            row.set(column.key.clone(), value);
            updated.push(column.key.clone());
        }
    }
    updated
}

/// Sum `rule.column` over the rows matching `rule.filter`.
pub fn aggregate<'a>(rule: &AggregateRule, rows: impl IntoIterator<Item = &'a Row>) -> String {
    let total: f64 = rows
        .into_iter()
        .filter(|row| {
            rule.filter
                .as_ref()
                .is_none_or(|filter| filter.matches(row.get(filter.column().as_str())))
        })
        .map(|row| parse_number(row.get(rule.column.as_str())))
        .sum();
    rule.format.format(total)
}

/// Read-only rendering of a stored value: numbers get two decimals, blanks
/// and non-numeric text are shown as stored.
pub fn format_display(value: &str, field_type: &FieldType) -> String {
    let trimmed = value.trim();
    if !field_type.is_numeric() || trimmed.is_empty() {
        return value.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => NumberFormat::Fixed { decimals: 2 }.format(number),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use formgrid_model::{RowFilter, RowId};

    use super::*;

    fn row(cells: &[(&str, &str)]) -> Row {
        let mut row = Row::new(RowId::new(1));
        for (key, value) in cells {
            row.set(ColumnKey::new(*key).unwrap(), *value);
        }
        row
    }

    #[test]
    fn permissive_parsing() {
        assert_eq!(parse_number(" 12.5 "), 12.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
    }

    #[test]
    fn difference_and_product() {
        let row = row(&[("daysWorked", "20"), ("ratePerDay", "500"), ("deductions", "")]);
        let gross = DerivationRule::product("daysWorked", "ratePerDay").unwrap();
        assert_eq!(evaluate(&gross, &row), "10000");
        let variance = DerivationRule::difference("deductions", "daysWorked").unwrap();
        assert_eq!(evaluate(&variance, &row), "-20");
    }

    #[test]
    fn non_numeric_input_counts_as_zero() {
        let row = row(&[("baseline", "n/a"), ("scenario", "40")]);
        let rule = DerivationRule::difference("scenario", "baseline").unwrap();
        assert_eq!(evaluate(&rule, &row), "40");
    }

    #[test]
    fn all_blank_inputs_give_blank() {
        let row = row(&[]);
        let rule = DerivationRule::sum(["a", "b"]).unwrap();
        assert_eq!(evaluate(&rule, &row), "");
    }

    #[test]
    fn negative_consumption_is_blank() {
        let rule = DerivationRule::clamped_difference("closingReading", "openingReading").unwrap();
        let rollover = row(&[("openingReading", "100"), ("closingReading", "40")]);
        assert_eq!(evaluate(&rule, &rollover), "");
        let normal = row(&[("openingReading", "40"), ("closingReading", "100.5")]);
        assert_eq!(evaluate(&rule, &normal), "60.5");
        let flat = row(&[("openingReading", "40"), ("closingReading", "40")]);
        assert_eq!(evaluate(&rule, &flat), "0");
    }

    #[test]
    fn filtered_aggregate() {
        let rows = [
            row(&[("hoursWorked", "8"), ("billable", "Yes")]),
            row(&[("hoursWorked", "2"), ("billable", "No")]),
            row(&[("hoursWorked", "x"), ("billable", "Yes")]),
        ];
        let total = AggregateRule::sum("totalHours", "entries", "hoursWorked").unwrap();
        assert_eq!(aggregate(&total, &rows), "10.00");
        let billable = total
            .clone()
            .with_filter(RowFilter::equals("billable", "Yes").unwrap());
        assert_eq!(aggregate(&billable, &rows), "8.00");
        assert_eq!(aggregate(&total, &Vec::<Row>::new()), "0.00");
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format_display("10000", &FieldType::Number), "10000.00");
        assert_eq!(format_display("", &FieldType::Number), "");
        assert_eq!(format_display("abc", &FieldType::Number), "abc");
        assert_eq!(format_display("10000", &FieldType::Text), "10000");
    }
}
