//! Derivation rule declarations.
//!
//! Rules are data: the evaluation lives in `formgrid_core::derive`. A
//! row-scoped [`DerivationRule`] is attached to the column it writes; a
//! document-scoped [`AggregateRule`] names the flat field it writes.

use serde::{Deserialize, Serialize};

use crate::{ColumnKey, ModelError, TableName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DerivationRule {
    /// `minuend - subtrahend`.
    Difference {
        minuend: ColumnKey,
        subtrahend: ColumnKey,
    },
    /// `left * right`.
    Product { left: ColumnKey, right: ColumnKey },
    /// `minuend - subtrahend`, blank when the result is negative.
    ClampedDifference {
        minuend: ColumnKey,
        subtrahend: ColumnKey,
    },
    /// Sum of several columns of the same row.
    Sum { inputs: Vec<ColumnKey> },
}

impl DerivationRule {
    pub fn difference(minuend: &str, subtrahend: &str) -> Result<Self, ModelError> {
        Ok(DerivationRule::Difference {
            minuend: ColumnKey::new(minuend)?,
            subtrahend: ColumnKey::new(subtrahend)?,
        })
    }

    pub fn product(left: &str, right: &str) -> Result<Self, ModelError> {
        Ok(DerivationRule::Product {
            left: ColumnKey::new(left)?,
            right: ColumnKey::new(right)?,
        })
    }

    pub fn clamped_difference(minuend: &str, subtrahend: &str) -> Result<Self, ModelError> {
        Ok(DerivationRule::ClampedDifference {
            minuend: ColumnKey::new(minuend)?,
            subtrahend: ColumnKey::new(subtrahend)?,
        })
    }

    pub fn sum<'a>(inputs: impl IntoIterator<Item = &'a str>) -> Result<Self, ModelError> {
        let inputs = inputs
            .into_iter()
            .map(ColumnKey::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DerivationRule::Sum { inputs })
    }

    /// Column keys this rule reads, in declaration order.
    pub fn inputs(&self) -> Vec<&ColumnKey> {
        match self {
            DerivationRule::Difference {
                minuend,
                subtrahend,
            }
            | DerivationRule::ClampedDifference {
                minuend,
                subtrahend,
            } => vec![minuend, subtrahend],
            DerivationRule::Product { left, right } => vec![left, right],
            DerivationRule::Sum { inputs } => inputs.iter().collect(),
        }
    }

    pub fn reads(&self, key: &str) -> bool {
        self.inputs().iter().any(|input| input.as_str() == key)
    }
}

/// Restricts an aggregate to the rows whose `column` matches `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowFilter {
    Equals { column: ColumnKey, value: String },
    NotEquals { column: ColumnKey, value: String },
}

impl RowFilter {
    pub fn equals(column: &str, value: impl Into<String>) -> Result<Self, ModelError> {
        Ok(RowFilter::Equals {
            column: ColumnKey::new(column)?,
            value: value.into(),
        })
    }

    pub fn not_equals(column: &str, value: impl Into<String>) -> Result<Self, ModelError> {
        Ok(RowFilter::NotEquals {
            column: ColumnKey::new(column)?,
            value: value.into(),
        })
    }

    pub fn column(&self) -> &ColumnKey {
        match self {
            RowFilter::Equals { column, .. } | RowFilter::NotEquals { column, .. } => column,
        }
    }

    /// Compares the trimmed cell against the filter value.
    pub fn matches(&self, cell: &str) -> bool {
        match self {
            RowFilter::Equals { value, .. } => cell.trim() == value,
            RowFilter::NotEquals { value, .. } => cell.trim() != value,
        }
    }
}

/// How a computed number is written back as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum NumberFormat {
    /// Shortest representation that round-trips (`10000`, `2.5`).
    Plain,
    /// Fixed number of decimals (`10.00`).
    Fixed { decimals: u8 },
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Fixed { decimals: 2 }
    }
}

impl NumberFormat {
    pub fn format(self, value: f64) -> String {
        // Avoid rendering "-0" / "-0.00" for results that cancel out.
        let value = if value == 0.0 { 0.0 } else { value };
        match self {
            NumberFormat::Plain => value.to_string(),
            NumberFormat::Fixed { decimals } => {
                format!("{value:.prec$}", prec = usize::from(decimals))
            }
        }
    }
}

/// Document-level roll-up of one table column into a flat field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRule {
    /// Flat field receiving the total.
    pub output: ColumnKey,
    pub table: TableName,
    /// Column summed across rows.
    pub column: ColumnKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<RowFilter>,
    #[serde(default)]
    pub format: NumberFormat,
}

impl AggregateRule {
    pub fn sum(output: &str, table: &str, column: &str) -> Result<Self, ModelError> {
        Ok(Self {
            output: ColumnKey::new(output)?,
            table: TableName::new(table)?,
            column: ColumnKey::new(column)?,
            filter: None,
            format: NumberFormat::default(),
        })
    }

    #[must_use]
    pub fn with_filter(mut self, filter: RowFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Returns true if a change to `key` in `table` can change this total.
    pub fn depends_on(&self, table: &str, key: &str) -> bool {
        self.table.as_str() == table
            && (self.column.as_str() == key
                || self
                    .filter
                    .as_ref()
                    .is_some_and(|filter| filter.column().as_str() == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_inputs_in_order() {
        let rule = DerivationRule::difference("grossWages", "deductions").unwrap();
        let inputs: Vec<&str> = rule.inputs().iter().map(|key| key.as_str()).collect();
        assert_eq!(inputs, ["grossWages", "deductions"]);
        assert!(rule.reads("deductions"));
        assert!(!rule.reads("netPay"));
    }

    #[test]
    fn number_format_styles() {
        assert_eq!(NumberFormat::Plain.format(10000.0), "10000");
        assert_eq!(NumberFormat::Plain.format(2.5), "2.5");
        assert_eq!(NumberFormat::default().format(10.0), "10.00");
        assert_eq!(NumberFormat::Fixed { decimals: 1 }.format(2.26), "2.3");
        assert_eq!(NumberFormat::default().format(-0.0), "0.00");
    }

    #[test]
    fn filter_matching_trims_cell() {
        let filter = RowFilter::equals("billable", "Yes").unwrap();
        assert!(filter.matches(" Yes "));
        assert!(!filter.matches("No"));
        let filter = RowFilter::not_equals("billable", "Yes").unwrap();
        assert!(filter.matches(""));
        assert!(!filter.matches("Yes"));
    }

    #[test]
    fn aggregate_dependencies_include_filter_column() {
        let rule = AggregateRule::sum("totalBillableHours", "entries", "hoursWorked")
            .unwrap()
            .with_filter(RowFilter::equals("billable", "Yes").unwrap());
        assert!(rule.depends_on("entries", "hoursWorked"));
        assert!(rule.depends_on("entries", "billable"));
        assert!(!rule.depends_on("entries", "notes"));
        assert!(!rule.depends_on("other", "hoursWorked"));
    }
}
