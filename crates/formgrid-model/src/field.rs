//! Semantic field types.
//!
//! A field type governs how a value is checked at validation time. Values
//! are always stored as strings and entry is never blocked; a non-empty
//! value that does not conform is reported as an invalid format.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Accepted `Date` layout (`2024-03-31`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted `Time` layouts (`09:30`, `09:30:15`).
pub const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Time,
    /// Closed option list. Never empty.
    Select(Vec<String>),
    Textarea,
}

impl FieldType {
    /// Build a `Select` type, rejecting an empty option list.
    pub fn select<I, S>(options: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(ModelError::EmptySelectOptions);
        }
        Ok(FieldType::Select(options))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Select(_) => "select",
            FieldType::Textarea => "textarea",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number)
    }

    /// Options of a `Select` type, empty for every other type.
    pub fn options(&self) -> &[String] {
        match self {
            FieldType::Select(options) => options,
            _ => &[],
        }
    }

    /// Returns true if `value` is acceptable for this type.
    ///
    /// Blank values always conform; whether they are allowed is a
    /// required-field question, not a format question.
    pub fn conforms(&self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return true;
        }
        match self {
            FieldType::Text | FieldType::Textarea => true,
            FieldType::Number => trimmed.parse::<f64>().is_ok_and(f64::is_finite),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok(),
            FieldType::Time => TIME_FORMATS
                .iter()
                .any(|format| NaiveTime::parse_from_str(trimmed, format).is_ok()),
            FieldType::Select(options) => options.iter().any(|option| option == trimmed),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_requires_options() {
        assert_eq!(
            FieldType::select(Vec::<String>::new()),
            Err(ModelError::EmptySelectOptions)
        );
        let select = FieldType::select(["Yes", "No"]).unwrap();
        assert_eq!(select.options(), ["Yes".to_string(), "No".to_string()]);
    }

    #[test]
    fn number_conformance() {
        assert!(FieldType::Number.conforms("12.5"));
        assert!(FieldType::Number.conforms(" -3 "));
        assert!(FieldType::Number.conforms(""));
        assert!(!FieldType::Number.conforms("twelve"));
        assert!(!FieldType::Number.conforms("NaN"));
    }

    #[test]
    fn date_and_time_conformance() {
        assert!(FieldType::Date.conforms("2024-02-29"));
        assert!(!FieldType::Date.conforms("2023-02-29"));
        assert!(!FieldType::Date.conforms("29/02/2024"));
        assert!(FieldType::Time.conforms("09:30"));
        assert!(FieldType::Time.conforms("23:59:59"));
        assert!(!FieldType::Time.conforms("25:00"));
    }

    #[test]
    fn select_membership_is_exact() {
        let select = FieldType::select(["Yes", "No"]).unwrap();
        assert!(select.conforms("Yes"));
        assert!(!select.conforms("yes"));
        assert!(!select.conforms("Maybe"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&FieldType::select(["A"]).unwrap()).unwrap();
        assert_eq!(json, r#"{"kind":"select","options":["A"]}"#);
        let json = serde_json::to_string(&FieldType::Number).unwrap();
        assert_eq!(json, r#"{"kind":"number"}"#);
    }
}
