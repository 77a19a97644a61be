//! Submission payload.
//!
//! The payload mirrors the document shape: every flat field as a string,
//! every table as an array of row objects with fixed columns first and
//! dynamic columns after them. Key order is preserved through JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Document, DocumentError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn from_document(document: &Document) -> Self {
        let mut map = Map::new();
        for field in document.schema().fields().iter() {
            let value = document.field(field.key.as_str()).unwrap_or("");
            map.insert(field.key.to_string(), Value::String(value.to_string()));
        }
        for table in document.tables() {
            let keys = table.column_keys();
            let rows = table
                .rows()
                .iter()
                .map(|row| {
                    let cells: Map<String, Value> = keys
                        .iter()
                        .map(|key| {
                            (
                                key.to_string(),
                                Value::String(row.get(key.as_str()).to_string()),
                            )
                        })
                        .collect();
                    Value::Object(cells)
                })
                .collect();
            map.insert(table.name().to_string(), Value::Array(rows));
        }
        Self(map)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Rows of a table entry, if `key` holds an array.
    pub fn rows(&self, key: &str) -> Option<&[Value]> {
        self.0.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Convert a payload scalar to its stored string form.
///
/// Strings are kept as-is, numbers and booleans use their JSON text, null
/// is blank. Arrays and objects are not scalars.
pub(crate) fn scalar_to_string(key: &str, value: &Value) -> Result<String, DocumentError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(DocumentError::InvalidPayload {
            key: key.to_string(),
            reason: "expected a scalar value".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_become_strings() {
        assert_eq!(scalar_to_string("a", &json!("x")).unwrap(), "x");
        assert_eq!(scalar_to_string("a", &json!(20)).unwrap(), "20");
        assert_eq!(scalar_to_string("a", &json!(2.5)).unwrap(), "2.5");
        assert_eq!(scalar_to_string("a", &json!(true)).unwrap(), "true");
        assert_eq!(scalar_to_string("a", &json!(null)).unwrap(), "");
        assert!(matches!(
            scalar_to_string("a", &json!([1])),
            Err(DocumentError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn payload_json_must_be_an_object() {
        assert!(Payload::from_json("[1, 2]").is_err());
        let payload = Payload::from_json(r#"{"b": "1", "a": []}"#).unwrap();
        let keys: Vec<&str> = payload.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(payload.rows("a").map(<[Value]>::len), Some(0));
    }
}
