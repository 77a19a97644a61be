use serde::{Deserialize, Serialize};

use crate::{ColumnKey, DerivationRule, FieldType, ModelError};

/// A fixed column of a table, or a flat field of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: ColumnKey,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivationRule>,
    #[serde(default)]
    pub required: bool,
}

impl ColumnDef {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            key: ColumnKey::new(key)?,
            label: label.into(),
            field_type,
            derived: None,
            required: false,
        })
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn derived(mut self, rule: DerivationRule) -> Self {
        self.derived = Some(rule);
        self
    }

    pub fn is_derived(&self) -> bool {
        self.derived.is_some()
    }
}

/// A column added by the user at run time.
///
/// Dynamic columns are always free text and never derived. Richer typing
/// would be a deliberate extension of the table model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicColumn {
    pub key: ColumnKey,
    pub label: String,
}

impl DynamicColumn {
    /// Create a dynamic column whose key is the label with whitespace removed.
    pub fn from_label(label: &str) -> Result<Self, ModelError> {
        Ok(Self {
            key: ColumnKey::from_label(label)?,
            label: label.trim().to_string(),
        })
    }

    pub fn to_column_def(&self) -> ColumnDef {
        ColumnDef {
            key: self.key.clone(),
            label: self.label.clone(),
            field_type: FieldType::Text,
            derived: None,
            required: false,
        }
    }
}
