//! Flat field registry.

use std::collections::BTreeMap;

use formgrid_model::{ColumnDef, ColumnKey, FieldType};

use crate::SchemaError;

/// Declared flat (non-tabular) fields of a document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<ColumnDef>,
    index: BTreeMap<ColumnKey, usize>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        let mut index = BTreeMap::new();
        for (position, field) in fields.iter().enumerate() {
            if field.derived.is_some() {
                return Err(SchemaError::DerivedFlatField(field.key.clone()));
            }
            if index.insert(field.key.clone(), position).is_some() {
                return Err(SchemaError::DuplicateKey(field.key.to_string()));
            }
        }
        Ok(Self { fields, index })
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef> {
        self.index.get(key).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Field type of a registered key.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not registered. Form declarations are static, so
    /// an unknown key here is a programming error.
    pub fn type_of(&self, key: &str) -> &FieldType {
        match self.get(key) {
            Some(field) => &field.field_type,
            None => panic!("field {key:?} is not registered"),
        }
    }

    /// Required flag of a registered key.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not registered.
    pub fn is_required(&self, key: &str) -> bool {
        match self.get(key) {
            Some(field) => field.required,
            None => panic!("field {key:?} is not registered"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
