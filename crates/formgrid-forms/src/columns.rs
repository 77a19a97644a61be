//! Shorthand constructors for form declarations.

use formgrid_model::{ColumnDef, FieldType, ModelError};

pub(crate) fn text(key: &str, label: &str) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::Text)
}

pub(crate) fn textarea(key: &str, label: &str) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::Textarea)
}

pub(crate) fn number(key: &str, label: &str) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::Number)
}

pub(crate) fn date(key: &str, label: &str) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::Date)
}

pub(crate) fn time(key: &str, label: &str) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::Time)
}

pub(crate) fn select(key: &str, label: &str, options: &[&str]) -> Result<ColumnDef, ModelError> {
    ColumnDef::new(key, label, FieldType::select(options.iter().copied())?)
}

pub(crate) const YES_NO: &[&str] = &["Yes", "No"];
