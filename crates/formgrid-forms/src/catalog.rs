//! Registry of every declared form.

use tracing::debug;

use formgrid_core::{DocumentSchema, SchemaError};

use crate::{access_card, leakage, meter, timesheet, wages};

#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: Vec<DocumentSchema>,
}

impl FormCatalog {
    /// Build every bundled form declaration.
    pub fn standard() -> Result<Self, SchemaError> {
        let forms = vec![
            access_card::schema()?,
            leakage::schema()?,
            meter::schema()?,
            timesheet::schema()?,
            wages::schema()?,
        ];
        debug!(count = forms.len(), "form catalog loaded");
        Ok(Self { forms })
    }

    pub fn forms(&self) -> &[DocumentSchema] {
        &self.forms
    }

    /// Find a form by id (case-insensitive).
    pub fn find(&self, id: &str) -> Option<&DocumentSchema> {
        let id = id.trim();
        self.forms
            .iter()
            .find(|form| form.id().eq_ignore_ascii_case(id))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.forms.iter().map(DocumentSchema::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_form_declaration_is_valid() {
        let catalog = FormCatalog::standard().expect("catalog");
        assert_eq!(catalog.forms().len(), 5);
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = FormCatalog::standard().expect("catalog");
        assert_eq!(catalog.find(" Wage-Register ").map(DocumentSchema::id), Some("wage-register"));
        assert!(catalog.find("unknown").is_none());
    }
}
