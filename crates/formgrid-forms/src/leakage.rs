//! Revenue leakage check.

use formgrid_core::{DocumentSchema, RecordSchema, SchemaError, TableSchema};
use formgrid_model::{AggregateRule, DerivationRule};

use crate::columns::{date, number, select, text, textarea};

pub const ID: &str = "revenue-leakage";
pub const ITEMS: &str = "items";

pub fn schema() -> Result<DocumentSchema, SchemaError> {
    let fields = vec![
        text("auditReference", "Audit reference")?.required(),
        text("businessUnit", "Business unit")?.required(),
        date("assessmentDate", "Assessment date")?.required(),
        text("assessor", "Assessor")?,
        number("totalEstimatedImpact", "Total estimated impact")?,
        textarea("conclusion", "Conclusion")?,
    ];

    let items = RecordSchema::new(vec![
        text("area", "Area")?.required(),
        textarea("description", "Description")?,
        number("baseline", "Baseline")?,
        number("scenario", "Scenario")?,
        number("variance", "Variance")?.derived(DerivationRule::difference("scenario", "baseline")?),
        number("estimatedImpact", "Estimated impact")?,
        select("riskLevel", "Risk level", &["Low", "Medium", "High"])?,
    ])?
    .with_min_rows(1);

    DocumentSchema::new(
        ID,
        "Revenue Leakage Check",
        fields,
        vec![TableSchema::new(ITEMS, "Assessment items", items)?],
        vec![AggregateRule::sum("totalEstimatedImpact", ITEMS, "estimatedImpact")?],
    )
}
