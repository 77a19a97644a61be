//! Key / access card issue request.

use formgrid_core::{DocumentSchema, RecordSchema, SchemaError, TableSchema};

use crate::columns::{YES_NO, date, select, text, textarea, time};

pub const ID: &str = "access-card-request";
pub const CHECKLIST: &str = "checklist";

pub fn schema() -> Result<DocumentSchema, SchemaError> {
    let fields = vec![
        text("requesterName", "Requester name")?.required(),
        text("employeeId", "Employee ID")?.required(),
        text("department", "Department")?.required(),
        select("cardType", "Card type", &["New", "Replacement", "Temporary"])?.required(),
        select("accessLevel", "Access level", &["General", "Restricted", "All Areas"])?.required(),
        date("requestDate", "Request date")?.required(),
        time("requestTime", "Request time")?,
        date("validUntil", "Valid until")?,
        textarea("justification", "Justification")?.required(),
        text("approverName", "Approver")?,
    ];

    let checklist = RecordSchema::new(vec![
        text("item", "Item")?.required(),
        select("completed", "Completed", YES_NO)?,
    ])?
    .with_min_rows(1);

    DocumentSchema::new(
        ID,
        "Key/Access Card Issue Request",
        fields,
        vec![TableSchema::new(CHECKLIST, "Checklist", checklist)?],
        Vec::new(),
    )
}
