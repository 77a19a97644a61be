//! Timesheet submission.

use formgrid_core::{DocumentSchema, RecordSchema, SchemaError, TableSchema};
use formgrid_model::{AggregateRule, RowFilter};

use crate::columns::{YES_NO, date, number, select, text, textarea};

pub const ID: &str = "timesheet";
pub const ENTRIES: &str = "entries";

pub fn schema() -> Result<DocumentSchema, SchemaError> {
    let fields = vec![
        text("employeeName", "Employee name")?.required(),
        text("employeeId", "Employee ID")?.required(),
        text("department", "Department")?,
        date("periodStart", "Period start")?.required(),
        date("periodEnd", "Period end")?.required(),
        number("totalHours", "Total hours")?,
        number("totalBillableHours", "Total billable hours")?,
        number("nonBillableHours", "Non-billable hours")?,
        text("supervisorName", "Supervisor")?,
        date("approvalDate", "Approval date")?,
        textarea("comments", "Comments")?,
    ];

    let entries = RecordSchema::new(vec![
        date("date", "Date")?.required(),
        text("project", "Project")?.required(),
        text("task", "Task")?,
        number("hoursWorked", "Hours worked")?.required(),
        select("billable", "Billable", YES_NO)?,
        textarea("notes", "Notes")?,
    ])?
    .with_min_rows(1);

    let aggregates = vec![
        AggregateRule::sum("totalHours", ENTRIES, "hoursWorked")?,
        AggregateRule::sum("totalBillableHours", ENTRIES, "hoursWorked")?
            .with_filter(RowFilter::equals("billable", "Yes")?),
        AggregateRule::sum("nonBillableHours", ENTRIES, "hoursWorked")?
            .with_filter(RowFilter::not_equals("billable", "Yes")?),
    ];

    DocumentSchema::new(
        ID,
        "Timesheet Submission",
        fields,
        vec![TableSchema::new(ENTRIES, "Time entries", entries)?],
        aggregates,
    )
}
