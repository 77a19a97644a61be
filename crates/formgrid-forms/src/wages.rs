//! Wage register.
//!
//! Gross wages are days worked times the daily rate; net pay is gross wages
//! less deductions. Both are recomputed per worker row and rolled up into
//! the register totals.

use formgrid_core::{DocumentSchema, RecordSchema, SchemaError, TableSchema};
use formgrid_model::{AggregateRule, DerivationRule};

use crate::columns::{date, number, text};

pub const ID: &str = "wage-register";
pub const WORKERS: &str = "workers";

pub fn schema() -> Result<DocumentSchema, SchemaError> {
    let fields = vec![
        text("siteName", "Site")?.required(),
        text("payPeriod", "Pay period")?.required(),
        text("contractor", "Contractor")?,
        number("totalGross", "Total gross wages")?,
        number("totalDeductions", "Total deductions")?,
        number("totalNet", "Total net pay")?,
        text("preparedBy", "Prepared by")?,
        date("preparedOn", "Prepared on")?,
    ];

    let workers = RecordSchema::new(vec![
        text("workerName", "Worker")?.required(),
        text("designation", "Designation")?,
        number("daysWorked", "Days worked")?.required(),
        number("ratePerDay", "Rate per day")?.required(),
        number("grossWages", "Gross wages")?
            .derived(DerivationRule::product("daysWorked", "ratePerDay")?),
        number("deductions", "Deductions")?,
        number("netPay", "Net pay")?
            .derived(DerivationRule::difference("grossWages", "deductions")?),
    ])?;

    let aggregates = vec![
        AggregateRule::sum("totalGross", WORKERS, "grossWages")?,
        AggregateRule::sum("totalDeductions", WORKERS, "deductions")?,
        AggregateRule::sum("totalNet", WORKERS, "netPay")?,
    ];

    DocumentSchema::new(
        ID,
        "Wage Register",
        fields,
        vec![TableSchema::new(WORKERS, "Workers", workers)?],
        aggregates,
    )
}
