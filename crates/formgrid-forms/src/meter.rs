//! Meter reading / measurement sheet.

use formgrid_core::{DocumentSchema, RecordSchema, SchemaError, TableSchema};
use formgrid_model::{AggregateRule, DerivationRule};

use crate::columns::{date, number, text, textarea};

pub const ID: &str = "meter-readings";
pub const READINGS: &str = "readings";

pub fn schema() -> Result<DocumentSchema, SchemaError> {
    let fields = vec![
        text("siteName", "Site")?.required(),
        date("readingDate", "Reading date")?.required(),
        text("recordedBy", "Recorded by")?,
        number("totalConsumption", "Total consumption")?,
        textarea("remarks", "Remarks")?,
    ];

    // A closing reading below the opening one usually means the meter rolled
    // over; consumption is left blank for the user to resolve.
    let readings = RecordSchema::new(vec![
        text("meterId", "Meter")?.required(),
        text("location", "Location")?,
        number("openingReading", "Opening reading")?.required(),
        number("closingReading", "Closing reading")?.required(),
        number("consumption", "Consumption")?.derived(DerivationRule::clamped_difference(
            "closingReading",
            "openingReading",
        )?),
        text("unit", "Unit")?,
    ])?;

    DocumentSchema::new(
        ID,
        "Meter Reading Sheet",
        fields,
        vec![TableSchema::new(READINGS, "Readings", readings)?],
        vec![AggregateRule::sum("totalConsumption", READINGS, "consumption")?],
    )
}
