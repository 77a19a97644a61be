//! CSV export of a single table.

use std::io::Write;

use anyhow::{Context, Result};

use formgrid_core::DynamicTable;
use formgrid_model::ColumnKey;

/// Write every row of `table` as CSV: a header of column keys, then stored
/// values in column order (dynamic columns last).
pub fn write_table_csv<W: Write>(table: &DynamicTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let keys = table.column_keys();
    csv.write_record(keys.iter().map(ColumnKey::as_str))
        .context("write csv header")?;
    for row in table.rows() {
        csv.write_record(keys.iter().map(|key| row.get(key.as_str())))
            .with_context(|| format!("write csv row {}", row.id))?;
    }
    csv.flush().context("flush csv")?;
    Ok(())
}
