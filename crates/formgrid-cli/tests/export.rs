//! CSV export and terminal rendering of documents.

use formgrid_cli::export::write_table_csv;
use formgrid_cli::render::{forms_table, issues_table};
use formgrid_core::Document;
use formgrid_forms::{FormCatalog, meter};
use insta::assert_snapshot;

fn meter_sheet() -> Document {
    let catalog = FormCatalog::standard().unwrap();
    let mut document = Document::new(catalog.find(meter::ID).unwrap());
    for (key, value) in [
        ("meterId", "M-01"),
        ("location", "Pump house, north"),
        ("openingReading", "1000"),
        ("closingReading", "1180"),
        ("unit", "kWh"),
    ] {
        document.set_cell(meter::READINGS, 0, key, value).unwrap();
    }
    document
        .add_row(
            meter::READINGS,
            [
                ("meterId", "M-02"),
                ("openingReading", "900"),
                ("closingReading", "40"),
            ],
        )
        .unwrap();
    document
}

#[test]
fn csv_lists_fixed_then_dynamic_columns() {
    let mut document = meter_sheet();
    document.add_column(meter::READINGS, "Seal Number").unwrap();
    document
        .set_cell(meter::READINGS, 1, "SealNumber", "S-77")
        .unwrap();

    let mut out = Vec::new();
    write_table_csv(document.table(meter::READINGS).unwrap(), &mut out).unwrap();
    let csv = String::from_utf8(out).unwrap();
    assert_snapshot!(csv, @r#"
    meterId,location,openingReading,closingReading,consumption,unit,SealNumber
    M-01,"Pump house, north",1000,1180,180,kWh,
    M-02,,900,40,,,S-77
    "#);
}

#[test]
fn tables_render_without_panicking() {
    let catalog = FormCatalog::standard().unwrap();
    let listing = forms_table(catalog.forms()).to_string();
    assert!(listing.contains(meter::ID));

    let issues = meter_sheet().validate();
    assert!(!issues.is_empty());
    let rendered = issues_table(&issues).to_string();
    assert!(rendered.contains("siteName"));
}
