//! Integration tests for document assembly: aggregates, validation, submit
//! and payload round trips.

use formgrid_core::{
    Document, DocumentError, DocumentSchema, Payload, RecordSchema, SchemaError, TableError,
    TableSchema,
};
use formgrid_model::{
    AggregateRule, ColumnDef, DerivationRule, ErrorKind, FieldType, IssueLocation, RowFilter,
};

fn wage_schema() -> DocumentSchema {
    let number = |key: &str| ColumnDef::new(key, key, FieldType::Number).unwrap();
    let workers = RecordSchema::new(vec![
        ColumnDef::new("workerName", "Worker", FieldType::Text).unwrap(),
        number("daysWorked"),
        number("ratePerDay"),
        number("grossWages").derived(DerivationRule::product("daysWorked", "ratePerDay").unwrap()),
        number("deductions"),
        number("netPay").derived(DerivationRule::difference("grossWages", "deductions").unwrap()),
    ])
    .unwrap();
    DocumentSchema::new(
        "wages",
        "Wages",
        vec![
            ColumnDef::new("site", "Site", FieldType::Text)
                .unwrap()
                .required(),
            number("totalGross"),
            number("totalDeductions"),
            number("totalNet"),
        ],
        vec![TableSchema::new("workers", "Workers", workers).unwrap()],
        vec![
            AggregateRule::sum("totalGross", "workers", "grossWages").unwrap(),
            AggregateRule::sum("totalDeductions", "workers", "deductions").unwrap(),
            AggregateRule::sum("totalNet", "workers", "netPay").unwrap(),
        ],
    )
    .unwrap()
}

fn timesheet_schema() -> DocumentSchema {
    let entries = RecordSchema::new(vec![
        ColumnDef::new("hoursWorked", "Hours", FieldType::Number).unwrap(),
        ColumnDef::new("billable", "Billable", FieldType::select(["Yes", "No"]).unwrap()).unwrap(),
    ])
    .unwrap()
    .with_min_rows(1);
    let number = |key: &str| ColumnDef::new(key, key, FieldType::Number).unwrap();
    DocumentSchema::new(
        "timesheet",
        "Timesheet",
        vec![
            number("totalHours"),
            number("totalBillableHours"),
            number("nonBillableHours"),
        ],
        vec![TableSchema::new("entries", "Entries", entries).unwrap()],
        vec![
            AggregateRule::sum("totalHours", "entries", "hoursWorked").unwrap(),
            AggregateRule::sum("totalBillableHours", "entries", "hoursWorked")
                .unwrap()
                .with_filter(RowFilter::equals("billable", "Yes").unwrap()),
            AggregateRule::sum("nonBillableHours", "entries", "hoursWorked")
                .unwrap()
                .with_filter(RowFilter::not_equals("billable", "Yes").unwrap()),
        ],
    )
    .unwrap()
}

fn fill_wages(document: &mut Document) {
    let rows = [("20", "500", "1000"), ("15", "600", "500")];
    for (index, (days, rate, deductions)) in rows.into_iter().enumerate() {
        if index >= document.table("workers").unwrap().len() {
            document
                .add_row("workers", Vec::<(&str, &str)>::new())
                .unwrap();
        }
        document.set_cell("workers", index, "daysWorked", days).unwrap();
        document.set_cell("workers", index, "ratePerDay", rate).unwrap();
        document
            .set_cell("workers", index, "deductions", deductions)
            .unwrap();
    }
}

#[test]
fn new_document_has_blank_fields_and_one_seed_row() {
    let document = Document::new(&wage_schema());
    assert_eq!(document.field("site"), Some(""));
    let workers = document.table("workers").unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers.cell(0, "grossWages").unwrap(), "");
    assert_eq!(document.field("totalGross"), Some("0.00"));
}

#[test]
fn wage_roll_up() {
    let mut document = Document::new(&wage_schema());
    fill_wages(&mut document);
    let workers = document.table("workers").unwrap();
    assert_eq!(workers.cell(0, "grossWages").unwrap(), "10000");
    assert_eq!(workers.cell(0, "netPay").unwrap(), "9000");
    assert_eq!(workers.cell(1, "grossWages").unwrap(), "9000");
    assert_eq!(workers.cell(1, "netPay").unwrap(), "8500");
    assert_eq!(document.field("totalGross"), Some("19000.00"));
    assert_eq!(document.field("totalDeductions"), Some("1500.00"));
    assert_eq!(document.field("totalNet"), Some("17500.00"));

    document.remove_row("workers", 0).unwrap();
    assert_eq!(document.field("totalGross"), Some("9000.00"));
    assert_eq!(document.field("totalNet"), Some("8500.00"));
}

#[test]
fn timesheet_billable_aggregation() {
    let mut document = Document::new(&timesheet_schema());
    document.set_cell("entries", 0, "hoursWorked", "8").unwrap();
    document.set_cell("entries", 0, "billable", "Yes").unwrap();
    document
        .add_row("entries", [("hoursWorked", "2"), ("billable", "No")])
        .unwrap();
    assert_eq!(document.field("totalHours"), Some("10.00"));
    assert_eq!(document.field("totalBillableHours"), Some("8.00"));
    assert_eq!(document.field("nonBillableHours"), Some("2.00"));

    // Flipping the filter column moves hours between totals.
    document.set_cell("entries", 1, "billable", "Yes").unwrap();
    assert_eq!(document.field("totalBillableHours"), Some("10.00"));
    assert_eq!(document.field("nonBillableHours"), Some("0.00"));
}

#[test]
fn aggregate_fields_cannot_be_set() {
    let mut document = Document::new(&timesheet_schema());
    assert!(matches!(
        document.set_field("totalHours", "99"),
        Err(DocumentError::ComputedField(_))
    ));
    assert_eq!(
        document.set_field("nope", "x"),
        Err(DocumentError::UnknownField("nope".to_string()))
    );
}

#[test]
fn missing_required_field_blocks_submit() {
    let mut document = Document::new(&wage_schema());
    fill_wages(&mut document);
    let failed = document.submit().unwrap_err();
    assert_eq!(failed.issues.len(), 1);
    let issue = &failed.issues[0];
    assert_eq!(issue.kind, ErrorKind::MissingRequired);
    assert_eq!(issue.field_key(), "site");

    document.set_field("site", "North Yard").unwrap();
    assert!(document.submit().is_ok());
}

#[test]
fn handler_only_sees_successful_submissions() {
    let mut document = Document::new(&wage_schema());
    let mut submitted = Vec::new();
    let mut handler = |id: &str, payload: &Payload| submitted.push((id.to_string(), payload.len()));

    assert!(document.submit_with(&mut handler).is_err());
    document.set_field("site", "North Yard").unwrap();
    document.submit_with(&mut handler).unwrap();
    assert_eq!(submitted, vec![("wages".to_string(), 5)]);
}

#[test]
fn format_and_min_items_checks() {
    let mut document = Document::new(&timesheet_schema());
    document.set_cell("entries", 0, "hoursWorked", "eight").unwrap();
    document.set_cell("entries", 0, "billable", "Maybe").unwrap();
    let issues = document.validate();
    let keys: Vec<String> = issues.iter().map(|issue| issue.field_key()).collect();
    assert_eq!(keys, ["entries[0].hoursWorked", "entries[0].billable"]);
    assert!(issues.iter().all(|issue| issue.kind == ErrorKind::InvalidFormat));

    document.remove_row("entries", 0).unwrap();
    let issues = document.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, ErrorKind::MinItems { min: 1, actual: 0 });
    assert!(matches!(&issues[0].location, IssueLocation::Table { table } if table.as_str() == "entries"));
}

#[test]
fn required_cells_are_reported_per_row() {
    let entries = RecordSchema::new(vec![
        ColumnDef::new("item", "Item", FieldType::Text)
            .unwrap()
            .required(),
    ])
    .unwrap()
    .with_seed_rows(2);
    let schema = DocumentSchema::new(
        "checklist",
        "Checklist",
        Vec::new(),
        vec![TableSchema::new("checklist", "Checklist", entries).unwrap()],
        Vec::new(),
    )
    .unwrap();
    let mut document = Document::new(&schema);
    document.set_cell("checklist", 0, "item", "Badge photo").unwrap();
    let issues = document.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field_key(), "checklist[1].item");
}

#[test]
fn payload_round_trip_keeps_layout() {
    let schema = wage_schema();
    let mut document = Document::new(&schema);
    document.set_field("site", "North Yard").unwrap();
    fill_wages(&mut document);
    document.add_column("workers", "Bank Account").unwrap();
    document
        .set_cell("workers", 1, "BankAccount", "DE-0042")
        .unwrap();

    let payload = document.submit().unwrap();
    let restored = Document::from_payload(&schema, &payload).unwrap();
    assert_eq!(restored.to_payload(), payload);

    let workers = restored.table("workers").unwrap();
    assert_eq!(workers.schema().dynamic_columns().len(), 1);
    assert_eq!(workers.cell(0, "BankAccount").unwrap(), "");
    assert_eq!(workers.cell(1, "BankAccount").unwrap(), "DE-0042");
    assert_eq!(restored.field("totalNet"), Some("17500.00"));
}

#[test]
fn payload_numbers_are_accepted() {
    let schema = wage_schema();
    let payload = Payload::from_json(
        r#"{
            "site": "Depot",
            "unknown": "dropped",
            "workers": [
                {"workerName": "A", "daysWorked": 20, "ratePerDay": 500, "deductions": 1000},
                {"workerName": "B", "daysWorked": 15, "ratePerDay": 600, "deductions": 500}
            ]
        }"#,
    )
    .unwrap();
    let document = Document::from_payload(&schema, &payload).unwrap();
    assert_eq!(document.field("totalGross"), Some("19000.00"));
    assert_eq!(document.table("workers").unwrap().cell(1, "netPay").unwrap(), "8500");
    assert!(document.to_payload().get("unknown").is_none());
}

#[test]
fn malformed_payload_is_rejected() {
    let schema = wage_schema();
    let payload = Payload::from_json(r#"{"workers": {"workerName": "A"}}"#).unwrap();
    assert!(matches!(
        Document::from_payload(&schema, &payload),
        Err(DocumentError::InvalidPayload { .. })
    ));
    let payload = Payload::from_json(r#"{"site": ["a"]}"#).unwrap();
    assert!(matches!(
        Document::from_payload(&schema, &payload),
        Err(DocumentError::InvalidPayload { .. })
    ));
}

#[test]
fn missing_table_gets_seed_rows() {
    let payload = Payload::from_json(r#"{"site": "Depot"}"#).unwrap();
    let document = Document::from_payload(&wage_schema(), &payload).unwrap();
    assert_eq!(document.table("workers").unwrap().len(), 1);
}

#[test]
fn column_label_source_drives_add_column() {
    let mut document = Document::new(&wage_schema());
    let mut answers = vec![None, Some("Shift".to_string()), Some("Shift".to_string())].into_iter();
    let mut source = || answers.next().flatten();

    assert_eq!(document.add_column_from("workers", &mut source).unwrap(), None);
    let added = document.add_column_from("workers", &mut source).unwrap();
    assert_eq!(added.map(|column| column.key.to_string()), Some("Shift".to_string()));
    let duplicate = document.add_column_from("workers", &mut source);
    assert!(matches!(
        duplicate,
        Err(DocumentError::Table {
            source: TableError::AlreadyExists(_),
            ..
        })
    ));
    assert!(matches!(
        document.add_column_from("nope", &mut source),
        Err(DocumentError::UnknownTable(_))
    ));
}

#[test]
fn schema_rejects_bad_aggregates() {
    let entries = RecordSchema::new(vec![
        ColumnDef::new("hours", "Hours", FieldType::Number).unwrap(),
    ])
    .unwrap();
    let table = TableSchema::new("entries", "Entries", entries).unwrap();
    let total = ColumnDef::new("total", "Total", FieldType::Number).unwrap();

    let result = DocumentSchema::new(
        "x",
        "X",
        vec![total.clone()],
        vec![table.clone()],
        vec![AggregateRule::sum("total", "entries", "minutes").unwrap()],
    );
    assert!(matches!(result, Err(SchemaError::UnknownAggregateColumn { .. })));

    let result = DocumentSchema::new(
        "x",
        "X",
        vec![total.clone()],
        vec![table.clone()],
        vec![AggregateRule::sum("missing", "entries", "hours").unwrap()],
    );
    assert!(matches!(result, Err(SchemaError::UnknownAggregateOutput { .. })));

    let clash = ColumnDef::new("entries", "Entries", FieldType::Text).unwrap();
    let result = DocumentSchema::new("x", "X", vec![clash], vec![table], Vec::new());
    assert_eq!(result.unwrap_err(), SchemaError::DuplicateKey("entries".to_string()));
}

#[test]
fn derived_cells_reject_direct_edits_and_round_trip() {
    let schema = wage_schema();
    let mut document = Document::new(&schema);
    document.set_field("site", "North Yard").unwrap();
    document.set_cell("workers", 0, "daysWorked", "20").unwrap();
    document.set_cell("workers", 0, "ratePerDay", "500").unwrap();

    let edit = document.set_cell("workers", 0, "grossWages", "123");
    assert!(matches!(
        edit,
        Err(DocumentError::Table {
            source: TableError::DerivedColumn(key),
            ..
        }) if key.as_str() == "grossWages"
    ));
    let workers = document.table("workers").unwrap();
    assert_eq!(workers.cell(0, "grossWages").unwrap(), "10000");

    let payload = document.submit().unwrap();
    let restored = Document::from_payload(&schema, &payload).unwrap();
    assert_eq!(restored.to_payload(), payload);
}

#[test]
fn empty_table_drops_dynamic_columns_on_reload() {
    let schema = wage_schema();
    let mut document = Document::new(&schema);
    document.add_column("workers", "Shift").unwrap();
    document.remove_row("workers", 0).unwrap();

    let restored = Document::from_payload(&schema, &document.to_payload()).unwrap();
    let workers = restored.table("workers").unwrap();
    assert!(workers.is_empty());
    assert!(workers.schema().dynamic_columns().is_empty());
}
