//! Table rendering for forms, documents and validation issues.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use formgrid_core::derive::format_display;
use formgrid_core::{Document, DocumentSchema, DynamicTable};
use formgrid_model::{ErrorKind, ValidationIssue};

pub fn forms_table(forms: &[DocumentSchema]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Form"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Tables"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for form in forms {
        let tables = form
            .tables()
            .iter()
            .map(|table| table.name.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(form.id())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(form.title()),
            Cell::new(form.fields().len()),
            if tables.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(tables)
            },
        ]);
    }
    table
}

/// Flat fields as a two-column label/value table.
pub fn fields_table(document: &Document) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (field, value) in document.fields() {
        let mut label = Cell::new(&field.label);
        if field.required {
            label = label.add_attribute(Attribute::Bold);
        }
        let shown = format_display(value, &field.field_type);
        let value = if shown.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(shown)
        };
        table.add_row(vec![label, value]);
    }
    table
}

/// All rows of a dynamic table, numbers to two decimals.
pub fn rows_table(source: &DynamicTable) -> Table {
    let columns = source.columns();
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(columns.iter().map(|column| header_cell(&column.label)));
    table.set_header(header);
    apply_table_style(&mut table);
    for (position, column) in columns.iter().enumerate() {
        if column.field_type.is_numeric() {
            align_column(&mut table, position + 1, CellAlignment::Right);
        }
    }
    for (index, row) in source.display_rows().into_iter().enumerate() {
        let mut cells = vec![dim_cell(index + 1)];
        cells.extend(row.into_iter().map(Cell::new));
        table.add_row(cells);
    }
    table
}

pub fn issues_table(issues: &[ValidationIssue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.field_key()),
            kind_cell(issue.kind),
            Cell::new(&issue.message),
        ]);
    }
    table
}

fn kind_cell(kind: ErrorKind) -> Cell {
    match kind {
        ErrorKind::MissingRequired => Cell::new(kind.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        ErrorKind::InvalidFormat => Cell::new(kind.label()).fg(Color::Red),
        ErrorKind::MinItems { .. } => Cell::new(kind.label()).fg(Color::Yellow),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
