use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use formgrid_cli::export::write_table_csv;
use formgrid_cli::render::{fields_table, forms_table, issues_table, rows_table};
use formgrid_core::{Document, DocumentSchema, LogSubmission, Payload};
use formgrid_forms::FormCatalog;

use crate::cli::{DocumentArgs, ExportArgs, FormArgs, SubmitArgs};

/// Outcome of a command that can be blocked by validation.
pub enum Outcome {
    Clean,
    Blocked,
}

pub fn run_forms() -> Result<()> {
    let catalog = load_catalog()?;
    println!("{}", forms_table(catalog.forms()));
    Ok(())
}

pub fn run_new(args: &FormArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let schema = find_form(&catalog, &args.form)?;
    let document = Document::new(schema);
    println!("{}", document.to_payload().to_json_pretty()?);
    Ok(())
}

pub fn run_validate(args: &DocumentArgs) -> Result<Outcome> {
    let catalog = load_catalog()?;
    let document = load_document(&catalog, args)?;
    let issues = document.validate();
    if issues.is_empty() {
        println!("{}: no issues", document.schema().title());
        return Ok(Outcome::Clean);
    }
    println!("{}: {} issue(s)", document.schema().title(), issues.len());
    println!("{}", issues_table(&issues));
    Ok(Outcome::Blocked)
}

pub fn run_submit(args: &SubmitArgs) -> Result<Outcome> {
    let catalog = load_catalog()?;
    let document = load_document(&catalog, &args.document)?;
    let payload = match document.submit_with(&mut LogSubmission) {
        Ok(payload) => payload,
        Err(failed) => {
            eprintln!("{failed}");
            eprintln!("{}", issues_table(&failed.issues));
            return Ok(Outcome::Blocked);
        }
    };
    let json = payload.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "payload written");
        }
        None => println!("{json}"),
    }
    Ok(Outcome::Clean)
}

pub fn run_show(args: &DocumentArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let document = load_document(&catalog, args)?;
    println!("{}", document.schema().title());
    println!("{}", fields_table(&document));
    for table in document.tables() {
        println!();
        println!("{} ({} rows)", table.label(), table.len());
        println!("{}", rows_table(table));
    }
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let document = load_document(&catalog, &args.document)?;
    let table = document
        .table(&args.table)
        .ok_or_else(|| anyhow!("form {} has no table {}", document.id(), args.table))?;
    match &args.output {
        Some(path) => {
            let file =
                fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_table_csv(table, file)?;
            info!(path = %path.display(), rows = table.len(), "table exported");
        }
        None => write_table_csv(table, io::stdout().lock())?,
    }
    Ok(())
}

fn load_catalog() -> Result<FormCatalog> {
    FormCatalog::standard().context("load form catalog")
}

fn find_form<'a>(catalog: &'a FormCatalog, id: &str) -> Result<&'a DocumentSchema> {
    catalog.find(id).ok_or_else(|| {
        anyhow!(
            "unknown form {id:?} (available: {})",
            catalog.ids().join(", ")
        )
    })
}

fn load_document(catalog: &FormCatalog, args: &DocumentArgs) -> Result<Document> {
    let schema = find_form(catalog, &args.form)?;
    let span = info_span!("document", form = schema.id());
    let _guard = span.enter();
    let payload = read_payload(&args.payload)?;
    Document::from_payload(schema, &payload)
        .with_context(|| format!("load {}", args.payload.display()))
}

fn read_payload(path: &Path) -> Result<Payload> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Payload::from_json(&json).with_context(|| format!("parse {}", path.display()))
}
