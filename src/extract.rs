//! Two-tier extraction of inventory records from a message body.
//!
//! Replacement notifications come in two shapes: a seven-column HTML
//! table (one data row per replaced asset), or plain text with labeled
//! `Campo: valor` lines. The structured tier recovers one record per
//! table row; the fallback tier recovers a single record per body,
//! tolerating labels that appear more than once.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// One replaced-equipment transaction. Field names keep the source
/// system's Spanish wording: they are the CSV column contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub usuario: String,
    pub cpu_nuevo: String,
    pub monitor_nuevo: String,
    pub teclado_nuevo: String,
    pub cpu_viejo: String,
    pub monitor_viejo: String,
    pub teclado_viejo: String,
    pub fecha: String,
}

type FieldAccessor = fn(&mut InventoryRecord) -> &mut String;

/// The seven content fields in column order, with the label each one is
/// announced by in plain-text bodies. Table cells map positionally onto
/// the same order.
const FIELDS: [(&str, FieldAccessor); 7] = [
    ("Usuario", |r: &mut InventoryRecord| &mut r.usuario),
    ("CPU", |r: &mut InventoryRecord| &mut r.cpu_nuevo),
    ("Monitor", |r: &mut InventoryRecord| &mut r.monitor_nuevo),
    ("Teclado", |r: &mut InventoryRecord| &mut r.teclado_nuevo),
    ("CPU a reponer", |r: &mut InventoryRecord| &mut r.cpu_viejo),
    ("Monitor a reponer", |r: &mut InventoryRecord| {
        &mut r.monitor_viejo
    }),
    ("Teclado a reponer", |r: &mut InventoryRecord| {
        &mut r.teclado_viejo
    }),
];

static LABEL_PATTERNS: Lazy<Vec<(Regex, FieldAccessor)>> = Lazy::new(|| {
    FIELDS
        .iter()
        .map(|&(label, accessor)| {
            let pattern = format!(r"(?i){}\s*:\s*([^\r\n]+)", regex::escape(label));
            (Regex::new(&pattern).expect("label pattern"), accessor)
        })
        .collect()
});

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("selector"));

/// How one body gets parsed.
enum ParseStrategy {
    /// Positional extraction from markup table rows, carrying the rows
    /// it already recovered.
    Structured(Vec<InventoryRecord>),
    /// Labeled-field capture over the raw text.
    FallbackText,
}

/// Extracts zero or more records from a message body. `fecha` is left
/// unset; the caller stamps it from message metadata.
pub fn parse(body: &str, is_structured: bool) -> Vec<InventoryRecord> {
    match strategy_for(body, is_structured) {
        ParseStrategy::Structured(records) => records,
        ParseStrategy::FallbackText => vec![parse_labeled_text(body)],
    }
}

/// Structured parsing wins only when the body is markup and at least one
/// table row qualifies; everything else degrades to labeled-text capture.
fn strategy_for(body: &str, is_structured: bool) -> ParseStrategy {
    if is_structured {
        let records = parse_tables(body);
        if !records.is_empty() {
            return ParseStrategy::Structured(records);
        }
    }
    ParseStrategy::FallbackText
}

/// Recovers one record per qualifying data row, across every table in
/// the document, preserving table and row order.
fn parse_tables(body: &str) -> Vec<InventoryRecord> {
    let document = Html::parse_document(body);
    let mut records = Vec::new();
    for table in document.select(&TABLE) {
        let rows: Vec<ElementRef> = table.select(&ROW).collect();
        // The first row is the header; a header-only table has no data.
        for row in rows.iter().skip(1) {
            let cells: Vec<String> = row
                .select(&CELL)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if let Some(record) = record_from_cells(&cells) {
                records.push(record);
            }
        }
    }
    records
}

/// Maps the first seven cell values positionally onto the content
/// fields. Rows with fewer cells are not records; extra cells are
/// ignored.
fn record_from_cells(cells: &[String]) -> Option<InventoryRecord> {
    if cells.len() < 7 {
        return None;
    }
    let mut record = InventoryRecord::default();
    for (&(_, accessor), value) in FIELDS.iter().zip(cells) {
        *accessor(&mut record) = value.clone();
    }
    Some(record)
}

/// Produces exactly one record. A label occurring several times (pasted
/// templates) joins its values with commas rather than dropping any.
fn parse_labeled_text(body: &str) -> InventoryRecord {
    let mut record = InventoryRecord::default();
    for (pattern, accessor) in LABEL_PATTERNS.iter() {
        let values: Vec<&str> = pattern
            .captures_iter(body)
            .filter_map(|captures| captures.get(1))
            .map(|value| value.as_str().trim())
            .collect();
        *accessor(&mut record) = values.join(",");
    }
    record
}
