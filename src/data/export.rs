//! Workbook export: rebuild the sheet-shaped snapshot from the live
//! registries, merge the raw imported sheets, and write the fixed-name
//! companion export file. A pure projection; stored state never changes.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde_json::Value;

use crate::data::companion::{Row, SheetMap, MUTATORS_SHEET, TAGS_SHEET};
use crate::data::mutator::MutatorRegistry;
use crate::data::tag::TagRegistry;

pub const EXPORT_FILE_NAME: &str = "LoR_Companion_Export.xlsx";

const MUTATOR_COLUMNS: [&str; 7] = [
    "Mutator_name",
    "Rarity",
    "Mutator",
    "Good_champions",
    "Bad_champions",
    "Strategy",
    "Mutator_tags",
];

const TAG_COLUMNS: [&str; 3] = ["Tag_name", "Good_champions", "Bad_champions"];

#[derive(Debug)]
pub enum ExportError {
    Workbook(XlsxError),
    Empty,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(err) => write!(f, "failed to write workbook: {err}"),
            Self::Empty => write!(f, "no data to export"),
        }
    }
}

/// Assemble the export snapshot: registry projections for Mutators and Tags,
/// every other stored sheet verbatim.
pub fn export_snapshot(
    sheets: &SheetMap,
    mutators: &MutatorRegistry,
    tags: &TagRegistry,
) -> SheetMap {
    let mut snapshot = sheets.clone();
    snapshot.insert(MUTATORS_SHEET.to_string(), mutators.export_rows());
    snapshot.insert(TAGS_SHEET.to_string(), tags.export_rows());
    snapshot
}

/// Write the snapshot into `dir` under the fixed export name.
pub fn export_workbook(snapshot: &SheetMap, dir: &Path) -> Result<PathBuf, ExportError> {
    if snapshot.values().all(Vec::is_empty) {
        return Err(ExportError::Empty);
    }
    std::fs::create_dir_all(dir).map_err(|err| ExportError::Workbook(err.into()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    write_workbook(snapshot, &path)?;
    Ok(path)
}

pub fn write_workbook(snapshot: &SheetMap, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    for (name, rows) in snapshot {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(ExportError::Workbook)?;
        write_sheet(sheet, name, rows)?;
    }
    workbook.save(path).map_err(ExportError::Workbook)?;
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, name: &str, rows: &[Row]) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Ok(());
    }
    let headers = sheet_headers(name, rows);
    for (column, header) in headers.iter().enumerate() {
        sheet
            .write_string(0, column as u16, header)
            .map_err(ExportError::Workbook)?;
    }
    for (index, row) in rows.iter().enumerate() {
        for (column, header) in headers.iter().enumerate() {
            let Some(value) = row.get(header) else {
                continue;
            };
            write_cell(sheet, index as u32 + 1, column as u16, value)?;
        }
    }
    Ok(())
}

/// Projection sheets keep their historical column order; imported sheets get
/// the union of their row keys in first appearance.
fn sheet_headers(name: &str, rows: &[Row]) -> Vec<String> {
    match name {
        MUTATORS_SHEET => MUTATOR_COLUMNS.iter().map(|c| c.to_string()).collect(),
        TAGS_SHEET => TAG_COLUMNS.iter().map(|c| c.to_string()).collect(),
        _ => {
            let mut headers: Vec<String> = Vec::new();
            for row in rows {
                for key in row.keys() {
                    if !headers.iter().any(|header| header == key) {
                        headers.push(key.clone());
                    }
                }
            }
            headers
        }
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    column: u16,
    value: &Value,
) -> Result<(), ExportError> {
    match value {
        Value::Null => return Ok(()),
        Value::String(text) => sheet.write_string(row, column, text),
        Value::Bool(flag) => sheet.write_boolean(row, column, *flag),
        Value::Number(number) => sheet.write_number(row, column, number.as_f64().unwrap_or(0.0)),
        other => sheet.write_string(row, column, other.to_string()),
    }
    .map_err(ExportError::Workbook)?;
    Ok(())
}
