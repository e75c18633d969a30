//! Workbook import: decode every sheet of an `.xlsx`/`.xls` file into
//! generic rows, and parse sheets whose name mentions mutators into records.
//! A headered CSV is accepted as a single-sheet fallback for the same data.

use std::fmt;
use std::fs;
use std::path::Path;

use calamine::Reader;
use serde::Serialize;
use serde_json::Value;

use crate::data::companion::{Row, SheetMap};
use crate::data::mutator::{IdGenerator, Mutator, Rarity};

/// Tag column aliases, most specific first.
const TAG_COLUMN_ALIASES: [&str; 2] = ["Mutator_tags", "Tag"];

#[derive(Debug)]
pub enum ImportError {
    Workbook(calamine::Error),
    Sheet(String, calamine::Error),
    NoSheets,
    Csv(csv::Error),
    Read(std::io::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(err) => write!(f, "failed to open workbook: {err}"),
            Self::Sheet(name, err) => write!(f, "failed to read sheet '{name}': {err}"),
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::Csv(err) => write!(f, "failed to parse CSV: {err}"),
            Self::Read(err) => write!(f, "failed to read import file: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub source_path: String,
    pub sheet_count: usize,
    pub mutator_count: usize,
}

/// Decode every sheet into generic rows: first row is the header, empty cells
/// are omitted, rows with no populated cells are dropped.
pub fn read_workbook(path: &Path) -> Result<SheetMap, ImportError> {
    let mut workbook = calamine::open_workbook_auto(path).map_err(ImportError::Workbook)?;
    let names = workbook.sheet_names().to_owned();
    if names.is_empty() {
        return Err(ImportError::NoSheets);
    }

    let mut sheets = SheetMap::new();
    for name in &names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|err| ImportError::Sheet(name.clone(), err))?;
        sheets.insert(name.clone(), rows_from_range(&range));
    }
    Ok(sheets)
}

/// A sheet holds mutators when its name contains "mutator", any case.
pub fn is_mutator_sheet(name: &str) -> bool {
    name.to_lowercase().contains("mutator")
}

/// Parse generic rows into mutator records. Column names follow the deployed
/// spreadsheet format; the tag column is resolved through its historical
/// aliases. Unknown rarities coerce to Common, every record gets a fresh
/// synthetic id, and nothing is deduplicated.
pub fn mutators_from_rows(rows: &[Row], ids: &mut IdGenerator) -> Vec<Mutator> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let name = text_column(row, "Mutator_name")
                .unwrap_or_else(|| format!("Imported Mutator {}", index + 1));
            let tag = TAG_COLUMN_ALIASES
                .iter()
                .find_map(|alias| text_column(row, alias))
                .unwrap_or_default();
            Mutator {
                id: ids.next_imported(),
                name,
                rarity: Rarity::parse(&text_column(row, "Rarity").unwrap_or_default()),
                description: text_column(row, "Mutator").unwrap_or_default(),
                good_champions: text_column(row, "Good_champions").unwrap_or_default(),
                bad_champions: text_column(row, "Bad_champions").unwrap_or_default(),
                strategy: text_column(row, "Strategy").unwrap_or_default(),
                tag,
            }
        })
        .collect()
}

/// Parse a headered CSV with the same columns as a mutators sheet.
pub fn mutators_from_csv(path: &Path, ids: &mut IdGenerator) -> Result<Vec<Mutator>, ImportError> {
    let content = fs::read_to_string(path).map_err(ImportError::Read)?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers().map_err(ImportError::Csv)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(ImportError::Csv)?;
        let mut row = Row::new();
        for (index, field) in record.iter().enumerate() {
            let Some(header) = headers.get(index) else {
                break;
            };
            if header.trim().is_empty() || field.trim().is_empty() {
                continue;
            }
            row.insert(header.trim().to_string(), Value::from(field));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(mutators_from_rows(&rows, ids))
}

fn rows_from_range(range: &calamine::Range<calamine::Data>) -> Vec<Row> {
    let mut row_iter = range.rows();
    let Some(header_row) = row_iter.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for raw_row in row_iter {
        let mut row = Row::new();
        for (index, cell) in raw_row.iter().enumerate() {
            let Some(header) = headers.get(index) else {
                break;
            };
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_to_value(cell) {
                row.insert(header.clone(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}

fn cell_to_value(cell: &calamine::Data) -> Option<Value> {
    match cell {
        calamine::Data::Empty => None,
        calamine::Data::String(text) => Some(Value::from(text.as_str())),
        calamine::Data::Int(int) => Some(Value::from(*int)),
        calamine::Data::Float(float) if float.fract() == 0.0 => Some(Value::from(*float as i64)),
        calamine::Data::Float(float) => Some(Value::from(*float)),
        calamine::Data::Bool(flag) => Some(Value::from(*flag)),
        calamine::Data::DateTime(datetime) => Some(Value::from(datetime.as_f64())),
        calamine::Data::DateTimeIso(text) | calamine::Data::DurationIso(text) => {
            Some(Value::from(text.as_str()))
        }
        calamine::Data::Error(err) => Some(Value::from(format!("{err:?}"))),
    }
}

fn cell_to_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(text) => text.clone(),
        calamine::Data::Float(float) => format!("{float}"),
        calamine::Data::Int(int) => format!("{int}"),
        calamine::Data::Bool(flag) => format!("{flag}"),
        other => format!("{other:?}"),
    }
}

/// Non-blank cell text for a column; a present-but-empty cell reads as
/// absent, so downstream defaults apply.
fn text_column(row: &Row, column: &str) -> Option<String> {
    let text = match row.get(column)? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
