//! Inspect a companion workbook: print sheet names, sizes, and leading rows.
//! Usage: cargo run --bin inspect_workbook -- path/to/workbook.xlsx

use std::path::Path;

use calamine::Reader;

use lorekeeper::data::workbook::is_mutator_sheet;

fn cell_str(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(text) => text.clone(),
        calamine::Data::Float(float) => format!("{float}"),
        calamine::Data::Int(int) => format!("{int}"),
        calamine::Data::Bool(flag) => format!("{flag}"),
        other => format!("{other:?}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("Usage: inspect_workbook <path-to.xlsx>")?;
    let path = Path::new(&path);
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let mut workbook = calamine::open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();
    println!("Sheets ({}): {}", names.len(), names.join(", "));

    for name in &names {
        let range = workbook.worksheet_range(name)?;
        let (height, width) = range.get_size();
        let kind = if is_mutator_sheet(name) {
            " [mutators]"
        } else {
            ""
        };
        println!("\nSheet '{name}'{kind}: {height} rows x {width} cols");
        for (index, row) in range.rows().take(10).enumerate() {
            let cells: Vec<String> = row.iter().map(cell_str).collect();
            println!("  {index}: {}", cells.join(" | "));
        }
    }
    Ok(())
}
