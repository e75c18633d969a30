use std::env;
use std::path::Path;

use crate::data::datastore::DataStore;
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Import,
    Export,
    Validate,
    Clear,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("import") => Some(Command::Import),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        Some("clear") => Some(Command::Clear),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Import) => handle_import(args),
        Some(Command::Export) => handle_export(args),
        Some(Command::Validate) => handle_validate(),
        Some(Command::Clear) => handle_clear(),
        None => {
            eprintln!("usage: lorekeeper <serve|import|export|validate|clear>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("LOREKEEPER_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let mut store = DataStore::open_default();
    match server::run_server(&bind_addr, &mut store) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_import(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: lorekeeper import <path-to-workbook-or-csv>");
        return 2;
    };

    let mut store = DataStore::open_default();
    let result = if path.to_lowercase().ends_with(".csv") {
        store.import_mutators_csv(Path::new(path))
    } else {
        store.import_workbook(Path::new(path))
    };

    match result {
        Ok(report) => {
            println!(
                "import complete: sheets={}, mutators={}, source='{}'",
                report.sheet_count, report.mutator_count, report.source_path
            );
            0
        }
        Err(err) => {
            eprintln!("import failed: {err}");
            1
        }
    }
}

fn handle_export(args: &[String]) -> i32 {
    let dir = args.get(2).map(String::as_str).unwrap_or(".");
    let store = DataStore::open_default();
    match store.export_workbook(Path::new(dir)) {
        Ok(path) => {
            println!("exported {}", path.display());
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_validate() -> i32 {
    let store = DataStore::open_default();
    let report = store.validate();
    if report.is_empty() {
        println!("validation passed: {}", store.root().display());
        return 0;
    }
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        1
    } else {
        println!(
            "validation passed with {} warning(s)",
            report.diagnostics.len()
        );
        0
    }
}

fn handle_clear() -> i32 {
    let mut store = DataStore::open_default();
    store.clear_all();
    println!("cleared companion data at {}", store.root().display());
    0
}
