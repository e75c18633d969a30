use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_lorekeeper")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("lorekeeper-cli-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: lorekeeper"));
}

#[test]
fn import_without_path_returns_usage() {
    let output = Command::new(bin())
        .arg("import")
        .env("LOREKEEPER_DATA_DIR", unique_temp_dir("import-usage"))
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: lorekeeper import"));
}

#[test]
fn import_of_a_missing_file_fails() {
    let output = Command::new(bin())
        .args(["import", "/no/such/workbook.xlsx"])
        .env("LOREKEEPER_DATA_DIR", unique_temp_dir("import-missing"))
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("import failed"));
}

#[test]
fn validate_passes_on_an_empty_store() {
    let output = Command::new(bin())
        .arg("validate")
        .env("LOREKEEPER_DATA_DIR", unique_temp_dir("validate-empty"))
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
}

#[test]
fn export_fails_with_no_data() {
    let output = Command::new(bin())
        .arg("export")
        .env("LOREKEEPER_DATA_DIR", unique_temp_dir("export-empty"))
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("export failed: no data to export"));
}

#[test]
fn clear_reports_the_store_root() {
    let dir = unique_temp_dir("clear");
    let output = Command::new(bin())
        .arg("clear")
        .env("LOREKEEPER_DATA_DIR", &dir)
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cleared companion data"));
}

#[test]
fn export_import_round_trip_through_the_binary() {
    let source_dir = unique_temp_dir("roundtrip-source");
    let export_dir = unique_temp_dir("roundtrip-export");
    let target_dir = unique_temp_dir("roundtrip-target");

    let mutators = serde_json::json!([{
        "id": "1722000000000",
        "name": "Storm",
        "rarity": "Epic",
        "description": "Lightning everywhere",
        "goodChampions": "Ahri, Zed",
        "badChampions": "Teemo",
        "strategy": "Bring boots",
    }]);
    fs::write(
        source_dir.join("lorMutators.json"),
        serde_json::to_string_pretty(&mutators).expect("fixture should serialize"),
    )
    .expect("fixture should be written");

    let export = Command::new(bin())
        .args(["export", export_dir.to_string_lossy().as_ref()])
        .env("LOREKEEPER_DATA_DIR", &source_dir)
        .output()
        .expect("binary should run");
    assert_eq!(export.status.code(), Some(0), "{:?}", export);
    let exported = export_dir.join("LoR_Companion_Export.xlsx");
    assert!(exported.exists());

    let import = Command::new(bin())
        .args(["import", exported.to_string_lossy().as_ref()])
        .env("LOREKEEPER_DATA_DIR", &target_dir)
        .output()
        .expect("binary should run");
    assert_eq!(import.status.code(), Some(0), "{:?}", import);
    let stdout = String::from_utf8_lossy(&import.stdout);
    assert!(stdout.contains("import complete"));
    assert!(stdout.contains("mutators=1"));

    let raw = fs::read_to_string(target_dir.join("lorMutators.json"))
        .expect("imported store should exist");
    let imported: serde_json::Value = serde_json::from_str(&raw).expect("store should be json");
    assert_eq!(imported[0]["name"], "Storm");
    assert_eq!(imported[0]["rarity"], "Epic");
    assert_eq!(imported[0]["goodChampions"], "Ahri, Zed");
}
