use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn billscan() -> Command {
    Command::cargo_bin("billscan").unwrap()
}

fn detection(text: &str, x: f32, y: f32) -> Value {
    json!([
        [[x - 30.0, y - 10.0], [x + 30.0, y - 10.0], [x + 30.0, y + 10.0], [x - 30.0, y + 10.0]],
        [text, 0.95]
    ])
}

/// Recorded engine output for a small bill with one item.
fn write_bill_dump(dir: &Path) -> std::path::PathBuf {
    let cells = [
        ("Sl", 600.0, 100.0),
        ("No", 650.0, 100.0),
        ("4521", 750.0, 100.0),
        ("Date : 05|06|2024", 750.0, 130.0),
        ("RAJESH KUMAR", 100.0, 150.0),
        ("MRP", 50.0, 350.0),
        ("Particulars", 250.0, 350.0),
        ("Qty", 550.0, 350.0),
        ("Rate", 700.0, 350.0),
        ("Amount", 880.0, 350.0),
        ("Rs", 950.0, 350.0),
        ("Plywood", 300.0, 400.0),
        ("2", 550.0, 400.0),
        ("500", 750.0, 400.0),
        ("1000", 900.0, 400.0),
    ];
    let dump: Vec<Value> = cells
        .iter()
        .map(|(text, x, y)| detection(text, *x, *y))
        .collect();

    let path = dir.join("bill.json");
    fs::write(&path, serde_json::to_string(&json!([dump])).unwrap()).unwrap();
    path
}

#[test]
fn test_extract_recorded_json() {
    let dir = TempDir::new().unwrap();
    let dump = write_bill_dump(dir.path());

    let output = billscan()
        .args(["extract", "--ocr-json"])
        .arg(&dump)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["header"]["customerName"], json!("RAJESH KUMAR"));
    assert_eq!(value["header"]["slNo"], json!("4521"));
    assert_eq!(value["header"]["date"], json!("05/06/2024"));
    assert_eq!(
        value["items"],
        json!([{ "id": "1", "itemName": "Plywood", "quantity": "2", "rate": "500", "amount": "1000" }])
    );
}

#[test]
fn test_extract_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let dump = write_bill_dump(dir.path());
    let out = dir.path().join("bill.csv");

    billscan()
        .args(["extract", "-f", "csv", "--ocr-json"])
        .arg(&dump)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("Name: RAJESH KUMAR,,,Sl. No: 4521,,,Date: 05/06/2024\n\n"));
    assert!(csv.contains("Particulars,Qty,Rate,Amount\nPlywood,2,500,1000\n"));
}

#[test]
fn test_extract_empty_output_fails() {
    let dir = TempDir::new().unwrap();
    let dump = dir.path().join("empty.json");
    fs::write(&dump, "[]").unwrap();

    billscan()
        .args(["extract", "--ocr-json"])
        .arg(&dump)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("No text detected in image"));
}

#[test]
fn test_extract_missing_input() {
    billscan()
        .args(["extract", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_requires_input() {
    billscan().arg("extract").assert().failure();
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.png");

    billscan()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_batch_summary_records_failures() {
    let dir = TempDir::new().unwrap();
    let dump = write_bill_dump(dir.path());
    fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
    let out_dir = dir.path().join("out");

    billscan()
        .arg("batch")
        .arg(dir.path().join("*").to_str().unwrap())
        .arg("--ocr-json")
        .arg(&dump)
        .arg("--continue-on-error")
        .arg("--summary")
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 files to process"))
        .stdout(predicate::str::contains("0 successful, 1 failed"));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,customer_name,sl_no,date,items,"));
    assert!(summary.contains("broken.png,error,"));
    assert!(summary.contains("Could not read image"));
}

#[test]
fn test_batch_stops_on_first_failure() {
    let dir = TempDir::new().unwrap();
    let dump = write_bill_dump(dir.path());
    fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

    billscan()
        .arg("batch")
        .arg(dir.path().join("*.png").to_str().unwrap())
        .arg("--ocr-json")
        .arg(&dump)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read image"));
}

#[test]
fn test_config_path_not_created() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    billscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config = config.to_str().unwrap();

    billscan()
        .args(["--config", config, "config", "init"])
        .assert()
        .success();

    billscan()
        .args(["--config", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    billscan()
        .args(["--config", config, "config", "get", "layout.table.row_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25.0"));

    billscan()
        .args(["--config", config, "config", "set", "layout.table.row_anchor", "centroid"])
        .assert()
        .success();

    billscan()
        .args(["--config", config, "config", "get", "layout.table.row_anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"centroid\""));
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let config = config.to_str().unwrap();

    billscan()
        .args(["--config", config, "config", "set", "layout.columns.mrp_max_x", "900"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("band edges must be ascending"));

    billscan()
        .args(["--config", config, "config", "set", "layout.table.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_batch_outputs_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let dump = write_bill_dump(dir.path());
    let blank = image::GrayImage::from_pixel(8, 8, image::Luma([255]));
    blank.save(dir.path().join("a.png")).unwrap();
    blank.save(dir.path().join("a.jpg")).unwrap();
    let out_dir = dir.path().join("out");

    billscan()
        .arg("batch")
        .arg(dir.path().join("a.*").to_str().unwrap())
        .arg("--ocr-json")
        .arg(&dump)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    for name in ["a.png.json", "a.jpg.json"] {
        let value: Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join(name)).unwrap()).unwrap();
        assert_eq!(value["header"]["slNo"], json!("4521"));
    }
}
