use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "015 SAN MARTIN\n\
    Caja 0012\n\
    Fecha 06/11/24\n\
    Hora 16:05:47\n\
    CAE 74454216986289\n\
    TOTAL $ 2.690,00\n";

/// A `recibo` command isolated from the user's configuration directory.
fn recibo(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("recibo").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn parse_text_file_to_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    fs::write(&input, RECEIPT).unwrap();

    let output = recibo(dir.path()).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["codigo_tienda"], "015");
    assert_eq!(value["tienda_nombre"], "SAN MARTIN");
    assert_eq!(value["id_caja"], "0012");
    assert_eq!(value["fecha"], "2024-11-06");
    assert_eq!(value["momento"], "2024-11-06T16:05:47");
    assert_eq!(value["importe_total"], 2690.0);
    assert_eq!(value["raw_extracted_text"], RECEIPT);
}

#[test]
fn parse_structured_json_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("response.json");
    fs::write(
        &input,
        r#"[{"data": [
            {"clave": "competidor", "valor": "Store A"},
            {"clave": "fecha", "valor": "06/11/2024"},
            {"clave": "importe_total", "valor": "150.50"}
        ]}]"#,
    )
    .unwrap();

    let output = recibo(dir.path()).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tienda_nombre"], "Store A");
    assert_eq!(value["importe_total"], 150.5);
    assert_eq!(value["monto_op_gravada"], 150.5);
    assert_eq!(value["mes"], 11);
}

#[test]
fn parse_rejects_unrecognized_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("response.json");
    fs::write(&input, r#"{"status": "ok"}"#).unwrap();

    recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized upstream format (object)"));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    recibo(dir.path())
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn parse_csv_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    fs::write(&input, RECEIPT).unwrap();

    recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id_caja,canal,codigo_tienda"))
        .stdout(predicate::str::contains("0012,,015,SAN MARTIN,2024-11-06,16:05:47"));
}

#[test]
fn parse_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, RECEIPT).unwrap();

    recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .args(["--format", "text", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let summary = fs::read_to_string(&output).unwrap();
    assert!(summary.contains("Store: 015 SAN MARTIN"));
    assert!(summary.contains("(cierre)"));
}

#[test]
fn parse_load_row_requires_date() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    fs::write(&input, "015 SAN MARTIN\nTOTAL 10,00").unwrap();

    recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .args(["--loaded-by", "ana@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field: fecha"));
}

#[test]
fn parse_load_row() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    fs::write(&input, RECEIPT).unwrap();

    let output = recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .args(["--loaded-by", " Ana@Example.com "])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["usuario_carga"], "ana@example.com");
    assert!(value["fecha_carga"].is_string());
    assert!(value.get("raw_extracted_text").is_none());
}

#[test]
fn parse_validate_reports_issues() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    fs::write(&input, "015 SAN MARTIN\n").unwrap();

    recibo(dir.path())
        .arg("parse")
        .arg(&input)
        .arg("--validate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Missing date"));
}

#[test]
fn parse_uses_explicit_config() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ticket.txt");
    let config = dir.path().join("config.json");
    fs::write(&input, RECEIPT).unwrap();
    fs::write(
        &config,
        r#"{"extraction": {"register_id_width": 6}, "output": {"include_raw_text": false}}"#,
    )
    .unwrap();

    let output = recibo(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["id_caja"], "000012");
    assert!(value.get("raw_extracted_text").is_none());
}

#[test]
fn batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    let out = dir.path().join("out");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("a.txt"), RECEIPT).unwrap();
    fs::write(inbox.join("b.json"), r#"{"extracted_text": "Fecha 01/02/2023\nTOTAL 5,00"}"#)
        .unwrap();
    fs::write(inbox.join("c.json"), r#"{"unexpected": true}"#).unwrap();

    recibo(dir.path())
        .arg("batch")
        .arg(format!("{}/*", inbox.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("Failed files:"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("c.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("filename,status,id_check"));
    assert!(lines[1].starts_with("a.txt,success,"));
    assert!(lines[1].contains(",015,SAN MARTIN,2024-11-06,2690.00,"));
    assert!(lines[2].starts_with("b.json,success,"));
    assert!(lines[3].starts_with("c.json,error,"));
}

#[test]
fn batch_stops_on_first_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "not json").unwrap();

    recibo(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    recibo(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();

    recibo(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    recibo(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    recibo(dir.path())
        .args(["config", "get", "extraction.register_id_width"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));

    recibo(dir.path())
        .args(["config", "set", "extraction.register_id_width", "6"])
        .assert()
        .success();

    recibo(dir.path())
        .args(["config", "get", "extraction.register_id_width"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6"));

    recibo(dir.path())
        .args(["config", "set", "extraction.store_scan_lines", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("store_scan_lines"));

    recibo(dir.path())
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_path_reports_status() {
    let dir = TempDir::new().unwrap();

    recibo(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}
