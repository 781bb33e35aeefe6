use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const LICENSE_TEXT: &str = "PATENTE DI GUIDA\n\
1. ROSSI\n\
2. MARIO\n\
3. 01/02/85 ROMA (RM)\n\
4A. 10.05.2015 4B. 10.05.2026\n\
4C. MIT-UCO\n\
5. U1A2B3C4D5\n";

fn patente() -> Command {
    Command::cargo_bin("patente").unwrap()
}

#[test]
fn extract_prints_json_fields() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ocr.txt");
    fs::write(&input, LICENSE_TEXT).unwrap();

    patente()
        .args(["extract", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"surname\": \"ROSSI\""))
        .stdout(predicate::str::contains("\"given_name\": \"MARIO\""))
        .stdout(predicate::str::contains("\"birth_date\": \"01.02.1985\""))
        .stdout(predicate::str::contains("\"license_number\": \"U1A2B3C4D5\""));
}

#[test]
fn extract_reads_stdin() {
    patente()
        .args(["extract", "-", "--format", "text"])
        .write_stdin("1. BIANCHI 2. ANNA")
        .assert()
        .success()
        .stdout(predicate::str::contains("surname:        BIANCHI"))
        .stdout(predicate::str::contains("birth_date:     -"));
}

#[test]
fn extract_missing_file_fails() {
    patente()
        .args(["extract", "/nonexistent/ocr.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn save_then_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ocr.txt");
    let store = dir.path().join("controlli.csv");
    fs::write(&input, LICENSE_TEXT).unwrap();

    patente()
        .args(["save", "--municipality", "Gavi", "--plate", "ab123cd", "--commercial"])
        .args(["--findings", "art 7"])
        .arg("--document")
        .arg(&input)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Check saved"));

    patente()
        .args(["save", "--municipality", "Gavi", "--surname", "verdi", "--cope"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success();

    let content = fs::read_to_string(&store).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("DATA_ORA,COMUNE,VEICOLO,TARGA,COGNOME,NOME,LUOGO_NASCITA,DATA_NASCITA,COMMERCIALE,COPE,RILIEVI,CINOFILI")
    );
    let first = lines.next().unwrap();
    assert!(first.contains(",GAVI,,AB123CD,ROSSI,MARIO,ROMA RM,01.02.1985,SI,NO,ART 7,NO"));
    assert!(lines.next().unwrap().contains(",GAVI,,,VERDI,,,,NO,SI,,NO"));

    patente()
        .args(["report", "--today"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Municipality: GAVI"))
        .stdout(predicate::str::contains("Commercial: 1  Private: 1"))
        .stdout(predicate::str::contains("Total checks: 2"));
}

#[test]
fn save_dry_run_leaves_store_untouched() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("controlli.csv");

    patente()
        .args(["save", "--municipality", "Gavi", "--contested", "--dry-run"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("RILIEVI"))
        .stdout(predicate::str::contains("SI"));

    assert!(!store.exists());
}

#[test]
fn report_on_empty_store() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("vuoto.csv");

    patente()
        .arg("report")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("No checks to report"));
}

#[test]
fn config_path_is_reported() {
    patente()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}
