//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

fn offer_pack(workspace: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("offer-pack"));
    cmd.current_dir(workspace.path())
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(workspace.path().join("data"));
    cmd
}

fn run_ok(workspace: &TempDir, args: &[&str]) -> String {
    let output = offer_pack(workspace).args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf-8 stdout")
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// Two selected items tagged luxmed; only the first carries a base contract.
fn seed_contract_scenario(workspace: &TempDir) {
    run_ok(workspace, &["set", "1", "label", "Pakiet A"]);
    run_ok(workspace, &["set", "2", "label", "Pakiet B"]);
    run_ok(workspace, &["tags", "1", "luxmed"]);
    run_ok(workspace, &["tags", "2", "luxmed"]);
    run_ok(workspace, &["contract", "1", "--set"]);
    run_ok(workspace, &["toggle", "1", "left"]);
    run_ok(workspace, &["toggle", "2", "left"]);
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("offer-pack"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("offer-pack"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("offer-pack"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Curate offer items"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("csv"));
}

#[test]
fn test_generate_with_nothing_selected() {
    let workspace = TempDir::new().unwrap();
    offer_pack(&workspace)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No items selected."));
}

#[test]
fn test_generate_renders_selected_slots() {
    let workspace = TempDir::new().unwrap();
    run_ok(&workspace, &["set", "2", "label", "Pakiet zdrowotny"]);
    run_ok(&workspace, &["set", "2", "description", "Opis A"]);
    run_ok(&workspace, &["set", "2", "link", "https://x"]);
    run_ok(&workspace, &["toggle", "2", "left"]);
    run_ok(&workspace, &["toggle", "2", "mid"]);

    let text = run_ok(&workspace, &["generate"]);
    assert_eq!(text.trim_end(), "Pakiet zdrowotny\nOpis A\n\n  OWU: https://x");
}

#[test]
fn test_label_is_truncated_to_thirty_chars() {
    let workspace = TempDir::new().unwrap();
    let long = "x".repeat(45);
    run_ok(&workspace, &["set", "1", "label", &long]);
    run_ok(&workspace, &["toggle", "1", "left"]);

    let text = run_ok(&workspace, &["generate"]);
    assert_eq!(first_line(&text), "x".repeat(30));
}

#[test]
fn test_unknown_item_number_fails() {
    let workspace = TempDir::new().unwrap();
    offer_pack(&workspace)
        .args(["toggle", "9", "left"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item 9 does not exist"));
}

#[test]
fn test_save_reports_items_missing_base_contract() {
    let workspace = TempDir::new().unwrap();
    seed_contract_scenario(&workspace);

    offer_pack(&workspace)
        .args(["package", "save", "Oferta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item 2 tagged \"luxmed\" needs a base contract"))
        .stderr(predicate::str::contains("Package not saved"));

    let listing = run_ok(&workspace, &["package", "list"]);
    assert!(listing.trim().is_empty(), "{listing}");
}

#[test]
fn test_save_with_nothing_selected_fails() {
    let workspace = TempDir::new().unwrap();
    offer_pack(&workspace)
        .args(["package", "save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing selected"));
}

#[test]
fn test_borrowed_contract_allows_save_and_zip_export() {
    let workspace = TempDir::new().unwrap();
    seed_contract_scenario(&workspace);
    run_ok(&workspace, &["contract", "2", "--ref", "1"]);

    let owu = workspace.path().join("owu.pdf");
    fs::write(&owu, b"%PDF-1.4 test").unwrap();
    let upload = run_ok(&workspace, &["upload", "1", owu.to_str().unwrap()]);
    assert!(!first_line(&upload).is_empty());
    run_ok(&workspace, &["toggle", "1", "right", "--out", "downloads"]);
    assert_eq!(fs::read(workspace.path().join("downloads/owu.pdf")).unwrap(), b"%PDF-1.4 test");

    let package_id = first_line(&run_ok(&workspace, &["package", "save", "Oferta Q3"]));
    run_ok(&workspace, &["package", "export", &package_id, "--out", "bundles"]);

    let bundle = workspace.path().join("bundles/Oferta Q3.zip");
    let mut archive = zip::ZipArchive::new(Cursor::new(fs::read(&bundle).unwrap())).unwrap();
    let mut manifest = String::new();
    archive.by_name("manifest.json").unwrap().read_to_string(&mut manifest).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["name"], "Oferta Q3");
    assert_eq!(manifest["selectedIndices"], serde_json::json!([0, 1]));

    let mut pdf = Vec::new();
    archive.by_name("owu.pdf").unwrap().read_to_end(&mut pdf).unwrap();
    assert_eq!(pdf, b"%PDF-1.4 test");
}

#[test]
fn test_export_revalidates_against_current_items() {
    let workspace = TempDir::new().unwrap();
    seed_contract_scenario(&workspace);
    run_ok(&workspace, &["contract", "2", "--set"]);
    let package_id = first_line(&run_ok(&workspace, &["package", "save", "Oferta"]));

    run_ok(&workspace, &["contract", "2", "--unset"]);
    offer_pack(&workspace)
        .args(["package", "export", &package_id, "--out", "bundles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item 2 tagged"))
        .stderr(predicate::str::contains("Package not exported"));
    assert!(!workspace.path().join("bundles/Oferta.zip").exists());
}

#[test]
fn test_download_never_overwrites_existing_file() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("notes.txt"), "MY PRECIOUS NOTES").unwrap();
    fs::create_dir_all(workspace.path().join("in")).unwrap();
    fs::write(workspace.path().join("in/notes.txt"), "uploaded").unwrap();

    run_ok(&workspace, &["upload", "1", "in/notes.txt"]);
    let out = run_ok(&workspace, &["toggle", "1", "right"]);
    assert!(out.contains("notes (1).txt"), "{out}");

    assert_eq!(fs::read_to_string(workspace.path().join("notes.txt")).unwrap(), "MY PRECIOUS NOTES");
    assert_eq!(fs::read_to_string(workspace.path().join("notes (1).txt")).unwrap(), "uploaded");
}

#[test]
fn test_output_dir_flag_beats_environment() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("owu.pdf"), b"%PDF").unwrap();
    run_ok(&workspace, &["upload", "2", "owu.pdf"]);

    offer_pack(&workspace)
        .env("OFFER_PACK_OUTPUT_DIR", "from-env")
        .args(["--output-dir", "from-cli", "toggle", "2", "right"])
        .assert()
        .success();

    assert_eq!(fs::read(workspace.path().join("from-cli/owu.pdf")).unwrap(), b"%PDF");
    assert!(!workspace.path().join("from-env").exists());
}

#[test]
fn test_rust_log_enables_debug_output() {
    let workspace = TempDir::new().unwrap();
    offer_pack(&workspace)
        .env("RUST_LOG", "debug")
        .args(["set", "1", "label", "x"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_default_log_level_hides_debug_output() {
    let workspace = TempDir::new().unwrap();
    offer_pack(&workspace)
        .args(["set", "1", "label", "x"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());
}

#[test]
fn test_items_listing_flags_reference_without_contract() {
    let workspace = TempDir::new().unwrap();
    run_ok(&workspace, &["tags", "2", "luxmed"]);
    run_ok(&workspace, &["contract", "2", "--ref", "1"]);

    let listing = run_ok(&workspace, &["items"]);
    let line = listing.lines().nth(1).unwrap_or_default();
    assert!(line.contains("[needs base contract]"), "{listing}");
    assert!(!line.contains("[contract from item 1]"), "{listing}");

    run_ok(&workspace, &["contract", "1", "--set"]);
    let listing = run_ok(&workspace, &["items"]);
    assert!(listing.lines().nth(1).unwrap_or_default().contains("[contract from item 1]"), "{listing}");
}

#[test]
fn test_json_bundles_flag_writes_json() {
    let workspace = TempDir::new().unwrap();
    run_ok(&workspace, &["set", "1", "label", "Solo"]);
    run_ok(&workspace, &["toggle", "1", "left"]);
    let package_id = first_line(&run_ok(&workspace, &["package", "save", "Solo"]));

    run_ok(&workspace, &["--json-bundles", "package", "export", &package_id, "--out", "bundles"]);

    let raw = fs::read_to_string(workspace.path().join("bundles/Solo.json")).unwrap();
    let bundle: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(bundle["generatedText"], "Solo\n(none)");
}

#[test]
fn test_csv_export_is_stored_as_file() {
    let workspace = TempDir::new().unwrap();
    run_ok(&workspace, &["set", "1", "label", "Pakiet \"Plus\""]);
    run_ok(&workspace, &["toggle", "1", "left"]);
    run_ok(&workspace, &["toggle", "1", "right", "--editing"]);

    let csv = run_ok(&workspace, &["csv"]);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Index,Label,Description,Link,FileName,SelectedSlots"));
    assert_eq!(lines.next(), Some("1,\"Pakiet \"\"Plus\"\"\",\"\",\"\",\"\",\"left|right\""));
    assert_eq!(csv.lines().count(), 7);

    let files = run_ok(&workspace, &["files", "list"]);
    assert!(files.contains("text/csv"), "{files}");
}

#[test]
fn test_files_rm_requires_yes_when_not_interactive() {
    let workspace = TempDir::new().unwrap();
    let note = workspace.path().join("note.txt");
    fs::write(&note, "hello").unwrap();
    let file_id = first_line(&run_ok(&workspace, &["upload", "3", note.to_str().unwrap()]));

    offer_pack(&workspace)
        .args(["files", "rm", &file_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    offer_pack(&workspace).args(["files", "rm", &file_id, "--yes"]).assert().success();
    let files = run_ok(&workspace, &["files", "list"]);
    assert!(!files.contains(&file_id), "{files}");
}

#[test]
fn test_corrupt_files_store_is_treated_as_empty() {
    let workspace = TempDir::new().unwrap();
    let data = workspace.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("files.json"), "{not json").unwrap();

    let files = run_ok(&workspace, &["files", "list"]);
    assert!(files.trim().is_empty());
}

#[test]
fn test_sqlite_backend_persists_items() {
    let workspace = TempDir::new().unwrap();
    run_ok(&workspace, &["--storage", "sqlite", "set", "1", "label", "Z bazy"]);
    run_ok(&workspace, &["--storage", "sqlite", "toggle", "1", "left"]);

    let text = run_ok(&workspace, &["--storage", "sqlite", "generate"]);
    assert_eq!(first_line(&text), "Z bazy");

    let db = workspace.path().join("data").join("offer-pack.sqlite");
    assert!(db_has_key(&db, "items"));
}

#[test]
fn test_config_file_sets_item_count() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("offer-pack.toml"), "[offer-pack]\nitem_count = 3\n").unwrap();

    let listing = run_ok(&workspace, &["items"]);
    assert_eq!(listing.lines().count(), 3, "{listing}");
}

fn db_has_key(db: &Path, key: &str) -> bool {
    let conn = Connection::open(db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .unwrap();
    count == 1
}
