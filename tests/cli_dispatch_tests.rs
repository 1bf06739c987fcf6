use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use exia::config::Language;
use exia::data::{initial_cube_levels, AccountSheet, CharacterRecord, ElementGroup, Progress};
use exia::sheet::{CellValue, Grid};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_exia")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("exia-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

fn exia(dir: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.current_dir(dir)
        .env("EXIA_CONFIG", dir.join("missing.yaml"))
        .env_remove("EXIA_ACCOUNTS")
        .env_remove("EXIA_OUTPUT_DIR")
        .env_remove("EXIA_LANGUAGE");
    cmd
}

fn account(name: &str, synchro: u32) -> AccountSheet {
    AccountSheet {
        name: name.to_string(),
        synchro_level: synchro,
        language: Language::English,
        elements: vec![ElementGroup {
            name: "Fire".to_string(),
            characters: vec![CharacterRecord {
                name: "Red Hood".to_string(),
                name_code: 5070,
                id: 470001,
                priority: Default::default(),
                progress: Some(Progress {
                    limit_break: 10,
                    skill1_level: 10,
                    skill2_level: 10,
                    skill_burst_level: 10,
                    ..Progress::default()
                }),
                equipment: Default::default(),
                ael_score: None,
            }],
        }],
        cubes: initial_cube_levels(),
    }
}

fn write_export(dir: &Path, sheet: &AccountSheet) -> PathBuf {
    let path = dir.join(format!("{}.export.json", sheet.name));
    fs::write(&path, serde_json::to_string_pretty(sheet).expect("serialize")).expect("write export");
    path
}

fn read_grid(path: &Path) -> Grid {
    let text = fs::read_to_string(path).expect("snapshot should exist");
    serde_json::from_str(&text).expect("snapshot should parse")
}

#[test]
fn unknown_command_prints_usage() {
    let dir = unique_temp_dir("usage");
    let output = exia(&dir).arg("serve").output().expect("exia should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: exia"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn render_command_returns_usage_without_path() {
    let dir = unique_temp_dir("render-usage");
    let output = exia(&dir).arg("render").output().expect("render should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: exia render"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn render_command_writes_workbook_and_snapshot() {
    let dir = unique_temp_dir("render");
    let export = write_export(&dir, &account("Commander", 240));
    let out_dir = dir.join("out");

    let output = exia(&dir)
        .args(["render", export.to_string_lossy().as_ref(), out_dir.to_string_lossy().as_ref()])
        .output()
        .expect("render should run");

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out_dir.join("Commander.xlsx").is_file());
    let grid = read_grid(&out_dir.join("Commander.sheet.json"));
    assert_eq!(grid.value(4, 2), &CellValue::text("Commander"));
    assert_eq!(grid.value(4, 4), &CellValue::text("MAX"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn merge_command_stacks_rendered_accounts() {
    let dir = unique_temp_dir("merge");
    let out_dir = dir.join("out");
    for (name, synchro) in [("Alpha", 100), ("Bravo", 300), ("Charlie", 200)] {
        let export = write_export(&dir, &account(name, synchro));
        let status = exia(&dir)
            .args(["render", export.to_string_lossy().as_ref(), out_dir.to_string_lossy().as_ref()])
            .status()
            .expect("render should run");
        assert!(status.success());
    }

    let output = exia(&dir)
        .args(["merge", out_dir.to_string_lossy().as_ref(), "--sort", "4"])
        .output()
        .expect("merge should run");

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("merged 3 file(s)"));
    assert!(out_dir.join("merged.xlsx").is_file());

    let merged = read_grid(&out_dir.join("merged.sheet.json"));
    assert_eq!(merged.value(4, 2), &CellValue::text("Bravo"));
    assert_eq!(merged.value(9, 2), &CellValue::text("Charlie"));
    assert_eq!(merged.value(14, 2), &CellValue::text("Alpha"));
    assert_eq!(merged.value(14, 1), &CellValue::Number(3.0));
    assert_eq!(merged.freeze(), Some((4, 3)));

    // A second merge ignores the previous output.
    let again = exia(&dir)
        .args(["merge", out_dir.to_string_lossy().as_ref()])
        .output()
        .expect("merge should run");
    assert!(String::from_utf8_lossy(&again.stdout).contains("merged 3 file(s)"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn merge_command_fails_on_empty_directory() {
    let dir = unique_temp_dir("merge-empty");
    let output = exia(&dir)
        .args(["merge", dir.to_string_lossy().as_ref()])
        .output()
        .expect("merge should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no .xlsx files"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn run_command_reports_missing_accounts_file() {
    let dir = unique_temp_dir("run-missing");
    let output = exia(&dir)
        .args(["run", "nowhere.csv"])
        .output()
        .expect("run should start");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("run failed"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn run_command_lists_accounts_without_credentials() {
    let dir = unique_temp_dir("run-errors");
    fs::write(
        dir.join("LoginIndex.csv"),
        "Name,E-mail,Password,Cookies\nGhost,,,\nHalf,half@example.com,,nan\n",
    )
    .expect("accounts should be written");
    fs::write(
        dir.join("SearchIndexEng.json"),
        r#"{"elements": {"Fire": {"Red Hood": {"name_code": 5070, "id": 470001}}}}"#,
    )
    .expect("template should be written");

    let output = exia(&dir).arg("run").output().expect("run should start");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("processed 2 account(s), 0 succeeded, 2 failed"));
    let errors = fs::read_to_string(dir.join("ErrorList.txt")).expect("error list should exist");
    assert_eq!(errors, "1: Ghost\n2: Half\n");
    let _ = fs::remove_dir_all(dir);
}
