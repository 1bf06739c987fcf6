use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use exia::aggregate::{apply_equipment, build_account, compute_ael_scores};
use exia::api::{EquipRecord, RosterEntry};
use exia::config::Language;
use exia::data::parse_template;
use exia::merge::{discover_sheets, load_sheet, merge_directory, SortMode};
use exia::sheet::{read_xlsx_values, render_account, write_snapshot, write_xlsx, CellValue};

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("exia-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

fn rendered(name: &str, synchro: u32, language: Language) -> exia::sheet::Grid {
    let template = parse_template(
        r#"{"elements": {"Wind": [{"name": "Scarlet", "name_code": 5066, "id": 440001, "priority": "yellow"}]}}"#,
    )
    .expect("template");
    let roster: Vec<RosterEntry> = serde_json::from_str(&format!(
        r#"[{{"name_code": 5066, "level": {synchro}, "limit_break": 2, "skill1_level": 10,
             "skill2_level": 10, "skill_burst_level": 10, "item_rare": 2, "item_level": 5,
             "cube_id": 1000305, "cube_level": 9}}]"#
    ))
    .expect("roster");
    let records: Vec<EquipRecord> = serde_json::from_str(
        r#"[{"equip_contents": [
            {"equip_id": 1, "equip_effects": [{"function_details": [
                {"function_type": "StatCriticalDamage", "function_value": 1850, "level": 11}
            ]}]},
            {"equip_id": -99, "equip_effects": []},
            {"equip_id": -99, "equip_effects": []},
            {"equip_id": -99, "equip_effects": []}
        ]}]"#,
    )
    .expect("equipment");

    let mut sheet = build_account(&template, &roster, language, name);
    for character in sheet.characters_mut() {
        apply_equipment(character, &records);
    }
    compute_ael_scores(&mut sheet);
    render_account(&sheet)
}

#[test]
fn workbook_values_survive_calamine_import() {
    let dir = unique_temp_dir("workbook");
    let path = dir.join("Scarlet Fan.xlsx");
    let grid = rendered("Scarlet Fan", 321, Language::English);
    write_xlsx(&grid, &path).expect("workbook should be written");

    let imported = read_xlsx_values(&path).expect("workbook should be readable");
    assert_eq!(imported.title, "Member Info");
    assert_eq!(imported.value(1, 1), &CellValue::text("Name"));
    assert_eq!(imported.value(4, 2), &CellValue::text("Scarlet Fan"));
    assert_eq!(imported.value(4, 3).as_number(), Some(321.0));
    assert_eq!(imported.value(2, 4), &CellValue::text("Scarlet"));
    assert_eq!(imported.value(4, 4), &CellValue::text("2 ★"));
    assert_eq!(imported.value(4, 8), &CellValue::text("SR"));
    let crit_damage = imported.value(4, 17).as_number().unwrap_or_default();
    assert!((crit_damage - 0.185).abs() < 1e-9);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn merge_prefers_snapshot_but_reads_plain_workbooks() {
    let dir = unique_temp_dir("merge-mixed");
    let styled = dir.join("a_styled.xlsx");
    let grid = rendered("Styled", 100, Language::Chinese);
    write_xlsx(&grid, &styled).expect("write");
    write_snapshot(&grid, &styled).expect("snapshot");

    let plain = dir.join("b_plain.xlsx");
    write_xlsx(&rendered("Plain", 200, Language::Chinese), &plain).expect("write");

    let snapshot_grid = load_sheet(&styled).expect("load styled");
    assert_eq!(snapshot_grid, grid);
    let plain_grid = load_sheet(&plain).expect("load plain");
    assert!(plain_grid.merges().is_empty());
    assert_eq!(plain_grid.value(4, 2), &CellValue::text("Plain"));

    let sources = discover_sheets(&dir).expect("discover");
    assert_eq!(sources.len(), 2);

    let report = merge_directory(&dir, SortMode::SynchroDesc, &dir.join("merged.xlsx"))
        .expect("merge");
    assert_eq!(report.files, vec!["b_plain.xlsx", "a_styled.xlsx"]);
    assert!(dir.join("merged.xlsx").is_file());
    let _ = fs::remove_dir_all(dir);
}
