//! Merges fetched roster and equipment data into the account template.
//!
//! Synchro level and cube levels are maxima over the whole roster; per-character
//! fields come from the single roster entry sharing the character's name code.

mod equipment;

use crate::api::{EquipRecord, RosterEntry};
use crate::config::Language;
use crate::data::{AccountSheet, AccountTemplate, CharacterRecord, ItemRarity, Progress};

pub use equipment::{build_equipment, resolve_slots, slot_stat_lines};

impl From<&RosterEntry> for Progress {
    fn from(entry: &RosterEntry) -> Self {
        Progress {
            limit_break: entry.limit_break,
            skill1_level: entry.skill1_level,
            skill2_level: entry.skill2_level,
            skill_burst_level: entry.skill_burst_level,
            item_rarity: ItemRarity::from(entry.item_rare),
            item_level: entry.item_level,
        }
    }
}

/// Template + roster → account sheet without equipment.
pub fn build_account(
    template: &AccountTemplate,
    roster: &[RosterEntry],
    language: Language,
    name: &str,
) -> AccountSheet {
    let mut sheet = template.to_account_sheet(name, language);
    apply_roster(&mut sheet, roster);
    sheet
}

pub fn apply_roster(sheet: &mut AccountSheet, roster: &[RosterEntry]) {
    for character in sheet.characters_mut() {
        if let Some(entry) = roster.iter().find(|e| e.name_code == character.name_code) {
            character.progress = Some(Progress::from(entry));
        }
    }

    for entry in roster {
        sheet.synchro_level = sheet.synchro_level.max(entry.level);
        if entry.cube_id == 0 {
            continue;
        }
        if let Some(cube) = sheet.cubes.iter_mut().find(|c| c.cube_id == entry.cube_id) {
            cube.observe(entry.cube_level);
        }
    }
}

pub fn apply_equipment(character: &mut CharacterRecord, records: &[EquipRecord]) {
    character.equipment = build_equipment(records);
}

/// Attack/element/limit-break score. `atk` and `elem` are fractions (0.25 = 25%).
pub fn ael_score(grade: i64, core: i64, atk: f64, elem: f64) -> f64 {
    (1.0 + 0.9 * atk) * (1.0 + elem + 0.10) * (1.0 + grade as f64 * 0.03 + core as f64 * 0.02)
}

/// Fills `ael_score` for every owned character, rounded to two decimals.
pub fn compute_ael_scores(sheet: &mut AccountSheet) {
    for character in sheet.characters_mut() {
        if !character.is_owned() {
            character.ael_score = None;
            continue;
        }
        let (grade, core) = character
            .progress
            .as_ref()
            .map(Progress::grade_and_core)
            .unwrap_or((0, 0));
        let atk = character.equipment.total_of("StatAtk") / 100.0;
        let elem = character.equipment.total_of("IncElementDmg") / 100.0;
        let score = ael_score(grade, core, atk, elem);
        character.ael_score = Some((score * 100.0).round() / 100.0);
    }
}
