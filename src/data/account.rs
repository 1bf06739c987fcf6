//! Per-account model: the template skeleton augmented with fetched roster
//! and equipment fields. Serialized as the optional JSON export and read back
//! by `exia render`.

use serde::{Deserialize, Serialize};

use crate::config::Language;

/// Equipment stats summed per character, in sheet column order.
pub const TRACKED_STATS: [&str; 9] = [
    "IncElementDmg",
    "StatAtk",
    "StatAmmoLoad",
    "StatChargeTime",
    "StatChargeDamage",
    "StatCritical",
    "StatCriticalDamage",
    "StatAccuracyCircle",
    "StatDef",
];

pub const SLOT_COUNT: usize = 4;

/// Position of a stat in [TRACKED_STATS].
pub fn tracked_stat_index(stat: &str) -> Option<usize> {
    TRACKED_STATS.iter().position(|s| *s == stat)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Black,
    Blue,
    Yellow,
}

impl Priority {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "black" => Self::Black,
            "blue" => Self::Blue,
            "yellow" => Self::Yellow,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ItemRarity {
    #[default]
    Common,
    Rare,
    SuperRare,
    SuperSuperRare,
}

impl From<i64> for ItemRarity {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Rare,
            2 => Self::SuperRare,
            3 => Self::SuperSuperRare,
            _ => Self::Common,
        }
    }
}

impl From<ItemRarity> for i64 {
    fn from(rarity: ItemRarity) -> Self {
        match rarity {
            ItemRarity::Common => 0,
            ItemRarity::Rare => 1,
            ItemRarity::SuperRare => 2,
            ItemRarity::SuperSuperRare => 3,
        }
    }
}

impl ItemRarity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Common => "",
            Self::Rare => "R",
            Self::SuperRare => "SR",
            Self::SuperSuperRare => "SSR",
        }
    }
}

/// Value shown in the item level column.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemLevelDisplay {
    Blank,
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub limit_break: i64,
    pub skill1_level: i64,
    pub skill2_level: i64,
    pub skill_burst_level: i64,
    pub item_rarity: ItemRarity,
    pub item_level: i64,
}

impl Progress {
    /// SSR items count levels from zero in the API, shown one higher with a star.
    pub fn item_level_display(&self) -> ItemLevelDisplay {
        if self.item_level < 0 {
            return ItemLevelDisplay::Blank;
        }
        match self.item_rarity {
            ItemRarity::SuperSuperRare => {
                ItemLevelDisplay::Text(format!("{}★", self.item_level + 1))
            }
            _ => ItemLevelDisplay::Number(self.item_level),
        }
    }

    pub fn limit_break_display(&self) -> String {
        match self.limit_break {
            lb if lb < 0 => String::new(),
            lb @ 0..=3 => format!("{lb} ★"),
            lb @ 4..=9 => format!("+ {}", lb - 3),
            _ => "MAX".to_string(),
        }
    }

    /// Limit break split into star grade (max 3) and core level.
    pub fn grade_and_core(&self) -> (i64, i64) {
        let lb = self.limit_break.max(0);
        (lb.min(3), (lb - 3).max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub stat: String,
    /// Percentage points, already divided by 100 from the raw API value.
    pub value: f64,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// Head, body, arm, leg.
    pub slots: [Vec<StatLine>; SLOT_COUNT],
}

impl Equipment {
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Per tracked stat, the sum over every line of every filled slot.
    pub fn totals(&self) -> [f64; TRACKED_STATS.len()] {
        let mut totals = [0.0; TRACKED_STATS.len()];
        for line in self.slots.iter().flatten() {
            if let Some(idx) = tracked_stat_index(&line.stat) {
                totals[idx] += line.value;
            }
        }
        totals
    }

    pub fn total_of(&self, stat: &str) -> f64 {
        tracked_stat_index(stat)
            .map(|idx| self.totals()[idx])
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub name_code: u32,
    pub id: u64,
    #[serde(default)]
    pub priority: Priority,
    /// `None` when the roster has no entry for this character.
    #[serde(default)]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ael_score: Option<f64>,
}

impl CharacterRecord {
    pub fn is_owned(&self) -> bool {
        let has_progress = self.progress.as_ref().is_some_and(|p| {
            p.limit_break > 0
                || p.skill1_level > 0
                || p.skill2_level > 0
                || p.skill_burst_level > 0
                || p.item_rarity != ItemRarity::Common
                || p.item_level > 0
        });
        has_progress || !self.equipment.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementGroup {
    pub name: String,
    pub characters: Vec<CharacterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeLevel {
    pub cube_id: u32,
    pub name_en: String,
    pub name_zh: String,
    pub level: u32,
}

impl CubeLevel {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.name_en,
            Language::Chinese => &self.name_zh,
        }
    }

    pub fn observe(&mut self, level: u32) {
        if level > self.level {
            self.level = level;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSheet {
    pub name: String,
    pub synchro_level: u32,
    #[serde(default)]
    pub language: Language,
    pub elements: Vec<ElementGroup>,
    pub cubes: Vec<CubeLevel>,
}

impl AccountSheet {
    pub fn characters(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.elements.iter().flat_map(|e| e.characters.iter())
    }

    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut CharacterRecord> {
        self.elements.iter_mut().flat_map(|e| e.characters.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(rarity: ItemRarity, item_level: i64, limit_break: i64) -> Progress {
        Progress {
            limit_break,
            item_rarity: rarity,
            item_level,
            ..Progress::default()
        }
    }

    #[test]
    fn ssr_item_level_is_shifted_with_star() {
        let p = progress(ItemRarity::SuperSuperRare, 2, 0);
        assert_eq!(p.item_level_display(), ItemLevelDisplay::Text("3★".to_string()));
    }

    #[test]
    fn non_ssr_item_level_is_raw_number() {
        assert_eq!(
            progress(ItemRarity::SuperRare, 7, 0).item_level_display(),
            ItemLevelDisplay::Number(7)
        );
        assert_eq!(
            progress(ItemRarity::Common, 0, 0).item_level_display(),
            ItemLevelDisplay::Number(0)
        );
        assert_eq!(
            progress(ItemRarity::Rare, -1, 0).item_level_display(),
            ItemLevelDisplay::Blank
        );
    }

    #[test]
    fn limit_break_display_covers_stars_cores_and_max() {
        let cases = [(-1, ""), (0, "0 ★"), (3, "3 ★"), (4, "+ 1"), (9, "+ 6"), (10, "MAX")];
        for (lb, expected) in cases {
            assert_eq!(progress(ItemRarity::Common, 0, lb).limit_break_display(), expected);
        }
        assert_eq!(progress(ItemRarity::Common, 0, 6).grade_and_core(), (3, 3));
    }

    #[test]
    fn totals_only_count_tracked_stats() {
        let mut equipment = Equipment::default();
        equipment.slots[0].push(StatLine { stat: "StatAtk".into(), value: 10.5, level: 3 });
        equipment.slots[2].push(StatLine { stat: "StatAtk".into(), value: 4.5, level: 12 });
        equipment.slots[3].push(StatLine { stat: "Unknown".into(), value: 99.0, level: 1 });
        assert_eq!(equipment.total_of("StatAtk"), 15.0);
        assert_eq!(equipment.totals().iter().sum::<f64>(), 15.0);
    }

    #[test]
    fn rarity_serializes_as_api_code() {
        let json = serde_json::to_string(&ItemRarity::SuperSuperRare).expect("serialize");
        assert_eq!(json, "3");
        let back: ItemRarity = serde_json::from_str("2").expect("deserialize");
        assert_eq!(back, ItemRarity::SuperRare);
    }
}
