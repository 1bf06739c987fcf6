//! Fixed sheet captions per language.

use crate::config::Language;

pub struct Labels {
    pub sheet_title: &'static str,
    pub name: &'static str,
    pub synchro: &'static str,
    pub cube: &'static str,
    pub cube_missing: &'static str,
    /// Row 3 captions over a character block; `None` is covered by the merged item caption.
    pub properties: [Option<&'static str>; 16],
    /// Equipment slots followed by the total row.
    pub slots: [&'static str; 5],
}

static ENGLISH: Labels = Labels {
    sheet_title: "Member Info",
    name: "Name",
    synchro: "Synchro",
    cube: "Cube",
    cube_missing: "Not found",
    properties: [
        Some("LB"),
        Some("Skill 1"),
        Some("Skill 2"),
        Some("Burst"),
        Some("Item"),
        None,
        Some("T10"),
        Some("Elem"),
        Some("Atk"),
        Some("Ammo"),
        Some("Chg Spd"),
        Some("Chg DMG"),
        Some("Crit%"),
        Some("Crit DMG"),
        Some("Hit%"),
        Some("Def"),
    ],
    slots: ["Head", "Body", "Arm", "Leg", "Total"],
};

static CHINESE: Labels = Labels {
    sheet_title: "成员信息",
    name: "名称",
    synchro: "同步器",
    cube: "魔方",
    cube_missing: "未找到",
    properties: [
        Some("突破"),
        Some("技能1"),
        Some("技能2"),
        Some("爆裂"),
        Some("珍藏品"),
        None,
        Some("T10"),
        Some("优越"),
        Some("攻击"),
        Some("弹夹"),
        Some("蓄速"),
        Some("蓄伤"),
        Some("暴击"),
        Some("暴伤"),
        Some("命中"),
        Some("防御"),
    ],
    slots: ["头", "身", "手", "足", "合计"],
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::English => &ENGLISH,
        Language::Chinese => &CHINESE,
    }
}
