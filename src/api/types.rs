//! Backend response shapes. Every field defaults so partial payloads still decode.

use serde::Deserialize;

/// Sentinel `equip_id` of an empty equipment slot.
pub const EMPTY_EQUIP_ID: i64 = -99;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub area_id: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRoster {
    #[serde(default)]
    pub player_nikkes: Vec<RosterEntry>,
}

/// One owned character as returned by the roster endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RosterEntry {
    pub name_code: u32,
    pub level: u32,
    pub limit_break: i64,
    pub skill1_level: i64,
    pub skill2_level: i64,
    pub skill_burst_level: i64,
    pub item_rare: i64,
    pub item_level: i64,
    pub cube_id: u32,
    pub cube_level: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipContents {
    #[serde(default)]
    pub player_equip_contents: Vec<EquipRecord>,
}

/// One equipment snapshot; the API lists snapshots oldest first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EquipRecord {
    #[serde(default)]
    pub equip_contents: Vec<EquipSlot>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquipSlot {
    #[serde(default = "empty_equip_id")]
    pub equip_id: i64,
    #[serde(default)]
    pub equip_effects: Vec<EquipEffect>,
}

impl Default for EquipSlot {
    fn default() -> Self {
        Self {
            equip_id: EMPTY_EQUIP_ID,
            equip_effects: Vec::new(),
        }
    }
}

impl EquipSlot {
    pub fn is_placeholder(&self) -> bool {
        self.equip_id == EMPTY_EQUIP_ID && self.equip_effects.is_empty()
    }
}

fn empty_equip_id() -> i64 {
    EMPTY_EQUIP_ID
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EquipEffect {
    #[serde(default)]
    pub function_details: Vec<FunctionDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FunctionDetail {
    pub function_type: String,
    pub function_value: f64,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_entry_tolerates_missing_fields() {
        let raw = r#"{"data": {"player_nikkes": [{"name_code": 5001, "level": 200, "extra": true}]}}"#;
        let env: Envelope<PlayerRoster> = serde_json::from_str(raw).expect("should decode");
        let roster = env.data.expect("data present");
        assert_eq!(roster.player_nikkes[0].name_code, 5001);
        assert_eq!(roster.player_nikkes[0].cube_id, 0);
    }

    #[test]
    fn null_data_decodes_to_none() {
        let env: Envelope<EquipContents> =
            serde_json::from_str(r#"{"code": 0, "data": null}"#).expect("should decode");
        assert!(env.data.is_none());
    }

    #[test]
    fn slot_placeholder_needs_sentinel_and_no_effects() {
        let empty: EquipSlot = serde_json::from_str(r#"{"equip_id": -99}"#).expect("decode");
        assert!(empty.is_placeholder());
        let with_effects = EquipSlot {
            equip_effects: vec![EquipEffect::default()],
            ..EquipSlot::default()
        };
        assert!(!with_effects.is_placeholder());
    }
}
