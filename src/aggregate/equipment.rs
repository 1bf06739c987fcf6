//! Equipment slot resolution: newest non-empty snapshot wins, per slot.

use crate::api::{EquipRecord, EquipSlot};
use crate::data::{Equipment, StatLine, SLOT_COUNT};

/// Picks, for each of the four slots independently, the newest snapshot whose
/// slot is not a placeholder. `records` is in API order (oldest first).
pub fn resolve_slots(records: &[EquipRecord]) -> [Option<&EquipSlot>; SLOT_COUNT] {
    let mut chosen: [Option<&EquipSlot>; SLOT_COUNT] = [None; SLOT_COUNT];
    for record in records.iter().rev() {
        for (idx, pick) in chosen.iter_mut().enumerate() {
            if pick.is_some() {
                continue;
            }
            if let Some(slot) = record.equip_contents.get(idx) {
                if !slot.is_placeholder() {
                    *pick = Some(slot);
                }
            }
        }
        if chosen.iter().all(Option::is_some) {
            break;
        }
    }
    chosen
}

/// Flattens a slot's effects into stat lines, value scaled to percentage points.
pub fn slot_stat_lines(slot: &EquipSlot) -> Vec<StatLine> {
    slot.equip_effects
        .iter()
        .flat_map(|effect| effect.function_details.iter())
        .map(|detail| StatLine {
            stat: detail.function_type.clone(),
            value: detail.function_value.abs() / 100.0,
            level: detail.level,
        })
        .collect()
}

pub fn build_equipment(records: &[EquipRecord]) -> Equipment {
    let mut equipment = Equipment::default();
    for (idx, slot) in resolve_slots(records).into_iter().enumerate() {
        if let Some(slot) = slot {
            equipment.slots[idx] = slot_stat_lines(slot);
        }
    }
    equipment
}

#[cfg(test)]
mod tests {
    use crate::api::types::{EquipEffect, FunctionDetail};

    use super::*;

    fn slot(equip_id: i64, stat: &str, raw_value: f64, level: u32) -> EquipSlot {
        EquipSlot {
            equip_id,
            equip_effects: vec![EquipEffect {
                function_details: vec![FunctionDetail {
                    function_type: stat.to_string(),
                    function_value: raw_value,
                    level,
                }],
            }],
        }
    }

    fn record(slots: [EquipSlot; 4]) -> EquipRecord {
        EquipRecord {
            equip_contents: slots.to_vec(),
        }
    }

    #[test]
    fn newest_non_empty_slot_wins_independently() {
        let older = record([
            slot(1, "StatAtk", 1000.0, 1),
            slot(2, "StatDef", 500.0, 2),
            slot(3, "StatCritical", 300.0, 3),
            slot(4, "StatAmmoLoad", 2000.0, 4),
        ]);
        let newer = record([
            slot(11, "StatAtk", 1500.0, 9),
            EquipSlot::default(),
            slot(13, "StatCritical", 450.0, 15),
            EquipSlot::default(),
        ]);
        let history = [older, newer];
        let resolved = resolve_slots(&history);
        let ids: Vec<i64> = resolved.iter().map(|s| s.map(|s| s.equip_id).unwrap_or(0)).collect();
        assert_eq!(ids, vec![11, 2, 13, 4]);
    }

    #[test]
    fn resolution_ignores_any_number_of_older_snapshots() {
        let newest = record([
            slot(21, "StatAtk", 100.0, 1),
            slot(22, "StatAtk", 100.0, 1),
            slot(23, "StatAtk", 100.0, 1),
            slot(24, "StatAtk", 100.0, 1),
        ]);
        let filler = record([
            slot(1, "StatDef", 1.0, 1),
            slot(2, "StatDef", 1.0, 1),
            slot(3, "StatDef", 1.0, 1),
            slot(4, "StatDef", 1.0, 1),
        ]);
        let short = build_equipment(&[newest.clone()]);
        let mut history = vec![filler; 7];
        history.push(newest);
        assert_eq!(build_equipment(&history), short);
    }

    #[test]
    fn placeholder_with_effects_still_counts() {
        let effects_only = slot(-99, "StatDef", -250.0, 5);
        let equipment = build_equipment(&[record([
            effects_only,
            EquipSlot::default(),
            EquipSlot::default(),
            EquipSlot::default(),
        ])]);
        assert_eq!(equipment.slots[0][0].value, 2.5, "value is absolute and scaled");
        assert!(equipment.slots[1].is_empty());
    }

    #[test]
    fn short_snapshot_leaves_missing_slots_empty() {
        let partial = EquipRecord {
            equip_contents: vec![slot(5, "StatAtk", 100.0, 1)],
        };
        let equipment = build_equipment(&[partial]);
        assert_eq!(equipment.slots[0].len(), 1);
        assert!(equipment.slots[3].is_empty());
    }
}
