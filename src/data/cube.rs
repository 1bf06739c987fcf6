//! Harmony cube registry: the fixed set of cube types tracked per account.

use crate::data::account::CubeLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeKind {
    pub id: u32,
    pub name_en: &'static str,
    pub name_zh: &'static str,
}

pub const CUBES: [CubeKind; 13] = [
    CubeKind { id: 1000301, name_en: "Assault Cube", name_zh: "遗迹突击魔方" },
    CubeKind { id: 1000302, name_en: "Onslaught Cube", name_zh: "战术突击魔方" },
    CubeKind { id: 1000303, name_en: "Resilience Cube", name_zh: "遗迹巨熊魔方" },
    CubeKind { id: 1000304, name_en: "Bastion Cube", name_zh: "战术巨熊魔方" },
    CubeKind { id: 1000305, name_en: "Adjutant Cube", name_zh: "遗迹促进魔方" },
    CubeKind { id: 1000306, name_en: "Wingman Cube", name_zh: "战术促进魔方" },
    CubeKind { id: 1000307, name_en: "Quantum Cube", name_zh: "遗迹量子魔方" },
    CubeKind { id: 1000308, name_en: "Vigor Cube", name_zh: "体力神器魔方" },
    CubeKind { id: 1000309, name_en: "Endurance Cube", name_zh: "遗迹强韧魔方" },
    CubeKind { id: 1000310, name_en: "Healing Cube", name_zh: "遗迹治疗魔方" },
    CubeKind { id: 1000311, name_en: "Tempering Cube", name_zh: "遗迹回火魔方" },
    CubeKind { id: 1000312, name_en: "Relic Assist Cube", name_zh: "遗迹辅助魔方" },
    CubeKind { id: 1000313, name_en: "Destruction Cube", name_zh: "遗迹毁灭魔方" },
];

/// Fresh per-account cube table, every level at zero.
pub fn initial_cube_levels() -> Vec<CubeLevel> {
    CUBES
        .iter()
        .map(|kind| CubeLevel {
            cube_id: kind.id,
            name_en: kind.name_en.to_string(),
            name_zh: kind.name_zh.to_string(),
            level: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn cube_ids_are_unique_and_contiguous() {
        let ids: HashSet<u32> = CUBES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CUBES.len());
        assert_eq!(CUBES.first().map(|c| c.id), Some(1000301));
        assert_eq!(CUBES.last().map(|c| c.id), Some(1000313));
        assert!(initial_cube_levels().iter().all(|c| c.level == 0));
    }
}
