pub mod account;
pub mod accounts;
pub mod cube;
pub mod template;

pub use account::{
    AccountSheet, CharacterRecord, CubeLevel, ElementGroup, Equipment, ItemLevelDisplay,
    ItemRarity, Priority, Progress, StatLine, SLOT_COUNT, TRACKED_STATS,
};
pub use cube::{initial_cube_levels, CUBES};
pub use accounts::{decode_accounts, is_missing, load_accounts, parse_accounts, AccountRow, AccountsError};
pub use template::{load_template, parse_template, AccountTemplate, TemplateError};
