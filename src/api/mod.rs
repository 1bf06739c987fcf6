//! Portal backend: user info, roster listing and equipment lookups.

mod client;
pub mod directory;
pub mod types;

pub use client::{
    character_id_range, ApiError, PortalClient, EQUIPMENT_PATH, PLAYER_INFO_PATH, ROSTER_PATH,
};
pub use types::{EquipRecord, EquipSlot, RosterEntry, EMPTY_EQUIP_ID};
