//! Room contents
//!
//! Loot items, gear and occupants. Combat and equip rules live with the
//! gameplay code; these are the plain data the maze carries and saves.

mod enemy;
mod item;

pub use enemy::{BOSS_SKILLS, Boss, Encounter, Enemy, SkillId};
pub use item::{Consumable, GEAR_SLOTS, Gear, GearSet, GearSlot, InventorySlot, Item, Treasure};
