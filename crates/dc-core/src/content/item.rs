//! Loot, inventory items and gear

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Number of gear slots on a character or a boss drop
pub const GEAR_SLOTS: usize = 5;

/// Where a piece of gear is worn
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GearSlot {
    Head,
    Body,
    Hands,
    Legs,
    Weapon,
}

/// A wearable item; `bonus` is added to each stat in [`crate::Stat`] order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub name: String,
    pub slot: GearSlot,
    pub bonus: [i32; 5],
}

impl Gear {
    pub fn new(name: impl Into<String>, slot: GearSlot, bonus: [i32; 5]) -> Self {
        Self {
            name: name.into(),
            slot,
            bonus,
        }
    }
}

/// One optional piece of gear per slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Gear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Gear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hands: Option<Gear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legs: Option<Gear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Gear>,
}

impl GearSet {
    pub fn get(&self, slot: GearSlot) -> Option<&Gear> {
        match slot {
            GearSlot::Head => self.head.as_ref(),
            GearSlot::Body => self.body.as_ref(),
            GearSlot::Hands => self.hands.as_ref(),
            GearSlot::Legs => self.legs.as_ref(),
            GearSlot::Weapon => self.weapon.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: GearSlot) -> &mut Option<Gear> {
        match slot {
            GearSlot::Head => &mut self.head,
            GearSlot::Body => &mut self.body,
            GearSlot::Hands => &mut self.hands,
            GearSlot::Legs => &mut self.legs,
            GearSlot::Weapon => &mut self.weapon,
        }
    }

    /// Put `gear` into its slot, returning whatever was there before
    pub fn equip(&mut self, gear: Gear) -> Option<Gear> {
        self.slot_mut(gear.slot).replace(gear)
    }

    pub fn unequip(&mut self, slot: GearSlot) -> Option<Gear> {
        self.slot_mut(slot).take()
    }

    /// Occupied slots, in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Gear> {
        [
            &self.head,
            &self.body,
            &self.hands,
            &self.legs,
            &self.weapon,
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First piece of gear stored under a field other than its own slot
    pub fn misplaced(&self) -> Option<(GearSlot, &Gear)> {
        GearSlot::iter().find_map(|slot| {
            self.get(slot)
                .filter(|gear| gear.slot != slot)
                .map(|gear| (slot, gear))
        })
    }
}

/// Healing item used up on use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub name: String,
    pub heal: i32,
}

/// Valuables converted to dzenai
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasure {
    pub name: String,
    pub value: u32,
}

/// An item, tagged by kind in saved documents: `{"type": "...", "item": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "lowercase")]
pub enum Item {
    Consumable(Consumable),
    Gear(Gear),
    Treasure(Treasure),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Consumable(c) => &c.name,
            Item::Gear(g) => &g.name,
            Item::Treasure(t) => &t.name,
        }
    }
}

/// A stack of identical items in the player's pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub count: u32,
    #[serde(flatten)]
    pub item: Item,
}
