//! Document shapes for maze definitions, map saves and player saves
//!
//! A maze document maps each room id (as a string key) to its entry. The
//! same shape serves hand-authored definitions and saved maps; saved maps
//! always list every room. Key order is kept as written, and repeated keys
//! are kept too so the builder's duplicate policy decides what happens to
//! them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use dc_core::content::{Enemy, GearSet, InventorySlot, Item};
use dc_core::{EQUIPPED_SKILLS, SKILL_COUNT, Skill, Stats};

/// Booleans stored as `0` / `1`
mod flag {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::invalid_value(
                Unexpected::Unsigned(other as u64),
                &"0 or 1",
            )),
        }
    }
}

/// Occupant entry; bosses also carry `drop` and `skills`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyEntry {
    #[serde(flatten)]
    pub enemy: Enemy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<GearSet>,
    /// Skill ids, `-1` for an empty slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<[i32; 5]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEntry {
    #[serde(with = "flag")]
    pub is_entry: bool,
    pub info: String,
    /// Target ids in north, east, south, west order; `-1` for no exit
    pub exits: [i32; 4],
    #[serde(with = "flag")]
    pub has_boss: bool,
    #[serde(default)]
    pub loot: Vec<Item>,
    #[serde(default)]
    pub enemy: Vec<EnemyEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

/// Ordered `id -> room` entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDocument {
    pub rooms: Vec<(String, RoomEntry)>,
}

impl MapDocument {
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RoomEntry> {
        self.rooms.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for MapDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rooms.len()))?;
        for (key, entry) in &self.rooms {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

struct MapDocumentVisitor;

impl<'de> Visitor<'de> for MapDocumentVisitor {
    type Value = MapDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of room ids to room entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MapDocument, A::Error> {
        let mut rooms = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, entry)) = access.next_entry::<String, RoomEntry>()? {
            rooms.push((key, entry));
        }
        Ok(MapDocument { rooms })
    }
}

impl<'de> Deserialize<'de> for MapDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapDocumentVisitor)
    }
}

/// Where the player stands: room id plus the map document it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: u32,
    pub map: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsEntry {
    #[serde(with = "flag")]
    pub status: bool,
    pub points: u32,
    pub skills: [Skill; SKILL_COUNT],
    /// Equipped skill ids, `-1` for an empty slot
    pub equipped: [i32; EQUIPPED_SKILLS],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDocument {
    pub name: String,
    pub xp: u32,
    pub lvl: u32,
    pub hp: i32,
    #[serde(rename = "maxHP")]
    pub max_hp: i32,
    pub dzenai: u32,
    #[serde(rename = "invCount")]
    pub inv_count: usize,
    pub room: RoomRef,
    pub inventory: Vec<InventorySlot>,
    pub gear: GearSet,
    pub stats: Stats,
    pub skills: SkillsEntry,
}
