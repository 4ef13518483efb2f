//! Room occupants: basic enemies and bosses

use serde::{Deserialize, Serialize};

use super::item::GearSet;

/// Number of skills a boss can bring into a fight
pub const BOSS_SKILLS: usize = 5;

/// Identifier of a skill in the skill catalogue
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SkillId(pub u8);

/// Combat statistics of a room occupant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Experience granted on defeat
    pub xp: u32,
    /// Currency dropped on defeat
    pub dzenai: u32,
}

impl Enemy {
    pub fn new(name: impl Into<String>, level: u32, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            level,
            hp: max_hp,
            max_hp,
            attack: level as i32 * 2,
            defense: level as i32,
            xp: level * 10,
            dzenai: level * 5,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

/// A boss: an enemy plus the gear it drops and the skills it fights with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boss {
    pub enemy: Enemy,
    pub drop: GearSet,
    pub skills: [Option<SkillId>; BOSS_SKILLS],
}

/// Whatever occupies a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encounter {
    Enemy(Enemy),
    Boss(Boss),
}

impl Encounter {
    /// The fighting statistics regardless of variant
    pub fn enemy(&self) -> &Enemy {
        match self {
            Encounter::Enemy(enemy) => enemy,
            Encounter::Boss(boss) => &boss.enemy,
        }
    }

    pub fn enemy_mut(&mut self) -> &mut Enemy {
        match self {
            Encounter::Enemy(enemy) => enemy,
            Encounter::Boss(boss) => &mut boss.enemy,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Encounter::Boss(_))
    }
}
