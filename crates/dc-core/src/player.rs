//! Player state carried between sessions
//!
//! Only what the save documents need: counters, pack, worn gear, stats, the
//! skill tree and the room the player stands in. Level-up, equip and
//! combat rules belong to the gameplay layer.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::content::{GearSet, InventorySlot, SkillId};
use crate::dungeon::RoomIdx;

/// Skills in the skill tree
pub const SKILL_COUNT: usize = 8;

/// Skills that can be equipped at once
pub const EQUIPPED_SKILLS: usize = 4;

/// Player statistics, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Stat {
    Attack,
    Defense,
    Vitality,
    Agility,
    Luck,
}

/// Index into a stat line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatPart {
    Base = 0,
    Bonus = 1,
    Current = 2,
}

/// Five stat lines of `[base, bonus, current]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub [[i32; 3]; 5]);

impl Stats {
    pub fn line(&self, stat: Stat) -> [i32; 3] {
        self.0[stat as usize]
    }

    pub fn get(&self, stat: Stat, part: StatPart) -> i32 {
        self.0[stat as usize][part as usize]
    }

    pub fn set(&mut self, stat: Stat, part: StatPart, value: i32) {
        self.0[stat as usize][part as usize] = value;
    }

    /// Recompute every current value as base plus bonus
    pub fn refresh(&mut self) {
        for line in self.0.iter_mut() {
            line[StatPart::Current as usize] =
                line[StatPart::Base as usize] + line[StatPart::Bonus as usize];
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub rank: u8,
    /// Turns between uses
    pub cooldown: u32,
    /// Turns until usable again
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTree {
    pub unlocked: bool,
    pub points: u32,
    pub skills: [Skill; SKILL_COUNT],
    pub equipped: [Option<SkillId>; EQUIPPED_SKILLS],
}

impl Default for SkillTree {
    fn default() -> Self {
        let mut skills = [Skill::default(); SKILL_COUNT];
        for (i, skill) in skills.iter_mut().enumerate() {
            skill.id = SkillId(i as u8);
        }
        Self {
            unlocked: false,
            points: 0,
            skills,
            equipped: [None; EQUIPPED_SKILLS],
        }
    }
}

impl SkillTree {
    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Count every cooldown down by one turn
    pub fn tick(&mut self) {
        for skill in self.skills.iter_mut() {
            skill.remaining = skill.remaining.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub xp: u32,
    pub lvl: u32,
    pub hp: i32,
    pub max_hp: i32,
    /// Currency
    pub dzenai: u32,
    pub inventory: Vec<InventorySlot>,
    pub gear: GearSet,
    pub stats: Stats,
    pub skills: SkillTree,
    /// Room the player stands in
    pub room: RoomIdx,
}

impl Player {
    /// A level 1 character standing in `room`
    pub fn new(name: impl Into<String>, room: RoomIdx) -> Self {
        let mut stats = Stats([[5, 0, 0], [5, 0, 0], [5, 0, 0], [5, 0, 0], [1, 0, 0]]);
        stats.refresh();
        Self {
            name: name.into(),
            xp: 0,
            lvl: 1,
            hp: 30,
            max_hp: 30,
            dzenai: 0,
            inventory: Vec::new(),
            gear: GearSet::default(),
            stats,
            skills: SkillTree::default(),
            room,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
