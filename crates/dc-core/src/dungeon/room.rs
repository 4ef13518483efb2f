//! Rooms, exits and compass directions

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::content::{Encounter, Item};

/// Largest room id a maze may use; ids index the registry directly
pub const MAX_ROOM_ID: u32 = u16::MAX as u32;

/// Room identifier as written in maze documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl RoomId {
    /// The designated entry room
    pub const ENTRY: RoomId = RoomId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of a room inside the maze that owns it
///
/// Only a [`crate::Maze`] hands these out; a handle is meaningless for any
/// other maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomIdx(pub(crate) usize);

impl RoomIdx {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Compass directions, in exit-slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// (row, column) unit steps matching the exit slots
const DIR_STEPS: [(isize, isize); 4] = [
    (-1, 0), // North
    (0, 1),  // East
    (1, 0),  // South
    (0, -1), // West
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Unit step on a map grid where rows grow southwards
    pub fn step(self) -> (isize, isize) {
        DIR_STEPS[self.index()]
    }
}

/// One exit slot: either no connection or a room of the same maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Exit {
    #[default]
    None,
    Room(RoomIdx),
}

impl Exit {
    pub fn target(self) -> Option<RoomIdx> {
        match self {
            Exit::None => None,
            Exit::Room(idx) => Some(idx),
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Exit::Room(_))
    }
}

/// A node of the maze graph
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub description: String,
    pub exits: [Exit; 4],
    pub has_boss: bool,
    pub encounter: Option<Encounter>,
    pub loot: Option<Item>,
    /// Auxiliary story text reference
    pub story: Option<String>,
}

impl Room {
    pub fn exit(&self, dir: Direction) -> Exit {
        self.exits[dir.index()]
    }

    pub fn is_entry(&self) -> bool {
        self.id == RoomId::ENTRY
    }

    pub fn has_enemy(&self) -> bool {
        self.encounter.is_some()
    }

    /// Open exits with their direction, in slot order
    pub fn open_exits(&self) -> impl Iterator<Item = (Direction, RoomIdx)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.exit(dir).target().map(|idx| (dir, idx)))
    }
}
