//! Room graph builder
//!
//! Turns a flat list of room records, whose exits name their targets by id,
//! into a linked [`Maze`]. Exits may point at rooms that come later in the
//! list, so building runs in two phases:
//!
//! 1. allocate: validate each record and give it a slot in the room arena,
//!    keeping its exits as pending ids;
//! 2. connect: resolve every pending id through the registry into a room
//!    handle.
//!
//! Exits never hold a raw id after a successful build.

use tracing::{debug, warn};

use crate::content::{Encounter, Item};
use crate::error::MazeError;

use super::maze::Maze;
use super::registry::{PutOutcome, RoomRegistry};
use super::room::{Direction, Exit, MAX_ROOM_ID, Room, RoomId, RoomIdx};

/// Exit value meaning "no connection" in room records
pub const NO_EXIT: i32 = -1;

/// What to do with a record whose id was already built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first record with that id and drop the rest with a warning
    #[default]
    KeepFirst,
    /// Fail the build
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub duplicates: DuplicatePolicy,
}

impl BuildOptions {
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// A room as described by a definition or save document
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRecord {
    pub id: u32,
    pub is_entry: bool,
    pub description: String,
    /// Target ids in direction order, [`NO_EXIT`] for none
    pub exits: [i32; 4],
    pub has_boss: bool,
    pub loot: Option<Item>,
    pub encounter: Option<Encounter>,
    pub story: Option<String>,
}

impl RoomRecord {
    /// A room with no exits and no contents; room 0 is flagged as the entry
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            is_entry: id == RoomId::ENTRY.0,
            description: description.into(),
            exits: [NO_EXIT; 4],
            has_boss: false,
            loot: None,
            encounter: None,
            story: None,
        }
    }

    /// Targets past `i32::MAX` saturate; they are out of range either way
    pub fn with_exit(mut self, dir: Direction, target: u32) -> Self {
        self.exits[dir.index()] = i32::try_from(target).unwrap_or(i32::MAX);
        self
    }

    pub fn with_loot(mut self, item: Item) -> Self {
        self.loot = Some(item);
        self
    }

    /// Sets the occupant and the boss flag to match it
    pub fn with_encounter(mut self, encounter: Encounter) -> Self {
        self.has_boss = encounter.is_boss();
        self.encounter = Some(encounter);
        self
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = Some(story.into());
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum PendingExit {
    None,
    Id(RoomId),
}

struct PendingRoom {
    room: Room,
    exits: [PendingExit; 4],
}

fn validate(record: &RoomRecord) -> Result<[PendingExit; 4], MazeError> {
    if record.id > MAX_ROOM_ID {
        return Err(MazeError::RoomIdOutOfRange {
            id: record.id,
            max: MAX_ROOM_ID,
        });
    }
    if record.is_entry != (record.id == RoomId::ENTRY.0) {
        return Err(MazeError::EntryMismatch {
            id: record.id,
            flag: record.is_entry,
        });
    }
    // A boss room may have lost its boss already; a basic room never holds one
    match &record.encounter {
        Some(Encounter::Boss(_)) if !record.has_boss => {
            return Err(MazeError::BossMismatch { id: record.id });
        }
        Some(Encounter::Enemy(_)) if record.has_boss => {
            return Err(MazeError::BossMismatch { id: record.id });
        }
        _ => {}
    }

    let mut exits = [PendingExit::None; 4];
    for dir in Direction::ALL {
        let value = record.exits[dir.index()];
        exits[dir.index()] = match value {
            NO_EXIT => PendingExit::None,
            v if v >= 0 && v as u32 > MAX_ROOM_ID => {
                return Err(MazeError::RoomIdOutOfRange {
                    id: v as u32,
                    max: MAX_ROOM_ID,
                });
            }
            v if v >= 0 => PendingExit::Id(RoomId(v as u32)),
            v => {
                return Err(MazeError::InvalidExit {
                    room: record.id,
                    direction: dir,
                    value: v,
                });
            }
        };
    }
    Ok(exits)
}

/// Build a maze from room records; room 0 becomes the entry
pub fn build_maze(
    name: impl Into<String>,
    records: impl IntoIterator<Item = RoomRecord>,
    options: BuildOptions,
) -> Result<Maze, MazeError> {
    let name = name.into();
    let records = records.into_iter();
    let mut registry = RoomRegistry::with_capacity(records.size_hint().0);
    let mut pending: Vec<PendingRoom> = Vec::with_capacity(records.size_hint().0);

    // Phase 1: allocate
    for record in records {
        let exits = validate(&record)?;
        let id = RoomId(record.id);
        let idx = RoomIdx(pending.len());

        if registry.put(id, idx, false) == PutOutcome::Rejected {
            match options.duplicates {
                DuplicatePolicy::KeepFirst => {
                    warn!(room = id.0, maze = %name, "dropping duplicate room record");
                    continue;
                }
                DuplicatePolicy::Reject => return Err(MazeError::DuplicateRoom { id: id.0 }),
            }
        }

        pending.push(PendingRoom {
            room: Room {
                id,
                description: record.description,
                exits: [Exit::None; 4],
                has_boss: record.has_boss,
                encounter: record.encounter,
                loot: record.loot,
                story: record.story,
            },
            exits,
        });
    }

    let entry = registry.get(RoomId::ENTRY).ok_or(MazeError::MissingEntry)?;

    // Phase 2: connect
    let mut rooms = Vec::with_capacity(pending.len());
    for PendingRoom { mut room, exits } in pending {
        for dir in Direction::ALL {
            if let PendingExit::Id(target) = exits[dir.index()] {
                let idx = registry.get(target).ok_or(MazeError::UnresolvedExit {
                    room: room.id.0,
                    direction: dir,
                    target: target.0,
                })?;
                room.exits[dir.index()] = Exit::Room(idx);
            }
        }
        rooms.push(room);
    }

    debug!(maze = %name, rooms = rooms.len(), "maze built");
    Ok(Maze::from_parts(name, rooms, entry))
}
