//! The maze aggregate
//!
//! A maze owns every room in an arena; exits refer to rooms by handle, so
//! cycles and shared targets need no reference counting. All rooms live
//! exactly as long as the maze.

use std::ops::ControlFlow;

use tracing::debug;

use crate::content::{Encounter, Item};

use super::room::{Direction, Exit, Room, RoomId, RoomIdx};
use super::walker;

#[derive(Debug, Clone)]
pub struct Maze {
    name: String,
    rooms: Vec<Room>,
    entry: RoomIdx,
}

impl Maze {
    pub(crate) fn from_parts(name: String, rooms: Vec<Room>, entry: RoomIdx) -> Self {
        Self { name, rooms, entry }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of rooms built into this maze
    pub fn size(&self) -> usize {
        self.rooms.len()
    }

    pub fn entry(&self) -> RoomIdx {
        self.entry
    }

    pub fn entry_room(&self) -> &Room {
        self.room(self.entry)
    }

    /// # Panics
    /// If `idx` was handed out by a different maze.
    pub fn room(&self, idx: RoomIdx) -> &Room {
        &self.rooms[idx.0]
    }

    pub fn get(&self, idx: RoomIdx) -> Option<&Room> {
        self.rooms.get(idx.0)
    }

    /// All rooms in build order, reachable or not
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn exit(&self, idx: RoomIdx, dir: Direction) -> Exit {
        self.room(idx).exit(dir)
    }

    pub fn neighbor(&self, idx: RoomIdx, dir: Direction) -> Option<RoomIdx> {
        self.exit(idx, dir).target()
    }

    /// Remove the occupant of a room once it is defeated; the room stays
    pub fn clear_encounter(&mut self, idx: RoomIdx) -> Option<Encounter> {
        let room = &mut self.rooms[idx.0];
        room.has_boss = false;
        room.encounter.take()
    }

    pub fn take_loot(&mut self, idx: RoomIdx) -> Option<Item> {
        self.rooms[idx.0].loot.take()
    }

    pub fn encounter_mut(&mut self, idx: RoomIdx) -> Option<&mut Encounter> {
        self.rooms[idx.0].encounter.as_mut()
    }

    /// Depth-first search from the entry for the room with `id`
    pub fn find_room_by_id(&self, id: RoomId) -> Option<RoomIdx> {
        match walker::walk_from(self, self.entry, |idx, room| {
            if room.id == id {
                ControlFlow::Break(idx)
            } else {
                ControlFlow::Continue(())
            }
        }) {
            ControlFlow::Break(idx) => Some(idx),
            ControlFlow::Continue(()) => None,
        }
    }
}

/// Look up a room by id, searching from the entry
pub fn find_room_by_id(maze: &Maze, id: RoomId) -> Option<&Room> {
    maze.find_room_by_id(id).map(|idx| maze.room(idx))
}

/// Release `maze` and every room in it
///
/// Rooms live in the maze's arena, so dropping the maze frees them all at
/// once, reachable or not. The return value is how many of them a walk from
/// the entry reaches; it is the only observable effect besides the drop.
pub fn teardown_maze(maze: Maze) -> usize {
    let reachable = walker::walk(&maze, |_, _| {});
    debug!(
        maze = %maze.name,
        reachable,
        unreachable = maze.size() - reachable,
        "maze torn down"
    );
    reachable
}
