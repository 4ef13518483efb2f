//! Room registry: an id-indexed table of room handles
//!
//! The registry answers one question, "has this id been seen", and serves
//! two callers with different lifetimes:
//! - the builder keeps one for the duration of a build to reject duplicate
//!   ids and to resolve exit targets;
//! - the walker keeps a fresh one per walk as its visited-set.
//!
//! It stores handles only. Rooms are owned by the [`crate::Maze`], so
//! dropping a registry never releases a room.

use super::room::{RoomId, RoomIdx};

/// Slots added each time an id lands past the end of the table
pub const REGISTRY_GROWTH: usize = 16;

/// Result of [`RoomRegistry::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The slot was empty
    Inserted,
    /// The slot was taken and `overwrite` was set
    Replaced,
    /// The slot was taken; the new handle was discarded
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    slots: Vec<Option<RoomIdx>>,
    len: usize,
}

impl RoomRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            len: 0,
        }
    }

    /// Number of slots currently backed
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `room` under `id`, growing the table if needed
    pub fn put(&mut self, id: RoomId, room: RoomIdx, overwrite: bool) -> PutOutcome {
        let slot = id.index();
        if slot >= self.slots.len() {
            self.grow_to(slot);
        }

        match self.slots[slot] {
            None => {
                self.slots[slot] = Some(room);
                self.len += 1;
                PutOutcome::Inserted
            }
            Some(_) if overwrite => {
                self.slots[slot] = Some(room);
                PutOutcome::Replaced
            }
            Some(_) => PutOutcome::Rejected,
        }
    }

    fn grow_to(&mut self, slot: usize) {
        let mut capacity = self.slots.len();
        while capacity <= slot {
            capacity += REGISTRY_GROWTH;
        }
        self.slots.resize(capacity, None);
    }

    pub fn exists(&self, id: RoomId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: RoomId) -> Option<RoomIdx> {
        self.slots.get(id.index()).copied().flatten()
    }

    /// Occupied entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, RoomIdx)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.map(|idx| (RoomId(id as u32), idx)))
    }
}
