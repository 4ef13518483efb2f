//! Data-format errors raised while building or querying a maze
//!
//! Every error here is fatal for the session: a maze that fails to build or
//! a room that cannot be found leaves no consistent state to continue from.
//! Callers that merely abandon an operation (a failed save) report a
//! [`Severity::Warning`] through their own error types instead.

use thiserror::Error;

use crate::dungeon::Direction;

/// How far an error reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The session cannot continue
    Fatal,
    /// The triggering operation was abandoned; the session continues
    Warning,
}

/// Errors produced by the graph builder and lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Maze has no entry room (id 0)")]
    MissingEntry,

    #[error("Room {id}: entry flag is {flag}, but exactly room 0 is the entry")]
    EntryMismatch { id: u32, flag: bool },

    #[error("Room {room}: {direction} exit leads to unknown room {target}")]
    UnresolvedExit {
        room: u32,
        direction: Direction,
        target: u32,
    },

    #[error("Room {room}: invalid {direction} exit value {value}")]
    InvalidExit {
        room: u32,
        direction: Direction,
        value: i32,
    },

    #[error("Room id {id} appears more than once")]
    DuplicateRoom { id: u32 },

    #[error("Room {id}: boss flag does not match its occupant")]
    BossMismatch { id: u32 },

    #[error("Room id {id} exceeds the maximum of {max}")]
    RoomIdOutOfRange { id: u32, max: u32 },

    #[error("Invalid room id '{key}'")]
    InvalidRoomId { key: String },

    #[error("Room {id} not found in maze")]
    RoomNotFound { id: u32 },
}

impl MazeError {
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}
