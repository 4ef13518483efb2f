//! Dungeon system
//!
//! Contains the room graph: rooms and exits, the registry, the two-phase
//! builder, the cycle-safe walker and the maze aggregate.

mod builder;
mod maze;
mod registry;
mod room;
pub mod walker;

pub use builder::{BuildOptions, DuplicatePolicy, NO_EXIT, RoomRecord, build_maze};
pub use maze::{Maze, find_room_by_id, teardown_maze};
pub use registry::{PutOutcome, REGISTRY_GROWTH, RoomRegistry};
pub use room::{Direction, Exit, MAX_ROOM_ID, Room, RoomId, RoomIdx};
