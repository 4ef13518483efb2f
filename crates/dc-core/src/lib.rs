//! dc-core: Room graph core for the dungeon crawler
//!
//! Builds a dungeon as a directed, possibly cyclic graph of rooms and walks
//! it without recursion or duplicate visits. This crate does no I/O; saving
//! and loading live in `dc-save`, terminal output in `dc-tui`.

pub mod content;
pub mod dungeon;
pub mod map;
pub mod player;

mod error;
mod world;

pub use dungeon::{
    BuildOptions, Direction, DuplicatePolicy, Exit, Maze, NO_EXIT, Room, RoomId, RoomIdx,
    RoomRecord, build_maze, find_room_by_id, teardown_maze,
};
pub use error::{MazeError, Severity};
pub use map::{Glyph, MapGrid, render_map};
pub use player::{EQUIPPED_SKILLS, Player, SKILL_COUNT, Skill, SkillTree, Stat, StatPart, Stats};
pub use world::World;
