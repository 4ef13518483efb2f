//! The live session: one maze and the player inside it

use tracing::debug;

use crate::dungeon::{Maze, Room, teardown_maze};
use crate::map::{MapGrid, render_map};
use crate::player::Player;

#[derive(Debug, Clone)]
pub struct World {
    pub maze: Maze,
    pub player: Player,
}

impl World {
    pub fn new(maze: Maze, player: Player) -> Self {
        Self { maze, player }
    }

    /// Start a fresh session with a new character at the entry
    pub fn begin(maze: Maze, player_name: impl Into<String>) -> Self {
        let player = Player::new(player_name, maze.entry());
        Self { maze, player }
    }

    pub fn current_room(&self) -> &Room {
        self.maze.room(self.player.room)
    }

    pub fn render_map(&self) -> MapGrid {
        render_map(&self.maze, self.player.room)
    }

    /// Make `next` the live session, tearing down the previous maze
    ///
    /// Returns how many rooms of the old maze were reachable from its entry.
    pub fn replace(&mut self, next: World) -> usize {
        let old = std::mem::replace(self, next);
        let released = teardown_maze(old.maze);
        debug!(maze = %self.maze.name(), released, "session replaced");
        released
    }
}
