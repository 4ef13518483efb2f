//! Map view of the room graph
//!
//! Rooms are laid out on a square glyph grid by walking the graph from the
//! entry, which sits at the centre. Every exit moves the cursor two cells in
//! its direction and leaves a connector on the cell in between. The walk
//! stops at the grid border and at rooms already placed, so the layout is
//! produced for any graph, cyclic or not. Exits that do not fit a planar
//! layout simply draw a connector towards whatever is already there.

use std::fmt;

use crate::content::Encounter;
use crate::dungeon::{Direction, Maze, RoomIdx, RoomRegistry, Room};

/// Smallest number of room steps from the centre to the border
pub const MIN_MAP_REACH: usize = 2;

/// Side length of the grid for a maze of `size` rooms
pub fn map_side(size: usize) -> usize {
    let per_axis = (size as f64).sqrt().ceil() as usize;
    4 * per_axis.max(MIN_MAP_REACH) + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Glyph {
    #[default]
    Blank,
    Room,
    Entry,
    Loot,
    Enemy,
    Boss,
    Player,
    /// Connector between east/west neighbours
    Horizontal,
    /// Connector between north/south neighbours
    Vertical,
}

impl Glyph {
    /// Pick the glyph for a room; the player's room overrides everything
    pub fn for_room(room: &Room, is_current: bool) -> Glyph {
        if is_current {
            return Glyph::Player;
        }
        match &room.encounter {
            Some(Encounter::Boss(_)) => Glyph::Boss,
            Some(Encounter::Enemy(_)) => Glyph::Enemy,
            None if room.loot.is_some() => Glyph::Loot,
            None if room.is_entry() => Glyph::Entry,
            None => Glyph::Room,
        }
    }

    pub fn connector(dir: Direction) -> Glyph {
        match dir {
            Direction::North | Direction::South => Glyph::Vertical,
            Direction::East | Direction::West => Glyph::Horizontal,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Glyph::Blank => ' ',
            Glyph::Room => '#',
            Glyph::Entry => '>',
            Glyph::Loot => '$',
            Glyph::Enemy => 'e',
            Glyph::Boss => 'B',
            Glyph::Player => '@',
            Glyph::Horizontal => '-',
            Glyph::Vertical => '|',
        }
    }

    pub fn is_room(self) -> bool {
        !matches!(self, Glyph::Blank | Glyph::Horizontal | Glyph::Vertical)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
    side: usize,
    cells: Vec<Glyph>,
}

impl MapGrid {
    pub fn blank(side: usize) -> Self {
        Self {
            side,
            cells: vec![Glyph::Blank; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn centre(&self) -> usize {
        self.side / 2
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Glyph> {
        if row < self.side && col < self.side {
            Some(self.cells[row * self.side + col])
        } else {
            None
        }
    }

    fn set(&mut self, row: usize, col: usize, glyph: Glyph) {
        self.cells[row * self.side + col] = glyph;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> {
        self.cells.chunks(self.side)
    }

    /// Cells holding a room glyph
    pub fn room_count(&self) -> usize {
        self.cells.iter().filter(|g| g.is_room()).count()
    }

    /// Position of the player glyph, if drawn
    pub fn player_position(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&g| g == Glyph::Player)
            .map(|i| (i / self.side, i % self.side))
    }

    /// Offset `pos` by `delta` cells, staying inside the grid
    fn offset(&self, pos: usize, delta: isize) -> Option<usize> {
        pos.checked_add_signed(delta).filter(|&p| p < self.side)
    }
}

impl fmt::Display for MapGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|g| g.to_char()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Lay out `maze` with the player standing in `current`
pub fn render_map(maze: &Maze, current: RoomIdx) -> MapGrid {
    let mut grid = MapGrid::blank(map_side(maze.size()));
    let mut placed = RoomRegistry::with_capacity(maze.size());
    let centre = grid.centre();
    let mut stack = vec![(maze.entry(), centre, centre)];

    while let Some((idx, row, col)) = stack.pop() {
        let room = maze.room(idx);
        if placed.exists(room.id) {
            continue;
        }
        // Another room already took this cell through a different path
        if grid.get(row, col).is_some_and(Glyph::is_room) {
            continue;
        }
        placed.put(room.id, idx, false);
        grid.set(row, col, Glyph::for_room(room, idx == current));

        for dir in Direction::ALL.into_iter().rev() {
            let Some(next) = room.exit(dir).target() else {
                continue;
            };
            let (dr, dc) = dir.step();
            let (Some(next_row), Some(next_col)) =
                (grid.offset(row, 2 * dr), grid.offset(col, 2 * dc))
            else {
                continue;
            };
            grid.set(
                (row + next_row) / 2,
                (col + next_col) / 2,
                Glyph::connector(dir),
            );
            stack.push((next, next_row, next_col));
        }
    }

    grid
}
