//! Cycle-safe depth-first traversal of the room graph
//!
//! One traversal serves teardown, save enumeration, id lookup and (with a
//! cursor attached, see [`crate::map`]) map rendering. Each room id is
//! marked in a fresh [`RoomRegistry`] before its exits are expanded, so a
//! room is visited exactly once no matter how many paths or cycles lead to
//! it. The walk keeps its own stack instead of recursing; rooms come out in
//! the same pre-order a recursive walk over north, east, south, west would
//! produce.

use std::ops::ControlFlow;

use super::maze::Maze;
use super::registry::{PutOutcome, RoomRegistry};
use super::room::{Room, RoomIdx};

/// Walk from `start`, stopping early when `visit` breaks
pub fn walk_from<B>(
    maze: &Maze,
    start: RoomIdx,
    mut visit: impl FnMut(RoomIdx, &Room) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut visited = RoomRegistry::with_capacity(maze.size());
    let mut stack = Vec::with_capacity(maze.size());
    stack.push(start);

    while let Some(idx) = stack.pop() {
        let room = maze.room(idx);
        if visited.put(room.id, idx, false) == PutOutcome::Rejected {
            continue;
        }

        if let ControlFlow::Break(value) = visit(idx, room) {
            return ControlFlow::Break(value);
        }

        // Reversed so north is expanded first
        for exit in room.exits.iter().rev() {
            if let Some(next) = exit.target() {
                stack.push(next);
            }
        }
    }

    ControlFlow::Continue(())
}

/// Visit every room reachable from the entry; returns how many were visited
pub fn walk(maze: &Maze, mut visit: impl FnMut(RoomIdx, &Room)) -> usize {
    let mut count = 0;
    let _ = walk_from::<()>(maze, maze.entry(), |idx, room| {
        count += 1;
        visit(idx, room);
        ControlFlow::Continue(())
    });
    count
}

/// Reachable rooms in visiting order
pub fn enumerate(maze: &Maze) -> Vec<RoomIdx> {
    let mut order = Vec::with_capacity(maze.size());
    walk(maze, |idx, _| order.push(idx));
    order
}
