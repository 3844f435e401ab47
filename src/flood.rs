//! Flood-fill distance propagation.
//!
//! A [`FloodMap`] stores, for every cell, the number of steps to the nearest goal cell given what
//! is currently known about the maze. Undiscovered walls are assumed open, so the map starts out
//! as the Manhattan distance to the centre block and only grows as walls are found.

use std::collections::VecDeque;

use crate::{grid::Cell, maze::Maze};

/// Distance-to-goal values for every cell of a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FloodMap {
    /// Number of columns of the maze the values were computed for.
    width: usize,
    /// Distances in row-major order; `None` marks cells with no route to the goal.
    values: Vec<Option<usize>>,
}

impl FloodMap {
    /// Builds the distance map of `maze` with every undiscovered wall assumed open.
    pub(crate) fn new(maze: &Maze) -> Self {
        let mut flood = Self {
            width: maze.width(),
            values: vec![None; maze.area()],
        };
        let _ = flood.recompute(maze);

        flood
    }

    /// Returns the distance from `cell` to the nearest goal, or `None` if it is cut off.
    pub(crate) fn distance(&self, cell: Cell) -> Option<usize> {
        if cell.x >= self.width {
            return None;
        }

        self.values
            .get(cell.y * self.width + cell.x)
            .copied()
            .flatten()
    }

    /// Recomputes every distance from the walls currently recorded in `maze`.
    ///
    /// The propagation runs breadth-first from all goal cells at once. Afterwards every reachable
    /// non-goal cell holds one more than the smallest value among its open neighbours, and goal
    /// cells hold zero. Returns the cells whose value changed.
    pub(crate) fn recompute(&mut self, maze: &Maze) -> Vec<Cell> {
        let mut values = vec![None; maze.area()];
        let mut queue = VecDeque::new();

        for goal in maze.goals() {
            if let Some(value) = maze.slot(goal).and_then(|slot| values.get_mut(slot)) {
                *value = Some(0);
                queue.push_back((goal, 0));
            }
        }

        while let Some((cell, distance)) = queue.pop_front() {
            for next in maze.open_neighbors(cell) {
                let Some(value) = maze.slot(next).and_then(|slot| values.get_mut(slot)) else {
                    continue;
                };
                if value.is_none() {
                    *value = Some(distance + 1);
                    queue.push_back((next, distance + 1));
                }
            }
        }

        let changed = maze
            .cells()
            .filter(|cell| {
                let slot = cell.y * maze.width() + cell.x;
                values.get(slot) != self.values.get(slot)
            })
            .collect();

        self.width = maze.width();
        self.values = values;

        changed
    }
}
