//! Online breadth-first search.

use std::collections::VecDeque;

use color_eyre::eyre::{bail, Result};

use super::SearchTree;
use crate::{
    drive::{Color, Drive},
    grid::Cell,
    navigator::Navigator,
};

/// Expands cells in the order they were discovered until a goal is reached.
///
/// Cells are claimed when enqueued, so the returned route is a shortest one through the cells
/// the search could see.
///
/// # Errors
///
/// This function may return errors if every reachable cell is expanded without finding a goal,
/// or if the drive fails.
pub(super) fn explore<D: Drive>(navigator: &mut Navigator<D>) -> Result<Vec<Cell>> {
    let maze = navigator.maze();
    let mut tree = SearchTree::new(maze.width(), maze.height());
    let start = navigator.position();
    let _ = tree.mark(start, None);
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        navigator.travel_to(cell)?;
        navigator.paint(cell, Color::DarkYellow)?;

        let maze = navigator.maze();
        if maze.is_goal(cell) {
            return Ok(tree.route_to(cell));
        }

        for next in maze.open_neighbors(cell) {
            if tree.mark(next, Some(cell)) {
                queue.push_back(next);
            }
        }
    }

    bail!("no route to the goal: every reachable cell was expanded")
}
