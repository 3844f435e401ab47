//! Online depth-first search.

use color_eyre::eyre::{bail, Result};

use super::SearchTree;
use crate::{
    drive::{Color, Drive},
    grid::{Cell, Heading},
    navigator::Navigator,
};

/// Explores the deepest unexpanded cell first until a goal is reached.
///
/// Open neighbours are pushed in reverse [`Heading::ALL`] order, so the first open
/// heading is tried first. Cells are claimed when popped, and a cell popped again is skipped.
///
/// # Errors
///
/// This function may return errors if every reachable cell is expanded without finding a goal,
/// or if the drive fails.
pub(super) fn explore<D: Drive>(navigator: &mut Navigator<D>) -> Result<Vec<Cell>> {
    let maze = navigator.maze();
    let mut tree = SearchTree::new(maze.width(), maze.height());
    let mut stack = vec![(navigator.position(), None)];

    while let Some((cell, parent)) = stack.pop() {
        if !tree.mark(cell, parent) {
            continue;
        }

        navigator.travel_to(cell)?;
        navigator.paint(cell, Color::DarkYellow)?;

        let maze = navigator.maze();
        if maze.is_goal(cell) {
            return Ok(tree.route_to(cell));
        }

        for heading in Heading::ALL.into_iter().rev() {
            if maze.has_wall(cell, heading) {
                continue;
            }
            if let Some(next) = maze.neighbor(cell, heading).filter(|next| !tree.is_marked(*next)) {
                stack.push((next, Some(cell)));
            }
        }
    }

    bail!("no route to the goal: every reachable cell was expanded")
}
