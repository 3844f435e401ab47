//! Online A* search.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use color_eyre::eyre::{bail, Result};
use tracing::trace;

use super::SearchTree;
use crate::{
    drive::{Color, Drive},
    grid::Cell,
    heuristic::{to_float, Heuristic},
    maze::Maze,
    navigator::Navigator,
};

/// Frontier entry, ordered by estimated total cost and then by insertion order.
#[derive(Clone, Copy, Debug)]
struct Entry {
    /// Path cost so far plus the weighted estimate to the nearest goal.
    priority: f64,
    /// Insertion counter.
    order: usize,
    /// Path cost from the start.
    cost: usize,
    /// Cell to expand.
    cell: Cell,
    /// Cell the entry was pushed from.
    parent: Option<Cell>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.order.cmp(&other.order))
    }
}

/// Weighted distance estimate from `cell` to the closest of `goals`.
fn estimate(heuristic: Heuristic, weight: f64, cell: Cell, goals: &[Cell], maze: &Maze) -> f64 {
    weight
        * goals
            .iter()
            .map(|goal| heuristic.estimate(cell, *goal, maze))
            .fold(f64::INFINITY, f64::min)
}

/// Expands cells in order of cost plus estimate, physically visiting each one first.
///
/// The mouse travels to every popped cell through the cells it has already visited and senses
/// it there, so children are only generated from fully known cells.
///
/// # Errors
///
/// This function may return errors if the frontier runs dry before a goal is popped, or if the
/// drive fails.
pub(super) fn explore<D: Drive>(
    navigator: &mut Navigator<D>,
    heuristic: Heuristic,
    weight: f64,
) -> Result<Vec<Cell>> {
    let maze = navigator.maze();
    let goals = maze.goals();
    let mut tree = SearchTree::new(maze.width(), maze.height());
    let mut best: Vec<Option<usize>> = vec![None; maze.area()];
    let mut frontier = BinaryHeap::new();
    let mut order = 0;

    let start = navigator.position();
    frontier.push(Reverse(Entry {
        priority: estimate(heuristic, weight, start, &goals, maze),
        order,
        cost: 0,
        cell: start,
        parent: None,
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        let slot = navigator.maze().slot(entry.cell);
        let known = slot.and_then(|slot| best.get(slot).copied().flatten());
        if known.is_some_and(|cost| cost < entry.cost) || !tree.mark(entry.cell, entry.parent) {
            continue;
        }

        navigator.travel_to(entry.cell)?;
        navigator.paint(entry.cell, Color::DarkYellow)?;
        trace!(cell = %entry.cell, cost = entry.cost, priority = entry.priority, "expanded");

        let maze = navigator.maze();
        if maze.is_goal(entry.cell) {
            return Ok(tree.route_to(entry.cell));
        }

        let cost = entry.cost + 1;
        for next in maze.open_neighbors(entry.cell) {
            if tree.is_marked(next) {
                continue;
            }
            let Some(slot) = maze.slot(next).and_then(|slot| best.get_mut(slot)) else {
                continue;
            };
            if slot.is_some_and(|known| known <= cost) {
                continue;
            }

            *slot = Some(cost);
            order += 1;
            frontier.push(Reverse(Entry {
                priority: to_float(cost) + estimate(heuristic, weight, next, &goals, maze),
                order,
                cost,
                cell: next,
                parent: Some(entry.cell),
            }));
        }
    }

    bail!("no route to the goal: every reachable cell was expanded")
}
