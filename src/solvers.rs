//! Exploration strategies.
//!
//! Every solver drives the mouse from its current cell to a goal cell through a [`Navigator`] and
//! returns the route it found, starting with the cell it left from. Knowledge gathered on the way
//! stays in the navigator, so later runs start out better informed.

mod a_star;
mod breadth_first;
mod depth_first;
mod flood_fill;

use std::fmt;

use clap::ValueEnum;
use color_eyre::eyre::Result;
use serde::Deserialize;
use tracing::debug;

use crate::{drive::Drive, grid::Cell, heuristic::Heuristic, navigator::Navigator};

/// Weight applied to the heuristic when none is configured.
pub(crate) const DEFAULT_WEIGHT: f64 = 4.0;

/// Exploration algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Algorithm {
    /// Follow decreasing flood distances, recomputing them whenever a wall is found.
    #[default]
    #[value(alias = "flood")]
    #[serde(alias = "flood")]
    FloodFill,
    /// Best-first search on path cost plus a heuristic estimate.
    #[value(alias = "astar")]
    #[serde(alias = "astar")]
    AStar,
    /// Depth-first graph search.
    #[value(alias = "dfs")]
    #[serde(alias = "dfs")]
    DepthFirst,
    /// Breadth-first graph search.
    #[value(alias = "bfs")]
    #[serde(alias = "bfs")]
    BreadthFirst,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::FloodFill => "flood fill",
            Self::AStar => "A*",
            Self::DepthFirst => "depth-first search",
            Self::BreadthFirst => "breadth-first search",
        })
    }
}

/// Algorithm together with the tuning of its heuristic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Strategy {
    /// Exploration algorithm.
    pub(crate) algorithm: Algorithm,
    /// Distance estimate used by A*.
    pub(crate) heuristic: Heuristic,
    /// Factor the estimate is multiplied by.
    pub(crate) weight: f64,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            heuristic: Heuristic::default(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

impl Strategy {
    /// Drives the mouse to a goal cell and returns the route found, start included.
    ///
    /// # Errors
    ///
    /// This function may return errors if the goal cannot be reached, or if the drive fails.
    pub(crate) fn explore<D: Drive>(&self, navigator: &mut Navigator<D>) -> Result<Vec<Cell>> {
        debug!(algorithm = %self.algorithm, from = %navigator.position(), "exploring");

        match self.algorithm {
            Algorithm::FloodFill => flood_fill::explore(navigator),
            Algorithm::AStar => a_star::explore(navigator, self.heuristic, self.weight),
            Algorithm::DepthFirst => depth_first::explore(navigator),
            Algorithm::BreadthFirst => breadth_first::explore(navigator),
        }
    }
}

/// Cells reached by a graph search, each linked to the cell it was reached from.
#[derive(Debug)]
struct SearchTree {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Whether each cell, in row-major order, has been claimed.
    marked: Vec<bool>,
    /// Cell each claimed cell was reached from.
    parents: Vec<Option<Cell>>,
}

impl SearchTree {
    /// Creates an empty tree for a `width` by `height` maze.
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            marked: vec![false; width * height],
            parents: vec![None; width * height],
        }
    }

    /// Returns the row-major slot of `cell`, if it is inside the maze.
    fn slot(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height).then(|| cell.y * self.width + cell.x)
    }

    /// Returns whether `cell` has been claimed. Cells outside the maze count as claimed.
    fn is_marked(&self, cell: Cell) -> bool {
        self.slot(cell)
            .and_then(|slot| self.marked.get(slot))
            .copied()
            .unwrap_or(true)
    }

    /// Claims `cell`, reached from `parent`. Returns `false` if it was already claimed.
    fn mark(&mut self, cell: Cell, parent: Option<Cell>) -> bool {
        if self.is_marked(cell) {
            return false;
        }
        if let Some(slot) = self.slot(cell) {
            if let Some(flag) = self.marked.get_mut(slot) {
                *flag = true;
            }
            if let Some(link) = self.parents.get_mut(slot) {
                *link = parent;
            }
        }

        true
    }

    /// Returns the chain of cells from the root of the tree to `end`.
    fn route_to(&self, end: Cell) -> Vec<Cell> {
        let mut route = vec![end];
        let mut current = end;
        while let Some(parent) = self
            .slot(current)
            .and_then(|slot| self.parents.get(slot).copied().flatten())
        {
            route.push(parent);
            current = parent;
        }
        route.reverse();

        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::Heading,
        loader,
        maze::Maze,
        simulator::Simulator,
    };

    /// Every algorithm, in declaration order.
    const ALGORITHMS: [Algorithm; 4] = [
        Algorithm::FloodFill,
        Algorithm::AStar,
        Algorithm::DepthFirst,
        Algorithm::BreadthFirst,
    ];

    /// A 4 by 4 maze whose centre block is walled off from the rest.
    fn sealed() -> Maze {
        let mut maze = Maze::new(4, 4);
        for goal in maze.goals() {
            for heading in Heading::ALL {
                if maze.neighbor(goal, heading).is_some_and(|next| !maze.is_goal(next)) {
                    let _ = maze.set_wall(goal, heading);
                }
            }
        }
        maze
    }

    /// Checks that `route` is a walk through open sides of `maze`.
    fn is_walkable(maze: &Maze, route: &[Cell]) -> bool {
        route.windows(2).all(|pair| match pair {
            [from, to] => Heading::between(*from, *to)
                .is_some_and(|heading| !maze.has_wall(*from, heading)),
            _ => false,
        })
    }

    #[test]
    fn test_every_algorithm_reaches_the_centre() {
        let truth = loader::default_maze().expect("built-in maze");

        for algorithm in ALGORITHMS {
            let strategy = Strategy {
                algorithm,
                ..Strategy::default()
            };
            let mut navigator =
                Navigator::new(Simulator::new(truth.clone()), false).expect("valid maze");
            let route = strategy.explore(&mut navigator).expect("goal is reachable");

            assert_eq!(route.first(), Some(&Cell::START), "{algorithm} starts at the start");
            assert!(
                route.last().is_some_and(|cell| truth.is_goal(*cell)),
                "{algorithm} ends in the centre"
            );
            assert!(navigator.maze().is_goal(navigator.position()), "{algorithm} mouse arrived");
            assert!(is_walkable(&truth, &route), "{algorithm} route crosses no wall");
        }
    }

    #[test]
    fn test_sealed_centre_is_reported() {
        for algorithm in ALGORITHMS {
            let strategy = Strategy {
                algorithm,
                ..Strategy::default()
            };
            let mut navigator =
                Navigator::new(Simulator::new(sealed()), false).expect("valid maze");
            let error = strategy
                .explore(&mut navigator)
                .expect_err("centre is unreachable");

            assert!(
                error.to_string().contains("no route to the goal"),
                "{algorithm} reports the missing route: {error}"
            );
        }
    }

    #[test]
    fn test_algorithm_names_parse() {
        assert_eq!(
            Algorithm::from_str("dfs", true),
            Ok(Algorithm::DepthFirst),
            "short alias"
        );
        assert_eq!(
            Algorithm::from_str("a-star", true),
            Ok(Algorithm::AStar),
            "kebab-case name"
        );
    }

    #[test]
    fn test_search_tree_links() {
        let mut tree = SearchTree::new(3, 3);

        assert!(tree.mark(Cell::START, None), "root");
        assert!(tree.mark(Cell::new(0, 1), Some(Cell::START)), "child");
        assert!(tree.mark(Cell::new(1, 1), Some(Cell::new(0, 1))), "grandchild");
        assert!(!tree.mark(Cell::new(0, 1), Some(Cell::new(1, 1))), "claimed once");
        assert!(tree.is_marked(Cell::new(5, 0)), "outside counts as claimed");

        assert_eq!(
            tree.route_to(Cell::new(1, 1)),
            vec![Cell::START, Cell::new(0, 1), Cell::new(1, 1)],
            "route from the root"
        );
    }
}
