//! Distance estimates for the A* search.

use std::f64::consts::SQRT_2;

use clap::ValueEnum;
use serde::Deserialize;

use crate::{grid::Cell, maze::Maze};

/// Estimate of the remaining distance between two cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Heuristic {
    /// Sum of the per-axis distances.
    Manhattan,
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Diagonal moves cost the square root of two.
    Octile,
    /// Largest per-axis distance.
    Chebyshev,
    /// Straight-line distance plus both cells' distance to the centre of the maze.
    Centroid,
    /// No estimate, which turns A* into Dijkstra's algorithm.
    Zero,
}

impl Heuristic {
    /// Returns the unweighted estimate between `from` and `to` in `maze`.
    pub(crate) fn estimate(self, from: Cell, to: Cell, maze: &Maze) -> f64 {
        let (dx, dy) = from.delta(to);
        let (dx, dy) = (to_float(dx), to_float(dy));

        match self {
            Self::Manhattan => to_float(from.manhattan(to)),
            Self::Euclidean => dx.hypot(dy),
            Self::Octile => (SQRT_2 - 2.0).mul_add(dx.min(dy), dx + dy),
            Self::Chebyshev => dx.max(dy),
            Self::Centroid => {
                let centre_x = (to_float(maze.width()) - 1.0) / 2.0;
                let centre_y = (to_float(maze.height()) - 1.0) / 2.0;
                let spread = |cell: Cell| {
                    (to_float(cell.x) - centre_x).hypot(to_float(cell.y) - centre_y)
                };

                dx.hypot(dy) + spread(from) + spread(to)
            }
            Self::Zero => 0.0,
        }
    }
}

/// Converts a cell count into a float, saturating at `u32::MAX`.
pub(crate) fn to_float(value: usize) -> f64 {
    u32::try_from(value).map_or(f64::from(u32::MAX), f64::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns whether two estimates agree up to rounding.
    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn test_estimates_for_three_four_offset() {
        let maze = Maze::new(16, 16);
        let from = Cell::new(0, 0);
        let to = Cell::new(3, 4);

        assert!(close(Heuristic::Manhattan.estimate(from, to, &maze), 7.0), "manhattan");
        assert!(close(Heuristic::Euclidean.estimate(from, to, &maze), 5.0), "euclidean");
        assert!(close(Heuristic::Chebyshev.estimate(from, to, &maze), 4.0), "chebyshev");
        assert!(
            close(Heuristic::Octile.estimate(from, to, &maze), 1.0 + 3.0 * SQRT_2),
            "octile"
        );
        assert!(close(Heuristic::Zero.estimate(from, to, &maze), 0.0), "zero");
    }

    #[test]
    fn test_centroid_penalises_distance_from_centre() {
        let maze = Maze::new(3, 3);
        let centre = Cell::new(1, 1);

        assert!(
            close(Heuristic::Centroid.estimate(centre, centre, &maze), 0.0),
            "centre to itself"
        );
        assert!(
            close(Heuristic::Centroid.estimate(Cell::START, centre, &maze), 2.0 * SQRT_2),
            "corner to centre"
        );
    }

    #[test]
    fn test_estimates_are_symmetric() {
        let maze = Maze::new(8, 8);
        let first = Cell::new(1, 6);
        let second = Cell::new(5, 2);

        for heuristic in Heuristic::value_variants() {
            assert!(
                close(
                    heuristic.estimate(first, second, &maze),
                    heuristic.estimate(second, first, &maze)
                ),
                "{heuristic:?} is symmetric"
            );
        }
    }
}
