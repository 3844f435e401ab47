//! Maze model with per-side wall tracking.
//!
//! This module contains the `Maze` struct, used both as the mouse's belief about the maze it is
//! exploring and as the ground truth behind the in-process simulator.

use std::{collections::VecDeque, ops::RangeInclusive};

use color_eyre::eyre::{bail, Result};

use crate::grid::{Cell, Heading};

/// Largest number of cells on one side of a maze the mms simulator supports.
pub(crate) const MAX_SIDE: usize = 255;

/// Checks that a `width` by `height` maze has cells and fits within [`MAX_SIDE`] on both sides.
///
/// # Errors
///
/// This function may return errors if either side is zero or longer than [`MAX_SIDE`].
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("a {width}x{height} maze has no cells");
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        bail!("a {width}x{height} maze is larger than {MAX_SIDE} cells per side");
    }

    Ok(())
}

/// Rectangular maze with a wall flag on every cell side.
///
/// Walls are stored as one bit per side, in [`Heading::index`] order, and every interior wall is
/// recorded on both cells that share it. Sides on the outer boundary always count as walls,
/// whether or not their bit is set. A side whose wall has never been recorded counts as open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Maze {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Wall bit masks in row-major order, starting from the south-west corner.
    walls: Vec<u8>,
}

impl Maze {
    /// Builds a maze with no interior walls.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![0; width * height],
        }
    }

    /// Returns the number of columns.
    pub(crate) const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of cells.
    pub(crate) const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns whether `cell` lies inside the maze.
    pub(crate) const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Returns the row-major position of `cell`, for grids that run parallel to the maze.
    pub(crate) fn slot(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then_some(cell.y * self.width + cell.x)
    }

    /// Iterates over every cell, row by row from the south.
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Returns the neighbour of `cell` along `heading`, if both lie inside the maze.
    pub(crate) fn neighbor(&self, cell: Cell, heading: Heading) -> Option<Cell> {
        if !self.contains(cell) {
            return None;
        }

        cell.step(heading, self.width, self.height)
    }

    /// Records a wall on the `heading` side of `cell` and on the matching side of its neighbour.
    ///
    /// Returns whether anything new was learnt; walls on the outer boundary are always present
    /// and never count as news.
    pub(crate) fn set_wall(&mut self, cell: Cell, heading: Heading) -> bool {
        let Some(other) = self.neighbor(cell, heading) else {
            return false;
        };

        let near = self.mark(cell, heading);
        let far = self.mark(other, heading.reverse());

        near || far
    }

    /// Sets a single wall bit, returning whether it was previously clear.
    fn mark(&mut self, cell: Cell, heading: Heading) -> bool {
        let bit = 1_u8 << heading.index();
        let Some(slot) = self.slot(cell) else {
            return false;
        };

        self.walls.get_mut(slot).is_some_and(|mask| {
            let fresh = *mask & bit == 0;
            *mask |= bit;
            fresh
        })
    }

    /// Returns whether the `heading` side of `cell` is closed.
    pub(crate) fn has_wall(&self, cell: Cell, heading: Heading) -> bool {
        if self.neighbor(cell, heading).is_none() {
            return true;
        }

        self.slot(cell)
            .and_then(|slot| self.walls.get(slot))
            .is_none_or(|mask| mask & (1_u8 << heading.index()) != 0)
    }

    /// Iterates over the neighbours that can be entered from `cell`, in [`Heading::ALL`] order.
    pub(crate) fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Heading::ALL.into_iter().filter_map(move |heading| {
            if self.has_wall(cell, heading) {
                None
            } else {
                self.neighbor(cell, heading)
            }
        })
    }

    /// Returns the goal cells at the centre of the maze.
    ///
    /// Sides with an even number of cells contribute their two middle rows or columns, odd sides
    /// their single middle one, so a 16 by 16 maze yields the classic 2 by 2 centre block.
    pub(crate) fn goals(&self) -> Vec<Cell> {
        let columns = centre(self.width);
        centre(self.height)
            .flat_map(|y| columns.clone().map(move |x| Cell::new(x, y)))
            .collect()
    }

    /// Returns whether `cell` belongs to the centre block.
    pub(crate) fn is_goal(&self, cell: Cell) -> bool {
        self.contains(cell)
            && centre(self.width).contains(&cell.x)
            && centre(self.height).contains(&cell.y)
    }

    /// Finds the shortest route from `from` to any of `targets`.
    ///
    /// The search runs breadth-first over open sides and only enters cells for which `passable`
    /// holds; the targets themselves are always enterable. The returned route starts with `from`
    /// and ends with the reached target.
    pub(crate) fn route<F>(&self, from: Cell, targets: &[Cell], passable: F) -> Option<Vec<Cell>>
    where
        F: Fn(Cell) -> bool,
    {
        if targets.contains(&from) {
            return Some(vec![from]);
        }

        let mut parents: Vec<Option<Cell>> = vec![None; self.area()];
        let mut seen = vec![false; self.area()];
        *seen.get_mut(self.slot(from)?)? = true;

        let mut queue = VecDeque::from([from]);
        while let Some(cell) = queue.pop_front() {
            for next in self.open_neighbors(cell) {
                let Some(slot) = self.slot(next) else {
                    continue;
                };
                if seen.get(slot).copied().unwrap_or(true) {
                    continue;
                }

                let is_target = targets.contains(&next);
                if !is_target && !passable(next) {
                    continue;
                }

                if let Some(flag) = seen.get_mut(slot) {
                    *flag = true;
                }
                if let Some(parent) = parents.get_mut(slot) {
                    *parent = Some(cell);
                }

                if is_target {
                    return Some(self.unwind(&parents, next));
                }
                queue.push_back(next);
            }
        }

        None
    }

    /// Follows parent links back from `end` and returns the route in forward order.
    fn unwind(&self, parents: &[Option<Cell>], end: Cell) -> Vec<Cell> {
        let mut route = vec![end];
        let mut current = end;
        while let Some(parent) = self
            .slot(current)
            .and_then(|slot| parents.get(slot).copied().flatten())
        {
            route.push(parent);
            current = parent;
        }
        route.reverse();

        route
    }
}

/// Returns the middle row or column indices of a side with `cells` cells.
const fn centre(cells: usize) -> RangeInclusive<usize> {
    if cells >= 2 && cells % 2 == 0 {
        cells / 2 - 1..=cells / 2
    } else {
        cells / 2..=cells / 2
    }
}
