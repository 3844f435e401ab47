//! Grid primitives: compass headings, relative turns and cells.
//!
//! The coordinate frame is the one used by the mms simulator: the x axis grows towards the east,
//! the y axis grows towards the north and the start cell `(0, 0)` sits in the south-west corner.

use std::fmt;

/// Absolute orientation of the mouse or of a cell side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Heading {
    /// Towards increasing y.
    North,
    /// Towards increasing x.
    East,
    /// Towards decreasing y.
    South,
    /// Towards decreasing x.
    West,
}

impl Heading {
    /// Every heading in the fixed neighbour order used across the crate.
    pub(crate) const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the heading obtained after a quarter turn counter-clockwise.
    pub(crate) const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Returns the heading obtained after a quarter turn clockwise.
    pub(crate) const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Returns the opposite heading.
    pub(crate) const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Returns the unit displacement along this heading.
    pub(crate) const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Returns the single letter the mms protocol uses for a wall on this side.
    pub(crate) const fn code(self) -> char {
        match self {
            Self::North => 'n',
            Self::East => 'e',
            Self::South => 's',
            Self::West => 'w',
        }
    }

    /// Returns the heading that leads from `from` into the adjacent cell `to`.
    ///
    /// Cells that are not orthogonally adjacent yield `None`.
    pub(crate) fn between(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|heading| from.offset(*heading) == Some(to))
    }

    /// Position of the heading inside [`Heading::ALL`], used for bit masks.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        formatter.write_str(name)
    }
}

/// Rotation relative to the current heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Turn {
    /// No rotation.
    Ahead,
    /// A quarter turn clockwise.
    Right,
    /// A half turn, issued as two left turns.
    Back,
    /// A quarter turn counter-clockwise.
    Left,
}

impl Turn {
    /// Returns the rotation that turns a mouse facing `from` into facing `to`.
    pub(crate) const fn between(from: Heading, to: Heading) -> Self {
        match (to.index() + 4 - from.index()) % 4 {
            0 => Self::Ahead,
            1 => Self::Right,
            2 => Self::Back,
            _ => Self::Left,
        }
    }
}

/// A single maze cell, addressed in simulator coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Cell {
    /// Column, growing towards the east.
    pub(crate) x: usize,
    /// Row, growing towards the north.
    pub(crate) y: usize,
}

impl Cell {
    /// The start cell of every micromouse maze.
    pub(crate) const START: Self = Self::new(0, 0);

    /// Builds a cell from its coordinates.
    pub(crate) const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell along `heading`, without any bounds on the positive side.
    ///
    /// Only underflow below zero is rejected; callers that know the maze dimensions should use
    /// [`Cell::step`] instead.
    pub(crate) fn offset(self, heading: Heading) -> Option<Self> {
        let (dx, dy) = heading.offset();
        Some(Self::new(
            self.x.checked_add_signed(dx)?,
            self.y.checked_add_signed(dy)?,
        ))
    }

    /// Returns the neighbouring cell along `heading` if it lies inside a `width` by `height` maze.
    pub(crate) fn step(self, heading: Heading, width: usize, height: usize) -> Option<Self> {
        self.offset(heading).filter(|cell| cell.x < width && cell.y < height)
    }

    /// Returns the absolute per-axis distances to `other`.
    pub(crate) const fn delta(self, other: Self) -> (usize, usize) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Returns the number of orthogonal steps to `other` on an open grid.
    pub(crate) const fn manhattan(self, other: Self) -> usize {
        let (dx, dy) = self.delta(other);
        dx + dy
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}
