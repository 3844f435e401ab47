//! Sensor and actuator surface of a mouse.
//!
//! The [`Drive`] trait is what every solver talks to. It is implemented by the mms protocol
//! client and by the in-process simulator, so the same exploration code runs against both.

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::{
    client::CommandError,
    grid::{Cell, Heading},
};

/// Cell colours understood by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Color {
    /// Black.
    Black,
    /// Blue.
    Blue,
    /// Cyan.
    Cyan,
    /// Gray.
    Gray,
    /// Green.
    Green,
    /// Orange.
    Orange,
    /// Red.
    Red,
    /// White.
    White,
    /// Yellow.
    Yellow,
    /// Dark blue.
    DarkBlue,
    /// Dark cyan.
    DarkCyan,
    /// Dark gray.
    DarkGray,
    /// Dark green.
    DarkGreen,
    /// Dark red.
    DarkRed,
    /// Dark yellow, used to mark explored cells and, by default, the final route.
    DarkYellow,
}

impl Color {
    /// Returns the single character the mms protocol uses for this colour.
    pub(crate) const fn code(self) -> char {
        match self {
            Self::Black => 'k',
            Self::Blue => 'b',
            Self::Cyan => 'c',
            Self::Gray => 'a',
            Self::Green => 'g',
            Self::Orange => 'o',
            Self::Red => 'r',
            Self::White => 'w',
            Self::Yellow => 'y',
            Self::DarkBlue => 'B',
            Self::DarkCyan => 'C',
            Self::DarkGray => 'A',
            Self::DarkGreen => 'G',
            Self::DarkRed => 'R',
            Self::DarkYellow => 'Y',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.code())
    }
}

/// Commands and queries a mouse answers.
///
/// Sensor queries are relative to the mouse's current heading. Every cell-addressed command uses
/// simulator coordinates. The visual commands only affect what the simulator displays.
pub(crate) trait Drive {
    /// Returns the number of columns of the maze.
    fn maze_width(&mut self) -> Result<usize, CommandError>;

    /// Returns the number of rows of the maze.
    fn maze_height(&mut self) -> Result<usize, CommandError>;

    /// Returns whether there is a wall in front of the mouse.
    fn wall_front(&mut self) -> Result<bool, CommandError>;

    /// Returns whether there is a wall to the right of the mouse.
    fn wall_right(&mut self) -> Result<bool, CommandError>;

    /// Returns whether there is a wall to the left of the mouse.
    fn wall_left(&mut self) -> Result<bool, CommandError>;

    /// Moves forward by `distance` cells, or by one cell when `None`.
    ///
    /// Running into a wall fails with [`CommandError::Crashed`].
    fn move_forward(&mut self, distance: Option<usize>) -> Result<(), CommandError>;

    /// Turns a quarter turn clockwise in place.
    fn turn_right(&mut self) -> Result<(), CommandError>;

    /// Turns a quarter turn counter-clockwise in place.
    fn turn_left(&mut self) -> Result<(), CommandError>;

    /// Returns whether the user asked for the mouse to be reset.
    fn was_reset(&mut self) -> Result<bool, CommandError>;

    /// Acknowledges a reset, which puts the mouse back on the start cell facing north.
    fn ack_reset(&mut self) -> Result<(), CommandError>;

    /// Displays a wall on the `heading` side of `cell`.
    fn set_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError>;

    /// Removes a displayed wall from the `heading` side of `cell`.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "walls are only ever discovered, never retracted")
    )]
    fn clear_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError>;

    /// Paints `cell` with `color`.
    fn set_color(&mut self, cell: Cell, color: Color) -> Result<(), CommandError>;

    /// Removes the paint from `cell`.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "paint is only cleared all at once before the speed run")
    )]
    fn clear_color(&mut self, cell: Cell) -> Result<(), CommandError>;

    /// Removes the paint from every cell.
    fn clear_all_color(&mut self) -> Result<(), CommandError>;

    /// Writes `text` on `cell`.
    fn set_text(&mut self, cell: Cell, text: &str) -> Result<(), CommandError>;

    /// Removes the text from `cell`.
    fn clear_text(&mut self, cell: Cell) -> Result<(), CommandError>;

    /// Removes the text from every cell.
    fn clear_all_text(&mut self) -> Result<(), CommandError>;
}
