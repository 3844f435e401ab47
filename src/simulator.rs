//! In-process stand-in for the mms simulator.
//!
//! The [`Simulator`] answers [`Drive`] calls from a ground-truth [`Maze`] loaded from a maze file,
//! which lets the solvers run, and be tested, without the external simulator. Everything that
//! would change the simulator's display is recorded for the terminal viewer.

use crate::{
    animation::AnimationStep,
    client::CommandError,
    drive::{Color, Drive},
    grid::{Cell, Heading},
    maze::Maze,
};

/// Mouse simulated against a known maze.
#[derive(Debug)]
pub(crate) struct Simulator {
    /// Ground-truth walls.
    maze: Maze,
    /// Cell the mouse occupies.
    position: Cell,
    /// Heading the mouse faces.
    heading: Heading,
    /// Visible effects of every command so far.
    trace: Vec<AnimationStep>,
    /// Number of cells moved.
    moves: usize,
    /// Number of quarter turns made.
    turns: usize,
    /// Number of wall sensor queries answered.
    readings: usize,
    /// Whether a user reset is waiting to be acknowledged.
    reset_pending: bool,
}

/// Movement counters of a simulated mouse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Odometer {
    /// Number of cells moved.
    pub(crate) moves: usize,
    /// Number of quarter turns made.
    pub(crate) turns: usize,
    /// Number of wall sensor queries answered.
    pub(crate) readings: usize,
}

impl Simulator {
    /// Places a mouse on the start cell of `maze`, facing north.
    pub(crate) const fn new(maze: Maze) -> Self {
        Self {
            maze,
            position: Cell::START,
            heading: Heading::North,
            trace: Vec::new(),
            moves: 0,
            turns: 0,
            readings: 0,
            reset_pending: false,
        }
    }

    /// Returns the cell the mouse occupies.
    #[cfg(test)]
    pub(crate) const fn position(&self) -> Cell {
        self.position
    }

    /// Returns the heading the mouse faces.
    #[cfg(test)]
    pub(crate) const fn heading(&self) -> Heading {
        self.heading
    }

    /// Returns the movement counters.
    pub(crate) const fn odometer(&self) -> Odometer {
        Odometer {
            moves: self.moves,
            turns: self.turns,
            readings: self.readings,
        }
    }

    /// Simulates the user pressing reset in the simulator window.
    #[cfg(test)]
    pub(crate) const fn press_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Consumes the simulator and returns the ground truth with the recorded steps.
    pub(crate) fn into_recording(self) -> (Maze, Vec<AnimationStep>) {
        (self.maze, self.trace)
    }

    /// Checks that `cell` can be addressed by a display command.
    fn displayable(&self, cell: Cell, command: &'static str) -> Result<(), CommandError> {
        if self.maze.contains(cell) {
            Ok(())
        } else {
            Err(CommandError::Unexpected {
                command,
                response: format!("cell {cell} is outside the maze"),
            })
        }
    }

    /// Answers a wall sensor query for the `heading` side of the mouse's cell.
    fn read_wall(&mut self, heading: Heading) -> bool {
        self.readings += 1;
        self.maze.has_wall(self.position, heading)
    }

    /// Records a quarter turn to `heading`.
    fn rotate(&mut self, heading: Heading) {
        self.heading = heading;
        self.turns += 1;
        self.trace.push(AnimationStep::Turn(heading));
    }
}

impl Drive for Simulator {
    fn maze_width(&mut self) -> Result<usize, CommandError> {
        Ok(self.maze.width())
    }

    fn maze_height(&mut self) -> Result<usize, CommandError> {
        Ok(self.maze.height())
    }

    fn wall_front(&mut self) -> Result<bool, CommandError> {
        Ok(self.read_wall(self.heading))
    }

    fn wall_right(&mut self) -> Result<bool, CommandError> {
        Ok(self.read_wall(self.heading.right()))
    }

    fn wall_left(&mut self) -> Result<bool, CommandError> {
        Ok(self.read_wall(self.heading.left()))
    }

    fn move_forward(&mut self, distance: Option<usize>) -> Result<(), CommandError> {
        for _ in 0..distance.unwrap_or(1) {
            if self.maze.has_wall(self.position, self.heading) {
                return Err(CommandError::Crashed);
            }
            let next = self
                .maze
                .neighbor(self.position, self.heading)
                .ok_or(CommandError::Crashed)?;

            self.position = next;
            self.moves += 1;
            self.trace.push(AnimationStep::Move(next));
        }

        Ok(())
    }

    fn turn_right(&mut self) -> Result<(), CommandError> {
        self.rotate(self.heading.right());
        Ok(())
    }

    fn turn_left(&mut self) -> Result<(), CommandError> {
        self.rotate(self.heading.left());
        Ok(())
    }

    fn was_reset(&mut self) -> Result<bool, CommandError> {
        Ok(self.reset_pending)
    }

    fn ack_reset(&mut self) -> Result<(), CommandError> {
        self.reset_pending = false;
        self.position = Cell::START;
        self.heading = Heading::North;
        self.trace.push(AnimationStep::Restart);
        Ok(())
    }

    fn set_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError> {
        self.displayable(cell, "setWall")?;
        self.trace.push(AnimationStep::Wall(cell, heading));
        Ok(())
    }

    fn clear_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError> {
        self.displayable(cell, "clearWall")?;
        self.trace.push(AnimationStep::Unwall(cell, heading));
        Ok(())
    }

    fn set_color(&mut self, cell: Cell, color: Color) -> Result<(), CommandError> {
        self.displayable(cell, "setColor")?;
        self.trace.push(AnimationStep::Paint(cell, color));
        Ok(())
    }

    fn clear_color(&mut self, cell: Cell) -> Result<(), CommandError> {
        self.displayable(cell, "clearColor")?;
        self.trace.push(AnimationStep::Unpaint(cell));
        Ok(())
    }

    fn clear_all_color(&mut self) -> Result<(), CommandError> {
        self.trace.push(AnimationStep::ClearPaint);
        Ok(())
    }

    fn set_text(&mut self, cell: Cell, _text: &str) -> Result<(), CommandError> {
        self.displayable(cell, "setText")
    }

    fn clear_text(&mut self, cell: Cell) -> Result<(), CommandError> {
        self.displayable(cell, "clearText")
    }

    fn clear_all_text(&mut self) -> Result<(), CommandError> {
        Ok(())
    }
}
