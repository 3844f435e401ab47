//! The mouse's belief state and low-level motion.
//!
//! A [`Navigator`] wraps a [`Drive`] and keeps track of where the mouse is, which way it faces
//! and what it has learnt about the maze so far. Solvers only ever move the mouse through it.

use color_eyre::eyre::{bail, eyre, OptionExt as _, Result, WrapErr as _};
use tracing::{debug, trace};

use crate::{
    drive::{Color, Drive},
    grid::{Cell, Heading, Turn},
    maze::{self, Maze},
    path,
};

/// Mouse position, heading and maze knowledge on top of a drive.
#[derive(Debug)]
pub(crate) struct Navigator<D> {
    /// Sensors and actuators.
    drive: D,
    /// Walls discovered so far; undiscovered walls count as open.
    maze: Maze,
    /// Cells whose sides have all been sensed, in row-major order.
    visited: Vec<bool>,
    /// Cell the mouse occupies.
    position: Cell,
    /// Heading the mouse faces.
    heading: Heading,
    /// Whether visual hints are forwarded to the drive.
    debug: bool,
    /// Number of cells moved so far.
    moves: usize,
}

impl<D: Drive> Navigator<D> {
    /// Queries the maze dimensions and places the mouse on the start cell, facing north.
    ///
    /// # Errors
    ///
    /// This function may return errors if the dimension queries fail, or if they report an empty
    /// maze or one larger than [`maze::MAX_SIDE`] cells on a side.
    pub(crate) fn new(mut drive: D, debug: bool) -> Result<Self> {
        let width = drive.maze_width()?;
        let height = drive.maze_height()?;
        maze::check_dimensions(width, height)
            .wrap_err("the simulator reported unusable maze dimensions")?;
        debug!(width, height, "maze dimensions");

        let maze = Maze::new(width, height);
        Ok(Self {
            drive,
            visited: vec![false; maze.area()],
            maze,
            position: Cell::START,
            heading: Heading::North,
            debug,
            moves: 0,
        })
    }

    /// Returns what is known about the maze.
    pub(crate) const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Returns the cell the mouse occupies.
    pub(crate) const fn position(&self) -> Cell {
        self.position
    }

    /// Returns the heading the mouse faces.
    pub(crate) const fn heading(&self) -> Heading {
        self.heading
    }

    /// Returns whether visual hints are enabled.
    pub(crate) const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the number of cells moved so far.
    pub(crate) const fn moves(&self) -> usize {
        self.moves
    }

    /// Gives direct access to the drive.
    pub(crate) fn drive_mut(&mut self) -> &mut D {
        &mut self.drive
    }

    /// Consumes the navigator and returns the drive.
    pub(crate) fn into_drive(self) -> D {
        self.drive
    }

    /// Returns whether every side of `cell` is known.
    pub(crate) fn is_visited(&self, cell: Cell) -> bool {
        self.maze
            .slot(cell)
            .and_then(|slot| self.visited.get(slot))
            .copied()
            .unwrap_or(false)
    }

    /// Finds the shortest route from `from` to any of `targets` that only crosses visited cells.
    pub(crate) fn visited_route(&self, from: Cell, targets: &[Cell]) -> Option<Vec<Cell>> {
        self.maze.route(from, targets, |cell| self.is_visited(cell))
    }

    /// Reads the sensors on the first visit to the current cell.
    ///
    /// The side behind the mouse is the one it came in through, or the outer boundary on the
    /// start cell, so after this call all four sides of the cell are known. Returns whether any
    /// new wall was found.
    ///
    /// # Errors
    ///
    /// This function may return errors from the sensor queries or the wall display commands.
    pub(crate) fn sense(&mut self) -> Result<bool> {
        let Some(slot) = self.maze.slot(self.position) else {
            bail!("mouse position {} is outside the maze", self.position);
        };
        if self.visited.get(slot).copied().unwrap_or(false) {
            return Ok(false);
        }

        let left = self.drive.wall_left()?;
        let front = self.drive.wall_front()?;
        let right = self.drive.wall_right()?;

        let mut learnt = false;
        for (present, heading) in [
            (left, self.heading.left()),
            (front, self.heading),
            (right, self.heading.right()),
        ] {
            if present && self.maze.set_wall(self.position, heading) {
                self.drive.set_wall(self.position, heading)?;
                learnt = true;
            }
        }
        if let Some(flag) = self.visited.get_mut(slot) {
            *flag = true;
        }
        trace!(cell = %self.position, left, front, right, "sensed");

        Ok(learnt)
    }

    /// Turns in place until the mouse faces `heading`.
    ///
    /// # Errors
    ///
    /// This function may return errors from the turn commands.
    pub(crate) fn face(&mut self, heading: Heading) -> Result<()> {
        self.turn(Turn::between(self.heading, heading))
    }

    /// Rotates the mouse in place by `turn`.
    ///
    /// # Errors
    ///
    /// This function may return errors from the turn commands.
    pub(crate) fn turn(&mut self, turn: Turn) -> Result<()> {
        self.heading = match turn {
            Turn::Ahead => self.heading,
            Turn::Right => {
                self.drive.turn_right()?;
                self.heading.right()
            }
            Turn::Left => {
                self.drive.turn_left()?;
                self.heading.left()
            }
            Turn::Back => {
                self.drive.turn_left()?;
                self.drive.turn_left()?;
                self.heading.reverse()
            }
        };

        Ok(())
    }

    /// Moves one cell along `heading`.
    ///
    /// # Errors
    ///
    /// This function may return errors if the move would leave the maze or cross a known wall,
    /// or if the drive reports a crash.
    pub(crate) fn step(&mut self, heading: Heading) -> Result<()> {
        let Some(next) = self.maze.neighbor(self.position, heading) else {
            bail!("cannot move {heading} out of the maze from {}", self.position);
        };
        if self.maze.has_wall(self.position, heading) {
            bail!("cannot move {heading} from {} through a known wall", self.position);
        }

        self.face(heading)?;
        self.drive.move_forward(None)?;
        self.position = next;
        self.moves += 1;

        Ok(())
    }

    /// Moves into the adjacent cell `cell`.
    ///
    /// # Errors
    ///
    /// This function may return errors if `cell` is not adjacent to the mouse, or from
    /// [`Navigator::step`].
    pub(crate) fn step_to(&mut self, cell: Cell) -> Result<()> {
        let heading = Heading::between(self.position, cell)
            .ok_or_else(|| eyre!("cell {cell} is not adjacent to {}", self.position))?;

        self.step(heading)
    }

    /// Moves along `route`, one cell at a time, sensing at every arrival.
    ///
    /// The route may start with the current cell.
    ///
    /// # Errors
    ///
    /// This function may return errors from [`Navigator::step_to`] or [`Navigator::sense`].
    pub(crate) fn follow(&mut self, route: &[Cell]) -> Result<()> {
        for cell in route {
            if *cell != self.position {
                self.step_to(*cell)?;
                let _ = self.sense()?;
            }
        }

        Ok(())
    }

    /// Goes to `target` along the shortest route through visited cells, then senses.
    ///
    /// # Errors
    ///
    /// This function may return errors if no such route is known, or from
    /// [`Navigator::follow`].
    pub(crate) fn travel_to(&mut self, target: Cell) -> Result<()> {
        if target == self.position {
            let _ = self.sense()?;
            return Ok(());
        }

        let route = self
            .visited_route(self.position, &[target])
            .ok_or_else(|| eyre!("no known route from {} to {target}", self.position))?;
        self.follow(&route)
    }

    /// Runs `route` at speed, sending each straight run as a single multi-cell move.
    ///
    /// # Errors
    ///
    /// This function may return errors if the route does not start at the mouse's cell, is not
    /// contiguous, or if the drive reports a crash.
    pub(crate) fn dash(&mut self, route: &[Cell]) -> Result<()> {
        if route.first().is_some_and(|first| *first != self.position) {
            bail!("a route to dash along must start at the mouse's cell {}", self.position);
        }
        let segments = path::segments(route, self.heading)
            .ok_or_eyre("route is not made of adjacent cells")?;

        for segment in segments {
            self.turn(segment.turn)?;
            self.drive.move_forward(Some(segment.cells))?;
            self.moves += segment.cells;
            for _ in 0..segment.cells {
                self.position = self
                    .maze
                    .neighbor(self.position, segment.heading)
                    .ok_or_else(|| eyre!("route leaves the maze at {}", self.position))?;
            }
        }

        Ok(())
    }

    /// Puts the mouse back on the start cell facing north, after the drive was reset.
    pub(crate) fn restart(&mut self) {
        self.position = Cell::START;
        self.heading = Heading::North;
    }

    /// Paints `cell` when visual hints are enabled.
    ///
    /// # Errors
    ///
    /// This function may return errors from the colour command.
    pub(crate) fn paint(&mut self, cell: Cell, color: Color) -> Result<()> {
        if self.debug {
            self.drive.set_color(cell, color)?;
        }

        Ok(())
    }

    /// Writes `text` on `cell` when visual hints are enabled.
    ///
    /// # Errors
    ///
    /// This function may return errors from the text command.
    pub(crate) fn annotate(&mut self, cell: Cell, text: &str) -> Result<()> {
        if self.debug {
            self.drive.set_text(cell, text)?;
        }

        Ok(())
    }

    /// Removes the text from `cell` when visual hints are enabled.
    ///
    /// # Errors
    ///
    /// This function may return errors from the text command.
    pub(crate) fn clear_annotation(&mut self, cell: Cell) -> Result<()> {
        if self.debug {
            self.drive.clear_text(cell)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{animation::AnimationStep, client::Client, simulator::Simulator};

    /// A 3 by 3 maze walled so that the start cell only opens north.
    ///
    /// ```text
    /// o---o---o---o
    /// |           |
    /// o   o   o   o
    /// |           |
    /// o   o   o   o
    /// |   |       |
    /// o---o---o---o
    /// ```
    fn maze() -> Maze {
        let mut maze = Maze::new(3, 3);
        let _ = maze.set_wall(Cell::START, Heading::East);
        maze
    }

    /// Builds a navigator over a simulator of [`maze`].
    fn navigator() -> Navigator<Simulator> {
        Navigator::new(Simulator::new(maze()), true).expect("valid maze")
    }

    #[test]
    fn test_new_queries_dimensions() {
        let navigator = navigator();

        assert_eq!(navigator.maze().width(), 3, "width");
        assert_eq!(navigator.maze().height(), 3, "height");
        assert_eq!(navigator.position(), Cell::START, "start cell");
        assert_eq!(navigator.heading(), Heading::North, "facing north");
    }

    #[test]
    fn test_sense_learns_walls_once() {
        let mut navigator = navigator();

        assert!(navigator.sense().expect("sense"), "east wall is new");
        assert!(navigator.maze().has_wall(Cell::START, Heading::East), "wall recorded");
        assert!(navigator.is_visited(Cell::START), "start visited");
        assert!(!navigator.sense().expect("sense"), "second visit learns nothing");
    }

    #[test]
    fn test_step_refuses_known_walls() {
        let mut navigator = navigator();
        let _ = navigator.sense().expect("sense");

        assert!(navigator.step(Heading::East).is_err(), "known wall");
        assert!(navigator.step(Heading::South).is_err(), "outer boundary");
        navigator.step(Heading::North).expect("open side");
        assert_eq!(navigator.position(), Cell::new(0, 1), "moved north");
    }

    #[test]
    fn test_step_into_unknown_wall_crashes() {
        let mut navigator = navigator();

        let result = navigator.step(Heading::East);
        assert!(result.is_err(), "wall exists even though it was not sensed");
    }

    #[test]
    fn test_travel_to_uses_visited_cells() {
        let mut navigator = navigator();
        navigator
            .follow(&[Cell::START, Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)])
            .expect("walk around the wall");

        navigator.travel_to(Cell::START).expect("route back");
        assert_eq!(navigator.position(), Cell::START, "back at start");
        assert!(
            navigator.travel_to(Cell::new(2, 2)).is_err(),
            "no route through unvisited cells"
        );
    }

    #[test]
    fn test_dash_sends_multi_cell_moves() {
        let mut navigator = navigator();
        navigator
            .dash(&[Cell::START, Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 2)])
            .expect("dash");

        assert_eq!(navigator.position(), Cell::new(1, 2), "end of the route");
        assert_eq!(navigator.moves(), 3, "three cells moved");
        assert_eq!(navigator.heading(), Heading::East, "facing the last segment");

        let simulator = navigator.into_drive();
        assert_eq!(simulator.position(), Cell::new(1, 2), "simulator agrees");
        assert_eq!(simulator.odometer().turns, 1, "single turn");
    }

    #[test]
    fn test_dash_turns_relative_to_heading() {
        let mut navigator = navigator();
        navigator.step(Heading::North).expect("open north");
        navigator.face(Heading::South).expect("half turn");

        navigator
            .dash(&[Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2)])
            .expect("dash");

        assert_eq!(navigator.position(), Cell::new(2, 2), "end of the route");
        assert_eq!(navigator.heading(), Heading::North, "left off south then left off east");

        let simulator = navigator.into_drive();
        assert_eq!(simulator.heading(), Heading::North, "simulator agrees");
        assert_eq!(simulator.odometer().turns, 4, "half turn then two quarter turns");
    }

    #[test]
    fn test_turn_back_issues_two_left_turns() {
        let mut navigator = navigator();
        navigator.turn(Turn::Back).expect("turn");
        navigator.turn(Turn::Ahead).expect("no turn");

        assert_eq!(navigator.heading(), Heading::South, "reversed");
        let (_, trace) = navigator.into_drive().into_recording();
        assert_eq!(
            trace,
            vec![
                AnimationStep::Turn(Heading::West),
                AnimationStep::Turn(Heading::South)
            ],
            "two quarter turns to the left"
        );
    }

    #[test]
    fn test_dash_rejects_foreign_start() {
        let mut navigator = navigator();

        assert!(
            navigator.dash(&[Cell::new(1, 1), Cell::new(1, 2)]).is_err(),
            "route starts elsewhere"
        );
    }

    #[test]
    fn test_hints_follow_debug_flag() {
        let mut quiet = Navigator::new(Simulator::new(maze()), false).expect("valid maze");
        quiet.paint(Cell::START, Color::Red).expect("paint");

        let mut loud = navigator();
        loud.paint(Cell::START, Color::Red).expect("paint");

        let (_, quiet_trace) = quiet.into_drive().into_recording();
        let (_, loud_trace) = loud.into_drive().into_recording();
        assert!(quiet_trace.is_empty(), "hints suppressed");
        assert_eq!(
            loud_trace,
            vec![AnimationStep::Paint(Cell::START, Color::Red)],
            "hint forwarded"
        );
    }

    #[test]
    fn test_empty_maze_is_rejected() {
        let result = Navigator::new(Simulator::new(Maze::new(0, 4)), false);
        assert!(result.is_err(), "no columns");
    }

    #[test]
    fn test_oversized_maze_is_rejected() {
        let reported = format!("{}\n{}\n", usize::MAX, usize::MAX);
        let client = Client::new(Cursor::new(reported.into_bytes()), Vec::new());

        assert!(
            Navigator::new(client, false).is_err(),
            "dimensions that would overflow the cell count"
        );
    }
}
