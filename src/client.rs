//! Client for the mms simulator's line protocol.
//!
//! The simulator launches the mouse program as a child process and talks to it over standard
//! streams: every request is a single line written to stdout, and queries are answered with a
//! single line on stdin. Diagnostics therefore have to go to stderr.

use std::{
    fmt,
    io::{self, BufRead, StdinLock, Stdout, Write},
};

use tracing::trace;

use crate::{
    drive::{Color, Drive},
    grid::{Cell, Heading},
};

/// Failures while exchanging commands with a mouse.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandError {
    /// Reading from or writing to the simulator failed.
    #[error("simulator i/o failed")]
    Io(#[from] io::Error),
    /// The simulator closed its end while a response was pending.
    #[error("simulator closed the connection while waiting for a response to `{0}`")]
    Closed(&'static str),
    /// The simulator answered with something the command does not allow.
    #[error("unexpected response `{response}` to `{command}`")]
    Unexpected {
        /// Name of the command that was sent.
        command: &'static str,
        /// Response line as received, trimmed.
        response: String,
    },
    /// The mouse ran into a wall.
    #[error("the mouse crashed into a wall")]
    Crashed,
}

/// A single request of the mms protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command<'text> {
    /// `mazeWidth`.
    MazeWidth,
    /// `mazeHeight`.
    MazeHeight,
    /// `wallFront`.
    WallFront,
    /// `wallRight`.
    WallRight,
    /// `wallLeft`.
    WallLeft,
    /// `moveForward`, with an optional number of cells.
    MoveForward(Option<usize>),
    /// `turnRight`.
    TurnRight,
    /// `turnLeft`.
    TurnLeft,
    /// `setWall x y d`.
    SetWall(Cell, Heading),
    /// `clearWall x y d`.
    #[cfg_attr(not(test), expect(dead_code, reason = "only sent by `Drive::clear_wall`"))]
    ClearWall(Cell, Heading),
    /// `setColor x y c`.
    SetColor(Cell, Color),
    /// `clearColor x y`.
    #[cfg_attr(not(test), expect(dead_code, reason = "only sent by `Drive::clear_color`"))]
    ClearColor(Cell),
    /// `clearAllColor`.
    ClearAllColor,
    /// `setText x y text`.
    SetText(Cell, &'text str),
    /// `clearText x y`.
    ClearText(Cell),
    /// `clearAllText`.
    ClearAllText,
    /// `wasReset`.
    WasReset,
    /// `ackReset`.
    AckReset,
}

impl Command<'_> {
    /// Returns the protocol keyword of the command.
    const fn name(&self) -> &'static str {
        match self {
            Self::MazeWidth => "mazeWidth",
            Self::MazeHeight => "mazeHeight",
            Self::WallFront => "wallFront",
            Self::WallRight => "wallRight",
            Self::WallLeft => "wallLeft",
            Self::MoveForward(_) => "moveForward",
            Self::TurnRight => "turnRight",
            Self::TurnLeft => "turnLeft",
            Self::SetWall(..) => "setWall",
            Self::ClearWall(..) => "clearWall",
            Self::SetColor(..) => "setColor",
            Self::ClearColor(_) => "clearColor",
            Self::ClearAllColor => "clearAllColor",
            Self::SetText(..) => "setText",
            Self::ClearText(_) => "clearText",
            Self::ClearAllText => "clearAllText",
            Self::WasReset => "wasReset",
            Self::AckReset => "ackReset",
        }
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())?;
        match self {
            Self::MoveForward(Some(distance)) => write!(formatter, " {distance}"),
            Self::SetWall(cell, heading) | Self::ClearWall(cell, heading) => {
                write!(formatter, " {} {} {}", cell.x, cell.y, heading.code())
            }
            Self::SetColor(cell, color) => write!(formatter, " {} {} {color}", cell.x, cell.y),
            Self::SetText(cell, text) => write!(formatter, " {} {} {text}", cell.x, cell.y),
            Self::ClearColor(cell) | Self::ClearText(cell) => {
                write!(formatter, " {} {}", cell.x, cell.y)
            }
            _ => Ok(()),
        }
    }
}

/// Mouse driven through the mms line protocol.
pub(crate) struct Client<R, W> {
    /// Stream the simulator's responses arrive on.
    reader: R,
    /// Stream requests are written to.
    writer: W,
    /// Scratch buffer for the last response line.
    line: String,
}

impl Client<StdinLock<'static>, Stdout> {
    /// Connects to the simulator through the process's standard streams.
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Client<R, W> {
    /// Wraps an arbitrary pair of streams.
    pub(crate) const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line: String::new(),
        }
    }

    /// Gives back the underlying streams.
    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Writes a request line and flushes it.
    fn send(&mut self, command: Command<'_>) -> Result<(), CommandError> {
        writeln!(self.writer, "{command}")?;
        self.writer.flush()?;
        trace!(%command, "sent");

        Ok(())
    }

    /// Writes a request line and reads the response to it.
    fn query(&mut self, command: Command<'_>) -> Result<String, CommandError> {
        self.send(command)?;

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(CommandError::Closed(command.name()));
        }
        let response = self.line.trim().to_owned();
        trace!(%command, %response, "received");

        Ok(response)
    }

    /// Sends a command that is answered with `ack`.
    fn acknowledged(&mut self, command: Command<'_>) -> Result<(), CommandError> {
        let response = self.query(command)?;
        if response == "ack" {
            Ok(())
        } else {
            Err(CommandError::Unexpected {
                command: command.name(),
                response,
            })
        }
    }

    /// Sends a query that is answered with `true` or `false`.
    fn boolean(&mut self, command: Command<'_>) -> Result<bool, CommandError> {
        let response = self.query(command)?;
        match response.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CommandError::Unexpected {
                command: command.name(),
                response,
            }),
        }
    }

    /// Sends a query that is answered with a non-negative integer.
    fn integer(&mut self, command: Command<'_>) -> Result<usize, CommandError> {
        let response = self.query(command)?;
        response
            .parse()
            .map_err(|_parse| CommandError::Unexpected {
                command: command.name(),
                response,
            })
    }
}

impl<R: BufRead, W: Write> Drive for Client<R, W> {
    fn maze_width(&mut self) -> Result<usize, CommandError> {
        self.integer(Command::MazeWidth)
    }

    fn maze_height(&mut self) -> Result<usize, CommandError> {
        self.integer(Command::MazeHeight)
    }

    fn wall_front(&mut self) -> Result<bool, CommandError> {
        self.boolean(Command::WallFront)
    }

    fn wall_right(&mut self) -> Result<bool, CommandError> {
        self.boolean(Command::WallRight)
    }

    fn wall_left(&mut self) -> Result<bool, CommandError> {
        self.boolean(Command::WallLeft)
    }

    fn move_forward(&mut self, distance: Option<usize>) -> Result<(), CommandError> {
        if distance == Some(0) {
            return Ok(());
        }

        // Single-cell moves carry no distance.
        let command = Command::MoveForward(distance.filter(|cells| *cells > 1));
        let response = self.query(command)?;
        match response.as_str() {
            "ack" => Ok(()),
            "crash" => Err(CommandError::Crashed),
            _ => Err(CommandError::Unexpected {
                command: command.name(),
                response,
            }),
        }
    }

    fn turn_right(&mut self) -> Result<(), CommandError> {
        self.acknowledged(Command::TurnRight)
    }

    fn turn_left(&mut self) -> Result<(), CommandError> {
        self.acknowledged(Command::TurnLeft)
    }

    fn was_reset(&mut self) -> Result<bool, CommandError> {
        self.boolean(Command::WasReset)
    }

    fn ack_reset(&mut self) -> Result<(), CommandError> {
        self.acknowledged(Command::AckReset)
    }

    fn set_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError> {
        self.send(Command::SetWall(cell, heading))
    }

    fn clear_wall(&mut self, cell: Cell, heading: Heading) -> Result<(), CommandError> {
        self.send(Command::ClearWall(cell, heading))
    }

    fn set_color(&mut self, cell: Cell, color: Color) -> Result<(), CommandError> {
        self.send(Command::SetColor(cell, color))
    }

    fn clear_color(&mut self, cell: Cell) -> Result<(), CommandError> {
        self.send(Command::ClearColor(cell))
    }

    fn clear_all_color(&mut self) -> Result<(), CommandError> {
        self.send(Command::ClearAllColor)
    }

    fn set_text(&mut self, cell: Cell, text: &str) -> Result<(), CommandError> {
        self.send(Command::SetText(cell, text))
    }

    fn clear_text(&mut self, cell: Cell) -> Result<(), CommandError> {
        self.send(Command::ClearText(cell))
    }

    fn clear_all_text(&mut self) -> Result<(), CommandError> {
        self.send(Command::ClearAllText)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Builds a client that will read the given responses and records what it sends.
    fn scripted(responses: &str) -> Client<Cursor<Vec<u8>>, Vec<u8>> {
        Client::new(Cursor::new(responses.as_bytes().to_vec()), Vec::new())
    }

    /// Returns everything the client wrote so far.
    fn sent(client: Client<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        let (_, written) = client.into_parts();
        String::from_utf8(written).expect("requests are valid utf-8")
    }

    #[test]
    fn test_dimension_queries() {
        let mut client = scripted("16\n8\n");

        assert_eq!(client.maze_width().expect("width"), 16, "width response");
        assert_eq!(client.maze_height().expect("height"), 8, "height response");
        assert_eq!(sent(client), "mazeWidth\nmazeHeight\n", "request lines");
    }

    #[test]
    fn test_wall_queries() {
        let mut client = scripted("true\nfalse\n true \n");

        assert!(client.wall_front().expect("front"), "wall in front");
        assert!(!client.wall_right().expect("right"), "no wall to the right");
        assert!(client.wall_left().expect("left"), "padding is trimmed");
        assert_eq!(sent(client), "wallFront\nwallRight\nwallLeft\n", "request lines");
    }

    #[test]
    fn test_move_forward_variants() {
        let mut client = scripted("ack\nack\nack\n");

        client.move_forward(None).expect("single move");
        client.move_forward(Some(1)).expect("explicit single move");
        client.move_forward(Some(3)).expect("multi-cell move");
        assert_eq!(
            sent(client),
            "moveForward\nmoveForward\nmoveForward 3\n",
            "distance only sent when above one"
        );
    }

    #[test]
    fn test_move_forward_crash() {
        let mut client = scripted("crash\n");

        let result = client.move_forward(None);
        assert!(
            matches!(result, Err(CommandError::Crashed)),
            "crash response maps to a crash error"
        );
    }

    #[test]
    fn test_unexpected_responses() {
        let mut client = scripted("maybe\nnope\nwide\n");

        assert!(
            matches!(
                client.wall_front(),
                Err(CommandError::Unexpected { command: "wallFront", .. })
            ),
            "non-boolean wall response"
        );
        assert!(
            matches!(
                client.turn_left(),
                Err(CommandError::Unexpected { command: "turnLeft", .. })
            ),
            "turn without ack"
        );
        assert!(
            matches!(
                client.maze_width(),
                Err(CommandError::Unexpected { command: "mazeWidth", .. })
            ),
            "non-numeric width"
        );
    }

    #[test]
    fn test_closed_stream() {
        let mut client = scripted("");

        assert!(
            matches!(client.was_reset(), Err(CommandError::Closed("wasReset"))),
            "end of input while waiting"
        );
    }

    #[test]
    fn test_visual_commands_expect_no_response() {
        let mut client = scripted("");
        let cell = Cell::new(3, 4);

        client.set_wall(cell, Heading::North).expect("set wall");
        client.clear_wall(cell, Heading::West).expect("clear wall");
        client.set_color(cell, Color::DarkYellow).expect("set color");
        client.clear_color(cell).expect("clear color");
        client.clear_all_color().expect("clear all colors");
        client.set_text(cell, "12").expect("set text");
        client.clear_text(cell).expect("clear text");
        client.clear_all_text().expect("clear all text");

        assert_eq!(
            sent(client),
            "setWall 3 4 n\nclearWall 3 4 w\nsetColor 3 4 Y\nclearColor 3 4\nclearAllColor\n\
             setText 3 4 12\nclearText 3 4\nclearAllText\n",
            "request lines"
        );
    }

    #[test]
    fn test_reset_handshake() {
        let mut client = scripted("true\nack\n");

        assert!(client.was_reset().expect("was reset"), "reset pending");
        client.ack_reset().expect("ack reset");
        assert_eq!(sent(client), "wasReset\nackReset\n", "request lines");
    }
}
