//! Maze file loading and validation.
//!
//! Two of the text formats the mms simulator accepts are supported. `.map` files are ASCII
//! drawings with posts and `-`/`|` walls, and `.num` files hold one `x y N E S W` line per cell.
//! Files with another extension are recognised by their content.

use std::{fs, path::Path};

use color_eyre::eyre::{bail, eyre, OptionExt as _, Result, WrapErr as _};

use crate::{
    grid::{Cell, Heading},
    maze::{self, Maze},
};

/// Built-in 8 by 8 maze used when no maze file is given.
pub(crate) const DEFAULT_MAZE: &str = "\
o---o---o---o---o---o---o---o---o
|               |               |
o   o---o---o   o   o---o---o   o
|   |       |       |       |   |
o   o   o   o---o---o   o   o   o
|   |   |               |   |   |
o   o   o   o---o---o   o   o   o
|       |   |       |   |       |
o   o   o   o   o   o   o---o   o
|   |   |   |       |       |   |
o   o   o   o---o   o---o   o   o
|   |   |               |   |   |
o   o   o---o---o---o   o   o   o
|   |                   |   |   |
o   o---o---o---o---o---o   o   o
|   |                       |   |
o---o---o---o---o---o---o---o---o";

/// Text formats a maze can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// ASCII drawing.
    Map,
    /// One line of wall flags per cell.
    Num,
}

impl Format {
    /// Picks the format from the file name, falling back to the content.
    fn detect(name: &str, contents: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("num") => Self::Num,
            Some("map") => Self::Map,
            _ => {
                let leading_digit = contents
                    .trim_start()
                    .chars()
                    .next()
                    .is_some_and(|first| first.is_ascii_digit());
                if leading_digit {
                    Self::Num
                } else {
                    Self::Map
                }
            }
        }
    }
}

/// Reads and parses the maze file at `path`.
///
/// # Errors
///
/// This function may return errors if the file cannot be read or its contents are not a valid
/// maze in either supported format.
pub(crate) fn load(path: &Path) -> Result<Maze> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read maze file {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_eyre("failed to convert maze file name to a string slice")?;

    parse(name, &contents).wrap_err_with(|| format!("invalid maze file {}", path.display()))
}

/// Parses `contents` as a maze, using `name` to pick the format.
///
/// # Errors
///
/// This function may return errors if the contents are malformed; see [`parse_map`] and
/// [`parse_num`].
pub(crate) fn parse(name: &str, contents: &str) -> Result<Maze> {
    match Format::detect(name, contents) {
        Format::Map => parse_map(contents),
        Format::Num => parse_num(contents),
    }
}

/// Parses the built-in maze.
///
/// # Errors
///
/// This function only fails if [`DEFAULT_MAZE`] itself is malformed.
pub(crate) fn default_maze() -> Result<Maze> {
    parse_map(DEFAULT_MAZE)
}

/// Parses an ASCII maze drawing.
///
/// The drawing lists rows from north to south. Post characters sit on every grid corner; a
/// horizontal wall is any non-space character between two posts and a vertical wall is any
/// non-space character on a post column of a cell row. The distance between posts is taken from
/// the first line.
///
/// # Errors
///
/// This function may return errors if:
/// - The drawing has no cell rows, or an even number of lines
/// - The lines differ in length or contain non-ASCII characters
/// - The post spacing does not divide the line length
/// - The maze is larger than [`maze::MAX_SIDE`] cells on a side
pub(crate) fn parse_map(contents: &str) -> Result<Maze> {
    let lines: Vec<&[u8]> = contents
        .lines()
        .map(str::trim_end)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .map(str::as_bytes)
        .collect();

    if lines.len() < 3 || lines.len() % 2 == 0 {
        bail!(
            "a maze drawing needs an odd number of lines, at least 3, found {}",
            lines.len()
        );
    }
    let top = lines.first().ok_or_eyre("failed to retrieve first line")?;
    if !lines.iter().all(|line| line.is_ascii()) {
        bail!("maze drawings must be plain ASCII");
    }
    if lines.iter().any(|line| line.len() != top.len()) {
        bail!("every line of a maze drawing must have the same length");
    }

    let stride = top
        .iter()
        .skip(1)
        .position(|byte| !matches!(byte, b'-' | b' '))
        .map(|offset| offset + 1)
        .ok_or_eyre("failed to find a second post on the first line")?;
    if stride < 2 || (top.len() - 1) % stride != 0 {
        bail!("post spacing of {stride} does not fit a line of {} columns", top.len());
    }

    let width = (top.len() - 1) / stride;
    let height = (lines.len() - 1) / 2;
    maze::check_dimensions(width, height)?;
    let mut maze = Maze::new(width, height);

    for y in 0..height {
        let middle = 2 * (height - 1 - y) + 1;
        let row = lines.get(middle).ok_or_eyre("failed to retrieve cell row")?;
        let above = lines.get(middle - 1).ok_or_eyre("failed to retrieve wall row")?;

        for x in 0..width {
            let cell = Cell::new(x, y);
            let east = row.get(stride * (x + 1)).is_some_and(|byte| *byte != b' ');
            if east {
                let _ = maze.set_wall(cell, Heading::East);
            }

            let north = above
                .get(stride * x + 1..stride * (x + 1))
                .is_some_and(|span| span.iter().any(|byte| *byte != b' '));
            if north {
                let _ = maze.set_wall(cell, Heading::North);
            }
        }
    }

    Ok(maze)
}

/// Parses a maze stored as one `x y N E S W` line per cell.
///
/// # Errors
///
/// This function may return errors if:
/// - A line does not hold exactly six fields
/// - A coordinate is not a number or a wall flag is not `0` or `1`
/// - A cell is listed twice or missing
/// - The maze is larger than [`maze::MAX_SIDE`] cells on a side
pub(crate) fn parse_num(contents: &str) -> Result<Maze> {
    let mut entries = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        entries.push(parse_num_line(line).wrap_err_with(|| format!("line {}", number + 1))?);
    }

    let width = entries
        .iter()
        .map(|(cell, _)| cell.x)
        .max()
        .ok_or_eyre("a maze needs at least one cell")?
        .checked_add(1)
        .ok_or_eyre("x coordinate out of range")?;
    let height = entries
        .iter()
        .map(|(cell, _)| cell.y)
        .max()
        .ok_or_eyre("a maze needs at least one cell")?
        .checked_add(1)
        .ok_or_eyre("y coordinate out of range")?;
    maze::check_dimensions(width, height)?;

    let mut maze = Maze::new(width, height);
    let mut seen = vec![false; maze.area()];

    for (cell, walls) in entries {
        let slot = maze
            .slot(cell)
            .ok_or_else(|| eyre!("cell {cell} is outside the maze"))?;
        let listed = seen
            .get_mut(slot)
            .ok_or_else(|| eyre!("cell {cell} is outside the maze"))?;
        if *listed {
            bail!("cell {cell} is listed more than once");
        }
        *listed = true;

        for (heading, wall) in Heading::ALL.into_iter().zip(walls) {
            if wall {
                let _ = maze.set_wall(cell, heading);
            }
        }
    }

    if let Some(missing) = maze.cells().find(|cell| {
        maze.slot(*cell)
            .and_then(|slot| seen.get(slot))
            .is_some_and(|listed| !listed)
    }) {
        bail!("cell {missing} is missing");
    }

    Ok(maze)
}

/// Parses a single `x y N E S W` line.
fn parse_num_line(line: &str) -> Result<(Cell, [bool; 4])> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [x, y, north, east, south, west] = fields.as_slice() else {
        bail!("expected `x y N E S W`, found {} fields", fields.len());
    };

    let cell = Cell::new(
        x.parse().wrap_err("invalid x coordinate")?,
        y.parse().wrap_err("invalid y coordinate")?,
    );
    let mut walls = [false; 4];
    for (slot, flag) in walls.iter_mut().zip([north, east, south, west]) {
        *slot = match *flag {
            "0" => false,
            "1" => true,
            other => bail!("wall flags must be 0 or 1, found `{other}`"),
        };
    }

    Ok((cell, walls))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 2 by 2 drawing with a wall between the two southern cells.
    const SMALL: &str = "\
o---o---o
|       |
o   o   o
|   |   |
o---o---o";

    #[test]
    fn test_parse_map_small() {
        let maze = parse_map(SMALL).expect("valid drawing");

        assert_eq!((maze.width(), maze.height()), (2, 2), "dimensions");
        assert!(maze.has_wall(Cell::START, Heading::East), "southern divider");
        assert!(maze.has_wall(Cell::new(1, 0), Heading::West), "divider from the east");
        assert!(!maze.has_wall(Cell::START, Heading::North), "open to the north");
        assert!(!maze.has_wall(Cell::new(0, 1), Heading::East), "northern row is open");
    }

    #[test]
    fn test_parse_map_other_posts_and_spacing() {
        let drawing = "+--+--+\n|     |\n+--+  +\n|     |\n+--+--+\n";
        let maze = parse_map(drawing).expect("valid drawing");

        assert_eq!((maze.width(), maze.height()), (2, 2), "dimensions");
        assert!(maze.has_wall(Cell::START, Heading::North), "wall above (0, 0)");
        assert!(!maze.has_wall(Cell::new(1, 0), Heading::North), "gap above (1, 0)");
    }

    #[test]
    fn test_parse_map_rejects_ragged_lines() {
        let drawing = "o---o\n|  |\no---o";
        assert!(parse_map(drawing).is_err(), "second line is short");
    }

    #[test]
    fn test_parse_map_rejects_even_line_count() {
        let drawing = "o---o\n|   |\no---o\n|   |";
        assert!(parse_map(drawing).is_err(), "missing bottom boundary");
    }

    #[test]
    fn test_parse_map_rejects_empty() {
        assert!(parse_map("").is_err(), "no lines at all");
    }

    #[test]
    fn test_default_maze_reaches_centre() {
        let maze = default_maze().expect("built-in maze parses");

        assert_eq!((maze.width(), maze.height()), (8, 8), "dimensions");
        assert!(maze.has_wall(Cell::START, Heading::East), "start cell is closed east");
        assert!(!maze.has_wall(Cell::START, Heading::North), "start cell opens north");

        let route = maze
            .route(Cell::START, &maze.goals(), |_| true)
            .expect("centre is reachable");
        assert_eq!(route.first(), Some(&Cell::START), "route starts at the start");
        assert!(
            route.last().is_some_and(|cell| maze.is_goal(*cell)),
            "route ends in the centre"
        );
    }

    #[test]
    fn test_parse_num() {
        let contents = "0 0 0 1 1 1\n0 1 1 0 0 1\n1 0 0 1 1 1\n1 1 1 1 0 0\n";
        let maze = parse_num(contents).expect("valid cell list");

        assert_eq!((maze.width(), maze.height()), (2, 2), "dimensions");
        assert!(maze.has_wall(Cell::START, Heading::East), "divider");
        assert!(!maze.has_wall(Cell::new(0, 1), Heading::East), "northern row is open");
        assert_eq!(maze, parse_map(SMALL).expect("valid drawing"), "same maze as the drawing");
    }

    #[test]
    fn test_parse_num_rejects_duplicates_and_gaps() {
        let duplicate = "0 0 0 0 1 1\n0 0 0 0 1 1\n";
        assert!(parse_num(duplicate).is_err(), "cell listed twice");

        let gap = "0 0 0 0 1 1\n1 1 1 1 0 0\n";
        assert!(parse_num(gap).is_err(), "cells missing");
    }

    #[test]
    fn test_parse_num_rejects_bad_fields() {
        assert!(parse_num("0 0 0 1 1").is_err(), "five fields");
        assert!(parse_num("0 0 0 2 1 1").is_err(), "flag out of range");
        assert!(parse_num("a 0 0 1 1 1").is_err(), "non-numeric coordinate");
    }

    #[test]
    fn test_parse_num_rejects_huge_coordinates() {
        let overflow = format!("{} 0 0 0 0 0", usize::MAX);
        assert!(parse_num(&overflow).is_err(), "coordinate at the integer limit");

        let huge = parse_num("1000000 0 0 0 0 0").expect_err("far too wide");
        assert!(
            format!("{huge:#}").contains("larger than 255 cells per side"),
            "rejected before allocating: {huge:#}"
        );
        assert!(parse_num("0 255 0 0 0 0").is_err(), "256 rows");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::detect("maze.num", ""), Format::Num, "num extension");
        assert_eq!(Format::detect("maze.MAP", ""), Format::Map, "map extension");
        assert_eq!(Format::detect("maze.txt", " 0 0 1 1 1 1"), Format::Num, "digits");
        assert_eq!(Format::detect("maze", "o---o"), Format::Map, "drawing");
    }

    #[test]
    fn test_parse_dispatches_on_format() {
        let maze = parse("small.txt", SMALL).expect("drawing detected");
        assert_eq!(maze.width(), 2, "parsed as a drawing");
    }
}
