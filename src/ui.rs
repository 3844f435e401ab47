//! User interface rendering functions for the replay viewer.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as Segment, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    app::App,
    drive,
    grid::{Cell, Heading},
};

/// Key bindings shown above the status line.
const KEY_HELP: &str =
    "(q) quit / (l) play-pause / (n) step / (h) restart / (j) slower / (k) faster";

/// Distance from the centre of a cell to the tip of the mouse's heading marker.
const NOSE_LENGTH: f64 = 0.35;

/// End points of a wall segment in canvas coordinates.
type Span = (f64, f64, f64, f64);

/// Renders the replay screen.
///
/// This function draws the maze with the recorded mouse on top, and a status line at the bottom.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).split(frame.area());
    let maze_area = *layout.first().ok_or_eyre("failed to get maze area from layout")?;
    let status_area = *layout.last().ok_or_eyre("failed to get status area from layout")?;

    maze(app, frame, maze_area)?;
    status(app, frame, status_area)?;

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the maze, the discovered walls, the painted cells, the trail and the mouse.
///
/// Two [`Canvas`] widgets are stacked over the same area: the walls are drawn with braille dots
/// for thin lines, the cell contents with coarser dots on top.
///
/// # Errors
///
/// This function may return errors if the maze is too large to convert into canvas coordinates.
pub(crate) fn maze(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let width = coordinate(app.maze.width())?;
    let height = coordinate(app.maze.height())?;
    let animation = &app.animation_manager;

    // Pre-compute canvas coordinates to handle errors before closures
    let (hidden, discovered) = wall_spans(app)?;
    let paint = paint_patches(app)?;
    let trail = animation
        .trail
        .iter()
        .map(|cell| centre(*cell))
        .collect::<Result<Vec<(f64, f64)>>>()?;
    let mouse = centre(animation.position)?;
    let (nose_x, nose_y) = nose(animation.heading);

    let walls = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .marker(Marker::Braille)
        .paint(|ctx| {
            for &(x1, y1, x2, y2) in &hidden {
                ctx.draw(&Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: Color::DarkGray,
                });
            }
            ctx.layer();
            for &(x1, y1, x2, y2) in &discovered {
                ctx.draw(&Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: Color::Green,
                });
            }
            ctx.draw(&Segment {
                x1: mouse.0,
                y1: mouse.1,
                x2: mouse.0 + nose_x,
                y2: mouse.1 + nose_y,
                color: Color::White,
            });
        });
    let contents = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .marker(Marker::Dot)
        .paint(|ctx| {
            for (patch, color) in &paint {
                ctx.draw(&Points {
                    coords: patch,
                    color: *color,
                });
            }
            ctx.draw(&Points {
                coords: &trail,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &[mouse],
                color: Color::White,
            });
        });

    frame.render_widget(walls, area);
    frame.render_widget(contents, area);

    Ok(())
}

/// Returns the true walls of the maze and the walls discovered so far in the replay.
///
/// # Errors
///
/// This function may return errors if a cell does not fit canvas coordinates.
fn wall_spans(app: &App) -> Result<(Vec<Span>, Vec<Span>)> {
    let mut hidden = Vec::new();
    for cell in app.maze.cells() {
        for heading in Heading::ALL {
            if app.maze.has_wall(cell, heading) {
                hidden.push(span(cell, heading)?);
            }
        }
    }
    let discovered = app
        .animation_manager
        .walls
        .iter()
        .map(|&(cell, heading)| span(cell, heading))
        .collect::<Result<Vec<Span>>>()?;

    Ok((hidden, discovered))
}

/// Returns a small grid of points around the centre of every painted cell, with its colour.
///
/// # Errors
///
/// This function may return errors if a cell does not fit canvas coordinates.
fn paint_patches(app: &App) -> Result<Vec<(Vec<(f64, f64)>, Color)>> {
    let mut patches = Vec::new();
    for &(cell, color) in &app.animation_manager.paint {
        let (x, y) = centre(cell)?;
        let patch = [-0.25, 0.0, 0.25]
            .into_iter()
            .flat_map(|dx| [-0.25, 0.0, 0.25].map(|dy| (x + dx, y + dy)))
            .collect();
        patches.push((patch, tint(color)));
    }

    Ok(patches)
}

/// Renders the key bindings and the playback status at the bottom of the screen.
///
/// # Errors
///
/// This function may return errors from the progress computation.
pub(crate) fn status(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let block = Block::bordered()
        .title(KEY_HELP)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(Line::raw(status_line(app)?).centered(), inner);

    Ok(())
}

/// Formats the run number, step counter, progress, speed and playback state.
///
/// # Errors
///
/// This function may return errors from the progress computation.
pub(crate) fn status_line(app: &App) -> Result<String> {
    let animation = &app.animation_manager;
    let total = animation.steps.len();
    let state = if animation.is_finished() {
        "finished"
    } else {
        app.playback.repr()
    };

    Ok(format!(
        "run {} | step {}/{} | {}% | speed {} | {}",
        animation.run,
        animation.current_index,
        total,
        progress(animation.current_index, total)?,
        app.speed.repr(),
        state,
    ))
}

/// Returns `done` out of `total` as a percentage rounded to the nearest integer.
///
/// An empty recording counts as complete.
///
/// # Errors
///
/// This function may return errors if the counts do not fit the percentage arithmetic.
pub(crate) fn progress(done: usize, total: usize) -> Result<i32> {
    if total == 0 {
        return Ok(100);
    }

    let done = i32::try_from(done)?
        .checked_mul(100)
        .ok_or_eyre("step counter too large for a percentage")?;
    Ok(rounded_div::i32(done, i32::try_from(total)?))
}

/// Converts a cell count into a canvas coordinate.
fn coordinate(value: usize) -> Result<f64> {
    Ok(f64::from(u16::try_from(value)?))
}

/// Returns the canvas coordinates of the centre of `cell`.
fn centre(cell: Cell) -> Result<(f64, f64)> {
    Ok((coordinate(cell.x)? + 0.5, coordinate(cell.y)? + 0.5))
}

/// Returns the end points of the `heading` side of `cell`.
fn span(cell: Cell, heading: Heading) -> Result<Span> {
    let left = coordinate(cell.x)?;
    let bottom = coordinate(cell.y)?;
    let (right, top) = (left + 1.0, bottom + 1.0);

    Ok(match heading {
        Heading::North => (left, top, right, top),
        Heading::East => (right, bottom, right, top),
        Heading::South => (left, bottom, right, bottom),
        Heading::West => (left, bottom, left, top),
    })
}

/// Returns the offset from the mouse's centre to the tip of its heading marker.
const fn nose(heading: Heading) -> (f64, f64) {
    match heading {
        Heading::North => (0.0, NOSE_LENGTH),
        Heading::East => (NOSE_LENGTH, 0.0),
        Heading::South => (0.0, -NOSE_LENGTH),
        Heading::West => (-NOSE_LENGTH, 0.0),
    }
}

/// Maps a simulator cell colour onto a terminal colour.
const fn tint(color: drive::Color) -> Color {
    match color {
        drive::Color::Black => Color::Black,
        drive::Color::Blue => Color::LightBlue,
        drive::Color::Cyan => Color::LightCyan,
        drive::Color::Gray => Color::Gray,
        drive::Color::Green => Color::LightGreen,
        drive::Color::Orange => Color::Rgb(255, 165, 0),
        drive::Color::Red => Color::LightRed,
        drive::Color::White => Color::White,
        drive::Color::Yellow => Color::LightYellow,
        drive::Color::DarkBlue => Color::Blue,
        drive::Color::DarkCyan => Color::Cyan,
        drive::Color::DarkGray => Color::DarkGray,
        drive::Color::DarkGreen => Color::Green,
        drive::Color::DarkRed => Color::Red,
        drive::Color::DarkYellow => Color::Yellow,
    }
}
