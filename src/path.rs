//! Route post-processing.

use crate::grid::{Cell, Heading, Turn};

/// Straight part of a route: one rotation followed by a run of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    /// Rotation relative to the heading before the segment.
    pub(crate) turn: Turn,
    /// Heading held along the segment.
    pub(crate) heading: Heading,
    /// Number of cells moved.
    pub(crate) cells: usize,
}

/// Removes the detours from an exploration trace.
///
/// Whenever a cell shows up again later in `steps`, everything between its first and last
/// occurrence is dropped. The result starts with the same cell and never repeats a cell.
pub(crate) fn erase_loops(steps: &[Cell]) -> Vec<Cell> {
    let mut route = Vec::new();
    let mut index = 0;

    while let Some(cell) = steps.get(index) {
        route.push(*cell);
        index = steps.iter().rposition(|other| other == cell).unwrap_or(index) + 1;
    }

    route
}

/// Splits a route into straight segments, starting from a mouse facing `heading`.
///
/// Consecutive duplicate cells are skipped. Returns `None` if two consecutive cells are not
/// adjacent.
pub(crate) fn segments(route: &[Cell], heading: Heading) -> Option<Vec<Segment>> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut facing = heading;

    for pair in route.windows(2) {
        let [from, to] = pair else {
            continue;
        };
        if from == to {
            continue;
        }

        let next = Heading::between(*from, *to)?;
        match segments.last_mut() {
            Some(segment) if segment.heading == next => segment.cells += 1,
            _ => segments.push(Segment {
                turn: Turn::between(facing, next),
                heading: next,
                cells: 1,
            }),
        }
        facing = next;
    }

    Some(segments)
}
