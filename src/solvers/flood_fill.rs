//! Flood-fill exploration.

use color_eyre::eyre::{bail, OptionExt as _, Result};
use tracing::trace;

use crate::{
    drive::Drive,
    flood::FloodMap,
    grid::{Cell, Heading},
    navigator::Navigator,
    path,
};

/// Walks downhill on the flood distances until a goal cell is reached.
///
/// The distances are recomputed every time sensing reveals a new wall. When several neighbours
/// share the smallest distance, going straight ahead wins, then [`Heading::ALL`] order.
///
/// # Errors
///
/// This function may return errors if the mouse's cell gets cut off from every goal, or if the
/// drive fails.
pub(super) fn explore<D: Drive>(navigator: &mut Navigator<D>) -> Result<Vec<Cell>> {
    let mut flood = FloodMap::new(navigator.maze());
    let all: Vec<Cell> = navigator.maze().cells().collect();
    label(navigator, &flood, &all)?;

    let mut steps = vec![navigator.position()];
    loop {
        if navigator.sense()? {
            let changed = flood.recompute(navigator.maze());
            trace!(changed = changed.len(), "flood distances updated");
            label(navigator, &flood, &changed)?;
        }

        let here = navigator.position();
        let Some(distance) = flood.distance(here) else {
            bail!("no route to the goal from {here}");
        };
        if distance == 0 {
            break;
        }

        let heading = downhill(navigator, &flood).ok_or_eyre("no route to the goal")?;
        navigator.step(heading)?;
        steps.push(navigator.position());
    }

    Ok(path::erase_loops(&steps))
}

/// Picks the open side of the mouse's cell leading to the smallest distance.
fn downhill<D: Drive>(navigator: &Navigator<D>, flood: &FloodMap) -> Option<Heading> {
    let maze = navigator.maze();
    let here = navigator.position();

    [navigator.heading()]
        .into_iter()
        .chain(Heading::ALL)
        .filter(|heading| !maze.has_wall(here, *heading))
        .filter_map(|heading| {
            let next = maze.neighbor(here, heading)?;
            Some((heading, flood.distance(next)?))
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(heading, _)| heading)
}

/// Writes the distances of `cells` onto the simulator when visual hints are on.
///
/// Cells cut off from every goal are left blank.
fn label<D: Drive>(navigator: &mut Navigator<D>, flood: &FloodMap, cells: &[Cell]) -> Result<()> {
    if !navigator.debug() {
        return Ok(());
    }

    for cell in cells {
        match flood.distance(*cell) {
            Some(distance) => navigator.annotate(*cell, &distance.to_string())?,
            None => navigator.clear_annotation(*cell)?,
        }
    }

    Ok(())
}
