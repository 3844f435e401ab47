//! Replay of a recorded run for the terminal viewer.
//!
//! The in-process simulator appends an [`AnimationStep`] for every visible effect of the commands
//! it receives. The [`AnimationManager`] plays those steps back one frame at a time, rebuilding the
//! mouse's position, the walls it has revealed and the cells it has painted.

use std::time::{Duration, Instant};

use crate::{
    drive::Color,
    grid::{Cell, Heading},
};

/// Animation frame delay in milliseconds at normal speed.
///
/// This constant controls the timing between animation frames in the replay. Faster and slower
/// playback speeds scale it.
pub(crate) const ANIMATION_FRAME_DELAY_MS: u64 = 120;

/// Visible effect of a single simulator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AnimationStep {
    /// The mouse entered a cell.
    Move(Cell),
    /// The mouse turned in place to face a new heading.
    Turn(Heading),
    /// A wall was marked on a cell side.
    Wall(Cell, Heading),
    /// A wall marking was removed from a cell side.
    #[cfg_attr(not(test), expect(dead_code, reason = "only recorded by `Drive::clear_wall`"))]
    Unwall(Cell, Heading),
    /// A cell was painted.
    Paint(Cell, Color),
    /// The paint was removed from a cell.
    #[cfg_attr(not(test), expect(dead_code, reason = "only recorded by `Drive::clear_color`"))]
    Unpaint(Cell),
    /// The paint was removed from every cell.
    ClearPaint,
    /// The mouse was put back on the start cell, beginning a new run.
    Restart,
}

/// Playback state of a recorded run.
///
/// This structure manages the animation state including timing, current step tracking, and the
/// picture of the maze rebuilt from the steps played so far.
#[derive(Debug)]
pub(crate) struct AnimationManager {
    /// Steps recorded by the simulator, in order.
    pub(crate) steps: Vec<AnimationStep>,
    /// Number of steps already applied.
    pub(crate) current_index: usize,
    /// Timestamp of the last animation frame update.
    pub(crate) last_update_time: Instant,
    /// Cell the mouse currently occupies.
    pub(crate) position: Cell,
    /// Heading the mouse currently faces.
    pub(crate) heading: Heading,
    /// Cells entered during the current run, in order.
    pub(crate) trail: Vec<Cell>,
    /// Wall markings revealed so far.
    pub(crate) walls: Vec<(Cell, Heading)>,
    /// Painted cells with their colour.
    pub(crate) paint: Vec<(Cell, Color)>,
    /// One-based number of the run being played.
    pub(crate) run: usize,
}

impl AnimationManager {
    /// Creates a manager positioned before the first of `steps`.
    pub(crate) fn new(steps: Vec<AnimationStep>) -> Self {
        Self {
            steps,
            current_index: 0,
            last_update_time: Instant::now(),
            position: Cell::START,
            heading: Heading::North,
            trail: vec![Cell::START],
            walls: Vec::new(),
            paint: Vec::new(),
            run: 1,
        }
    }

    /// Rewinds the playback to the beginning.
    pub(crate) fn reset(&mut self) {
        self.current_index = 0;
        self.last_update_time = Instant::now();
        self.position = Cell::START;
        self.heading = Heading::North;
        self.trail = vec![Cell::START];
        self.walls.clear();
        self.paint.clear();
        self.run = 1;
    }

    /// Returns whether every recorded step has been applied.
    pub(crate) fn is_finished(&self) -> bool {
        self.current_index >= self.steps.len()
    }

    /// Applies the next recorded step, returning `false` once the recording is exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        let Some(step) = self.steps.get(self.current_index).cloned() else {
            return false;
        };

        match step {
            AnimationStep::Move(cell) => {
                self.position = cell;
                self.trail.push(cell);
            }
            AnimationStep::Turn(heading) => self.heading = heading,
            AnimationStep::Wall(cell, heading) => {
                if !self.walls.contains(&(cell, heading)) {
                    self.walls.push((cell, heading));
                }
            }
            AnimationStep::Unwall(cell, heading) => {
                self.walls.retain(|wall| *wall != (cell, heading));
            }
            AnimationStep::Paint(cell, color) => {
                self.paint.retain(|(painted, _)| *painted != cell);
                self.paint.push((cell, color));
            }
            AnimationStep::Unpaint(cell) => self.paint.retain(|(painted, _)| *painted != cell),
            AnimationStep::ClearPaint => self.paint.clear(),
            AnimationStep::Restart => {
                self.position = Cell::START;
                self.heading = Heading::North;
                self.trail = vec![Cell::START];
                self.run += 1;
            }
        }
        self.current_index += 1;

        true
    }

    /// Advances the playback if at least `delay` has passed since the previous frame.
    ///
    /// Steps that do not move the mouse share the frame of the following move, so that a frame
    /// always shows the mouse somewhere new.
    pub(crate) fn update(&mut self, delay: Duration) {
        if self.last_update_time.elapsed() < delay {
            return;
        }
        self.last_update_time = Instant::now();

        while self.advance() {
            let moved = matches!(
                self.steps.get(self.current_index.saturating_sub(1)),
                Some(AnimationStep::Move(_) | AnimationStep::Restart)
            );
            if moved {
                break;
            }
        }
    }
}
