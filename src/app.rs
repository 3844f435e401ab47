//! Core application state and logic for the replay viewer.

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{
    animation::{AnimationManager, AnimationStep},
    events,
    maze::Maze,
    types::{Playback, Speed},
    ui,
};

/// Application state container for the replay viewer.
///
/// This structure holds the state from which Ratatui renders the replay and into which Crossterm
/// key events are written.
#[derive(Debug)]
pub(crate) struct App {
    /// Application exit flag.
    ///
    /// This field is set to `true` when the user asks to quit, which ends the main loop.
    pub(crate) exit: bool,
    /// Whether the replay advances on its own.
    pub(crate) playback: Playback,
    /// Current replay speed.
    pub(crate) speed: Speed,
    /// Ground-truth walls of the simulated maze.
    ///
    /// These are drawn dimmed beneath the walls the mouse has discovered so far.
    pub(crate) maze: Maze,
    /// Playback state over the recorded simulator steps.
    pub(crate) animation_manager: AnimationManager,
}

impl App {
    /// Creates a viewer for a run recorded on `maze`, playing at `speed`.
    pub(crate) fn new(maze: Maze, steps: Vec<AnimationStep>, speed: Speed) -> Self {
        Self {
            exit: false,
            playback: Playback::Playing,
            speed,
            maze,
            animation_manager: AnimationManager::new(steps),
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws a frame, then handles user input and advances the replay. The loop
    /// continues until the exit condition is `true`, after which the function returns to the call
    /// site.
    ///
    /// # Errors
    ///
    /// This function may return errors from drawing or from reading terminal events.
    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame).map_err(std::io::Error::other)
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Advances the replay according to the playback state.
    ///
    /// A finished replay stays on its last frame.
    pub(crate) fn tick(&mut self) {
        if self.playback == Playback::Playing {
            self.animation_manager.update(self.speed.delay());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn test_new_app_starts_playing() {
        let app = App::new(Maze::new(2, 2), Vec::new(), Speed::Fast);

        assert!(!app.exit, "running");
        assert_eq!(app.playback, Playback::Playing, "playing");
        assert_eq!(app.speed, Speed::Fast, "requested speed");
        assert_eq!(app.animation_manager.position, Cell::START, "mouse at start");
    }

    #[test]
    fn test_paused_app_does_not_advance() {
        let steps = vec![AnimationStep::Move(Cell::new(0, 1))];
        let mut app = App::new(Maze::new(2, 2), steps, Speed::Fastest);
        app.playback = Playback::Paused;

        app.tick();
        assert_eq!(app.animation_manager.current_index, 0, "nothing applied");
    }
}
