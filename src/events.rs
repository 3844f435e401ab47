//! Event handling functions for user input and replay state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{app::App, types::Playback};

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler based
/// on the key pressed, then advances the replay. It uses a timeout to avoid blocking the UI.
///
/// # Errors
///
/// This function may return errors from polling or reading terminal events.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(20))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code);
            }
        }
    }

    app.tick();

    Ok(())
}

/// Applies the effect of a single key press.
///
/// `q` quits, `l` toggles playback, `n` steps once while paused, `h` restarts the replay, and
/// `j`/`k` lower or raise the speed. Other keys are ignored.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('l') => app.playback = app.playback.toggled(),
        KeyCode::Char('n') => handle_n_events(app),
        KeyCode::Char('h') => app.animation_manager.reset(),
        KeyCode::Char('j') => app.speed = app.speed.slower(),
        KeyCode::Char('k') => app.speed = app.speed.faster(),
        _ => {}
    }
}

/// Handles 'n' key press events for single stepping.
///
/// While paused, this applies recorded steps up to and including the next move of the mouse, so
/// one press always shows the mouse somewhere new. While playing it does nothing.
pub(crate) fn handle_n_events(app: &mut App) {
    if app.playback == Playback::Paused {
        app.animation_manager.update(Duration::ZERO);
    }
}
