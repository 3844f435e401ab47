//! This crate contains a micromouse maze solver for the mms simulator.
//!
//! The mouse explores the maze a number of times with one of several strategies, keeping what it
//! learns between runs, and finishes with a speed run along the shortest route found. It can drive
//! mms over standard input and output, or an in-process simulator whose run can be replayed in the
//! terminal.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod animation;
mod app;
mod cli;
mod client;
mod config;
mod drive;
mod events;
mod flood;
mod grid;
mod heuristic;
mod loader;
mod logging;
mod maze;
mod navigator;
mod path;
mod session;
mod simulator;
mod solvers;
mod types;
mod ui;

use color_eyre::eyre::{Result, WrapErr as _};
use tracing::info;

pub use crate::cli::Cli;
use crate::{
    app::App,
    cli::Command,
    client::Client,
    config::Settings,
    drive::Drive,
    maze::Maze,
    navigator::Navigator,
    session::{Session, Summary},
    simulator::Simulator,
};

/// Runs the command selected on the command line.
///
/// # Errors
///
/// This function may return errors if the settings are invalid, if the maze file cannot be
/// loaded, if the mouse cannot reach the centre, or if the simulator or terminal fails.
pub fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings()?;

    match cli.command {
        None | Some(Command::Mms(_)) => mms(&settings),
        Some(Command::Simulate { .. }) => simulate(&settings),
        Some(Command::View { .. }) => view(&settings),
    }
}

/// Solves the maze of an mms simulator attached to the standard streams.
fn mms(settings: &Settings) -> Result<()> {
    logging::init(settings.log_level)?;
    info!(algorithm = %settings.strategy.algorithm, "connecting to the simulator");

    let navigator = Navigator::new(Client::stdio(), settings.debug)?;
    let _ = solve(navigator, settings)?;

    Ok(())
}

/// Solves a maze file with the in-process simulator and prints a summary.
fn simulate(settings: &Settings) -> Result<()> {
    logging::init(settings.log_level)?;

    let simulator = Simulator::new(maze(settings)?);
    let navigator = Navigator::new(simulator, settings.debug)?;
    let (mut summary, simulator) = solve(navigator, settings)?;
    summary.odometer = Some(simulator.odometer());

    print!("{summary}");

    Ok(())
}

/// Solves a maze file with the in-process simulator and replays the run in the terminal.
fn view(settings: &Settings) -> Result<()> {
    let simulator = Simulator::new(maze(settings)?);
    let navigator = Navigator::new(simulator, settings.debug)?;
    let (_, simulator) = solve(navigator, settings)?;
    let (maze, steps) = simulator.into_recording();

    let mut terminal = ratatui::init();
    let result = App::new(maze, steps, settings.speed).run(&mut terminal);
    ratatui::restore();

    result
}

/// Runs every exploration run and the speed run, then ends the session.
fn solve<D: Drive>(navigator: Navigator<D>, settings: &Settings) -> Result<(Summary, D)> {
    let mut session = Session::new(navigator, settings);
    session.explore()?;
    let _ = session.speed_run()?;

    Ok(session.finish())
}

/// Loads the configured maze file, or the built-in maze when none is configured.
fn maze(settings: &Settings) -> Result<Maze> {
    settings.maze.as_deref().map_or_else(loader::default_maze, |path| {
        loader::load(path).wrap_err("failed to load the maze for the simulator")
    })
}
