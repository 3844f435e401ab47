//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::Result;

use crate::{
    config::{self, Settings},
    drive::Color,
    heuristic::Heuristic,
    logging,
    session::ReturnMode,
    solvers::Algorithm,
    types::Speed,
};

/// Micromouse maze solver for the mms simulator.
///
/// Without a subcommand the solver talks to mms over standard input and output.
#[derive(Debug, Parser)]
#[command(name = "micromouse", version, about)]
pub struct Cli {
    /// Settings file to read instead of `micromouse.toml` in the working directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Print more log output; repeat for even more.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    /// What to run.
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

/// Available drivers for the mouse.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Drive the mouse of an mms simulator attached to standard input and output.
    Mms(RunArgs),
    /// Solve a maze with the built-in simulator and print a summary.
    Simulate {
        /// Run options.
        #[command(flatten)]
        run: RunArgs,
        /// Maze file in `.map` or `.num` format; the built-in maze when omitted.
        #[arg(long, value_name = "FILE")]
        maze: Option<PathBuf>,
    },
    /// Solve a maze with the built-in simulator and replay the run in the terminal.
    View {
        /// Run options.
        #[command(flatten)]
        run: RunArgs,
        /// Maze file in `.map` or `.num` format; the built-in maze when omitted.
        #[arg(long, value_name = "FILE")]
        maze: Option<PathBuf>,
        /// Initial replay speed.
        #[arg(long, value_enum)]
        speed: Option<Speed>,
    },
}

/// Options shared by every driver. Unset options fall back to the settings file.
#[derive(Debug, Default, Args)]
pub(crate) struct RunArgs {
    /// Exploration algorithm.
    #[arg(short, long, value_enum)]
    pub(crate) algorithm: Option<Algorithm>,
    /// Distance estimate used by A*.
    #[arg(long, value_enum)]
    pub(crate) heuristic: Option<Heuristic>,
    /// Factor the heuristic estimate is multiplied by.
    #[arg(long)]
    pub(crate) weight: Option<f64>,
    /// Number of exploration runs before the speed run.
    #[arg(short, long)]
    pub(crate) runs: Option<usize>,
    /// How the mouse gets back to the start between runs.
    #[arg(long = "return", value_enum, value_name = "MODE")]
    pub(crate) return_mode: Option<ReturnMode>,
    /// Show flood values and explored cells in the simulator.
    #[arg(short, long)]
    pub(crate) debug: bool,
    /// Colour the speed run route is painted with.
    #[arg(long, value_enum, value_name = "COLOR")]
    pub(crate) route_color: Option<Color>,
}

impl RunArgs {
    /// Overrides the settings given on the command line.
    fn apply(&self, settings: &mut Settings) {
        if let Some(algorithm) = self.algorithm {
            settings.strategy.algorithm = algorithm;
        }
        if let Some(heuristic) = self.heuristic {
            settings.strategy.heuristic = heuristic;
        }
        if let Some(weight) = self.weight {
            settings.strategy.weight = weight;
        }
        if let Some(runs) = self.runs {
            settings.runs = runs;
        }
        if let Some(return_mode) = self.return_mode {
            settings.return_mode = return_mode;
        }
        if self.debug {
            settings.debug = true;
        }
        if let Some(route_color) = self.route_color {
            settings.route_color = route_color;
        }
    }
}

impl Cli {
    /// Resolves the settings from the defaults, the settings file and the command line.
    ///
    /// # Errors
    ///
    /// This function may return errors if the settings file cannot be read, or if the resulting
    /// settings are invalid.
    pub(crate) fn settings(&self) -> Result<Settings> {
        let (file, base) = config::read(self.config.as_deref())?;
        let mut settings = Settings::default();
        settings.merge(file, &base)?;

        match &self.command {
            None => {}
            Some(Command::Mms(run)) => run.apply(&mut settings),
            Some(Command::Simulate { run, maze }) => {
                run.apply(&mut settings);
                if let Some(maze) = maze {
                    settings.maze = Some(maze.clone());
                }
            }
            Some(Command::View { run, maze, speed }) => {
                run.apply(&mut settings);
                if let Some(maze) = maze {
                    settings.maze = Some(maze.clone());
                }
                if let Some(speed) = speed {
                    settings.speed = *speed;
                }
            }
        }
        settings.log_level = logging::verbosity(settings.log_level, self.verbose);
        settings.validate()?;

        Ok(settings)
    }
}
