//! Settings file handling.
//!
//! Settings are layered: built-in defaults first, then the TOML settings file, then command-line
//! flags. The file is looked up as [`DEFAULT_CONFIG_FILE`] in the working directory unless a path
//! is given, and a missing default file is not an error.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{bail, eyre, Result, WrapErr as _};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::{
    drive::Color,
    heuristic::Heuristic,
    session::ReturnMode,
    solvers::{Algorithm, Strategy},
    types::Speed,
};

/// Settings file looked up in the working directory when no path is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "micromouse.toml";

/// Number of exploration runs when none is configured.
pub(crate) const DEFAULT_RUNS: usize = 5;

/// Contents of a settings file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct FileSettings {
    /// Exploration algorithm.
    pub(crate) algorithm: Option<Algorithm>,
    /// Distance estimate for A*.
    pub(crate) heuristic: Option<Heuristic>,
    /// Heuristic weight.
    pub(crate) weight: Option<f64>,
    /// Number of exploration runs.
    pub(crate) runs: Option<usize>,
    /// Way back to the start between runs.
    #[serde(rename = "return")]
    pub(crate) return_mode: Option<ReturnMode>,
    /// Whether to show flood values and explored cells in the simulator.
    pub(crate) debug: Option<bool>,
    /// Colour the speed run route is painted with.
    pub(crate) route_color: Option<Color>,
    /// Log verbosity, such as `info` or `debug`.
    pub(crate) log_level: Option<String>,
    /// Maze file for the in-process simulator, relative to the settings file.
    pub(crate) maze: Option<PathBuf>,
    /// Replay speed of the viewer.
    pub(crate) speed: Option<Speed>,
}

/// Fully resolved settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Exploration algorithm and heuristic.
    pub(crate) strategy: Strategy,
    /// Number of exploration runs.
    pub(crate) runs: usize,
    /// Way back to the start between runs.
    pub(crate) return_mode: ReturnMode,
    /// Whether to show flood values and explored cells in the simulator.
    pub(crate) debug: bool,
    /// Colour the speed run route is painted with.
    pub(crate) route_color: Color,
    /// Most verbose log level printed.
    pub(crate) log_level: LevelFilter,
    /// Maze file for the in-process simulator; the built-in maze when unset.
    pub(crate) maze: Option<PathBuf>,
    /// Replay speed of the viewer.
    pub(crate) speed: Speed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            runs: DEFAULT_RUNS,
            return_mode: ReturnMode::default(),
            debug: false,
            route_color: Color::DarkYellow,
            log_level: LevelFilter::INFO,
            maze: None,
            speed: Speed::default(),
        }
    }
}

impl Settings {
    /// Overrides every setting present in `file`.
    ///
    /// Relative maze paths are resolved against `base`, the directory of the settings file.
    ///
    /// # Errors
    ///
    /// This function may return errors if the file's log level is not a valid level name.
    pub(crate) fn merge(&mut self, file: FileSettings, base: &Path) -> Result<()> {
        if let Some(algorithm) = file.algorithm {
            self.strategy.algorithm = algorithm;
        }
        if let Some(heuristic) = file.heuristic {
            self.strategy.heuristic = heuristic;
        }
        if let Some(weight) = file.weight {
            self.strategy.weight = weight;
        }
        if let Some(runs) = file.runs {
            self.runs = runs;
        }
        if let Some(return_mode) = file.return_mode {
            self.return_mode = return_mode;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if let Some(route_color) = file.route_color {
            self.route_color = route_color;
        }
        if let Some(level) = file.log_level {
            self.log_level = level
                .parse()
                .map_err(|err| eyre!("invalid log level {level:?}: {err}"))?;
        }
        if let Some(maze) = file.maze {
            self.maze = Some(base.join(maze));
        }
        if let Some(speed) = file.speed {
            self.speed = speed;
        }

        Ok(())
    }

    /// Checks that the settings can drive a session.
    ///
    /// # Errors
    ///
    /// This function may return errors if no run is requested or the heuristic weight is not a
    /// finite, non-negative number.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            bail!("at least one exploration run is needed");
        }
        let weight = self.strategy.weight;
        if !weight.is_finite() || weight.is_sign_negative() {
            bail!("the heuristic weight must be a finite, non-negative number, got {weight}");
        }

        Ok(())
    }
}

/// Reads the settings file at `path`, or [`DEFAULT_CONFIG_FILE`] when no path is given.
///
/// Returns the parsed file together with the directory relative paths in it are resolved
/// against.
///
/// # Errors
///
/// This function may return errors if a file named explicitly cannot be read, or if the file is
/// not valid TOML with the expected keys.
pub(crate) fn read(path: Option<&Path>) -> Result<(FileSettings, PathBuf)> {
    let (path, explicit) = path.map_or_else(
        || (Path::new(DEFAULT_CONFIG_FILE), false),
        |path| (path, true),
    );
    let base = path
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf);

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
            return Ok((FileSettings::default(), base));
        }
        Err(err) => {
            return Err(err)
                .wrap_err_with(|| format!("failed to read settings from {}", path.display()));
        }
    };

    let file = parse(&contents)
        .wrap_err_with(|| format!("invalid settings in {}", path.display()))?;
    Ok((file, base))
}

/// Parses the contents of a settings file.
///
/// # Errors
///
/// This function may return errors if `contents` is not valid TOML or holds unknown keys.
pub(crate) fn parse(contents: &str) -> Result<FileSettings> {
    Ok(toml::from_str(contents)?)
}
