//! Run orchestration.
//!
//! A [`Session`] repeats exploration runs from the start cell to the centre, keeping the maze
//! knowledge between runs, then finishes with a speed run along the shortest route found.

use std::{
    collections::BTreeMap,
    fmt,
    time::{Duration, Instant},
};

use clap::ValueEnum;
use color_eyre::eyre::{OptionExt as _, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    config::Settings,
    drive::{Color, Drive},
    grid::{Cell, Heading},
    navigator::Navigator,
    simulator::Odometer,
    solvers::Strategy,
};

/// How the mouse gets back to the start cell between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ReturnMode {
    /// Ask the simulator to put the mouse back on the start cell.
    #[default]
    Teleport,
    /// Drive back through visited cells.
    Drive,
}

/// Measurements of one exploration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunStats {
    /// One-based run number.
    pub(crate) run: usize,
    /// Cells moved during the run.
    pub(crate) steps: usize,
    /// Cells on the route found, start included.
    pub(crate) route: usize,
    /// Wall-clock time of the run.
    pub(crate) elapsed: Duration,
}

/// Outcome of a whole session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    /// Strategy the runs were made with.
    pub(crate) strategy: Strategy,
    /// Per-run measurements.
    pub(crate) runs: Vec<RunStats>,
    /// Cells on the route used for the speed run.
    pub(crate) best: Option<usize>,
    /// Wall-clock time of the speed run.
    pub(crate) speed_run: Option<Duration>,
    /// Movement counters of the in-process simulator, when one was used.
    pub(crate) odometer: Option<Odometer>,
}

impl fmt::Display for Summary {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "algorithm: {}", self.strategy.algorithm)?;
        for stats in &self.runs {
            writeln!(
                formatter,
                "run {}: {} steps, route of {} cells, {:.2?}",
                stats.run, stats.steps, stats.route, stats.elapsed
            )?;
        }
        if let Some(best) = self.best {
            writeln!(formatter, "best route: {best} cells")?;
        }
        if let Some(elapsed) = self.speed_run {
            writeln!(formatter, "speed run: {elapsed:.2?}")?;
        }
        if let Some(odometer) = self.odometer {
            writeln!(
                formatter,
                "simulator: {} moves, {} turns, {} wall readings",
                odometer.moves, odometer.turns, odometer.readings
            )?;
        }

        Ok(())
    }
}

/// Exploration runs followed by a speed run.
#[derive(Debug)]
pub(crate) struct Session<D> {
    /// Mouse and its knowledge.
    navigator: Navigator<D>,
    /// Exploration strategy.
    strategy: Strategy,
    /// Number of exploration runs.
    runs: usize,
    /// Way back to the start after each run.
    return_mode: ReturnMode,
    /// Colour the speed run route is painted with.
    route_color: Color,
    /// Routes found so far, keyed by their length; the first route of each length is kept.
    paths: BTreeMap<usize, Vec<Cell>>,
    /// Measurements of the finished runs.
    stats: Vec<RunStats>,
    /// Cells on the route used for the speed run.
    best: Option<usize>,
    /// Wall-clock time of the speed run.
    speed_run: Option<Duration>,
}

impl<D: Drive> Session<D> {
    /// Prepares a session over `navigator`.
    pub(crate) const fn new(navigator: Navigator<D>, settings: &Settings) -> Self {
        Self {
            navigator,
            strategy: settings.strategy,
            runs: settings.runs,
            return_mode: settings.return_mode,
            route_color: settings.route_color,
            paths: BTreeMap::new(),
            stats: Vec::new(),
            best: None,
            speed_run: None,
        }
    }

    /// Returns the routes found so far, shortest first.
    #[cfg(test)]
    pub(crate) const fn paths(&self) -> &BTreeMap<usize, Vec<Cell>> {
        &self.paths
    }

    /// Runs every exploration run.
    ///
    /// # Errors
    ///
    /// This function may return errors if a run cannot reach the centre, or if the drive fails.
    pub(crate) fn explore(&mut self) -> Result<()> {
        for run in 1..=self.runs {
            if self.navigator.drive_mut().was_reset()? {
                warn!(run, "the simulator was reset, starting over from the start cell");
                self.navigator.drive_mut().ack_reset()?;
                self.navigator.restart();
            }

            let moves = self.navigator.moves();
            let started = Instant::now();
            let route = self.strategy.explore(&mut self.navigator)?;
            let stats = RunStats {
                run,
                steps: self.navigator.moves() - moves,
                route: route.len(),
                elapsed: started.elapsed(),
            };
            info!(
                run,
                steps = stats.steps,
                route = stats.route,
                elapsed = ?stats.elapsed,
                "reached the centre"
            );

            self.stats.push(stats);
            let _ = self.paths.entry(route.len()).or_insert(route);
            self.return_to_start()?;
        }

        Ok(())
    }

    /// Brings the mouse back to the start cell, facing north.
    ///
    /// # Errors
    ///
    /// This function may return errors if no visited route leads back, or if the drive fails.
    fn return_to_start(&mut self) -> Result<()> {
        match self.return_mode {
            ReturnMode::Teleport => {
                self.navigator.drive_mut().ack_reset()?;
                self.navigator.restart();
            }
            ReturnMode::Drive => {
                self.navigator.travel_to(Cell::START)?;
                self.navigator.face(Heading::North)?;
            }
        }

        Ok(())
    }

    /// Dashes along the shortest known route to the centre and returns its length in cells.
    ///
    /// The shortest route through visited cells is considered along with the routes of the
    /// exploration runs. The simulator display is wiped and the chosen route painted before the
    /// mouse sets off.
    ///
    /// # Errors
    ///
    /// This function may return errors if no route has been found, or if the drive fails.
    pub(crate) fn speed_run(&mut self) -> Result<usize> {
        let goals = self.navigator.maze().goals();
        if let Some(route) = self.navigator.visited_route(Cell::START, &goals) {
            let _ = self.paths.entry(route.len()).or_insert(route);
        }
        let route = self
            .paths
            .values()
            .next()
            .cloned()
            .ok_or_eyre("no route to the centre was found, nothing to run at speed")?;

        let drive = self.navigator.drive_mut();
        drive.clear_all_color()?;
        drive.clear_all_text()?;
        for cell in &route {
            drive.set_color(*cell, self.route_color)?;
        }

        info!(length = route.len(), "running the best route");
        let started = Instant::now();
        self.navigator.dash(&route)?;
        let elapsed = started.elapsed();
        info!(elapsed = ?elapsed, "speed run finished");

        self.best = Some(route.len());
        self.speed_run = Some(elapsed);
        Ok(route.len())
    }

    /// Ends the session and returns its summary together with the drive.
    pub(crate) fn finish(self) -> (Summary, D) {
        let summary = Summary {
            strategy: self.strategy,
            runs: self.stats,
            best: self.best,
            speed_run: self.speed_run,
            odometer: None,
        };

        (summary, self.navigator.into_drive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::AnimationStep, loader, maze::Maze, simulator::Simulator, solvers::Algorithm,
    };

    /// Settings for `runs` runs with `algorithm`, returning by `return_mode`.
    fn settings(algorithm: Algorithm, runs: usize, return_mode: ReturnMode) -> Settings {
        Settings {
            strategy: Strategy {
                algorithm,
                ..Strategy::default()
            },
            runs,
            return_mode,
            ..Settings::default()
        }
    }

    /// Builds a session over a simulator of the built-in maze.
    fn session(settings: &Settings) -> Session<Simulator> {
        let truth = loader::default_maze().expect("built-in maze");
        let navigator = Navigator::new(Simulator::new(truth), false).expect("valid maze");
        Session::new(navigator, settings)
    }

    #[test]
    fn test_runs_and_speed_run() {
        let mut session = session(&settings(Algorithm::FloodFill, 3, ReturnMode::Teleport));
        session.explore().expect("explore");
        let length = session.speed_run().expect("speed run");

        let truth = loader::default_maze().expect("built-in maze");
        let shortest = truth
            .route(Cell::START, &truth.goals(), |_| true)
            .expect("centre reachable");
        assert!(length >= shortest.len(), "no route beats the true shortest");
        assert_eq!(
            session.paths().keys().next(),
            Some(&length),
            "speed run takes the shortest recorded route"
        );

        let (summary, simulator) = session.finish();
        assert_eq!(summary.runs.len(), 3, "three runs");
        assert_eq!(summary.best, Some(length), "best length");
        assert!(truth.is_goal(simulator.position()), "mouse ends in the centre");
    }

    #[test]
    fn test_paths_are_keyed_by_length() {
        let mut session = session(&settings(Algorithm::DepthFirst, 2, ReturnMode::Teleport));
        session.explore().expect("explore");

        assert!(!session.paths().is_empty(), "at least one route");
        for (length, route) in session.paths() {
            assert_eq!(route.len(), *length, "key is the route length");
            assert_eq!(route.first(), Some(&Cell::START), "route starts at the start");
        }
    }

    #[test]
    fn test_drive_back_to_start() {
        let mut session = session(&settings(Algorithm::BreadthFirst, 2, ReturnMode::Drive));
        session.explore().expect("explore");

        let (_, simulator) = session.finish();
        assert_eq!(simulator.position(), Cell::START, "drove back");
        assert_eq!(simulator.heading(), Heading::North, "facing north");
        let (_, trace) = simulator.into_recording();
        assert!(!trace.contains(&AnimationStep::Restart), "never teleported");
    }

    #[test]
    fn test_user_reset_is_acknowledged() {
        let mut navigator =
            Navigator::new(Simulator::new(Maze::new(4, 4)), false).expect("valid maze");
        navigator.step(Heading::North).expect("open maze");
        navigator.drive_mut().press_reset();

        let settings = settings(Algorithm::FloodFill, 1, ReturnMode::Drive);
        let mut session = Session::new(navigator, &settings);
        session.explore().expect("explore");

        let route = session.paths().values().next().expect("one route");
        assert_eq!(route.first(), Some(&Cell::START), "run restarted from the start");

        let (_, mut simulator) = session.finish();
        assert!(!simulator.was_reset().expect("was reset"), "reset acknowledged");
        let (_, trace) = simulator.into_recording();
        let restarts = trace
            .iter()
            .filter(|step| **step == AnimationStep::Restart)
            .count();
        assert_eq!(restarts, 1, "one acknowledgement for one reset");
    }

    #[test]
    fn test_knowledge_is_kept_across_runs() {
        let mut session = session(&settings(Algorithm::FloodFill, 3, ReturnMode::Teleport));
        session.explore().expect("explore");

        let navigator = &session.navigator;
        let visited = navigator
            .maze()
            .cells()
            .filter(|cell| navigator.is_visited(*cell))
            .count();
        let (summary, simulator) = session.finish();

        assert_eq!(summary.runs.len(), 3, "three runs");
        assert_eq!(
            simulator.odometer().readings,
            3 * visited,
            "every cell is sensed once over all runs"
        );
    }

    #[test]
    fn test_speed_run_paints_the_route() {
        let mut session = session(&settings(Algorithm::AStar, 1, ReturnMode::Teleport));
        session.explore().expect("explore");
        let _ = session.speed_run().expect("speed run");

        let (_, simulator) = session.finish();
        let (_, trace) = simulator.into_recording();
        let cleared = trace
            .iter()
            .position(|step| *step == AnimationStep::ClearPaint)
            .expect("colours cleared");
        assert_eq!(
            trace.get(cleared + 1),
            Some(&AnimationStep::Paint(Cell::START, Color::DarkYellow)),
            "route painted from the start"
        );
    }

    #[test]
    fn test_speed_run_uses_the_route_color() {
        let settings = Settings {
            route_color: Color::DarkRed,
            ..settings(Algorithm::BreadthFirst, 1, ReturnMode::Teleport)
        };
        let mut session = session(&settings);
        session.explore().expect("explore");
        let length = session.speed_run().expect("speed run");

        let (_, simulator) = session.finish();
        let (_, trace) = simulator.into_recording();
        let painted = trace
            .iter()
            .skip_while(|step| **step != AnimationStep::ClearPaint)
            .filter(|step| matches!(step, AnimationStep::Paint(_, Color::DarkRed)))
            .count();
        assert_eq!(painted, length, "every route cell in the configured colour");
    }

    #[test]
    fn test_speed_run_without_routes_fails() {
        let navigator =
            Navigator::new(Simulator::new(Maze::new(4, 4)), false).expect("valid maze");
        let settings = settings(Algorithm::FloodFill, 0, ReturnMode::Teleport);
        let mut session = Session::new(navigator, &settings);

        assert!(session.speed_run().is_err(), "nothing explored yet");
    }

    #[test]
    fn test_summary_lists_every_run() {
        let summary = Summary {
            strategy: Strategy::default(),
            runs: vec![
                RunStats {
                    run: 1,
                    steps: 20,
                    route: 15,
                    elapsed: Duration::from_millis(3),
                },
                RunStats {
                    run: 2,
                    steps: 14,
                    route: 15,
                    elapsed: Duration::from_millis(2),
                },
            ],
            best: Some(15),
            speed_run: Some(Duration::from_millis(1)),
            odometer: Some(Odometer {
                moves: 48,
                turns: 20,
                readings: 60,
            }),
        };
        let text = summary.to_string();

        assert!(text.starts_with("algorithm: flood fill\n"), "algorithm first: {text}");
        assert!(text.contains("run 2: 14 steps, route of 15 cells"), "second run: {text}");
        assert!(text.contains("best route: 15 cells"), "best route: {text}");
        assert!(
            text.contains("simulator: 48 moves, 20 turns, 60 wall readings"),
            "counters: {text}"
        );
    }
}
