use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::{
    error::Error,
    find::{Algorithm, PathFinder, SearchState, Strategy},
    grid::{CellState, Grid, Point},
};

/// Summary of a finished run, what the status line of a panel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub path: Option<Vec<Point>>,
    pub path_length: usize,
    pub visited_count: usize,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// The start cell was expanded, there is nothing to draw yet
    Started,
    /// A cell was expanded and should be drawn as visited
    Visited(Point),
    /// The run is over, the panel accepts edits and new runs again
    Finished(RunReport),
}

#[derive(Debug)]
struct ActiveRun {
    algorithm: Algorithm,
    finder: PathFinder<Box<dyn Strategy>>,
    started: Instant,
}

/// One grid together with the run currently searching it, if any.
///
/// While a run is active the grid is read-only and further runs are refused.
#[derive(Debug)]
pub struct Panel {
    grid: Grid,
    run: Option<ActiveRun>,
    last_report: Option<RunReport>,
}

impl Panel {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            run: None,
            last_report: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Algorithm of the active run
    pub fn running(&self) -> Option<Algorithm> {
        self.run.as_ref().map(|r| r.algorithm)
    }

    /// Cells visited so far by the active run
    pub fn trace(&self) -> &[Point] {
        match &self.run {
            Some(run) => run.finder.context().trace(),
            None => &[],
        }
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Apply `f` to the grid, refused while a run is active
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut Grid) -> Result<T, Error>) -> Result<T, Error> {
        if self.is_running() {
            return Err(Error::GridLocked);
        }
        let result = f(&mut self.grid)?;
        self.last_report = None;
        Ok(result)
    }

    pub fn set_cell(&mut self, p: Point, state: CellState) -> Result<(), Error> {
        self.edit(|grid| grid.set_cell(p, state))
    }

    /// Flip a cell between empty and wall and return its new state
    pub fn toggle_cell(&mut self, p: Point) -> Result<CellState, Error> {
        self.edit(|grid| {
            let state = match grid.get(p) {
                CellState::Empty => CellState::Wall,
                CellState::Wall => CellState::Empty,
            };
            grid.set_cell(p, state)?;
            Ok(state)
        })
    }

    pub fn clear_walls(&mut self) -> Result<(), Error> {
        self.edit(|grid| {
            grid.clear_walls();
            Ok(())
        })
    }

    pub fn replace_grid(&mut self, new_grid: Grid) -> Result<(), Error> {
        self.edit(|grid| {
            *grid = new_grid;
            Ok(())
        })
    }

    pub fn start_run(&mut self, algorithm: Algorithm) -> Result<(), Error> {
        if let Some(active) = &self.run {
            debug!(
                "refusing {} while {} is running",
                algorithm.name(),
                active.algorithm.name()
            );
            return Err(Error::ConcurrentRunRejected);
        }

        debug!(
            "starting {} from {} to {}",
            algorithm.name(),
            self.grid.start(),
            self.grid.end()
        );
        self.last_report = None;
        self.run = Some(ActiveRun {
            algorithm,
            finder: algorithm.finder(&self.grid),
            started: Instant::now(),
        });
        Ok(())
    }

    /// Advance the active run by one expansion. `None` when no run is active.
    ///
    /// Every visited cell, the goal included, is reported before the run
    /// finishes: the step that reaches the goal yields `Visited(goal)` and
    /// the following one yields `Finished`.
    pub fn step(&mut self) -> Option<RunEvent> {
        let run = self.run.as_mut()?;

        let visited = run.finder.context().trace().len();
        // a finder that is already done returns its final state again
        let state = run.finder.step(&self.grid);
        let newly_visited = run.finder.context().trace().get(visited).copied();

        match newly_visited {
            Some(p) => Some(RunEvent::Visited(p)),
            None if state.is_done() => self.finish_run(state).map(RunEvent::Finished),
            None => Some(RunEvent::Started),
        }
    }

    /// Run the active search to the end without pacing
    pub fn finish(&mut self) -> Option<RunReport> {
        loop {
            if let RunEvent::Finished(report) = self.step()? {
                return Some(report);
            }
        }
    }

    /// Drop the active run. Returns false if there was none.
    pub fn cancel(&mut self) -> bool {
        match self.run.take() {
            Some(run) => {
                debug!("cancelled {}", run.algorithm.name());
                true
            }
            None => false,
        }
    }

    fn finish_run(&mut self, state: SearchState) -> Option<RunReport> {
        let run = self.run.take()?;
        let visited_count = run.finder.context().trace().len();
        let path = match state {
            SearchState::PathFound(result) => Some(result.path),
            _ => None,
        };

        let report = RunReport {
            algorithm: run.algorithm,
            path_length: path.as_ref().map(Vec::len).unwrap_or(0),
            path,
            visited_count,
            elapsed_ms: millis(run.started.elapsed()),
        };
        debug!(
            "{} finished: path {:?}, {} visited, {}ms",
            run.algorithm.name(),
            report.path.as_ref().map(Vec::len),
            report.visited_count,
            report.elapsed_ms
        );

        self.last_report = Some(report.clone());
        Some(report)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Two independent panels side by side, used to compare algorithms
#[derive(Debug)]
pub struct Comparison {
    panels: [Panel; 2],
}

impl Comparison {
    pub fn new(left: Grid, right: Grid) -> Self {
        Self {
            panels: [Panel::new(left), Panel::new(right)],
        }
    }

    /// Both panels start from copies of the same grid
    pub fn mirrored(grid: Grid) -> Self {
        Self::new(grid.clone(), grid)
    }

    pub fn left(&self) -> &Panel {
        &self.panels[0]
    }

    pub fn right(&self) -> &Panel {
        &self.panels[1]
    }

    pub fn left_mut(&mut self) -> &mut Panel {
        &mut self.panels[0]
    }

    pub fn right_mut(&mut self) -> &mut Panel {
        &mut self.panels[1]
    }

    /// Copy the left grid, markers included, over the right one
    pub fn copy_left_to_right(&mut self) -> Result<(), Error> {
        let grid = self.panels[0].grid().clone();
        self.panels[1].replace_grid(grid)
    }

    /// Start both runs. Nothing is started if either panel is busy.
    pub fn start(&mut self, left: Algorithm, right: Algorithm) -> Result<(), Error> {
        if self.panels.iter().any(Panel::is_running) {
            return Err(Error::ConcurrentRunRejected);
        }
        self.panels[0].start_run(left)?;
        self.panels[1].start_run(right)
    }

    pub fn is_running(&self) -> bool {
        self.panels.iter().any(Panel::is_running)
    }

    /// Advance every panel that still has an active run by one expansion
    pub fn step(&mut self) -> [Option<RunEvent>; 2] {
        let [left, right] = &mut self.panels;
        [left.step(), right.step()]
    }
}
