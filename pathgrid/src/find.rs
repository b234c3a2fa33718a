use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    str::FromStr,
};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    astar::AStar,
    bfs::Bfs,
    dfs::Dfs,
    dijkstra::Dijkstra,
    error::Error,
    greedy::Greedy,
    grid::{Grid, Point},
    path::reconstruct,
};

/// A search strategy decides in which order cells are expanded.
///
/// [`PathFinder`] owns the bookkeeping that is common to every strategy (the
/// visitation trace, the predecessor map and the goal test); a strategy only
/// manages its own frontier.
pub trait Strategy: Debug {
    /// Take the next cell to expand, or `None` once the frontier is exhausted
    fn next(&mut self) -> Option<Point>;

    /// Add the passable `neighbors` of the cell that was just expanded to the frontier
    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext);
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn next(&mut self) -> Option<Point> {
        (**self).next()
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        (**self).expand(current, neighbors, run)
    }
}

/// Everything a single search run accumulates. Nothing in here outlives the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    start: Point,
    goal: Point,
    predecessors: HashMap<Point, Point>,
    trace: Vec<Point>,
}

impl RunContext {
    pub fn new(start: Point, goal: Point) -> Self {
        Self {
            start,
            goal,
            predecessors: HashMap::new(),
            trace: Vec::new(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn is_discovered(&self, point: Point) -> bool {
        point == self.start || self.predecessors.contains_key(&point)
    }

    /// Record that `point` was reached from `from`. The first discovery wins:
    /// returns false and leaves the map untouched if `point` was seen before.
    pub fn discover(&mut self, point: Point, from: Point) -> bool {
        if self.is_discovered(point) {
            return false;
        }
        self.predecessors.insert(point, from);
        true
    }

    /// Replace the predecessor of `point` after a strictly cheaper route to it was found
    pub fn relax(&mut self, point: Point, from: Point) {
        if point != self.start {
            self.predecessors.insert(point, from);
        }
    }

    pub fn predecessors(&self) -> &HashMap<Point, Point> {
        &self.predecessors
    }

    /// Cells in the order they were expanded, without the start cell
    pub fn trace(&self) -> &[Point] {
        &self.trace
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// Cells from the one next to the start up to and including the goal
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Computing)
    }
}

/// The result of a run that went to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub path: Option<Vec<Point>>,
    pub visited_count: usize,
    pub trace: Vec<Point>,
}

impl Outcome {
    fn new(state: SearchState, run: RunContext) -> Self {
        let path = match state {
            SearchState::PathFound(result) => Some(result.path),
            _ => None,
        };
        Self {
            path,
            visited_count: run.trace.len(),
            trace: run.trace,
        }
    }

    pub fn path_len(&self) -> Option<usize> {
        self.path.as_ref().map(Vec::len)
    }
}

/// A search that advances one expansion per call to [`PathFinder::step`].
///
/// The grid is passed to every step instead of being borrowed by the finder so
/// that the owner of the grid decides when it may be edited (see
/// [`crate::panel::Panel`]).
#[derive(Debug)]
pub struct PathFinder<S: Strategy> {
    run: RunContext,
    strategy: S,
    state: SearchState,
}

impl<S: Strategy> PathFinder<S> {
    pub fn new(start: Point, goal: Point, strategy: S) -> Self {
        Self {
            run: RunContext::new(start, goal),
            strategy,
            state: SearchState::Computing,
        }
    }

    pub fn finish(mut self, grid: &Grid) -> (SearchState, RunContext) {
        loop {
            match self.step(grid) {
                SearchState::Computing => {}
                s => return (s, self.run),
            }
        }
    }

    /// Run to completion, handing every newly visited cell to `observer`
    /// before the next expansion happens
    pub fn finish_with(mut self, grid: &Grid, mut observer: impl FnMut(Point)) -> Outcome {
        loop {
            let visited = self.run.trace.len();
            let state = self.step(grid);
            if let Some(&p) = self.run.trace.get(visited) {
                observer(p);
            }
            if state.is_done() {
                return Outcome::new(state, self.run);
            }
        }
    }

    pub fn step(&mut self, grid: &Grid) -> SearchState {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.strategy.next() else {
            trace!("frontier exhausted after {} cells", self.run.trace.len());
            self.state = SearchState::NoPathFound;
            return self.state.clone();
        };

        if current != self.run.start {
            self.run.trace.push(current);
        }

        if current == self.run.goal {
            let path = reconstruct(&self.run.predecessors, self.run.goal);
            trace!(
                "reached goal {} after {} cells, path of {}",
                current,
                self.run.trace.len(),
                path.len()
            );
            self.state = SearchState::PathFound(PathResult {
                total_cost: path.len(),
                path,
                start: self.run.start,
                goal: self.run.goal,
            });
            return self.state.clone();
        }

        let neighbors: Vec<Point> = grid.neighbors(current).collect();
        self.strategy.expand(current, &neighbors, &mut self.run);

        self.state.clone()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn context(&self) -> &RunContext {
        &self.run
    }

    pub fn start(&self) -> Point {
        self.run.start
    }

    pub fn goal(&self) -> Point {
        self.run.goal
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
    AStar,
    Dijkstra,
    Greedy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Greedy,
    ];

    /// Short name accepted by `from_str`
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Greedy => "greedy",
        }
    }

    /// Returns true if the path found is always a shortest one
    pub fn is_optimal(&self) -> bool {
        matches!(
            self,
            Algorithm::Bfs | Algorithm::AStar | Algorithm::Dijkstra
        )
    }

    pub fn strategy(&self, start: Point, goal: Point) -> Box<dyn Strategy> {
        match self {
            Algorithm::Bfs => Box::new(Bfs::new(start)),
            Algorithm::Dfs => Box::new(Dfs::new(start)),
            Algorithm::AStar => Box::new(AStar::new(start, goal)),
            Algorithm::Dijkstra => Box::new(Dijkstra::new(start)),
            Algorithm::Greedy => Box::new(Greedy::new(start, goal)),
        }
    }

    /// A fresh finder from the grid's start to its end
    pub fn finder(&self, grid: &Grid) -> PathFinder<Box<dyn Strategy>> {
        PathFinder::new(
            grid.start(),
            grid.end(),
            self.strategy(grid.start(), grid.end()),
        )
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::Bfs => "Breadth-First Search",
                Algorithm::Dfs => "Depth-First Search",
                Algorithm::AStar => "A*",
                Algorithm::Dijkstra => "Dijkstra",
                Algorithm::Greedy => "Greedy Best-First",
            }
        )
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "astar" | "a*" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "greedy" => Ok(Algorithm::Greedy),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Run `algorithm` on `grid` from its start to its end in one go
pub fn solve(grid: &Grid, algorithm: Algorithm) -> Outcome {
    let (state, run) = algorithm.finder(grid).finish(grid);
    Outcome::new(state, run)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{grid::CellState, path::is_contiguous};

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    fn create_basic_map() -> Grid {
        "XXXXXXX\n\
         XS   EX\n\
         X XXX X\n\
         X X   X\n\
         X X X X\n\
         X   X X\n\
         XXXXXXX\n"
            .parse()
            .unwrap()
    }

    /// A deterministic family of grids with scattered walls
    fn grid_family() -> Vec<Grid> {
        let mut grids = Vec::new();
        for size in [3, 5, 8, 12] {
            for salt in 0..7 {
                let mut grid = Grid::empty(size).unwrap();
                for y in 0..size {
                    for x in 0..size {
                        if (x * 7 + y * 13 + salt * 5) % (3 + salt % 3) == 0 {
                            // refused on the markers, which is what we want
                            let _ = grid.set_cell(p(x, y), CellState::Wall);
                        }
                    }
                }
                grids.push(grid);
            }
        }
        grids
    }

    /// Cells reachable from the start, not counting the start itself
    fn reachable(grid: &Grid) -> usize {
        let mut seen = std::collections::HashSet::from([grid.start()]);
        let mut stack = vec![grid.start()];
        while let Some(c) = stack.pop() {
            for n in grid.neighbors(c) {
                if seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len() - 1
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("bfs".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert_eq!("A*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!(" Dijkstra ".parse::<Algorithm>().unwrap(), Algorithm::Dijkstra);
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!(matches!(
            "bogo".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm(name)) if name == "bogo"
        ));
    }

    #[test]
    fn test_basic_route() {
        let grid = create_basic_map();
        for algorithm in Algorithm::ALL {
            let outcome = solve(&grid, algorithm);
            let path = outcome.path.expect("the basic map has a route");
            assert_eq!(path.last(), Some(&grid.end()), "{}", algorithm);
            assert!(is_contiguous(grid.start(), &path), "{}", algorithm);
            if algorithm.is_optimal() {
                assert_eq!(path.len(), 4, "{}", algorithm);
            }
        }
    }

    #[test]
    fn test_basic_no_route() {
        let mut grid = create_basic_map();
        grid.set_cell(p(2, 1), CellState::Wall).unwrap();
        grid.set_cell(p(1, 2), CellState::Wall).unwrap();

        for algorithm in Algorithm::ALL {
            let outcome = solve(&grid, algorithm);
            assert_eq!(outcome.path, None, "{}", algorithm);
            assert_eq!(outcome.visited_count, 0, "{}", algorithm);
        }
    }

    #[test]
    fn test_step_by_step() {
        let grid = Grid::empty(3).unwrap();
        let mut finder = Algorithm::Bfs.finder(&grid);

        // the first step expands the start cell, which is not part of the trace
        assert_eq!(finder.step(&grid), SearchState::Computing);
        assert!(finder.context().trace().is_empty());

        assert_eq!(finder.step(&grid), SearchState::Computing);
        assert_eq!(finder.context().trace(), &[p(1, 0)]);

        while !finder.step(&grid).is_done() {}
        assert!(matches!(
            finder.state(),
            SearchState::PathFound(PathResult { total_cost: 4, .. })
        ));
        // further steps do not move the finder
        let trace = finder.context().trace().to_vec();
        assert!(finder.step(&grid).is_done());
        assert_eq!(finder.context().trace(), &trace[..]);
        assert_eq!(trace.last(), Some(&grid.end()));
    }

    #[test]
    fn test_observer_sees_trace_in_order() {
        let grid = create_basic_map();
        for algorithm in Algorithm::ALL {
            let mut seen = Vec::new();
            let outcome = algorithm.finder(&grid).finish_with(&grid, |p| seen.push(p));
            assert_eq!(seen, outcome.trace);
            assert_eq!(outcome, solve(&grid, algorithm));
        }
    }

    #[test]
    fn test_open_grid_is_manhattan() {
        for size in [2, 5, 9] {
            let grid = Grid::empty(size).unwrap();
            let distance = grid.start().manhattan(grid.end());
            for algorithm in Algorithm::ALL.iter().filter(|a| a.is_optimal()) {
                let outcome = solve(&grid, *algorithm);
                assert_eq!(outcome.path_len(), Some(distance), "{}", algorithm);
                assert!(outcome.visited_count <= size * size);
            }
        }
    }

    #[test]
    fn test_five_by_five() {
        let grid = Grid::empty(5).unwrap();
        for algorithm in [Algorithm::Bfs, Algorithm::AStar, Algorithm::Dijkstra] {
            let outcome = solve(&grid, algorithm);
            assert_eq!(outcome.path_len(), Some(8));
            assert!(outcome.visited_count >= 1 && outcome.visited_count <= 25);
        }
    }

    #[test]
    fn test_split_corridor() {
        let mut grid = Grid::new(10, 1, p(0, 0), p(9, 0)).unwrap();
        grid.set_cell(p(5, 0), CellState::Wall).unwrap();

        for algorithm in Algorithm::ALL {
            let outcome = solve(&grid, algorithm);
            assert_eq!(outcome.path, None, "{}", algorithm);
            assert_eq!(outcome.visited_count, 4, "{}", algorithm);
        }
    }

    #[test]
    fn test_sealed_end() {
        let mut grid = Grid::empty(6).unwrap();
        grid.set_end(p(3, 3)).unwrap();
        for n in [p(3, 2), p(4, 3), p(3, 4), p(2, 3)] {
            grid.set_cell(n, CellState::Wall).unwrap();
        }

        for algorithm in Algorithm::ALL {
            let outcome = solve(&grid, algorithm);
            assert_eq!(outcome.path, None, "{}", algorithm);
            assert_eq!(outcome.visited_count, reachable(&grid), "{}", algorithm);
        }
    }

    #[test]
    fn test_properties_over_grid_family() {
        for grid in grid_family() {
            let outcomes: Vec<_> = Algorithm::ALL
                .iter()
                .map(|a| (*a, solve(&grid, *a)))
                .collect();

            let optimal = solve(&grid, Algorithm::Bfs).path_len();

            for (algorithm, outcome) in &outcomes {
                assert_eq!(outcome.visited_count, outcome.trace.len());
                assert!(!outcome.trace.contains(&grid.start()));
                assert_eq!(outcome, &solve(&grid, *algorithm), "not idempotent");

                match (&outcome.path, optimal) {
                    (Some(path), Some(best)) => {
                        assert!(is_contiguous(grid.start(), path), "{}\n{}", algorithm, grid);
                        assert_eq!(path.last(), Some(&grid.end()));
                        assert!(!path.contains(&grid.start()));
                        if algorithm.is_optimal() {
                            assert_eq!(path.len(), best, "{}\n{}", algorithm, grid);
                        } else {
                            assert!(path.len() >= best, "{}\n{}", algorithm, grid);
                        }
                        assert_eq!(outcome.trace.last(), Some(&grid.end()));
                    }
                    (None, None) => {
                        assert_eq!(outcome.visited_count, reachable(&grid));
                    }
                    _ => panic!("{} disagrees with bfs on reachability\n{}", algorithm, grid),
                }
            }
        }
    }

    #[test]
    fn test_dijkstra_explores_at_least_astar() {
        for grid in grid_family() {
            let astar = solve(&grid, Algorithm::AStar);
            let dijkstra = solve(&grid, Algorithm::Dijkstra);
            if astar.path.is_some() {
                assert!(dijkstra.visited_count >= astar.visited_count, "\n{}", grid);
            }
        }
    }
}
