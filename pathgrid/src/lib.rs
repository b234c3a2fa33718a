//! Step-by-step pathfinding on a grid of walls and empty cells.
//!
//! A [`Grid`] holds the cells together with a start and an end marker. Five
//! strategies search it: breadth-first, depth-first, A*, Dijkstra and greedy
//! best-first. Every search is driven by a [`PathFinder`] that performs one
//! expansion per [`PathFinder::step`], so a front-end can draw each visited
//! cell before asking for the next one.
//!
//! The [`graph`] module answers shortest path queries on weighted graphs
//! given as adjacency maps, independently of any grid.
//!
//! ```
//! use pathgrid::{solve, Algorithm, Grid};
//!
//! let grid = Grid::empty(5).unwrap();
//! let outcome = solve(&grid, Algorithm::AStar);
//! assert_eq!(outcome.path.unwrap().len(), 8);
//! ```

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod error;
pub mod find;
mod frontier;
pub mod graph;
pub mod greedy;
pub mod grid;
pub mod panel;
pub mod path;
pub mod util;

pub use error::{CoordinateIssue, Error};
pub use find::{solve, Algorithm, Outcome, PathFinder, PathResult, RunContext, SearchState, Strategy};
pub use graph::{GraphAlgorithm, GraphRequest, WeightedGraph};
pub use grid::{CellState, Direction, Grid, Point};
pub use panel::{Comparison, Panel, RunEvent, RunReport};
pub use path::reconstruct;
