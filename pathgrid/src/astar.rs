use std::collections::{HashMap, HashSet};

use log::trace;

use crate::{
    find::{RunContext, Strategy},
    frontier::OpenSet,
    grid::Point,
};

/// A* ordered by `f = g + h` with the Manhattan distance to the goal as `h`.
///
/// The heuristic never overestimates on a 4-connected unit cost grid, so the
/// first time the goal leaves the open set its path is a shortest one.
#[derive(Debug)]
pub struct AStar {
    goal: Point,
    open: OpenSet,
    g: HashMap<Point, usize>,
    closed: HashSet<Point>,
}

impl AStar {
    pub fn new(start: Point, goal: Point) -> Self {
        Self {
            goal,
            open: OpenSet::seeded(start, start.manhattan(goal)),
            g: HashMap::from([(start, 0)]),
            closed: HashSet::new(),
        }
    }
}

impl Strategy for AStar {
    fn next(&mut self) -> Option<Point> {
        while let Some(point) = self.open.pop() {
            // stale entry left behind by a later improvement
            if self.closed.insert(point) {
                return Some(point);
            }
        }
        None
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        let current_g = self.g.get(&current).copied().unwrap_or_default();

        for &n in neighbors {
            if self.closed.contains(&n) {
                continue;
            }

            let tentative_g = current_g + 1;
            if self.g.get(&n).is_some_and(|&g| tentative_g >= g) {
                continue;
            }

            self.g.insert(n, tentative_g);
            run.relax(n, current);
            self.open.push(n, tentative_g + n.manhattan(self.goal));
        }

        trace!("a*: {} open entries after {}", self.open.len(), current);
    }
}
