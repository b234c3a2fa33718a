use std::collections::{HashMap, HashSet};

use crate::{
    find::{RunContext, Strategy},
    frontier::OpenSet,
    grid::Point,
};

/// Dijkstra: cells are expanded by increasing distance from the start,
/// without any pull towards the goal.
#[derive(Debug)]
pub struct Dijkstra {
    open: OpenSet,
    dist: HashMap<Point, usize>,
    closed: HashSet<Point>,
}

impl Dijkstra {
    pub fn new(start: Point) -> Self {
        Self {
            open: OpenSet::seeded(start, 0),
            dist: HashMap::from([(start, 0)]),
            closed: HashSet::new(),
        }
    }
}

impl Strategy for Dijkstra {
    fn next(&mut self) -> Option<Point> {
        while let Some(point) = self.open.pop() {
            if self.closed.insert(point) {
                return Some(point);
            }
        }
        None
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        let current_dist = self.dist.get(&current).copied().unwrap_or_default();

        for &n in neighbors {
            if self.closed.contains(&n) {
                continue;
            }

            let tentative = current_dist + 1;
            if self.dist.get(&n).is_some_and(|&d| tentative >= d) {
                continue;
            }

            self.dist.insert(n, tentative);
            run.relax(n, current);
            self.open.push(n, tentative);
        }
    }
}
