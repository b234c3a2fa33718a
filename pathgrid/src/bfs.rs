use std::collections::VecDeque;

use crate::{
    find::{RunContext, Strategy},
    grid::Point,
};

/// Breadth-first search: cells leave the frontier in the order they were
/// discovered, so the first path to reach the goal has the fewest cells.
#[derive(Debug)]
pub struct Bfs {
    queue: VecDeque<Point>,
}

impl Bfs {
    pub fn new(start: Point) -> Self {
        Self {
            queue: VecDeque::from([start]),
        }
    }
}

impl Strategy for Bfs {
    fn next(&mut self) -> Option<Point> {
        self.queue.pop_front()
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        // marking at discovery keeps every cell in the queue at most once
        for &n in neighbors {
            if run.discover(n, current) {
                self.queue.push_back(n);
            }
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{
        find::{Algorithm, PathFinder},
        grid::Grid,
    };

    #[test]
    fn test_layer_order() {
        let grid = Grid::new(3, 3, Point::new(1, 1), Point::new(0, 0)).unwrap();
        let (_, run) = PathFinder::new(grid.start(), grid.end(), Bfs::new(grid.start())).finish(&grid);

        // first ring in up, right, down, left order, then the corners
        assert_eq!(
            &run.trace()[..4],
            &[
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(0, 1)
            ]
        );
        assert_eq!(run.trace()[4..].last(), Some(&Point::new(0, 0)));
    }

    #[test]
    fn test_first_discovery_wins() {
        let grid = Grid::empty(3).unwrap();
        let (_, run) = Algorithm::Bfs.finder(&grid).finish(&grid);

        // (1, 1) is reachable from (1, 0) and (0, 1), (1, 0) is expanded first
        assert_eq!(
            run.predecessors().get(&Point::new(1, 1)),
            Some(&Point::new(1, 0))
        );
        assert_eq!(run.predecessors().get(&grid.start()), None);
    }
}
