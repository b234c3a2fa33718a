use std::collections::HashSet;

use crate::{
    find::{RunContext, Strategy},
    frontier::OpenSet,
    grid::Point,
};

/// Greedy best-first: always expands the open cell closest to the goal by
/// Manhattan distance, ignoring how far it is from the start.
///
/// Cells are closed when they are expanded, like in A*. Without a cost there
/// is nothing to improve, so the predecessor of a cell stays the one it was
/// first discovered from.
#[derive(Debug)]
pub struct Greedy {
    goal: Point,
    open: OpenSet,
    closed: HashSet<Point>,
}

impl Greedy {
    pub fn new(start: Point, goal: Point) -> Self {
        Self {
            goal,
            open: OpenSet::seeded(start, start.manhattan(goal)),
            closed: HashSet::new(),
        }
    }
}

impl Strategy for Greedy {
    fn next(&mut self) -> Option<Point> {
        while let Some(point) = self.open.pop() {
            if self.closed.insert(point) {
                return Some(point);
            }
        }
        None
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        for &n in neighbors {
            if self.closed.contains(&n) {
                continue;
            }
            run.discover(n, current);
            self.open.push(n, n.manhattan(self.goal));
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{
        find::{solve, Algorithm},
        grid::{CellState, Grid},
    };

    /// A pocket opening towards the goal that only connects to it around the back
    fn create_trap_map() -> Grid {
        "XXXXXXXXX\n\
         X       X\n\
         X XXXXX X\n\
         X    SX X\n\
         X XXXXX X\n\
         X      EX\n\
         XXXXXXXXX\n"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_heads_for_goal() {
        let grid = Grid::new(9, 9, Point::new(0, 0), Point::new(8, 8)).unwrap();
        let outcome = solve(&grid, Algorithm::Greedy);

        // no walls, every step gets closer
        assert_eq!(outcome.visited_count, 16);
        assert_eq!(outcome.path_len(), Some(16));
    }

    #[test]
    fn test_not_optimal_but_finds_route() {
        let grid = create_trap_map();
        let greedy = solve(&grid, Algorithm::Greedy);
        let bfs = solve(&grid, Algorithm::Bfs);

        let greedy_len = greedy.path_len().unwrap();
        let bfs_len = bfs.path_len().unwrap();
        assert!(greedy_len >= bfs_len);
    }

    #[test]
    fn test_terminates_when_sealed() {
        let mut grid = create_trap_map();
        grid.set_cell(Point::new(1, 3), CellState::Wall).unwrap();

        let outcome = solve(&grid, Algorithm::Greedy);
        assert_eq!(outcome.path, None);
        assert_eq!(outcome.visited_count, 3);
    }
}
