use crate::{
    find::{RunContext, Strategy},
    grid::Point,
};

/// Depth-first search: the most recently discovered cell is expanded first.
/// Neighbors are pushed up, right, down, left so left is explored first.
#[derive(Debug)]
pub struct Dfs {
    stack: Vec<Point>,
}

impl Dfs {
    pub fn new(start: Point) -> Self {
        Self { stack: vec![start] }
    }
}

impl Strategy for Dfs {
    fn next(&mut self) -> Option<Point> {
        self.stack.pop()
    }

    fn expand(&mut self, current: Point, neighbors: &[Point], run: &mut RunContext) {
        for &n in neighbors {
            if run.discover(n, current) {
                self.stack.push(n);
            }
        }
    }
}
