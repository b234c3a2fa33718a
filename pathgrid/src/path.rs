use std::collections::HashMap;

use crate::grid::Point;

/// Walk the predecessor links back from `goal` and return the path in
/// start-to-goal order.
///
/// The start cell is the one without a predecessor entry and is not part of
/// the returned path. A goal that was never discovered yields an empty path.
pub fn reconstruct(predecessors: &HashMap<Point, Point>, goal: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut current = goal;

    while let Some(&from) = predecessors.get(&current) {
        path.push(current);
        current = from;

        // links always point at cells discovered earlier, so a chain longer
        // than the map can only come from a corrupted map
        if path.len() > predecessors.len() {
            log::warn!("predecessor chain from {} does not terminate", goal);
            return Vec::new();
        }
    }

    path.reverse();
    path
}

/// Returns true if `path` is a chain of orthogonal steps leading away from `start`
pub fn is_contiguous(start: Point, path: &[Point]) -> bool {
    let mut previous = start;
    for &p in path {
        if !previous.is_adjacent(p) {
            return false;
        }
        previous = p;
    }
    true
}

#[cfg(test)]
mod test {

    use super::*;

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_reconstruct_chain() {
        let predecessors = HashMap::from([
            (p(1, 0), p(0, 0)),
            (p(1, 1), p(1, 0)),
            (p(2, 1), p(1, 1)),
            // a branch that is not on the path
            (p(0, 1), p(0, 0)),
        ]);

        let path = reconstruct(&predecessors, p(2, 1));
        assert_eq!(path, vec![p(1, 0), p(1, 1), p(2, 1)]);
        assert!(is_contiguous(p(0, 0), &path));
    }

    #[test]
    fn test_reconstruct_undiscovered_goal() {
        let predecessors = HashMap::from([(p(1, 0), p(0, 0))]);
        assert!(reconstruct(&predecessors, p(5, 5)).is_empty());
    }

    #[test]
    fn test_reconstruct_cycle_is_rejected() {
        let predecessors = HashMap::from([(p(1, 0), p(2, 0)), (p(2, 0), p(1, 0))]);
        assert!(reconstruct(&predecessors, p(1, 0)).is_empty());
    }

    #[test]
    fn test_contiguous() {
        assert!(is_contiguous(p(0, 0), &[]));
        assert!(is_contiguous(p(0, 0), &[p(0, 1), p(1, 1)]));
        assert!(!is_contiguous(p(0, 0), &[p(1, 1)]));
        assert!(!is_contiguous(p(0, 0), &[p(0, 1), p(0, 3)]));
    }
}
