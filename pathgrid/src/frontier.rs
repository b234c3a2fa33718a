use std::{cmp::Ordering, collections::BinaryHeap};

use crate::grid::Point;

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<T> {
    key: usize,
    // insertion counter, equal keys leave in the order they were pushed
    seq: usize,
    item: T,
}

impl<T> Ord for ToVisit<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then(self.seq.cmp(&other.seq))
            .reverse() // reverse for BinaryHeap to be a min-heap
    }
}

impl<T> PartialOrd for ToVisit<T> {
    fn partial_cmp(&self, other: &ToVisit<T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for ToVisit<T> {
    fn eq(&self, other: &ToVisit<T>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for ToVisit<T> {}

/// Min-priority open set. Duplicate entries for an item are allowed, the
/// searches skip stale ones when they come out.
#[derive(Debug)]
pub(crate) struct OpenSet<T = Point> {
    heap: BinaryHeap<ToVisit<T>>,
    pushed: usize,
}

impl<T> Default for OpenSet<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }
}

impl<T> OpenSet<T> {
    pub(crate) fn seeded(item: T, key: usize) -> Self {
        let mut open = Self::default();
        open.push(item, key);
        open
    }

    pub(crate) fn push(&mut self, item: T, key: usize) {
        self.heap.push(ToVisit {
            key,
            seq: self.pushed,
            item,
        });
        self.pushed += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|v| v.item)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_min_key_first() {
        let mut open = OpenSet::seeded(Point::new(0, 0), 5);
        open.push(Point::new(1, 0), 2);
        open.push(Point::new(2, 0), 9);

        assert_eq!(open.pop(), Some(Point::new(1, 0)));
        assert_eq!(open.pop(), Some(Point::new(0, 0)));
        assert_eq!(open.pop(), Some(Point::new(2, 0)));
        assert_eq!(open.pop(), None);
    }

    #[test]
    fn test_equal_keys_in_insertion_order() {
        let mut open: OpenSet = OpenSet::default();
        for x in 0..6 {
            open.push(Point::new(x, 0), 3);
        }
        open.push(Point::new(9, 9), 1);
        assert_eq!(open.len(), 7);

        assert_eq!(open.pop(), Some(Point::new(9, 9)));
        for x in 0..6 {
            assert_eq!(open.pop(), Some(Point::new(x, 0)));
        }
    }
}
