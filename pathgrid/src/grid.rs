use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CoordinateIssue, Error};

/// Side length of the grid used by the visualizer panels
pub const REFERENCE_SIZE: usize = 40;
pub const REFERENCE_START: Point = Point { x: 5, y: 5 };
pub const REFERENCE_END: Point = Point { x: 34, y: 34 };

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Wall,
}

impl Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CellState::Empty => " ",
                CellState::Wall => "X",
            }
        )
    }
}

/// A cell coordinate, `x` is the column and `y` the row
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns true if `other` is one orthogonal step away
    pub fn is_adjacent(&self, other: Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// The order in which neighbors are explored by every algorithm
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];
}

/// A rectangular grid of cells with a start and an end marker
///
/// The markers live next to the cells: a cell holding a marker is always
/// [`CellState::Empty`], and the markers never share a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Vec<CellState>>,
    start: Point,
    end: Point,
}

impl Grid {
    pub fn new(columns: usize, rows: usize, start: Point, end: Point) -> Result<Self, Error> {
        Self::from_cells(vec![vec![CellState::Empty; columns]; rows], start, end)
    }

    /// Square grid of size `n` with the start in the top left corner and the
    /// end in the bottom right corner
    pub fn empty(n: usize) -> Result<Self, Error> {
        let last = n.saturating_sub(1);
        Self::new(n, n, Point::new(0, 0), Point::new(last, last))
    }

    /// The 40x40 grid the visualizer starts with
    pub fn reference() -> Self {
        Self {
            columns: REFERENCE_SIZE,
            rows: REFERENCE_SIZE,
            cells: vec![vec![CellState::Empty; REFERENCE_SIZE]; REFERENCE_SIZE],
            start: REFERENCE_START,
            end: REFERENCE_END,
        }
    }

    /// Build a grid from rows of cells, validating shape and markers
    pub fn from_cells(cells: Vec<Vec<CellState>>, start: Point, end: Point) -> Result<Self, Error> {
        let rows = cells.len();
        let columns = cells.first().map(Vec::len).unwrap_or(0);

        if rows == 0 || columns == 0 {
            return Err(Error::MalformedGrid("grid has no cells".to_string()));
        }
        if let Some(row) = cells.iter().position(|r| r.len() != columns) {
            return Err(Error::MalformedGrid(format!(
                "row {} has {} cells, expected {}",
                row,
                cells[row].len(),
                columns
            )));
        }

        let grid = Self {
            columns,
            rows,
            cells,
            start,
            end,
        };

        for marker in [start, end] {
            if !grid.contains(marker) {
                return Err(Error::coordinate(marker, CoordinateIssue::OutOfBounds));
            }
            if !grid.is_passable(marker) {
                return Err(Error::coordinate(marker, CoordinateIssue::Wall));
            }
        }
        if start == end {
            return Err(Error::coordinate(end, CoordinateIssue::StartIsEnd));
        }

        Ok(grid)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.columns && p.y < self.rows
    }

    /// State of the cell, out of bounds cells read as walls
    pub fn get(&self, p: Point) -> CellState {
        if self.contains(p) {
            self.cells[p.y][p.x]
        } else {
            CellState::Wall
        }
    }

    pub fn is_passable(&self, p: Point) -> bool {
        self.get(p) != CellState::Wall
    }

    /// Set the state of a single cell. Cells holding a marker are refused.
    pub fn set_cell(&mut self, p: Point, state: CellState) -> Result<(), Error> {
        if !self.contains(p) {
            return Err(Error::coordinate(p, CoordinateIssue::OutOfBounds));
        }
        if p == self.start || p == self.end {
            return Err(Error::coordinate(p, CoordinateIssue::Marker));
        }
        self.cells[p.y][p.x] = state;
        Ok(())
    }

    pub fn set_start(&mut self, p: Point) -> Result<(), Error> {
        self.check_marker(p, self.end)?;
        self.start = p;
        Ok(())
    }

    pub fn set_end(&mut self, p: Point) -> Result<(), Error> {
        self.check_marker(p, self.start)?;
        self.end = p;
        Ok(())
    }

    fn check_marker(&self, p: Point, other: Point) -> Result<(), Error> {
        if !self.contains(p) {
            return Err(Error::coordinate(p, CoordinateIssue::OutOfBounds));
        }
        if p == other {
            return Err(Error::coordinate(p, CoordinateIssue::StartIsEnd));
        }
        if !self.is_passable(p) {
            return Err(Error::coordinate(p, CoordinateIssue::Wall));
        }
        Ok(())
    }

    /// Turn every wall back into an empty cell
    pub fn clear_walls(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(CellState::Empty);
        }
    }

    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == CellState::Wall)
            .count()
    }

    /// The cell one step away in the given direction, if inside the grid
    pub fn step(&self, p: Point, direction: Direction) -> Option<Point> {
        let next = match direction {
            Direction::Up => Point::new(p.x, p.y.checked_sub(1)?),
            Direction::Right => Point::new(p.x.checked_add(1)?, p.y),
            Direction::Down => Point::new(p.x, p.y.checked_add(1)?),
            Direction::Left => Point::new(p.x.checked_sub(1)?, p.y),
        };
        self.contains(next).then_some(next)
    }

    /// Passable orthogonal neighbors of `p` in the order up, right, down, left
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);

        for direction in Direction::ALL {
            if let Some(next) = self.step(p, direction) {
                points.push(next);
            }
        }

        // filter to only keep passable cells
        points.retain(|n| self.is_passable(*n));

        points.into_iter()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let p = Point::new(x, y);
                if p == self.start {
                    write!(f, "S")?;
                } else if p == self.end {
                    write!(f, "E")?;
                } else {
                    write!(f, "{}", cell)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Error;

    /// Parses the layout written by `Display`: `X` or `#` for walls, space or
    /// `.` for empty cells, `S` and `E` for the markers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut start = None;
        let mut end = None;

        for (y, line) in s.lines().filter(|l| !l.is_empty()).enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, c) in line.chars().enumerate() {
                let state = match c {
                    'X' | '#' => CellState::Wall,
                    ' ' | '.' => CellState::Empty,
                    'S' | 'E' => {
                        let marker = if c == 'S' { &mut start } else { &mut end };
                        if marker.replace(Point::new(x, y)).is_some() {
                            return Err(Error::MalformedGrid(format!("more than one `{}`", c)));
                        }
                        CellState::Empty
                    }
                    other => {
                        return Err(Error::MalformedGrid(format!(
                            "unexpected character `{}` at {}",
                            other,
                            Point::new(x, y)
                        )))
                    }
                };
                row.push(state);
            }
            cells.push(row);
        }

        let start = start.ok_or_else(|| Error::MalformedGrid("missing start `S`".to_string()))?;
        let end = end.ok_or_else(|| Error::MalformedGrid("missing end `E`".to_string()))?;

        Self::from_cells(cells, start, end)
    }
}
