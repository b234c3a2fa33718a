use std::{collections::HashSet, fmt::Display};

use pathgrid::{CellState, Grid, Point, RunEvent, RunReport};

pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What has been drawn for one panel so far
#[derive(Debug, Default)]
pub struct Canvas {
    visited: HashSet<Point>,
    path: HashSet<Point>,
    current: Option<Point>,
    status: String,
}

impl Canvas {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            status: title.into(),
            ..Default::default()
        }
    }

    /// Update the overlay from a run event. Returns true if something changed.
    pub fn apply(&mut self, event: &RunEvent) -> bool {
        match event {
            RunEvent::Started => false,
            RunEvent::Visited(p) => {
                self.visited.insert(*p);
                self.current = Some(*p);
                true
            }
            RunEvent::Finished(report) => {
                self.current = None;
                self.status = status_line(report);
                true
            }
        }
    }

    pub fn mark_path(&mut self, p: Point) {
        self.path.insert(p);
    }

    pub fn frame<'a>(&'a self, grid: &'a Grid) -> Frame<'a> {
        Frame { grid, canvas: self }
    }
}

pub fn status_line(report: &RunReport) -> String {
    match &report.path {
        Some(_) => format!(
            "{}: path {} cells, {} visited, {}ms",
            report.algorithm, report.path_length, report.visited_count, report.elapsed_ms
        ),
        None => format!(
            "{}: no path found, {} visited, {}ms",
            report.algorithm, report.visited_count, report.elapsed_ms
        ),
    }
}

/// A grid with a canvas drawn on top of it
pub struct Frame<'a> {
    grid: &'a Grid,
    canvas: &'a Canvas,
}

impl Frame<'_> {
    fn symbol(&self, p: Point) -> char {
        if p == self.grid.start() {
            'S'
        } else if p == self.grid.end() {
            'E'
        } else if self.canvas.path.contains(&p) {
            '*'
        } else if self.canvas.current == Some(p) {
            '@'
        } else if self.canvas.visited.contains(&p) {
            '.'
        } else {
            match self.grid.get(p) {
                CellState::Wall => '#',
                CellState::Empty => ' ',
            }
        }
    }

    fn lines(&self) -> Vec<String> {
        let border = format!("+{}+", "-".repeat(self.grid.columns()));
        let mut lines = Vec::with_capacity(self.grid.rows() + 3);
        lines.push(border.clone());
        for y in 0..self.grid.rows() {
            let row: String = (0..self.grid.columns())
                .map(|x| self.symbol(Point::new(x, y)))
                .collect();
            lines.push(format!("|{}|", row));
        }
        lines.push(border);
        lines.push(self.canvas.status.clone());
        lines
    }
}

impl Display for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Render two frames next to each other
pub fn side_by_side(left: &Frame, right: &Frame) -> String {
    let left = left.lines();
    let right = right.lines();
    let width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map(String::as_str).unwrap_or("");
        let r = right.get(i).map(String::as_str).unwrap_or("");
        out.push_str(&format!("{:<width$}   {}\n", l, r, width = width));
    }
    out
}
