use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::Deserialize;

use crate::{
    error::Error,
    grid::{CellState, Grid, Point},
};

/// Threshold a maze image into a grid: dark pixels become walls
pub fn parse_img(img: &DynamicImage, start: Point, end: Point) -> Result<Grid, Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut cells = vec![vec![CellState::Empty; width]; height];

    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            let p = img.get_pixel(col as u32, row as u32);

            *cell = if p.0[0] < 128 {
                CellState::Wall
            } else {
                CellState::Empty
            }
        }
    }

    clear_markers(&mut cells, start, end);
    Grid::from_cells(cells, start, end)
}

pub fn load_img(path: impl AsRef<Path>, start: Point, end: Point) -> Result<Grid, Error> {
    let img = image::open(path)?;
    parse_img(&img, start, end)
}

/// Body returned by the maze generation service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeResponse {
    /// Rows of cells, `0` is a passage and `1` a wall
    pub maze: Vec<Vec<u8>>,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub execution_time: u64,
}

impl MazeResponse {
    /// Convert the generated maze into a grid. The start and end cells are
    /// carved out whatever the generator put there.
    pub fn into_grid(self, start: Point, end: Point) -> Result<Grid, Error> {
        let mut cells = Vec::with_capacity(self.maze.len());
        for (y, row) in self.maze.into_iter().enumerate() {
            let row = row
                .into_iter()
                .enumerate()
                .map(|(x, value)| match value {
                    1 => Ok(CellState::Wall),
                    // 2 and 3 mark start and end in the wire format
                    0 | 2 | 3 => Ok(CellState::Empty),
                    other => Err(Error::MalformedGrid(format!(
                        "unexpected cell value {} at {}",
                        other,
                        Point::new(x, y)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(row);
        }

        clear_markers(&mut cells, start, end);
        Grid::from_cells(cells, start, end)
    }
}

fn clear_markers(cells: &mut [Vec<CellState>], start: Point, end: Point) {
    for p in [start, end] {
        if let Some(cell) = cells.get_mut(p.y).and_then(|row| row.get_mut(p.x)) {
            *cell = CellState::Empty;
        }
    }
}
