use std::fmt::Display;

use thiserror::Error;

use crate::grid::Point;

/// Why a coordinate was refused by the grid
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoordinateIssue {
    /// outside of the grid
    OutOfBounds,
    /// start and end would land on the same cell
    StartIsEnd,
    /// the cell holds the start or end marker and cannot be walled
    Marker,
    /// a marker cannot be placed on a wall
    Wall,
}

impl Display for CoordinateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CoordinateIssue::OutOfBounds => "outside of the grid",
                CoordinateIssue::StartIsEnd => "start and end must differ",
                CoordinateIssue::Marker => "cell holds the start or end marker",
                CoordinateIssue::Wall => "cell is a wall",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid coordinate {point}: {issue}")]
    InvalidCoordinate {
        point: Point,
        issue: CoordinateIssue,
    },

    #[error("a search is already running on this grid")]
    ConcurrentRunRejected,

    #[error("the grid cannot be edited while a search is running")]
    GridLocked,

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn coordinate(point: Point, issue: CoordinateIssue) -> Self {
        Error::InvalidCoordinate { point, issue }
    }
}
