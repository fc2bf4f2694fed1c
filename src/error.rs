use thiserror::Error;

use crate::components::Pos;

/// Reasons a maze layout can be rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,
    #[error("maze row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{what} at {pos} lies outside the maze")]
    OutOfBounds { what: &'static str, pos: Pos },
    #[error("{what} at {pos} is a wall")]
    Blocked { what: &'static str, pos: Pos },
    #[error("maze has no open cell")]
    NoOpenCell,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),
    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
