use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size {0}x{1} is outside the supported range")]
    InvalidSize(Coord, Coord),
    #[error("Mine count {0} is outside the supported range for this board")]
    InvalidMineCount(CellCount),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Mine listed twice at {0:?}")]
    DuplicateMine(Coord2),
}

pub type Result<T> = core::result::Result<T, GameError>;
