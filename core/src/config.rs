use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest supported board width or height.
pub const MIN_SIZE: Coord = 5;

/// Largest supported board width or height.
pub const MAX_SIZE: Coord = 64;

/// Smallest supported mine count.
pub const MIN_MINES: CellCount = 5;

/// Tiles that are always left mine-free, enough for a first click and its eight neighbors.
pub const SAFE_MARGIN: CellCount = 10;

/// Standard board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 9x9 board, 10 mines.
    Beginner,
    /// 16x16 board, 40 mines.
    Intermediate,
    /// 30x16 board, 99 mines.
    Expert,
}

impl Difficulty {
    pub const fn config(self) -> BoardConfig {
        match self {
            Self::Beginner => BoardConfig::new_unchecked(9, 9, 10),
            Self::Intermediate => BoardConfig::new_unchecked(16, 16, 40),
            Self::Expert => BoardConfig::new_unchecked(30, 16, 99),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub(crate) const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Clamps every parameter into its supported range.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        let width = width.clamp(MIN_SIZE, MAX_SIZE);
        let height = height.clamp(MIN_SIZE, MAX_SIZE);
        let mines = mines.clamp(MIN_MINES, max_mines(width, height));
        Self::new_unchecked(width, height, mines)
    }

    /// Validates the parameters instead of clamping them.
    pub fn checked(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let size_range = MIN_SIZE..=MAX_SIZE;
        if !size_range.contains(&width) || !size_range.contains(&height) {
            return Err(GameError::InvalidSize(width, height));
        }
        if !(MIN_MINES..=max_mines(width, height)).contains(&mines) {
            return Err(GameError::InvalidMineCount(mines));
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Number of safe tiles, opening all of them wins the game.
    pub const fn win_condition(&self) -> CellCount {
        self.total_tiles() - self.mines
    }
}

impl From<Difficulty> for BoardConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

const fn max_mines(width: Coord, height: Coord) -> CellCount {
    mult(width, height) - SAFE_MARGIN
}
