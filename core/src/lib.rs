#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use stopwatch::*;
pub use tile::*;
pub use types::*;

mod board;
mod config;
mod engine;
mod error;
mod event;
mod stopwatch;
mod tile;
mod types;

/// Outcome of an open or chord.
///
/// `opened` counts the safe tiles newly opened, `hit_mine` tells whether a mine was revealed, in which case the game
/// is lost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    pub opened: CellCount,
    pub hit_mine: bool,
}

impl OpenResult {
    /// Nothing happened.
    pub const NONE: Self = Self {
        opened: 0,
        hit_mine: false,
    };

    /// A mine was revealed and nothing else opened.
    pub const MINE: Self = Self {
        opened: 0,
        hit_mine: true,
    };

    pub const fn opened(opened: CellCount) -> Self {
        Self {
            opened,
            hit_mine: false,
        }
    }

    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        self.opened > 0 || self.hit_mine
    }
}

/// Used to merge outcomes when opening several tiles
impl BitOr for OpenResult {
    type Output = OpenResult;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            opened: self.opened + rhs.opened,
            hit_mine: self.hit_mine || rhs.hit_mine,
        }
    }
}
