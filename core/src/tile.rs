use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor coordinates of a tile: 3 in a corner, 5 along an edge, 8 inside.
pub type Neighbors = SmallVec<[Coord2; 8]>;

/// A single board tile.
///
/// Neighbors are stored as coordinates into the owning [`Board`], so tiles never own each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    coords: Coord2,
    mine: bool,
    open: bool,
    flag: bool,
    adjacent_mines: u8,
    neighbors: Neighbors,
}

impl Tile {
    pub(crate) fn new(coords: Coord2, bounds: Coord2) -> Self {
        Self {
            coords,
            mine: false,
            open: false,
            flag: false,
            adjacent_mines: 0,
            neighbors: iter_neighbors(coords, bounds).collect(),
        }
    }

    pub fn x(&self) -> Coord {
        self.coords.0
    }

    pub fn y(&self) -> Coord {
        self.coords.1
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn has_flag(&self) -> bool {
        self.flag
    }

    /// Number of neighbors holding a mine.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn neighbors(&self) -> &[Coord2] {
        &self.neighbors
    }

    /// A safe tile with no adjacent mines, the seed of an opening.
    pub fn is_zero(&self) -> bool {
        !self.mine && self.adjacent_mines == 0
    }

    /// Clears everything, mine data included.
    pub(crate) fn reset(&mut self) {
        self.restart();
        self.mine = false;
        self.adjacent_mines = 0;
    }

    /// Clears player marks, leaves mine data as is.
    pub(crate) fn restart(&mut self) {
        self.open = false;
        self.flag = false;
    }

    pub(crate) fn set_mine(&mut self, mine: bool) {
        self.mine = mine;
    }

    pub(crate) fn add_adjacent_mine(&mut self) {
        self.adjacent_mines += 1;
    }

    pub(crate) fn remove_adjacent_mine(&mut self) {
        self.adjacent_mines -= 1;
    }

    pub(crate) fn set_open(&mut self) {
        self.open = true;
    }

    /// Toggles the flag of a closed tile, returns whether anything changed.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.flag = !self.flag;
        true
    }
}
