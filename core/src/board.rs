use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// The tile grid together with its mine layout.
///
/// Every tile's adjacent mine count is kept in sync incrementally whenever a mine is toggled, nothing rescans the
/// grid to recompute it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    tiles: Array2<Tile>,
}

impl Board {
    /// Allocates a mine-free board, failing on a configuration outside the supported ranges.
    pub fn try_new(config: BoardConfig) -> Result<Self> {
        let config = BoardConfig::checked(config.width, config.height, config.mines)?;
        Ok(Self::new(config))
    }

    /// Allocates a mine-free board from an already validated configuration.
    pub(crate) fn new(config: BoardConfig) -> Self {
        let size = config.size();
        let tiles = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            Tile::new((x as Coord, y as Coord), size)
        });
        Self { config, tiles }
    }

    /// Builds a board with mines at exactly `mine_coords`, the mine count is taken from the list.
    pub fn from_mine_coords(width: Coord, height: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mines = CellCount::try_from(mine_coords.len())
            .map_err(|_| GameError::InvalidMineCount(CellCount::MAX))?;
        let config = BoardConfig::checked(width, height, mines)?;

        let mut mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= width || coords.1 >= height {
                log::warn!("Rejected layout, mine at {:?} is out of bounds", coords);
                return Err(GameError::InvalidCoords);
            }
            if core::mem::replace(&mut mask[coords.to_nd_index()], true) {
                log::warn!("Rejected layout, duplicate mine at {:?}", coords);
                return Err(GameError::DuplicateMine(coords));
            }
        }

        let mut board = Self::new(config);
        for &coords in mine_coords {
            board.toggle_mine(coords);
        }
        Ok(board)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn win_condition(&self) -> CellCount {
        self.config.win_condition()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.width() && coords.1 < self.height()
    }

    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        self.tiles.get(coords.to_nd_index())
    }

    /// All tiles, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Flags around `coords`, zero when out of bounds.
    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.tile(coords).map_or(0, |tile| {
            tile.neighbors()
                .iter()
                .filter(|&&pos| self[pos].has_flag())
                .count() as u8
        })
    }

    /// Whether a chord at `coords` would do anything: an open number whose flagged neighbor count matches it.
    pub fn is_chordable(&self, coords: Coord2) -> bool {
        let Some(tile) = self.tile(coords) else {
            return false;
        };
        tile.is_open()
            && tile.adjacent_mines() > 0
            && tile.adjacent_mines() == self.count_flagged_neighbors(coords)
    }

    /// Number of connected regions of zero tiles, each can be cleared by a single click.
    pub fn count_openings(&self) -> CellCount {
        let mut visited: Array2<bool> = Array2::default(self.size().to_nd_index());
        let mut to_visit = VecDeque::new();
        let mut openings = 0;

        for tile in self.tiles.iter().filter(|tile| tile.is_zero()) {
            if visited[tile.coords().to_nd_index()] {
                continue;
            }
            openings += 1;
            visited[tile.coords().to_nd_index()] = true;
            to_visit.push_back(tile.coords());

            while let Some(coords) = to_visit.pop_front() {
                for &pos in self[coords].neighbors() {
                    if self[pos].is_zero() && !visited[pos.to_nd_index()] {
                        visited[pos.to_nd_index()] = true;
                        to_visit.push_back(pos);
                    }
                }
            }
        }

        openings
    }

    /// Bechtel's Board Benchmark Value: openings plus numbers that no opening uncovers.
    pub fn count_3bv(&self) -> CellCount {
        let isolated = self
            .tiles
            .iter()
            .filter(|tile| !tile.is_mine() && tile.adjacent_mines() > 0)
            .filter(|tile| !tile.neighbors().iter().any(|&pos| self[pos].is_zero()))
            .count() as CellCount;
        self.count_openings() + isolated
    }

    /// Clears every tile, mines included.
    pub(crate) fn reset(&mut self) {
        self.tiles.iter_mut().for_each(Tile::reset);
    }

    /// Clears open and flag marks, the mine layout stays.
    pub(crate) fn restart(&mut self) {
        self.tiles.iter_mut().for_each(Tile::restart);
    }

    /// Randomly places `count` mines on tiles that are not mined and not in `excluded`.
    pub(crate) fn place_mines(&mut self, rng: &mut SmallRng, count: CellCount, excluded: &[Coord2]) {
        let (width, height) = self.size();
        let mut remaining = count;
        while remaining > 0 {
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            if self[coords].is_mine() || excluded.contains(&coords) {
                continue;
            }
            self.toggle_mine(coords);
            remaining -= 1;
        }
    }

    /// Moves every mine on `center` or around it elsewhere, returns how many were moved.
    pub(crate) fn relocate_mines(&mut self, center: Coord2, rng: &mut SmallRng) -> CellCount {
        let mut protected: Neighbors = self[center].neighbors().iter().copied().collect();
        protected.push(center);

        let mut moved = 0;
        for &coords in &protected {
            if self[coords].is_mine() {
                self.toggle_mine(coords);
                moved += 1;
            }
        }

        self.place_mines(rng, moved, &protected);
        moved
    }

    pub(crate) fn toggle_mine(&mut self, coords: Coord2) {
        let tile = self.tile_mut(coords);
        let mine = !tile.is_mine();
        tile.set_mine(mine);

        let neighbors: Neighbors = tile.neighbors().into();
        for pos in neighbors {
            let neighbor = self.tile_mut(pos);
            if mine {
                neighbor.add_adjacent_mine();
            } else {
                neighbor.remove_adjacent_mine();
            }
        }
    }

    /// Opens a closed, unflagged tile and floods through zero tiles.
    pub(crate) fn open(&mut self, coords: Coord2) -> OpenResult {
        let tile = self.tile_mut(coords);
        if tile.is_open() || tile.has_flag() {
            return OpenResult::NONE;
        }

        tile.set_open();
        if tile.is_mine() {
            log::debug!("Mine revealed at {:?}", coords);
            return OpenResult::MINE;
        }

        let mut opened = 1;
        if tile.adjacent_mines() == 0 {
            let mut to_visit: Vec<Coord2> = tile.neighbors().to_vec();
            log::trace!("Starting flood-fill from {:?}", coords);

            while let Some(visit_coords) = to_visit.pop() {
                let tile = self.tile_mut(visit_coords);
                if tile.is_open() || tile.has_flag() {
                    continue;
                }

                // neighbors of a zero are never mines
                debug_assert!(!tile.is_mine());
                tile.set_open();
                opened += 1;
                log::trace!(
                    "Flood opened tile at {:?}, mine count: {}",
                    visit_coords,
                    tile.adjacent_mines()
                );

                if tile.adjacent_mines() == 0 {
                    to_visit.extend_from_slice(tile.neighbors());
                }
            }
        }

        OpenResult::opened(opened)
    }

    /// Opens every neighbor of a satisfied number, stopping at the first mine.
    pub(crate) fn chord(&mut self, coords: Coord2) -> OpenResult {
        if !self.is_chordable(coords) {
            return OpenResult::NONE;
        }

        let neighbors: Neighbors = self[coords].neighbors().iter().copied().collect();
        let mut result = OpenResult::NONE;
        for pos in neighbors {
            result = result | self.open(pos);
            if result.hit_mine {
                break;
            }
        }
        result
    }

    pub(crate) fn flag(&mut self, coords: Coord2) -> bool {
        self.tile_mut(coords).toggle_flag()
    }

    /// Opens the whole board at once, returns the last open mine in scan order.
    pub(crate) fn reveal_all(&mut self) -> Option<Coord2> {
        let mut losing_tile = None;
        for tile in self.tiles.iter_mut() {
            if tile.is_open() && tile.is_mine() {
                losing_tile = Some(tile.coords());
            }
            tile.set_open();
        }
        losing_tile
    }

    fn tile_mut(&mut self, coords: Coord2) -> &mut Tile {
        &mut self.tiles[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
