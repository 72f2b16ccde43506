//! Minesweeper as a step-based simulation environment.
//!
//! [`MinesweeperEnv`] is the entry point: `reset`, then `step` with flat cell indices, and
//! `render` to look at the board. The game state itself lives in [`BoardEngine`].

use std::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use env::*;
pub use error::*;
pub use generator::*;
pub use invariants::*;
pub use observation::*;
pub use preset::*;
pub use render::*;
pub use reward::*;
pub use tile::*;
pub use types::*;

mod engine;
mod env;
mod error;
mod generator;
mod invariants;
mod observation;
mod preset;
mod render;
mod reward;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mine_count: CellCount) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    /// Builds a playable board shape: both dimensions positive and at least one safe cell.
    pub fn new(width: Coord, height: Coord, mine_count: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mine_count);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GymError::InvalidConfiguration(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mine_count >= self.total_cells() {
            return Err(GymError::InvalidConfiguration(format!(
                "mine count {} must be below the {} cells of a {}x{} board",
                self.mine_count,
                self.total_cells(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GymError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn board_config(&self) -> BoardConfig {
        let (width, height) = self.size();
        BoardConfig::new_unchecked(width, height, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GymError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.mine_mask.dim();
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn mine_mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn to_int_grid(&self) -> Array2<u8> {
        self.mine_mask.mapv(u8::from)
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.mine_mask[(x as usize, y as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_config_rejects_degenerate_shapes() {
        assert!(BoardConfig::new(8, 8, 10).is_ok());
        assert!(BoardConfig::new(3, 2, 0).is_ok());
        assert!(matches!(
            BoardConfig::new(0, 8, 1),
            Err(GymError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BoardConfig::new(2, 2, 4),
            Err(GymError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn adjacent_mine_count_skips_out_of_bounds() {
        let layout = MineLayout::from_mine_coords((3, 2), &[(1, 1)]).unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 5);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 0);
    }

    #[test]
    fn adjacent_mine_count_reaches_eight() {
        let mines: Vec<Coord2> = NeighborIter::new((1, 1), (3, 3)).collect();
        let layout = MineLayout::from_mine_coords((3, 3), &mines).unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 8);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GymError::InvalidCoords)
        );
    }

    #[test]
    fn int_grid_matches_mask() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 1)]).unwrap();
        let grid = layout.to_int_grid();

        assert_eq!(grid[(0, 1)], 1);
        assert_eq!(grid.sum(), 1);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), vec![(0, 1)]);
    }
}
