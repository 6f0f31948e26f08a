//! Engine for chat-group minigames: a shared mines board and two-player
//! rock-paper-scissors, both kept in a concurrency-safe [`SessionRegistry`].

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use clock::*;
pub use error::*;
pub use generator::*;
pub use registry::*;
pub use rps::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;

mod cell;
mod clock;
mod error;
mod generator;
mod registry;
mod rps;
mod session;
mod snapshot;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    /// The only board used in production: 5×5 with 5 mines.
    pub const STANDARD: Self = Self::new_unchecked(5, 5);

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    /// Every mine must leave at least one safe cell behind.
    pub fn validate(self) -> Result<Self> {
        if self.size == 0 || self.mines >= self.total_cells() {
            Err(GameError::Configuration {
                size: self.size,
                mines: self.mines,
            })
        } else {
            Ok(self)
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Fixed set of mine positions on a square grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    size: Coord,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn from_mine_mask(size: Coord, mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            size,
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout from explicit positions, duplicates collapse into one mine.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(size, mine_mask);
        layout.game_config().validate()?;
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size,
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size && coords.1 < self.size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size).filter(|&coords| self[coords])
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_five_by_five() {
        let config = GameConfig::default();
        assert_eq!(config.size, 5);
        assert_eq!(config.mines, 5);
        assert_eq!(config.safe_cells(), 20);
    }

    #[test]
    fn config_rejects_full_board() {
        assert_eq!(
            GameConfig::new(2, 4),
            Err(GameError::Configuration { size: 2, mines: 4 })
        );
        assert!(GameConfig::new(0, 0).is_err());
        assert!(GameConfig::new(2, 3).is_ok());
    }

    #[test]
    fn from_mine_coords_collapses_duplicates() {
        let layout = MineLayout::from_mine_coords(3, &[(0, 0), (0, 0), (2, 1)]).unwrap();
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert!(layout.contains_mine((2, 1)));
        assert!(!layout.contains_mine((1, 2)));
        assert_eq!(layout.mine_coords().collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            MineLayout::from_mine_coords(2, &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn validate_coords_checks_both_axes() {
        let layout = MineLayout::from_mine_coords(2, &[(0, 0)]).unwrap();
        assert_eq!(layout.validate_coords((1, 1)), Ok((1, 1)));
        assert_eq!(layout.validate_coords((1, 2)), Err(GameError::InvalidCoords));
    }
}
