#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use protocol::*;
pub use session::*;
pub use solver::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod protocol;
mod session;
mod solver;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, columns): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let columns = columns.clamp(1, Coord::MAX);
        let mines = mines.min(mult(rows, columns));
        Self::new_unchecked((rows, columns), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Ground truth of a game: where the mines are and how many touch each safe cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent_mines: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);

        let mut adjacent_mines = Array2::zeros(mine_mask.dim());
        for coords in iter_coords(array_size(&mine_mask)) {
            if mine_mask[coords.to_nd_index()] {
                continue;
            }
            // at most 8 neighbors, always fits
            adjacent_mines[coords.to_nd_index()] = mine_mask
                .iter_neighbor_cells(coords)
                .filter(|&is_mine| is_mine)
                .count() as u8;
        }

        Self {
            mine_mask,
            adjacent_mines,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    /// Builds a layout from a row-major list of `rows * columns` mine flags.
    pub fn from_row_major(size: Coord2, cells: alloc::vec::Vec<bool>) -> Result<Self> {
        let mine_mask = Array2::from_shape_vec(size.to_nd_index(), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn contains_coords(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains_coords(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.mine_mask)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, columns) = self.size();
        mult(rows, columns)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mines among the up to 8 neighbors, only meaningful for safe cells.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent_mines[coords.to_nd_index()]
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Marked,
    /// The marked cell had no mine, which ends the game.
    Mismarked,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Marked => true,
            Self::Mismarked => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn adjacency_counts_skip_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 1), (2, 2)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((1, 2)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
    }

    #[test]
    fn row_major_rejects_wrong_cell_count() {
        assert_eq!(
            MineLayout::from_row_major((2, 2), vec![false; 3]),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn mine_coords_out_of_bounds_are_rejected() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn game_config_clamps_mines_to_board() {
        let config = GameConfig::new((0, 3), 10);
        assert_eq!(config.size, (1, 3));
        assert_eq!(config.mines, 3);
    }

    #[test]
    fn reveal_outcomes_prefer_terminal_states() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(NoChange | Won, Won);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
