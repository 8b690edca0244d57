use alloc::vec::Vec;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Generation strategy that can optionally try to make the starting tile zero or at least safe, but other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use StartTile::*;

        let total_cells = config.total_cells();
        let size = config.size;

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(size.to_nd_index(), true));
        }

        let start_in_bounds = self.start.0 < size.0 && self.start.1 < size.1;
        let zero_area = NeighborIter::new(self.start, size).count() as CellCount + 1;
        let actual_start_tile = match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if !start_in_bounds => {
                log::warn!("Start tile {:?} is off the board, fallback to random", self.start);
                Random
            }
            SimpleSafe | AlwaysZero if config.mines + 1 > total_cells => {
                log::warn!("Cannot make start tile safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + zero_area > total_cells => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        let mut protected: Array2<bool> = Array2::default(size.to_nd_index());
        match actual_start_tile {
            Random => {}
            SimpleSafe => {
                protected[self.start.to_nd_index()] = true;
            }
            AlwaysZero => {
                protected[self.start.to_nd_index()] = true;
                for coords in NeighborIter::new(self.start, size) {
                    protected[coords.to_nd_index()] = true;
                }
            }
        }

        let mut candidates: Vec<Coord2> = iter_coords(size)
            .filter(|&coords| !protected[coords.to_nd_index()])
            .collect();

        // partial Fisher-Yates, the first `mines` candidates end up holding the mines
        let mines = config.mines as usize;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for placed in 0..mines {
            let pick = rng.random_range(placed..candidates.len());
            candidates.swap(placed, pick);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in &candidates[..mines] {
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new((9, 9), 10);
        let first = RandomMinefieldGenerator::new(7, (0, 0), StartTile::Random).generate(config);
        let second = RandomMinefieldGenerator::new(7, (0, 0), StartTile::Random).generate(config);

        assert_eq!(first, second);
        assert_eq!(first.mine_count(), 10);
    }

    #[test]
    fn always_zero_start_opens_a_region() {
        let config = GameConfig::new((6, 6), 20);
        let layout =
            RandomMinefieldGenerator::new(3, (2, 3), StartTile::AlwaysZero).generate(config);

        assert_eq!(layout.mine_count(), 20);
        assert!(!layout.contains_mine((2, 3)));
        assert_eq!(layout.adjacent_mine_count((2, 3)), 0);
    }

    #[test]
    fn crowded_board_falls_back_to_simple_safe() {
        // 9 cells, 8 mines: only the start cell can stay free
        let config = GameConfig::new((3, 3), 8);
        let layout =
            RandomMinefieldGenerator::new(11, (1, 1), StartTile::AlwaysZero).generate(config);

        assert_eq!(layout.mine_count(), 8);
        assert!(!layout.contains_mine((1, 1)));
    }

    #[test]
    fn full_board_is_all_mines() {
        let config = GameConfig::new((2, 2), 4);
        let layout = RandomMinefieldGenerator::new(0, (0, 0), StartTile::SimpleSafe).generate(config);

        assert_eq!(layout.mine_count(), 4);
        assert_eq!(layout.safe_cell_count(), 0);
    }
}
