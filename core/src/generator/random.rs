use ndarray::Array2;

use super::*;

/// Uniform layout: every set of `mines` distinct cells is equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineLayoutGenerator {
    seed: u64,
}

impl RandomMineLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeded from the thread-local generator, for live sessions.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl MineLayoutGenerator for RandomMineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let config = config.validate()?;
        let size = config.size;

        let mut mines: Array2<bool> = Array2::default((size, size).to_nd_index());
        let mut free_cells = config.total_cells();
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            // row-major walk over the grid, skipping cells that already hold a mine
            let mut cells: Vec<&mut bool> = mines.iter_mut().collect();
            while mines_placed < config.mines {
                if free_cells == 0 {
                    break;
                }
                let mut place: CellCount = rng.random_range(0..free_cells);
                for cell in cells.iter_mut() {
                    if **cell {
                        continue;
                    }
                    if place == 0 {
                        **cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                    place -= 1;
                }
            }
        }

        let layout = MineLayout::from_mine_mask(size, mines);

        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        Ok(layout)
    }
}
