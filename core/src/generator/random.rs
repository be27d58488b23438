use ndarray::Array2;

use super::*;

/// Rejection-sampling placement: draw uniform positions and keep the fresh
/// ones, giving up after `2 * rows * cols` attempts so a bad configuration can
/// never hang generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, difficulty: &Difficulty) -> Board {
        use rand::prelude::*;

        if let Some(mask) = full_board_mask(difficulty) {
            return Board::from_mine_mask(&mask);
        }

        let mut mine_mask: Array2<bool> = Array2::default(difficulty.size().to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let max_attempts = u32::from(difficulty.total_cells()) * 2;
        let mut mines_placed: CellCount = 0;
        let mut attempts: u32 = 0;

        while mines_placed < difficulty.mines && attempts < max_attempts {
            let row: Coord = rng.random_range(0..difficulty.rows);
            let col: Coord = rng.random_range(0..difficulty.cols);
            attempts += 1;

            let cell = &mut mine_mask[(row, col).to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }

        if mines_placed < difficulty.mines {
            log::warn!(
                "Attempt budget exhausted, placed {} of {} mines",
                mines_placed,
                difficulty.mines
            );
        }

        Board::from_mine_mask(&mine_mask)
    }
}
