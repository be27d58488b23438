use ndarray::Array2;

use super::*;

/// Shuffled-index placement: Fisher-Yates the flat cell index list and mine
/// the first `mines` entries. Always places the exact requested count in one
/// pass, so this is the default strategy for new games.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffledMineGenerator {
    seed: u64,
}

impl ShuffledMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for ShuffledMineGenerator {
    fn generate(self, difficulty: &Difficulty) -> Board {
        use rand::prelude::*;

        if let Some(mask) = full_board_mask(difficulty) {
            return Board::from_mine_mask(&mask);
        }

        let total_cells = usize::from(difficulty.total_cells());
        let mut indices: Vec<usize> = (0..total_cells).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let mut mine_mask: Array2<bool> = Array2::default(difficulty.size().to_nd_index());
        {
            let flat = mine_mask
                .as_slice_mut()
                .expect("freshly allocated mask is contiguous");
            for &index in &indices[..usize::from(difficulty.mines)] {
                flat[index] = true;
            }
        }

        Board::from_mine_mask(&mine_mask)
    }
}
