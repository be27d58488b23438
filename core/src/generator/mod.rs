use crate::*;
use ndarray::Array2;

pub use random::*;
pub use shuffled::*;

mod random;
mod shuffled;

/// Mine placement strategy, consumed to build one board.
pub trait MineGenerator {
    fn generate(self, difficulty: &Difficulty) -> Board;
}

/// Shared short-circuit for configurations that want every cell mined.
fn full_board_mask(difficulty: &Difficulty) -> Option<Array2<bool>> {
    let total_cells = difficulty.total_cells();
    if difficulty.mines < total_cells {
        return None;
    }

    if difficulty.mines > total_cells {
        log::warn!(
            "requested {} mines but the board only holds {}, filling it",
            difficulty.mines,
            total_cells
        );
    }
    Some(Array2::from_elem(difficulty.size().to_nd_index(), true))
}
