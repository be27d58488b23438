use serde::{Deserialize, Serialize};

/// Full per-cell record kept by the engine, mutated in place during one game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Number of mines among the at most 8 adjacent cells, always 0 for mine cells.
    pub neighbor_mines: u8,
}

/// What a renderer should draw for a cell, derived from [`Cell`] plus game context.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
    /// The revealed mine that ended the game.
    Exploded,
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
