use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod session;
mod types;

/// Board configuration: dimensions plus the number of mines to place.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl Difficulty {
    /// The named presets selectable by the player.
    pub const PRESETS: &'static [(&'static str, &'static str, Difficulty)] = &[
        ("easy", "Easy", Self::easy()),
        ("medium", "Medium", Self::medium()),
        ("hard", "Hard", Self::hard()),
    ];

    pub const fn easy() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn medium() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn hard() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, mult(rows, cols));
        Self::new_unchecked(rows, cols, mines)
    }

    /// Resolves a preset by its lowercase name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset_name, _, _)| *preset_name == name)
            .map(|&(_, _, difficulty)| difficulty)
            .ok_or_else(|| GameError::UnknownDifficulty(name.to_owned()))
    }

    /// Human-readable preset label, or a `RxC` description for custom boards.
    pub fn label(&self) -> String {
        Self::PRESETS
            .iter()
            .find(|(_, _, difficulty)| difficulty == self)
            .map(|&(_, label, _)| label.to_owned())
            .unwrap_or_else(|| format!("Custom {}x{}", self.rows, self.cols))
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::easy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(Difficulty::from_name("easy").unwrap(), Difficulty::easy());
        assert_eq!(
            Difficulty::from_name("medium").unwrap(),
            Difficulty::medium()
        );
        assert_eq!(Difficulty::from_name("hard").unwrap(), Difficulty::hard());
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            Difficulty::from_name("impossible"),
            Err(GameError::UnknownDifficulty("impossible".to_owned()))
        );
    }

    #[test]
    fn preset_dimensions() {
        let easy = Difficulty::easy();
        assert_eq!((easy.rows, easy.cols, easy.mines), (9, 9, 10));
        assert_eq!(easy.total_cells(), 81);

        let hard = Difficulty::hard();
        assert_eq!((hard.rows, hard.cols, hard.mines), (16, 30, 99));
        assert_eq!(hard.total_cells(), 480);
    }

    #[test]
    fn new_clamps_degenerate_configs() {
        let tiny = Difficulty::new(0, 0, 0);
        assert_eq!((tiny.rows, tiny.cols, tiny.mines), (1, 1, 1));

        let dense = Difficulty::new(4, 4, 100);
        assert_eq!(dense.mines, 16);
    }

    #[test]
    fn labels() {
        assert_eq!(Difficulty::easy().label(), "Easy");
        assert_eq!(Difficulty::new(5, 7, 3).label(), "Custom 5x7");
    }
}
