use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The rows x cols cell matrix, with mines placed and neighbor counts
/// precomputed before any play happens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds a board from a mine mask, counting the mines actually present.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mut cells: Array2<Cell> = Array2::default(mine_mask.dim());
        let mut mine_count: CellCount = 0;

        for (index, &is_mine) in mine_mask.indexed_iter() {
            if is_mine {
                cells[index].is_mine = true;
                mine_count += 1;
            }
        }

        let mut board = Self { cells, mine_count };
        board.compute_neighbor_counts();
        board
    }

    /// Deterministic construction from explicit mine positions, mostly for tests.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    fn compute_neighbor_counts(&mut self) {
        let size = self.size();
        for row in 0..size.0 {
            for col in 0..size.1 {
                let coords = (row, col);
                if !self[coords].is_mine {
                    self.cells[coords.to_nd_index()].neighbor_mines =
                        self.adjacent_mine_count(coords);
                }
            }
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    /// Mines actually placed, which may be fewer than the difficulty asked for
    /// when generation degraded.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count()
            .try_into()
            .unwrap()
    }

    /// In-bounds cells of the 3x3 block around `center`, center excluded.
    pub fn iter_neighbors(&self, center: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        let row_range = center.0.saturating_sub(1)..=(center.0 + 1).min(rows - 1);
        let col_range = center.1.saturating_sub(1)..=(center.1 + 1).min(cols - 1);
        row_range
            .flat_map(move |row| col_range.clone().map(move |col| (row, col)))
            .filter(move |&pos| pos != center)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl std::ops::Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
