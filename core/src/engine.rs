use std::collections::{HashSet, VecDeque};

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing (first effective reveal)
/// - Playing -> Won
/// - Playing -> Lost
///
/// Won and Lost are terminal until a fresh game replaces this one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Indicates the game has ended and no moves can be made anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ready
    }
}

/// Outcome of a single reveal or flag call.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
    Flagged,
    Unflagged,
}

impl Outcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        use Outcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
            Flagged => true,
            Unflagged => true,
        }
    }
}

/// One cell whose visual state changed, with what it should now display.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub view: CellView,
}

/// Counter snapshot shipped with every update so renderers never rescan.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub revealed: CellCount,
    pub flagged: CellCount,
    pub total_mines: CellCount,
    /// Clamped at zero when over-flagged; advisory only.
    pub remaining_mines: CellCount,
}

/// Everything a caller needs to re-render after one mutating call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub outcome: Outcome,
    pub status: GameStatus,
    pub changed: Vec<CellChange>,
    pub counts: Counts,
}

/// Represents a game from start to finish.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    difficulty: Difficulty,
    board: Board,
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    exploded: Option<Coord2>,
}

impl Game {
    pub fn new(difficulty: Difficulty, board: Board) -> Self {
        Self {
            difficulty,
            board,
            revealed_count: 0,
            flagged_count: 0,
            status: Default::default(),
            started_at: None,
            ended_at: None,
            exploded: None,
        }
    }

    pub fn generate(difficulty: Difficulty, generator: impl MineGenerator) -> Self {
        Self::new(difficulty, generator.generate(&difficulty))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Mines actually on the board; the win target derives from this, not from
    /// the difficulty, so a degraded generation stays winnable.
    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet, clamped at zero when the
    /// player over-flags.
    pub fn remaining_mines(&self) -> CellCount {
        self.board.mine_count().saturating_sub(self.flagged_count)
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    /// The mine that ended the game, if it ended in a loss.
    pub fn exploded(&self) -> Option<Coord2> {
        self.exploded
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// How many seconds have passed since the game started, 0 if it hasn't
    /// started, frozen at the end time once it's over.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    pub fn counts(&self) -> Counts {
        Counts {
            revealed: self.revealed_count,
            flagged: self.flagged_count,
            total_mines: self.board.mine_count(),
            remaining_mines: self.remaining_mines(),
        }
    }

    /// What a renderer should draw at `coords` right now.
    pub fn view_at(&self, coords: Coord2) -> CellView {
        let cell = self.board[coords];
        if cell.is_flagged {
            CellView::Flagged
        } else if cell.is_revealed {
            if cell.is_mine {
                if self.exploded == Some(coords) {
                    CellView::Exploded
                } else {
                    CellView::Mine
                }
            } else {
                CellView::Open(cell.neighbor_mines)
            }
        } else {
            CellView::Hidden
        }
    }

    /// Reveal a cell, cascading through zero-neighbor regions and settling the
    /// win or loss that results.
    ///
    /// Revealed and flagged cells, and any call on a finished game, are silent
    /// no-ops. Out-of-bounds coordinates are the caller's bug and surface as
    /// an error without touching state.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Update> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(self.no_change());
        }

        let cell = self.board[coords];
        if cell.is_revealed || cell.is_flagged {
            return Ok(self.no_change());
        }

        self.mark_started();

        let mut changed = Vec::new();
        let outcome = if cell.is_mine {
            self.explode(coords, &mut changed);
            Outcome::HitMine
        } else {
            self.open_cell(coords, &mut changed);

            if self.revealed_count == self.board.safe_cell_count() {
                self.finish_won(&mut changed);
                Outcome::Won
            } else {
                Outcome::Revealed
            }
        };

        Ok(self.update(outcome, changed))
    }

    /// Flip the flag on an unrevealed cell. Never starts the clock and never
    /// ends the game.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<Update> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(self.no_change());
        }

        let cell = self.board[coords];
        if cell.is_revealed {
            return Ok(self.no_change());
        }

        let (outcome, view) = if cell.is_flagged {
            self.board.cell_mut(coords).is_flagged = false;
            self.flagged_count -= 1;
            (Outcome::Unflagged, CellView::Hidden)
        } else {
            self.board.cell_mut(coords).is_flagged = true;
            self.flagged_count += 1;
            (Outcome::Flagged, CellView::Flagged)
        };

        Ok(self.update(outcome, vec![CellChange { coords, view }]))
    }

    /// Marks one cell revealed and flood-fills when it has no adjacent mines.
    ///
    /// The queue is bounded by the cell count: a cell enters it at most once
    /// past the visited set, and only zero-count cells enqueue neighbors. A
    /// cell adjacent to a zero-count cell is never a mine, so the cascade
    /// cannot explode.
    fn open_cell(&mut self, coords: Coord2, changed: &mut Vec<CellChange>) {
        let count = self.board[coords].neighbor_mines;
        self.reveal_cell(coords, CellView::Open(count), changed);
        log::debug!("revealed {:?} with {} adjacent mines", coords, count);

        if count != 0 {
            return;
        }

        let mut visited = HashSet::from([coords]);
        let mut to_visit: VecDeque<_> = self
            .board
            .iter_neighbors(coords)
            .filter(|&pos| {
                let cell = self.board[pos];
                !cell.is_revealed && !cell.is_flagged
            })
            .collect();
        log::trace!(
            "flood fill from {:?} seeded with {} neighbors",
            coords,
            to_visit.len()
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // skip flagged or already revealed cells
            let cell = self.board[visit_coords];
            if cell.is_revealed || cell.is_flagged {
                log::trace!("flood fill passing over {:?}", visit_coords);
                continue;
            }

            let visit_count = cell.neighbor_mines;
            self.reveal_cell(visit_coords, CellView::Open(visit_count), changed);
            log::trace!(
                "flood fill reached {:?}, {} adjacent mines",
                visit_coords,
                visit_count
            );

            // only zero cells expand further
            if visit_count == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| {
                            let cell = self.board[pos];
                            !cell.is_revealed && !cell.is_flagged
                        })
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn reveal_cell(&mut self, coords: Coord2, view: CellView, changed: &mut Vec<CellChange>) {
        self.board.cell_mut(coords).is_revealed = true;
        self.revealed_count += 1;
        changed.push(CellChange { coords, view });
    }

    /// Ends the game in a loss, exposing every mine without re-running any
    /// cascade or win check.
    fn explode(&mut self, coords: Coord2, changed: &mut Vec<CellChange>) {
        self.exploded = Some(coords);
        self.reveal_cell(coords, CellView::Exploded, changed);
        self.finish(GameStatus::Lost);

        let (rows, cols) = self.board.size();
        for row in 0..rows {
            for col in 0..cols {
                let mine_coords = (row, col);
                let cell = self.board[mine_coords];
                if cell.is_mine && !cell.is_revealed {
                    // flagged mines stay displayed as flags
                    let view = if cell.is_flagged {
                        CellView::Flagged
                    } else {
                        CellView::Mine
                    };
                    self.reveal_cell(mine_coords, view, changed);
                }
            }
        }
    }

    /// Ends the game in a win, auto-flagging whatever mines the player left
    /// unflagged. Cosmetic finalization: the flags count like player flags.
    fn finish_won(&mut self, changed: &mut Vec<CellChange>) {
        self.finish(GameStatus::Won);

        let (rows, cols) = self.board.size();
        for row in 0..rows {
            for col in 0..cols {
                let mine_coords = (row, col);
                let cell = self.board[mine_coords];
                if cell.is_mine && !cell.is_flagged {
                    self.board.cell_mut(mine_coords).is_flagged = true;
                    self.flagged_count += 1;
                    changed.push(CellChange {
                        coords: mine_coords,
                        view: CellView::Flagged,
                    });
                }
            }
        }
    }

    /// Checks if the status is Ready and moves to Playing recording the start
    /// time.
    fn mark_started(&mut self) {
        if self.status.is_ready() {
            let now = Utc::now();
            log::debug!("clock running since {}", now);
            self.started_at.replace(now);
            self.status = GameStatus::Playing;
        }
    }

    fn finish(&mut self, status: GameStatus) {
        let now = Utc::now();
        log::debug!("game over, {:?} at {}", status, now);
        self.ended_at.replace(now);
        self.status = status;
    }

    fn no_change(&self) -> Update {
        self.update(Outcome::NoChange, Vec::new())
    }

    fn update(&self, outcome: Outcome, changed: Vec<CellChange>) -> Update {
        Update {
            outcome,
            status: self.status,
            changed,
            counts: self.counts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> Game {
        let board = Board::from_mine_coords(size, mines).unwrap();
        let difficulty = Difficulty::new(size.0, size.1, mines.len() as CellCount);
        Game::new(difficulty, board)
    }

    #[test]
    fn first_reveal_starts_the_clock() {
        let mut game = game((3, 3), &[(2, 2)]);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.started_at(), None);
        assert_eq!(game.elapsed_secs(), 0);

        let update = game.reveal((0, 1)).unwrap();

        assert!(update.outcome.has_update());
        assert!(game.started_at().is_some());
        assert_ne!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn flagging_does_not_start_the_clock() {
        let mut game = game((3, 3), &[(2, 2)]);

        let update = game.toggle_flag((0, 0)).unwrap();

        assert_eq!(update.outcome, Outcome::Flagged);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.started_at(), None);
    }

    #[test]
    fn numbered_reveal_changes_exactly_one_cell() {
        let mut game = game((3, 3), &[(0, 0)]);

        let update = game.reveal((1, 1)).unwrap();

        assert_eq!(update.outcome, Outcome::Revealed);
        assert_eq!(update.status, GameStatus::Playing);
        assert_eq!(
            update.changed,
            vec![CellChange {
                coords: (1, 1),
                view: CellView::Open(1),
            }]
        );
        assert_eq!(update.counts.revealed, 1);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.reveal((1, 1)).unwrap();
        let update = game.reveal((1, 1)).unwrap();

        assert_eq!(update.outcome, Outcome::NoChange);
        assert!(update.changed.is_empty());
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn reveal_on_flagged_cell_is_a_no_op() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.toggle_flag((1, 1)).unwrap();
        let update = game.reveal((1, 1)).unwrap();

        assert_eq!(update.outcome, Outcome::NoChange);
        assert!(!game.cell((1, 1)).is_revealed);
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn flood_fill_reveals_zero_region_and_numbered_border() {
        // Row layout: 0 1 * 1 0 -- the mine splits two zero regions.
        let mut game = game((1, 5), &[(0, 2)]);

        let update = game.reveal((0, 0)).unwrap();

        assert_eq!(update.outcome, Outcome::Revealed);
        assert_eq!(game.view_at((0, 0)), CellView::Open(0));
        assert_eq!(game.view_at((0, 1)), CellView::Open(1));
        assert_eq!(game.view_at((0, 2)), CellView::Hidden);
        assert_eq!(game.view_at((0, 3)), CellView::Hidden);
        assert_eq!(game.view_at((0, 4)), CellView::Hidden);
        assert_eq!(game.revealed_count(), 2);
        assert_eq!(update.changed.len(), 2);
    }

    #[test]
    fn flood_fill_never_reveals_a_mine() {
        let mut game = game((6, 6), &[(5, 5)]);

        game.reveal((0, 0)).unwrap();

        assert!(!game.cell((5, 5)).is_revealed);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut game = game((1, 5), &[(0, 4)]);

        game.toggle_flag((0, 2)).unwrap();
        game.reveal((0, 0)).unwrap();

        assert_eq!(game.view_at((0, 2)), CellView::Flagged);
        assert!(!game.cell((0, 2)).is_revealed);
        // the cascade stops at the flag
        assert_eq!(game.view_at((0, 3)), CellView::Hidden);
    }

    #[test]
    fn revealing_a_mine_loses_and_exposes_every_mine() {
        let mines = &[(0, 0), (2, 2), (4, 4)];
        let mut game = game((5, 5), mines);

        let update = game.reveal((2, 2)).unwrap();

        assert_eq!(update.outcome, Outcome::HitMine);
        assert_eq!(update.status, GameStatus::Lost);
        assert_eq!(game.exploded(), Some((2, 2)));
        assert_eq!(game.view_at((2, 2)), CellView::Exploded);
        for &coords in mines {
            assert!(game.cell(coords).is_revealed);
        }
        assert_eq!(game.view_at((0, 0)), CellView::Mine);
        // each mine reported individually
        assert_eq!(update.changed.len(), mines.len());
        assert_eq!(game.revealed_count(), mines.len() as CellCount);
    }

    #[test]
    fn losing_reveals_flagged_mines_too() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.toggle_flag((2, 2)).unwrap();
        game.reveal((0, 0)).unwrap();

        assert!(game.cell((2, 2)).is_revealed);
        assert_eq!(game.view_at((2, 2)), CellView::Flagged);
        assert_eq!(game.revealed_count(), 2);
    }

    #[test]
    fn finished_game_ignores_further_interaction() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal((0, 0)).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);

        let reveal = game.reveal((1, 1)).unwrap();
        let flag = game.toggle_flag((1, 1)).unwrap();

        assert_eq!(reveal.outcome, Outcome::NoChange);
        assert_eq!(flag.outcome, Outcome::NoChange);
        assert!(!game.cell((1, 1)).is_revealed);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn winning_auto_flags_remaining_mines() {
        let mines = &[(0, 0), (3, 3)];
        let mut game = game((4, 4), mines);

        game.toggle_flag((0, 0)).unwrap();
        let mut last = None;
        for row in 0..4 {
            for col in 0..4 {
                if !game.cell((row, col)).is_mine && !game.cell((row, col)).is_revealed {
                    last = Some(game.reveal((row, col)).unwrap());
                }
            }
        }

        let update = last.unwrap();
        assert_eq!(update.outcome, Outcome::Won);
        assert_eq!(update.status, GameStatus::Won);
        assert_eq!(game.revealed_count(), 14);
        for &coords in mines {
            assert_eq!(game.view_at(coords), CellView::Flagged);
            assert!(!game.cell(coords).is_revealed);
        }
        assert_eq!(game.flagged_count(), 2);
        assert!(
            update
                .changed
                .iter()
                .any(|change| change.coords == (3, 3) && change.view == CellView::Flagged)
        );
    }

    #[test]
    fn easy_preset_wins_at_seventy_one_revealed() {
        // 9x9 with 10 mines packed in the top-left corner block
        let mines: Vec<Coord2> = (0..2)
            .flat_map(|row| (0..5).map(move |col| (row, col)))
            .collect();
        let board = Board::from_mine_coords((9, 9), &mines).unwrap();
        let mut game = Game::new(Difficulty::easy(), board);

        for row in 0..9 {
            for col in 0..9 {
                if !game.cell((row, col)).is_mine {
                    game.reveal((row, col)).unwrap();
                }
            }
        }

        assert_eq!(game.revealed_count(), 71);
        assert_eq!(game.status(), GameStatus::Won);
        for coords in mines {
            assert_eq!(game.view_at(coords), CellView::Flagged);
        }
    }

    #[test]
    fn double_toggle_restores_flag_state() {
        let mut game = game((3, 3), &[(2, 2)]);

        let first = game.toggle_flag((0, 0)).unwrap();
        let second = game.toggle_flag((0, 0)).unwrap();

        assert_eq!(first.outcome, Outcome::Flagged);
        assert_eq!(second.outcome, Outcome::Unflagged);
        assert!(!game.cell((0, 0)).is_flagged);
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn flagging_a_revealed_cell_is_a_no_op() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.reveal((1, 1)).unwrap();
        let update = game.toggle_flag((1, 1)).unwrap();

        assert_eq!(update.outcome, Outcome::NoChange);
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn out_of_bounds_reveal_errors_without_touching_state() {
        let mut game = game((3, 3), &[(0, 0)]);
        let before = game.clone();

        assert_eq!(game.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.reveal((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(game.toggle_flag((3, 3)), Err(GameError::InvalidCoords));
        assert_eq!(game, before);
    }

    #[test]
    fn remaining_mines_clamps_when_over_flagged() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.toggle_flag((0, 0)).unwrap();
        game.toggle_flag((1, 1)).unwrap();
        game.toggle_flag((2, 2)).unwrap();

        assert_eq!(game.flagged_count(), 3);
        assert_eq!(game.remaining_mines(), 0);
        assert_eq!(game.counts().remaining_mines, 0);
    }

    #[test]
    fn saved_game_resumes_play() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        game.reveal((0, 2)).unwrap();
        game.toggle_flag((2, 2)).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);

        let saved = serde_json::to_string(&game).unwrap();
        let mut restored: Game = serde_json::from_str(&saved).unwrap();

        assert_eq!(restored, game);
        for row in 0..3 {
            for col in 0..3 {
                let coords = (row, col);
                if !restored.cell(coords).is_mine && !restored.cell(coords).is_revealed {
                    restored.reveal(coords).unwrap();
                }
            }
        }
        assert_eq!(restored.status(), GameStatus::Won);
    }
}
