use serde::{Deserialize, Serialize};

use crate::*;

/// Snapshot of the current game for a status report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub difficulty: String,
    pub board_size: String,
    pub status: GameStatus,
    pub revealed_cells: CellCount,
    pub flagged_cells: CellCount,
    pub total_mines: CellCount,
    pub elapsed_secs: u32,
}

/// End-of-game report with a message fit for direct display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub status: GameStatus,
    pub message: String,
    pub elapsed_secs: u32,
}

/// One player's seat at the table: owns the current difficulty and game,
/// translates front-end signals into the two engine operations, and feeds the
/// display counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    difficulty: Difficulty,
    game: Game,
    flag_mode: bool,
    prev_time: u32,
}

impl Session {
    /// Starts a session on a named preset.
    pub fn new(difficulty_name: &str) -> Result<Self> {
        let difficulty = Difficulty::from_name(difficulty_name)?;
        Ok(Self::with_difficulty(difficulty))
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            game: create_game(difficulty),
            flag_mode: false,
            prev_time: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Rebuilds the board from scratch with fresh mine placement. Flag mode
    /// and the displayed time reset with it.
    pub fn new_game(&mut self) {
        self.game = create_game(self.difficulty);
        self.flag_mode = false;
        self.prev_time = 0;
    }

    /// Switches preset and starts a fresh game on it. Unknown names leave the
    /// session untouched.
    pub fn set_difficulty(&mut self, difficulty_name: &str) -> Result<()> {
        self.difficulty = Difficulty::from_name(difficulty_name)?;
        self.new_game();
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<Update> {
        self.game.reveal(coords)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<Update> {
        self.game.toggle_flag(coords)
    }

    /// Primary-activation entry point: reveals normally, flags when flag mode
    /// is on. Platforms without a secondary click drive everything through
    /// this.
    pub fn interact(&mut self, coords: Coord2) -> Result<Update> {
        if self.flag_mode {
            self.toggle_flag(coords)
        } else {
            self.reveal(coords)
        }
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    pub fn toggle_flag_mode(&mut self) -> bool {
        self.flag_mode = !self.flag_mode;
        log::debug!(
            "flag mode {}",
            if self.flag_mode { "on" } else { "off" }
        );
        self.flag_mode
    }

    /// Once-per-second display tick: reports the elapsed seconds only when the
    /// value changed since the last call. Elapsed time freezes when the game
    /// ends, so the stream goes quiet on its own and stays quiet.
    pub fn tick(&mut self) -> Option<u32> {
        let time = self.game.elapsed_secs();
        if self.prev_time != time {
            self.prev_time = time;
            Some(time)
        } else {
            None
        }
    }

    pub fn stats(&self) -> GameStats {
        let (rows, cols) = self.game.size();
        GameStats {
            difficulty: self.difficulty.label(),
            board_size: format!("{}x{}", rows, cols),
            status: self.game.status(),
            revealed_cells: self.game.revealed_count(),
            flagged_cells: self.game.flagged_count(),
            total_mines: self.game.total_mines(),
            elapsed_secs: self.game.elapsed_secs(),
        }
    }

    /// The completion event for a finished game, `None` while it is live.
    pub fn completion(&self) -> Option<Completion> {
        let message = match self.game.status() {
            GameStatus::Won => "Congratulations! You cleared the board",
            GameStatus::Lost => "Boom! You stepped on a mine",
            GameStatus::Ready | GameStatus::Playing => return None,
        };
        Some(Completion {
            status: self.game.status(),
            message: message.to_owned(),
            elapsed_secs: self.game.elapsed_secs(),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_difficulty(Difficulty::default())
    }
}

fn create_game(difficulty: Difficulty) -> Game {
    let seed: u64 = rand::random();
    Game::generate(difficulty, ShuffledMineGenerator::new(seed))
}

/// Zero-padded `HH:MM:SS` rendering used by timer displays.
pub fn format_elapsed(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
