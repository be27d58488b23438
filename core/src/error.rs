use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = std::result::Result<T, GameError>;
