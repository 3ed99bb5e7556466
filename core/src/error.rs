use alloc::string::String;
use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board size {0}, must be between 2 and 16")]
    InvalidBoardSize(Coord),
    #[error("Coordinates out of range")]
    OutOfRange,
    #[error("Wall cannot be placed on the start or exit cell")]
    InvalidWallPlacement,
    #[error("Operation not allowed in the current replay state")]
    InvalidState,
    #[error("Move {0} is not recognized")]
    UnrecognizedMove(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
