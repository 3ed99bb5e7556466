#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use moves::*;
pub use observer::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod moves;
mod observer;
mod session;
mod timer;
mod types;

/// Board size, validated to `MIN_SIZE..=MAX_SIZE` on every construction path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Coord", into = "Coord")]
pub struct GameConfig {
    size: Coord,
}

impl GameConfig {
    pub const MIN_SIZE: Coord = 2;
    pub const MAX_SIZE: Coord = 16;
    pub const DEFAULT_SIZE: Coord = 3;

    pub(crate) const fn new_unchecked(size: Coord) -> Self {
        Self { size }
    }

    pub fn new(size: Coord) -> Result<Self> {
        if (Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size) {
            Ok(Self::new_unchecked(size))
        } else {
            Err(GameError::InvalidBoardSize(size))
        }
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn start(&self) -> Coord2 {
        (0, 0)
    }

    pub const fn exit(&self) -> Coord2 {
        let last = self.size - 1;
        (last, last)
    }
}

impl TryFrom<Coord> for GameConfig {
    type Error = GameError;

    fn try_from(size: Coord) -> Result<Self> {
        Self::new(size)
    }
}

impl From<GameConfig> for Coord {
    fn from(config: GameConfig) -> Self {
        config.size
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE)
    }
}

/// Terminal classification of a replay run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Win,
    LoseWall,
    LoseBoundary,
    LoseIncomplete,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub const fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }

    pub const fn message(self) -> &'static str {
        use GameOutcome::*;
        match self {
            InProgress => "",
            Win => "You win.",
            LoseWall | LoseBoundary | LoseIncomplete => "You lose.",
        }
    }
}

impl Default for GameOutcome {
    fn default() -> Self {
        Self::InProgress
    }
}
