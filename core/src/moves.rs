use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// A single discrete directional input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Left,
    Up,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Left, Move::Up, Move::Down, Move::Right];

    /// Unit displacement `(dx, dy)`, with `y` growing downwards.
    pub const fn delta(self) -> (i8, i8) {
        use Move::*;
        match self {
            Left => (-1, 0),
            Up => (0, -1),
            Down => (0, 1),
            Right => (1, 0),
        }
    }

    /// Lowercase token used by the move controls.
    pub const fn token(self) -> &'static str {
        use Move::*;
        match self {
            Left => "left",
            Up => "up",
            Down => "down",
            Right => "right",
        }
    }

    /// Position reached from `from` on a `size`×`size` board, `None` if it falls off the board.
    pub fn apply(self, from: Coord2, size: Coord) -> Option<Coord2> {
        apply_delta(from, self.delta(), size)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self> {
        Move::ALL
            .into_iter()
            .find(|mv| mv.token() == token)
            .ok_or_else(|| GameError::UnrecognizedMove(token.to_string()))
    }
}

/// Entry in the replay queue.
///
/// Tokens that do not name a [`Move`] are kept in place so the queue mirrors what the player entered; replay skips
/// them without moving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuedMove {
    Step(Move),
    Unrecognized(String),
}

impl QueuedMove {
    pub fn parse(token: &str) -> Self {
        match token.parse() {
            Ok(mv) => Self::Step(mv),
            Err(_) => Self::Unrecognized(token.to_string()),
        }
    }

    pub const fn as_move(&self) -> Option<Move> {
        match self {
            Self::Step(mv) => Some(*mv),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<Move> for QueuedMove {
    fn from(mv: Move) -> Self {
        Self::Step(mv)
    }
}
