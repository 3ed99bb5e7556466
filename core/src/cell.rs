use serde::{Deserialize, Serialize};

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Start,
    Wall,
    Exit,
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}
