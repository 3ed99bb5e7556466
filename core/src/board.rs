use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid with a fixed start in one corner, the exit in the opposite one, and a single wall somewhere else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardLayout", into = "BoardLayout")]
pub struct Board {
    cells: Array2<CellKind>,
    wall: Coord2,
}

impl Board {
    /// Builds a board with the wall at a known location.
    pub fn new(size: Coord, wall: Coord2) -> Result<Self> {
        let config = GameConfig::new(size)?;
        if wall.0 >= size || wall.1 >= size {
            return Err(GameError::OutOfRange);
        }
        if wall == config.start() || wall == config.exit() {
            return Err(GameError::InvalidWallPlacement);
        }
        Ok(Self::new_unchecked(config, wall))
    }

    /// Validates `size` and places the wall with a [`RandomBoardGenerator`].
    pub fn random(size: Coord, seed: u64) -> Result<Self> {
        let config = GameConfig::new(size)?;
        Ok(RandomBoardGenerator::new(seed).generate(config))
    }

    pub(crate) fn new_unchecked(config: GameConfig, wall: Coord2) -> Self {
        let mut cells = Array2::default((config.size(), config.size()).to_nd_index());
        cells[config.start().to_nd_index()] = CellKind::Start;
        cells[config.exit().to_nd_index()] = CellKind::Exit;
        cells[wall.to_nd_index()] = CellKind::Wall;
        Self { cells, wall }
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size())
    }

    pub fn size(&self) -> Coord {
        self.cells.dim().0.try_into().unwrap_or(Coord::MAX)
    }

    pub fn start(&self) -> Coord2 {
        self.config().start()
    }

    pub fn exit(&self) -> Coord2 {
        self.config().exit()
    }

    pub fn wall(&self) -> Coord2 {
        self.wall
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size && coords.1 < size
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellKind> {
        if self.contains(coords) {
            Ok(self[coords])
        } else {
            Err(GameError::OutOfRange)
        }
    }

    /// Iterates all cells in row-major order as `((x, y), kind)`.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellKind)> + '_ {
        let size = self.size();
        (0..size).flat_map(move |y| (0..size).map(move |x| ((x, y), self[(x, y)])))
    }
}

/// Serialized form of a [`Board`], rebuilt through [`Board::new`] so every invariant is checked again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct BoardLayout {
    size: Coord,
    wall: Coord2,
}

impl TryFrom<BoardLayout> for Board {
    type Error = GameError;

    fn try_from(layout: BoardLayout) -> Result<Self> {
        Board::new(layout.size, layout.wall)
    }
}

impl From<Board> for BoardLayout {
    fn from(board: Board) -> Self {
        Self {
            size: board.size(),
            wall: board.wall(),
        }
    }
}

impl Index<Coord2> for Board {
    type Output = CellKind;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
