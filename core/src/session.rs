use alloc::rc::Rc;

use crate::*;

/// One game session: a board and the engine replaying moves on it.
#[derive(Debug)]
pub struct Game<O = ()> {
    config: GameConfig,
    engine: ReplayEngine<O>,
}

impl<O: ReplayObserver> Game<O> {
    pub fn new(config: GameConfig, seed: u64, observer: O) -> Self {
        let board = Rc::new(RandomBoardGenerator::new(seed).generate(config));
        log::debug!("new game, wall at {:?}", board.wall());
        Self {
            config,
            engine: ReplayEngine::with_observer(board, observer),
        }
    }

    /// Validates `size` before generating anything.
    pub fn with_size(size: Coord, seed: u64, observer: O) -> Result<Self> {
        Ok(Self::new(GameConfig::new(size)?, seed, observer))
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn engine(&self) -> &ReplayEngine<O> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ReplayEngine<O> {
        &mut self.engine
    }

    /// Regenerates the board, cancelling any replay in flight.
    pub fn new_game(&mut self, seed: u64) -> Result<()> {
        if self.engine.state().is_replaying() {
            self.engine.cancel_replay()?;
        }

        let board = Rc::new(RandomBoardGenerator::new(seed).generate(self.config));
        log::debug!("new game, wall at {:?}", board.wall());
        self.engine.rebind(board)
    }
}
