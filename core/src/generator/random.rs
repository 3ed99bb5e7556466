use super::*;

/// Places the wall uniformly at random on any cell other than the start and the exit.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut attempts: u32 = 0;

        // rejection sampling, a valid cell always exists because size >= 2
        let wall = loop {
            attempts += 1;
            let candidate: Coord2 = (
                rng.random_range(0..config.size()),
                rng.random_range(0..config.size()),
            );
            if candidate != config.start() && candidate != config.exit() {
                break candidate;
            }
        };

        log::debug!(
            "generated {0}x{0} board, wall at {1:?} after {2} attempt(s)",
            config.size(),
            wall,
            attempts
        );
        Board::new_unchecked(config, wall)
    }
}
