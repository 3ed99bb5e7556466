use alloc::rc::Rc;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    Replaying,
    /// Only held while the outcome is reported; the engine is idle again before any call returns.
    Resolved,
}

impl EngineState {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_replaying(self) -> bool {
        matches!(self, Self::Replaying)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Where a replay stands after a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplayProgress {
    /// The step at this queue index has started and is waiting for its delay.
    Pending(usize),
    /// The run ended with this outcome and the engine is back to idle.
    Resolved(GameOutcome),
}

impl ReplayProgress {
    pub const fn outcome(self) -> Option<GameOutcome> {
        match self {
            Self::Pending(_) => None,
            Self::Resolved(outcome) => Some(outcome),
        }
    }
}

enum StepResult {
    Commit(Coord2),
    End(GameOutcome),
}

/// Queues moves and replays them against a shared [`Board`].
#[derive(Clone, Debug)]
pub struct ReplayEngine<O = ()> {
    board: Rc<Board>,
    queue: Vec<QueuedMove>,
    position: Coord2,
    cursor: usize,
    state: EngineState,
    last_outcome: Option<GameOutcome>,
    observer: O,
}

impl ReplayEngine {
    pub fn new(board: Rc<Board>) -> Self {
        Self::with_observer(board, ())
    }
}

impl<O: ReplayObserver> ReplayEngine<O> {
    pub fn with_observer(board: Rc<Board>, observer: O) -> Self {
        let position = board.start();
        Self {
            board,
            queue: Vec::new(),
            position,
            cursor: 0,
            state: Default::default(),
            last_outcome: None,
            observer,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn position(&self) -> Coord2 {
        self.position
    }

    pub fn queue(&self) -> &[QueuedMove] {
        &self.queue
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Index of the queued move the current replay evaluates next.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Outcome of the most recent finished run, kept across the reset that follows it.
    pub fn last_outcome(&self) -> Option<GameOutcome> {
        self.last_outcome
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn enqueue(&mut self, mv: Move) -> Result<usize> {
        self.push(QueuedMove::Step(mv))
    }

    /// Queues a raw control token, keeping unrecognized ones so replay can report and skip them.
    pub fn enqueue_token(&mut self, token: &str) -> Result<usize> {
        self.check_idle()?;
        let entry = QueuedMove::parse(token);
        if let QueuedMove::Unrecognized(_) = entry {
            log::error!("Move {} is not recognized", token);
        }
        self.push(entry)
    }

    /// Runs the whole queue, waiting [`STEP_DELAY`] on `timer` before each step.
    pub async fn replay<T: StepTimer>(&mut self, timer: &mut T) -> Result<GameOutcome> {
        let mut progress = self.begin_replay()?;
        loop {
            match progress {
                ReplayProgress::Pending(_) => {
                    timer.sleep(STEP_DELAY).await;
                    progress = self.advance()?;
                }
                ReplayProgress::Resolved(outcome) => return Ok(outcome),
            }
        }
    }

    pub fn begin_replay(&mut self) -> Result<ReplayProgress> {
        self.check_idle()?;

        log::debug!("replay started with {} queued move(s)", self.queue.len());
        self.state = EngineState::Replaying;
        self.cursor = 0;
        self.last_outcome = None;

        if self.queue.is_empty() {
            Ok(self.finish_walk())
        } else {
            Ok(self.start_step())
        }
    }

    /// Evaluates the move under the cursor, meant to be called once the step delay has elapsed.
    pub fn advance(&mut self) -> Result<ReplayProgress> {
        self.check_replaying()?;

        let index = self.cursor;
        match self.queue.get(index).cloned() {
            None => return Ok(self.finish_walk()),
            Some(QueuedMove::Unrecognized(token)) => {
                log::warn!("skipping unrecognized move {:?} at index {}", token, index);
                self.notify(ReplayEvent::MoveSkipped { index, token });
            }
            Some(QueuedMove::Step(mv)) => match self.evaluate(mv) {
                StepResult::Commit(position) => {
                    log::trace!("step {}: {} to {:?}", index, mv, position);
                    self.position = position;
                    self.notify(ReplayEvent::Moved { index, position });
                }
                StepResult::End(outcome) => return Ok(self.resolve(outcome)),
            },
        }

        self.cursor += 1;
        if self.cursor < self.queue.len() {
            Ok(self.start_step())
        } else {
            Ok(self.finish_walk())
        }
    }

    /// Swaps in a freshly generated board, starting over from its start cell.
    pub fn rebind(&mut self, board: Rc<Board>) -> Result<()> {
        self.check_idle()?;
        self.board = board;
        self.last_outcome = None;
        self.reset();
        Ok(())
    }

    /// Abandons a replay in flight without reporting an outcome.
    pub fn cancel_replay(&mut self) -> Result<()> {
        self.check_replaying()?;
        log::debug!("replay cancelled at step {}", self.cursor);
        self.reset();
        Ok(())
    }

    fn push(&mut self, entry: QueuedMove) -> Result<usize> {
        self.check_idle()?;
        let index = self.queue.len();
        self.queue.push(entry.clone());
        self.notify(ReplayEvent::MoveQueued { index, entry });
        Ok(index)
    }

    fn evaluate(&self, mv: Move) -> StepResult {
        let Some(next) = mv.apply(self.position, self.board.size()) else {
            return StepResult::End(GameOutcome::LoseBoundary);
        };

        match self.board[next] {
            CellKind::Wall => StepResult::End(GameOutcome::LoseWall),
            CellKind::Exit => StepResult::End(GameOutcome::Win),
            CellKind::Empty | CellKind::Start => StepResult::Commit(next),
        }
    }

    fn start_step(&mut self) -> ReplayProgress {
        let index = self.cursor;
        self.notify(ReplayEvent::StepStarted { index });
        ReplayProgress::Pending(index)
    }

    fn finish_walk(&mut self) -> ReplayProgress {
        // stepping onto the exit resolves mid-walk, so an exhausted queue only lands here short of it
        let outcome = if self.position != self.board.exit() {
            GameOutcome::LoseIncomplete
        } else {
            GameOutcome::Win
        };
        self.resolve(outcome)
    }

    fn resolve(&mut self, outcome: GameOutcome) -> ReplayProgress {
        log::debug!(
            "replay resolved as {:?} at {:?} after {} of {} move(s)",
            outcome,
            self.position,
            self.cursor,
            self.queue.len()
        );
        self.state = EngineState::Resolved;
        self.last_outcome = Some(outcome);
        self.notify(ReplayEvent::Outcome(outcome));
        self.reset();
        ReplayProgress::Resolved(outcome)
    }

    fn reset(&mut self) {
        self.position = self.board.start();
        self.queue.clear();
        self.cursor = 0;
        self.state = EngineState::Idle;
        self.notify(ReplayEvent::Reset);
    }

    fn notify(&mut self, event: ReplayEvent) {
        self.observer.on_event(&event);
    }

    fn check_idle(&self) -> Result<()> {
        if self.state.is_idle() {
            Ok(())
        } else {
            Err(GameError::InvalidState)
        }
    }

    fn check_replaying(&self) -> Result<()> {
        if self.state.is_replaying() {
            Ok(())
        } else {
            Err(GameError::InvalidState)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::future::Future;
    use core::time::Duration;
    use futures_util::FutureExt;

    /// Never finishes its first wait, like a step delay still running when the caller gives up.
    struct StalledTimer;

    impl StepTimer for StalledTimer {
        fn sleep(&mut self, _duration: Duration) -> impl Future<Output = ()> {
            core::future::pending()
        }
    }

    #[derive(Default)]
    struct ImmediateTimer {
        sleeps: Vec<Duration>,
    }

    impl StepTimer for ImmediateTimer {
        fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
            self.sleeps.push(duration);
            core::future::ready(())
        }
    }

    fn engine(wall: Coord2, moves: &[Move]) -> ReplayEngine<Vec<ReplayEvent>> {
        let board = Rc::new(Board::new(3, wall).unwrap());
        let mut engine = ReplayEngine::with_observer(board, Vec::<ReplayEvent>::new());
        for &mv in moves {
            engine.enqueue(mv).unwrap();
        }
        engine.observer_mut().clear();
        engine
    }

    fn run(engine: &mut ReplayEngine<Vec<ReplayEvent>>) -> (GameOutcome, ImmediateTimer) {
        let mut timer = ImmediateTimer::default();
        let outcome = engine
            .replay(&mut timer)
            .now_or_never()
            .expect("immediate timer never suspends")
            .unwrap();
        (outcome, timer)
    }

    fn started_steps(events: &[ReplayEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::StepStarted { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn assert_reset(engine: &ReplayEngine<Vec<ReplayEvent>>) {
        assert_eq!(engine.position(), (0, 0));
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn right_right_down_down_reaches_exit() {
        use Move::*;
        let mut engine = engine((0, 2), &[Right, Right, Down, Down]);

        let (outcome, timer) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::Win);
        assert_eq!(started_steps(engine.observer()), [0, 1, 2, 3]);
        assert_eq!(timer.sleeps, [STEP_DELAY; 4]);
        assert_eq!(
            &engine.observer()[engine.observer().len() - 2..],
            [ReplayEvent::Outcome(GameOutcome::Win), ReplayEvent::Reset]
        );
        assert_eq!(engine.last_outcome(), Some(GameOutcome::Win));
        assert_reset(&engine);
    }

    #[test]
    fn hitting_wall_stops_processing() {
        use Move::*;
        let mut engine = engine((1, 0), &[Right, Down, Down]);

        let (outcome, timer) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::LoseWall);
        assert_eq!(started_steps(engine.observer()), [0]);
        assert_eq!(timer.sleeps.len(), 1);
        assert_reset(&engine);
    }

    #[test]
    fn leaving_board_loses_immediately() {
        let mut engine = engine((1, 1), &[Move::Left, Move::Right]);

        let (outcome, _) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::LoseBoundary);
        assert_eq!(started_steps(engine.observer()), [0]);
        assert_reset(&engine);
    }

    #[test]
    fn empty_replay_is_incomplete() {
        let mut engine = engine((1, 1), &[]);

        let (outcome, timer) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::LoseIncomplete);
        assert!(timer.sleeps.is_empty());
        assert_eq!(
            engine.observer().as_slice(),
            [ReplayEvent::Outcome(GameOutcome::LoseIncomplete), ReplayEvent::Reset]
        );
        assert_reset(&engine);
    }

    #[test]
    fn stopping_on_last_column_is_still_incomplete() {
        use Move::*;
        let mut engine = engine((1, 1), &[Right, Right]);

        let (outcome, _) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::LoseIncomplete);
        assert!(engine
            .observer()
            .contains(&ReplayEvent::Moved { index: 1, position: (2, 0) }));
        assert_reset(&engine);
    }

    #[test]
    fn start_cell_is_passable() {
        use Move::*;
        let mut engine = engine((2, 0), &[Down, Up]);

        let (outcome, _) = run(&mut engine);

        let moved: Vec<_> = engine
            .observer()
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::Moved { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(moved, [(0, 1), (0, 0)]);
        assert_eq!(outcome, GameOutcome::LoseIncomplete);
    }

    #[test]
    fn enqueue_reports_index_and_entry() {
        let board = Rc::new(Board::new(3, (1, 1)).unwrap());
        let mut engine = ReplayEngine::with_observer(board, Vec::<ReplayEvent>::new());

        assert_eq!(engine.enqueue(Move::Up), Ok(0));
        assert_eq!(engine.enqueue_token("left"), Ok(1));
        assert_eq!(engine.enqueue_token("sideways"), Ok(2));

        assert_eq!(
            engine.observer().as_slice(),
            [
                ReplayEvent::MoveQueued {
                    index: 0,
                    entry: QueuedMove::Step(Move::Up)
                },
                ReplayEvent::MoveQueued {
                    index: 1,
                    entry: QueuedMove::Step(Move::Left)
                },
                ReplayEvent::MoveQueued {
                    index: 2,
                    entry: QueuedMove::Unrecognized("sideways".to_string())
                },
            ]
        );
    }

    #[test]
    fn unrecognized_move_is_skipped_without_moving() {
        let board = Rc::new(Board::new(3, (0, 2)).unwrap());
        let mut engine = ReplayEngine::with_observer(board, Vec::<ReplayEvent>::new());
        for token in ["right", "jump", "right", "down", "down"] {
            engine.enqueue_token(token).unwrap();
        }
        engine.observer_mut().clear();

        let (outcome, timer) = run(&mut engine);

        assert_eq!(outcome, GameOutcome::Win);
        assert_eq!(timer.sleeps.len(), 5);
        assert_eq!(started_steps(engine.observer()), [0, 1, 2, 3, 4]);
        assert!(engine.observer().contains(&ReplayEvent::MoveSkipped {
            index: 1,
            token: "jump".to_string()
        }));
        assert!(engine
            .observer()
            .contains(&ReplayEvent::Moved { index: 2, position: (2, 0) }));
    }

    #[test]
    fn enqueue_while_replaying_is_rejected() {
        let mut engine = engine((1, 1), &[Move::Right, Move::Down]);

        assert_eq!(engine.begin_replay(), Ok(ReplayProgress::Pending(0)));
        assert_eq!(engine.enqueue(Move::Down), Err(GameError::InvalidState));
        assert_eq!(engine.enqueue_token("up"), Err(GameError::InvalidState));
        assert_eq!(engine.queue_len(), 2);
        assert_eq!(engine.state(), EngineState::Replaying);
    }

    #[test]
    fn replay_cannot_overlap() {
        let mut engine = engine((1, 1), &[Move::Right]);

        engine.begin_replay().unwrap();
        assert_eq!(engine.begin_replay(), Err(GameError::InvalidState));

        let mut timer = ImmediateTimer::default();
        let second = engine.replay(&mut timer).now_or_never();
        assert_eq!(second, Some(Err(GameError::InvalidState)));
        assert!(timer.sleeps.is_empty());
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn advance_requires_replay_in_flight() {
        let mut engine = engine((1, 1), &[Move::Right]);

        assert_eq!(engine.advance(), Err(GameError::InvalidState));
        assert_eq!(engine.cancel_replay(), Err(GameError::InvalidState));
    }

    #[test]
    fn step_api_walks_the_queue() {
        use Move::*;
        let mut engine = engine((0, 2), &[Right, Right, Down, Down]);

        assert_eq!(engine.begin_replay(), Ok(ReplayProgress::Pending(0)));
        assert_eq!(engine.advance(), Ok(ReplayProgress::Pending(1)));
        assert_eq!(engine.position(), (1, 0));
        assert_eq!(engine.advance(), Ok(ReplayProgress::Pending(2)));
        assert_eq!(engine.advance(), Ok(ReplayProgress::Pending(3)));
        assert_eq!(engine.position(), (2, 1));
        assert_eq!(engine.cursor(), 3);

        let last = engine.advance().unwrap();
        assert_eq!(last.outcome(), Some(GameOutcome::Win));
        assert_reset(&engine);
    }

    #[test]
    fn cancel_resets_without_outcome() {
        use Move::*;
        let mut engine = engine((1, 1), &[Right, Right, Down]);

        engine.begin_replay().unwrap();
        engine.advance().unwrap();
        assert_eq!(engine.position(), (1, 0));

        assert_eq!(engine.cancel_replay(), Ok(()));
        assert_reset(&engine);
        assert_eq!(engine.last_outcome(), None);
        assert_eq!(engine.observer().last(), Some(&ReplayEvent::Reset));
        assert!(!engine
            .observer()
            .iter()
            .any(|event| matches!(event, ReplayEvent::Outcome(_))));
    }

    #[test]
    fn dropping_replay_mid_delay_leaves_it_cancellable() {
        use Move::*;
        let mut engine = engine((1, 1), &[Right, Right, Down]);

        let polled = engine.replay(&mut StalledTimer).now_or_never();

        assert_eq!(polled, None);
        assert_eq!(engine.state(), EngineState::Replaying);
        assert_eq!(engine.position(), (0, 0));
        assert_eq!(
            engine.observer().as_slice(),
            [ReplayEvent::StepStarted { index: 0 }]
        );

        assert_eq!(engine.cancel_replay(), Ok(()));
        assert_reset(&engine);
        assert_eq!(engine.last_outcome(), None);
        assert!(!engine
            .observer()
            .iter()
            .any(|event| matches!(event, ReplayEvent::Moved { .. } | ReplayEvent::Outcome(_))));
        assert_eq!(engine.observer().last(), Some(&ReplayEvent::Reset));
    }

    #[test]
    fn engine_is_reusable_after_outcome() {
        let mut engine = engine((1, 1), &[Move::Up]);

        assert_eq!(run(&mut engine).0, GameOutcome::LoseBoundary);

        engine.enqueue(Move::Right).unwrap();
        engine.enqueue(Move::Right).unwrap();
        engine.enqueue(Move::Down).unwrap();
        engine.enqueue(Move::Down).unwrap();
        assert_eq!(run(&mut engine).0, GameOutcome::Win);
    }
}
