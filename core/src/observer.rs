use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Notification sent to the presentation layer while moves are queued and replayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayEvent {
    MoveQueued { index: usize, entry: QueuedMove },
    StepStarted { index: usize },
    Moved { index: usize, position: Coord2 },
    MoveSkipped { index: usize, token: String },
    Outcome(GameOutcome),
    Reset,
}

pub trait ReplayObserver {
    fn on_event(&mut self, event: &ReplayEvent);
}

impl ReplayObserver for () {
    fn on_event(&mut self, _event: &ReplayEvent) {}
}

impl ReplayObserver for Vec<ReplayEvent> {
    fn on_event(&mut self, event: &ReplayEvent) {
        self.push(event.clone());
    }
}
