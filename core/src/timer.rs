use core::future::Future;
use core::time::Duration;

/// Pause between two replay steps.
pub const STEP_DELAY: Duration = Duration::from_millis(1_000);

/// Source of the inter-step delay.
///
/// Dropping the returned future must cancel the wait, which lets a caller abandon a replay by dropping it.
/// Hosts that cannot await inside their event loop, like the web view, skip [`ReplayEngine::replay`](crate::ReplayEngine::replay)
/// and drive [`begin_replay`](crate::ReplayEngine::begin_replay) and [`advance`](crate::ReplayEngine::advance) from their own timeout instead.
pub trait StepTimer {
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()>;
}
