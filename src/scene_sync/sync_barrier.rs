use std::time::{Duration, Instant};
use parking_lot::{Condvar, Mutex};
use serde::{Serialize, Deserialize};
use strum_macros::Display;
use crate::scene_sync::run_context::RunContext;
use crate::utils::utils_errors::SceneError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum BarrierState {
    Idle,
    Waiting,
    Satisfied
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierWaitSettings {
    pub timeout: Duration,
    pub poll_interval: Duration
}
impl BarrierWaitSettings {
    pub fn new_from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms.max(1))
        }
    }
}
impl Default for BarrierWaitSettings {
    fn default() -> Self {
        Self::new_from_millis(10_000, 10)
    }
}

/// Outcome of evaluating a barrier condition against the current shared data.
pub enum BarrierCheck<R> {
    Pending,
    Satisfied(R),
    Failed(SceneError)
}

/// One piece of shared state written by the response handler and waited on by the driver.
///
/// Writers apply their change under the lock and notify afterwards, so a waiter that observes
/// the condition always sees the fully applied response.  Waiters evaluate the condition under
/// the lock but run any follow-up action (such as re-issuing a query) after releasing it.
pub struct SyncBarrier<T> {
    name: String,
    data: Mutex<T>,
    condvar: Condvar,
    state: Mutex<BarrierState>
}
impl<T> SyncBarrier<T> {
    pub fn new(name: &str, initial: T) -> Self {
        Self {
            name: name.to_string(),
            data: Mutex::new(initial),
            condvar: Condvar::new(),
            state: Mutex::new(BarrierState::Idle)
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn state(&self) -> BarrierState {
        *self.state.lock()
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        {
            let mut guard = self.data.lock();
            f(&mut guard);
        }
        self.condvar.notify_all();
    }
    pub fn read<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
        let guard = self.data.lock();
        f(&guard)
    }
    /// Evaluates the condition once without waiting.
    pub fn poll<R, F: FnMut(&mut T) -> BarrierCheck<R>>(&self, mut check: F) -> Result<Option<R>, SceneError> {
        let outcome = {
            let mut guard = self.data.lock();
            check(&mut guard)
        };
        return match outcome {
            BarrierCheck::Pending => { Ok(None) }
            BarrierCheck::Satisfied(r) => {
                self.set_state(BarrierState::Satisfied);
                Ok(Some(r))
            }
            BarrierCheck::Failed(e) => {
                self.set_state(BarrierState::Idle);
                Err(e)
            }
        }
    }
    /// Blocks until `check` is satisfied, fails, the run is cancelled, or the timeout elapses.
    /// `on_unsatisfied` runs at most once per poll interval while the condition is pending.
    pub fn wait<R, F, U>(&self, settings: &BarrierWaitSettings, ctx: &RunContext, mut check: F, mut on_unsatisfied: U) -> Result<R, SceneError>
        where F: FnMut(&mut T) -> BarrierCheck<R>,
              U: FnMut() -> Result<(), SceneError> {
        let start = Instant::now();
        let mut last_nudge: Option<Instant> = None;
        self.set_state(BarrierState::Waiting);

        loop {
            if let Err(e) = ctx.check_cancelled(&self.name) {
                self.set_state(BarrierState::Idle);
                return Err(e);
            }
            if let Some(r) = self.poll(&mut check)? {
                return Ok(r);
            }

            let elapsed = start.elapsed();
            if elapsed >= settings.timeout {
                self.set_state(BarrierState::Idle);
                return Err(SceneError::new_timeout_error(&self.name, settings.timeout, file!(), line!()));
            }

            let nudge_due = match last_nudge {
                None => { true }
                Some(t) => { t.elapsed() >= settings.poll_interval }
            };
            if nudge_due {
                if let Err(e) = on_unsatisfied() {
                    self.set_state(BarrierState::Idle);
                    return Err(e);
                }
                last_nudge = Some(Instant::now());
            }

            let remaining = settings.timeout.saturating_sub(start.elapsed());
            let mut guard = self.data.lock();
            self.condvar.wait_for(&mut guard, settings.poll_interval.min(remaining));
        }
    }
    /// Resets the backing data for a new scene and returns the barrier to `Idle`.
    pub fn rearm<F: FnOnce(&mut T)>(&self, reset: F) {
        self.update(reset);
        self.set_state(BarrierState::Idle);
    }
    fn set_state(&self, state: BarrierState) {
        *self.state.lock() = state;
    }
}
