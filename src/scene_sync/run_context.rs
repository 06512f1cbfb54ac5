use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crate::utils::utils_errors::SceneError;

/// Cancellation handle shared between the driver and whoever may abort the run.  Clones share
/// the same flag; every barrier wait checks it on each poll.
#[derive(Clone, Debug, Default)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>
}
impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
    pub fn check_cancelled(&self, barrier_name: &str) -> Result<(), SceneError> {
        if self.is_cancelled() {
            return Err(SceneError::new_cancelled_error(barrier_name, file!(), line!()));
        }
        Ok(())
    }
}
