//! Delayed continuations owned by a single controller
//!
//! Every task spawned through a [`TaskScope`] is aborted when the scope is
//! cancelled or dropped, so a reset or discarded controller never receives a
//! stale callback.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Set of pending delayed tasks
#[derive(Debug, Default)]
pub struct TaskScope {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScope {
    /// Create an empty scope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` on the current tokio runtime
    ///
    /// Hands `task` back when there is nothing to wait for (zero delay) or no
    /// runtime to wait on; the caller then runs it inline.
    ///
    /// # Errors
    ///
    /// Returns the task unscheduled in the two cases above
    pub fn run_after<F>(&self, delay: Duration, task: F) -> Result<(), F>
    where
        F: FnOnce() + Send + 'static,
    {
        if delay.is_zero() {
            return Err(task);
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no tokio runtime, running continuation inline");
            return Err(task);
        };

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });

        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
        tracing::trace!(delay_ms = delay.as_millis(), pending = handles.len(), "continuation scheduled");
        Ok(())
    }

    /// Abort every pending task, returning how many were still running
    pub fn cancel_all(&self) -> usize {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cancelled = 0;
        for handle in handles.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            tracing::trace!(cancelled, "pending continuations aborted");
        }
        cancelled
    }

    /// Number of tasks that have not finished yet
    #[must_use]
    pub fn pending(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
