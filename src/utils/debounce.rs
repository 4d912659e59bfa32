//! Trailing-edge input debouncing.
//!
//! Decouples raw input events (keystrokes) from the rate at which an
//! expensive target runs. A burst of calls collapses into one invocation of
//! the wrapped callback with the most recent arguments, after the configured
//! quiet period.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A small stateful wrapper owning one pending timer.
///
/// `call` resets the timer; the callback runs only after `delay` passes with
/// no further call (trailing edge only, no leading-edge call). Must be used
/// from within a tokio runtime. Dropping the debouncer cancels any pending
/// invocation.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

/// Wrap `callback` so invocations within `delay` of one another collapse
/// into a single trailing call.
pub fn debounce<T, F>(callback: F, delay: Duration) -> Debouncer<T>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    Debouncer::new(delay, callback)
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Schedule the callback with `args`, cancelling any pending invocation.
    pub fn call(&mut self, args: T) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }

    /// Cancel the pending invocation, if any, without firing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
