//! Keyed delayed-action scheduler.
//!
//! Every key owns at most one pending action. Scheduling again under the same
//! key aborts the pending action and restarts the delay, so a burst of requests
//! collapses into a single action fired `delay` after the last request.

use crate::constants::debounce::{DEFAULT_DELAY, DEFAULT_KEY};
use std::{collections::HashMap, hash::Hash, time::Duration};
use tokio::{task::JoinHandle, time::Instant};

/// Per-key registry of pending delayed actions.
///
/// Must be used from within a tokio runtime. Dropping the debouncer aborts
/// every action that has not fired yet.
#[derive(Debug)]
pub struct Debouncer<K = &'static str>
where
    K: Eq + Hash,
{
    timers: HashMap<K, JoinHandle<()>>,
}

impl<K: Eq + Hash> Debouncer<K> {
    pub fn new() -> Self {
        Self { timers: HashMap::new() }
    }

    /// Schedules `action` to run after `delay`, replacing any action pending for `key`.
    pub fn schedule<F>(&mut self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action();
        });
        if let Some(previous) = self.timers.insert(key, handle) {
            previous.abort();
        }
    }

    /// Cancels the action pending for `key`. Returns whether one was still waiting.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.timers.remove(key) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.timers.get(key).is_some_and(|handle| !handle.is_finished())
    }
}

impl Debouncer<&'static str> {
    /// Schedules under the shared default key with the default delay.
    pub fn schedule_default<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(DEFAULT_KEY, DEFAULT_DELAY, action);
    }
}

impl<K: Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Drop for Debouncer<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
