//! Per-conversation model call state.
//!
//! One mutex guards the whole map. Every operation finishes without
//! awaiting, so the lock is never held across a suspension point.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use parley_core::{CallStatus, ConversationKey};
use tracing::debug;

#[derive(Debug, Default)]
pub struct CallStateTracker {
    calls: Mutex<HashMap<ConversationKey, CallStatus>>,
}

impl CallStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> MutexGuard<'_, HashMap<ConversationKey, CallStatus>> {
        // The map stays consistent even if a holder panicked: every write is a single insert/remove.
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `in_progress` and the current time, creating the entry if absent.
    pub fn set_in_progress(&self, key: &ConversationKey, in_progress: bool) {
        let mut calls = self.calls();
        record(&mut calls, key, in_progress);
    }

    pub fn is_in_progress(&self, key: &ConversationKey) -> bool {
        self.calls().get(key).is_some_and(|s| s.in_progress)
    }

    pub fn last_call_time(&self, key: &ConversationKey) -> Option<DateTime<Utc>> {
        self.calls().get(key).map(|s| s.last_call_time)
    }

    pub fn status(&self, key: &ConversationKey) -> Option<CallStatus> {
        self.calls().get(key).copied()
    }

    /// Remove the entry. Clearing an unknown key is a no-op.
    pub fn clear(&self, key: &ConversationKey) {
        if self.calls().remove(key).is_some() {
            debug!(conversation = %key, "Cleared call state");
        }
    }

    /// Atomically mark `key` in progress unless a call is already running.
    ///
    /// The returned guard marks the call finished when dropped, including
    /// when the caller's future is cancelled.
    pub fn begin(&self, key: &ConversationKey) -> Option<CallGuard<'_>> {
        let mut calls = self.calls();
        if calls.get(key).is_some_and(|s| s.in_progress) {
            return None;
        }
        record(&mut calls, key, true);
        Some(CallGuard {
            tracker: self,
            key: key.clone(),
        })
    }

    /// Drop idle entries whose last call is older than `max_age`. Returns how many were removed.
    ///
    /// Nothing expires on its own; owners that track many conversations call this periodically.
    pub fn evict_idle(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut calls = self.calls();
        let before = calls.len();
        calls.retain(|_, s| s.in_progress || s.last_call_time >= cutoff);
        before - calls.len()
    }

    pub fn len(&self) -> usize {
        self.calls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// Keeps the last call time monotonic even if the wall clock steps back.
fn record(calls: &mut HashMap<ConversationKey, CallStatus>, key: &ConversationKey, in_progress: bool) {
    let now = Utc::now();
    let last_call_time = calls
        .get(key)
        .map_or(now, |prev| prev.last_call_time.max(now));

    calls.insert(
        key.clone(),
        CallStatus {
            in_progress,
            last_call_time,
        },
    );
}

/// Marks a conversation's call finished on drop.
#[derive(Debug)]
pub struct CallGuard<'a> {
    tracker: &'a CallStateTracker,
    key: ConversationKey,
}

impl CallGuard<'_> {
    pub fn key(&self) -> &ConversationKey {
        &self.key
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.tracker.set_in_progress(&self.key, false);
    }
}
