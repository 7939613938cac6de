//! # Quota Gate
//!
//! Bounded admission counter for resource creation.
//!
//! A tracker is shared by every sync pass of one repository and may be hit
//! from several passes at once, so the counter lives behind a mutex. A limit
//! of `0` turns the gate off: every acquire succeeds and nothing is counted.

use core_runtime::config::SyncConfig;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, trace};

/// Admission control for creations.
pub trait QuotaTracker: Send + Sync {
    /// Reserve a slot. Returns `false` without changing state when full.
    fn try_acquire(&self) -> bool;

    /// Give a slot back. Never drops the counter below zero.
    fn release(&self);
}

#[derive(Debug)]
struct QuotaState {
    current: i64,
    limit: i64,
}

/// Mutex-guarded in-memory [`QuotaTracker`].
#[derive(Debug)]
pub struct InMemoryQuotaTracker {
    state: Mutex<QuotaState>,
}

impl InMemoryQuotaTracker {
    /// Create a tracker that already counts `current` resources against
    /// `limit`. A `limit` of `0` means unconstrained.
    ///
    /// Out-of-range inputs are clamped so that `0 <= current <= limit`
    /// holds from the start when a limit is set.
    pub fn new(current: i64, limit: i64) -> Self {
        let limit = limit.max(0);
        let current = if limit > 0 {
            current.clamp(0, limit)
        } else {
            current.max(0)
        };

        Self {
            state: Mutex::new(QuotaState { current, limit }),
        }
    }

    /// Tracker sized from a validated [`SyncConfig`].
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.initial_quota_usage, config.quota_limit)
    }

    /// Unconstrained tracker.
    pub fn unlimited() -> Self {
        Self::new(0, 0)
    }

    pub fn current(&self) -> i64 {
        self.lock().current
    }

    pub fn limit(&self) -> i64 {
        self.lock().limit
    }

    fn lock(&self) -> MutexGuard<'_, QuotaState> {
        // The counter stays consistent even if a holder panicked.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl QuotaTracker for InMemoryQuotaTracker {
    fn try_acquire(&self) -> bool {
        let mut state = self.lock();
        if state.limit == 0 {
            return true;
        }

        if state.current >= state.limit {
            debug!(
                current = state.current,
                limit = state.limit,
                "quota full, denying acquire"
            );
            return false;
        }

        state.current += 1;
        trace!(current = state.current, limit = state.limit, "quota slot acquired");
        true
    }

    fn release(&self) {
        let mut state = self.lock();
        if state.limit == 0 {
            return;
        }

        if state.current > 0 {
            state.current -= 1;
        }
        trace!(current = state.current, limit = state.limit, "quota slot released");
    }
}
