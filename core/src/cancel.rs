//! Cooperative cancellation of superseded comparisons.
//!
//! Starting a comparison takes a fresh [`RequestToken`]. A cooperative comparison that
//! finishes after a newer one has started is stale: its result is dropped at publish time
//! rather than aborted mid-flight.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic token source shared by everything that may start a comparison.
#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: AtomicU64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token newer than every previously issued one.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Returns `value` when `token` is still the latest request, otherwise discards it.
    pub fn publish<T>(&self, token: RequestToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            log::debug!(
                "discarding stale comparison result (token {}, latest {})",
                token.0,
                self.latest.load(Ordering::SeqCst)
            );
            None
        }
    }
}
