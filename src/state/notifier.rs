//! Refresh notification for broadcasting bulk data replaces to dependents.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Opaque marker for one bulk data replace.
///
/// Tokens are strictly increasing across a process, so a dependent that
/// caches derived data can compare tokens to decide whether its cache is
/// stale, and shells that key view identity on the token still get a
/// fresh key per replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RefreshToken(i64);

static LAST_TOKEN: AtomicI64 = AtomicI64::new(0);

impl RefreshToken {
    /// Mint the next token: the current time in milliseconds, bumped past
    /// the previous token when the clock has not advanced.
    pub fn next() -> Self {
        let now = Utc::now().timestamp_millis();
        let prev = LAST_TOKEN
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(prev.max(now - 1) + 1)
            })
            .unwrap_or(now - 1);
        Self(prev.max(now - 1) + 1)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Pub/sub notifier for bulk data replaces.
#[derive(Clone)]
pub struct RefreshNotifier {
    tx: broadcast::Sender<RefreshToken>,
}

impl Default for RefreshNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshNotifier {
    /// Create a new RefreshNotifier with a buffer of 16 tokens.
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to receive refresh tokens.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshToken> {
        self.tx.subscribe()
    }

    /// Broadcast a token to all subscribers.
    pub fn notify(&self, token: RefreshToken) {
        let _ = self.tx.send(token);
    }
}
