//! Shared scan deadline.
//!
//! One `ScanDeadline` is derived per scan and cloned into every limiter
//! acquisition and probe. It expires when the wall-clock budget runs out or
//! when the parent cancellation token fires, whichever comes first.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Budgets too large to represent as an instant are clamped to this horizon.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// A cancellable, cloneable deadline context.
#[derive(Debug, Clone)]
pub struct ScanDeadline {
    at: Instant,
    token: CancellationToken,
}

impl ScanDeadline {
    /// Start a deadline `budget` from now, independent of any outer cancellation.
    pub fn after(budget: Duration) -> Self {
        Self::child_of(&CancellationToken::new(), budget)
    }

    /// Start a deadline `budget` from now that also expires when `parent` is cancelled.
    pub fn child_of(parent: &CancellationToken, budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            at: now
                .checked_add(budget)
                .unwrap_or_else(|| now + FAR_FUTURE),
            token: parent.child_token(),
        }
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        if self.token.is_cancelled() {
            return Duration::ZERO;
        }
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has already passed or been cancelled.
    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.at
    }

    /// Expire the deadline early for every holder of a clone.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Resolves once the deadline expires.
    pub async fn expired(&self) {
        tokio::select! {
            _ = sleep_until(self.at) => {}
            _ = self.token.cancelled() => {}
        }
    }
}
