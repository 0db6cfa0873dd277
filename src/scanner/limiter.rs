//! Concurrency limiting for probe dispatch.
//!
//! A weighted-semaphore gate: at most `limit` slots are held at any instant.
//! Waiting for a slot is abandoned as soon as the scan deadline expires.

use crate::scanner::deadline::ScanDeadline;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Slot acquisition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimiterError {
    #[error("slot acquisition cancelled")]
    Cancelled,
}

/// A held concurrency slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    /// Give the slot back to the limiter.
    pub fn release(self) {}
}

/// Bounds how many probes may be in flight at once.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyLimiter {
    /// Largest accepted limit.
    pub const MAX_LIMIT: usize = Semaphore::MAX_PERMITS;

    /// Create a limiter allowing `limit` concurrent holders.
    ///
    /// Callers validate `1..=MAX_LIMIT` beforehand; the coordinator rejects
    /// anything else as a configuration error.
    pub fn new(limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot, or fail once `deadline` expires.
    ///
    /// An already expired deadline fails even when slots are free.
    pub async fn acquire(&self, deadline: &ScanDeadline) -> Result<Slot, LimiterError> {
        if deadline.is_expired() {
            return Err(LimiterError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = deadline.expired() => Err(LimiterError::Cancelled),
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit
                .map(|permit| Slot { _permit: permit })
                .map_err(|_| LimiterError::Cancelled),
        }
    }
}
