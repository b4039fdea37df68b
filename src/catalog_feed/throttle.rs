//! Outbound request throttling for the catalog feed.
//!
//! Provides rate limiting to keep the sync within the feed's request budget.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Trait for outbound request throttling.
#[async_trait]
pub trait RequestThrottler: Send + Sync {
    /// Wait until the caller is allowed to send one request.
    async fn acquire(&self);
}

/// Leaky-bucket throttler shared by every worker of a pool.
///
/// Requests leave the bucket one `interval` apart. Each caller reserves the next
/// free slot under the lock and sleeps outside of it.
///
/// The very first request also waits one full interval.
pub struct IntervalThrottler {
    interval: Duration,
    last_slot: Mutex<Option<Instant>>,
}

impl IntervalThrottler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    async fn reserve_slot(&self) -> Instant {
        let mut last_slot = self.last_slot.lock().await;
        let now = Instant::now();
        let base = match *last_slot {
            Some(last) if last > now => last,
            _ => now,
        };
        let slot = base + self.interval;
        *last_slot = Some(slot);
        slot
    }
}

#[async_trait]
impl RequestThrottler for IntervalThrottler {
    async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let slot = self.reserve_slot().await;
        tokio::time::sleep_until(slot).await;
    }
}

/// No-op throttler that never waits.
/// Used when the request interval is configured as zero.
pub struct NoOpThrottler;

#[async_trait]
impl RequestThrottler for NoOpThrottler {
    async fn acquire(&self) {}
}
