//! Worker pool and rate limiting for one crawl run
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore (the worker pool)
//! - Global request pacing via a shared ticker (the rate limiter)
//!
//! Both belong to a single run and are dropped with it.

use crate::config::CrawlerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{AcquireError, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{interval, Interval, MissedTickBehavior};

/// A worker-pool slot held for the duration of one page visit
///
/// The slot returns to the pool when this value is dropped, on every exit
/// path of the visit.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
}

/// Scheduler gates every fetch behind a worker slot and a rate-limit tick
///
/// The scheduler coordinates:
/// - Global concurrency limits (at most `worker_pool_size` visits in flight)
/// - Global request rate (one request per `request_delay_ms`, whatever the
///   pool size)
#[derive(Debug)]
pub struct Scheduler {
    /// Counting semaphore for limiting concurrent fetches
    worker_pool: Arc<Semaphore>,

    /// Shared ticker; each tick admits exactly one waiting visit
    ticker: Mutex<Interval>,

    pool_size: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &CrawlerConfig) -> Self {
        Self::with_limits(config.worker_pool_size, config.request_delay())
    }

    /// Creates a scheduler from explicit limits
    ///
    /// A zero pool size or delay is raised to the smallest usable value.
    pub fn with_limits(pool_size: usize, request_delay: Duration) -> Self {
        let pool_size = pool_size.max(1);
        let mut ticker = interval(request_delay.max(Duration::from_millis(1)));
        // Idle periods do not bank ticks for a later burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            worker_pool: Arc::new(Semaphore::new(pool_size)),
            ticker: Mutex::new(ticker),
            pool_size,
        }
    }

    /// Waits for a free worker slot, then for the next rate-limiter tick
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerSlot)` - The slot to hold while fetching
    /// * `Err(AcquireError)` - The pool has been closed
    pub async fn acquire(&self) -> Result<WorkerSlot, AcquireError> {
        let permit = Arc::clone(&self.worker_pool).acquire_owned().await?;
        self.ticker.lock().await.tick().await;
        Ok(WorkerSlot { _permit: permit })
    }

    /// Number of slots currently free
    pub fn available_slots(&self) -> usize {
        self.worker_pool.available_permits()
    }

    /// Total number of slots
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}
