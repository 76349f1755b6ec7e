//! Tick source and the blocking wait primitive built on it.
//!
//! [`WaitTimer::wait_seconds`] arms its [`TickSource`], counts ticks into a
//! counter it owns, and disarms the source once the count is reached. The
//! calling node does nothing else while it waits.
//!
//! # Example
//!
//! ```
//! use doorlock_hardware::timer::{TokioTickSource, WaitTimer};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> doorlock_hardware::Result<()> {
//! let mut timer = WaitTimer::new(TokioTickSource::new(Duration::from_secs(1)));
//!
//! let started = tokio::time::Instant::now();
//! timer.wait_seconds(3).await?;
//! assert!(started.elapsed() >= Duration::from_secs(3));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::trace;

use crate::error::{HardwareError, Result};
use crate::traits::TickSource;

/// Default tick period (one second).
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick source backed by a Tokio interval.
#[derive(Debug)]
pub struct TokioTickSource {
    period: Duration,
    interval: Option<Interval>,
}

impl TokioTickSource {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

impl Default for TokioTickSource {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

impl TickSource for TokioTickSource {
    fn start(&mut self) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.interval = Some(interval);
    }

    async fn tick(&mut self) -> Result<()> {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                Ok(())
            }
            None => Err(HardwareError::other("Tick source not started")),
        }
    }

    fn stop(&mut self) {
        self.interval = None;
    }
}

/// Timer context owning the elapsed-tick counter.
#[derive(Debug)]
pub struct WaitTimer<T> {
    source: T,
    elapsed: u32,
}

impl<T: TickSource> WaitTimer<T> {
    pub fn new(source: T) -> Self {
        Self { source, elapsed: 0 }
    }

    /// Ticks counted by the wait in progress (0 when idle).
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Block for `n` ticks of the source.
    ///
    /// The wait cannot be shortened once started. `wait_seconds(0)` returns
    /// immediately without arming the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick source fails; the source is disarmed and
    /// the counter reset either way.
    pub async fn wait_seconds(&mut self, n: u32) -> Result<()> {
        if n == 0 {
            return Ok(());
        }

        trace!(ticks = n, "Waiting");
        self.elapsed = 0;
        self.source.start();

        let result = self.count_to(n).await;

        self.source.stop();
        self.elapsed = 0;
        result
    }

    async fn count_to(&mut self, n: u32) -> Result<()> {
        while self.elapsed < n {
            self.source.tick().await?;
            self.elapsed += 1;
        }
        Ok(())
    }
}
