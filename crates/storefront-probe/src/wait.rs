//! Wait Mechanisms
//!
//! Bounded polling. Every wait in the crate is "check, sleep one interval,
//! check again" until a deadline; there are no fixed-duration pauses.
//! The condition is always checked at least once, even with a zero timeout.

use std::time::{Duration, Instant};

/// Default timeout for wait operations (4 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 4000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Start a deadline from now
    #[must_use]
    pub fn start(&self) -> Deadline {
        Deadline::new(self.timeout(), self.poll_interval())
    }
}

/// A running wait window.
///
/// ```ignore
/// let deadline = options.start();
/// loop {
///     if condition_holds().await? {
///         return Ok(());
///     }
///     if !deadline.tick().await {
///         return Err(timeout_error);
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout: Duration,
    poll_interval: Duration,
}

impl Deadline {
    /// Create a deadline starting now
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            start: Instant::now(),
            timeout,
            poll_interval,
        }
    }

    /// Time spent so far
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the window is over
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.timeout
    }

    /// Total window
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sleep one polling interval, clipped to the remaining window.
    /// Returns `false` once the window is over.
    pub async fn tick(&self) -> bool {
        let elapsed = self.elapsed();
        if elapsed >= self.timeout {
            return false;
        }
        let remaining = self.timeout - elapsed;
        tokio::time::sleep(self.poll_interval.min(remaining)).await;
        true
    }
}
