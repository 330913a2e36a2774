//! Polling policy: backoff schedule and network-failure budget.

use std::time::Duration;
use tokio::time::Instant;

/// Delay before the second status query.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(2000);

/// Growth factor applied to the delay after every poll that does not settle.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;

/// Upper bound for the delay between status queries.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Consecutive failed status queries tolerated before giving up.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Timeout for a single HTTP request to the relay.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunable polling constants.
///
/// The defaults are the production schedule: 2s, x1.5, capped at 10s, and
/// giving up after the sixth consecutive failure.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub initial_delay: Duration,
    pub backoff_factor: f64,
    pub max_delay: Duration,
    pub max_consecutive_failures: u32,
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PollConfig {
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Factors below 1.0 are raised to 1.0 so the delay never shrinks.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Mutable poll state owned by one verification call.
#[derive(Debug)]
pub struct PollState {
    delay: Duration,
    factor: f64,
    max_delay: Duration,
    failures: u32,
    max_failures: u32,
    status_queries: u32,
    started: Instant,
}

impl PollState {
    /// Start a fresh schedule. `started` is the instant the session was created.
    pub fn new(config: &PollConfig, started: Instant) -> Self {
        Self {
            delay: config.initial_delay,
            factor: config.backoff_factor.max(1.0),
            max_delay: config.max_delay,
            failures: 0,
            max_failures: config.max_consecutive_failures,
            status_queries: 0,
            started,
        }
    }

    /// Take the delay to wait now and grow it for the following wait.
    pub fn advance_delay(&mut self) -> Duration {
        let current = self.delay;
        let grown = current.as_secs_f64() * self.factor;
        self.delay = if grown >= self.max_delay.as_secs_f64() {
            self.max_delay.max(current)
        } else {
            Duration::from_secs_f64(grown).max(current)
        };
        current
    }

    /// Count a status query about to be issued.
    pub fn record_query(&mut self) {
        self.status_queries += 1;
    }

    /// Any successful relay response clears the failure streak.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    /// Count a failed status query. Returns `true` once the budget is exceeded.
    pub fn record_failure(&mut self) -> bool {
        self.failures += 1;
        self.failures > self.max_failures
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    pub fn status_queries(&self) -> u32 {
        self.status_queries
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Strictly greater than: a poll exactly at the deadline still runs.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.elapsed() > timeout
    }
}
