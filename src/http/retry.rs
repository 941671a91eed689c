//! Retry policies for HTTP requests.
//!
//! Every CoinGecko endpoint used here is a GET, so the default policy retries.
//! The public API rate-limits per minute; a 429 usually carries `Retry-After`.

use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt.
    None,
    /// Retry on transport failures, 429 and 502/503/504 with exponential
    /// backoff. A `Retry-After` header replaces the computed delay.
    #[default]
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Effective config, or `None` for a single attempt.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(config) => Some(config.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for every wait, including one asked for by `Retry-After`.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Spread each backoff delay by ±25%.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// GET defaults: first retry after a full second, never more than 30 s.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    pub fn retries_on(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Wait before retry number `attempt + 1`.
    ///
    /// A server-provided `Retry-After` is used as-is, capped at `max_delay`.
    /// Otherwise exponential backoff applies.
    pub fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(wait) => wait.min(self.max_delay),
            None => self.backoff(attempt),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_ms = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);
        let capped_ms = base_ms.min(self.max_delay.as_millis() as f64);

        let spread_ms = if self.jitter {
            capped_ms * 0.25 * (rand::random::<f64>() * 2.0 - 1.0)
        } else {
            0.0
        };
        Duration::from_millis((capped_ms + spread_ms).max(0.0) as u64)
    }
}
