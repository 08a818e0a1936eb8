//! Retry policy and backoff computation

use crate::config::RetryConfig;
use std::time::Duration;

/// Immutable retry settings for one executor invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub exponential_base: f64,
    pub jitter: bool,
    /// Upper bound of the random fraction added to each delay
    pub jitter_max: f64,
    pub retryable_status_codes: Vec<u16>,
    /// Error category codes retried on hard failures
    pub retryable_errors: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            exponential_base: config.exponential_base,
            jitter: config.jitter,
            jitter_max: config.jitter_max,
            retryable_status_codes: config.retryable_status_codes.clone(),
            retryable_errors: config.retryable_errors.clone(),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_exponential_base(mut self, base: f64) -> Self {
        self.exponential_base = base;
        self
    }

    /// Enable jitter with the given fraction
    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter = true;
        self.jitter_max = fraction;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// `min(initial * base^attempt, max_delay)`
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.exponential_base.powi(exponent);
        self.clamp(secs)
    }

    /// Backoff before retry number `attempt + 1`, jitter included
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_delay_with(attempt, rand::random::<f64>())
    }

    /// Backoff with a caller supplied jitter sample in `[0, 1)`
    pub fn backoff_delay_with(&self, attempt: u32, sample: f64) -> Duration {
        let base = self.base_delay(attempt).as_secs_f64();
        if !self.jitter {
            return self.clamp(base);
        }
        self.clamp(base + base * self.jitter_max * sample)
    }

    /// Delay requested by the upstream, capped at `max_delay`
    pub fn retry_after_delay(&self, seconds: u64) -> Duration {
        Duration::from_secs(seconds).min(self.max_delay)
    }

    fn clamp(&self, secs: f64) -> Duration {
        let max = self.max_delay.as_secs_f64();
        if !secs.is_finite() || secs >= max {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}
