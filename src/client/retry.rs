// Throttling retry policy
use rand::Rng;
use std::time::Duration;

use crate::config::{BackoffPolicy, RetryConfig};

const TOO_MANY_REQUESTS: u16 = 429;
const REQUEST_TIMEOUT: u16 = 408;

impl RetryConfig {
    /// Whether `status` counts as throttling under this policy
    pub fn is_throttled(&self, status: u16) -> bool {
        status == TOO_MANY_REQUESTS || (self.retry_on_timeout && status == REQUEST_TIMEOUT)
    }

    /// Retry decision for a response, given how many retries already happened
    pub fn should_retry(&self, status: u16, retries: u32) -> bool {
        self.is_throttled(status) && retries < self.max_retries
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let seconds = match self.backoff {
            BackoffPolicy::Exponential => {
                self.exponential_base_seconds + self.exponential_factor.powi(attempt as i32)
            }
            BackoffPolicy::Random => {
                if self.random_max_seconds > self.random_min_seconds {
                    rand::thread_rng().gen_range(self.random_min_seconds..self.random_max_seconds)
                } else {
                    self.random_min_seconds
                }
            }
        };
        Duration::from_secs_f64(seconds.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delays_follow_the_curve() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_delay(0), Duration::from_secs_f64(1.5));
        assert_eq!(config.backoff_delay(2), Duration::from_secs_f64(0.5 + 1.4f64.powi(2)));
    }

    #[test]
    fn random_delays_stay_in_bounds() {
        let config = RetryConfig {
            backoff: BackoffPolicy::Random,
            ..RetryConfig::default()
        };
        for attempt in 0..20 {
            let delay = config.backoff_delay(attempt).as_secs_f64();
            assert!((1.0..3.0).contains(&delay), "delay {delay} out of bounds");
        }
    }

    #[test]
    fn timeout_retry_is_optional() {
        let mut config = RetryConfig::default();
        assert!(config.should_retry(408, 0));
        config.retry_on_timeout = false;
        assert!(!config.should_retry(408, 0));
        assert!(config.should_retry(429, 4));
        assert!(!config.should_retry(429, 5));
        assert!(!config.should_retry(500, 0));
    }
}
