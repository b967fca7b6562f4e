//! Workflow configuration.

use std::time::Duration;

/// Workflow configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Interval between upload status polls
    pub poll_interval: Duration,
    /// Poll ceiling; reaching it without a terminal status times the
    /// job out
    pub max_poll_attempts: u32,
    /// Retries for remote source fetches (not for status polls)
    pub fetch_retries: u32,
    /// Base delay for fetch retry backoff
    pub fetch_retry_base_delay: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 60,
            fetch_retries: 3,
            fetch_retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl WorkflowConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_millis(
                std::env::var("REELHIRE_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            max_poll_attempts: std::env::var("REELHIRE_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            fetch_retries: std::env::var("REELHIRE_FETCH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            fetch_retry_base_delay: Duration::from_millis(
                std::env::var("REELHIRE_FETCH_RETRY_BASE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500),
            ),
        }
    }
}
