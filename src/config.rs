use std::time::Duration;

use crate::constants::{DEFAULT_BASE_URL, POLL_INTERVAL_MS, REQUEST_TIMEOUT_SECS};

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}
