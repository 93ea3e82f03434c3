pub use stock_dashboard_common::routes::DEFAULT_BASE_URL;

pub const BASE_URL_ENV: &str = "BFF_HOST";
pub const POLL_INTERVAL_MS: u64 = 4_000;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
