pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const TICKERS: &str = "/api/v1/tickers";
pub const STOCKS: &str = "/api/v1/stocks";
pub const HISTORY: &str = "/api/v1/stocks/history";
pub const FEED: &str = "/api/v1/stocks/feed";

/// Join a base URL (with or without trailing slash) and an API path.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), path)
}
