use chrono::{DateTime, Utc};

pub fn price_label(price: f64) -> String {
    format!("${price:.2}")
}

pub fn parameter_label(value: f64) -> String {
    format!("{value:.4}")
}

pub fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// `AAPL: $101.00 at 2025-01-06 14:31`
pub fn latest_label(ticker: &str, price: f64, timestamp: DateTime<Utc>) -> String {
    format!("{ticker}: {} at {}", price_label(price), time_label(timestamp))
}
