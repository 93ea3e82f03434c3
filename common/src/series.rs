use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use crate::error::{ClientError, Result};
use crate::model::{FeedResponse, HistoryResponse};

/// One row of the wide price table: an instant plus a price per ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub prices: IndexMap<String, f64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            prices: IndexMap::new(),
        }
    }

    pub fn with_price(mut self, ticker: impl Into<String>, price: f64) -> Self {
        self.prices.insert(ticker.into(), price);
        self
    }

    pub fn price(&self, ticker: &str) -> Option<f64> {
        self.prices.get(ticker).copied()
    }
}

/// Parse a backend RFC 3339 timestamp into a UTC instant.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| ClientError::Malformed(format!("timestamp {raw:?}: {err}")))
}

/// Require exactly one history column per ticker in `expected`.
pub fn check_history_columns(history: &HistoryResponse, expected: &[String]) -> Result<()> {
    let mut columns = IndexSet::new();
    for column in &history.price_history {
        if !expected.contains(&column.ticker) || !columns.insert(column.ticker.as_str()) {
            return Err(ClientError::Malformed(format!(
                "unexpected history column {}",
                column.ticker
            )));
        }
    }
    if let Some(missing) = expected
        .iter()
        .find(|ticker| !columns.contains(ticker.as_str()))
    {
        return Err(ClientError::Malformed(format!(
            "history has no column for {missing}"
        )));
    }
    Ok(())
}

/// Turn the columnar history table into wide rows, one per timestamp index.
///
/// Rows whose timestamp does not parse, or for which some ticker has no
/// price at that index, are skipped rather than half-filled.
pub fn transpose_history(history: &HistoryResponse) -> Vec<PricePoint> {
    history
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let timestamp = match parse_timestamp(raw) {
                Ok(timestamp) => timestamp,
                Err(err) => {
                    log::warn!("skipping history row {index}: {err}");
                    return None;
                }
            };

            let mut point = PricePoint::new(timestamp);
            for column in &history.price_history {
                let Some(price) = column.prices.get(index).copied() else {
                    log::warn!(
                        "skipping history row {index}: no price for {}",
                        column.ticker
                    );
                    return None;
                };
                point.prices.insert(column.ticker.clone(), price);
            }
            Some(point)
        })
        .collect()
}

/// Collapse one feed batch into a single row.
///
/// The batch must be non-empty and every tick must carry the same instant.
pub fn transpose_feed(batch: &FeedResponse) -> Result<PricePoint> {
    let first = batch
        .feed
        .first()
        .ok_or_else(|| ClientError::Malformed("empty feed batch".into()))?;
    let timestamp = parse_timestamp(&first.timestamp)?;

    let mut point = PricePoint::new(timestamp);
    for tick in &batch.feed {
        let tick_timestamp = parse_timestamp(&tick.timestamp)?;
        if tick_timestamp != timestamp {
            return Err(ClientError::Malformed(format!(
                "feed batch mixes timestamps {timestamp} and {tick_timestamp}"
            )));
        }
        point.prices.insert(tick.ticker.clone(), tick.price);
    }
    Ok(point)
}

/// Append-only series with strictly increasing timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    last_seen: Option<DateTime<Utc>>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole series with seed rows, returning how many were
    /// dropped for not being strictly after their predecessor.
    pub fn replace<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = PricePoint>,
    {
        self.clear();
        points
            .into_iter()
            .map(|point| self.push(point))
            .filter(|accepted| !accepted)
            .count()
    }

    /// Append a row unless its timestamp is at or before `last_seen`.
    pub fn push(&mut self, point: PricePoint) -> bool {
        if self
            .last_seen
            .is_some_and(|last_seen| point.timestamp <= last_seen)
        {
            return false;
        }
        self.last_seen = Some(point.timestamp);
        self.points.push(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.last_seen = None;
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every ticker appearing in the series, in first-seen order.
    pub fn tickers(&self) -> Vec<String> {
        self.points
            .iter()
            .flat_map(|point| point.prices.keys())
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect()
    }

    /// The `(timestamp, price)` line of one ticker, skipping rows without it.
    pub fn column(&self, ticker: &str) -> Vec<(DateTime<Utc>, f64)> {
        self.points
            .iter()
            .filter_map(|point| point.price(ticker).map(|price| (point.timestamp, price)))
            .collect()
    }
}
