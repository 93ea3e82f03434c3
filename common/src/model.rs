use serde::{Deserialize, Serialize};

/// Simulation parameters of one ticker as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockParameters {
    pub ticker: String,
    pub open: f64,
    pub drift: f64,
    pub volatility: f64,
}

/// Body shared by every "by ticker list" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerRequest {
    pub tickers: Vec<String>,
}

impl TickerRequest {
    pub fn new(tickers: &[String]) -> Self {
        Self {
            tickers: tickers.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickersResponse {
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersResponse {
    pub stocks: Vec<StockParameters>,
}

/// Body of the `PUT /api/v1/stocks` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub ticker: String,
    pub drift: f64,
    pub volatility: f64,
}

/// One ticker's column of the historical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub ticker: String,
    pub prices: Vec<f64>,
}

/// Columnar history: `timestamp[i]` pairs with `prices[i]` of every ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub timestamp: Vec<String>,
    pub price_history: Vec<PriceHistory>,
}

/// Latest price of one ticker as returned by a feed poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedTick {
    pub ticker: String,
    pub price: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub feed: Vec<FeedTick>,
}
