//! In-process stand-in for the pricing backend.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use stock_dashboard::DashboardConfig;
use stock_dashboard_common::model::{
    FeedResponse, FeedTick, HistoryResponse, ParametersResponse, PriceHistory, StockParameters,
    TickerRequest, TickersResponse, UpdateRequest,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct MockState {
    pub tickers: Vec<String>,
    pub stocks: HashMap<String, StockParameters>,
    pub history_timestamps: Vec<String>,
    pub history_prices: HashMap<String, Vec<f64>>,
    pub history_delay: HashMap<String, Duration>,
    pub fail_history: bool,
    pub feeds: VecDeque<Vec<(String, f64, String)>>,
    pub last_feed: Option<Vec<(String, f64, String)>>,
    /// Feed polls answered with 503 before `feeds` is consulted.
    pub failing_feeds: usize,
    pub history_calls: Vec<Vec<String>>,
    pub feed_calls: Vec<Vec<String>>,
    pub parameter_calls: Vec<Vec<String>>,
    pub updates: Vec<UpdateRequest>,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/v1/tickers", get(tickers))
            .route("/api/v1/stocks", post(parameters).put(update))
            .route("/api/v1/stocks/history", post(history))
            .route("/api/v1/stocks/feed", post(feed))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn config(&self, poll_interval: Duration) -> DashboardConfig {
        DashboardConfig {
            base_url: format!("http://{}", self.addr),
            poll_interval,
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = self.state.lock().expect("mock state lock");
        f(&mut guard)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn stock(ticker: &str, open: f64, drift: f64, volatility: f64) -> StockParameters {
    StockParameters {
        ticker: ticker.into(),
        open,
        drift,
        volatility,
    }
}

pub fn feed_batch(ticks: &[(&str, f64, &str)]) -> Vec<(String, f64, String)> {
    ticks
        .iter()
        .map(|(ticker, price, timestamp)| (ticker.to_string(), *price, timestamp.to_string()))
        .collect()
}

async fn tickers(State(state): State<Shared>) -> Json<TickersResponse> {
    let guard = state.lock().expect("mock state lock");
    Json(TickersResponse {
        tickers: guard.tickers.clone(),
    })
}

async fn parameters(
    State(state): State<Shared>,
    Json(request): Json<TickerRequest>,
) -> Json<ParametersResponse> {
    let mut guard = state.lock().expect("mock state lock");
    guard.parameter_calls.push(request.tickers.clone());
    let stocks = request
        .tickers
        .iter()
        .filter_map(|ticker| guard.stocks.get(ticker).cloned())
        .collect();
    Json(ParametersResponse { stocks })
}

async fn update(State(state): State<Shared>, Json(request): Json<UpdateRequest>) -> StatusCode {
    let mut guard = state.lock().expect("mock state lock");
    guard.updates.push(request.clone());
    match guard.stocks.get_mut(&request.ticker) {
        Some(stock) => {
            stock.drift = request.drift;
            stock.volatility = request.volatility;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn history(
    State(state): State<Shared>,
    Json(request): Json<TickerRequest>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let (delay, response) = {
        let mut guard = state.lock().expect("mock state lock");
        guard.history_calls.push(request.tickers.clone());
        if guard.fail_history {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        let delay = guard
            .history_delay
            .get(&request.tickers.join(","))
            .copied()
            .unwrap_or_default();
        let response = HistoryResponse {
            timestamp: guard.history_timestamps.clone(),
            price_history: request
                .tickers
                .iter()
                .map(|ticker| PriceHistory {
                    ticker: ticker.clone(),
                    prices: guard.history_prices.get(ticker).cloned().unwrap_or_default(),
                })
                .collect(),
        };
        (delay, response)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    Ok(Json(response))
}

async fn feed(
    State(state): State<Shared>,
    Json(request): Json<TickerRequest>,
) -> Result<Json<FeedResponse>, StatusCode> {
    let mut guard = state.lock().expect("mock state lock");
    guard.feed_calls.push(request.tickers.clone());
    if guard.failing_feeds > 0 {
        guard.failing_feeds -= 1;
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    let next = guard.feeds.pop_front();
    let batch = match next {
        Some(batch) => {
            guard.last_feed = Some(batch.clone());
            batch
        }
        None => guard
            .last_feed
            .clone()
            .ok_or(StatusCode::SERVICE_UNAVAILABLE)?,
    };
    Ok(Json(FeedResponse {
        feed: batch
            .into_iter()
            .filter(|(ticker, _, _)| request.tickers.contains(ticker))
            .map(|(ticker, price, timestamp)| FeedTick {
                ticker,
                price,
                timestamp,
            })
            .collect(),
    }))
}
