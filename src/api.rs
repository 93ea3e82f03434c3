//! HTTP client for the pricing backend.
//!
//! Every call maps a non-2xx status to `ClientError::Status`, a missing
//! response to `ClientError::Network` and an undecodable body to
//! `ClientError::Malformed`.
use serde::de::DeserializeOwned;
use serde::Serialize;
use stock_dashboard_common::model::{
    FeedResponse, HistoryResponse, ParametersResponse, StockParameters, TickerRequest,
    TickersResponse, UpdateRequest,
};
use stock_dashboard_common::params::expect_single;
use stock_dashboard_common::routes::{self, endpoint};
use stock_dashboard_common::{ClientError, Result};

use crate::config::DashboardConfig;

#[derive(Clone, Debug)]
pub struct StockClient {
    base_url: String,
    http: reqwest::Client,
}

impl StockClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidInput(format!(
                "base url must start with http:// or https://, got {base_url:?}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(network)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tickers(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(endpoint(&self.base_url, routes::TICKERS))
            .send()
            .await
            .map_err(network)?;
        let body: TickersResponse = decode(response).await?;
        Ok(body.tickers)
    }

    pub async fn fetch_parameters(&self, tickers: &[String]) -> Result<Vec<StockParameters>> {
        let body: ParametersResponse = self
            .post_json(routes::STOCKS, &TickerRequest::new(tickers))
            .await?;
        Ok(body.stocks)
    }

    /// Fetch one ticker's parameters, failing with `PartialResult` unless
    /// exactly one record comes back.
    pub async fn fetch_single(&self, ticker: &str) -> Result<StockParameters> {
        expect_single(self.fetch_parameters(&[ticker.to_string()]).await?)
    }

    pub async fn update_parameters(&self, ticker: &str, drift: f64, volatility: f64) -> Result<()> {
        let request = UpdateRequest {
            ticker: ticker.to_string(),
            drift,
            volatility,
        };
        let response = self
            .http
            .put(endpoint(&self.base_url, routes::STOCKS))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        check_status(&response)
    }

    pub async fn price_history(&self, tickers: &[String]) -> Result<HistoryResponse> {
        self.post_json(routes::HISTORY, &TickerRequest::new(tickers))
            .await
    }

    pub async fn feed(&self, tickers: &[String]) -> Result<FeedResponse> {
        self.post_json(routes::FEED, &TickerRequest::new(tickers))
            .await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(endpoint(&self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }
}

fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    Ok(())
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    check_status(&response)?;
    let bytes = response.bytes().await.map_err(network)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}
