//! Browser-side calls to the pricing backend.
//!
//! The base URL is fixed at build time: `BFF_HOST=http://... trunk build`.
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stock_dashboard_common::model::{
    FeedResponse, HistoryResponse, ParametersResponse, StockParameters, TickerRequest,
    TickersResponse, UpdateRequest,
};
use stock_dashboard_common::routes::{self, DEFAULT_BASE_URL, endpoint};
use stock_dashboard_common::{ClientError, ParameterEdit, Result};

pub fn base_url() -> &'static str {
    option_env!("BFF_HOST").unwrap_or(DEFAULT_BASE_URL)
}

pub async fn list_tickers() -> Result<Vec<String>> {
    let response = Request::get(&endpoint(base_url(), routes::TICKERS))
        .send()
        .await
        .map_err(network)?;
    let body: TickersResponse = decode(response).await?;
    Ok(body.tickers)
}

pub async fn fetch_parameters(tickers: &[String]) -> Result<Vec<StockParameters>> {
    let body: ParametersResponse = post_json(routes::STOCKS, &TickerRequest::new(tickers)).await?;
    Ok(body.stocks)
}

pub async fn update_parameters(ticker: &str, edit: ParameterEdit) -> Result<()> {
    let request = UpdateRequest {
        ticker: ticker.to_string(),
        drift: edit.drift,
        volatility: edit.volatility,
    };
    let response = Request::put(&endpoint(base_url(), routes::STOCKS))
        .json(&request)
        .map_err(|err| ClientError::Malformed(err.to_string()))?
        .send()
        .await
        .map_err(network)?;
    check_status(&response)
}

/// Persist an edit, then re-fetch every ticker in `refresh` so the grid can
/// be replaced with what the backend now holds.
pub async fn update_and_refetch(
    ticker: &str,
    edit: ParameterEdit,
    refresh: &[String],
) -> Result<Vec<StockParameters>> {
    update_parameters(ticker, edit).await?;
    fetch_parameters(refresh).await
}

pub async fn price_history(tickers: &[String]) -> Result<HistoryResponse> {
    post_json(routes::HISTORY, &TickerRequest::new(tickers)).await
}

pub async fn feed(tickers: &[String]) -> Result<FeedResponse> {
    post_json(routes::FEED, &TickerRequest::new(tickers)).await
}

async fn post_json<B, R>(path: &str, body: &B) -> Result<R>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let response = Request::post(&endpoint(base_url(), path))
        .json(body)
        .map_err(|err| ClientError::Malformed(err.to_string()))?
        .send()
        .await
        .map_err(network)?;
    decode(response).await
}

fn check_status(response: &Response) -> Result<()> {
    if !response.ok() {
        return Err(ClientError::Status(response.status()));
    }
    Ok(())
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
    check_status(&response)?;
    let text = response.text().await.map_err(network)?;
    Ok(serde_json::from_str(&text)?)
}

fn network(err: gloo_net::Error) -> ClientError {
    ClientError::Network(err.to_string())
}
