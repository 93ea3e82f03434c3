use anyhow::{Context, Result};
use clap::Args;
use stock_dashboard_common::search::{matching_tickers, DEFAULT_SUGGESTIONS};
use stock_dashboard_common::{ClientError, ParameterBook, ParameterEdit, Selection};

use crate::api::StockClient;
use crate::config::DashboardConfig;

#[derive(Debug, Args, Clone)]
pub struct TickersArgs {
    /// Only list tickers starting with this prefix (case-insensitive)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Maximum number of suggestions when searching by prefix
    #[arg(short, long, default_value_t = DEFAULT_SUGGESTIONS)]
    pub limit: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ParamsArgs {
    /// Tickers whose parameters to show
    #[arg(required = true)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct AddArgs {
    /// Ticker to add
    pub ticker: String,

    /// Tickers already selected
    #[arg(long = "to", num_args = 0..)]
    pub selected: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct UpdateArgs {
    /// Ticker to reconfigure
    pub ticker: String,

    /// New drift
    #[arg(long, allow_hyphen_values = true)]
    pub drift: String,

    /// New volatility
    #[arg(long)]
    pub volatility: String,

    /// Other selected tickers to refresh alongside
    #[arg(long, num_args = 0..)]
    pub refresh: Vec<String>,
}

pub async fn run_tickers(config: DashboardConfig, args: TickersArgs) -> Result<()> {
    let client = StockClient::new(&config)?;
    let all = client
        .list_tickers()
        .await
        .context("failed to list tickers")?;
    let shown = match args.prefix.as_deref() {
        Some(prefix) => matching_tickers(&all, prefix, &Selection::new(), args.limit),
        None => all,
    };
    for ticker in shown {
        println!("{ticker}");
    }
    Ok(())
}

pub async fn run_params(config: DashboardConfig, args: ParamsArgs) -> Result<()> {
    let client = StockClient::new(&config)?;
    let mut book = ParameterBook::new();
    book.replace_all(
        client
            .fetch_parameters(&args.tickers)
            .await
            .context("failed to fetch stock parameters")?,
    );
    print!("{}", render_grid(&book));
    Ok(())
}

pub async fn run_add(config: DashboardConfig, args: AddArgs) -> Result<()> {
    let client = StockClient::new(&config)?;
    let mut selection: Selection = args.selected.iter().cloned().collect();
    let mut book = ParameterBook::new();
    if !selection.is_empty() {
        book.replace_all(client.fetch_parameters(selection.tickers()).await?);
    }

    let added = add_ticker(&client, &mut selection, &mut book, &args.ticker)
        .await
        .with_context(|| format!("cannot add {}", args.ticker))?;
    if !added {
        println!("{} is already selected", args.ticker);
    }
    print!("{}", render_grid(&book));
    Ok(())
}

pub async fn run_update(config: DashboardConfig, args: UpdateArgs) -> Result<()> {
    let client = StockClient::new(&config)?;
    let edit = ParameterEdit::parse(&args.drift, &args.volatility)?;

    let mut selection: Selection = args.refresh.iter().cloned().collect();
    selection.add(args.ticker.clone());

    let mut book = ParameterBook::new();
    update_and_refresh(&client, &selection, &mut book, &args.ticker, edit)
        .await
        .with_context(|| format!("failed to update {}", args.ticker))?;
    print!("{}", render_grid(&book));
    Ok(())
}

/// Add one ticker: fetch its parameters and accept only a single record.
/// Returns `false` without a request when it is already selected.
pub async fn add_ticker(
    client: &StockClient,
    selection: &mut Selection,
    book: &mut ParameterBook,
    ticker: &str,
) -> Result<bool, ClientError> {
    if selection.contains(ticker) {
        return Ok(false);
    }
    let stock = client.fetch_single(ticker).await?;
    selection.add(ticker);
    book.insert(stock);
    Ok(true)
}

/// Persist an edit, then re-fetch every selected ticker so the grid shows
/// exactly what the backend now holds.
pub async fn update_and_refresh(
    client: &StockClient,
    selection: &Selection,
    book: &mut ParameterBook,
    ticker: &str,
    edit: ParameterEdit,
) -> Result<(), ClientError> {
    client
        .update_parameters(ticker, edit.drift, edit.volatility)
        .await?;

    let mut refresh = selection.clone();
    refresh.add(ticker);
    let refreshed = client.fetch_parameters(refresh.tickers()).await?;
    book.replace_all(refreshed);
    Ok(())
}

pub fn render_grid(book: &ParameterBook) -> String {
    let mut out = format!(
        "{:<8} | {:>10} | {:>10} | {:>10}\n",
        "ticker", "open", "volatility", "drift"
    );
    for stock in book.rows() {
        out.push_str(&format!(
            "{:<8} | {:>10.4} | {:>10.4} | {:>10.4}\n",
            stock.ticker, stock.open, stock.volatility, stock.drift
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_dashboard_common::StockParameters;

    #[test]
    fn grid_lists_rows_in_book_order() {
        let mut book = ParameterBook::new();
        for (ticker, drift) in [("MSFT", 0.02), ("AAPL", 0.05)] {
            book.insert(StockParameters {
                ticker: ticker.into(),
                open: 100.0,
                drift,
                volatility: 0.2,
            });
        }

        let grid = render_grid(&book);
        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ticker"));
        assert!(lines[1].starts_with("MSFT"));
        assert!(lines[2].contains("0.0500"));
    }
}
