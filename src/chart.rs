use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use stock_dashboard_common::{PriceSeries, Selection};
use textplots::{Chart, Plot, Shape};
use tokio::sync::watch;

use crate::api::StockClient;
use crate::config::DashboardConfig;
use crate::live::LiveSession;

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Tickers to chart (e.g. AAPL MSFT)
    #[arg(required = true)]
    pub tickers: Vec<String>,

    /// Seconds of live polling to add on top of the history before plotting
    #[arg(short, long, default_value_t = 30)]
    pub duration_secs: u64,

    /// Chart width in characters
    #[arg(long, default_value_t = 120)]
    pub width: u32,

    /// Chart height in characters
    #[arg(long, default_value_t = 30)]
    pub height: u32,
}

pub async fn run(config: DashboardConfig, args: ChartArgs) -> Result<()> {
    let client = StockClient::new(&config).context("failed to build backend client")?;
    let session = LiveSession::new(client, config.poll_interval);

    let selection: Selection = args.tickers.iter().cloned().collect();
    let (_selection_tx, selection_rx) = watch::channel(selection);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let duration = Duration::from_secs(args.duration_secs);
    println!(
        "Collecting prices for {}s (history + live feed)...",
        duration.as_secs()
    );

    let session_task = tokio::spawn(session.run(selection_rx, shutdown_rx));
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    let _ = shutdown_tx.send(true);
    let sync = session_task.await.context("live session task panicked")??;

    if let Some(err) = sync.error() {
        bail!("price history unavailable: {err}");
    }
    let series = sync.series();
    if series.len() < 2 {
        bail!("not enough data points to render a chart");
    }

    for ticker in selection_order(&args.tickers, series) {
        render_chart(&ticker, series, args.width, args.height);
    }
    Ok(())
}

fn selection_order(requested: &[String], series: &PriceSeries) -> Vec<String> {
    let present = series.tickers();
    requested
        .iter()
        .filter(|ticker| present.contains(ticker))
        .cloned()
        .collect()
}

/// `(seconds since first row, price)` samples for one ticker.
fn chart_samples(series: &PriceSeries, ticker: &str) -> Vec<(f32, f32)> {
    let column = series.column(ticker);
    let Some((origin, _)) = column.first().copied() else {
        return Vec::new();
    };
    column
        .into_iter()
        .map(|(timestamp, price)| {
            let elapsed = (timestamp - origin).num_milliseconds() as f64 / 1000.0;
            (elapsed as f32, price as f32)
        })
        .collect()
}

fn render_chart(ticker: &str, series: &PriceSeries, width: u32, height: u32) {
    let samples = chart_samples(series, ticker);
    if samples.len() < 2 {
        println!("{ticker}: not enough samples to plot");
        return;
    }

    let max_time = samples.last().map(|(t, _)| *t).unwrap_or(1.0).max(1e-3);
    let min_price = samples.iter().map(|(_, p)| *p).fold(f32::INFINITY, f32::min);
    let max_price = samples
        .iter()
        .map(|(_, p)| *p)
        .fold(f32::NEG_INFINITY, f32::max);

    println!(
        "{ticker}: {} samples over {:.0}s, price range {:.2} → {:.2}",
        samples.len(),
        max_time,
        min_price,
        max_price
    );

    Chart::new(width.max(40), height.max(10), 0.0, max_time)
        .lineplot(&Shape::Lines(&samples))
        .display();
    println!();
}
