use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::chart::ChartArgs;
use crate::config::DashboardConfig;
use crate::constants::{BASE_URL_ENV, DEFAULT_BASE_URL, POLL_INTERVAL_MS, REQUEST_TIMEOUT_SECS};
use crate::params::{AddArgs, ParamsArgs, TickersArgs, UpdateArgs};
use crate::tail::TailArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Stock simulation dashboard client")]
pub struct Cli {
    /// Base URL of the pricing backend
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    host: String,

    /// Feed polling period in milliseconds
    #[arg(long, global = true, default_value_t = POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            base_url: self.host.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }

    pub fn command(self) -> Command {
        self.command
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List or search the tickers known to the backend
    Tickers(TickersArgs),
    /// Show drift/volatility parameters for tickers
    Params(ParamsArgs),
    /// Add one ticker to a selection, failing unless exactly one record comes back
    Add(AddArgs),
    /// Change a ticker's drift and volatility, then refresh the grid
    Update(UpdateArgs),
    /// Follow history plus live feed rows for a selection
    Watch(TailArgs),
    /// Collect history plus live feed and render an ASCII price chart
    Chart(ChartArgs),
}
