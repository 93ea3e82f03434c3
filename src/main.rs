use anyhow::Result;
use clap::Parser;
use stock_dashboard::cli::{Cli, Command};
use stock_dashboard::{chart, logging, params, tail};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config = cli.config();

    match cli.command() {
        Command::Tickers(args) => params::run_tickers(config, args).await,
        Command::Params(args) => params::run_params(config, args).await,
        Command::Add(args) => params::run_add(config, args).await,
        Command::Update(args) => params::run_update(config, args).await,
        Command::Watch(args) => tail::run(config, args).await,
        Command::Chart(args) => chart::run(config, args).await,
    }
}
