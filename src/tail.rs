use anyhow::{Context, Result};
use clap::Args;
use stock_dashboard_common::{PricePoint, Selection};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};

use crate::api::StockClient;
use crate::config::DashboardConfig;
use crate::live::{LiveSession, SyncEvent};

#[derive(Debug, Args, Clone)]
pub struct TailArgs {
    /// Tickers to follow (e.g. AAPL MSFT)
    pub tickers: Vec<String>,

    /// Read `add X`, `remove X` and `clear` commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Stop after printing this many live rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Selection edit typed on stdin in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    Add(String),
    Remove(String),
    Clear,
}

impl SelectionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_ascii_lowercase();
        let ticker = words.next().map(str::to_ascii_uppercase);
        match (verb.as_str(), ticker) {
            ("add" | "+", Some(ticker)) => Some(SelectionCommand::Add(ticker)),
            ("remove" | "rm" | "-", Some(ticker)) => Some(SelectionCommand::Remove(ticker)),
            ("clear", None) => Some(SelectionCommand::Clear),
            _ => None,
        }
    }

    /// Apply to `selection`, returning whether it changed.
    pub fn apply(&self, selection: &mut Selection) -> bool {
        match self {
            SelectionCommand::Add(ticker) => selection.add(ticker.clone()),
            SelectionCommand::Remove(ticker) => selection.remove(ticker),
            SelectionCommand::Clear => {
                let changed = !selection.is_empty();
                selection.clear();
                changed
            }
        }
    }
}

pub async fn run(config: DashboardConfig, args: TailArgs) -> Result<()> {
    let client = StockClient::new(&config).context("failed to build backend client")?;
    let session = LiveSession::new(client, config.poll_interval);
    let mut events = session.subscribe();

    let initial: Selection = args.tickers.iter().cloned().collect();
    let (selection_tx, selection_rx) = watch::channel(initial);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let session_task = tokio::spawn(session.run(selection_rx, shutdown_rx));
    let stdin_task = if args.interactive {
        println!("Commands: add <TICKER>, remove <TICKER>, clear");
        Some(tokio::spawn(read_commands(selection_tx)))
    } else {
        drop(selection_tx);
        None
    };

    println!("Following {} via {}...", args.tickers.join(", "), config.base_url);
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = print_events(&mut events, args.limit) => {}
    }

    let _ = shutdown_tx.send(true);
    if let Some(task) = stdin_task {
        task.abort();
    }
    session_task.await.context("live session task panicked")??;
    Ok(())
}

async fn read_commands(selection: watch::Sender<Selection>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match SelectionCommand::parse(&line) {
            Some(command) => {
                selection.send_if_modified(|current| command.apply(current));
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("unrecognised command: {}", line.trim()),
        }
    }
}

async fn print_events(events: &mut broadcast::Receiver<SyncEvent>, limit: Option<usize>) {
    let mut printed = 0usize;
    loop {
        match events.recv().await {
            Ok(SyncEvent::Loading { tickers, .. }) => {
                println!("Loading history for {}...", tickers.join(", "));
            }
            Ok(SyncEvent::Seeded { points, .. }) => {
                println!("Seeded {} historical rows", points.len());
                for point in points.iter().rev().take(5).rev() {
                    println!("  {}", format_point(point));
                }
            }
            Ok(SyncEvent::Appended(point)) => {
                println!("+ {}", format_point(&point));
                printed += 1;
                if limit.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
            Ok(SyncEvent::Duplicate(_)) => {}
            Ok(SyncEvent::HistoryFailed(err)) => println!("History unavailable: {err}"),
            Ok(SyncEvent::Cleared) => println!("Select stocks..."),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                eprintln!("skipped {skipped} updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// One table line: `timestamp | TICKER price | ...`.
pub fn format_point(point: &PricePoint) -> String {
    let prices = point
        .prices
        .iter()
        .map(|(ticker, price)| format!("{ticker:>6} {price:>10.4}"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{:>20} | {}", point.timestamp.format("%Y-%m-%d %H:%M:%S"), prices)
}
