pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod constants;
pub mod live;
pub mod logging;
pub mod params;
pub mod tail;

pub use api::StockClient;
pub use config::DashboardConfig;
pub use live::{LiveSession, SyncEvent};
