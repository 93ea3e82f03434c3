//! Shared core of the stock dashboard.
//!
//! Everything here is free of I/O so the native client and the browser
//! frontend drive the same state machine:
//! - `model`: request/response bodies of the pricing backend.
//! - `series`: wide price rows, the deduplicating series and the
//!   transposition from both backend shapes.
//! - `sync`: the generation-guarded synchronizer.
//! - `selection`, `params` and `search` hold grid-side state.
pub mod error;
pub mod model;
pub mod params;
pub mod routes;
pub mod search;
pub mod selection;
pub mod series;
pub mod sync;

pub use error::{ClientError, Result};
pub use model::{FeedResponse, FeedTick, HistoryResponse, PriceHistory, StockParameters};
pub use params::{ParameterBook, ParameterEdit};
pub use selection::Selection;
pub use series::{PricePoint, PriceSeries};
pub use sync::{Generation, LoadRequest, Outcome, PollRequest, SyncState, Synchronizer};
