//! Generation-guarded synchronizer for the price chart.
//!
//! The synchronizer owns the series and the selection it belongs to. Every
//! request it hands out carries the generation current at the time; a
//! response is applied only if that generation is still current, so results
//! for a superseded selection are dropped no matter when they resolve.
//!
//! Polls are only handed out once the history seed has been applied, which
//! keeps a late seed from overwriting appended feed rows.
use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::model::{FeedResponse, HistoryResponse};
use crate::selection::Selection;
use crate::series::{
    check_history_columns, transpose_feed, transpose_history, PricePoint, PriceSeries,
};

/// Monotonic tag identifying one selection of tickers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SyncState {
    /// Nothing selected; no network activity.
    #[default]
    Idle,
    /// History fetch issued for the current generation.
    Loading,
    /// Seeded; feed polls extend the series.
    Live,
    /// History fetch failed; nothing is polled until the selection changes.
    Failed(String),
}

/// History fetch to issue for a new selection.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: Generation,
    pub tickers: Vec<String>,
}

/// Feed poll to issue on a timer tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRequest {
    pub generation: Generation,
    pub tickers: Vec<String>,
}

/// What applying a response did to the series.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// History replaced the series.
    Seeded { points: usize, dropped: usize },
    /// A feed row was appended.
    Appended(PricePoint),
    /// A feed row at or before the last seen instant was discarded.
    Duplicate(DateTime<Utc>),
    /// The response belongs to a superseded selection.
    Stale {
        generation: Generation,
        current: Generation,
    },
    /// The response arrived in a state that does not expect it.
    Ignored,
    /// A poll failed or was malformed; the tick is skipped.
    Skipped(ClientError),
    /// The history fetch failed.
    Failed(ClientError),
}

impl Outcome {
    pub fn changed_series(&self) -> bool {
        matches!(self, Outcome::Seeded { .. } | Outcome::Appended(_) | Outcome::Failed(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    selection: Selection,
    generation: Generation,
    state: SyncState,
    series: PriceSeries,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `selection`. A change by value starts a new generation,
    /// clears the series and, unless the selection is empty, returns the
    /// single history fetch to issue.
    pub fn select(&mut self, selection: &Selection) -> Option<LoadRequest> {
        if *selection == self.selection {
            return None;
        }

        self.selection = selection.clone();
        self.generation = self.generation.next();
        self.series.clear();

        if self.selection.is_empty() {
            self.state = SyncState::Idle;
            return None;
        }

        self.state = SyncState::Loading;
        Some(LoadRequest {
            generation: self.generation,
            tickers: self.selection.tickers().to_vec(),
        })
    }

    /// The poll to issue on a timer tick, if any.
    pub fn poll_request(&self) -> Option<PollRequest> {
        if self.state != SyncState::Live || self.selection.is_empty() {
            return None;
        }
        Some(PollRequest {
            generation: self.generation,
            tickers: self.selection.tickers().to_vec(),
        })
    }

    pub fn apply_history(
        &mut self,
        generation: Generation,
        result: Result<HistoryResponse, ClientError>,
    ) -> Outcome {
        if let Some(stale) = self.stale(generation) {
            return stale;
        }
        if self.state != SyncState::Loading {
            return Outcome::Ignored;
        }

        let tickers = self.selection.tickers();
        let checked =
            result.and_then(|history| check_history_columns(&history, tickers).map(|()| history));
        match checked {
            Ok(history) => {
                let dropped = self.series.replace(transpose_history(&history));
                self.state = SyncState::Live;
                Outcome::Seeded {
                    points: self.series.len(),
                    dropped,
                }
            }
            Err(err) => {
                self.series.clear();
                self.state = SyncState::Failed(err.to_string());
                Outcome::Failed(err)
            }
        }
    }

    pub fn apply_feed(
        &mut self,
        generation: Generation,
        result: Result<FeedResponse, ClientError>,
    ) -> Outcome {
        if let Some(stale) = self.stale(generation) {
            return stale;
        }
        if self.state != SyncState::Live {
            return Outcome::Ignored;
        }

        let point = match result.and_then(|batch| transpose_feed(&batch)) {
            Ok(point) => point,
            Err(err) => return Outcome::Skipped(err),
        };

        let timestamp = point.timestamp;
        if self.series.push(point.clone()) {
            Outcome::Appended(point)
        } else {
            Outcome::Duplicate(timestamp)
        }
    }

    fn stale(&self, generation: Generation) -> Option<Outcome> {
        (generation != self.generation).then_some(Outcome::Stale {
            generation,
            current: self.generation,
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SyncState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeedTick, PriceHistory};
    use crate::series::parse_timestamp;

    const T0: &str = "2025-01-06T14:30:00Z";
    const T1: &str = "2025-01-06T14:30:04Z";
    const T2: &str = "2025-01-06T14:30:08Z";

    fn selection(tickers: &[&str]) -> Selection {
        tickers.iter().copied().collect()
    }

    fn aapl_history() -> HistoryResponse {
        HistoryResponse {
            timestamp: vec![T0.into(), T1.into()],
            price_history: vec![PriceHistory {
                ticker: "AAPL".into(),
                prices: vec![100.0, 101.0],
            }],
        }
    }

    fn feed(ticker: &str, price: f64, timestamp: &str) -> FeedResponse {
        FeedResponse {
            feed: vec![FeedTick {
                ticker: ticker.into(),
                price,
                timestamp: timestamp.into(),
            }],
        }
    }

    fn seeded_aapl() -> Synchronizer {
        let mut sync = Synchronizer::new();
        let load = sync.select(&selection(&["AAPL"])).expect("load request");
        sync.apply_history(load.generation, Ok(aapl_history()));
        sync
    }

    #[test]
    fn first_selection_issues_exactly_one_load() {
        let mut sync = Synchronizer::new();
        assert_eq!(*sync.state(), SyncState::Idle);

        let load = sync.select(&selection(&["AAPL", "MSFT"])).expect("load request");
        assert_eq!(load.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(*sync.state(), SyncState::Loading);

        assert!(sync.select(&selection(&["AAPL", "MSFT"])).is_none());
        assert_eq!(sync.generation(), load.generation);
    }

    #[test]
    fn aapl_scenario_seeds_dedups_and_appends() {
        let mut sync = seeded_aapl();
        let points = sync.series().points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price("AAPL"), Some(100.0));
        assert_eq!(points[1].price("AAPL"), Some(101.0));
        assert_eq!(sync.series().last_seen(), parse_timestamp(T1).ok());

        let poll = sync.poll_request().expect("live poll");
        assert_eq!(
            sync.apply_feed(poll.generation, Ok(feed("AAPL", 101.0, T1))),
            Outcome::Duplicate(parse_timestamp(T1).expect("ts"))
        );
        assert_eq!(sync.series().len(), 2);

        let outcome = sync.apply_feed(poll.generation, Ok(feed("AAPL", 102.0, T2)));
        assert!(matches!(outcome, Outcome::Appended(_)));
        assert_eq!(sync.series().len(), 3);
        assert_eq!(sync.series().last_seen(), parse_timestamp(T2).ok());
    }

    #[test]
    fn earlier_feed_is_discarded_like_a_duplicate() {
        let mut sync = seeded_aapl();
        let generation = sync.generation();
        assert!(matches!(
            sync.apply_feed(generation, Ok(feed("AAPL", 99.0, T0))),
            Outcome::Duplicate(_)
        ));
        assert_eq!(sync.series().len(), 2);
    }

    #[test]
    fn no_polls_before_seed_resolves() {
        let mut sync = Synchronizer::new();
        let load = sync.select(&selection(&["AAPL"])).expect("load request");
        assert!(sync.poll_request().is_none());
        assert_eq!(
            sync.apply_feed(load.generation, Ok(feed("AAPL", 1.0, T2))),
            Outcome::Ignored
        );

        sync.apply_history(load.generation, Ok(aapl_history()));
        assert!(sync.poll_request().is_some());
        assert_eq!(sync.series().len(), 2);
    }

    #[test]
    fn selection_change_drops_superseded_responses() {
        let mut sync = Synchronizer::new();
        let old = sync.select(&selection(&["AAPL"])).expect("load request");
        let new = sync.select(&selection(&["MSFT"])).expect("load request");
        assert!(new.generation > old.generation);

        assert!(matches!(
            sync.apply_history(old.generation, Ok(aapl_history())),
            Outcome::Stale { .. }
        ));
        assert!(sync.series().is_empty());
        assert_eq!(*sync.state(), SyncState::Loading);

        let msft = HistoryResponse {
            timestamp: vec![T0.into()],
            price_history: vec![PriceHistory {
                ticker: "MSFT".into(),
                prices: vec![300.0],
            }],
        };
        sync.apply_history(new.generation, Ok(msft));
        assert!(matches!(
            sync.apply_feed(old.generation, Ok(feed("AAPL", 1.0, T2))),
            Outcome::Stale { .. }
        ));
        assert_eq!(sync.series().len(), 1);
        assert_eq!(sync.series().points()[0].price("MSFT"), Some(300.0));
    }

    #[test]
    fn live_series_resets_when_selection_changes() {
        let mut sync = seeded_aapl();
        let load = sync.select(&selection(&["AAPL", "MSFT"])).expect("reload");
        assert!(sync.series().is_empty());
        assert_eq!(sync.series().last_seen(), None);
        assert_eq!(load.tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn empty_selection_clears_and_stops_polling() {
        let mut sync = seeded_aapl();
        assert!(sync.select(&Selection::new()).is_none());
        assert_eq!(*sync.state(), SyncState::Idle);
        assert!(sync.series().is_empty());
        assert!(sync.poll_request().is_none());

        assert!(sync.select(&selection(&["AAPL"])).is_some());
    }

    #[test]
    fn empty_history_accepts_first_feed_row() {
        let mut sync = Synchronizer::new();
        let load = sync.select(&selection(&["AAPL"])).expect("load request");
        let empty = HistoryResponse {
            timestamp: Vec::new(),
            price_history: vec![PriceHistory {
                ticker: "AAPL".into(),
                prices: Vec::new(),
            }],
        };
        assert_eq!(
            sync.apply_history(load.generation, Ok(empty)),
            Outcome::Seeded {
                points: 0,
                dropped: 0
            }
        );
        assert_eq!(sync.series().last_seen(), None);

        assert!(matches!(
            sync.apply_feed(load.generation, Ok(feed("AAPL", 100.0, T0))),
            Outcome::Appended(_)
        ));
    }

    #[test]
    fn failed_history_clears_and_stops_polling() {
        let mut sync = Synchronizer::new();
        let load = sync.select(&selection(&["AAPL"])).expect("load request");

        let outcome = sync.apply_history(load.generation, Err(ClientError::Status(502)));
        assert_eq!(outcome, Outcome::Failed(ClientError::Status(502)));
        assert!(sync.series().is_empty());
        assert_eq!(sync.error(), Some("HTTP error! status: 502"));
        assert!(sync.poll_request().is_none());

        assert!(sync.select(&selection(&["MSFT"])).is_some());
        assert_eq!(sync.error(), None);
    }

    #[test]
    fn history_missing_a_selected_column_fails() {
        let mut sync = Synchronizer::new();
        let load = sync
            .select(&selection(&["AAPL", "MSFT"]))
            .expect("load request");

        let outcome = sync.apply_history(load.generation, Ok(aapl_history()));
        assert!(matches!(outcome, Outcome::Failed(ClientError::Malformed(_))));
        assert!(sync.series().is_empty());
        assert!(sync.error().is_some());
        assert!(sync.poll_request().is_none());
    }

    #[test]
    fn failed_or_malformed_poll_is_skipped() {
        let mut sync = seeded_aapl();
        let generation = sync.generation();

        assert!(matches!(
            sync.apply_feed(generation, Err(ClientError::Network("refused".into()))),
            Outcome::Skipped(_)
        ));
        assert!(matches!(
            sync.apply_feed(generation, Ok(FeedResponse { feed: Vec::new() })),
            Outcome::Skipped(ClientError::Malformed(_))
        ));
        assert_eq!(sync.series().len(), 2);
        assert_eq!(*sync.state(), SyncState::Live);
        assert!(sync.poll_request().is_some());
    }

    #[test]
    fn repeated_history_response_is_ignored() {
        let mut sync = seeded_aapl();
        let generation = sync.generation();
        assert!(matches!(
            sync.apply_feed(generation, Ok(feed("AAPL", 102.0, T2))),
            Outcome::Appended(_)
        ));
        assert_eq!(
            sync.apply_history(generation, Ok(aapl_history())),
            Outcome::Ignored
        );
        assert_eq!(sync.series().len(), 3);
    }

    #[test]
    fn only_series_moves_count_as_changes() {
        let mut sync = seeded_aapl();
        let generation = sync.generation();

        let duplicate = sync.apply_feed(generation, Ok(feed("AAPL", 101.5, T1)));
        assert!(!duplicate.changed_series());
        let appended = sync.apply_feed(generation, Ok(feed("AAPL", 102.0, T2)));
        assert!(appended.changed_series());
        let stale = sync.apply_feed(generation.next(), Ok(feed("AAPL", 103.0, T2)));
        assert!(!stale.changed_series());
    }
}
