//! Tokio driver around the shared synchronizer.
//!
//! One task owns the `Synchronizer`. History fetches and feed polls run as
//! spawned requests tagged with the generation they were issued for; the
//! synchronizer drops whatever comes back for a superseded selection. The
//! poll timer is rebuilt on every selection change.
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use stock_dashboard_common::model::{FeedResponse, HistoryResponse};
use stock_dashboard_common::{
    ClientError, Generation, Outcome, PricePoint, Selection, Synchronizer,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::api::StockClient;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::logging;

/// Change notifications published to observers of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Loading {
        generation: Generation,
        tickers: Vec<String>,
    },
    Seeded {
        generation: Generation,
        points: Vec<PricePoint>,
    },
    Appended(PricePoint),
    Duplicate(DateTime<Utc>),
    HistoryFailed(String),
    Cleared,
}

enum Response {
    History(Generation, Result<HistoryResponse, ClientError>),
    Feed(Generation, Result<FeedResponse, ClientError>),
}

pub struct LiveSession {
    client: StockClient,
    poll_interval: Duration,
    events: broadcast::Sender<SyncEvent>,
}

impl LiveSession {
    pub fn new(client: StockClient, poll_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            poll_interval,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Drive the synchronizer until `shutdown` flips to `true` or its sender
    /// goes away, returning the final state.
    ///
    /// A dropped selection sender freezes the current selection.
    pub async fn run(
        self,
        mut selection: watch::Receiver<Selection>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<Synchronizer> {
        let mut sync = Synchronizer::new();
        let mut in_flight: JoinSet<Response> = JoinSet::new();
        let mut selection_open = true;

        let initial = selection.borrow_and_update().clone();
        self.reselect(&mut sync, &initial, &mut in_flight);
        let mut ticker = self.poll_timer();

        logging::info(
            "session.start",
            "Live session started",
            json!({
                "base_url": self.client.base_url(),
                "poll_interval_ms": self.poll_interval.as_millis() as u64,
            }),
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll(&sync, &mut in_flight);
                }
                changed = selection.changed(), if selection_open => {
                    if changed.is_err() {
                        selection_open = false;
                        continue;
                    }
                    let next = selection.borrow_and_update().clone();
                    if self.reselect(&mut sync, &next, &mut in_flight) {
                        ticker = self.poll_timer();
                    }
                }
                Some(joined) = in_flight.join_next() => {
                    match joined {
                        Ok(response) => self.apply(&mut sync, response),
                        Err(err) => logging::warn(
                            "session.request_aborted",
                            "Request task ended without a response",
                            json!({ "error": err.to_string() }),
                        ),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        in_flight.abort_all();
        logging::info(
            "session.stop",
            "Live session stopped",
            json!({ "points": sync.series().len(), "generation": sync.generation().value() }),
        );
        Ok(sync)
    }

    fn poll_timer(&self) -> Interval {
        let mut ticker = time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Returns whether the selection changed by value.
    fn reselect(
        &self,
        sync: &mut Synchronizer,
        next: &Selection,
        in_flight: &mut JoinSet<Response>,
    ) -> bool {
        let before = sync.generation();
        let load = sync.select(next);
        if sync.generation() == before {
            return false;
        }

        match load {
            Some(load) => {
                logging::info(
                    "sync.loading",
                    "Fetching price history",
                    json!({ "generation": load.generation.value(), "tickers": load.tickers }),
                );
                self.publish(SyncEvent::Loading {
                    generation: load.generation,
                    tickers: load.tickers.clone(),
                });
                let client = self.client.clone();
                in_flight.spawn(async move {
                    let result = client.price_history(&load.tickers).await;
                    Response::History(load.generation, result)
                });
            }
            None => {
                logging::info_simple("sync.idle", "Selection emptied; series cleared");
                self.publish(SyncEvent::Cleared);
            }
        }
        true
    }

    fn poll(&self, sync: &Synchronizer, in_flight: &mut JoinSet<Response>) {
        let Some(poll) = sync.poll_request() else {
            return;
        };
        let client = self.client.clone();
        in_flight.spawn(async move {
            let result = client.feed(&poll.tickers).await;
            Response::Feed(poll.generation, result)
        });
    }

    fn apply(&self, sync: &mut Synchronizer, response: Response) {
        let outcome = match response {
            Response::History(generation, result) => sync.apply_history(generation, result),
            Response::Feed(generation, result) => sync.apply_feed(generation, result),
        };

        match outcome {
            Outcome::Seeded { points, dropped } => {
                logging::info(
                    "sync.seeded",
                    "Price history applied",
                    json!({ "points": points, "dropped": dropped }),
                );
                self.publish(SyncEvent::Seeded {
                    generation: sync.generation(),
                    points: sync.series().points().to_vec(),
                });
            }
            Outcome::Appended(point) => {
                logging::debug(
                    "sync.appended",
                    "Feed row appended",
                    json!({ "timestamp": point.timestamp.to_rfc3339() }),
                );
                self.publish(SyncEvent::Appended(point));
            }
            Outcome::Duplicate(timestamp) => {
                logging::debug(
                    "sync.duplicate",
                    "Feed row not newer than last seen; discarded",
                    json!({ "timestamp": timestamp.to_rfc3339() }),
                );
                self.publish(SyncEvent::Duplicate(timestamp));
            }
            Outcome::Stale { generation, current } => {
                logging::debug(
                    "sync.stale",
                    "Dropped response for a superseded selection",
                    json!({ "generation": generation.value(), "current": current.value() }),
                );
            }
            Outcome::Ignored => {}
            Outcome::Skipped(err) => {
                logging::warn(
                    "sync.poll_failed",
                    "Feed poll skipped",
                    json!({ "error": err.to_string() }),
                );
            }
            Outcome::Failed(err) => {
                logging::error(
                    "sync.history_failed",
                    "Price history fetch failed",
                    json!({ "error": err.to_string() }),
                );
                self.publish(SyncEvent::HistoryFailed(err.to_string()));
            }
        }
    }

    fn publish(&self, event: SyncEvent) {
        let _ = self.events.send(event);
    }
}
