//! Browser driver for the shared synchronizer.
use gloo_timers::callback::Interval;
use leptos::*;
use stock_dashboard_common::{Outcome, Selection, Synchronizer};
use wasm_bindgen_futures::spawn_local;

use crate::api;

pub const POLL_INTERVAL_MS: u32 = 4_000;

/// Keep `sync` following `selection`: one history fetch per change, then a
/// feed poll every period until the next change.
pub fn start(selection: RwSignal<Selection>, sync: RwSignal<Synchronizer>) {
    let timer = store_value(None::<Interval>);

    create_effect(move |_| {
        let current = selection.get();
        let (changed, load) = sync
            .try_update(|sync| {
                let before = sync.generation();
                let load = sync.select(&current);
                (sync.generation() != before, load)
            })
            .unwrap_or((false, None));
        if !changed {
            return;
        }

        // Dropping the interval cancels it.
        timer.set_value(None);
        let Some(load) = load else {
            log::info!("selection cleared, polling stopped");
            return;
        };

        log::info!("loading history for {:?} ({})", load.tickers, load.generation);
        spawn_local(async move {
            let result = api::price_history(&load.tickers).await;
            apply(sync, |sync| sync.apply_history(load.generation, result));
        });
        timer.set_value(Some(Interval::new(POLL_INTERVAL_MS, move || poll(sync))));
    });

    on_cleanup(move || timer.set_value(None));
}

fn poll(sync: RwSignal<Synchronizer>) {
    let Some(request) = sync.with_untracked(Synchronizer::poll_request) else {
        return;
    };
    spawn_local(async move {
        let result = api::feed(&request.tickers).await;
        apply(sync, |sync| sync.apply_feed(request.generation, result));
    });
}

/// Views are only notified when the series or the state actually moved.
fn apply(sync: RwSignal<Synchronizer>, step: impl FnOnce(&mut Synchronizer) -> Outcome) {
    let outcome = sync.try_update_untracked(step);
    if outcome.as_ref().is_some_and(Outcome::changed_series) {
        sync.update(|_| {});
    }

    match outcome {
        Some(Outcome::Seeded { points, dropped }) => {
            log::info!("history seeded with {points} points ({dropped} dropped)")
        }
        Some(Outcome::Failed(err)) => log::error!("price history failed: {err}"),
        Some(Outcome::Skipped(err)) => log::warn!("feed poll skipped: {err}"),
        Some(Outcome::Stale {
            generation,
            current,
        }) => log::debug!("dropped result for {generation}, now at {current}"),
        Some(Outcome::Duplicate(timestamp)) => log::debug!("duplicate tick at {timestamp}"),
        _ => {}
    }
}
