use leptos::{ev, *};
use stock_dashboard_common::search::{DEFAULT_SUGGESTIONS, matching_tickers};

use super::dashboard::{DashboardActions, SelectionSignal};

#[component]
pub fn TickerSearch() -> impl IntoView {
    let selection = use_context::<SelectionSignal>().expect("selection context missing");
    let actions = use_context::<DashboardActions>().expect("dashboard actions context missing");

    let available = create_rw_signal(Vec::<String>::new());
    let prefix = create_rw_signal(String::new());
    let load_error = create_rw_signal(None::<String>);

    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(async move {
        match crate::api::list_tickers().await {
            Ok(tickers) => available.set(tickers),
            Err(err) => {
                log::error!("cannot load tickers: {err}");
                load_error.set(Some(err.to_string()));
            }
        }
    });

    let suggestions = create_memo(move |_| {
        let prefix = prefix.get();
        available.with(|all| {
            selection
                .0
                .with(|selected| matching_tickers(all, &prefix, selected, DEFAULT_SUGGESTIONS))
        })
    });

    view! {
        <section class="ticker-search">
            <h2>"Add Ticker"</h2>
            <input
                type="search"
                placeholder="Search ticker..."
                prop:value=move || prefix.get()
                on:input=move |ev: ev::Event| prefix.set(event_target_value(&ev))
            />
            {move || load_error.get().map(|err| view! {
                <p class="ticker-search__error">"Cannot load tickers: "{err}</p>
            })}
            <ul class="ticker-search__results">
                <For
                    each=move || suggestions.get()
                    key=|ticker| ticker.clone()
                    children=move |ticker: String| {
                        let picked = ticker.clone();
                        view! {
                            <li
                                class="ticker-search__result"
                                on:click=move |_| actions.add.call(picked.clone())
                            >
                                {ticker}
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
