use leptos::*;
use stock_dashboard_common::StockParameters;

use crate::format::parameter_label;

use super::dashboard::{DashboardActions, EditingSignal, ParameterBookSignal};

#[component]
pub fn StockGrid() -> impl IntoView {
    let book = use_context::<ParameterBookSignal>().expect("parameter book context missing");
    let editing = use_context::<EditingSignal>().expect("editing context missing");
    let actions = use_context::<DashboardActions>().expect("dashboard actions context missing");

    let rows = create_memo(move |_| {
        book.0
            .with(|book| book.rows().cloned().collect::<Vec<StockParameters>>())
    });

    view! {
        <section class="stock-grid">
            <h2>"Selected Stocks"</h2>
            <Show
                when=move || rows.with(|rows| !rows.is_empty())
                fallback=|| view! {
                    <p class="stock-grid__empty">"No stocks selected. Search for a ticker to add it."</p>
                }
            >
                <table>
                    <thead>
                        <tr>
                            <th>"Ticker"</th>
                            <th>"Volatility"</th>
                            <th>"Drift"</th>
                            <th></th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=row_key
                            children=move |stock: StockParameters| {
                                let ticker_for_remove = stock.ticker.clone();
                                let volatility = parameter_label(stock.volatility);
                                let drift = parameter_label(stock.drift);
                                let ticker = stock.ticker.clone();

                                view! {
                                    <tr>
                                        <td class="stock-grid__ticker">{ticker}</td>
                                        <td>{volatility}</td>
                                        <td>{drift}</td>
                                        <td>
                                            <button
                                                class="stock-grid__edit"
                                                title="Update parameters"
                                                on:click=move |_| editing.0.set(Some(stock.clone()))
                                            >
                                                "Edit"
                                            </button>
                                        </td>
                                        <td>
                                            <button
                                                class="stock-grid__remove"
                                                title="Remove"
                                                on:click=move |_| actions.remove.call(ticker_for_remove.clone())
                                            >
                                                "✕"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

/// Rows are keyed on their values too, so a refresh re-renders edited rows.
fn row_key(stock: &StockParameters) -> String {
    format!(
        "{}:{:x}:{:x}",
        stock.ticker,
        stock.drift.to_bits(),
        stock.volatility.to_bits()
    )
}
