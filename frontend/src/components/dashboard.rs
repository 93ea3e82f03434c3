use leptos::*;
use stock_dashboard_common::params::expect_single;
use stock_dashboard_common::{ParameterBook, ParameterEdit, Selection, StockParameters};
use wasm_bindgen_futures::spawn_local;

use crate::api;

use super::{
    parameter_editor::ParameterEditor, price_chart::PriceChart, stock_grid::StockGrid,
    ticker_search::TickerSearch,
};

#[derive(Clone, Copy)]
pub struct SelectionSignal(pub RwSignal<Selection>);

#[derive(Clone, Copy)]
pub struct ParameterBookSignal(pub RwSignal<ParameterBook>);

/// The stock currently open in the parameter editor.
#[derive(Clone, Copy)]
pub struct EditingSignal(pub RwSignal<Option<StockParameters>>);

#[derive(Clone, Copy)]
pub struct NoticeSignal(pub RwSignal<Option<String>>);

/// Grid mutations that go through the backend.
#[derive(Clone, Copy)]
pub struct DashboardActions {
    pub add: Callback<String>,
    pub remove: Callback<String>,
    pub submit_edit: Callback<(String, ParameterEdit)>,
}

/// Top-level dashboard wrapper providing shared application state via context.
#[component]
pub fn Dashboard() -> impl IntoView {
    let selection = create_rw_signal(Selection::new());
    let book = create_rw_signal(ParameterBook::new());
    let editing = create_rw_signal(None::<StockParameters>);
    let notice = create_rw_signal(None::<String>);

    let actions = DashboardActions {
        add: Callback::new(move |ticker: String| add_stock(ticker, selection, book, notice)),
        remove: Callback::new(move |ticker: String| {
            selection.update(|selection| {
                selection.remove(&ticker);
            });
            book.update(|book| {
                book.remove(&ticker);
            });
        }),
        submit_edit: Callback::new(move |(ticker, edit): (String, ParameterEdit)| {
            update_stock(ticker, edit, selection, book, editing, notice)
        }),
    };

    provide_context(SelectionSignal(selection));
    provide_context(ParameterBookSignal(book));
    provide_context(EditingSignal(editing));
    provide_context(NoticeSignal(notice));
    provide_context(actions);

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1>"Stock Simulation Dashboard"</h1>
                <p>"Tune drift and volatility, then watch the simulated prices move."</p>
            </header>
            <section class="dashboard__body">
                <aside class="dashboard__sidebar">
                    <TickerSearch />
                    <StockGrid />
                    {move || notice.get().map(|message| view! {
                        <p class="dashboard__notice">{message}</p>
                    })}
                </aside>
                <div class="dashboard__main">
                    <PriceChart />
                </div>
            </section>
            <ParameterEditor />
        </div>
    }
}

/// The ticker joins the grid and the chart only once the backend returned
/// exactly its parameters.
fn add_stock(
    ticker: String,
    selection: RwSignal<Selection>,
    book: RwSignal<ParameterBook>,
    notice: RwSignal<Option<String>>,
) {
    if selection.with_untracked(|selection| selection.contains(&ticker)) {
        return;
    }

    spawn_local(async move {
        let result = api::fetch_parameters(std::slice::from_ref(&ticker))
            .await
            .and_then(expect_single);
        match result {
            Ok(stock) => {
                book.update(|book| book.insert(stock));
                selection.update(|selection| {
                    selection.add(ticker);
                });
                notice.set(None);
            }
            Err(err) => {
                log::error!("cannot add {ticker}: {err}");
                notice.set(Some(format!("Cannot add {ticker}: {err}")));
            }
        }
    });
}

fn update_stock(
    ticker: String,
    edit: ParameterEdit,
    selection: RwSignal<Selection>,
    book: RwSignal<ParameterBook>,
    editing: RwSignal<Option<StockParameters>>,
    notice: RwSignal<Option<String>>,
) {
    let mut refresh = selection.get_untracked();
    refresh.add(ticker.clone());

    spawn_local(async move {
        match api::update_and_refetch(&ticker, edit, refresh.tickers()).await {
            Ok(stocks) => {
                book.update(|book| book.replace_all(stocks));
                editing.set(None);
                notice.set(None);
            }
            Err(err) => {
                log::error!("cannot update {ticker}: {err}");
                notice.set(Some(format!("Cannot update {ticker}: {err}")));
            }
        }
    });
}
