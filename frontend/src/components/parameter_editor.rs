use leptos::{ev, *};
use stock_dashboard_common::{ParameterEdit, StockParameters};

use super::dashboard::{DashboardActions, EditingSignal};

#[component]
pub fn ParameterEditor() -> impl IntoView {
    let editing = use_context::<EditingSignal>().expect("editing context missing");
    let actions = use_context::<DashboardActions>().expect("dashboard actions context missing");

    move || {
        editing.0.get().map(|stock| {
            view! { <EditorForm stock=stock editing=editing.0 on_submit=actions.submit_edit /> }
        })
    }
}

#[component]
fn EditorForm(
    stock: StockParameters,
    editing: RwSignal<Option<StockParameters>>,
    on_submit: Callback<(String, ParameterEdit)>,
) -> impl IntoView {
    let volatility = create_rw_signal(stock.volatility.to_string());
    let drift = create_rw_signal(stock.drift.to_string());
    let error = create_rw_signal(None::<String>);
    let ticker = stock.ticker.clone();

    let submit = move |_| {
        match ParameterEdit::parse(&drift.get_untracked(), &volatility.get_untracked()) {
            Ok(edit) => {
                error.set(None);
                on_submit.call((stock.ticker.clone(), edit));
            }
            Err(err) => error.set(Some(err.to_string())),
        }
    };

    view! {
        <div class="parameter-editor__backdrop" on:click=move |_| editing.set(None)>
            <div class="parameter-editor" on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                <h2>"Edit Parameters for "<span class="parameter-editor__ticker">{ticker}</span></h2>
                <label class="parameter-editor__field">
                    <span>"Volatility"</span>
                    <input
                        type="text"
                        inputmode="decimal"
                        prop:value=move || volatility.get()
                        on:input=move |ev: ev::Event| volatility.set(event_target_value(&ev))
                    />
                </label>
                <label class="parameter-editor__field">
                    <span>"Drift"</span>
                    <input
                        type="text"
                        inputmode="decimal"
                        prop:value=move || drift.get()
                        on:input=move |ev: ev::Event| drift.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|message| view! {
                    <p class="parameter-editor__error">{message}</p>
                })}
                <div class="parameter-editor__actions">
                    <button on:click=move |_| editing.set(None)>"Cancel"</button>
                    <button class="parameter-editor__submit" on:click=submit>"Update Ticker"</button>
                </div>
            </div>
        </div>
    }
}
